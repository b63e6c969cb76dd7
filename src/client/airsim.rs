use std::{sync::Arc, time::Duration};

use log::{info, warn};
use rmpv::Value;
use serde::de::DeserializeOwned;

use crate::rpc_client::RpcClient;
use crate::rpc_client::codec::{from_value, to_value};
use crate::rpc_client::tcp::TcpRpcClient;
use crate::statistics::{Statistics, StatisticsEngine};
use crate::{AirSimError, Boundary, DEFAULT_SIMULATOR_HOST, MultirotorState};

#[cfg(test)]
use crate::rpc_client::stub::StubRpcClient;

use super::MultirotorClient;


/// Version of the RPC interface this client speaks.
const CLIENT_VERSION: i64 = 1;
/// Oldest server interface this client can work with.
const MIN_REQUIRED_SERVER_VERSION: i64 = 1;

/// Connection settings for [AirSimClient].
#[derive(Clone, Debug)]
pub struct Configuration {
    /// Host and port of the simulator's RPC server.
    pub simulator_host: String,
    pub connect_timeout: Duration,
    /// How long to wait for any single response. Must cover the slowest manoeuvre
    /// (takeoff), because those calls only return once the vehicle has finished.
    pub rpc_timeout: Duration,
    /// Vehicle to command. Empty selects the simulator's default vehicle.
    pub vehicle_name: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            simulator_host: DEFAULT_SIMULATOR_HOST.to_string(),
            connect_timeout: Duration::from_secs(5),
            rpc_timeout: Duration::from_secs(60),
            vehicle_name: String::new(),
        }
    }
}

/// A client for a multirotor in a running AirSim simulator.
///
/// # Examples
///
/// ```no_run
/// use airsim_boundary::{AirSimClient, MultirotorClient};
/// use std::time::Duration;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = AirSimClient::new()?;
///     client.confirm_connection()?;
///     client.enable_api_control(true)?;
///     client.arm_disarm(true)?;
///
///     client.takeoff(Duration::from_secs(20))?;
///     println!("{}", client.sim_get_boundary()?);
///
///     client.arm_disarm(false)?;
///     client.reset()?;
///     client.enable_api_control(false)?;
///     Ok(())
/// }
/// ```
///
/// # Error Handling
///
/// Every call returns [AirSimError]. Connection and socket failures surface as
/// [AirSimError::Connection] or [AirSimError::Io]; failures the simulator reports for a
/// call it received surface as [AirSimError::Rpc] with the method name and message.
pub struct AirSimClient {
    statistics: Arc<StatisticsEngine>,
    rpc_client: Box<dyn RpcClient>,
    vehicle_name: String,
}

impl MultirotorClient for AirSimClient {
    fn confirm_connection(&self) -> Result<(), AirSimError> {
        let pong: bool = self.call("ping", Vec::new())?;
        if pong {
            println!("Connected!");
        } else {
            warn!("Ping returned false");
        }

        let server_version: i64 = self.call("getServerVersion", Vec::new())?;
        let min_client_version: i64 = self.call("getMinRequiredClientVersion", Vec::new())?;

        if server_version < MIN_REQUIRED_SERVER_VERSION {
            warn!(
                "AirSim server is of an older version ({}) than this client requires ({}). \
                 Update the simulator.",
                server_version, MIN_REQUIRED_SERVER_VERSION
            );
        } else if CLIENT_VERSION < min_client_version {
            warn!(
                "This client ({}) is older than the simulator requires ({}). Update the client.",
                CLIENT_VERSION, min_client_version
            );
        }

        info!(
            "Client Ver:{} (Min Req: {}), Server Ver:{} (Min Req: {})",
            CLIENT_VERSION, min_client_version, server_version, MIN_REQUIRED_SERVER_VERSION
        );
        Ok(())
    }

    fn enable_api_control(&self, enabled: bool) -> Result<(), AirSimError> {
        self.invoke(
            "enableApiControl",
            vec![Value::from(enabled), self.vehicle()],
        )
    }

    fn arm_disarm(&self, arm: bool) -> Result<bool, AirSimError> {
        self.call("armDisarm", vec![Value::from(arm), self.vehicle()])
    }

    fn reset(&self) -> Result<(), AirSimError> {
        self.invoke("reset", Vec::new())
    }

    fn get_multirotor_state(&self) -> Result<MultirotorState, AirSimError> {
        self.call("getMultirotorState", vec![self.vehicle()])
    }

    fn takeoff(&self, timeout: Duration) -> Result<(), AirSimError> {
        self.invoke(
            "takeoff",
            vec![Value::from(timeout.as_secs_f32()), self.vehicle()],
        )
    }

    fn hover(&self) -> Result<(), AirSimError> {
        self.invoke("hover", vec![self.vehicle()])
    }

    fn sim_get_boundary(&self) -> Result<Boundary, AirSimError> {
        self.call("simGetBoundary", Vec::new())
    }

    fn sim_enable_custom_boundary_data(&self, enabled: bool) -> Result<(), AirSimError> {
        self.invoke("simEnableCustomBoundaryData", vec![Value::from(enabled)])
    }

    fn sim_set_boundary(&self, boundary: &Boundary) -> Result<(), AirSimError> {
        self.invoke("simSetBoundary", vec![to_value(boundary)?])
    }
}

impl AirSimClient {
    /// Connects to a simulator on the local machine at the default port.
    ///
    /// # Errors
    ///
    /// Returns [AirSimError::Connection] if the simulator is not running or refuses the
    /// connection.
    pub fn new() -> Result<AirSimClient, AirSimError> {
        Self::with_configuration(&Configuration::default())
    }

    /// Connects to the simulator described by `configuration`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use airsim_boundary::{AirSimClient, Configuration};
    ///
    /// fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let configuration = Configuration {
    ///         simulator_host: "192.168.1.20:41451".to_string(),
    ///         vehicle_name: "Drone1".to_string(),
    ///         ..Default::default()
    ///     };
    ///     let client = AirSimClient::with_configuration(&configuration)?;
    ///     Ok(())
    /// }
    /// ```
    ///
    /// # Errors
    ///
    /// - If `simulator_host` does not resolve to a socket address.
    /// - If the TCP connection cannot be established within `connect_timeout`.
    pub fn with_configuration(configuration: &Configuration) -> Result<AirSimClient, AirSimError> {
        let statistics = Arc::new(StatisticsEngine::new());
        let rpc_client = TcpRpcClient::connect(configuration, statistics.clone())?;

        Ok(AirSimClient {
            statistics,
            rpc_client: Box::new(rpc_client),
            vehicle_name: configuration.vehicle_name.clone(),
        })
    }

    #[cfg(test)]
    pub(crate) fn stub(mut rpc_client: StubRpcClient) -> AirSimClient {
        let statistics = Arc::new(StatisticsEngine::new());
        rpc_client.statistics = Some(statistics.clone());

        AirSimClient {
            statistics,
            rpc_client: Box::new(rpc_client),
            vehicle_name: String::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn requests(&self) -> Vec<(String, Vec<Value>)> {
        self.rpc_client.requests()
    }

    /// Get statistics for the calls made by this client
    pub fn statistics(&self) -> Statistics {
        self.statistics.snapshot()
    }

    fn vehicle(&self) -> Value {
        Value::from(self.vehicle_name.as_str())
    }

    /// Call `method` and decode its result.
    fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, AirSimError> {
        let result = self.rpc_client.call(method, params)?;
        from_value(&result)
    }

    /// Call `method`, discarding whatever it returns.
    fn invoke(&self, method: &str, params: Vec<Value>) -> Result<(), AirSimError> {
        self.rpc_client.call(method, params)?;
        Ok(())
    }
}
