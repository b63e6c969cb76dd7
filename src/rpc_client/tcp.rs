//! Provides an implementation of an RPC client that uses the TCP protocol.

use std::{
    io::{BufReader, BufWriter, Write},
    net::{TcpStream, ToSocketAddrs},
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
};

use log::{debug, error, warn};
use rmpv::Value;

use crate::AirSimError;
use crate::client::airsim::Configuration;
use crate::statistics::StatisticsEngine;

use super::RpcClient;
use super::codec::{decode_response, encode_request};

/// msgpack-rpc client over a single persistent TCP connection.
///
/// The simulator keeps the session open for the lifetime of the client, so calls are
/// serialized on one socket and matched to responses by message id.
pub(crate) struct TcpRpcClient {
    statistics: Arc<StatisticsEngine>,
    connection: Mutex<Connection>,
    next_msgid: AtomicU32,
}

struct Connection {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl RpcClient for TcpRpcClient {
    fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, AirSimError> {
        let msgid = self.next_msgid.fetch_add(1, Ordering::Relaxed);
        debug!("-> #{} {} {:?}", msgid, method, params);

        self.statistics.increment_request_count();
        let result = self.exchange(msgid, method, &params);

        match &result {
            Ok(value) => debug!("<- #{} {} {}", msgid, method, value),
            Err(e) => {
                error!("Call to {} failed: {}", method, e);
                self.statistics.increment_error_count();
            }
        }

        result
    }
}

impl TcpRpcClient {
    /// Connects to the simulator named in `configuration`.
    pub fn connect(
        configuration: &Configuration,
        statistics: Arc<StatisticsEngine>,
    ) -> Result<Self, AirSimError> {
        let host = &configuration.simulator_host;
        let address = host
            .to_socket_addrs()
            .map_err(|e| {
                AirSimError::Connection(format!("Invalid simulator host '{}': {}", host, e))
            })?
            .next()
            .ok_or_else(|| AirSimError::Connection(format!("Invalid simulator host '{}'", host)))?;

        let stream = TcpStream::connect_timeout(&address, configuration.connect_timeout)
            .map_err(|e| {
                AirSimError::Connection(format!(
                    "Failed to connect to simulator at {}: {}",
                    host, e
                ))
            })?;
        stream.set_nodelay(true)?;
        stream.set_read_timeout(Some(configuration.rpc_timeout))?;

        debug!("Connected to simulator at {}", address);

        Ok(TcpRpcClient {
            statistics,
            connection: Mutex::new(Connection {
                reader: BufReader::new(stream.try_clone()?),
                writer: BufWriter::new(stream),
            }),
            next_msgid: AtomicU32::new(0),
        })
    }

    fn exchange(&self, msgid: u32, method: &str, params: &[Value]) -> Result<Value, AirSimError> {
        let request = encode_request(msgid, method, params)?;

        let mut connection = self
            .connection
            .lock()
            .map_err(|_| AirSimError::Connection("Connection lock poisoned".into()))?;

        connection.writer.write_all(&request)?;
        connection.writer.flush()?;

        // A reply that arrives after its call timed out is still queued on the socket
        loop {
            let response = decode_response(&mut connection.reader)?;
            if response.msgid < msgid {
                warn!(
                    "Discarding late response #{} while waiting for #{} ({})",
                    response.msgid, msgid, method
                );
                continue;
            }
            return response.into_result(msgid, method);
        }
    }
}
