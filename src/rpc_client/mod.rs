use rmpv::Value;

use crate::AirSimError;

pub(crate) mod codec;
pub(crate) mod tcp;
#[cfg(test)]
pub(crate) mod stub;

/// Trait for issuing msgpack-rpc calls to the simulator
pub(crate) trait RpcClient: Send {
    /// Invoke `method` with positional `params` and return its result.
    fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, AirSimError>;
    #[cfg(test)]
    fn requests(&self) -> Vec<(String, Vec<Value>)> {
        Vec::new()
    }
}
