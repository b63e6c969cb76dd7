//! Pure functions for msgpack-rpc request building and response parsing.
//! This module does no socket I/O.
//!
//! Requests are `[0, msgid, method, params]` and responses are
//! `[1, msgid, error, result]`. Structs travel as maps keyed by field name.

use std::io::Read;

use rmpv::Value;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::AirSimError;

const REQUEST_TYPE: u8 = 0;
const RESPONSE_TYPE: u64 = 1;

/// A decoded msgpack-rpc response.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcResponse {
    pub msgid: u32,
    pub error: Value,
    pub result: Value,
}

impl RpcResponse {
    #[cfg(test)]
    pub(crate) fn success(msgid: u32, result: Value) -> Self {
        RpcResponse {
            msgid,
            error: Value::Nil,
            result,
        }
    }

    /// Yields the result, or the error the simulator reported for `method`.
    pub(crate) fn into_result(
        self,
        expected_msgid: u32,
        method: &str,
    ) -> Result<Value, AirSimError> {
        if self.msgid != expected_msgid {
            return Err(AirSimError::Protocol(format!(
                "response id {} does not match request id {} ({})",
                self.msgid, expected_msgid, method
            )));
        }

        match self.error {
            Value::Nil => Ok(self.result),
            error => Err(AirSimError::Rpc {
                method: method.to_string(),
                message: error_message(&error),
            }),
        }
    }
}

/// Encode a request message.
pub fn encode_request(msgid: u32, method: &str, params: &[Value]) -> Result<Vec<u8>, AirSimError> {
    let message = Value::Array(vec![
        Value::from(REQUEST_TYPE),
        Value::from(msgid),
        Value::from(method),
        Value::Array(params.to_vec()),
    ]);

    let mut buffer = Vec::with_capacity(32 + method.len());
    rmpv::encode::write_value(&mut buffer, &message)
        .map_err(|e| AirSimError::Encode(format!("{}: {}", method, e)))?;
    Ok(buffer)
}

/// Read exactly one response message from `reader`.
pub fn decode_response<R: Read>(reader: &mut R) -> Result<RpcResponse, AirSimError> {
    let message = rmpv::decode::read_value(reader).map_err(|e| match e {
        rmpv::decode::Error::InvalidMarkerRead(io) | rmpv::decode::Error::InvalidDataRead(io) => {
            AirSimError::Io(io)
        }
        other => AirSimError::Protocol(other.to_string()),
    })?;

    let mut parts = match message {
        Value::Array(parts) => parts,
        other => {
            return Err(AirSimError::Protocol(format!(
                "expected response array, got {}",
                other
            )));
        }
    };

    if parts.len() != 4 {
        return Err(AirSimError::Protocol(format!(
            "expected 4 response elements, got {}",
            parts.len()
        )));
    }

    if parts[0].as_u64() != Some(RESPONSE_TYPE) {
        return Err(AirSimError::Protocol(format!(
            "unexpected message type {}",
            parts[0]
        )));
    }

    let msgid = parts[1]
        .as_u64()
        .and_then(|id| u32::try_from(id).ok())
        .ok_or_else(|| AirSimError::Protocol(format!("invalid message id {}", parts[1])))?;

    let result = parts.pop().unwrap_or(Value::Nil);
    let error = parts.pop().unwrap_or(Value::Nil);

    Ok(RpcResponse {
        msgid,
        error,
        result,
    })
}

/// Convert a serializable value into a msgpack value, encoding structs as maps.
pub(crate) fn to_value<T: Serialize>(value: &T) -> Result<Value, AirSimError> {
    let bytes = rmp_serde::to_vec_named(value).map_err(|e| AirSimError::Encode(e.to_string()))?;
    rmpv::decode::read_value(&mut bytes.as_slice()).map_err(|e| AirSimError::Encode(e.to_string()))
}

/// Convert a msgpack value into `T`.
pub(crate) fn from_value<T: DeserializeOwned>(value: &Value) -> Result<T, AirSimError> {
    let mut bytes = Vec::new();
    rmpv::encode::write_value(&mut bytes, value).map_err(|e| AirSimError::Decode(e.to_string()))?;
    rmp_serde::from_slice(&bytes).map_err(|e| AirSimError::Decode(e.to_string()))
}

fn error_message(error: &Value) -> String {
    match error {
        Value::String(message) => message.as_str().unwrap_or("invalid utf-8 in error").to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Boundary, Vector3r};

    fn response_bytes(msgid: u32, error: Value, result: Value) -> Vec<u8> {
        let message = Value::Array(vec![Value::from(1u8), Value::from(msgid), error, result]);
        let mut bytes = Vec::new();
        rmpv::encode::write_value(&mut bytes, &message).unwrap();
        bytes
    }

    #[test]
    fn encodes_request_envelope() {
        let bytes = encode_request(7, "armDisarm", &[Value::from(true), Value::from("")]).unwrap();
        let decoded = rmpv::decode::read_value(&mut bytes.as_slice()).unwrap();

        assert_eq!(
            decoded,
            Value::Array(vec![
                Value::from(0u8),
                Value::from(7u32),
                Value::from("armDisarm"),
                Value::Array(vec![Value::from(true), Value::from("")]),
            ])
        );
    }

    #[test]
    fn encodes_structs_as_named_maps() {
        let value = to_value(&Vector3r::new(1.0, 2.0, 3.0)).unwrap();
        let map = value.as_map().expect("struct should encode as a map");
        let keys: Vec<&str> = map.iter().filter_map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["x_val", "y_val", "z_val"]);
    }

    #[test]
    fn decodes_successful_response() {
        let bytes = response_bytes(3, Value::Nil, Value::from(true));
        let response = decode_response(&mut bytes.as_slice()).unwrap();

        assert_eq!(response, RpcResponse::success(3, Value::from(true)));
        assert_eq!(response.into_result(3, "ping").unwrap(), Value::from(true));
    }

    #[test]
    fn server_error_becomes_rpc_error() {
        let bytes = response_bytes(4, Value::from("vehicle not found"), Value::Nil);
        let response = decode_response(&mut bytes.as_slice()).unwrap();

        match response.into_result(4, "armDisarm") {
            Err(AirSimError::Rpc { method, message }) => {
                assert_eq!(method, "armDisarm");
                assert_eq!(message, "vehicle not found");
            }
            other => panic!("expected Rpc error, got {:?}", other),
        }
    }

    #[test]
    fn mismatched_id_is_protocol_error() {
        let response = RpcResponse::success(9, Value::Nil);
        assert!(matches!(
            response.into_result(10, "reset"),
            Err(AirSimError::Protocol(_))
        ));
    }

    #[test]
    fn rejects_request_message_type() {
        let message = Value::Array(vec![
            Value::from(0u8),
            Value::from(1u8),
            Value::from("ping"),
            Value::Array(vec![]),
        ]);
        let mut bytes = Vec::new();
        rmpv::encode::write_value(&mut bytes, &message).unwrap();

        assert!(matches!(
            decode_response(&mut bytes.as_slice()),
            Err(AirSimError::Protocol(_))
        ));
    }

    #[test]
    fn rejects_short_response() {
        let message = Value::Array(vec![Value::from(1u8), Value::from(1u8)]);
        let mut bytes = Vec::new();
        rmpv::encode::write_value(&mut bytes, &message).unwrap();

        assert!(matches!(
            decode_response(&mut bytes.as_slice()),
            Err(AirSimError::Protocol(_))
        ));
    }

    #[test]
    fn truncated_stream_is_io_error() {
        let bytes = response_bytes(1, Value::Nil, Value::from("pong"));
        let mut truncated = &bytes[..bytes.len() - 2];
        assert!(matches!(
            decode_response(&mut truncated),
            Err(AirSimError::Io(_))
        ));
    }

    #[test]
    fn from_value_accepts_integer_coordinates_and_ignores_extra_fields() {
        let pos = Value::Map(vec![
            (Value::from("x_val"), Value::from(1)),
            (Value::from("y_val"), Value::from(2.5f64)),
            (Value::from("z_val"), Value::from(-5)),
        ]);
        let value = Value::Map(vec![
            (Value::from("pos"), pos),
            (Value::from("boundary"), Value::Array(vec![])),
            (Value::from("name"), Value::from("fence")),
        ]);

        let boundary: Boundary = from_value(&value).unwrap();
        assert_eq!(boundary.pos, Vector3r::new(1.0, 2.5, -5.0));
        assert!(boundary.boundary.is_empty());
    }
}
