//! Provides an implementation of an RPC client that returns stubbed responses.
//! Useful for testing.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use rmpv::Value;

use crate::AirSimError;
use crate::statistics::StatisticsEngine;

use super::RpcClient;
use super::codec::RpcResponse;

/// Answers calls from a table keyed by method name. Methods without an entry return nil.
pub(crate) struct StubRpcClient {
    responses: HashMap<String, RpcResponse>,
    pub(crate) statistics: Option<Arc<StatisticsEngine>>,
    requests: Mutex<Vec<(String, Vec<Value>)>>,
}

impl StubRpcClient {
    pub fn new() -> Self {
        StubRpcClient {
            responses: HashMap::new(),
            statistics: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Respond to `method` with `result`.
    pub fn with_result(mut self, method: &str, result: Value) -> Self {
        self.responses
            .insert(method.to_string(), RpcResponse::success(0, result));
        self
    }

    /// Respond to `method` with a simulator-side error.
    pub fn with_error(mut self, method: &str, message: &str) -> Self {
        self.responses.insert(
            method.to_string(),
            RpcResponse {
                msgid: 0,
                error: Value::from(message),
                result: Value::Nil,
            },
        );
        self
    }
}

impl RpcClient for StubRpcClient {
    fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, AirSimError> {
        if let Some(statistics) = &self.statistics {
            statistics.increment_request_count();
        }
        self.requests
            .lock()
            .unwrap()
            .push((method.to_string(), params));

        match self.responses.get(method) {
            Some(response) => response.clone().into_result(0, method),
            None => Ok(Value::Nil),
        }
    }

    fn requests(&self) -> Vec<(String, Vec<Value>)> {
        self.requests.lock().unwrap().clone()
    }
}
