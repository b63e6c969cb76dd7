//! AirSim is an open-source simulator for drones and cars built on Unreal Engine. It exposes
//! vehicle control and simulation state through a msgpack-rpc API on TCP port 41451.
//!
//! This crate drives a simulated multirotor through a short, operator-paced demonstration of
//! the simulator's custom boundary (geofence) API. It allows developers to:
//!
//! * Connect to a running AirSim instance and take API control of a multirotor.
//! * Arm, take off, hover and reset the vehicle.
//! * Read the active boundary region and push custom boundaries built around the vehicle.
//!
//! The demo is written against the [MultirotorClient] trait, so the same sequence can be
//! replayed against a mock in tests or against [AirSimClient] on a live simulator.
//!
//! ```no_run
//! use airsim_boundary::{AirSimClient, BoundaryDemo, ConsolePrompt, DemoConfiguration};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AirSimClient::new()?;
//!     let demo = BoundaryDemo::connect(&client, DemoConfiguration::default())?;
//!     demo.run(&mut ConsolePrompt::default())?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

mod client;
mod demo;
mod prompt;
mod rpc_client;
mod statistics;
mod types;

pub use client::MultirotorClient;
pub use client::airsim::{AirSimClient, Configuration};
pub use demo::{BoundaryDemo, BoundaryVariant, DemoConfiguration, square_boundary};
pub use prompt::{ConsolePrompt, NoWait, Prompt};
pub use statistics::Statistics;
pub use types::{Boundary, KinematicsState, MultirotorState, Quaternionr, Vector3r};

#[cfg(feature = "bench-internals")]
pub use rpc_client::codec::{decode_response, encode_request};

/// Default address of the AirSim RPC server.
pub const DEFAULT_SIMULATOR_HOST: &str = "127.0.0.1:41451";

/// Errors produced while talking to the simulator or running the demo.
#[derive(Debug, Error)]
pub enum AirSimError {
    /// Socket or console I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The simulator could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// A request could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),

    /// A response could not be deserialized into the expected type.
    #[error("decode error: {0}")]
    Decode(String),

    /// The response did not follow the msgpack-rpc framing.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The simulator executed the call and reported a failure.
    #[error("{method} failed: {message}")]
    Rpc { method: String, message: String },
}
