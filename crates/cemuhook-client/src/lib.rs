//! CemuhookUDP motion/touch client.
//!
//! A [`Client`] owns a background thread that runs a single-threaded socket
//! engine: every few seconds it asks the server for port info and a pad data
//! subscription, and it decodes every datagram that comes back. Accepted
//! samples are remapped to the consumer's axis convention, touch input is
//! normalized against the configured calibration, and both are published
//! into a shared [`DeviceStatus`] under one lock.
//!
//! ```no_run
//! use std::sync::Arc;
//! use cemuhook_udp_client::{Client, ClientConfig, DeviceStatus};
//!
//! # fn main() -> Result<(), cemuhook_udp_client::ClientError> {
//! let status = Arc::new(DeviceStatus::new(None));
//! let client = Client::start(Arc::clone(&status), &ClientConfig::default())?;
//!
//! let state = status.snapshot();
//! println!("gyro: {:?}", state.motion_status.gyro);
//!
//! drop(client); // stops the engine and joins its thread
//! # Ok(())
//! # }
//! ```

#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

pub mod client;
pub mod config;
pub mod counters;
pub mod engine;
pub mod probe;
pub mod session;
pub mod status;

pub use client::Client;
pub use config::{ClientConfig, DEFAULT_CLIENT_ID, DEFAULT_HOST, DEFAULT_PORT, PAD_ID};
pub use counters::{CounterSnapshot, SessionCounters};
pub use probe::{ProbeReport, probe};
pub use session::{SampleOutcome, Session};
pub use status::{DeviceState, DeviceStatus, MotionStatus, TouchCalibration, TouchStatus, Vec3};

pub use cemuhook_udp_protocol as protocol;

use std::time::Duration;

use cemuhook_udp_protocol::ProtocolError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid IPv4 server address '{host}': {source}")]
    InvalidHost {
        host: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to build engine runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("Failed to spawn engine thread: {0}")]
    ThreadSpawn(#[source] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("No response from server within {0:?}")]
    Timeout(Duration),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::InvalidConfig("port must be non-zero".to_string());
        assert_eq!(
            format!("{err}"),
            "Invalid configuration: port must be non-zero"
        );

        let err = ClientError::Timeout(Duration::from_millis(250));
        assert_eq!(format!("{err}"), "No response from server within 250ms");
    }
}
