//! Command implementations for dsuctl CLI

pub mod probe;
pub mod watch;

use std::net::SocketAddrV4;

use cemuhook_udp_client::{DEFAULT_CLIENT_ID, TouchCalibration};
use clap::Args;

use crate::error::CliError;

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Server address as IPv4:PORT
    #[arg(long, env = "DSUCTL_SERVER", default_value = "127.0.0.1:26760")]
    pub server: String,

    /// Client id written into request headers
    #[arg(long, default_value_t = DEFAULT_CLIENT_ID)]
    pub client_id: u32,

    /// How long to wait for answers
    #[arg(long, default_value_t = 1000)]
    pub timeout_ms: u64,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// YAML client configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Server address as IPv4:PORT, overrides the configuration file
    #[arg(long, env = "DSUCTL_SERVER")]
    pub server: Option<String>,

    /// Stop after this many seconds (0 runs until Ctrl-C)
    #[arg(short, long, default_value_t = 10)]
    pub duration_s: u64,

    /// Request refresh interval, overrides the configuration file
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Touchpad bounds as MINX,MINY,MAXX,MAXY
    #[arg(long)]
    pub touch_calibration: Option<String>,

    /// How often to print the published state
    #[arg(long, default_value_t = 250)]
    pub print_every_ms: u64,
}

/// Splits `IPv4:PORT` into the host and port the client configuration expects.
pub fn parse_server(server: &str) -> Result<(String, u16), CliError> {
    let addr: SocketAddrV4 = server.trim().parse().map_err(|error| {
        CliError::InvalidConfiguration(format!("Invalid --server '{server}': {error}"))
    })?;
    Ok((addr.ip().to_string(), addr.port()))
}

pub fn parse_calibration(value: &str) -> Result<TouchCalibration, CliError> {
    let invalid = |reason: &str| {
        CliError::InvalidConfiguration(format!(
            "Invalid --touch-calibration '{value}': {reason}"
        ))
    };

    let bounds = value
        .split(',')
        .map(|part| part.trim().parse::<u16>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| invalid(&error.to_string()))?;
    let [min_x, min_y, max_x, max_y] = bounds.as_slice() else {
        return Err(invalid("expected four comma-separated values"));
    };
    if max_x <= min_x || max_y <= min_y {
        return Err(invalid("max must exceed min on both axes"));
    }
    Ok(TouchCalibration::new(*min_x, *min_y, *max_x, *max_y))
}
