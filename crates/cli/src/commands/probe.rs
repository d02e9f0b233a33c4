//! One-shot server probe.

use std::time::Duration;

use anyhow::Result;
use cemuhook_udp_client::{ClientConfig, ClientError, probe};
use tracing::debug;

use crate::commands::{ProbeArgs, parse_server};
use crate::error::CliError;
use crate::output;

pub async fn execute(args: &ProbeArgs, json: bool) -> Result<()> {
    let (host, port) = parse_server(&args.server)?;
    let config = ClientConfig::new(host, port, args.client_id);
    let timeout = Duration::from_millis(args.timeout_ms.max(1));

    debug!("Probing {} with client id {}", args.server, args.client_id);
    let report = match probe(&config, timeout).await {
        Ok(report) => report,
        Err(ClientError::Timeout(_)) => {
            return Err(CliError::NoResponse(format!(
                "no valid answer from {} within {} ms",
                args.server, args.timeout_ms
            ))
            .into());
        }
        Err(error) => return Err(CliError::from(error).into()),
    };

    output::print_probe_report(&report, json);
    if report.pad_data.is_none() {
        output::print_warning("Server answered but sent no pad data for slot 0", json);
    }
    Ok(())
}
