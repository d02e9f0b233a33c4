//! Live view of the status published by a running client.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use cemuhook_udp_client::{Client, ClientConfig, DeviceStatus};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::info;

use crate::commands::{WatchArgs, parse_calibration, parse_server};
use crate::error::CliError;
use crate::output;

pub async fn execute(args: &WatchArgs, json: bool) -> Result<()> {
    let config = build_config(args)?;
    let calibration = args
        .touch_calibration
        .as_deref()
        .map(parse_calibration)
        .transpose()?;

    let status = Arc::new(DeviceStatus::new(calibration));
    let client = {
        let status = Arc::clone(&status);
        tokio::task::spawn_blocking(move || Client::start(status, &config))
            .await?
            .map_err(CliError::from)?
    };
    let server = client.server_addr();
    info!("Watching {server} from {}", client.local_addr());

    let started = Instant::now();
    let deadline = (args.duration_s > 0).then(|| started + Duration::from_secs(args.duration_s));
    let mut ticker = time::interval(Duration::from_millis(args.print_every_ms.max(10)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut last_published = 0;
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut ctrl_c => break,
        }
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            break;
        }

        let published = client.counters().samples_published;
        if published != last_published {
            last_published = published;
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            output::print_state(elapsed_ms, &status.snapshot(), json);
        }
    }

    let counters = client.counters();
    tokio::task::spawn_blocking(move || client.shutdown()).await?;
    output::print_counters(&counters, json);

    if counters.samples_published == 0 {
        return Err(CliError::NoResponse(format!("no pad data received from {server}")).into());
    }
    Ok(())
}

fn build_config(args: &WatchArgs) -> Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let yaml = fs::read_to_string(path)
                .with_context(|| format!("Failed to read configuration file {path}"))?;
            ClientConfig::from_yaml_str(&yaml).map_err(CliError::from)?
        }
        None => ClientConfig::default(),
    };

    if let Some(server) = &args.server {
        let (host, port) = parse_server(server)?;
        config.host = host;
        config.port = port;
    }
    if let Some(interval_ms) = args.interval_ms {
        config = config.with_send_interval(Duration::from_millis(interval_ms));
    }

    config.validate().map_err(CliError::from)?;
    Ok(config)
}
