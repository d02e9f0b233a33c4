//! Output formatting for CLI responses

use anyhow::Error;
use cemuhook_udp_client::protocol::{PadData, PortInfo};
use cemuhook_udp_client::{CounterSnapshot, DeviceState, ProbeReport};
use colored::*;
use serde::Serialize;
use serde_json::json;

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "exit_code": crate::error::exit_code(error)
        }
    });
    print_json(&error_json);
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format output as JSON: {e}"),
    }
}

pub fn print_probe_report(report: &ProbeReport, json: bool) {
    if json {
        print_json(&json!({ "success": true, "probe": report }));
        return;
    }

    println!(
        "{} {} ({} ms)",
        "Server:".bold(),
        report.server.to_string().green(),
        report.elapsed_ms
    );
    match &report.version {
        Some(version) => println!("  Protocol version: {}", version.version),
        None => println!("  Protocol version: {}", "no answer".yellow()),
    }
    match &report.port_info {
        Some(info) => print_port_info(info),
        None => println!("  Port info: {}", "no answer".yellow()),
    }
    match &report.pad_data {
        Some(pad) => print_pad_data(pad),
        None => println!("  Pad data: {}", "no answer".yellow()),
    }
    if report.malformed > 0 {
        println!("  {} {} malformed datagram(s)", "⚠".yellow(), report.malformed);
    }
    if report.receive_errors > 0 {
        println!("  {} {} receive error(s)", "⚠".yellow(), report.receive_errors);
    }
}

fn print_port_info(info: &PortInfo) {
    let state = format!("{:?}", info.slot_state());
    let colored_state = if info.is_active != 0 {
        state.green()
    } else {
        state.dimmed()
    };
    println!(
        "  Pad {}: {} {:?} via {:?}, battery {:?}",
        info.pad_id,
        colored_state,
        info.device_model(),
        info.connection(),
        info.battery_status()
    );
}

fn print_pad_data(pad: &PadData) {
    println!(
        "  Sample #{}: accel ({:+.3}, {:+.3}, {:+.3}) g, gyro ({:+.2}, {:+.2}, {:+.2}) deg/s",
        pad.packet_counter,
        pad.accel.x,
        pad.accel.y,
        pad.accel.z,
        pad.gyro.pitch,
        pad.gyro.yaw,
        pad.gyro.roll
    );
}

#[derive(Serialize)]
struct StateLine<'a> {
    elapsed_ms: u64,
    #[serde(flatten)]
    state: &'a DeviceState,
}

/// Print one published device state
pub fn print_state(elapsed_ms: u64, state: &DeviceState, json: bool) {
    if json {
        print_json(&StateLine { elapsed_ms, state });
        return;
    }

    let motion = &state.motion_status;
    let touch = &state.touch_status;
    let touch_text = if touch.active {
        format!("({:.3}, {:.3})", touch.x, touch.y).green()
    } else {
        "inactive".dimmed()
    };
    println!(
        "[{elapsed_ms:>7} ms] accel ({:+.3}, {:+.3}, {:+.3}) gyro ({:+.2}, {:+.2}, {:+.2}) touch {touch_text}",
        motion.accel.x, motion.accel.y, motion.accel.z, motion.gyro.x, motion.gyro.y, motion.gyro.z,
    );
}

pub fn print_counters(counters: &CounterSnapshot, json: bool) {
    if json {
        print_json(&json!({ "success": true, "counters": counters }));
        return;
    }

    println!("{}", "Session summary:".bold());
    println!("  Requests sent:      {}", counters.requests_sent);
    if counters.send_failures > 0 {
        println!("  Send failures:      {}", counters.send_failures.to_string().red());
    }
    println!("  Datagrams received: {}", counters.datagrams_received);
    println!("  Samples published:  {}", counters.samples_published.to_string().green());
    println!("  Stale dropped:      {}", counters.stale_dropped);
    println!("  Malformed dropped:  {}", counters.malformed_dropped);
}

/// Print warning message
pub fn print_warning(message: &str, json: bool) {
    if json {
        print_json(&json!({ "success": true, "warning": message }));
    } else {
        println!("{} {}", "⚠".yellow(), message);
    }
}
