//! One-shot connectivity check against a server.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use cemuhook_udp_protocol::{
    MAX_PACKET_SIZE, PadData, PadDataRequest, PortInfo, PortInfoRequest, Response, Version,
    VersionRequest, encode_request,
};
use serde::Serialize;
use tokio::net::UdpSocket;
use tokio::time::{self, Instant};
use tracing::debug;

use crate::config::{ClientConfig, PAD_ID};
use crate::{ClientError, ClientResult};

/// What a server answered to a single round of requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeReport {
    pub server: SocketAddr,
    pub version: Option<Version>,
    pub port_info: Option<PortInfo>,
    pub pad_data: Option<PadData>,
    /// Datagrams from the server that failed validation.
    pub malformed: u64,
    /// Failed `recv_from` calls, e.g. ICMP port-unreachable surfacing as a
    /// connection reset on some platforms.
    pub receive_errors: u64,
    pub elapsed_ms: u64,
}

impl ProbeReport {
    fn new(server: SocketAddr) -> Self {
        Self {
            server,
            version: None,
            port_info: None,
            pad_data: None,
            malformed: 0,
            receive_errors: 0,
            elapsed_ms: 0,
        }
    }

    /// Folds one receive completion into the report.
    fn record(&mut self, received: io::Result<(usize, SocketAddr)>, buf: &[u8]) {
        let (len, from) = match received {
            Ok(received) => received,
            Err(e) => {
                self.receive_errors = self.receive_errors.saturating_add(1);
                debug!("UDP receive error: {e}");
                return;
            }
        };
        if from != self.server {
            debug!("Ignoring datagram from unexpected peer {from}");
            return;
        }

        match Response::parse(buf.get(..len).unwrap_or_default()) {
            Ok(Response::Version(version)) => self.version = Some(version),
            Ok(Response::PortInfo(info)) => self.port_info = Some(info),
            Ok(Response::PadData(pad)) => self.pad_data = Some(pad),
            Err(e) => {
                self.malformed = self.malformed.saturating_add(1);
                debug!("Invalid UDP packet received from {from}: {e}");
            }
        }
    }

    pub fn responded(&self) -> bool {
        self.version.is_some() || self.port_info.is_some() || self.pad_data.is_some()
    }
}

/// Sends version, port info and pad data requests once and collects the
/// answers until pad data arrives or `timeout` elapses.
///
/// # Errors
///
/// Returns [`ClientError::Timeout`] when no valid response arrived in time.
pub async fn probe(config: &ClientConfig, timeout: Duration) -> ClientResult<ProbeReport> {
    config.validate()?;
    let server = config.server_addr()?;

    let socket = UdpSocket::bind(SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0))).await?;
    let started = Instant::now();

    let requests = [
        encode_request(&VersionRequest, config.client_id),
        encode_request(&PortInfoRequest::single(PAD_ID), config.client_id),
        encode_request(&PadDataRequest::by_id(PAD_ID), config.client_id),
    ];
    for request in &requests {
        socket.send_to(request, server).await?;
    }

    let deadline = started + timeout;
    let mut report = ProbeReport::new(server);
    let mut buf = [0u8; MAX_PACKET_SIZE];

    while report.pad_data.is_none() {
        let Ok(received) = time::timeout_at(deadline, socket.recv_from(&mut buf)).await else {
            break;
        };
        report.record(received, &buf);
    }

    report.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    if !report.responded() {
        return Err(ClientError::Timeout(timeout));
    }
    Ok(report)
}
