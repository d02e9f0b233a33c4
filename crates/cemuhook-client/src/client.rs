//! Owner of the engine thread.

use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tokio::runtime::Builder;
use tracing::{error, info};

use crate::config::ClientConfig;
use crate::counters::{CounterSnapshot, SessionCounters};
use crate::engine::{SocketEngine, StopHandle, stop_channel};
use crate::session::Session;
use crate::status::DeviceStatus;
use crate::{ClientError, ClientResult};

const THREAD_NAME: &str = "cemuhook-udp";

/// A running CemuhookUDP client.
///
/// The engine thread is started by [`Client::start`] and is stopped and
/// joined when the client is dropped, so no callback can touch the shared
/// status after `drop` returns.
#[derive(Debug)]
pub struct Client {
    stop: Option<StopHandle>,
    thread: Option<JoinHandle<()>>,
    local_addr: SocketAddr,
    server: SocketAddr,
    counters: Arc<SessionCounters>,
}

impl Client {
    /// Binds the socket and starts servicing it on a dedicated thread.
    ///
    /// Configuration, bind and thread errors are returned here; nothing that
    /// happens on the wire afterwards is surfaced to the caller.
    pub fn start(status: Arc<DeviceStatus>, config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let server = config.server_addr()?;

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientError::Runtime)?;

        let counters = Arc::new(SessionCounters::new());
        let engine = {
            let _guard = runtime.enter();
            SocketEngine::bind(
                server,
                config.client_id,
                config.send_interval,
                Arc::clone(&counters),
            )?
        };
        let local_addr = engine.local_addr()?;

        let (stop, signal) = stop_channel();
        let mut session = Session::new(status, Arc::clone(&counters));
        let thread = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                runtime.block_on(engine.run(signal, |response| session.handle(response)));
            })
            .map_err(ClientError::ThreadSpawn)?;

        info!(
            "Starting communication with UDP input server on {}:{}",
            server.ip(),
            server.port()
        );

        Ok(Self {
            stop: Some(stop),
            thread: Some(thread),
            local_addr,
            server,
            counters,
        })
    }

    /// Starts a client with the default send interval.
    pub fn new(
        status: Arc<DeviceStatus>,
        host: &str,
        port: u16,
        client_id: u32,
    ) -> ClientResult<Self> {
        Self::start(status, &ClientConfig::new(host, port, client_id))
    }

    /// Address the client socket is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server
    }

    pub fn counters(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.thread
            .as_ref()
            .is_some_and(|thread| !thread.is_finished())
    }

    /// Stops the engine and waits for its thread to exit.
    pub fn shutdown(mut self) {
        self.stop_blocking();
    }

    fn stop_blocking(&mut self) {
        if let Some(stop) = self.stop.take() {
            stop.stop();
        }
        if let Some(thread) = self.thread.take() {
            match thread.join() {
                Ok(()) => info!("Stopped communication with UDP input server on {}", self.server),
                Err(_) => error!("UDP client thread panicked"),
            }
        }
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.stop_blocking();
    }
}
