//! Socket engine: one UDP socket multiplexing a repeating request timer and
//! continuous receive on a single-threaded runtime.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::Arc;
use std::time::Duration;

use cemuhook_udp_protocol::{
    MAX_PACKET_SIZE, PadDataRequest, PortInfoRequest, Response, encode_request,
};
use tokio::net::UdpSocket;
use tokio::sync::oneshot;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::config::PAD_ID;
use crate::counters::SessionCounters;

/// Signals a running engine to stop. Consumed on use.
#[derive(Debug)]
pub struct StopHandle(oneshot::Sender<()>);

impl StopHandle {
    pub fn stop(self) {
        if self.0.send(()).is_err() {
            debug!("Socket engine already stopped");
        }
    }
}

/// Creates a stop handle and the signal [`SocketEngine::run`] waits on.
///
/// Dropping the handle without calling [`StopHandle::stop`] also stops the
/// engine.
pub fn stop_channel() -> (StopHandle, oneshot::Receiver<()>) {
    let (tx, rx) = oneshot::channel();
    (StopHandle(tx), rx)
}

#[derive(Debug)]
pub struct SocketEngine {
    socket: UdpSocket,
    server: SocketAddr,
    client_id: u32,
    send_interval: Duration,
    counters: Arc<SessionCounters>,
}

impl SocketEngine {
    /// Binds an ephemeral IPv4 port and registers it with the current runtime.
    ///
    /// Must be called from within a tokio runtime context.
    pub fn bind(
        server: SocketAddr,
        client_id: u32,
        send_interval: Duration,
        counters: Arc<SessionCounters>,
    ) -> io::Result<Self> {
        let socket =
            std::net::UdpSocket::bind(SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0)))?;
        socket.set_nonblocking(true)?;
        let socket = UdpSocket::from_std(socket)?;

        Ok(Self {
            socket,
            server,
            client_id,
            send_interval,
            counters,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub fn server(&self) -> SocketAddr {
        self.server
    }

    /// Services the socket until `stop` fires or its handle is dropped.
    ///
    /// Every decoded response is handed to `dispatch` on the calling task.
    pub async fn run<F>(self, mut stop: oneshot::Receiver<()>, mut dispatch: F)
    where
        F: FnMut(Response),
    {
        let mut send_timer = self.start_send(Instant::now());
        let mut buf = [0u8; MAX_PACKET_SIZE];

        loop {
            tokio::select! {
                biased;
                _ = &mut stop => {
                    debug!("Socket engine stopping");
                    break;
                }
                _ = send_timer.tick() => self.send_requests().await,
                received = self.start_receive(&mut buf) => {
                    self.on_receive(received, &buf, &mut dispatch);
                }
            }
        }
    }

    /// First tick fires one interval after `from`; later ticks are scheduled
    /// from the previous deadline, not from when the send completed.
    fn start_send(&self, from: Instant) -> Interval {
        let mut timer = time::interval_at(from + self.send_interval, self.send_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Burst);
        timer
    }

    async fn start_receive(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        self.socket.recv_from(buf).await
    }

    async fn send_requests(&self) {
        let port_info = encode_request(&PortInfoRequest::single(PAD_ID), self.client_id);
        let pad_data = encode_request(&PadDataRequest::by_id(PAD_ID), self.client_id);

        for (name, packet) in [("PortInfo", port_info), ("PadData", pad_data)] {
            match self.socket.send_to(&packet, self.server).await {
                Ok(_) => self.counters.record_send(true),
                Err(e) => {
                    self.counters.record_send(false);
                    warn!("Failed to send {name} request to {}: {e}", self.server);
                }
            }
        }
    }

    fn on_receive<F>(&self, received: io::Result<(usize, SocketAddr)>, buf: &[u8], dispatch: &mut F)
    where
        F: FnMut(Response),
    {
        let (len, from) = match received {
            Ok(received) => received,
            Err(e) => {
                debug!("UDP receive error: {e}");
                return;
            }
        };
        self.counters.inc_datagram();

        let datagram = buf.get(..len).unwrap_or(buf);
        match Response::parse(datagram) {
            Ok(response) => dispatch(response),
            Err(e) => {
                self.counters.inc_malformed();
                debug!("Invalid UDP packet received from {from}: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cemuhook_udp_protocol::{
        EMPTY_MAC_ADDRESS, MessageType, PadData, SubscribeFlags, Version, decode, encode_response,
        validate_request,
    };
    use crate::counters::CounterSnapshot;
    use parking_lot::Mutex;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    const INTERVAL: Duration = Duration::from_millis(20);
    const WAIT: Duration = Duration::from_secs(2);

    async fn recv_request(server: &UdpSocket) -> Result<(Vec<u8>, SocketAddr), Box<dyn std::error::Error>> {
        let mut buf = [0u8; 64];
        let (len, from) = time::timeout(WAIT, server.recv_from(&mut buf)).await??;
        Ok((buf.get(..len).unwrap_or_default().to_vec(), from))
    }

    async fn wait_for<P: Fn() -> bool>(predicate: P) -> bool {
        let deadline = Instant::now() + WAIT;
        while Instant::now() < deadline {
            if predicate() {
                return true;
            }
            time::sleep(Duration::from_millis(5)).await;
        }
        predicate()
    }

    #[tokio::test]
    async fn test_sends_request_pair_after_first_interval() -> TestResult {
        let started = Instant::now();
        let server = UdpSocket::bind("127.0.0.1:0").await?;
        let counters = Arc::new(SessionCounters::new());
        let engine = SocketEngine::bind(server.local_addr()?, 4321, INTERVAL, Arc::clone(&counters))?;
        let (stop, signal) = stop_channel();
        let task = tokio::spawn(engine.run(signal, |_| {}));

        let (first, _) = recv_request(&server).await?;
        assert!(started.elapsed() >= INTERVAL);
        assert_eq!(validate_request(&first), Some(MessageType::PortInfo));
        let port_info: PortInfoRequest = decode(&first)?;
        assert_eq!(port_info, PortInfoRequest::single(0));

        let (second, _) = recv_request(&server).await?;
        assert_eq!(validate_request(&second), Some(MessageType::PadData));
        let pad_data: PadDataRequest = decode(&second)?;
        assert_eq!(pad_data.flags, SubscribeFlags::Id);
        assert_eq!(pad_data.pad_id, 0);
        assert_eq!(pad_data.mac, EMPTY_MAC_ADDRESS);

        // The timer keeps re-arming.
        let (third, _) = recv_request(&server).await?;
        assert_eq!(validate_request(&third), Some(MessageType::PortInfo));

        stop.stop();
        task.await?;
        assert!(counters.snapshot().requests_sent >= 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_dispatches_valid_and_drops_malformed() -> TestResult {
        let server = UdpSocket::bind("127.0.0.1:0").await?;
        let counters = Arc::new(SessionCounters::new());
        let engine = SocketEngine::bind(server.local_addr()?, 1, INTERVAL, Arc::clone(&counters))?;
        let client_port = engine.local_addr()?.port();
        let client = SocketAddr::from((Ipv4Addr::LOCALHOST, client_port));

        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let (stop, signal) = stop_channel();
        let task = tokio::spawn(engine.run(signal, move |response| sink.lock().push(response)));

        server.send_to(b"not a cemuhook datagram", client).await?;
        let mut corrupted = encode_response(&Version { version: 1001 }, 0);
        if let Some(byte) = corrupted.last_mut() {
            *byte ^= 0xFF;
        }
        server.send_to(&corrupted, client).await?;

        let pad = PadData {
            packet_counter: 3,
            ..PadData::default()
        };
        server.send_to(&encode_response(&pad, 0), client).await?;

        assert!(wait_for(|| !received.lock().is_empty()).await);
        assert!(wait_for(|| counters.snapshot().malformed_dropped == 2).await);
        assert_eq!(received.lock().as_slice(), &[Response::PadData(pad)]);

        stop.stop();
        task.await?;
        assert_eq!(counters.snapshot().datagrams_received, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_send_failures_are_counted_and_loop_continues() -> TestResult {
        // Without SO_BROADCAST every send to the limited broadcast address
        // is refused.
        let broadcast = SocketAddr::from((Ipv4Addr::BROADCAST, 26760));
        let counters = Arc::new(SessionCounters::new());
        let engine = SocketEngine::bind(broadcast, 1, INTERVAL, Arc::clone(&counters))?;
        let (stop, signal) = stop_channel();
        let task = tokio::spawn(engine.run(signal, |_| {}));

        assert!(wait_for(|| counters.snapshot().send_failures >= 4).await);
        assert!(!task.is_finished());
        assert_eq!(counters.snapshot().requests_sent, 0);

        stop.stop();
        time::timeout(WAIT, task).await??;
        Ok(())
    }

    #[tokio::test]
    async fn test_receive_error_is_skipped() -> TestResult {
        // An unconnected socket on loopback never surfaces a receive error,
        // so the completion is fed to the handler directly.
        let server = UdpSocket::bind("127.0.0.1:0").await?;
        let counters = Arc::new(SessionCounters::new());
        let engine = SocketEngine::bind(server.local_addr()?, 1, INTERVAL, Arc::clone(&counters))?;

        let mut dispatched = Vec::new();
        let mut dispatch = |response: Response| dispatched.push(response);
        let reset = io::Error::from(io::ErrorKind::ConnectionReset);
        engine.on_receive(Err(reset), &[], &mut dispatch);
        assert_eq!(counters.snapshot(), CounterSnapshot::default());

        let reply = encode_response(&Version { version: 1001 }, 0);
        engine.on_receive(Ok((reply.len(), server.local_addr()?)), &reply, &mut dispatch);
        assert_eq!(counters.snapshot().datagrams_received, 1);
        assert_eq!(dispatched, [Response::Version(Version { version: 1001 })]);
        Ok(())
    }

    #[tokio::test]
    async fn test_dropping_stop_handle_ends_run() -> TestResult {
        let server = UdpSocket::bind("127.0.0.1:0").await?;
        let engine = SocketEngine::bind(
            server.local_addr()?,
            1,
            Duration::from_secs(60),
            Arc::new(SessionCounters::new()),
        )?;
        let (stop, signal) = stop_channel();
        let task = tokio::spawn(engine.run(signal, |_| {}));

        drop(stop);
        time::timeout(WAIT, task).await??;
        Ok(())
    }
}
