//! Diagnostic counters shared between the engine thread and the owner.
//!
//! All counters use `AtomicU64` with `Ordering::Relaxed`. They are eventually
//! consistent and never used to synchronize the published device status.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counter snapshot returned by [`SessionCounters::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CounterSnapshot {
    /// Datagrams read from the socket, valid or not
    pub datagrams_received: u64,
    /// Datagrams dropped by validation or decoding
    pub malformed_dropped: u64,
    /// Pad samples dropped by the sequence filter
    pub stale_dropped: u64,
    /// Pad samples written into the device status
    pub samples_published: u64,
    /// Version responses seen
    pub version_responses: u64,
    /// Port info responses seen
    pub port_info_responses: u64,
    /// Request datagrams handed to the socket
    pub requests_sent: u64,
    /// Request datagrams the socket refused
    pub send_failures: u64,
}

/// Atomic counters for one client session.
///
/// # Example
///
/// ```rust
/// use cemuhook_udp_client::SessionCounters;
///
/// let counters = SessionCounters::new();
/// counters.inc_datagram();
/// counters.inc_malformed();
///
/// let snapshot = counters.snapshot();
/// assert_eq!(snapshot.datagrams_received, 1);
/// assert_eq!(snapshot.malformed_dropped, 1);
/// ```
#[derive(Debug, Default)]
pub struct SessionCounters {
    datagrams_received: AtomicU64,
    malformed_dropped: AtomicU64,
    stale_dropped: AtomicU64,
    samples_published: AtomicU64,
    version_responses: AtomicU64,
    port_info_responses: AtomicU64,
    requests_sent: AtomicU64,
    send_failures: AtomicU64,
}

impl SessionCounters {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            datagrams_received: AtomicU64::new(0),
            malformed_dropped: AtomicU64::new(0),
            stale_dropped: AtomicU64::new(0),
            samples_published: AtomicU64::new(0),
            version_responses: AtomicU64::new(0),
            port_info_responses: AtomicU64::new(0),
            requests_sent: AtomicU64::new(0),
            send_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn inc_datagram(&self) {
        self.datagrams_received.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_malformed(&self) {
        self.malformed_dropped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_stale(&self) {
        self.stale_dropped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_published(&self) {
        self.samples_published.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_version(&self) {
        self.version_responses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_port_info(&self) {
        self.port_info_responses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of one request send.
    #[inline]
    pub fn record_send(&self, ok: bool) {
        if ok {
            self.requests_sent.fetch_add(1, Ordering::Relaxed);
        } else {
            self.send_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            datagrams_received: self.datagrams_received.load(Ordering::Relaxed),
            malformed_dropped: self.malformed_dropped.load(Ordering::Relaxed),
            stale_dropped: self.stale_dropped.load(Ordering::Relaxed),
            samples_published: self.samples_published.load(Ordering::Relaxed),
            version_responses: self.version_responses.load(Ordering::Relaxed),
            port_info_responses: self.port_info_responses.load(Ordering::Relaxed),
            requests_sent: self.requests_sent.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_is_zeroed() {
        assert_eq!(SessionCounters::new().snapshot(), CounterSnapshot::default());
    }

    #[test]
    fn test_record_send_splits_outcomes() {
        let counters = SessionCounters::new();
        counters.record_send(true);
        counters.record_send(true);
        counters.record_send(false);

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.requests_sent, 2);
        assert_eq!(snapshot.send_failures, 1);
    }

    #[test]
    fn test_concurrent_increments() -> Result<(), Box<dyn std::error::Error>> {
        let counters = Arc::new(SessionCounters::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counters = Arc::clone(&counters);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        counters.inc_datagram();
                        counters.inc_published();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().map_err(|_| "counter thread panicked")?;
        }

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.datagrams_received, 4000);
        assert_eq!(snapshot.samples_published, 4000);
        Ok(())
    }
}
