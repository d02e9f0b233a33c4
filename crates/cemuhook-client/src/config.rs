//! Client configuration supplied by the host application's settings.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ClientError, ClientResult};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 26760;
pub const DEFAULT_CLIENT_ID: u32 = 24872;
pub const DEFAULT_SEND_INTERVAL: Duration = Duration::from_secs(3);

/// The only pad slot the client requests.
pub const PAD_ID: u8 = 0;

/// Where to find the server and how often to refresh the subscription.
///
/// # Examples
///
/// ```
/// use cemuhook_udp_client::ClientConfig;
///
/// let config = ClientConfig::from_yaml_str("host: 192.168.1.20\nport: 26761\n")?;
/// assert_eq!(config.server_addr()?.to_string(), "192.168.1.20:26761");
/// assert_eq!(config.client_id, cemuhook_udp_client::DEFAULT_CLIENT_ID);
/// # Ok::<(), cemuhook_udp_client::ClientError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// IPv4 address of the server. Host names are not resolved.
    pub host: String,
    pub port: u16,
    /// Identifier written into every request header.
    pub client_id: u32,
    /// Period between request pairs; the server drops subscriptions that are
    /// not refreshed.
    #[serde(rename = "send_interval_ms", with = "duration_ms")]
    pub send_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            client_id: DEFAULT_CLIENT_ID,
            send_interval: DEFAULT_SEND_INTERVAL,
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16, client_id: u32) -> Self {
        Self {
            host: host.into(),
            port,
            client_id,
            send_interval: DEFAULT_SEND_INTERVAL,
        }
    }

    pub fn with_send_interval(mut self, interval: Duration) -> Self {
        self.send_interval = interval;
        self
    }

    pub fn with_client_id(mut self, client_id: u32) -> Self {
        self.client_id = client_id;
        self
    }

    pub fn from_yaml_str(yaml: &str) -> ClientResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ClientResult<()> {
        if self.port == 0 {
            return Err(ClientError::InvalidConfig(
                "port must be non-zero".to_string(),
            ));
        }
        if self.send_interval.is_zero() {
            return Err(ClientError::InvalidConfig(
                "send interval must be non-zero".to_string(),
            ));
        }
        self.server_addr().map(|_| ())
    }

    pub fn server_addr(&self) -> ClientResult<SocketAddr> {
        let ip: Ipv4Addr = self
            .host
            .trim()
            .parse()
            .map_err(|source| ClientError::InvalidHost {
                host: self.host.clone(),
                source,
            })?;
        Ok(SocketAddr::V4(SocketAddrV4::new(ip, self.port)))
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
