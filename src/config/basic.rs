use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Basic (core) configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicConfig {
    /// HTTP server listen address (e.g., "0.0.0.0", "127.0.0.1").
    /// TOML: `basic.listen_addr`. Default: `0.0.0.0`.
    #[serde(default = "default_listen_ip")]
    pub listen_addr: IpAddr,

    /// HTTP server listen port.
    /// TOML: `basic.listen_port`. Default: `3000`.
    #[serde(default = "default_listen_port")]
    #[serde(deserialize_with = "deserialize_port_lax")]
    pub listen_port: u16,

    /// Database URL for SQLite. The file is created if missing.
    /// TOML: `basic.database_url`. Default: `sqlite://patients.db`.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Log level for tracing subscriber initialization (e.g., "error", "warn", "info", "debug", "trace").
    /// TOML: `basic.loglevel`. Default: `info`.
    #[serde(default = "default_loglevel")]
    pub loglevel: String,
}

impl BasicConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.listen_addr, self.listen_port))
    }
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_ip(),
            listen_port: default_listen_port(),
            database_url: default_database_url(),
            loglevel: default_loglevel(),
        }
    }
}

// Env providers hand every value over as a string.
fn deserialize_port_lax<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;

    match v {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u16::try_from(n).ok())
            .ok_or_else(|| serde::de::Error::custom("basic.listen_port out of range")),
        Value::String(s) => s
            .trim()
            .parse::<u16>()
            .map_err(|e| serde::de::Error::custom(format!("invalid basic.listen_port: {e}"))),
        _ => Err(serde::de::Error::custom(
            "expected a number or a numeric string for basic.listen_port",
        )),
    }
}

/// Default IP address for the HTTP server listen address.
fn default_listen_ip() -> IpAddr {
    Ipv4Addr::new(0, 0, 0, 0).into()
}

/// Default port for the HTTP server.
fn default_listen_port() -> u16 {
    3000
}

fn default_database_url() -> String {
    "sqlite://patients.db".to_string()
}

fn default_loglevel() -> String {
    "info".to_string()
}
