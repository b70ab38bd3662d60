use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "public";

/// Listener and asset settings for the relay process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `PORT`, `BIND_ADDRESS` and `STATIC_DIR`.
    /// Unparsable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("PORT") {
            match raw.trim().parse() {
                Ok(port) => config.port = port,
                Err(_) => warn!(value = %raw, "Ignoring unparsable PORT, using {}", DEFAULT_PORT),
            }
        }

        if let Some(raw) = lookup("BIND_ADDRESS") {
            match raw.trim().parse() {
                Ok(bind) => config.bind = bind,
                Err(_) => warn!(value = %raw, "Ignoring unparsable BIND_ADDRESS, using {}", config.bind),
            }
        }

        if let Some(dir) = lookup("STATIC_DIR").filter(|d| !d.is_empty()) {
            config.static_dir = PathBuf::from(dir);
        }

        config
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
