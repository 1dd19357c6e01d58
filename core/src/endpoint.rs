//! Connection target for the client.
//!
//! # Design
//! The host is fixed; only the port can be overridden. A port argument that
//! does not parse as a `u16` falls back to the numeric default instead of
//! being carried around as raw text, so what gets displayed is always the
//! port actually dialed.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// Host every connection is made to.
pub const DEFAULT_HOST: Ipv4Addr = Ipv4Addr::LOCALHOST;

/// Port used when no usable override is supplied.
pub const DEFAULT_PORT: u16 = 34567;

/// The (host, port) pair the client connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    host: Ipv4Addr,
    port: u16,
}

impl Endpoint {
    pub fn new(port: u16) -> Self {
        Self {
            host: DEFAULT_HOST,
            port,
        }
    }

    /// Build the endpoint from the optional external port token.
    ///
    /// Missing, non-numeric and out-of-range tokens all yield
    /// [`DEFAULT_PORT`]. Rejected tokens are logged, never returned as errors.
    pub fn from_arg(arg: Option<&str>) -> Self {
        let Some(raw) = arg else {
            return Self::default();
        };
        match raw.trim().parse::<u16>() {
            Ok(port) => Self::new(port),
            Err(err) => {
                tracing::warn!(arg = raw, %err, "ignoring port argument, using {DEFAULT_PORT}");
                Self::default()
            }
        }
    }

    pub fn host(&self) -> Ipv4Addr {
        self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.host, self.port))
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_PORT)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
