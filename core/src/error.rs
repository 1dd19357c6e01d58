//! Error types for the index client.
//!
//! # Design
//! Every variant is fatal to the binary. Connect failures keep the target
//! address because the OS error alone ("connection refused") does not say
//! where the client was pointed. Malformed port arguments never reach this
//! type; they fall back to the default port instead.

use std::fmt;
use std::io;
use std::net::SocketAddr;

/// Errors returned by [`crate::run`] and [`crate::exchange`].
#[derive(Debug)]
pub enum ClientError {
    /// The socket could not be created or the connection was not accepted.
    Connect { addr: SocketAddr, source: io::Error },

    /// The request payload could not be written in full.
    Send(io::Error),

    /// The single receive call failed.
    Receive(io::Error),

    /// A progress line could not be written to the operator output.
    Output(io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Connect { addr, source } => {
                write!(f, "failed to connect to {addr}: {source}")
            }
            ClientError::Send(err) => write!(f, "failed to send request: {err}"),
            ClientError::Receive(err) => write!(f, "failed to receive response: {err}"),
            ClientError::Output(err) => write!(f, "failed to write output: {err}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Connect { source, .. } => Some(source),
            ClientError::Send(err) | ClientError::Receive(err) | ClientError::Output(err) => {
                Some(err)
            }
        }
    }
}
