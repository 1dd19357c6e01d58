//! The single request/response exchange.
//!
//! # Design
//! `exchange` does the write/read pair over a caller-supplied stream and
//! touches nothing else. `run` wraps it with the real socket and the operator
//! progress lines. The `TcpStream` lives in `run`'s scope only, so it is
//! closed on drop whether the exchange succeeds or not.

use std::fmt;
use std::io::{self, Read, Write};
use std::net::TcpStream;

use tracing::debug;

use crate::endpoint::Endpoint;
use crate::error::ClientError;
use crate::http::{ByteStr, RECV_BUFFER_LEN, REQUEST};

/// Outcome of one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// Bytes handed to the transport. Always `REQUEST.len()` on success.
    pub sent: usize,
    /// Bytes returned by the single read; empty when the peer closed first.
    pub response: Vec<u8>,
}

/// Write [`REQUEST`] once, then read at most [`RECV_BUFFER_LEN`] bytes once.
///
/// Anything the peer sends past the first read is left in the stream.
pub fn exchange<S: Read + Write + ?Sized>(stream: &mut S) -> Result<Exchange, ClientError> {
    stream.write_all(REQUEST).map_err(ClientError::Send)?;
    stream.flush().map_err(ClientError::Send)?;
    debug!(bytes = REQUEST.len(), "request sent");

    let mut buf = vec![0u8; RECV_BUFFER_LEN];
    let n = loop {
        match stream.read(&mut buf) {
            Ok(n) => break n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(ClientError::Receive(err)),
        }
    };
    buf.truncate(n);
    debug!(bytes = n, "response received");

    Ok(Exchange {
        sent: REQUEST.len(),
        response: buf,
    })
}

/// Connect to `endpoint`, perform one exchange and report each step to `out`.
///
/// Returns the raw response bytes. A zero-length response is a success.
pub fn run<W: Write + ?Sized>(endpoint: &Endpoint, out: &mut W) -> Result<Vec<u8>, ClientError> {
    line(out, format_args!("Creating our socket."))?;
    line(
        out,
        format_args!(
            "Connecting to \nIP: {} \nPort: {}",
            endpoint.host(),
            endpoint.port()
        ),
    )?;

    let addr = endpoint.socket_addr();
    debug!(%addr, "connecting");
    let mut stream =
        TcpStream::connect(addr).map_err(|source| ClientError::Connect { addr, source })?;
    debug!(%addr, "connected");

    line(out, format_args!("Sending: {}", ByteStr(REQUEST)))?;
    let Exchange { response, .. } = exchange(&mut stream)?;
    line(out, format_args!("Response: {}", ByteStr(&response)))?;

    line(out, format_args!("Closing socket."))?;
    drop(stream);
    debug!(%addr, "closed");

    Ok(response)
}

fn line<W: Write + ?Sized>(out: &mut W, args: fmt::Arguments<'_>) -> Result<(), ClientError> {
    writeln!(out, "{args}").map_err(ClientError::Output)
}
