//! One-shot TCP client for the index page.
//!
//! # Overview
//! Opens a single connection to `127.0.0.1` (port 34567 unless overridden),
//! writes a fixed `GET /index.html` request line, reads one chunk of at most
//! 4096 bytes, prints it and closes the socket. The reply is never parsed.
//!
//! # Design
//! - `Endpoint` is immutable and built once from the optional port argument.
//! - `exchange` is the host-does-IO half: it runs the write/read pair over any
//!   `Read + Write` stream, so it is testable without a socket.
//! - `run` owns the real `TcpStream` for its whole lifetime; the stream is
//!   closed on drop, which covers every error path as well.

pub mod client;
pub mod endpoint;
pub mod error;
pub mod http;

pub use client::{exchange, run, Exchange};
pub use endpoint::{Endpoint, DEFAULT_HOST, DEFAULT_PORT};
pub use error::ClientError;
pub use http::{ByteStr, RECV_BUFFER_LEN, REQUEST};
