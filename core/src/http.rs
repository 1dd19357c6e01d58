//! Wire constants and byte rendering.
//!
//! The request only resembles HTTP: there is no `Host` header and the reply
//! is treated as opaque bytes.

use std::fmt;

/// The only bytes ever written to the connection.
pub const REQUEST: &[u8] = b"GET /index.html HTTP/1.1\r\n\r\n";

/// Upper bound for the single receive call.
pub const RECV_BUFFER_LEN: usize = 4096;

/// Displays raw bytes the way Python's `repr(bytes)` does: `b'...'`, or
/// `b"..."` when the bytes hold a single quote but no double quote.
pub struct ByteStr<'a>(pub &'a [u8]);

impl fmt::Display for ByteStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quote = if self.0.contains(&b'\'') && !self.0.contains(&b'"') {
            b'"'
        } else {
            b'\''
        };
        write!(f, "b{}", quote as char)?;
        for &byte in self.0 {
            match byte {
                b'\\' => f.write_str("\\\\")?,
                b'\t' => f.write_str("\\t")?,
                b'\n' => f.write_str("\\n")?,
                b'\r' => f.write_str("\\r")?,
                b if b == quote => write!(f, "\\{}", quote as char)?,
                0x20..=0x7e => write!(f, "{}", byte as char)?,
                _ => write!(f, "\\x{byte:02x}")?,
            }
        }
        write!(f, "{}", quote as char)
    }
}
