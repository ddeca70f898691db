//! Timeout-bounded response assembly.
//!
//! Responses have no length prefix and no framing aligned with read
//! boundaries, but their exact length is known before the request is sent.
//! [`read_until_len`] accumulates partial reads until that length is
//! reached, bounded two ways: a short per-read timeout keeps each call
//! live, and a cumulative wall-clock budget decides when a slow response
//! stops being "in flight" and becomes a failure. On budget expiry the
//! accumulated prefix is returned as-is; the caller's equality check turns
//! the short read into a mismatch.

use std::io::{self, ErrorKind, Read};
use std::net::TcpStream;
use std::time::Instant;

use crate::settings::TimeoutPolicy;

/// Read up to `want` bytes from `stream` under `policy`.
///
/// Never reads past `want`: with connections reused across trials, bytes
/// beyond the current response belong to a later exchange and must stay in
/// the socket buffer. EOF ends assembly early with whatever accumulated.
///
/// The stream's configured read timeout is restored before returning.
///
/// # Errors
///
/// Returns the underlying I/O error for anything other than a read timing
/// out; timed-out reads just continue the loop until the budget expires.
pub fn read_until_len(
    stream: &TcpStream,
    want: usize,
    policy: &TimeoutPolicy,
) -> io::Result<Vec<u8>> {
    let previous = stream.read_timeout()?;
    stream.set_read_timeout(Some(policy.per_read))?;

    let assembled = assemble(stream, want, policy);

    stream.set_read_timeout(previous)?;
    assembled
}

fn assemble(mut stream: &TcpStream, want: usize, policy: &TimeoutPolicy) -> io::Result<Vec<u8>> {
    let mut accumulated = Vec::with_capacity(want);
    let mut chunk = vec![0u8; want.max(1)];
    let start = Instant::now();

    while accumulated.len() < want {
        match stream.read(&mut chunk[..want - accumulated.len()]) {
            // Peer closed; a short response fails the equality check upstream.
            Ok(0) => break,
            Ok(n) => accumulated.extend_from_slice(&chunk[..n]),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }

        if start.elapsed() > policy.budget {
            break;
        }
    }

    Ok(accumulated)
}
