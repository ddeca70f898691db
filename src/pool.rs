//! Connection pool for the server under test.
//!
//! All connections are established up front and reused across trials; a
//! connection that cannot be established fails the whole run rather than
//! operating on a partial pool. There is no reconnection: a connection
//! broken mid-run surfaces as a transport error on its next use.

use rand::Rng;
use std::net::{Shutdown, TcpStream};
use tracing::debug;

use crate::error::{Error, Result};

/// Fixed set of live TCP connections, addressed by index.
#[derive(Debug)]
pub struct Pool {
    streams: Vec<TcpStream>,
}

impl Pool {
    /// Open `count` connections to `host:port`.
    ///
    /// Name resolution happens per connect call, matching the one-shot
    /// lookup of the address the checker is pointed at.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] on the first connection that cannot be
    /// established; no partial pool is ever returned.
    pub fn open(host: &str, port: u16, count: u32) -> Result<Self> {
        let addr = format!("{host}:{port}");
        let mut streams = Vec::with_capacity(count as usize);

        for index in 0..count {
            let stream =
                TcpStream::connect(&addr).map_err(|e| Error::connect(addr.clone(), e))?;
            debug!(index, peer = %addr, "connection established");
            streams.push(stream);
        }

        Ok(Self { streams })
    }

    /// Number of connections held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Draw `k` distinct connection indices uniformly without replacement.
    ///
    /// Connections stay in the pool; the same connection can be drawn again
    /// in later trials. Settings validation guarantees `k <= len()` before
    /// a pool exists, so an oversized draw is a programming error.
    ///
    /// # Panics
    ///
    /// Panics if `k > self.len()`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, k: usize) -> Vec<usize> {
        rand::seq::index::sample(rng, self.streams.len(), k).into_vec()
    }

    /// Borrow the connection at `index`. `&TcpStream` implements both
    /// `Read` and `Write`, so callers can send and receive through the
    /// shared borrow while the pool retains ownership.
    #[must_use]
    pub fn stream(&self, index: usize) -> &TcpStream {
        &self.streams[index]
    }
}

impl Drop for Pool {
    /// Release every connection, however the run ended. A run aborted by a
    /// validation mismatch unwinds through here like any other exit path.
    fn drop(&mut self) {
        debug!(connections = self.streams.len(), "closing pool");
        for stream in &self.streams {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }
}
