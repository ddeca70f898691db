//! Trial loop.
//!
//! Each trial draws a random subset of connections, writes one randomly
//! drawn request to every connection in the subset, and only then starts
//! reading responses back. Batching all sends before the first read is the
//! point of the exercise: the server must hold several in-flight requests
//! on distinct connections without corrupting or interleaving the
//! responses.
//!
//! The first failed validation aborts the whole run. There is no retry, no
//! per-trial isolation, and no resume; the checker is a binary pass/fail
//! oracle.

use rand::Rng;
use std::io::Write;
use tracing::{debug, info};

use crate::corpus::{Exchange, RequestSource};
use crate::error::{Error, Result};
use crate::pool::Pool;
use crate::reader::read_until_len;
use crate::settings::Settings;

/// Drives the configured number of trials over a pool of connections.
#[derive(Debug)]
pub struct Runner<S> {
    settings: Settings,
    pool: Pool,
    source: S,
}

impl<S: RequestSource> Runner<S> {
    pub fn new(settings: Settings, pool: Pool, source: S) -> Self {
        Self {
            settings,
            pool,
            source,
        }
    }

    /// Run all trials sequentially. Trial `i + 1` does not start until
    /// trial `i` validated completely.
    ///
    /// # Errors
    ///
    /// The first transport error or response mismatch aborts the run; the
    /// pool is torn down on every exit path.
    pub fn run(&mut self) -> Result<()> {
        let mut rng = rand::thread_rng();

        for trial in 0..self.settings.trials {
            self.run_trial(trial, &mut rng)?;
        }

        info!(trials = self.settings.trials, "all trials passed");
        Ok(())
    }

    fn run_trial<R: Rng>(&mut self, trial: u32, rng: &mut R) -> Result<()> {
        let subset = self.pool.sample(rng, self.settings.slots as usize);
        debug!(trial, connections = ?subset, "trial start");

        // Send phase: every slot's request goes out before any read.
        let mut pending: Vec<(usize, Exchange)> = Vec::with_capacity(subset.len());
        for (slot, &conn) in subset.iter().enumerate() {
            let exchange = self.source.pick();

            let mut stream = self.pool.stream(conn);
            stream
                .write_all(exchange.request)
                .map_err(|e| Error::transport(format!("send on connection {conn}"), e))?;

            debug!(
                trial,
                slot,
                conn,
                bytes = exchange.request.len(),
                well_formed = exchange.expects_echo(),
                "request sent"
            );
            pending.push((conn, exchange));
        }

        // Read phase: assemble and validate each slot's response in order.
        for (slot, (conn, exchange)) in pending.into_iter().enumerate() {
            let received = read_until_len(
                self.pool.stream(conn),
                exchange.expected.len(),
                &self.settings.timeout,
            )
            .map_err(|e| Error::transport(format!("receive on connection {conn}"), e))?;

            if received != exchange.expected {
                return Err(Error::Mismatch {
                    trial,
                    slot,
                    expected: exchange.expected.to_vec(),
                    received,
                });
            }

            debug!(trial, slot, conn, bytes = received.len(), "response validated");
        }

        info!(trial, slots = self.settings.slots, "trial passed");
        Ok(())
    }
}
