//! Concurrency correctness checker for course HTTP servers.
//!
//! `pipecheck` holds a pool of live TCP connections to a server under test
//! and, over a number of trials, sends a randomized mix of well-formed and
//! malformed requests across a random subset of those connections. All
//! sends in a trial complete before any response is read, so the server is
//! forced to keep several requests in flight at once; each response must
//! then match its expected bytes exactly, within a two-tier timeout
//! policy. The first mismatch, short read, or transport error aborts the
//! run.
//!
//! The crate is a library plus a thin CLI binary. The pieces:
//!
//! - [`settings`] - immutable run configuration and the timeout policy
//! - [`corpus`] - fixed request corpus and the random draw behind
//!   [`corpus::RequestSource`]
//! - [`pool`] - up-front connection establishment and subset sampling
//! - [`reader`] - bounded assembly of a response of known length
//! - [`runner`] - the sequential trial loop
//! - [`error`] - structured, run-terminating error types

pub mod corpus;
pub mod error;
pub mod pool;
pub mod reader;
pub mod runner;
pub mod settings;

pub use corpus::{Exchange, FIXED_BAD_RESPONSE, RandomCorpus, RequestSource};
pub use error::{Error, Result};
pub use pool::Pool;
pub use runner::Runner;
pub use settings::{Overlay, Settings, TimeoutPolicy};
