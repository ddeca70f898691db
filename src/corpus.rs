//! Fixed request corpus and random draw.
//!
//! The corpus is two disjoint ordered sets of raw request byte strings.
//! A well-formed request's expected response is the request itself: the
//! server contract under test echoes valid requests byte-for-byte, so the
//! checker never models a real HTTP reply. A malformed request's expected
//! response is always [`FIXED_BAD_RESPONSE`].
//!
//! Draws go through the [`RequestSource`] trait so tests can substitute a
//! deterministic sequence for the uniform random draw used in production.

use rand::Rng;
use rand::rngs::ThreadRng;

/// Canonical response the server must produce for any malformed request.
pub const FIXED_BAD_RESPONSE: &[u8] = b"HTTP/1.1 400 Bad Request\r\n\r\n";

/// Requests the server must echo byte-for-byte.
pub const GOOD_REQUESTS: &[&[u8]] = &[
    b"GET /~prs/15-441-F15/ HTTP/1.1\r\nHost: www.cs.cmu.edu\r\nConnection: keep-alive\r\nAccept: text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8\r\nUser-Agent: Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/39.0.2171.99 Safari/537.36\r\nAccept-Encoding: gzip, deflate, sdch\r\nAccept-Language: en-US,en;q=0.8\r\n\r\n",
];

/// Requests the server must reject with [`FIXED_BAD_RESPONSE`].
pub const BAD_REQUESTS: &[&[u8]] = &[
    // Stray CR inside the request line
    b"GET /\r HTTP/1.1\r\nUser-Agent: 441UserAgent/1.0.0\r\n\r\n",
    // Bare LF terminating a header line
    b"GET / HTTP/1.1\nUser-Agent: 441UserAgent/1.0.0\r\n\r\n",
    // Truncated request line
    b"GET / HTTP/\r\n\r\n",
];

/// One request/response pair. Immutable; the expected length is known
/// before the request is sent, which is what bounds response assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exchange {
    /// Bytes written to the connection.
    pub request: &'static [u8],
    /// Bytes the server must answer with, in full, within the budget.
    pub expected: &'static [u8],
}

impl Exchange {
    /// True for well-formed requests, whose expected response is the echo.
    #[must_use]
    pub fn expects_echo(&self) -> bool {
        self.expected == self.request
    }
}

/// Source of request/response pairs, one per slot.
pub trait RequestSource {
    /// Draw the next pair. Draws are independent; no ordering is guaranteed
    /// across calls.
    fn pick(&mut self) -> Exchange;
}

/// Uniform random draw over the combined good and bad corpus.
#[derive(Debug)]
pub struct RandomCorpus<R: Rng> {
    rng: R,
}

impl RandomCorpus<ThreadRng> {
    /// Corpus backed by the thread-local generator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomCorpus<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomCorpus<R> {
    /// Corpus backed by a caller-supplied generator, e.g. a seeded `StdRng`
    /// for reproducible runs.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> RequestSource for RandomCorpus<R> {
    fn pick(&mut self) -> Exchange {
        let index = self.rng.gen_range(0..GOOD_REQUESTS.len() + BAD_REQUESTS.len());
        if index < GOOD_REQUESTS.len() {
            let request = GOOD_REQUESTS[index];
            Exchange {
                request,
                expected: request,
            }
        } else {
            Exchange {
                request: BAD_REQUESTS[index - GOOD_REQUESTS.len()],
                expected: FIXED_BAD_RESPONSE,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_corpora_are_disjoint_and_terminated() {
        for good in GOOD_REQUESTS {
            assert!(!BAD_REQUESTS.contains(good));
        }
        // Every corpus entry frames itself with a blank line, so a server
        // reading up to the terminator sees exactly one request.
        for request in GOOD_REQUESTS.iter().chain(BAD_REQUESTS) {
            assert!(request.ends_with(b"\r\n\r\n"));
        }
    }

    #[test]
    fn test_pick_covers_whole_corpus() {
        let mut source = RandomCorpus::with_rng(StdRng::seed_from_u64(7));
        let mut seen = vec![false; GOOD_REQUESTS.len() + BAD_REQUESTS.len()];

        for _ in 0..256 {
            let exchange = source.pick();
            let position = GOOD_REQUESTS
                .iter()
                .chain(BAD_REQUESTS)
                .position(|r| *r == exchange.request)
                .expect("draw outside corpus");
            seen[position] = true;
        }

        assert!(seen.iter().all(|s| *s), "256 draws missed a corpus entry");
    }

    #[test]
    fn test_good_picks_expect_echo() {
        let mut source = RandomCorpus::with_rng(StdRng::seed_from_u64(11));
        for _ in 0..128 {
            let exchange = source.pick();
            if GOOD_REQUESTS.contains(&exchange.request) {
                assert!(exchange.expects_echo());
                assert_eq!(exchange.expected, exchange.request);
            } else {
                assert!(!exchange.expects_echo());
                assert_eq!(exchange.expected, FIXED_BAD_RESPONSE);
            }
        }
    }

    #[test]
    fn test_seeded_draws_are_reproducible() {
        let mut a = RandomCorpus::with_rng(StdRng::seed_from_u64(42));
        let mut b = RandomCorpus::with_rng(StdRng::seed_from_u64(42));

        for _ in 0..32 {
            assert_eq!(a.pick(), b.pick());
        }
    }
}
