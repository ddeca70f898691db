//! Shared test servers.
//!
//! Each server binds an ephemeral port and handles every connection in its
//! own thread, reading blank-line-terminated requests and answering
//! according to its kind. The accept loop lives for the duration of the
//! test process.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use pipecheck::corpus::{FIXED_BAD_RESPONSE, GOOD_REQUESTS};

/// Behavior of a test server toward every request it receives.
#[derive(Debug, Clone, Copy)]
pub enum ServerKind {
    /// Echoes well-formed requests, answers the canonical 400 otherwise.
    Compliant,
    /// Responds with the right length but one corrupted byte.
    Corrupting,
    /// Reads requests and never responds.
    Stalling,
    /// Responds correctly except the last byte arrives far too late.
    SlowDrip,
}

pub struct TestServer {
    pub port: u16,
}

impl TestServer {
    pub fn spawn(kind: ServerKind) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let port = listener.local_addr().unwrap().port();

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                thread::spawn(move || serve_connection(stream, kind));
            }
        });

        Self { port }
    }
}

fn serve_connection(mut stream: TcpStream, kind: ServerKind) {
    let mut buffer: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        while let Some(end) = terminator(&buffer) {
            let frame: Vec<u8> = buffer.drain(..end + 4).collect();
            if !respond(&mut stream, &frame, kind) {
                return;
            }
        }

        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => buffer.extend_from_slice(&chunk[..n]),
        }
    }
}

fn terminator(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|w| w == b"\r\n\r\n")
}

/// What a compliant server would answer.
fn contract_response(frame: &[u8]) -> Vec<u8> {
    if GOOD_REQUESTS.iter().any(|r| *r == frame) {
        frame.to_vec()
    } else {
        FIXED_BAD_RESPONSE.to_vec()
    }
}

fn respond(stream: &mut TcpStream, frame: &[u8], kind: ServerKind) -> bool {
    match kind {
        ServerKind::Compliant => stream.write_all(&contract_response(frame)).is_ok(),
        ServerKind::Corrupting => {
            let mut response = contract_response(frame);
            // Flip the case of the first byte: same length, wrong bytes.
            response[0] ^= 0x20;
            stream.write_all(&response).is_ok()
        },
        ServerKind::Stalling => true,
        ServerKind::SlowDrip => {
            let response = contract_response(frame);
            let (head, tail) = response.split_at(response.len() - 1);
            if stream.write_all(head).is_err() || stream.flush().is_err() {
                return false;
            }
            thread::sleep(Duration::from_millis(300));
            stream.write_all(tail).is_ok()
        },
    }
}
