//! TLS Signal
//!
//! `ssl_certificate_valid`: 1 iff a verifying TLS handshake with the host
//! on port 443 completes and the peer presents a certificate.

use std::net::{SocketAddr, TcpStream};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use native_tls::TlsConnector;

use super::dns;
use super::host::parse_host;
use super::probe::ProbeError;

pub const TLS_PORT: u16 = 443;

/// Full handshake check; the whole check shares one `timeout` budget.
///
/// The handshake runs on a detached helper thread so a slow peer cannot
/// hold the caller past the budget.
pub fn check_certificate(url: &str, timeout: Duration) -> Result<(), ProbeError> {
    let host = parse_host(url)?;
    let deadline = Instant::now() + timeout;
    let (tx, rx) = mpsc::channel();

    thread::Builder::new()
        .name("tls-probe".to_string())
        .spawn(move || {
            let _ = tx.send(handshake(&host, deadline, timeout));
        })
        .map_err(|e| ProbeError::Tls(format!("cannot spawn handshake: {}", e)))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(ProbeError::Timeout { stage: "tls", after: timeout }),
        Err(RecvTimeoutError::Disconnected) => {
            Err(ProbeError::Tls("handshake thread exited".to_string()))
        }
    }
}

fn handshake(host: &str, deadline: Instant, budget: Duration) -> Result<(), ProbeError> {
    let addrs = dns::resolve(host, TLS_PORT, remaining(deadline, budget)?)?;
    let stream = connect_any(&addrs, deadline, budget)?;

    let left = remaining(deadline, budget)?;
    stream.set_read_timeout(Some(left))?;
    stream.set_write_timeout(Some(left))?;

    let connector = TlsConnector::new().map_err(|e| ProbeError::Tls(e.to_string()))?;
    let tls = connector
        .connect(host, stream)
        .map_err(|e| ProbeError::Tls(e.to_string()))?;

    match tls.peer_certificate() {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(ProbeError::Tls("peer sent no certificate".to_string())),
        Err(e) => Err(ProbeError::Tls(e.to_string())),
    }
}

/// Time left before `deadline`; zero is a timeout
fn remaining(deadline: Instant, budget: Duration) -> Result<Duration, ProbeError> {
    let left = deadline.saturating_duration_since(Instant::now());
    if left.is_zero() {
        Err(ProbeError::Timeout { stage: "tls", after: budget })
    } else {
        Ok(left)
    }
}

/// Signal value for `ssl_certificate_valid` (never fails)
pub fn ssl_certificate_valid(url: &str, timeout: Duration) -> f32 {
    match check_certificate(url, timeout) {
        Ok(()) => 1.0,
        Err(e) => {
            log::debug!("ssl_certificate_valid({}) -> 0: {}", url, e);
            0.0
        }
    }
}

/// Try each resolved address in turn, keep the first that accepts.
/// All attempts together stay within `deadline`.
fn connect_any(addrs: &[SocketAddr], deadline: Instant, budget: Duration) -> Result<TcpStream, ProbeError> {
    let mut last_err = None;

    for addr in addrs {
        match TcpStream::connect_timeout(addr, remaining(deadline, budget)?) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }

    Err(match last_err {
        Some(e) => ProbeError::Connect(e),
        None => ProbeError::Resolve("no addresses to connect to".to_string()),
    })
}
