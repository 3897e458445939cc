//! DNS Signal
//!
//! `dns_lookup`: 1 iff the URL's host resolves to at least one address.

use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use super::host::parse_host;
use super::probe::ProbeError;

/// Resolve `host:port` with an explicit deadline.
///
/// The system resolver has no timeout knob, so the lookup runs on a
/// detached helper thread; on timeout the thread is abandoned.
pub fn resolve(host: &str, port: u16, timeout: Duration) -> Result<Vec<SocketAddr>, ProbeError> {
    let (tx, rx) = mpsc::channel();
    let target = host.to_string();

    thread::Builder::new()
        .name("dns-probe".to_string())
        .spawn(move || {
            let result = (target.as_str(), port)
                .to_socket_addrs()
                .map(|addrs| addrs.collect::<Vec<_>>());
            let _ = tx.send(result);
        })
        .map_err(|e| ProbeError::Resolve(format!("cannot spawn resolver: {}", e)))?;

    match rx.recv_timeout(timeout) {
        Ok(Ok(addrs)) if !addrs.is_empty() => Ok(addrs),
        Ok(Ok(_)) => Err(ProbeError::Resolve(format!("{} has no addresses", host))),
        Ok(Err(e)) => Err(ProbeError::Resolve(e.to_string())),
        Err(RecvTimeoutError::Timeout) => Err(ProbeError::Timeout { stage: "dns", after: timeout }),
        Err(RecvTimeoutError::Disconnected) => {
            Err(ProbeError::Resolve("resolver thread exited".to_string()))
        }
    }
}

/// Signal value for `dns_lookup` (never fails)
pub fn dns_lookup(url: &str, timeout: Duration) -> f32 {
    let outcome = parse_host(url).and_then(|host| resolve(&host, 0, timeout));

    match outcome {
        Ok(_) => 1.0,
        Err(e) => {
            log::debug!("dns_lookup({}) -> 0: {}", url, e);
            0.0
        }
    }
}
