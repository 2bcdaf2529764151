//! Local and public address lookup, run once when the engine starts.

use std::net::{IpAddr, SocketAddr, UdpSocket};
use std::time::Duration;

use crate::core::system_monitor::snapshot::NetworkIdentity;
use crate::error::{Result, SysPulseError};

pub trait IdentityProbe: Send {
    fn resolve(&self) -> Result<NetworkIdentity>;
}

/// Reads the local address from the routing table and asks an IP-echo
/// service for the public one. Neither step touches DNS for the host name,
/// so the lookup is bounded by `timeout`.
pub struct HttpIdentityProbe {
    url: String,
    route_target: SocketAddr,
    timeout: Duration,
}

impl HttpIdentityProbe {
    pub fn new(url: String, route_target: SocketAddr, timeout: Duration) -> Self {
        Self {
            url,
            route_target,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn public_address(&self) -> Result<String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.timeout)
            .build()
            .map_err(|e| SysPulseError::network(format!("HTTP client: {}", e)))?;

        let body = client
            .get(&self.url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|e| SysPulseError::network(format!("{}: {}", self.url, e)))?;

        parse_ip_echo(&body)
    }
}

impl IdentityProbe for HttpIdentityProbe {
    fn resolve(&self) -> Result<NetworkIdentity> {
        Ok(NetworkIdentity {
            local_address: local_address(self.route_target)?,
            public_address: self.public_address()?,
        })
    }
}

/// Address of the interface the host would use to reach `target`.
///
/// Connecting a UDP socket only selects a route; no packet is sent.
pub fn local_address(target: SocketAddr) -> Result<String> {
    let bind_addr = if target.is_ipv4() {
        "0.0.0.0:0"
    } else {
        "[::]:0"
    };

    let socket = UdpSocket::bind(bind_addr)
        .map_err(|e| SysPulseError::network(format!("bind {}: {}", bind_addr, e)))?;
    socket
        .connect(target)
        .map_err(|e| SysPulseError::network(format!("no route to {}: {}", target, e)))?;

    let local = socket
        .local_addr()
        .map_err(|e| SysPulseError::network(format!("local address: {}", e)))?;

    if local.ip().is_unspecified() {
        return Err(SysPulseError::network(format!("no interface routes to {}", target)));
    }
    Ok(local.ip().to_string())
}

/// Accepts an IP-echo response body only if it is a bare address
pub fn parse_ip_echo(body: &str) -> Result<String> {
    let trimmed = body.trim();
    trimmed
        .parse::<IpAddr>()
        .map(|ip| ip.to_string())
        .map_err(|_| SysPulseError::network(format!("unexpected IP echo response: {:.40}", trimmed)))
}

/// Fixed identity, for offline use and tests
pub struct StaticIdentity {
    identity: NetworkIdentity,
}

impl StaticIdentity {
    pub fn new(identity: NetworkIdentity) -> Self {
        Self { identity }
    }
}

impl IdentityProbe for StaticIdentity {
    fn resolve(&self) -> Result<NetworkIdentity> {
        Ok(self.identity.clone())
    }
}
