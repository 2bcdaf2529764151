//! Round-trip latency measured as a TCP connect time.

use std::net::{SocketAddr, TcpStream};
use std::time::{Duration, Instant};

use super::{degrade, Diagnostics, SensorKind};
use crate::core::system_monitor::snapshot::Reading;
use crate::error::{Result, SysPulseError};

pub trait LatencyProbe: Send {
    fn measure(&mut self) -> Result<Duration>;
}

/// Times a TCP handshake to a fixed host, e.g. a public DNS resolver on port 53
pub struct TcpLatencyProbe {
    target: SocketAddr,
    timeout: Duration,
}

impl TcpLatencyProbe {
    pub fn new(target: SocketAddr, timeout: Duration) -> Self {
        Self { target, timeout }
    }
}

impl LatencyProbe for TcpLatencyProbe {
    fn measure(&mut self) -> Result<Duration> {
        let start = Instant::now();
        let _stream = TcpStream::connect_timeout(&self.target, self.timeout)
            .map_err(|e| SysPulseError::network(format!("connect to {}: {}", self.target, e)))?;
        Ok(start.elapsed())
    }
}

/// Measures on cycles 0, N, 2N, ... and holds the last value in between
pub struct LatencyTracker {
    probe: Option<Box<dyn LatencyProbe>>,
    stride: u64,
    cycle: u64,
    current: Reading<u32>,
}

impl LatencyTracker {
    pub fn new(probe: Option<Box<dyn LatencyProbe>>, stride: u64) -> Self {
        Self {
            probe,
            stride: stride.max(1),
            cycle: 0,
            current: Reading::Unavailable,
        }
    }

    /// Advances one cycle and returns the latency in whole milliseconds
    pub fn tick(&mut self, diagnostics: &Diagnostics) -> Reading<u32> {
        if self.cycle % self.stride == 0 {
            self.current = match self.probe.as_mut() {
                Some(probe) => degrade(
                    diagnostics,
                    SensorKind::Latency,
                    probe
                        .measure()
                        .map(|elapsed| elapsed.as_millis().min(u32::MAX as u128) as u32),
                ),
                None => Reading::Unavailable,
            };
        }
        self.cycle += 1;
        self.current
    }
}
