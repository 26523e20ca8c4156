//! TCP-connect latency probing (PING)
//!
//! Raw ICMP needs privileges, so reachability and round-trip time are
//! measured by timing TCP connection attempts against a fixed port. A probe
//! always makes exactly [`PROBE_ATTEMPTS`] attempts.

use crate::{
    defaults::{PROBE_ATTEMPTS, PROBE_INTERVAL, PROBE_PORT, PROBE_TIMEOUT},
    error::{AppError, Result},
    logging::NetworkLogger,
    types::HostStatus,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};
use tokio::net::TcpStream;

/// Opens (and immediately drops) a connection to measure reachability
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, addr: SocketAddr, timeout: Duration) -> Result<()>;
}

/// Plain TCP connector bounded by a per-attempt timeout
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, addr: SocketAddr, timeout: Duration) -> Result<()> {
        match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                Ok(())
            }
            Ok(Err(e)) => Err(AppError::network(format!("connect to {} failed: {}", addr, e))),
            Err(_) => Err(AppError::timeout(format!("connect to {} timed out after {:?}", addr, timeout))),
        }
    }
}

/// Timing knobs for a probe; the attempt count is fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    pub port: u16,
    pub timeout: Duration,
    /// Pause between attempts (not after the last)
    pub interval: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            port: PROBE_PORT,
            timeout: PROBE_TIMEOUT,
            interval: PROBE_INTERVAL,
        }
    }
}

/// Outcome of one connection attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Reply { rtt: Duration },
    Timeout,
}

/// Aggregate of a complete probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub target: IpAddr,
    pub attempts: u32,
    pub successes: u32,
    pub total_rtt: Duration,
    pub per_attempt_timeout: Duration,
}

impl ProbeResult {
    fn new(target: IpAddr, per_attempt_timeout: Duration) -> Self {
        Self {
            target,
            attempts: PROBE_ATTEMPTS,
            successes: 0,
            total_rtt: Duration::ZERO,
            per_attempt_timeout,
        }
    }

    fn record(&mut self, outcome: AttemptOutcome) {
        if let AttemptOutcome::Reply { rtt } = outcome {
            self.successes += 1;
            self.total_rtt += rtt;
        }
    }

    pub fn lost(&self) -> u32 {
        self.attempts - self.successes
    }

    /// Mean RTT over successful attempts only; zero when none succeeded
    pub fn average_rtt(&self) -> Duration {
        if self.successes == 0 {
            Duration::ZERO
        } else {
            self.total_rtt / self.successes
        }
    }

    pub fn status(&self) -> HostStatus {
        if self.successes > 0 {
            HostStatus::Online
        } else {
            HostStatus::Offline
        }
    }

    /// Summary block printed after the per-attempt lines
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            String::new(),
            "Ping Statistics:".to_string(),
            format!(
                "Packets: Sent = {}, Received = {}, Lost = {}",
                self.attempts,
                self.successes,
                self.lost()
            ),
            format!("Average RTT: {}ms", format_millis(self.average_rtt())),
            format!("Status: {}", self.status()),
        ]
    }
}

/// Milliseconds with two decimals from microsecond precision
pub fn format_millis(duration: Duration) -> String {
    format!("{:.2}", duration.as_micros() as f64 / 1000.0)
}

/// Line printed for one attempt against `target`
pub fn attempt_line(target: IpAddr, outcome: &AttemptOutcome) -> String {
    match outcome {
        AttemptOutcome::Reply { rtt } => format!("Reply from {}: time={}ms", target, format_millis(*rtt)),
        AttemptOutcome::Timeout => "Request timeout".to_string(),
    }
}

/// Repeats timed connection attempts and aggregates them
pub struct LatencyProber<C: Connector + ?Sized> {
    connector: std::sync::Arc<C>,
    settings: ProbeSettings,
    logger: NetworkLogger,
}

impl<C: Connector + ?Sized> LatencyProber<C> {
    pub fn new(connector: std::sync::Arc<C>, settings: ProbeSettings, logger: NetworkLogger) -> Self {
        Self { connector, settings, logger }
    }

    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    /// Probe `target`, reporting each attempt to `on_attempt` as it completes
    pub async fn probe<F>(&self, target: IpAddr, mut on_attempt: F) -> Result<ProbeResult>
    where
        F: FnMut(&AttemptOutcome) -> Result<()>,
    {
        let addr = SocketAddr::new(target, self.settings.port);
        let mut result = ProbeResult::new(target, self.settings.timeout);

        for attempt in 0..PROBE_ATTEMPTS {
            let start = Instant::now();
            let connected = self.connector.connect(addr, self.settings.timeout).await;
            let rtt = start.elapsed();

            let outcome = match connected {
                Ok(()) => {
                    self.logger.log_connection(&addr.to_string(), true, None).await;
                    AttemptOutcome::Reply { rtt }
                }
                Err(e) => {
                    self.logger.log_connection(&addr.to_string(), false, Some(e.detail())).await;
                    AttemptOutcome::Timeout
                }
            };

            result.record(outcome);
            on_attempt(&outcome)?;

            if attempt + 1 < PROBE_ATTEMPTS && !self.settings.interval.is_zero() {
                tokio::time::sleep(self.settings.interval).await;
            }
        }

        Ok(result)
    }
}
