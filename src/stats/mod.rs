//! Network throughput and process resource sampling (DSTAT)
//!
//! A [`StatSampler`] turns consecutive cumulative counter [`Sample`]s into
//! per-second [`Rate`]s. The very first sample only seeds the sampler; a rate
//! needs two points in time. [`StatMonitor`] drives the sampler on a fixed
//! interval and prints a report block per tick.

pub mod platform;

pub use platform::{
    hostname, CounterSource, MemorySource, ProcessMemory, StatSources, SysinfoCounters,
    SystemStatSources,
};

use crate::{
    error::Result,
    logging::Logger,
    output::{format_bytes, format_count, Presenter},
};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::time::Duration;

const MIB: u64 = 1024 * 1024;

/// Cumulative interface counters at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub packets_sent: u64,
    pub packets_received: u64,
}

/// Per-second throughput between two samples
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    pub bytes_sent: f64,
    pub bytes_received: f64,
    pub packets_sent: f64,
    pub packets_received: f64,
}

impl Rate {
    /// Deltas from `old` to `new` divided by `interval`.
    ///
    /// A counter that went backwards (wrap or interface reset) contributes
    /// zero. A zero interval yields the raw deltas.
    pub fn between(old: &Sample, new: &Sample, interval: Duration) -> Self {
        let secs = interval.as_secs_f64();
        let per_second = |before: u64, after: u64| {
            let delta = after.saturating_sub(before) as f64;
            if secs > 0.0 { delta / secs } else { delta }
        };

        Self {
            bytes_sent: per_second(old.bytes_sent, new.bytes_sent),
            bytes_received: per_second(old.bytes_received, new.bytes_received),
            packets_sent: per_second(old.packets_sent, new.packets_sent),
            packets_received: per_second(old.packets_received, new.packets_received),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.bytes_sent == 0.0
            && self.bytes_received == 0.0
            && self.packets_sent == 0.0
            && self.packets_received == 0.0
    }
}

/// Rate engine holding only the most recent sample
#[derive(Debug, Clone)]
pub struct StatSampler {
    previous: Option<Sample>,
    interval: Duration,
}

impl StatSampler {
    pub fn new(interval: Duration) -> Self {
        Self { previous: None, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_seeded(&self) -> bool {
        self.previous.is_some()
    }

    /// Record a sample; returns the rate against the previous one, or `None`
    /// when this sample only seeds the sampler.
    pub fn observe(&mut self, sample: Sample) -> Option<Rate> {
        let rate = self.previous
            .as_ref()
            .map(|old| Rate::between(old, &sample, self.interval));
        self.previous = Some(sample);
        rate
    }
}

/// Process memory footprint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUsage {
    /// Memory currently backed by physical pages
    pub resident_bytes: u64,
    /// Total address space reserved by the process
    pub reserved_bytes: u64,
}

impl MemoryUsage {
    pub fn percent(&self) -> f64 {
        if self.reserved_bytes == 0 {
            0.0
        } else {
            self.resident_bytes as f64 / self.reserved_bytes as f64 * 100.0
        }
    }
}

/// Live async runtime figures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeLoad {
    pub alive_tasks: usize,
    pub workers: usize,
}

impl RuntimeLoad {
    /// Read the current tokio runtime, zeros outside a runtime
    pub fn current() -> Self {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let metrics = handle.metrics();
                Self {
                    alive_tasks: metrics.num_alive_tasks(),
                    workers: metrics.num_workers(),
                }
            }
            Err(_) => Self::default(),
        }
    }
}

/// One printed DSTAT block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatReport {
    pub rate: Rate,
    pub memory: MemoryUsage,
    pub runtime: RuntimeLoad,
}

impl StatReport {
    pub fn render(&self, presenter: &Presenter) -> Vec<String> {
        vec![
            String::new(),
            presenter.header("--- Network & System Statistics ---"),
            format!("Bytes Sent:        {}/s", format_bytes(self.rate.bytes_sent)),
            format!("Bytes Received:    {}/s", format_bytes(self.rate.bytes_received)),
            format!("Packets Sent:      {}/s", format_count(self.rate.packets_sent)),
            format!("Packets Received:  {}/s", format_count(self.rate.packets_received)),
            format!(
                "Memory Usage:      {} MB / {} MB ({:.2}%)",
                self.memory.resident_bytes / MIB,
                self.memory.reserved_bytes / MIB,
                self.memory.percent()
            ),
            format!("Active Tasks:      {}", self.runtime.alive_tasks),
            format!("Runtime Workers:   {}", self.runtime.workers),
            presenter.header("-----------------------------------"),
        ]
    }
}

/// Drives a sampler at a fixed interval and prints reports
pub struct StatMonitor {
    sampler: StatSampler,
    counters: Box<dyn CounterSource>,
    memory: Box<dyn MemorySource>,
    logger: Logger,
}

impl StatMonitor {
    pub fn new(
        interval: Duration,
        counters: Box<dyn CounterSource>,
        memory: Box<dyn MemorySource>,
        logger: Logger,
    ) -> Self {
        Self {
            sampler: StatSampler::new(interval),
            counters,
            memory,
            logger,
        }
    }

    /// Build a monitor from a source factory
    pub fn from_sources(interval: Duration, sources: &dyn StatSources, logger: Logger) -> Self {
        Self::new(interval, sources.counters(), sources.memory(), logger)
    }

    async fn read_counters(&mut self) -> Sample {
        match self.counters.read() {
            Ok(sample) => sample,
            Err(e) => {
                crate::log_warn!(self.logger, "Counter source unavailable, reporting zeros: {}", e);
                Sample::default()
            }
        }
    }

    async fn read_memory(&mut self) -> MemoryUsage {
        match self.memory.read() {
            Ok(usage) => usage,
            Err(e) => {
                crate::log_warn!(self.logger, "Process memory unavailable: {}", e);
                MemoryUsage::default()
            }
        }
    }

    /// Take one sample; a report is produced once the sampler is seeded
    pub async fn tick(&mut self) -> Option<StatReport> {
        let sample = self.read_counters().await;
        let rate = self.sampler.observe(sample)?;

        Some(StatReport {
            rate,
            memory: self.read_memory().await,
            runtime: RuntimeLoad::current(),
        })
    }

    /// Seed, wait one interval, then report every interval.
    ///
    /// Runs until the process is terminated when `max_reports` is `None`.
    pub async fn run<W: Write>(&mut self, out: &mut W, presenter: &Presenter, max_reports: Option<u64>) -> Result<()> {
        let interval = self.sampler.interval();

        if !self.sampler.is_seeded() {
            self.tick().await;
            tokio::time::sleep(interval).await;
        }

        let mut reported = 0u64;
        loop {
            if let Some(report) = self.tick().await {
                for line in report.render(presenter) {
                    writeln!(out, "{}", line)?;
                }
                out.flush()?;
                reported += 1;
            }

            if max_reports.is_some_and(|max| reported >= max) {
                return Ok(());
            }

            tokio::time::sleep(interval).await;
        }
    }
}
