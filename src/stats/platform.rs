//! Platform counter and process memory sources backed by `sysinfo`

use super::{MemoryUsage, Sample};
use crate::error::{AppError, Result};
use sysinfo::{Networks, Pid, ProcessesToUpdate, System};

/// Source of cumulative network counters
pub trait CounterSource: Send {
    /// Read the current cumulative totals across all interfaces
    fn read(&mut self) -> Result<Sample>;
}

/// Source of the current process memory footprint
pub trait MemorySource: Send {
    fn read(&mut self) -> Result<MemoryUsage>;
}

/// Creates fresh sources for each DSTAT invocation
pub trait StatSources: Send + Sync {
    fn counters(&self) -> Box<dyn CounterSource>;
    fn memory(&self) -> Box<dyn MemorySource>;
}

/// Interface totals summed over every interface `sysinfo` reports
pub struct SysinfoCounters {
    networks: Networks,
}

impl SysinfoCounters {
    pub fn new() -> Self {
        Self {
            networks: Networks::new_with_refreshed_list(),
        }
    }
}

impl Default for SysinfoCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterSource for SysinfoCounters {
    fn read(&mut self) -> Result<Sample> {
        self.networks.refresh(true);

        let list = self.networks.list();
        if list.is_empty() {
            return Err(AppError::io("No network interfaces reported by the platform"));
        }

        Ok(list.values().fold(Sample::default(), |acc, data| Sample {
            bytes_sent: acc.bytes_sent.saturating_add(data.total_transmitted()),
            bytes_received: acc.bytes_received.saturating_add(data.total_received()),
            packets_sent: acc.packets_sent.saturating_add(data.total_packets_transmitted()),
            packets_received: acc.packets_received.saturating_add(data.total_packets_received()),
        }))
    }
}

/// Resident and virtual memory of this process
pub struct ProcessMemory {
    system: System,
    pid: Option<Pid>,
}

impl ProcessMemory {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            pid: sysinfo::get_current_pid().ok(),
        }
    }
}

impl Default for ProcessMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySource for ProcessMemory {
    fn read(&mut self) -> Result<MemoryUsage> {
        let pid = self.pid
            .ok_or_else(|| AppError::internal("Current process ID is unavailable on this platform"))?;

        self.system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        let process = self.system.process(pid)
            .ok_or_else(|| AppError::internal(format!("Process {} not found", pid)))?;

        Ok(MemoryUsage {
            resident_bytes: process.memory(),
            reserved_bytes: process.virtual_memory(),
        })
    }
}

/// Production sources: `sysinfo` network totals and process memory
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemStatSources;

impl StatSources for SystemStatSources {
    fn counters(&self) -> Box<dyn CounterSource> {
        Box::new(SysinfoCounters::new())
    }

    fn memory(&self) -> Box<dyn MemorySource> {
        Box::new(ProcessMemory::new())
    }
}

/// Local hostname used to build prompts; falls back to `localhost`
pub fn hostname() -> String {
    System::host_name()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostname_is_never_empty() {
        assert!(!hostname().is_empty());
    }

    #[test]
    fn test_process_memory_reads_own_process() {
        let mut memory = ProcessMemory::new();
        if let Ok(usage) = memory.read() {
            assert!(usage.resident_bytes > 0);
            assert!(usage.percent() >= 0.0);
        }
    }

    #[test]
    fn test_counters_are_monotonic_between_reads() {
        let mut counters = SysinfoCounters::new();
        if let (Ok(first), Ok(second)) = (counters.read(), counters.read()) {
            assert!(second.bytes_received >= first.bytes_received);
            assert!(second.packets_sent >= first.packets_sent);
        }
    }
}
