//! Host resource sampling for agents.
//!
//! Wraps `sysinfo` so agents can take a portable CPU / memory / disk reading.
//! Sampling blocks for [`sysinfo::MINIMUM_CPU_UPDATE_INTERVAL`] (CPU usage is a
//! delta between two refreshes), so async callers should go through
//! `spawn_blocking`.

use serde::Serialize;
use sysinfo::{Disks, System};

#[derive(Debug, Serialize, Clone)]
pub struct DiskUsage {
    pub mount_point: String,
    pub total: u64,
    pub available: u64,
}

impl DiskUsage {
    pub fn used_pct(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let used = self.total.saturating_sub(self.available) as f64;
        used / self.total as f64 * 100.0
    }
}

/// One reading of the host, all values in percent (0..=100).
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct HostSample {
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
}

/// Picks the disk that represents "the" disk of the host.
///
/// The root mount wins; otherwise the largest volume. Several sysinfo entries
/// can describe the same device, so only the mount point matters here.
pub fn primary_disk(disks: &[DiskUsage]) -> Option<&DiskUsage> {
    disks
        .iter()
        .find(|d| d.mount_point == "/")
        .or_else(|| disks.iter().max_by_key(|d| d.total))
}

/// Samples current CPU, memory and primary-disk utilisation.
pub fn sample_host() -> HostSample {
    let mut sys = System::new();

    sys.refresh_cpu_usage();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu_usage();
    sys.refresh_memory();

    let memory_usage = if sys.total_memory() > 0 {
        sys.used_memory() as f64 / sys.total_memory() as f64 * 100.0
    } else {
        0.0
    };

    let disks: Vec<DiskUsage> = Disks::new_with_refreshed_list()
        .list()
        .iter()
        .map(|d| DiskUsage {
            mount_point: d.mount_point().to_string_lossy().to_string(),
            total: d.total_space(),
            available: d.available_space(),
        })
        .collect();

    HostSample {
        cpu_usage: sys.global_cpu_usage() as f64,
        memory_usage,
        disk_usage: primary_disk(&disks).map(DiskUsage::used_pct).unwrap_or(0.0),
    }
}

/// Host name used to label a system registered by an agent.
pub fn host_name() -> String {
    System::host_name().unwrap_or_else(|| "unknown-host".to_string())
}
