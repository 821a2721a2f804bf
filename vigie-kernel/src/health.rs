use crate::config::ConfigSnapshot;
use crate::inventory::InventoryManager;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Serialize, Deserialize)]
pub struct KernelHealth {
    pub uptime_seconds: u64,
    pub hosts_inventoried: u32,
    pub scout_cycles: u32,
    pub memory_usage_mb: f32,
    pub in_maintenance: bool,
}

#[derive(Clone)]
pub struct HealthTracker {
    start_time: Instant,
    scout_cycles: Arc<AtomicU32>,
}

impl HealthTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            scout_cycles: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn mark_scout_cycle(&self) {
        self.scout_cycles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_health(&self, inventory: &InventoryManager, snapshot: &ConfigSnapshot) -> KernelHealth {
        KernelHealth {
            uptime_seconds: self.start_time.elapsed().as_secs(),
            hosts_inventoried: inventory.len() as u32,
            scout_cycles: self.scout_cycles.load(Ordering::Relaxed),
            memory_usage_mb: get_memory_usage_mb(),
            in_maintenance: snapshot.in_maintenance,
        }
    }
}

// Approximation simple via /proc ; suffisant pour du monitoring de parc
fn get_memory_usage_mb() -> f32 {
    #[cfg(target_os = "linux")]
    {
        let path = format!("/proc/{}/status", std::process::id());
        if let Ok(status) = std::fs::read_to_string(path) {
            for line in status.lines() {
                if let Some(rest) = line.strip_prefix("VmRSS:") {
                    if let Some(kb) = rest
                        .split_whitespace()
                        .next()
                        .and_then(|v| v.parse::<u64>().ok())
                    {
                        return (kb as f32) / 1024.0; // kio -> Mio
                    }
                }
            }
        }
    }

    0.0
}
