// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! CPU pinning for benchmark worker threads.
//!
//! Workers are spread round-robin across logical CPUs so that a sweep with
//! N threads runs on N distinct cores when the machine has them.

use nix::sched::{sched_setaffinity, CpuSet};
use nix::unistd::Pid;
use std::sync::atomic::{AtomicUsize, Ordering};

/// CPU allocator that distributes worker threads evenly across cores.
pub struct CpuAllocator {
    /// Total number of logical CPUs available
    num_cpus: usize,
    /// Next CPU to assign (atomic for thread-safety)
    next_cpu: AtomicUsize,
}

impl CpuAllocator {
    /// Create a new CPU allocator sized to the machine.
    pub fn new() -> Self {
        let num_cpus = num_cpus::get();
        tracing::debug!(num_cpus = num_cpus, "CpuAllocator initialized");

        Self {
            num_cpus,
            next_cpu: AtomicUsize::new(0),
        }
    }

    /// Allocate the next CPU core using round-robin.
    pub fn allocate(&self) -> usize {
        self.next_cpu.fetch_add(1, Ordering::Relaxed) % self.num_cpus
    }

    /// Pin the calling thread to the next CPU.
    ///
    /// Returns the CPU index the thread was pinned to.
    pub fn pin_current_thread(&self) -> Result<usize, nix::Error> {
        let cpu = self.allocate();
        let mut cpuset = CpuSet::new();
        cpuset.set(cpu)?;
        // Pid 0 targets the calling thread.
        sched_setaffinity(Pid::from_raw(0), &cpuset)?;

        tracing::trace!(cpu = cpu, "Worker thread pinned to CPU");
        Ok(cpu)
    }

    /// Get the number of available CPUs.
    pub fn num_cpus(&self) -> usize {
        self.num_cpus
    }
}

impl Default for CpuAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_round_robin_allocation() {
        let allocator = CpuAllocator::new();
        let n = allocator.num_cpus();
        assert!(n > 0);

        let cpus: HashSet<usize> = (0..n).map(|_| allocator.allocate()).collect();
        assert_eq!(cpus.len(), n);

        // Wraps around
        assert_eq!(allocator.allocate(), 0);
    }

    #[test]
    fn test_pin_current_thread() {
        let allocator = CpuAllocator::new();
        let handle = std::thread::spawn(move || allocator.pin_current_thread());
        // Restricted sandboxes may refuse affinity changes
        if let Ok(cpu) = handle.join().unwrap() {
            assert_eq!(cpu, 0);
        }
    }
}
