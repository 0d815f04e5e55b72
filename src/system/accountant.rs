//! Turns two generations of cumulative counters into utilization percentages.

use super::platform;
use super::process::{AccountedProcess, ProcessSet};
use super::snapshot::{SnapshotStore, SystemSample};

#[derive(Debug, Clone, Copy)]
pub struct Accountant {
    page_size_kb: u64,
}

impl Default for Accountant {
    fn default() -> Self {
        Self::new(platform::page_size_kb())
    }
}

impl Accountant {
    pub fn new(page_size_kb: u64) -> Self {
        Accountant { page_size_kb }
    }

    pub fn page_size_kb(&self) -> u64 {
        self.page_size_kb
    }

    pub fn account(&self, store: &SnapshotStore) -> Vec<AccountedProcess> {
        self.account_samples(
            store.processes.current(),
            store.processes.previous(),
            store.system.current(),
            store.system.previous(),
        )
    }

    /// CPU percent is 0.0 for every process when there is no previous
    /// system sample or the tick counter did not advance, and for any
    /// process without a previous entry of the same instance. Processes only
    /// present in `previous` are not returned.
    pub fn account_samples(
        &self,
        current: &ProcessSet,
        previous: Option<&ProcessSet>,
        current_system: &SystemSample,
        previous_system: Option<&SystemSample>,
    ) -> Vec<AccountedProcess> {
        let total_tick_delta = previous_system
            .map(|prev| current_system.total_ticks.saturating_sub(prev.total_ticks))
            .unwrap_or(0);
        let cpu_count = current_system.cpu_count.max(1) as f64;
        let cpu_ceiling = 100.0 * cpu_count;
        let total_memory_kb = current_system.total_memory_kb;

        current
            .values()
            .map(|sample| {
                let baseline = previous
                    .and_then(|prev| prev.get(&sample.pid))
                    .filter(|prev| prev.same_instance(sample));

                let cpu_percent = match baseline {
                    Some(prev) if total_tick_delta > 0 => {
                        let ticks_delta = sample.cpu_time_ticks.saturating_sub(prev.cpu_time_ticks);
                        (ticks_delta as f64 * 100.0 * cpu_count / total_tick_delta as f64)
                            .clamp(0.0, cpu_ceiling)
                    }
                    _ => 0.0,
                };

                let resident_memory_kb = sample
                    .resident_memory_pages
                    .saturating_mul(self.page_size_kb);
                let memory_percent = if total_memory_kb == 0 {
                    0.0
                } else {
                    (resident_memory_kb as f64 * 100.0 / total_memory_kb as f64).clamp(0.0, 100.0)
                };

                AccountedProcess {
                    sample: sample.clone(),
                    cpu_percent,
                    memory_percent,
                    resident_memory_kb,
                }
            })
            .collect()
    }
}

/// Share of the tick delta not spent idle or waiting on I/O.
pub fn system_cpu_percent(current: &SystemSample, previous: Option<&SystemSample>) -> f64 {
    let Some(previous) = previous else {
        return 0.0;
    };
    let total = current.total_ticks.saturating_sub(previous.total_ticks);
    if total == 0 {
        return 0.0;
    }
    let idle = current.idle_ticks.saturating_sub(previous.idle_ticks).min(total);
    ((total - idle) as f64 * 100.0 / total as f64).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::process::ProcessSample;

    fn proc(pid: u32, ticks: u64, rss_pages: u64) -> ProcessSample {
        ProcessSample {
            pid,
            ppid: 1,
            name: format!("p{pid}"),
            command: format!("p{pid}"),
            state: 'R',
            cpu_time_ticks: ticks,
            resident_memory_pages: rss_pages,
            virtual_memory_bytes: 0,
            start_time_ticks: 500,
        }
    }

    fn set(samples: Vec<ProcessSample>) -> ProcessSet {
        samples.into_iter().map(|p| (p.pid, p)).collect()
    }

    fn sys(total_ticks: u64, cpu_count: usize) -> SystemSample {
        SystemSample {
            total_ticks,
            idle_ticks: 0,
            total_memory_kb: 1_000_000,
            free_memory_kb: 0,
            available_memory_kb: 0,
            cpu_count,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn tick_delta_scaled_by_cpu_count() {
        let acc = Accountant::new(4);
        let prev = set(vec![proc(1, 50, 0)]);
        let cur = set(vec![proc(1, 80, 0)]);
        let out = acc.account_samples(&cur, Some(&prev), &sys(1100, 2), Some(&sys(1000, 2)));
        assert_eq!(out.len(), 1);
        assert!(approx(out[0].cpu_percent, 60.0), "{}", out[0].cpu_percent);
    }

    #[test]
    fn new_process_starts_at_zero() {
        let acc = Accountant::new(4);
        let prev = set(vec![proc(1, 50, 0)]);
        let cur = set(vec![proc(1, 80, 0), proc(2, 20, 0)]);
        let out = acc.account_samples(&cur, Some(&prev), &sys(1100, 2), Some(&sys(1000, 2)));
        let fresh = out.iter().find(|p| p.pid() == 2).unwrap();
        assert_eq!(fresh.cpu_percent, 0.0);
    }

    #[test]
    fn regressed_ticks_clamp_to_zero() {
        let acc = Accountant::new(4);
        let prev = set(vec![proc(1, 80, 0)]);
        let cur = set(vec![proc(1, 50, 0)]);
        let out = acc.account_samples(&cur, Some(&prev), &sys(1100, 2), Some(&sys(1000, 2)));
        assert_eq!(out[0].cpu_percent, 0.0);
    }

    #[test]
    fn reused_pid_is_treated_as_new() {
        let acc = Accountant::new(4);
        let prev = set(vec![proc(1, 10, 0)]);
        let mut reused = proc(1, 90, 0);
        reused.start_time_ticks = 9000;
        let cur = set(vec![reused]);
        let out = acc.account_samples(&cur, Some(&prev), &sys(1100, 1), Some(&sys(1000, 1)));
        assert_eq!(out[0].cpu_percent, 0.0);
    }

    #[test]
    fn first_cycle_reports_zero_cpu() {
        let acc = Accountant::new(4);
        let cur = set(vec![proc(1, 1_000_000, 10)]);
        let out = acc.account_samples(&cur, None, &sys(5_000_000, 8), None);
        assert_eq!(out[0].cpu_percent, 0.0);
        assert!(out[0].memory_percent > 0.0);
    }

    #[test]
    fn stalled_tick_counter_reports_zero_cpu() {
        let acc = Accountant::new(4);
        let prev = set(vec![proc(1, 50, 0)]);
        let cur = set(vec![proc(1, 80, 0)]);
        let out = acc.account_samples(&cur, Some(&prev), &sys(1000, 2), Some(&sys(1000, 2)));
        assert_eq!(out[0].cpu_percent, 0.0);
        let backwards = acc.account_samples(&cur, Some(&prev), &sys(900, 2), Some(&sys(1000, 2)));
        assert_eq!(backwards[0].cpu_percent, 0.0);
    }

    #[test]
    fn vanished_process_is_dropped() {
        let acc = Accountant::new(4);
        let prev = set(vec![proc(1, 50, 0), proc(2, 50, 0)]);
        let cur = set(vec![proc(1, 60, 0)]);
        let out = acc.account_samples(&cur, Some(&prev), &sys(1100, 1), Some(&sys(1000, 1)));
        assert_eq!(out.iter().map(|p| p.pid()).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn memory_uses_page_size() {
        let acc = Accountant::new(4);
        let cur = set(vec![proc(1, 0, 25_000)]);
        let out = acc.account_samples(&cur, None, &sys(0, 1), None);
        assert_eq!(out[0].resident_memory_kb, 100_000);
        assert!(approx(out[0].memory_percent, 10.0));
    }

    #[test]
    fn zero_total_memory_reports_zero() {
        let acc = Accountant::new(4);
        let cur = set(vec![proc(1, 0, 25_000), proc(2, 0, 1)]);
        let mut system = sys(0, 1);
        system.total_memory_kb = 0;
        let out = acc.account_samples(&cur, None, &system, None);
        assert!(out.iter().all(|p| p.memory_percent == 0.0));
    }

    #[test]
    fn account_reads_store_generations() {
        let acc = Accountant::new(4);
        let mut store = SnapshotStore::new(sys(1000, 2), set(vec![proc(1, 50, 0)]));
        assert_eq!(acc.account(&store)[0].cpu_percent, 0.0);
        store.push(sys(1100, 2), set(vec![proc(1, 80, 0)]));
        assert!(approx(acc.account(&store)[0].cpu_percent, 60.0));
    }

    #[test]
    fn system_busy_percent() {
        let mut prev = sys(1000, 1);
        prev.idle_ticks = 800;
        let mut cur = sys(1200, 1);
        cur.idle_ticks = 950;
        assert!(approx(system_cpu_percent(&cur, Some(&prev)), 25.0));
        assert_eq!(system_cpu_percent(&cur, None), 0.0);
        assert_eq!(system_cpu_percent(&prev, Some(&prev)), 0.0);
    }
}
