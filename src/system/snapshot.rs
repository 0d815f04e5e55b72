use super::process::ProcessSet;

/// System-wide counters at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemSample {
    /// Sum of every tick category on the aggregate `cpu` line.
    pub total_ticks: u64,
    /// idle + iowait ticks.
    pub idle_ticks: u64,
    pub total_memory_kb: u64,
    pub free_memory_kb: u64,
    pub available_memory_kb: u64,
    pub cpu_count: usize,
}

impl SystemSample {
    pub fn used_memory_kb(&self) -> u64 {
        self.total_memory_kb.saturating_sub(self.available_memory_kb)
    }
}

/// The two most recent generations of one kind of snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotPair<T> {
    previous: Option<T>,
    current: T,
}

impl<T> SnapshotPair<T> {
    pub fn new(first: T) -> Self {
        SnapshotPair {
            previous: None,
            current: first,
        }
    }

    /// Makes `next` current; the old current becomes previous and the old
    /// previous is dropped.
    pub fn push(&mut self, next: T) {
        let prior = std::mem::replace(&mut self.current, next);
        self.previous = Some(prior);
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    pub fn previous(&self) -> Option<&T> {
        self.previous.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    pub system: SnapshotPair<SystemSample>,
    pub processes: SnapshotPair<ProcessSet>,
}

impl SnapshotStore {
    pub fn new(system: SystemSample, processes: ProcessSet) -> Self {
        SnapshotStore {
            system: SnapshotPair::new(system),
            processes: SnapshotPair::new(processes),
        }
    }

    pub fn push(&mut self, system: SystemSample, processes: ProcessSet) {
        self.system.push(system);
        self.processes.push(processes);
    }

    pub fn is_bootstrapping(&self) -> bool {
        self.system.previous().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sys(total_ticks: u64) -> SystemSample {
        SystemSample {
            total_ticks,
            cpu_count: 1,
            ..SystemSample::default()
        }
    }

    #[test]
    fn first_generation_has_no_previous() {
        let store = SnapshotStore::new(sys(10), ProcessSet::new());
        assert!(store.is_bootstrapping());
        assert!(store.processes.previous().is_none());
        assert_eq!(store.system.current().total_ticks, 10);
    }

    #[test]
    fn push_rotates_and_keeps_two_generations() {
        let mut pair = SnapshotPair::new(1);
        pair.push(2);
        assert_eq!(pair.previous(), Some(&1));
        assert_eq!(pair.current(), &2);
        pair.push(3);
        assert_eq!(pair.previous(), Some(&2));
        assert_eq!(pair.current(), &3);
    }

    #[test]
    fn store_rotates_both_domains_together() {
        let mut store = SnapshotStore::new(sys(10), ProcessSet::new());
        store.push(sys(20), ProcessSet::new());
        assert!(!store.is_bootstrapping());
        assert_eq!(store.system.previous().map(|s| s.total_ticks), Some(10));
        assert!(store.processes.previous().is_some());
    }

    #[test]
    fn used_memory_never_underflows() {
        let s = SystemSample {
            total_memory_kb: 100,
            available_memory_kb: 150,
            ..SystemSample::default()
        };
        assert_eq!(s.used_memory_kb(), 0);
    }
}
