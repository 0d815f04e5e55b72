use std::collections::BTreeMap;

/// One process as read from its `stat`/`cmdline` files at a single instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessSample {
    pub pid: u32,
    pub ppid: u32,
    pub name: String,
    pub command: String,
    pub state: char,
    /// utime + stime + cutime + cstime, in clock ticks.
    pub cpu_time_ticks: u64,
    pub resident_memory_pages: u64,
    pub virtual_memory_bytes: u64,
    /// Start time relative to boot, in clock ticks.
    pub start_time_ticks: u64,
}

impl ProcessSample {
    /// Whether `other` is the same process instance, not a reused pid.
    pub fn same_instance(&self, other: &ProcessSample) -> bool {
        self.pid == other.pid && self.start_time_ticks == other.start_time_ticks
    }
}

/// All processes of one snapshot, ordered by pid.
pub type ProcessSet = BTreeMap<u32, ProcessSample>;

/// A sample with the utilization derived for the cycle it was computed in.
#[derive(Clone, Debug, PartialEq)]
pub struct AccountedProcess {
    pub sample: ProcessSample,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub resident_memory_kb: u64,
}

impl AccountedProcess {
    pub fn pid(&self) -> u32 {
        self.sample.pid
    }
}
