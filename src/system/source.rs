//! Counter source reading a procfs tree.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use tracing::debug;

use super::process::{ProcessSample, ProcessSet};
use super::snapshot::SystemSample;
use super::stat::StatRecord;

/// Anything that can take a system snapshot and a process snapshot.
pub trait CounterSource {
    /// Fails only when the system counters cannot be read at all.
    fn sample_system(&mut self) -> Result<SystemSample>;

    /// Fails only when the process list itself cannot be read. Processes
    /// that vanish mid-scan are left out of the set.
    fn sample_processes(&mut self) -> Result<ProcessSet>;
}

pub struct ProcSource {
    root: PathBuf,
}

impl Default for ProcSource {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl ProcSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ProcSource { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_process(&self, pid: u32) -> Option<ProcessSample> {
        let dir = self.root.join(pid.to_string());
        // comm may hold arbitrary bytes, so decode lossily
        let stat = fs::read(dir.join("stat")).ok()?;
        let record = StatRecord::parse(&String::from_utf8_lossy(&stat));
        if record.malformed {
            debug!(pid, "malformed stat record, counters zeroed");
        }

        let command = read_command_line(&dir)
            .or_else(|| read_comm(&dir))
            .unwrap_or_else(|| record.name.clone());

        Some(ProcessSample {
            pid,
            ppid: record.ppid,
            name: record.name.clone(),
            command,
            state: record.state,
            cpu_time_ticks: record.cpu_time_ticks(),
            resident_memory_pages: record.rss_pages,
            virtual_memory_bytes: record.vsize,
            start_time_ticks: record.start_time,
        })
    }
}

impl CounterSource for ProcSource {
    fn sample_system(&mut self) -> Result<SystemSample> {
        let stat_path = self.root.join("stat");
        let stat = fs::read_to_string(&stat_path)
            .wrap_err_with(|| format!("failed to read {}", stat_path.display()))?;
        let (total_ticks, idle_ticks) = parse_cpu_ticks(&stat);

        let (total_memory_kb, free_memory_kb, available_memory_kb) =
            match fs::read_to_string(self.root.join("meminfo")) {
                Ok(contents) => parse_meminfo(&contents),
                Err(err) => {
                    debug!(%err, "meminfo unavailable");
                    (0, 0, 0)
                }
            };

        let cpu_count = match fs::read_to_string(self.root.join("cpuinfo")) {
            Ok(contents) => count_processors(&contents),
            Err(err) => {
                debug!(%err, "cpuinfo unavailable");
                1
            }
        };

        Ok(SystemSample {
            total_ticks,
            idle_ticks,
            total_memory_kb,
            free_memory_kb,
            available_memory_kb,
            cpu_count,
        })
    }

    fn sample_processes(&mut self) -> Result<ProcessSet> {
        let entries = fs::read_dir(&self.root)
            .wrap_err_with(|| format!("failed to list {}", self.root.display()))?;

        let mut processes = ProcessSet::new();
        let mut skipped = 0usize;
        for entry in entries.flatten() {
            let Some(pid) = entry.file_name().to_str().and_then(parse_pid) else {
                continue;
            };
            match self.read_process(pid) {
                Some(sample) => {
                    processes.insert(pid, sample);
                }
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!(skipped, "processes exited during scan");
        }
        Ok(processes)
    }
}

fn parse_pid(name: &str) -> Option<u32> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

/// Returns `(total, idle + iowait)` from the first line of a `stat` file.
pub fn parse_cpu_ticks(contents: &str) -> (u64, u64) {
    let Some(line) = contents.lines().next() else {
        return (0, 0);
    };
    let values: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .map(|v| v.parse().unwrap_or(0))
        .collect();
    let total = values.iter().fold(0u64, |acc, v| acc.saturating_add(*v));
    let idle = values
        .get(3)
        .copied()
        .unwrap_or(0)
        .saturating_add(values.get(4).copied().unwrap_or(0));
    (total, idle)
}

/// Returns `(MemTotal, MemFree, MemAvailable)` in kB.
pub fn parse_meminfo(contents: &str) -> (u64, u64, u64) {
    let mut total = 0;
    let mut free = 0;
    let mut available = 0;
    for line in contents.lines() {
        let mut parts = line.split_whitespace();
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        let Ok(value) = value.parse::<u64>() else {
            continue;
        };
        match key {
            "MemTotal:" => total = value,
            "MemFree:" => free = value,
            "MemAvailable:" => available = value,
            _ => {}
        }
    }
    (total, free, available)
}

pub fn count_processors(contents: &str) -> usize {
    contents
        .lines()
        .filter(|line| line.starts_with("processor"))
        .count()
        .max(1)
}

fn read_command_line(dir: &Path) -> Option<String> {
    let raw = fs::read(dir.join("cmdline")).ok()?;
    let command = raw
        .split(|&b| b == 0)
        .filter(|arg| !arg.is_empty())
        .map(|arg| String::from_utf8_lossy(arg).into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    if command.is_empty() { None } else { Some(command) }
}

fn read_comm(dir: &Path) -> Option<String> {
    let comm = fs::read(dir.join("comm")).ok()?;
    let comm = String::from_utf8_lossy(&comm);
    let comm = comm.trim();
    if comm.is_empty() {
        None
    } else {
        Some(comm.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_line_sums_all_categories() {
        let stat = "cpu  100 5 50 800 20 1 2 3 0 0\ncpu0 50 2 25 400 10 0 1 1 0 0\n";
        assert_eq!(parse_cpu_ticks(stat), (981, 820));
    }

    #[test]
    fn short_cpu_line_substitutes_zero() {
        assert_eq!(parse_cpu_ticks("cpu 10 x 5"), (15, 0));
        assert_eq!(parse_cpu_ticks(""), (0, 0));
    }

    #[test]
    fn huge_idle_counters_saturate() {
        let stat = "cpu 0 0 0 18446744073709551615 5\n";
        assert_eq!(parse_cpu_ticks(stat), (u64::MAX, u64::MAX));
    }

    #[test]
    fn meminfo_reads_known_keys() {
        let meminfo = "MemTotal:       16384000 kB\nMemFree:         2048000 kB\n\
            MemAvailable:    8192000 kB\nBuffers:          100000 kB\n";
        assert_eq!(parse_meminfo(meminfo), (16_384_000, 2_048_000, 8_192_000));
    }

    #[test]
    fn meminfo_missing_keys_stay_zero() {
        assert_eq!(parse_meminfo("MemTotal: 1000 kB\nGarbage\n"), (1000, 0, 0));
    }

    #[test]
    fn processor_count_is_at_least_one() {
        assert_eq!(count_processors("model name : x\n"), 1);
        let two = "processor\t: 0\nmodel name : x\n\nprocessor\t: 1\n";
        assert_eq!(count_processors(two), 2);
    }

    #[test]
    fn pid_names_must_be_numeric() {
        assert_eq!(parse_pid("123"), Some(123));
        assert_eq!(parse_pid("self"), None);
        assert_eq!(parse_pid("12a"), None);
        assert_eq!(parse_pid(""), None);
    }
}
