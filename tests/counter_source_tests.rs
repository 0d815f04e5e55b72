use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use sysmon::rank::{SortMetric, rank};
use sysmon::system::accountant::{Accountant, system_cpu_percent};
use sysmon::system::snapshot::SnapshotStore;
use sysmon::system::source::{CounterSource, ProcSource};

static NEXT_FIXTURE: AtomicUsize = AtomicUsize::new(0);

/// A throwaway procfs-shaped directory, removed on drop.
struct FixtureRoot {
    path: PathBuf,
}

impl FixtureRoot {
    fn new() -> Self {
        let id = NEXT_FIXTURE.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "sysmon-fixture-{}-{id}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).unwrap();
        FixtureRoot { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, rel: &str, contents: impl AsRef<[u8]>) {
        let file = self.path.join(rel);
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(file, contents).unwrap();
    }

    fn system(&self, user: u64, idle: u64, cpus: usize, total_kb: u64) {
        self.write(
            "stat",
            format!("cpu  {user} 0 0 {idle} 0 0 0 0 0 0\ncpu0 {user} 0 0 {idle} 0 0 0 0 0 0\n"),
        );
        self.write(
            "meminfo",
            format!("MemTotal:       {total_kb} kB\nMemFree:        1000 kB\nMemAvailable:   2000 kB\n"),
        );
        let cpuinfo: String = (0..cpus)
            .map(|i| format!("processor\t: {i}\nmodel name\t: test\n\n"))
            .collect();
        self.write("cpuinfo", cpuinfo);
    }

    fn process(&self, pid: u32, name: &str, utime: u64, rss_pages: u64, start: u64) {
        self.write(
            &format!("{pid}/stat"),
            stat_line(pid, name, utime, rss_pages, start),
        );
    }
}

impl Drop for FixtureRoot {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn stat_line(pid: u32, name: &str, utime: u64, rss_pages: u64, start: u64) -> String {
    format!(
        "{pid} ({name}) S 1 {pid} {pid} 0 -1 4194304 100 0 0 0 {utime} 0 0 0 20 0 1 0 {start} 1048576 {rss_pages} 18446744073709551615\n"
    )
}

#[test]
fn reads_numeric_entries_only() {
    let root = FixtureRoot::new();
    root.system(100, 900, 2, 1_000_000);
    root.process(1, "init", 10, 100, 5);
    root.process(42, "worker", 20, 200, 7);
    root.write("self/stat", stat_line(99, "self", 0, 0, 0));
    root.write("sys/kernel/hostname", "box");
    fs::create_dir_all(root.path().join("7")).unwrap();

    let mut source = ProcSource::new(root.path());
    let processes = source.sample_processes().unwrap();

    assert_eq!(processes.keys().copied().collect::<Vec<_>>(), vec![1, 42]);
    let worker = &processes[&42];
    assert_eq!(worker.name, "worker");
    assert_eq!(worker.state, 'S');
    assert_eq!(worker.ppid, 1);
    assert_eq!(worker.cpu_time_ticks, 20);
    assert_eq!(worker.resident_memory_pages, 200);
    assert_eq!(worker.virtual_memory_bytes, 1_048_576);
    assert_eq!(worker.start_time_ticks, 7);
}

#[test]
fn command_prefers_cmdline_then_comm() {
    let root = FixtureRoot::new();
    root.system(0, 0, 1, 1000);
    root.process(10, "python3", 0, 0, 1);
    root.write("10/cmdline", b"/usr/bin/python3\0-m\0http.server\0".as_slice());
    root.process(11, "kworker/0:1", 0, 0, 1);
    root.write("11/cmdline", b"".as_slice());
    root.write("11/comm", "kworker/0:1\n");
    root.process(12, "bare", 0, 0, 1);

    let processes = ProcSource::new(root.path()).sample_processes().unwrap();

    assert_eq!(processes[&10].command, "/usr/bin/python3 -m http.server");
    assert_eq!(processes[&11].command, "kworker/0:1");
    assert_eq!(processes[&12].command, "bare");
}

#[test]
fn names_with_spaces_and_parens_parse() {
    let root = FixtureRoot::new();
    root.system(0, 0, 1, 1000);
    root.process(5, "tmux: server (1)", 33, 4, 9);

    let processes = ProcSource::new(root.path()).sample_processes().unwrap();

    assert_eq!(processes[&5].name, "tmux: server (1)");
    assert_eq!(processes[&5].cpu_time_ticks, 33);
}

#[test]
fn non_utf8_names_are_kept() {
    let root = FixtureRoot::new();
    root.system(0, 0, 1, 1000);
    // Splice a 0xff byte into the parenthesized name.
    let line = stat_line(77, "bad@name", 42, 8, 3);
    let stat: Vec<u8> = line
        .bytes()
        .map(|b| if b == b'@' { 0xff } else { b })
        .collect();
    root.write("77/stat", &stat);
    root.write("77/comm", [b'b', b'a', b'd', 0xff, b'\n']);

    let processes = ProcSource::new(root.path()).sample_processes().unwrap();

    let odd = &processes[&77];
    assert_eq!(odd.name, "bad\u{fffd}name");
    assert_eq!(odd.command, "bad\u{fffd}");
    assert_eq!(odd.cpu_time_ticks, 42);
    assert_eq!(odd.resident_memory_pages, 8);
}

#[test]
fn malformed_stat_is_kept_with_zero_counters() {
    let root = FixtureRoot::new();
    root.system(0, 0, 1, 1000);
    root.write("3/stat", "3 (short) R 1 2 3\n");

    let processes = ProcSource::new(root.path()).sample_processes().unwrap();

    let short = &processes[&3];
    assert_eq!(short.name, "short");
    assert_eq!(short.cpu_time_ticks, 0);
    assert_eq!(short.resident_memory_pages, 0);
}

#[test]
fn system_sample_reads_all_counters() {
    let root = FixtureRoot::new();
    root.system(300, 700, 4, 2_000_000);

    let system = ProcSource::new(root.path()).sample_system().unwrap();

    assert_eq!(system.total_ticks, 1000);
    assert_eq!(system.idle_ticks, 700);
    assert_eq!(system.cpu_count, 4);
    assert_eq!(system.total_memory_kb, 2_000_000);
    assert_eq!(system.free_memory_kb, 1000);
    assert_eq!(system.available_memory_kb, 2000);
}

#[test]
fn optional_system_files_fall_back() {
    let root = FixtureRoot::new();
    root.write("stat", "cpu  1 2 3 4\n");

    let system = ProcSource::new(root.path()).sample_system().unwrap();

    assert_eq!(system.total_ticks, 10);
    assert_eq!(system.cpu_count, 1);
    assert_eq!(system.total_memory_kb, 0);
}

#[test]
fn missing_root_is_an_error() {
    let root = FixtureRoot::new();
    let gone = root.path().join("does-not-exist");
    let mut source = ProcSource::new(&gone);

    assert!(source.sample_system().is_err());
    assert!(source.sample_processes().is_err());
}

#[test]
fn two_generations_produce_ranked_percentages() {
    let root = FixtureRoot::new();
    let mut source = ProcSource::new(root.path());

    root.system(0, 1000, 2, 1_000_000);
    root.process(1, "idle", 0, 1000, 1);
    root.process(2, "busy", 50, 100, 1);
    root.process(3, "leaving", 0, 10, 1);
    let mut store = SnapshotStore::new(
        source.sample_system().unwrap(),
        source.sample_processes().unwrap(),
    );

    root.system(100, 1000, 2, 1_000_000);
    root.process(2, "busy", 80, 100, 1);
    root.process(4, "fresh", 500, 10, 1);
    fs::remove_dir_all(root.path().join("3")).unwrap();
    store.push(
        source.sample_system().unwrap(),
        source.sample_processes().unwrap(),
    );

    let accountant = Accountant::new(4);
    let ranked = rank(accountant.account(&store), SortMetric::Cpu);
    let pids: Vec<u32> = ranked.iter().map(|p| p.pid()).collect();
    assert_eq!(pids, vec![2, 1, 4]);
    // 30 ticks of 100 across 2 CPUs
    assert!((ranked[0].cpu_percent - 60.0).abs() < 1e-9);
    assert_eq!(ranked[2].cpu_percent, 0.0);

    let by_memory = rank(ranked, SortMetric::Memory);
    assert_eq!(by_memory[0].pid(), 1);
    assert!((by_memory[0].memory_percent - 0.4).abs() < 1e-9);

    let busy = system_cpu_percent(store.system.current(), store.system.previous());
    assert!((busy - 100.0).abs() < 1e-9);
}
