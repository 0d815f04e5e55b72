use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

pub use sysinfo::Signal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KillResult {
    Success(u32, &'static str),
    Failed(u32, String),
    NotFound(u32),
}

pub fn signal_name(signal: Signal) -> &'static str {
    match signal {
        Signal::Term => "SIGTERM",
        Signal::Kill => "SIGKILL",
        _ => "signal",
    }
}

/// Sends `signal` to `pid`. Only the target process is looked up.
pub fn kill_process(pid: u32, signal: Signal) -> KillResult {
    let sysinfo_pid = Pid::from_u32(pid);
    let mut sys = System::new();
    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[sysinfo_pid]),
        true,
        ProcessRefreshKind::nothing(),
    );

    let Some(process) = sys.process(sysinfo_pid) else {
        return KillResult::NotFound(pid);
    };
    let name = signal_name(signal);
    match process.kill_with(signal) {
        Some(true) => KillResult::Success(pid, name),
        Some(false) => KillResult::Failed(pid, format!("Failed to send {name} to PID {pid}")),
        None => {
            // Signal not supported on this platform, fall back to kill()
            if process.kill() {
                KillResult::Success(pid, name)
            } else {
                KillResult::Failed(pid, format!("Failed to kill PID {pid} (permission denied?)"))
            }
        }
    }
}
