//! Plain-text output for `--batch`, one ranked table per cycle.

use std::fmt::Write as _;
use std::io::Write;

use color_eyre::Result;

use crate::app::App;
use crate::format::{format_cpu_time, format_kb, truncate_unicode};
use crate::rank::SortMetric;
use crate::system::process::AccountedProcess;
use crate::system::snapshot::SystemSample;

const COMMAND_WIDTH: usize = 48;

pub struct BatchFrame<'a> {
    pub cycle: u64,
    pub system: &'a SystemSample,
    pub system_cpu_percent: f64,
    pub sort_metric: SortMetric,
    pub processes: &'a [AccountedProcess],
    pub clock_ticks: u64,
}

pub fn format_frame(frame: &BatchFrame, limit: usize) -> String {
    let mut out = String::new();
    let system = frame.system;
    let _ = writeln!(
        out,
        "cycle {}  cpus {}  cpu {:.1}%  mem {}/{}  procs {}  sort {}",
        frame.cycle,
        system.cpu_count,
        frame.system_cpu_percent,
        format_kb(system.used_memory_kb()),
        format_kb(system.total_memory_kb),
        frame.processes.len(),
        frame.sort_metric.label(),
    );
    let _ = writeln!(
        out,
        "{:>7} S {:>6} {:>6} {:>8} {:>9} COMMAND",
        "PID", "CPU%", "MEM%", "RSS", "TIME+"
    );
    for p in frame.processes.iter().take(limit) {
        let line = format!(
            "{:>7} {} {:>6.1} {:>6.1} {:>8} {:>9} {}",
            p.pid(),
            p.sample.state,
            p.cpu_percent,
            p.memory_percent,
            format_kb(p.resident_memory_kb),
            format_cpu_time(p.sample.cpu_time_ticks, frame.clock_ticks),
            truncate_unicode(&p.sample.command, COMMAND_WIDTH),
        );
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

/// Prints `iterations` cycles, sleeping one refresh interval between them.
pub async fn run<W: Write>(app: &mut App, iterations: usize, limit: usize, out: &mut W) -> Result<()> {
    for i in 0..iterations {
        if i > 0 {
            tokio::time::sleep(app.refresh_interval).await;
            app.refresh_data();
        }
        let frame = BatchFrame {
            cycle: app.cycle,
            system: app.system(),
            system_cpu_percent: app.system_cpu_percent,
            sort_metric: app.sort_metric,
            processes: &app.processes,
            clock_ticks: app.clock_ticks,
        };
        writeln!(out, "{}", format_frame(&frame, limit))?;
        out.flush()?;
    }
    Ok(())
}
