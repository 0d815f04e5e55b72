use std::time::{Duration, Instant};

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info, warn};

use crate::action::{Action, Direction};
use crate::config::{Config, parse_key};
use crate::format::format_interval;
use crate::rank::{Pager, SortMetric, rank};
use crate::system::accountant::{Accountant, system_cpu_percent};
use crate::system::kill::{KillResult, Signal, kill_process};
use crate::system::platform;
use crate::system::process::{AccountedProcess, ProcessSet};
use crate::system::snapshot::{SnapshotStore, SystemSample};
use crate::system::source::{CounterSource, ProcSource};
use crate::ui::theme::Theme;

const MIN_REFRESH_MS: u64 = 100;
const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Help,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub toggle_sort: KeyCode,
    pub kill: KeyCode,
    pub force_kill: KeyCode,
    pub refresh_interval: KeyCode,
    pub help: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &crate::config::KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            toggle_sort: parse_key(&kb.toggle_sort).unwrap_or(KeyCode::Char('s')),
            kill: parse_key(&kb.kill).unwrap_or(KeyCode::Char('k')),
            force_kill: parse_key(&kb.force_kill).unwrap_or(KeyCode::Char('K')),
            refresh_interval: parse_key(&kb.refresh_interval).unwrap_or(KeyCode::Char('r')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
        }
    }

    /// Returns (key_label, description) pairs for all configurable keybinds.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.toggle_sort), "Toggle sort CPU/MEM"),
            (key_label(self.refresh_interval), "Cycle refresh interval"),
            ("+ / -".to_string(), "Slower / faster refresh"),
            (key_label(self.kill), "Kill process (SIGTERM)"),
            (key_label(self.force_kill), "Force kill (SIGKILL)"),
            (key_label(self.help), "Toggle help"),
            ("↑↓".to_string(), "Move selection"),
            ("PgUp/PgDn".to_string(), "Scroll a page"),
            ("Home/End".to_string(), "First / last process"),
            ("Ctrl+C".to_string(), "Quit (always)"),
        ]
    }

    pub fn statusbar_pills(&self) -> Vec<(String, &'static str)> {
        vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.toggle_sort), "Sort"),
            ("↑↓".to_string(), "Scroll"),
            (key_label(self.refresh_interval), "Interval"),
            (key_label(self.kill), "Kill"),
            (key_label(self.help), "Help"),
        ]
    }
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Delete => "Del".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => "?".to_string(),
    }
}

fn refresh_presets(config: &Config, current: Duration) -> Vec<Duration> {
    let mut presets: Vec<Duration> = config
        .general
        .refresh_presets_ms
        .iter()
        .filter(|&&ms| ms >= MIN_REFRESH_MS)
        .map(|&ms| Duration::from_millis(ms))
        .collect();
    presets.sort();
    presets.dedup();
    if presets.is_empty() {
        presets.push(current);
    }
    presets
}

pub struct App {
    pub running: bool,
    source: Box<dyn CounterSource>,
    accountant: Accountant,
    pub snapshots: SnapshotStore,
    /// Accounted processes of the latest cycle, ranked by `sort_metric`.
    pub processes: Vec<AccountedProcess>,
    pub system_cpu_percent: f64,
    pub sort_metric: SortMetric,
    pub pager: Pager,
    pub input_mode: InputMode,
    pub refresh_interval: Duration,
    refresh_presets: Vec<Duration>,
    pub status_message: Option<(String, Instant)>,
    pub theme: Theme,
    pub keybinds: ResolvedKeybinds,
    pub clock_ticks: u64,
    pub cycle: u64,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let source = ProcSource::new(&config.general.proc_root);
        Self::with_source(config, Box::new(source), Accountant::default())
    }

    /// Takes the first snapshot. Failing to read it is fatal: there is
    /// nothing to show and later cycles would fail the same way.
    pub fn with_source(
        config: &Config,
        mut source: Box<dyn CounterSource>,
        accountant: Accountant,
    ) -> Result<Self> {
        let (system, processes) =
            sample(source.as_mut()).wrap_err("failed to take the initial snapshot")?;
        info!(
            processes = processes.len(),
            cpus = system.cpu_count,
            page_size_kb = accountant.page_size_kb(),
            "initial snapshot taken"
        );

        let refresh_interval =
            Duration::from_millis(config.general.refresh_rate_ms.max(MIN_REFRESH_MS));
        let mut app = App {
            running: true,
            source,
            accountant,
            snapshots: SnapshotStore::new(system, processes),
            processes: Vec::new(),
            system_cpu_percent: 0.0,
            sort_metric: SortMetric::from_str_config(&config.general.default_sort),
            pager: Pager::default(),
            input_mode: InputMode::Normal,
            refresh_interval,
            refresh_presets: refresh_presets(config, refresh_interval),
            status_message: None,
            theme: Theme::from_config(&config.colors.theme),
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
            clock_ticks: platform::clock_ticks_per_second(),
            cycle: 0,
        };
        app.account_and_rank();
        Ok(app)
    }

    pub fn system(&self) -> &SystemSample {
        self.snapshots.system.current()
    }

    /// One full cycle: sample, rotate, account, rank. A failed sample keeps
    /// the previous view.
    pub fn refresh_data(&mut self) {
        match sample(self.source.as_mut()) {
            Ok((system, processes)) => {
                self.snapshots.push(system, processes);
                self.account_and_rank();
                self.cycle += 1;
                debug!(
                    cycle = self.cycle,
                    processes = self.processes.len(),
                    cpu = self.system_cpu_percent,
                    "refreshed"
                );
            }
            Err(err) => {
                warn!(error = %err, "sampling failed, keeping previous view");
                self.set_status(format!("Sampling failed: {err}"));
            }
        }

        self.expire_status();
    }

    /// Time until the current status message expires, if one is shown.
    pub fn status_remaining(&self) -> Option<Duration> {
        self.status_message
            .as_ref()
            .map(|(_, created)| STATUS_TTL.saturating_sub(created.elapsed()))
    }

    /// Drops an expired status message. Returns whether one was dropped.
    pub fn expire_status(&mut self) -> bool {
        if self.status_remaining() == Some(Duration::ZERO) {
            self.status_message = None;
            return true;
        }
        false
    }

    fn account_and_rank(&mut self) {
        let accounted = self.accountant.account(&self.snapshots);
        self.system_cpu_percent =
            system_cpu_percent(self.snapshots.system.current(), self.snapshots.system.previous());
        self.rank_keeping_selection(accounted);
    }

    fn rank_keeping_selection(&mut self, processes: Vec<AccountedProcess>) {
        let selected_pid = self.selected_pid();
        self.processes = rank(processes, self.sort_metric);
        let count = self.processes.len();
        match selected_pid.and_then(|pid| self.processes.iter().position(|p| p.pid() == pid)) {
            Some(index) => self.pager.select(index, count),
            None => self.pager.clamp(count),
        }
    }

    pub fn set_page_size(&mut self, rows: usize) {
        self.pager.set_page_size(rows, self.processes.len());
    }

    pub fn visible_processes(&self) -> &[AccountedProcess] {
        self.pager.window(&self.processes)
    }

    pub fn selected_pid(&self) -> Option<u32> {
        self.processes.get(self.pager.selected()).map(|p| p.pid())
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Help => self.map_key_help(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.toggle_sort {
            return Action::ToggleSort;
        }
        if code == kb.refresh_interval {
            return Action::CycleRefreshInterval;
        }
        if code == kb.kill {
            return self.selected_pid().map(Action::Kill).unwrap_or(Action::None);
        }
        if code == kb.force_kill {
            return self
                .selected_pid()
                .map(Action::ForceKill)
                .unwrap_or(Action::None);
        }
        if code == kb.help {
            return Action::ToggleHelp;
        }

        // Hardwired keys; configured binds above take precedence
        match code {
            KeyCode::Up => Action::Navigate(Direction::Up),
            KeyCode::Down => Action::Navigate(Direction::Down),
            KeyCode::PageUp => Action::Navigate(Direction::PageUp),
            KeyCode::PageDown => Action::Navigate(Direction::PageDown),
            KeyCode::Home => Action::Navigate(Direction::Home),
            KeyCode::End => Action::Navigate(Direction::End),
            KeyCode::Char('+') => Action::SlowerRefresh,
            KeyCode::Char('-') => Action::FasterRefresh,
            _ => Action::None,
        }
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        let code = key.code;
        // In help mode, only the help key and Esc dismiss, everything else is ignored
        if code == self.keybinds.help || code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    pub fn dispatch(&mut self, action: Action) {
        let count = self.processes.len();
        match action {
            Action::Quit => self.running = false,
            Action::Navigate(direction) => match direction {
                Direction::Up => self.pager.scroll(-1, count),
                Direction::Down => self.pager.scroll(1, count),
                Direction::PageUp => self.pager.page(-1, count),
                Direction::PageDown => self.pager.page(1, count),
                Direction::Home => self.pager.home(count),
                Direction::End => self.pager.end(count),
            },
            Action::ToggleSort => {
                self.sort_metric = self.sort_metric.toggle();
                let processes = std::mem::take(&mut self.processes);
                self.rank_keeping_selection(processes);
            }
            Action::CycleRefreshInterval => {
                let next = self
                    .refresh_presets
                    .iter()
                    .copied()
                    .find(|&d| d > self.refresh_interval)
                    .unwrap_or(self.refresh_presets[0]);
                self.set_refresh_interval(next);
            }
            Action::SlowerRefresh => {
                if let Some(next) = self
                    .refresh_presets
                    .iter()
                    .copied()
                    .find(|&d| d > self.refresh_interval)
                {
                    self.set_refresh_interval(next);
                }
            }
            Action::FasterRefresh => {
                if let Some(next) = self
                    .refresh_presets
                    .iter()
                    .copied()
                    .rev()
                    .find(|&d| d < self.refresh_interval)
                {
                    self.set_refresh_interval(next);
                }
            }
            Action::Kill(pid) => {
                if pid != 0 {
                    let result = kill_process(pid, Signal::Term);
                    self.set_kill_status(result);
                }
            }
            Action::ForceKill(pid) => {
                if pid != 0 {
                    let result = kill_process(pid, Signal::Kill);
                    self.set_kill_status(result);
                }
            }
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::None => {}
        }
    }

    fn set_refresh_interval(&mut self, interval: Duration) {
        self.refresh_interval = interval;
        let label = format_interval(interval.as_millis() as u64);
        info!(interval = %label, "refresh interval changed");
        self.set_status(format!("Refresh every {label}"));
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.keybinds.help_entries()
    }

    fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    fn set_kill_status(&mut self, result: KillResult) {
        let msg = match result {
            KillResult::Success(pid, signal) => format!("Sent {signal} to PID {pid}"),
            KillResult::Failed(_, err) => err,
            KillResult::NotFound(pid) => format!("Process {pid} not found"),
        };
        info!(%msg, "kill requested");
        self.set_status(msg);
    }
}

fn sample(source: &mut dyn CounterSource) -> Result<(SystemSample, ProcessSet)> {
    let system = source.sample_system()?;
    let processes = source.sample_processes()?;
    Ok((system, processes))
}
