use std::cmp::Ordering;

use crate::system::process::AccountedProcess;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMetric {
    #[default]
    Cpu,
    Memory,
}

impl SortMetric {
    pub fn toggle(self) -> Self {
        match self {
            SortMetric::Cpu => SortMetric::Memory,
            SortMetric::Memory => SortMetric::Cpu,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMetric::Cpu => "CPU",
            SortMetric::Memory => "Memory",
        }
    }

    pub fn from_str_config(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "mem" | "memory" => SortMetric::Memory,
            _ => SortMetric::Cpu,
        }
    }

    fn value(self, process: &AccountedProcess) -> f64 {
        match self {
            SortMetric::Cpu => process.cpu_percent,
            SortMetric::Memory => process.memory_percent,
        }
    }
}

/// Descending by `metric`. The sort is stable, so equal values keep the
/// order they came in (pid order when fed straight from the accountant).
pub fn rank(mut processes: Vec<AccountedProcess>, metric: SortMetric) -> Vec<AccountedProcess> {
    processes.sort_by(|a, b| {
        metric
            .value(b)
            .partial_cmp(&metric.value(a))
            .unwrap_or(Ordering::Equal)
    });
    processes
}

/// A scrollable window `[offset, offset + page_size)` with a selected row.
///
/// After every operation `offset <= count.saturating_sub(page_size)`, the
/// selection is a valid index (or 0 for an empty list) and lies inside the
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    offset: usize,
    selected: usize,
    page_size: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Pager {
            offset: 0,
            selected: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, page_size: usize, count: usize) {
        self.page_size = page_size.max(1);
        self.clamp(count);
    }

    pub fn clamp(&mut self, count: usize) {
        if count == 0 {
            self.offset = 0;
            self.selected = 0;
            return;
        }
        self.selected = self.selected.min(count - 1);
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + self.page_size {
            self.offset = self.selected + 1 - self.page_size;
        }
        self.offset = self.offset.min(count.saturating_sub(self.page_size));
    }

    pub fn scroll(&mut self, delta: isize, count: usize) {
        self.selected = if delta < 0 {
            self.selected.saturating_sub(delta.unsigned_abs())
        } else {
            self.selected.saturating_add(delta as usize)
        };
        self.clamp(count);
    }

    pub fn page(&mut self, pages: isize, count: usize) {
        self.scroll(pages.saturating_mul(self.page_size as isize), count);
    }

    pub fn home(&mut self, count: usize) {
        self.selected = 0;
        self.clamp(count);
    }

    pub fn end(&mut self, count: usize) {
        self.selected = count.saturating_sub(1);
        self.clamp(count);
    }

    /// Moves the selection to `index` without other changes.
    pub fn select(&mut self, index: usize, count: usize) {
        self.selected = index;
        self.clamp(count);
    }

    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset.min(items.len());
        let end = start.saturating_add(self.page_size).min(items.len());
        &items[start..end]
    }

    /// Selected row relative to the window start.
    pub fn selected_in_window(&self) -> usize {
        self.selected - self.offset
    }
}
