use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Cell, Paragraph, Row, Table};

use crate::format::{format_cpu_time, format_kb};
use crate::rank::SortMetric;
use crate::system::process::AccountedProcess;
use crate::ui::theme::Theme;

/// Rows taken by the column header.
pub const HEADER_ROWS: u16 = 1;

const HOT_CPU_PERCENT: f64 = 50.0;

pub struct TableView<'a> {
    pub rows: &'a [AccountedProcess],
    /// Index into `rows`.
    pub selected: Option<usize>,
    pub sort_metric: SortMetric,
    pub clock_ticks: u64,
}

fn right(text: String) -> Cell<'static> {
    Cell::from(Line::from(text).alignment(Alignment::Right))
}

pub fn render(frame: &mut Frame, area: Rect, view: &TableView, theme: &Theme) {
    if view.rows.is_empty() {
        frame.render_widget(
            Paragraph::new(" No processes").style(Style::default().fg(theme.text_secondary)),
            area,
        );
        return;
    }

    let header_style = Style::default()
        .fg(theme.table_header_fg)
        .bg(theme.table_header_bg)
        .add_modifier(Modifier::BOLD);
    let sorted_style = header_style.fg(theme.sort_column_fg).add_modifier(Modifier::UNDERLINED);
    let header_cell = |label: &'static str, metric: Option<SortMetric>| {
        let style = if metric == Some(view.sort_metric) {
            sorted_style
        } else {
            header_style
        };
        Cell::from(label).style(style)
    };
    let header = Row::new(vec![
        header_cell("    PID", None),
        header_cell("S", None),
        header_cell("  CPU%", Some(SortMetric::Cpu)),
        header_cell("  MEM%", Some(SortMetric::Memory)),
        header_cell("     RSS", None),
        header_cell("    TIME+", None),
        header_cell("COMMAND", None),
    ])
    .style(header_style);

    let rows = view.rows.iter().enumerate().map(|(i, p)| {
        let mut style = Style::default().fg(theme.text_primary);
        if p.cpu_percent >= HOT_CPU_PERCENT {
            style = style.fg(theme.cpu_hot);
        }
        if view.selected == Some(i) {
            style = style
                .fg(theme.selection_fg)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD);
        }
        Row::new(vec![
            right(p.pid().to_string()),
            Cell::from(p.sample.state.to_string()),
            right(format!("{:.1}", p.cpu_percent)),
            right(format!("{:.1}", p.memory_percent)),
            right(format_kb(p.resident_memory_kb)),
            right(format_cpu_time(p.sample.cpu_time_ticks, view.clock_ticks)),
            Cell::from(p.sample.command.clone()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(7),
        Constraint::Length(1),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1);
    frame.render_widget(table, area);
}
