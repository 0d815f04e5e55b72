use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

use crate::format::{format_interval, format_kb};
use crate::rank::SortMetric;
use crate::system::snapshot::SystemSample;
use crate::ui::theme::Theme;

pub struct HeaderInfo<'a> {
    pub system: &'a SystemSample,
    pub system_cpu_percent: f64,
    pub process_count: usize,
    pub sort_metric: SortMetric,
    pub refresh_interval: Duration,
}

pub fn render(frame: &mut Frame, area: Rect, info: &HeaderInfo, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    render_summary(frame, chunks[0], info, theme);
    render_ram_gauge(frame, chunks[1], info.system, theme);
    render_cpu_gauge(frame, chunks[2], info, theme);
}

fn bordered(theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
}

fn titled(title: String, theme: &Theme) -> Block<'static> {
    bordered(theme).title(Span::styled(
        title,
        Style::default()
            .fg(theme.text_secondary)
            .add_modifier(Modifier::BOLD),
    ))
}

fn render_summary(frame: &mut Frame, area: Rect, info: &HeaderInfo, theme: &Theme) {
    let block = bordered(theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let secondary = Style::default().fg(theme.text_secondary);
    let line = Line::from(vec![
        Span::styled(
            " sysmon ",
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  Procs: {}", info.process_count), secondary),
        Span::styled(format!("  CPUs: {}", info.system.cpu_count), secondary),
        Span::styled(
            format!("  Sort: {}", info.sort_metric.label()),
            Style::default().fg(theme.accent),
        ),
        Span::styled(
            format!(
                "  Every {}",
                format_interval(info.refresh_interval.as_millis() as u64)
            ),
            secondary,
        ),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

fn render_ram_gauge(frame: &mut Frame, area: Rect, system: &SystemSample, theme: &Theme) {
    let used = system.used_memory_kb();
    let ratio = if system.total_memory_kb > 0 {
        (used as f64 / system.total_memory_kb as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let gauge = Gauge::default()
        .block(titled(" RAM ".to_string(), theme))
        .gauge_style(
            Style::default()
                .fg(theme.gauge_filled)
                .bg(theme.gauge_unfilled),
        )
        .ratio(ratio)
        .label(format!(
            "{}/{} ({:.0}%)",
            format_kb(used),
            format_kb(system.total_memory_kb),
            ratio * 100.0
        ));
    frame.render_widget(gauge, area);
}

fn render_cpu_gauge(frame: &mut Frame, area: Rect, info: &HeaderInfo, theme: &Theme) {
    let ratio = (info.system_cpu_percent / 100.0).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(titled(" CPU ".to_string(), theme))
        .gauge_style(
            Style::default()
                .fg(theme.gauge_filled)
                .bg(theme.gauge_unfilled),
        )
        .ratio(ratio)
        .label(format!("{:.1}%", info.system_cpu_percent));
    frame.render_widget(gauge, area);
}
