use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Clear, Row, Table};

use crate::ui::theme::Theme;

const KEY_COLUMN: u16 = 11;

pub fn render(frame: &mut Frame, area: Rect, entries: &[(String, &str)], theme: &Theme) {
    let width = 46u16.min(area.width.saturating_sub(4));
    // entries plus the two border rows
    let height = (entries.len() as u16)
        .saturating_add(2)
        .min(area.height.saturating_sub(2));
    let [band] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [overlay] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(band);

    frame.render_widget(Clear, overlay);

    let key_style = Style::default()
        .fg(theme.pill_key_fg)
        .bg(theme.pill_key_bg)
        .add_modifier(Modifier::BOLD);
    let rows = entries.iter().map(|(key, desc)| {
        Row::new([
            Cell::from(Line::from(format!("{key} ")).alignment(Alignment::Right)).style(key_style),
            Cell::from(*desc).style(Style::default().fg(theme.pill_desc_fg)),
        ])
    });

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Line::styled(
            " Keys ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(" Esc closes ").alignment(Alignment::Right));

    let table = Table::new(rows, [Constraint::Length(KEY_COLUMN), Constraint::Fill(1)])
        .column_spacing(2)
        .block(block)
        .style(Style::default().bg(theme.surface_bg));
    frame.render_widget(table, overlay);
}
