pub mod header;
pub mod help;
pub mod process_table;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let table_area = chunks[1];
    app.set_page_size(table_area.height.saturating_sub(process_table::HEADER_ROWS) as usize);

    header::render(
        frame,
        chunks[0],
        &header::HeaderInfo {
            system: app.system(),
            system_cpu_percent: app.system_cpu_percent,
            process_count: app.processes.len(),
            sort_metric: app.sort_metric,
            refresh_interval: app.refresh_interval,
        },
        &app.theme,
    );

    let rows = app.visible_processes();
    let selected = (!rows.is_empty()).then(|| app.pager.selected_in_window());
    process_table::render(
        frame,
        table_area,
        &process_table::TableView {
            rows,
            selected,
            sort_metric: app.sort_metric,
            clock_ticks: app.clock_ticks,
        },
        &app.theme,
    );

    statusbar::render(
        frame,
        chunks[2],
        app.status_message.as_ref(),
        &app.keybinds.statusbar_pills(),
        &app.theme,
    );

    // Help overlay is drawn last so it sits on top
    if app.show_help() {
        help::render(frame, frame.area(), &app.help_entries(), &app.theme);
    }
}
