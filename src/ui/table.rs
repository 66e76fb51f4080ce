//! Device-metric table.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::theme::Theme;
use crate::data::{table_rows, DeviceMetricRecord, Pagination};

/// Render device metric records as a table.
///
/// With `pagination`, only the current page of `records` is shown and the
/// title carries the page position; without it every record is shown.
/// `selected` indexes into the visible rows.
pub fn render_table_rows(
    frame: &mut Frame,
    theme: &Theme,
    area: Rect,
    records: &[DeviceMetricRecord],
    pagination: Option<&Pagination>,
    selected: Option<usize>,
) {
    let title = match pagination {
        Some(p) => format!(
            " Device Metrics (page {}/{}) ",
            p.current_page(),
            p.page_count(records.len())
        ),
        None => format!(" Device Metrics ({} rows) ", records.len()),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border));

    let rows = table_rows(records, pagination);
    if rows.is_empty() {
        let paragraph = Paragraph::new(" No device metrics")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec!["Device", "Metric", "Value", "Timestamp"])
        .style(theme.header);

    let body: Vec<Row> = rows
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.device_id.clone()),
                Cell::from(r.metric_id.clone()),
                Cell::from(format!("{:.2}", r.value)).style(theme.usage_style(r.value)),
                Cell::from(r.timestamp.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(12),
        Constraint::Min(12),
        Constraint::Length(10),
        Constraint::Min(20),
    ];

    let table = Table::new(body, widths)
        .header(header)
        .block(block)
        .row_highlight_style(theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(selected.filter(|i| *i < rows.len()));

    frame.render_stateful_widget(table, area, &mut state);
}
