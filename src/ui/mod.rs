//! Terminal rendering.
//!
//! Each frame is rebuilt from the current [`ViewModel`](crate::data::ViewModel)
//! output, so no widget outlives the frame it was drawn in. The widget
//! functions ([`render_gauge`], [`render_histogram`], [`render_markers`],
//! [`render_table_rows`]) take plain derived data and know nothing about the
//! store or the poller.

pub mod charts;
pub mod common;
pub mod map;
pub mod table;
pub mod theme;

pub use charts::{render_gauge, render_histogram};
pub use map::render_markers;
pub use table::render_table_rows;
pub use theme::Theme;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::app::App;
use crate::data::{MapMarker, MetricCategory};

/// Render the content area for the active tab.
pub fn render_content(frame: &mut Frame, app: &App, area: Rect) {
    let category = app.active_tab();
    if category.is_device() {
        render_device_tab(frame, app, area, category);
    } else {
        render_weather_tab(frame, app, area, category);
    }
}

fn render_device_tab(frame: &mut Frame, app: &App, area: Rect, category: MetricCategory) {
    let view = app.view();
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Percentage(45),
        Constraint::Min(6),
    ])
    .split(area);

    render_gauge(
        frame,
        &app.theme,
        chunks[0],
        category.label(),
        view.gauge_value(category),
        view.gauge_complement(category),
    );
    render_histogram(
        frame,
        &app.theme,
        chunks[1],
        &format!("{} history", category.label()),
        &view.histogram_series(category),
    );
    render_table_rows(
        frame,
        &app.theme,
        chunks[2],
        app.controller.store().device_metrics(),
        app.controller.table_pagination(),
        Some(app.selected_row),
    );
}

fn render_weather_tab(frame: &mut Frame, app: &App, area: Rect, category: MetricCategory) {
    let view = app.view();
    let markers = view.map_markers(category);

    let columns =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).split(area);
    let right = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    render_markers(frame, &app.theme, columns[0], category.label(), &markers);
    render_histogram(
        frame,
        &app.theme,
        right[0],
        &format!("{} readings", category.label()),
        &view.histogram_series(category),
    );
    render_station_list(frame, app, right[1], &markers);
}

fn render_station_list(frame: &mut Frame, app: &App, area: Rect, markers: &[MapMarker]) {
    let items: Vec<ListItem> = markers
        .iter()
        .map(|m| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>8.1} ", m.value),
                    Style::default().fg(app.theme.marker),
                ),
                Span::raw(m.name.clone()),
                Span::styled(
                    format!(" ({:.2}, {:.2})", m.latitude, m.longitude),
                    Style::default().fg(app.theme.border),
                ),
            ]))
        })
        .collect();

    let block = Block::default()
        .title(" Stations ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(List::new(items).block(block), area);
}
