//! Common UI components shared across tabs.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_duration;
use crate::data::MetricCategory;
use crate::source::Contract;

/// Tab title, e.g. "3:AirQ".
fn tab_title(category: MetricCategory) -> String {
    format!("{}:{}", category.index() + 1, category.short_label())
}

/// Which tab sits under `column` of the tab bar, if any.
///
/// Mirrors the [`Tabs`] layout: one column of padding either side of each
/// title and a one-column divider between tabs.
pub fn tab_at_column(column: u16) -> Option<MetricCategory> {
    let mut start = 0u16;
    for category in MetricCategory::ALL {
        let width = tab_title(category).chars().count() as u16 + 2;
        if column < start + width {
            return Some(category);
        }
        start += width + 1;
        if column < start {
            return None;
        }
    }
    None
}

/// Render the header bar with the latest device readings.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = Span::styled(" SYSMON ", Style::default().add_modifier(Modifier::BOLD));

    if app.controller.last_updated().is_none() {
        let line = Line::from(vec![
            title,
            Span::raw(format!("│ {} │ Loading...", app.source_description())),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let view = app.view();
    let cpu = view.gauge_value(MetricCategory::CpuUsage);
    let ram = view.gauge_value(MetricCategory::RamUsage);

    let line = Line::from(vec![
        title,
        Span::raw("│ CPU "),
        Span::styled(format!("{:.1}%", cpu), app.theme.usage_style(cpu)),
        Span::raw(" RAM "),
        Span::styled(format!("{:.1}%", ram), app.theme.usage_style(ram)),
        Span::raw(format!(
            " │ {} device rows │ {} weather obs │ {}",
            app.controller.store().device_metrics().len(),
            app.controller.store().weather_count(),
            app.source_description(),
        )),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar, one tab per metric category.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = MetricCategory::ALL
        .into_iter()
        .map(|c| Line::from(tab_title(c)))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.active_tab().index())
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows a temporary status message if there is one, otherwise the last
/// fetch error or the time since the last successful update.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(err) = app.controller.last_error() {
        let paragraph = Paragraph::new(format!(" Error: {} | r:retry q:quit", err))
            .style(Style::default().fg(app.theme.critical));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = if app.active_tab().is_device() {
        "n/p:page j/k:row Tab:switch ?:help q:quit"
    } else {
        "w:reload Tab:switch ?:help q:quit"
    };

    let page = match app.controller.contract() {
        Contract::Paged if app.active_tab().is_device() => {
            format!(" | page {}", app.controller.pagination().current_page())
        }
        _ => String::new(),
    };

    let status = match app.controller.last_updated() {
        Some(at) => format!(
            " {} | Updated {:.1}s ago | every {}{} | {}",
            app.active_tab().label(),
            at.elapsed().as_secs_f64(),
            format_duration(app.refresh_interval()),
            page,
            controls,
        ),
        None => " Loading... | q:quit".to_string(),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current tab.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Tabs"),
        Line::from("  Tab/S-Tab h/l  Next/previous tab"),
        Line::from("  1-9            Jump to tab"),
        Line::from("  click          Select tab"),
        Line::from(""),
        section(" Device tabs"),
        Line::from("  n/p PgDn/PgUp  Next/previous page"),
        Line::from("  j/k ↑/↓        Select row"),
        Line::from(""),
        section(" Weather tabs"),
        Line::from("  w              Reload observations"),
        Line::from(""),
        section(" General"),
        Line::from("  r              Refresh now"),
        Line::from("  x              Start data collection"),
        Line::from("  e              Export to JSON"),
        Line::from("  q              Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 24u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
