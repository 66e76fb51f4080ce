//! Gauge and histogram widgets.

use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, Paragraph},
    Frame,
};

use super::theme::Theme;
use crate::data::HistogramSeries;

/// Columns per bar: an `HH:MM` label plus a one-column gap.
const BAR_WIDTH: u16 = 5;
const BAR_GAP: u16 = 1;

/// Render a usage gauge.
///
/// `value` and `complement` are shown as given; only the filled ratio is
/// clamped to the gauge's 0..=100 range.
pub fn render_gauge(
    frame: &mut Frame,
    theme: &Theme,
    area: Rect,
    label: &str,
    value: f64,
    complement: f64,
) {
    let block = Block::default()
        .title(format!(" {} ", label))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border));

    let gauge = Gauge::default()
        .block(block)
        .gauge_style(theme.usage_style(value))
        .ratio(gauge_ratio(value))
        .label(format!("{:.1}% used / {:.1}% free", value, complement));

    frame.render_widget(gauge, area);
}

/// Render a series of raw readings as bars, newest on the right.
///
/// When the series is wider than the area, the oldest bars are dropped.
pub fn render_histogram(
    frame: &mut Frame,
    theme: &Theme,
    area: Rect,
    label: &str,
    series: &HistogramSeries,
) {
    let block = Block::default()
        .title(format!(" {} ", label))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border));

    if series.is_empty() {
        let paragraph = Paragraph::new(" No data").block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2);
    let start = series.len().saturating_sub(visible_bars(inner_width));

    let bars: Vec<Bar> = series.labels[start..]
        .iter()
        .zip(&series.values[start..])
        .map(|(label, value)| {
            Bar::default()
                .value(bar_height(*value))
                .text_value(format!("{:.0}", value))
                .label(Line::from(label.clone()))
                .style(Style::default().fg(theme.bar))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .bar_width(BAR_WIDTH)
        .bar_gap(BAR_GAP)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

fn gauge_ratio(value: f64) -> f64 {
    if value.is_finite() {
        (value / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Bars are integer heights; readings are scaled by 10 to keep one decimal.
fn bar_height(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        (value * 10.0).round() as u64
    } else {
        0
    }
}

fn visible_bars(width: u16) -> usize {
    ((width + BAR_GAP) / (BAR_WIDTH + BAR_GAP)).max(1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_gauge_ratio_clamped() {
        assert_eq!(gauge_ratio(55.0), 0.55);
        assert_eq!(gauge_ratio(-3.0), 0.0);
        assert_eq!(gauge_ratio(130.0), 1.0);
        assert_eq!(gauge_ratio(f64::NAN), 0.0);
    }

    #[test]
    fn test_bar_height() {
        assert_eq!(bar_height(42.25), 423);
        assert_eq!(bar_height(-1.0), 0);
    }

    #[test]
    fn test_visible_bars() {
        assert_eq!(visible_bars(0), 1);
        assert_eq!(visible_bars(5), 1);
        assert_eq!(visible_bars(11), 2);
        assert_eq!(visible_bars(60), 10);
    }

    #[test]
    fn test_render_gauge_shows_unclamped_values() {
        let mut terminal = Terminal::new(TestBackend::new(50, 3)).unwrap();
        terminal
            .draw(|frame| {
                render_gauge(frame, &Theme::dark(), frame.area(), "CPU", 120.0, -20.0);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("120.0% used / -20.0% free"));
    }

    #[test]
    fn test_render_histogram_keeps_newest_bars() {
        let series = HistogramSeries {
            labels: (0..20).map(|i| format!("00:{:02}", i)).collect(),
            values: (0..20).map(f64::from).collect(),
        };
        let mut terminal = Terminal::new(TestBackend::new(20, 10)).unwrap();
        terminal
            .draw(|frame| {
                render_histogram(frame, &Theme::dark(), frame.area(), "RAM", &series);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("00:19"));
        assert!(!text.contains("00:00"));
    }
}
