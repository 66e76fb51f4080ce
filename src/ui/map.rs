//! World map with weather observation markers.

use ratatui::{
    layout::Rect,
    style::{Style, Stylize},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        Block, Borders,
    },
    Frame,
};

use super::theme::Theme;
use crate::data::MapMarker;

/// Map centre when there is nothing to show (longitude, latitude).
pub const DEFAULT_CENTER: (f64, f64) = (-8.24, 53.41);

/// Degrees shown around the default centre, and the minimum view span.
const DEFAULT_SPAN: (f64, f64) = (12.0, 8.0);

/// Degrees of padding around the outermost markers.
const PADDING: f64 = 1.0;

/// Visible `[x, y]` bounds (longitude, latitude) for a set of markers.
///
/// Fits all markers with some padding. With no markers the view is centred
/// on [`DEFAULT_CENTER`].
pub fn map_bounds(markers: &[MapMarker]) -> ([f64; 2], [f64; 2]) {
    let points = markers
        .iter()
        .filter(|m| m.longitude.is_finite() && m.latitude.is_finite());

    let mut extent: Option<(f64, f64, f64, f64)> = None;
    for m in points {
        extent = Some(match extent {
            None => (m.longitude, m.longitude, m.latitude, m.latitude),
            Some((x0, x1, y0, y1)) => (
                x0.min(m.longitude),
                x1.max(m.longitude),
                y0.min(m.latitude),
                y1.max(m.latitude),
            ),
        });
    }

    let (cx, cy, half_w, half_h) = match extent {
        None => (
            DEFAULT_CENTER.0,
            DEFAULT_CENTER.1,
            DEFAULT_SPAN.0 / 2.0,
            DEFAULT_SPAN.1 / 2.0,
        ),
        Some((x0, x1, y0, y1)) => (
            (x0 + x1) / 2.0,
            (y0 + y1) / 2.0,
            ((x1 - x0) / 2.0 + PADDING).max(DEFAULT_SPAN.0 / 2.0),
            ((y1 - y0) / 2.0 + PADDING).max(DEFAULT_SPAN.1 / 2.0),
        ),
    };

    (
        [(cx - half_w).max(-180.0), (cx + half_w).min(180.0)],
        [(cy - half_h).max(-90.0), (cy + half_h).min(90.0)],
    )
}

/// Render markers on a world map, each labelled with its value.
pub fn render_markers(
    frame: &mut Frame,
    theme: &Theme,
    area: Rect,
    label: &str,
    markers: &[MapMarker],
) {
    let block = Block::default()
        .title(format!(" {} ({} stations) ", label, markers.len()))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border));

    let (x_bounds, y_bounds) = map_bounds(markers);
    let coords: Vec<(f64, f64)> = markers.iter().map(|m| (m.longitude, m.latitude)).collect();

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            ctx.draw(&Map {
                color: theme.land,
                resolution: MapResolution::High,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &coords,
                color: theme.marker,
            });
            for m in markers {
                ctx.print(
                    m.longitude,
                    m.latitude,
                    Span::from(format!(" {:.1}", m.value)).fg(theme.marker),
                );
            }
        });

    frame.render_widget(canvas, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(longitude: f64, latitude: f64) -> MapMarker {
        MapMarker {
            latitude,
            longitude,
            name: "Station".to_string(),
            value: 1.0,
        }
    }

    fn approx(a: [f64; 2], b: [f64; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-9 && (a[1] - b[1]).abs() < 1e-9
    }

    #[test]
    fn test_bounds_default_to_center() {
        let (x, y) = map_bounds(&[]);
        assert!(approx(x, [-14.24, -2.24]));
        assert!(approx(y, [49.41, 57.41]));
    }

    #[test]
    fn test_bounds_contain_markers() {
        let markers = [marker(-8.2, 53.1), marker(-30.0, 60.0), marker(2.0, 40.0)];
        let (x, y) = map_bounds(&markers);
        for m in &markers {
            assert!(x[0] < m.longitude && m.longitude < x[1]);
            assert!(y[0] < m.latitude && m.latitude < y[1]);
        }
    }

    #[test]
    fn test_bounds_clamped_to_world() {
        let (x, y) = map_bounds(&[marker(179.5, 89.5), marker(-179.5, -89.5)]);
        assert_eq!(x, [-180.0, 180.0]);
        assert_eq!(y, [-90.0, 90.0]);
    }

    #[test]
    fn test_bounds_ignore_non_finite() {
        assert_eq!(map_bounds(&[marker(f64::NAN, 10.0)]), map_bounds(&[]));
    }
}
