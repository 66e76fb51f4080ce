//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

/// Usage percentage at which a gauge turns to the warning color.
pub const USAGE_WARNING: f64 = 70.0;
/// Usage percentage at which a gauge turns to the critical color.
pub const USAGE_CRITICAL: f64 = 90.0;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Gauge color between the warning and critical thresholds.
    pub warning: Color,
    /// Gauge color above the critical threshold, and error text.
    pub critical: Color,
    /// Gauge color below the warning threshold.
    pub healthy: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Histogram bars.
    pub bar: Color,
    /// Coastlines on the map.
    pub land: Color,
    /// Map markers and their labels.
    pub marker: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            bar: Color::Cyan,
            land: Color::DarkGray,
            marker: Color::LightRed,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            bar: Color::Blue,
            land: Color::Gray,
            marker: Color::Red,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a usage percentage
    pub fn usage_style(&self, value: f64) -> Style {
        if value < USAGE_WARNING {
            Style::default().fg(self.healthy)
        } else if value < USAGE_CRITICAL {
            Style::default().fg(self.warning)
        } else {
            Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_style_thresholds() {
        let theme = Theme::dark();
        assert_eq!(theme.usage_style(0.0).fg, Some(Color::Green));
        assert_eq!(theme.usage_style(69.9).fg, Some(Color::Green));
        assert_eq!(theme.usage_style(70.0).fg, Some(Color::Yellow));
        assert_eq!(theme.usage_style(90.0).fg, Some(Color::Red));
        assert_eq!(theme.usage_style(140.0).fg, Some(Color::Red));
    }
}
