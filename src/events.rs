use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::App;
use crate::data::MetricCategory;
use crate::ui::common::tab_at_column;

/// Screen row of the tab bar (below the one-line header).
pub const TAB_ROW: u16 = 1;

/// Where `e` writes the dashboard state.
const EXPORT_PATH: &str = "sysmon_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // Tabs
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_tab();
            } else {
                app.next_tab();
            }
        }
        KeyCode::BackTab => app.prev_tab(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_tab(),
        KeyCode::Right | KeyCode::Char('l') => app.next_tab(),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            if let Some(category) = MetricCategory::ALL.get(index) {
                app.set_tab(*category);
            }
        }

        // Device table
        KeyCode::Char('n') | KeyCode::PageDown => app.change_page(1),
        KeyCode::Char('p') | KeyCode::PageUp => app.change_page(-1),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),

        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('w') => app.reload_weather(),
        KeyCode::Char('x') => app.start_collection(),
        KeyCode::Char('?') => app.toggle_help(),

        KeyCode::Char('e') => {
            let export_path = std::path::PathBuf::from(EXPORT_PATH);
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        MouseEventKind::Down(MouseButton::Left) if mouse.row == TAB_ROW => {
            if let Some(category) = tab_at_column(mouse.column) {
                app.set_tab(category);
            }
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::data::DeviceMetricIds;
    use crate::poller::{Command, PollingController};
    use crate::source::Contract;
    use crate::ui::Theme;

    fn app(contract: Contract) -> App {
        let controller = PollingController::new(contract, DeviceMetricIds::default(), 5);
        App::new(controller, "test", Duration::from_secs(60), Theme::dark())
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn click(app: &mut App, column: u16, row: u16) {
        handle_mouse_event(
            app,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                modifiers: KeyModifiers::NONE,
            },
        );
    }

    #[test]
    fn test_number_keys_select_tabs() {
        let mut app = app(Contract::Combined);
        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.active_tab(), MetricCategory::Humidity);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.active_tab(), MetricCategory::CpuUsage);
    }

    #[test]
    fn test_tab_keys_cycle() {
        let mut app = app(Contract::Combined);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.active_tab(), MetricCategory::WindSpeed);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.active_tab(), MetricCategory::RamUsage);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = app(Contract::Combined);
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(app.running);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn test_paged_contract_page_keys_issue_fetch() {
        let mut app = app(Contract::Paged);
        press(&mut app, KeyCode::Char('n'));
        let commands = app.controller.take_commands();
        assert!(commands
            .iter()
            .any(|c| matches!(c, Command::FetchDevicePage { page: 2, limit: 5, .. })));
    }

    #[test]
    fn test_click_on_tab_bar() {
        let mut app = app(Contract::Combined);
        click(&mut app, 9, TAB_ROW);
        assert_eq!(app.active_tab(), MetricCategory::RamUsage);

        // Clicks outside the tab bar are ignored
        click(&mut app, 0, TAB_ROW + 3);
        assert_eq!(app.active_tab(), MetricCategory::RamUsage);
    }
}
