//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use serde_json::{json, Value};

use crate::data::{MetricCategory, ViewModel};
use crate::poller::{PollHandle, PollingController, Update};
use crate::ui::Theme;

/// How long a status message stays visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    // Metrics, active tab, pagination
    pub controller: PollingController,
    source_description: String,
    refresh_interval: Duration,

    // Table navigation
    pub selected_row: usize,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App around a controller.
    pub fn new(
        controller: PollingController,
        source_description: impl Into<String>,
        refresh_interval: Duration,
        theme: Theme,
    ) -> Self {
        Self {
            running: true,
            show_help: false,
            controller,
            source_description: source_description.into(),
            refresh_interval,
            selected_row: 0,
            theme,
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        &self.source_description
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    pub fn active_tab(&self) -> MetricCategory {
        self.controller.active_tab()
    }

    pub fn view(&self) -> ViewModel<'_> {
        self.controller.view()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Apply an update from the poller.
    pub fn apply_update(&mut self, update: Update) {
        if self.controller.apply(update) {
            self.clamp_selection();
        }
        if let Some(notice) = self.controller.take_notice() {
            self.set_status_message(notice);
        }
    }

    /// Exchange pending updates and commands with the poller.
    pub fn pump(&mut self, poller: &mut PollHandle) {
        while let Some(update) = poller.try_recv() {
            self.apply_update(update);
        }
        for command in self.controller.take_commands() {
            if !poller.send(command) {
                tracing::error!("Poller stopped; dropping command");
            }
        }
    }

    /// Queue an immediate fetch-and-ingest cycle.
    pub fn refresh(&mut self) {
        self.controller.refresh();
        self.set_status_message("Refreshing...".to_string());
    }

    /// Switch to the next tab.
    pub fn next_tab(&mut self) {
        self.controller.next_tab();
    }

    /// Switch to the previous tab.
    pub fn prev_tab(&mut self) {
        self.controller.prev_tab();
    }

    /// Switch to a specific tab.
    pub fn set_tab(&mut self, category: MetricCategory) {
        self.controller.select_tab(category);
    }

    /// Re-fetch the weather data shown on the active tab.
    pub fn reload_weather(&mut self) {
        let category = self.active_tab();
        if category.is_weather() {
            self.controller.change_weather_type(category);
            self.set_status_message(format!("Fetching {}...", category.label()));
        }
    }

    /// Move the device table by `delta` pages.
    pub fn change_page(&mut self, delta: i64) {
        self.controller.change_page(delta);
        self.selected_row = 0;
    }

    /// Ask the backend to start data collection.
    pub fn start_collection(&mut self) {
        self.controller.start_collection();
    }

    /// Move selection down by one row within the current page.
    pub fn select_next(&mut self) {
        let max = self.controller.table_rows().len().saturating_sub(1);
        self.selected_row = (self.selected_row + 1).min(max);
    }

    /// Move selection up by one row.
    pub fn select_prev(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let len = self.controller.table_rows().len();
        if self.selected_row >= len {
            self.selected_row = len.saturating_sub(1);
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current dashboard state to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        if self.controller.last_updated().is_none() {
            anyhow::bail!("No data to export");
        }
        let json = serde_json::to_string_pretty(&summary_json(&self.controller))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Everything the dashboard would render, as JSON.
pub fn summary_json(controller: &PollingController) -> Value {
    let view = controller.view();

    let mut devices = serde_json::Map::new();
    for category in MetricCategory::ALL.into_iter().filter(|c| c.is_device()) {
        let series = view.histogram_series(category);
        devices.insert(
            category.as_param().to_string(),
            json!({
                "gauge": view.gauge_value(category),
                "complement": view.gauge_complement(category),
                "samples": series.len(),
            }),
        );
    }

    let mut weather = serde_json::Map::new();
    for category in MetricCategory::WEATHER {
        let markers: Vec<Value> = view
            .map_markers(category)
            .into_iter()
            .map(|m| {
                json!({
                    "name": m.name,
                    "value": m.value,
                    "latitude": m.latitude,
                    "longitude": m.longitude,
                })
            })
            .collect();
        weather.insert(category.as_param().to_string(), Value::Array(markers));
    }

    json!({
        "contract": controller.contract().to_string(),
        "active_tab": controller.active_tab().as_param(),
        "devices": devices,
        "weather": weather,
        "table": {
            "page": controller.pagination().current_page(),
            "rows": controller.table_rows(),
        },
        "last_error": controller.last_error(),
    })
}
