//! Polling controller state machine.

use std::collections::HashMap;
use std::time::Instant;

use super::{Command, Update};
use crate::data::{
    table_rows, DeviceMetricIds, DeviceMetricRecord, MetricCategory, MetricStore, Pagination,
    ViewModel,
};
use crate::source::Contract;

/// Identifies a stream of responses that supersede each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKey {
    Snapshot,
    DevicePage,
    Weather(MetricCategory),
}

/// Tracks the newest applied sequence number per request key.
#[derive(Debug, Clone, Default)]
pub struct SequenceGate {
    applied: HashMap<RequestKey, u64>,
}

impl SequenceGate {
    /// Whether a response at least as new as `seq` was already applied for `key`.
    pub fn is_stale(&self, key: RequestKey, seq: u64) -> bool {
        self.applied.get(&key).is_some_and(|&last| seq <= last)
    }

    /// Admit a response unless a newer one for the same key was already applied.
    pub fn admit(&mut self, key: RequestKey, seq: u64) -> bool {
        if self.is_stale(key, seq) {
            return false;
        }
        self.applied.insert(key, seq);
        true
    }

    pub fn last_applied(&self, key: RequestKey) -> Option<u64> {
        self.applied.get(&key).copied()
    }
}

/// Owns the metric store, the active tab and pagination, and decides when
/// to fetch.
///
/// Requests are queued as [`Command`]s and collected with
/// [`take_commands`](Self::take_commands); responses come back through
/// [`apply`](Self::apply).
#[derive(Debug)]
pub struct PollingController {
    contract: Contract,
    store: MetricStore,
    active_tab: MetricCategory,
    pagination: Pagination,
    gate: SequenceGate,
    next_seq: u64,
    outbox: Vec<Command>,
    last_updated: Option<Instant>,
    last_error: Option<String>,
    notice: Option<String>,
}

impl PollingController {
    pub fn new(contract: Contract, metric_ids: DeviceMetricIds, page_size: usize) -> Self {
        Self {
            contract,
            store: MetricStore::new(metric_ids),
            active_tab: MetricCategory::default(),
            pagination: Pagination::new(page_size),
            gate: SequenceGate::default(),
            next_seq: 0,
            outbox: Vec::new(),
            last_updated: None,
            last_error: None,
            notice: None,
        }
    }

    pub fn contract(&self) -> Contract {
        self.contract
    }

    pub fn store(&self) -> &MetricStore {
        &self.store
    }

    pub fn view(&self) -> ViewModel<'_> {
        ViewModel::new(&self.store)
    }

    pub fn active_tab(&self) -> MetricCategory {
        self.active_tab
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// When data was last ingested successfully.
    pub fn last_updated(&self) -> Option<Instant> {
        self.last_updated
    }

    /// Message of the most recent failed fetch, cleared on the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Take the pending user-facing notice (e.g. collection start result).
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Drain the queued commands.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.outbox)
    }

    /// Pagination applied to the table, `None` when the backend pages for us.
    pub fn table_pagination(&self) -> Option<&Pagination> {
        match self.contract {
            Contract::Combined => Some(&self.pagination),
            Contract::Paged => None,
        }
    }

    /// Device-metric rows for the table.
    pub fn table_rows(&self) -> &[DeviceMetricRecord] {
        table_rows(self.store.device_metrics(), self.table_pagination())
    }

    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Queue one fetch-and-ingest cycle for the configured contract.
    pub fn refresh(&mut self) {
        let seq = self.next_seq();
        let command = match self.contract {
            Contract::Combined => Command::FetchMetrics { seq },
            Contract::Paged => Command::FetchDevicePage {
                seq,
                page: self.pagination.current_page(),
                limit: self.pagination.page_size(),
            },
        };
        self.outbox.push(command);
    }

    /// Switch tabs.
    ///
    /// Cached data is re-rendered without a request. Under the paged contract
    /// an uncached weather tab triggers one on-demand fetch.
    pub fn select_tab(&mut self, category: MetricCategory) {
        self.active_tab = category;
        if category.is_weather()
            && self.contract == Contract::Paged
            && !self.store.has_weather(category)
        {
            self.request_weather(category);
        }
    }

    pub fn next_tab(&mut self) {
        self.select_tab(self.active_tab.next());
    }

    pub fn prev_tab(&mut self) {
        self.select_tab(self.active_tab.prev());
    }

    /// Show `category` and fetch it fresh, regardless of cache state.
    pub fn change_weather_type(&mut self, category: MetricCategory) {
        if !category.is_weather() {
            return;
        }
        self.active_tab = category;
        self.request_weather(category);
    }

    /// Queue weather fetches for every weather category not yet cached.
    pub fn prefetch_weather(&mut self) {
        for category in MetricCategory::WEATHER {
            if !self.store.has_weather(category) {
                self.request_weather(category);
            }
        }
    }

    fn request_weather(&mut self, category: MetricCategory) {
        let seq = self.next_seq();
        self.outbox.push(Command::FetchWeather { seq, category });
    }

    /// Move the table by `delta` pages (never below page 1).
    ///
    /// Under the combined contract the page is also capped at the last page
    /// of the cached rows. Under the paged contract every page change
    /// re-fetches, even when clamping leaves the page where it was.
    pub fn change_page(&mut self, delta: i64) {
        self.pagination.change_page(delta);

        match self.contract {
            Contract::Combined => self.clamp_to_last_page(),
            Contract::Paged => self.refresh(),
        }
    }

    fn clamp_to_last_page(&mut self) {
        let last = self.pagination.page_count(self.store.device_metrics().len());
        let current = self.pagination.current_page();
        if current > last {
            self.pagination.change_page(last as i64 - current as i64);
        }
    }

    /// Queue a request to start backend data collection.
    pub fn start_collection(&mut self) {
        self.outbox.push(Command::StartCollection);
    }

    /// Apply a message from the ticker or the fetch worker.
    ///
    /// Returns true if the store changed.
    pub fn apply(&mut self, update: Update) -> bool {
        match update {
            Update::Tick => {
                self.refresh();
                false
            }
            Update::Snapshot { seq, result } => match result {
                Ok(payload) => {
                    if !self.admit(RequestKey::Snapshot, seq) {
                        return false;
                    }
                    tracing::debug!(
                        seq,
                        device = payload.device_metrics.len(),
                        weather = payload.third_party_metrics.len(),
                        "Ingesting metrics snapshot"
                    );
                    // Weather fetched on demand after this snapshot was requested survives it
                    let newer_weather: Vec<_> = MetricCategory::WEATHER
                        .into_iter()
                        .filter(|c| {
                            self.gate
                                .last_applied(RequestKey::Weather(*c))
                                .is_some_and(|applied| applied > seq)
                        })
                        .map(|c| (c, self.store.query_weather(c).to_vec()))
                        .collect();

                    self.store.ingest_device_metrics(payload.device_metrics);
                    self.store.ingest_weather_metrics(payload.third_party_metrics);
                    for (category, records) in newer_weather {
                        self.store.cache_weather(category, records);
                    }
                    if self.contract == Contract::Combined {
                        self.clamp_to_last_page();
                    }
                    self.mark_updated();
                    true
                }
                Err(e) => {
                    self.record_failure(RequestKey::Snapshot, seq, "metrics", e.to_string());
                    false
                }
            },
            Update::DevicePage { seq, page, result } => match result {
                Ok(body) => {
                    if !self.admit(RequestKey::DevicePage, seq) {
                        return false;
                    }
                    tracing::debug!(seq, page, rows = body.device_metrics.len(), "Ingesting device page");
                    self.store.ingest_device_metrics(body.device_metrics);
                    self.mark_updated();
                    true
                }
                Err(e) => {
                    self.record_failure(RequestKey::DevicePage, seq, "device metrics", e.to_string());
                    false
                }
            },
            Update::Weather { seq, category, result } => match result {
                Ok(body) => {
                    if !self.admit(RequestKey::Weather(category), seq) {
                        return false;
                    }
                    tracing::debug!(seq, %category, rows = body.weather_data.len(), "Caching weather data");
                    self.store.cache_weather(category, body.weather_data);
                    self.mark_updated();
                    true
                }
                Err(e) => {
                    self.record_failure(
                        RequestKey::Weather(category),
                        seq,
                        "weather data",
                        e.to_string(),
                    );
                    false
                }
            },
            Update::Collection { result } => {
                match result {
                    Ok(()) => {
                        tracing::info!("Data collection started");
                        self.notice = Some("Data collection started".to_string());
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to start data collection");
                        self.notice = Some(format!("Failed to start data collection: {}", e));
                    }
                }
                false
            }
        }
    }

    /// A weather response is also stale once a newer snapshot has replaced
    /// the whole weather cache.
    fn is_stale(&self, key: RequestKey, seq: u64) -> bool {
        match key {
            RequestKey::Weather(_) => {
                self.gate.is_stale(key, seq) || self.gate.is_stale(RequestKey::Snapshot, seq)
            }
            RequestKey::Snapshot | RequestKey::DevicePage => self.gate.is_stale(key, seq),
        }
    }

    fn admit(&mut self, key: RequestKey, seq: u64) -> bool {
        if self.is_stale(key, seq) {
            tracing::debug!(?key, seq, "Discarding stale response");
            return false;
        }
        self.gate.admit(key, seq)
    }

    fn mark_updated(&mut self) {
        self.last_updated = Some(Instant::now());
        self.last_error = None;
    }

    fn record_failure(&mut self, key: RequestKey, seq: u64, what: &str, error: String) {
        tracing::warn!(?key, seq, error = %error, "Failed to fetch {}", what);
        if self.is_stale(key, seq) {
            return;
        }
        self.last_error = Some(format!("Failed to fetch {}: {}", what, error));
    }
}
