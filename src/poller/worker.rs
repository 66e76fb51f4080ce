//! Background ticker and fetch worker.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval, MissedTickBehavior};

use super::{Command, Update};
use crate::source::MetricsBackend;

/// Handle to the running ticker and fetch worker.
///
/// Dropping the handle (or calling [`shutdown`](Self::shutdown)) aborts the
/// ticker, the worker, and any fetch still in flight.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use sysmon_dash::poller::PollHandle;
/// use sysmon_dash::source::HttpBackend;
///
/// # tokio_test::block_on(async {
/// let backend = Arc::new(HttpBackend::builder().build().unwrap());
/// let mut poller = PollHandle::spawn(backend, Duration::from_secs(60));
/// let first = poller.recv().await; // Tick, immediately
/// poller.shutdown();
/// # });
/// ```
#[derive(Debug)]
pub struct PollHandle {
    commands: mpsc::UnboundedSender<Command>,
    updates: mpsc::UnboundedReceiver<Update>,
    ticker: JoinHandle<()>,
    worker: JoinHandle<()>,
}

impl PollHandle {
    /// Spawn the ticker and worker on the current tokio runtime.
    ///
    /// The first [`Update::Tick`] is delivered immediately, then one every
    /// `refresh`. `refresh` must be non-zero.
    pub fn spawn(backend: Arc<dyn MetricsBackend>, refresh: Duration) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        tracing::info!(
            backend = backend.description(),
            refresh_secs = refresh.as_secs_f64(),
            "Starting poller"
        );

        let ticker = tokio::spawn(run_ticker(refresh, update_tx.clone()));
        let worker = tokio::spawn(run_worker(backend, command_rx, update_tx));

        Self {
            commands: command_tx,
            updates: update_rx,
            ticker,
            worker,
        }
    }

    /// Hand a command to the worker. Returns false if the worker has stopped.
    pub fn send(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }

    /// Next update if one is ready, without blocking.
    pub fn try_recv(&mut self) -> Option<Update> {
        self.updates.try_recv().ok()
    }

    /// Wait for the next update.
    pub async fn recv(&mut self) -> Option<Update> {
        self.updates.recv().await
    }

    /// Stop the ticker and worker.
    pub fn shutdown(&self) {
        self.ticker.abort();
        self.worker.abort();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_ticker(refresh: Duration, updates: mpsc::UnboundedSender<Update>) {
    let mut ticker = interval(refresh);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if updates.send(Update::Tick).is_err() {
            break;
        }
    }
}

async fn run_worker(
    backend: Arc<dyn MetricsBackend>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    updates: mpsc::UnboundedSender<Update>,
) {
    // Dropping the set (when this task is aborted) aborts in-flight fetches
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                let backend = backend.clone();
                let updates = updates.clone();
                in_flight.spawn(async move {
                    let update = execute(backend.as_ref(), command).await;
                    let _ = updates.send(update);
                });
            }
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
        }
    }
}

/// Run a single command against the backend.
pub async fn execute(backend: &dyn MetricsBackend, command: Command) -> Update {
    match command {
        Command::FetchMetrics { seq } => Update::Snapshot {
            seq,
            result: backend.fetch_metrics().await,
        },
        Command::FetchDevicePage { seq, page, limit } => Update::DevicePage {
            seq,
            page,
            result: backend.fetch_device_page(page, limit).await,
        },
        Command::FetchWeather { seq, category } => Update::Weather {
            seq,
            category,
            result: backend.fetch_weather(category).await,
        },
        Command::StartCollection => Update::Collection {
            result: backend.start_collection().await,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::data::{MetricCategory, ThirdPartyMetricRecord};
    use crate::source::{
        DeviceMetricsPage, FetchError, MetricsPayload, WeatherDataPayload,
    };

    #[derive(Debug, Default)]
    struct MockBackend {
        metrics_calls: AtomicUsize,
        weather_calls: AtomicUsize,
    }

    #[async_trait]
    impl MetricsBackend for MockBackend {
        async fn fetch_metrics(&self) -> Result<MetricsPayload, FetchError> {
            self.metrics_calls.fetch_add(1, Ordering::SeqCst);
            Ok(MetricsPayload::default())
        }

        async fn fetch_device_page(
            &self,
            _page: usize,
            _limit: usize,
        ) -> Result<DeviceMetricsPage, FetchError> {
            Err(FetchError::Status(404))
        }

        async fn fetch_weather(
            &self,
            category: MetricCategory,
        ) -> Result<WeatherDataPayload, FetchError> {
            self.weather_calls.fetch_add(1, Ordering::SeqCst);
            Ok(WeatherDataPayload {
                weather_data: vec![ThirdPartyMetricRecord {
                    name: category.label().to_string(),
                    value: 1.0,
                    latitude: 0.0,
                    longitude: 0.0,
                    timestamp: "2025-01-01T00:00:00Z".to_string(),
                }],
            })
        }

        async fn start_collection(&self) -> Result<(), FetchError> {
            Ok(())
        }

        fn description(&self) -> &str {
            "mock"
        }
    }

    #[tokio::test]
    async fn test_execute_maps_commands_to_updates() {
        let backend = MockBackend::default();

        let update = execute(&backend, Command::FetchMetrics { seq: 3 }).await;
        assert!(matches!(update, Update::Snapshot { seq: 3, result: Ok(_) }));

        let update = execute(
            &backend,
            Command::FetchDevicePage {
                seq: 4,
                page: 2,
                limit: 5,
            },
        )
        .await;
        assert!(matches!(
            update,
            Update::DevicePage {
                seq: 4,
                page: 2,
                result: Err(FetchError::Status(404))
            }
        ));

        let update = execute(
            &backend,
            Command::FetchWeather {
                seq: 5,
                category: MetricCategory::WindSpeed,
            },
        )
        .await;
        match update {
            Update::Weather {
                seq: 5,
                category: MetricCategory::WindSpeed,
                result: Ok(body),
            } => assert_eq!(body.weather_data[0].name, "Wind Speed"),
            other => panic!("unexpected update: {:?}", other),
        }

        assert_eq!(backend.metrics_calls.load(Ordering::SeqCst), 1);
        assert_eq!(backend.weather_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_immediately_then_every_interval() {
        let backend = Arc::new(MockBackend::default());
        let mut poller = PollHandle::spawn(backend, Duration::from_secs(60));

        assert!(matches!(poller.recv().await, Some(Update::Tick)));
        assert!(poller.try_recv().is_none());

        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(matches!(poller.recv().await, Some(Update::Tick)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_ticks() {
        let backend = Arc::new(MockBackend::default());
        let mut poller = PollHandle::spawn(backend, Duration::from_secs(60));
        assert!(matches!(poller.recv().await, Some(Update::Tick)));

        poller.shutdown();

        let next = tokio::time::timeout(Duration::from_secs(300), poller.recv()).await;
        assert!(!matches!(next, Ok(Some(Update::Tick))));
    }

    #[tokio::test]
    async fn test_worker_runs_commands() {
        let backend = Arc::new(MockBackend::default());
        let mut poller = PollHandle::spawn(backend.clone(), Duration::from_secs(3600));

        assert!(poller.send(Command::FetchMetrics { seq: 1 }));

        loop {
            match poller.recv().await {
                Some(Update::Tick) => continue,
                Some(Update::Snapshot { seq, result }) => {
                    assert_eq!(seq, 1);
                    assert!(result.is_ok());
                    break;
                }
                other => panic!("unexpected update: {:?}", other),
            }
        }
        assert_eq!(backend.metrics_calls.load(Ordering::SeqCst), 1);
    }
}
