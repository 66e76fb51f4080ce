//! Layered configuration.
//!
//! Settings are resolved from, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. a TOML file (`--config <path>`, or `sysmon-dash.toml` in the working
//!    directory if present)
//! 3. `SYSMON_*` environment variables (e.g. `SYSMON_BASE_URL`)
//! 4. command-line flags
//!
//! ```toml
//! base_url = "http://localhost:5000"
//! contract = "paged"
//! refresh = "30s"
//! page_size = 10
//! collection_url = "http://localhost:5000/api/start_collection"
//! cpu_metric_id = "cpu_usage"
//! ram_metric_id = "ram_usage"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::data::duration::parse_duration;
use crate::data::DeviceMetricIds;
use crate::source::Contract;

const DEFAULT_CONFIG_NAME: &str = "sysmon-dash";

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub contract: Option<Contract>,
    pub refresh: Option<String>,
    pub page_size: Option<usize>,
    pub log_file: Option<PathBuf>,
}

/// Resolved, validated settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub contract: Contract,
    pub refresh: Duration,
    pub request_timeout: Duration,
    pub page_size: usize,
    pub collection_url: Option<String>,
    pub metric_ids: DeviceMetricIds,
    pub log_file: PathBuf,
}

/// Settings as they come out of the config layers, before validation.
#[derive(Debug, Deserialize)]
struct RawSettings {
    base_url: String,
    contract: String,
    refresh: String,
    request_timeout: String,
    page_size: u64,
    #[serde(default)]
    collection_url: Option<String>,
    cpu_metric_id: String,
    ram_metric_id: String,
    log_file: String,
}

impl Settings {
    /// Load settings from every layer.
    pub fn load(config_path: Option<&Path>, overrides: &CliOverrides) -> Result<Self> {
        Self::load_from(config_path, overrides, Environment::with_prefix("SYSMON"))
    }

    fn load_from(
        config_path: Option<&Path>,
        overrides: &CliOverrides,
        env: Environment,
    ) -> Result<Self> {
        let mut builder = defaults()?;

        builder = match config_path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        let raw: RawSettings = builder
            .add_source(env)
            .set_override_option("base_url", overrides.base_url.clone())?
            .set_override_option("contract", overrides.contract.map(|c| c.to_string()))?
            .set_override_option("refresh", overrides.refresh.clone())?
            .set_override_option("page_size", overrides.page_size.map(|n| n as u64))?
            .set_override_option(
                "log_file",
                overrides
                    .log_file
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            )?
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        Self::resolve(raw)
    }

    fn resolve(raw: RawSettings) -> Result<Self> {
        let contract: Contract = raw.contract.parse().map_err(anyhow::Error::msg)?;

        let refresh = parse_duration(&raw.refresh)
            .with_context(|| format!("Invalid refresh interval: {}", raw.refresh))?;
        if refresh.is_zero() {
            bail!("Refresh interval must be greater than zero");
        }

        let request_timeout = parse_duration(&raw.request_timeout)
            .with_context(|| format!("Invalid request timeout: {}", raw.request_timeout))?;

        if raw.page_size == 0 {
            bail!("Page size must be at least 1");
        }

        let collection_url = raw.collection_url.filter(|url| !url.trim().is_empty());

        Ok(Self {
            base_url: raw.base_url,
            contract,
            refresh,
            request_timeout,
            page_size: raw.page_size as usize,
            collection_url,
            metric_ids: DeviceMetricIds {
                cpu: raw.cpu_metric_id,
                ram: raw.ram_metric_id,
            },
            log_file: PathBuf::from(raw.log_file),
        })
    }
}

fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>> {
    let ids = DeviceMetricIds::default();
    Ok(Config::builder()
        .set_default("base_url", "http://localhost:5000")?
        .set_default("contract", Contract::default().to_string())?
        .set_default("refresh", "60s")?
        .set_default("request_timeout", "10s")?
        .set_default("page_size", 5u64)?
        .set_default("cpu_metric_id", ids.cpu)?
        .set_default("ram_metric_id", ids.ram)?
        .set_default("log_file", "sysmon-dash.log")?)
}
