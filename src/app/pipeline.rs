//! Shared load and simulation plumbing used by both CLI and TUI front-ends.
//!
//! Load workflow: read feed -> parse rows -> derive panels. The CLI and the
//! TUI then only differ in presentation (printing vs widgets).

use crate::data::{ApiClient, read_feed};
use crate::derive::{DerivedPanels, derive_panels};
use crate::domain::DashConfig;
use crate::error::{AppError, FeedError, SimError};
use crate::io::ingest::{ParseOptions, ParsedFeed, parse_feed};
use crate::sim::{OfflineModel, SimulationBackend, SimulationRequest, SimulationResult};

/// All computed outputs of one feed load.
#[derive(Debug, Clone)]
pub struct PanelRun {
    pub feed: ParsedFeed,
    pub panels: DerivedPanels,
}

/// Read the configured feed and derive its panels.
pub fn load_panels(config: &DashConfig) -> Result<PanelRun, AppError> {
    let raw = read_feed(&config.source, config.timeout_secs)?;
    load_panels_from_raw(config, &raw)
}

/// Parse and derive an already fetched payload.
pub fn load_panels_from_raw(config: &DashConfig, raw: &str) -> Result<PanelRun, AppError> {
    let feed = parse_feed(raw, &ParseOptions::from_config(config)).inspect_err(|err| {
        if let FeedError::HeaderMismatch { missing, .. } = err {
            tracing::warn!(source = %config.source, ?missing, "feed header mismatch, no panels derived");
        }
    })?;

    if !feed.rejected.is_empty() {
        tracing::info!(rejected = feed.rejected.len(), rows = feed.rows_read, "feed rows rejected");
    }

    let panels = derive_panels(&feed.records, &config.panels, config.empty_cell);
    Ok(PanelRun { feed, panels })
}

/// Where simulations are evaluated.
pub enum Backend {
    Remote(ApiClient),
    Offline(OfflineModel),
}

impl Backend {
    /// The local model when `offline`, else the backend at `api_url` / `SDASH_API_URL`.
    pub fn connect(offline: bool, api_url: Option<String>) -> Result<Self, AppError> {
        if offline {
            return Ok(Backend::Offline(OfflineModel::default()));
        }
        Ok(Backend::Remote(ApiClient::from_env(api_url)?))
    }

    /// The HTTP client, when there is one.
    pub fn api(&self) -> Option<&ApiClient> {
        match self {
            Backend::Remote(client) => Some(client),
            Backend::Offline(_) => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Backend::Remote(client) => client.base_url().to_string(),
            Backend::Offline(_) => "offline model".to_string(),
        }
    }
}

impl SimulationBackend for Backend {
    fn simulate(&self, req: &SimulationRequest) -> Result<SimulationResult, SimError> {
        match self {
            Backend::Remote(client) => client.simulate(req),
            Backend::Offline(model) => model.simulate(req),
        }
    }
}
