//! Command-line parsing for the search dashboard.
//!
//! Parsing and dispatch stay apart: this module only describes arguments,
//! `app` turns them into a `DashConfig` / `SimulationForm` and runs them.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::ChatRoute;
use crate::domain::{DateGrammar, DelimiterChoice, EmptyCell, PanelKind};
use crate::sim::EventFlag;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sdash", version, about = "Brand search-volume dashboard and ad-spend simulator")]
pub struct Cli {
    /// Debug-level logging (ignored when RUST_LOG is set).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the feed, derive panels, print summaries and optional plots/exports.
    Panels(PanelsArgs),
    /// List the feed rows that were rejected, with line and reason.
    Rejects(RejectsArgs),
    /// Run one or more simulation scenarios.
    Simulate(SimulateArgs),
    /// Ask the backend to render a report for a scenario.
    Report(ScenarioArgs),
    /// Simulate a scenario and ask the backend to interpret the outcome.
    Interpret(ScenarioArgs),
    /// Send one chat message.
    Chat(ChatArgs),
    /// Write a synthetic feed.
    Sample(SampleArgs),
    /// Launch the interactive TUI.
    ///
    /// Uses the same load pipeline as `sdash panels`, rendered with Ratatui.
    Tui(TuiArgs),
}

/// Backend connection options.
#[derive(Debug, Args, Clone, Default)]
pub struct ApiArgs {
    /// Backend base URL (default: $SDASH_API_URL, else http://localhost:5000).
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,
}

/// Feed location and parse options.
#[derive(Debug, Args, Clone)]
pub struct FeedArgs {
    /// Feed file or URL (default: $SDASH_FEED, else the backend's feed endpoint).
    #[arg(short = 'f', long, value_name = "PATH|URL")]
    pub feed: Option<String>,

    /// Field delimiter.
    #[arg(long, value_enum, default_value_t = DelimiterChoice::Auto)]
    pub delimiter: DelimiterChoice,

    /// Date grammar of the date column.
    #[arg(long, value_enum, default_value_t = DateGrammar::Auto)]
    pub date_grammar: DateGrammar,

    /// Header name of the brand column.
    #[arg(long, default_value = "brand")]
    pub brand_col: String,

    /// Header name of the date column.
    #[arg(long, default_value = "date")]
    pub date_col: String,

    /// Header name of the relative search volume column.
    #[arg(long, default_value = "search_volume_relative")]
    pub volume_col: String,

    /// Header name of the CPC column.
    #[arg(long, default_value = "cpc_est")]
    pub cpc_col: String,

    /// Header name of the ad spend column.
    #[arg(long, default_value = "ad_spend_est")]
    pub spend_col: String,

    /// Panels to derive (comma separated).
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = PanelKind::ALL)]
    pub panels: Vec<PanelKind>,

    /// Value of heatmap cells without records.
    #[arg(long, value_enum, default_value_t = EmptyCell::Null)]
    pub empty_cell: EmptyCell,

    #[command(flatten)]
    pub api: ApiArgs,
}

#[derive(Debug, Args, Clone)]
pub struct PanelsArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    /// Render ASCII plots under the summaries.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export derived panels to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,

    /// Export derived panels to long-format CSV.
    #[arg(long = "export-csv", value_name = "CSV")]
    pub export_csv: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct RejectsArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    /// Maximum rows to list.
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

/// One scenario: base and new costs plus competitor-event flags.
///
/// Costs are taken as text, like the dashboard form: thousands separators are
/// accepted and an unparseable value counts as 0.
#[derive(Debug, Args, Clone)]
pub struct ScenarioArgs {
    /// Baseline search ad cost.
    #[arg(long, default_value = "")]
    pub base_search: String,

    /// Baseline live ad cost.
    #[arg(long, default_value = "")]
    pub base_live: String,

    /// Competitor event in the baseline.
    #[arg(long, value_enum, default_value_t = EventFlag::No)]
    pub base_event: EventFlag,

    /// Scenario search ad cost.
    #[arg(long, default_value = "")]
    pub new_search: String,

    /// Scenario live ad cost.
    #[arg(long, default_value = "")]
    pub new_live: String,

    /// Competitor event in the scenario.
    #[arg(long, value_enum, default_value_t = EventFlag::No)]
    pub new_event: EventFlag,

    /// Evaluate locally with the built-in linear model instead of the backend.
    #[arg(long)]
    pub offline: bool,

    #[command(flatten)]
    pub api: ApiArgs,
}

#[derive(Debug, Args, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Further scenarios as `SEARCH:LIVE[:Y|N]`, run in order after the first.
    #[arg(long = "step", value_name = "SEARCH:LIVE[:EVENT]")]
    pub steps: Vec<String>,

    /// Print the step log as JSON instead of tables.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ChatArgs {
    /// Message text.
    pub message: String,

    /// Endpoint to use.
    #[arg(long, value_enum, default_value_t = ChatRoute::Chat)]
    pub route: ChatRoute,

    #[command(flatten)]
    pub api: ApiArgs,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Brands (comma separated).
    #[arg(long, value_delimiter = ',', default_values_t = crate::data::sample::DEFAULT_BRANDS.map(String::from))]
    pub brands: Vec<String>,

    /// First date (YYYY-MM-DD).
    #[arg(long, default_value = "2023-01-01")]
    pub start: chrono::NaiveDate,

    /// Days covered.
    #[arg(long, default_value_t = 730)]
    pub days: usize,

    /// Days between rows.
    #[arg(long, default_value_t = 7)]
    pub step_days: usize,

    /// Output file (default: stdout).
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    /// Run simulations with the built-in linear model instead of the backend.
    #[arg(long)]
    pub offline: bool,

    /// Write logs to this file while the TUI owns the terminal.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
