//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the real main:
//! - parses CLI arguments and sets up logging
//! - resolves the run configuration (flags, `.env`, environment)
//! - loads the feed and prints panels, plots and exports
//! - drives the simulation, report, interpretation and chat endpoints

use clap::Parser;

use crate::cli::{ChatArgs, Command, FeedArgs, PanelsArgs, RejectsArgs, SampleArgs, ScenarioArgs, SimulateArgs};
use crate::data::api::{resolve_base_url, timeout_from_env};
use crate::data::{ApiClient, SampleSpec, feed_url, generate_feed};
use crate::domain::{ColumnMap, DashConfig, FeedSource, PanelKind};
use crate::error::{AppError, EXIT_INPUT, EXIT_RUNTIME};
use crate::logging::LogTarget;
use crate::sim::{InterpretRequest, ReportRequest, Session, SimulationForm, SimulationRequest};

pub mod pipeline;

use pipeline::Backend;

/// Environment variable naming the default feed file or URL.
pub const FEED_ENV: &str = "SDASH_FEED";

/// Entry point for the `sdash` binary.
pub fn run() -> Result<(), AppError> {
    // `sdash` and `sdash --feed x.csv` behave like `sdash tui ...`; clap needs
    // the subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match &cli.command {
        Command::Tui(args) => match &args.log_file {
            Some(path) => crate::logging::init(cli.verbose, LogTarget::File(path))?,
            None => crate::logging::init(cli.verbose, LogTarget::Discard)?,
        },
        _ => crate::logging::init(cli.verbose, LogTarget::Stderr)?,
    }

    match cli.command {
        Command::Panels(args) => handle_panels(args),
        Command::Rejects(args) => handle_rejects(args),
        Command::Simulate(args) => handle_simulate(args),
        Command::Report(args) => handle_report(args),
        Command::Interpret(args) => handle_interpret(args),
        Command::Chat(args) => handle_chat(args),
        Command::Sample(args) => handle_sample(args),
        Command::Tui(args) => {
            let config = dash_config_from_args(&args.feed)?;
            let backend = Backend::connect(args.offline, args.feed.api.api_url.clone())?;
            crate::tui::run(config, backend)
        }
    }
}

fn handle_panels(args: PanelsArgs) -> Result<(), AppError> {
    let mut config = dash_config_from_args(&args.feed)?;
    config.plot = args.plot;
    config.plot_width = args.width;
    config.plot_height = args.height;
    config.export_json = args.export.clone();
    config.export_csv = args.export_csv.clone();

    let run = pipeline::load_panels(&config)?;

    println!("{}", crate::report::format_feed_summary(&config.source, &run.feed, &run.panels));
    print!("{}", crate::report::format_panels(&run.panels));

    if config.plot {
        for kind in PanelKind::ALL.into_iter().filter(|&k| run.panels.is_present(k)) {
            let plot = match kind {
                PanelKind::Share => run
                    .panels
                    .share
                    .as_ref()
                    .map(|s| crate::plot::render_share_plot(s, config.plot_width, config.plot_height)),
                PanelKind::Heatmap => run.panels.heatmap.as_ref().map(crate::plot::render_heatmap),
                _ => run.panels.brand_series(kind).map(|series| {
                    crate::plot::render_series_plot(
                        kind.title(),
                        &run.panels.universe.dates,
                        series,
                        config.plot_width,
                        config.plot_height,
                    )
                }),
            };
            if let Some(plot) = plot {
                println!("{plot}");
            }
        }
    }

    if !run.feed.rejected.is_empty() {
        println!("{} rows rejected (see `sdash rejects`).", run.feed.rejected.len());
    }

    if let Some(path) = &config.export_json {
        crate::io::export::write_panels_json(path, &config.source, &run.panels)?;
    }
    if let Some(path) = &config.export_csv {
        crate::io::export::write_panels_csv(path, &run.panels)?;
    }

    Ok(())
}

fn handle_rejects(args: RejectsArgs) -> Result<(), AppError> {
    let config = dash_config_from_args(&args.feed)?;
    let run = pipeline::load_panels(&config)?;

    println!(
        "Feed: {} | read={} | rejected={}",
        config.source,
        run.feed.rows_read,
        run.feed.rejected.len()
    );
    print!("{}", crate::report::format_rejections(&run.feed.rejected, args.limit));
    Ok(())
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let backend = Backend::connect(args.scenario.offline, args.scenario.api.api_url.clone())?;
    tracing::debug!(backend = %backend.describe(), "simulating");
    let mut session = Session::new(backend);

    let first = session.submit(&form_from_args(&args.scenario))?;
    if !args.json {
        println!("{}", crate::report::format_simulation(&first));
    }

    for step in &args.steps {
        let request = step_request(step, &first.request)?;
        let outcome = session.run(request)?;
        if !args.json {
            println!("{}", crate::report::format_simulation(&outcome));
        }
    }

    if args.json {
        let json = serde_json::to_string_pretty(session.log())
            .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to encode step log: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", crate::report::format_sim_log(session.log()));
    }

    Ok(())
}

fn handle_report(args: ScenarioArgs) -> Result<(), AppError> {
    let request = form_from_args(&args).validate()?;
    let api = remote_api(&args, "report")?;

    let url = api.generate_report(&ReportRequest::from(&request))?;
    let url = if url.starts_with('/') {
        format!("{}{url}", api.base_url())
    } else {
        url
    };
    println!("Report: {url}");
    Ok(())
}

fn handle_interpret(args: ScenarioArgs) -> Result<(), AppError> {
    let request = form_from_args(&args).validate()?;
    let api = remote_api(&args, "interpret")?;

    let mut session = Session::new(Backend::Remote(api));
    let outcome = session.run(request)?;
    println!("{}", crate::report::format_simulation(&outcome));

    let analysis = match session.backend().api() {
        Some(api) => api.interpret(&InterpretRequest::new(&outcome.request, &outcome.result))?,
        None => return Err(AppError::new(EXIT_RUNTIME, "No backend for interpretation.")),
    };
    println!("{analysis}");
    Ok(())
}

fn handle_chat(args: ChatArgs) -> Result<(), AppError> {
    let api = ApiClient::from_env(args.api.api_url.clone())?;
    let reply = api.chat(&args.message, args.route)?;

    println!("{}", reply.text);
    if let Some(result) = &reply.result {
        println!(
            "Simulated: revenue {} -> {} | ROI {:.2} -> {:.2}",
            crate::report::fmt_money(result.base_revenue),
            crate::report::fmt_money(result.new_revenue),
            result.base_roi,
            result.new_roi
        );
    }
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let spec = SampleSpec {
        brands: args.brands.clone(),
        start: args.start,
        days: args.days,
        step_days: args.step_days,
        seed: args.seed,
    };
    let feed = generate_feed(&spec)?;

    match &args.out {
        Some(path) => {
            std::fs::write(path, feed)
                .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write sample '{}': {e}", path.display())))?;
            tracing::info!(path = %path.display(), "wrote sample feed");
        }
        None => print!("{feed}"),
    }
    Ok(())
}

/// Client for endpoints that have no offline counterpart.
fn remote_api(args: &ScenarioArgs, what: &str) -> Result<ApiClient, AppError> {
    if args.offline {
        return Err(AppError::new(EXIT_INPUT, format!("`{what}` needs the backend; drop --offline.")));
    }
    ApiClient::from_env(args.api.api_url.clone())
}

pub fn form_from_args(args: &ScenarioArgs) -> SimulationForm {
    SimulationForm {
        base_search_ad_cost: args.base_search.clone(),
        base_live_ad_cost: args.base_live.clone(),
        base_competitor_event: args.base_event.as_str().to_string(),
        new_search_ad_cost: args.new_search.clone(),
        new_live_ad_cost: args.new_live.clone(),
        new_competitor_event: args.new_event.as_str().to_string(),
    }
}

/// Parse a `SEARCH:LIVE[:Y|N]` step against the first scenario's baseline.
fn step_request(step: &str, base: &SimulationRequest) -> Result<SimulationRequest, AppError> {
    let parts: Vec<&str> = step.split(':').collect();
    let (search, live, event) = match parts.as_slice() {
        [search, live] => (*search, *live, "N"),
        [search, live, event] => (*search, *live, *event),
        _ => {
            return Err(AppError::new(
                EXIT_INPUT,
                format!("Invalid --step '{step}' (expected SEARCH:LIVE[:Y|N])."),
            ));
        }
    };

    let form = SimulationForm {
        base_search_ad_cost: base.base_search_ad_cost.to_string(),
        base_live_ad_cost: base.base_live_ad_cost.to_string(),
        base_competitor_event: base.base_competitor_event.as_str().to_string(),
        new_search_ad_cost: search.to_string(),
        new_live_ad_cost: live.to_string(),
        new_competitor_event: event.to_string(),
    };
    Ok(form.validate()?)
}

/// Resolve feed flags into a run configuration.
///
/// Feed precedence: `--feed`, then `SDASH_FEED`, then the backend's feed endpoint.
pub fn dash_config_from_args(args: &FeedArgs) -> Result<DashConfig, AppError> {
    dotenvy::dotenv().ok();
    let source = match args.feed.clone().or_else(|| std::env::var(FEED_ENV).ok()) {
        Some(arg) => FeedSource::from_arg(arg.trim()),
        None => FeedSource::Url(feed_url(&resolve_base_url(args.api.api_url.clone()))),
    };

    if args.panels.is_empty() {
        return Err(AppError::new(EXIT_INPUT, "At least one panel is required."));
    }
    let mut panels = Vec::with_capacity(args.panels.len());
    for p in &args.panels {
        if !panels.contains(p) {
            panels.push(*p);
        }
    }

    Ok(DashConfig {
        source,
        columns: ColumnMap {
            brand: args.brand_col.clone(),
            date: args.date_col.clone(),
            search_volume: args.volume_col.clone(),
            cpc: args.cpc_col.clone(),
            ad_spend: args.spend_col.clone(),
        },
        delimiter: args.delimiter,
        date_grammar: args.date_grammar,
        panels,
        empty_cell: args.empty_cell,
        timeout_secs: timeout_from_env()?,
        plot: false,
        plot_width: 100,
        plot_height: 20,
        export_json: None,
        export_csv: None,
    })
}

/// Rewrite argv so `sdash` defaults to `sdash tui`.
///
/// Rules:
/// - `sdash`                      -> `sdash tui`
/// - `sdash --feed x.csv ...`     -> `sdash tui --feed x.csv ...`
/// - `sdash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    if matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help") {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "panels" | "rejects" | "simulate" | "report" | "interpret" | "chat" | "sample" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    // A leading flag means "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::EventFlag;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(args(&["sdash"])), args(&["sdash", "tui"]));
        assert_eq!(
            rewrite_args(args(&["sdash", "--feed", "x.csv"])),
            args(&["sdash", "tui", "--feed", "x.csv"])
        );
        assert_eq!(rewrite_args(args(&["sdash", "panels"])), args(&["sdash", "panels"]));
        assert_eq!(rewrite_args(args(&["sdash", "--help"])), args(&["sdash", "--help"]));
    }

    #[test]
    fn steps_keep_the_first_baseline() {
        let base = SimulationRequest {
            base_search_ad_cost: 10_000_000.0,
            base_live_ad_cost: 5_000_000.0,
            base_competitor_event: EventFlag::Yes,
            new_search_ad_cost: 1.0,
            new_live_ad_cost: 1.0,
            new_competitor_event: EventFlag::No,
        };
        let req = step_request("20,000,000:6000000:Y", &base).unwrap();
        assert_eq!(req.base_search_ad_cost, 10_000_000.0);
        assert_eq!(req.base_competitor_event, EventFlag::Yes);
        assert_eq!(req.new_search_ad_cost, 20_000_000.0);
        assert_eq!(req.new_competitor_event, EventFlag::Yes);

        assert_eq!(step_request("1:2", &base).unwrap().new_competitor_event, EventFlag::No);
        assert_eq!(step_request("1", &base).unwrap_err().exit_code(), EXIT_INPUT);
        assert_eq!(step_request(":2", &base).unwrap_err().exit_code(), EXIT_INPUT);
    }

    #[test]
    fn explicit_feed_flag_wins() {
        let cli = crate::cli::Cli::parse_from([
            "sdash", "panels", "--feed", "https://example.test/feed", "--panels", "share,share,trend",
        ]);
        let Command::Panels(p) = cli.command else {
            panic!("expected panels");
        };
        let config = dash_config_from_args(&p.feed).unwrap();
        assert_eq!(config.source, FeedSource::Url("https://example.test/feed".to_string()));
        assert_eq!(config.panels, vec![PanelKind::Share, PanelKind::Trend]);
    }
}
