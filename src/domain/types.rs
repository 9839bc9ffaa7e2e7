//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - produced by the feed parser and consumed by the series deriver
//! - exported to JSON/CSV
//! - selected from the command line (`ValueEnum`)

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The single delimiter used for a whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    Tab,
    Semicolon,
    Comma,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Tab => b'\t',
            Delimiter::Semicolon => b';',
            Delimiter::Comma => b',',
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Delimiter::Tab => "tab",
            Delimiter::Semicolon => "semicolon",
            Delimiter::Comma => "comma",
        }
    }
}

/// Delimiter selection on the command line.
///
/// `Auto` sniffs the payload: tab first, then semicolon, then comma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DelimiterChoice {
    Auto,
    Tab,
    Semicolon,
    Comma,
}

impl DelimiterChoice {
    pub fn fixed(self) -> Option<Delimiter> {
        match self {
            DelimiterChoice::Auto => None,
            DelimiterChoice::Tab => Some(Delimiter::Tab),
            DelimiterChoice::Semicolon => Some(Delimiter::Semicolon),
            DelimiterChoice::Comma => Some(Delimiter::Comma),
        }
    }
}

/// Which date grammar(s) to accept in the `date` column.
///
/// Upstream sources disagree: some emit `YYYY-MM-DD` (or `YYYY-MM`), others
/// a compact `YYYYMM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DateGrammar {
    /// A hyphen selects ISO, otherwise compact.
    Auto,
    /// Only `YYYY-MM[-DD]`.
    Iso,
    /// Only `YYYYMM[...]`.
    Compact,
}

/// Tagged parse of a feed date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DateKind {
    Iso { year: i32, month: u32, day: Option<u32> },
    Compact { year: i32, month: u32 },
    /// The label is kept for trend/share axes, but it has no year/month.
    Unrecognized,
}

/// A feed date: the raw label plus its tagged parse.
///
/// The raw label is the x-axis key for trend panels and the date key for the
/// share panel, so two spellings of the same day stay distinct there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedDate {
    pub raw: String,
    pub kind: DateKind,
}

impl FeedDate {
    pub fn parse(raw: &str, grammar: DateGrammar) -> Self {
        let raw = raw.trim();
        let kind = match grammar {
            DateGrammar::Auto if raw.contains('-') => parse_iso(raw),
            DateGrammar::Auto => parse_compact(raw),
            DateGrammar::Iso => parse_iso(raw),
            DateGrammar::Compact => parse_compact(raw),
        };
        Self {
            raw: raw.to_string(),
            kind,
        }
    }

    /// `(year, month)` when the date was recognized.
    pub fn year_month(&self) -> Option<(i32, u32)> {
        match self.kind {
            DateKind::Iso { year, month, .. } | DateKind::Compact { year, month } => Some((year, month)),
            DateKind::Unrecognized => None,
        }
    }
}

fn parse_iso(raw: &str) -> DateKind {
    let mut parts = raw.split('-');
    let year = parts.next().and_then(parse_year);
    let month = parts.next().and_then(parse_month);
    let day = match parts.next() {
        None => Some(None),
        Some(d) => d
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|d| (1..=31).contains(d))
            .map(Some),
    };
    match (year, month, day, parts.next()) {
        (Some(year), Some(month), Some(day), None) => DateKind::Iso { year, month, day },
        _ => DateKind::Unrecognized,
    }
}

fn parse_compact(raw: &str) -> DateKind {
    let (Some(year), Some(month)) = (raw.get(0..4), raw.get(4..6)) else {
        return DateKind::Unrecognized;
    };
    match (parse_year(year), parse_month(month)) {
        (Some(year), Some(month)) => DateKind::Compact { year, month },
        _ => DateKind::Unrecognized,
    }
}

fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_month(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u32>().ok().filter(|m| (1..=12).contains(m))
}

/// One accepted feed row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub brand: String,
    pub date: FeedDate,
    pub relative_search_volume: f64,
    pub estimated_cpc: Option<f64>,
    pub estimated_ad_spend: Option<f64>,
    /// 1-based line in the source payload.
    pub line: usize,
}

impl ObservationRecord {
    /// Value of `metric` for this record; absent optional fields read as 0.
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::SearchVolume => self.relative_search_volume,
            Metric::Cpc => self.estimated_cpc.unwrap_or(0.0),
            Metric::AdSpend => self.estimated_ad_spend.unwrap_or(0.0),
        }
    }
}

/// Header names for the five feed fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    pub brand: String,
    pub date: String,
    pub search_volume: String,
    pub cpc: String,
    pub ad_spend: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            brand: "brand".to_string(),
            date: "date".to_string(),
            search_volume: "search_volume_relative".to_string(),
            cpc: "cpc_est".to_string(),
            ad_spend: "ad_spend_est".to_string(),
        }
    }
}

impl ColumnMap {
    pub fn required(&self) -> [&str; 3] {
        [&self.brand, &self.date, &self.search_volume]
    }
}

/// Per-brand metric projected by a trend panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    SearchVolume,
    Cpc,
    AdSpend,
}

impl Metric {
    pub fn display_name(self) -> &'static str {
        match self {
            Metric::SearchVolume => "relative search volume",
            Metric::Cpc => "CPC",
            Metric::AdSpend => "ad spend",
        }
    }
}

/// The dashboard's chart panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    Trend,
    Share,
    Cpc,
    #[value(name = "ad_spend")]
    AdSpend,
    Heatmap,
}

impl PanelKind {
    pub const ALL: [PanelKind; 5] = [
        PanelKind::Trend,
        PanelKind::Share,
        PanelKind::Cpc,
        PanelKind::AdSpend,
        PanelKind::Heatmap,
    ];

    pub fn title(self) -> &'static str {
        match self {
            PanelKind::Trend => "Relative search volume by brand",
            PanelKind::Share => "Share of search (%)",
            PanelKind::Cpc => "CPC by brand",
            PanelKind::AdSpend => "Ad spend by brand",
            PanelKind::Heatmap => "Mean search volume by year/month",
        }
    }

    /// The metric plotted by per-brand panels.
    pub fn metric(self) -> Option<Metric> {
        match self {
            PanelKind::Trend => Some(Metric::SearchVolume),
            PanelKind::Cpc => Some(Metric::Cpc),
            PanelKind::AdSpend => Some(Metric::AdSpend),
            PanelKind::Share | PanelKind::Heatmap => None,
        }
    }
}

/// How a heatmap cell without contributing records is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmptyCell {
    /// Explicit "no data" (`None` / JSON `null`).
    Null,
    /// Zero-filled.
    Zero,
}

/// Where the raw feed comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    File(PathBuf),
    Url(String),
}

impl FeedSource {
    /// `http(s)://...` is a URL, anything else a path.
    pub fn from_arg(arg: &str) -> Self {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            FeedSource::Url(arg.to_string())
        } else {
            FeedSource::File(PathBuf::from(arg))
        }
    }
}

impl std::fmt::Display for FeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedSource::File(path) => write!(f, "{}", path.display()),
            FeedSource::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Resolved configuration for one load of the dashboard pipeline.
#[derive(Debug, Clone)]
pub struct DashConfig {
    pub source: FeedSource,
    pub columns: ColumnMap,
    pub delimiter: DelimiterChoice,
    pub date_grammar: DateGrammar,
    pub panels: Vec<PanelKind>,
    pub empty_cell: EmptyCell,
    pub timeout_secs: u64,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export_json: Option<PathBuf>,
    pub export_csv: Option<PathBuf>,
}

impl DashConfig {
    pub fn wants(&self, panel: PanelKind) -> bool {
        self.panels.contains(&panel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_grammar_reads_iso_and_compact_dates() {
        let iso = FeedDate::parse("2023-04-17", DateGrammar::Auto);
        assert_eq!(iso.kind, DateKind::Iso { year: 2023, month: 4, day: Some(17) });

        let month_only = FeedDate::parse("2023-01", DateGrammar::Auto);
        assert_eq!(month_only.year_month(), Some((2023, 1)));

        let compact = FeedDate::parse("202311", DateGrammar::Auto);
        assert_eq!(compact.kind, DateKind::Compact { year: 2023, month: 11 });
    }

    #[test]
    fn out_of_range_month_is_unrecognized() {
        assert_eq!(FeedDate::parse("2023-13-01", DateGrammar::Auto).kind, DateKind::Unrecognized);
        assert_eq!(FeedDate::parse("202300", DateGrammar::Auto).kind, DateKind::Unrecognized);
        assert_eq!(FeedDate::parse("2023", DateGrammar::Auto).kind, DateKind::Unrecognized);
    }

    #[test]
    fn fixed_grammar_does_not_fall_back() {
        assert_eq!(FeedDate::parse("202305", DateGrammar::Iso).kind, DateKind::Unrecognized);
        assert_eq!(FeedDate::parse("2023-05", DateGrammar::Compact).kind, DateKind::Unrecognized);
    }

    #[test]
    fn raw_label_is_trimmed_but_kept() {
        let d = FeedDate::parse(" 2024-02-29 ", DateGrammar::Auto);
        assert_eq!(d.raw, "2024-02-29");
    }

    #[test]
    fn missing_optional_metrics_read_as_zero() {
        let rec = ObservationRecord {
            brand: "A".to_string(),
            date: FeedDate::parse("2023-01", DateGrammar::Auto),
            relative_search_volume: 3.5,
            estimated_cpc: None,
            estimated_ad_spend: Some(120.0),
            line: 2,
        };
        assert_eq!(rec.metric(Metric::SearchVolume), 3.5);
        assert_eq!(rec.metric(Metric::Cpc), 0.0);
        assert_eq!(rec.metric(Metric::AdSpend), 120.0);
    }

    #[test]
    fn feed_source_detects_urls() {
        assert_eq!(
            FeedSource::from_arg("http://localhost:5000/data/search_volume"),
            FeedSource::Url("http://localhost:5000/data/search_volume".to_string())
        );
        assert!(matches!(FeedSource::from_arg("data/feed.csv"), FeedSource::File(_)));
    }
}
