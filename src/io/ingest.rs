//! Feed ingest and normalization.
//!
//! This module is responsible for turning a raw delimited-text payload into an
//! ordered set of `ObservationRecord`s that the series deriver can consume.
//!
//! Design goals:
//! - **Strict header** for the three required columns (whole-payload error)
//! - **Row-level outcomes** (bad rows are rejected with a reason, never fatal)
//! - **Deterministic behavior** (input order preserved, no dedup, no sort)
//! - **Separation of concerns**: no aggregation logic here

use std::collections::HashMap;

use csv::StringRecord;

use crate::domain::{ColumnMap, DashConfig, DateGrammar, Delimiter, DelimiterChoice, FeedDate, ObservationRecord};
use crate::error::FeedError;

/// Parser settings: column names, delimiter policy, date grammar.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub columns: ColumnMap,
    pub delimiter: DelimiterChoice,
    pub date_grammar: DateGrammar,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            columns: ColumnMap::default(),
            delimiter: DelimiterChoice::Auto,
            date_grammar: DateGrammar::Auto,
        }
    }
}

impl ParseOptions {
    pub fn from_config(config: &DashConfig) -> Self {
        Self {
            columns: config.columns.clone(),
            delimiter: config.delimiter,
            date_grammar: config.date_grammar,
        }
    }
}

/// Why a data line did not become a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Fewer than two fields: blank or garbage line.
    TooFewFields,
    /// The brand or date cell is absent or empty.
    MissingField(String),
    /// The relative search volume is absent, not a number, or not finite.
    InvalidSearchVolume(String),
    /// The reader could not split the line.
    Malformed(String),
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::TooFewFields => write!(f, "fewer than 2 fields"),
            RejectReason::MissingField(name) => write!(f, "missing `{name}` value"),
            RejectReason::InvalidSearchVolume(value) => write!(f, "invalid search volume '{value}'"),
            RejectReason::Malformed(msg) => write!(f, "malformed line: {msg}"),
        }
    }
}

/// A rejected data line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRejection {
    /// 1-based line number (0 when the reader could not tell).
    pub line: usize,
    pub reason: RejectReason,
    /// The line's fields re-joined with the payload delimiter.
    pub raw: String,
}

/// Outcome of one data line.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Accepted(ObservationRecord),
    Rejected(RowRejection),
}

/// Header + per-line outcomes, before splitting into records and rejections.
#[derive(Debug, Clone)]
pub struct FeedRows {
    pub delimiter: Delimiter,
    pub header: Vec<String>,
    pub outcomes: Vec<RowOutcome>,
}

/// Parse output: records in input order plus the rejected lines.
#[derive(Debug, Clone)]
pub struct ParsedFeed {
    pub delimiter: Delimiter,
    pub header: Vec<String>,
    pub records: Vec<ObservationRecord>,
    pub rejected: Vec<RowRejection>,
    pub rows_read: usize,
}

impl ParsedFeed {
    pub fn rows_used(&self) -> usize {
        self.records.len()
    }
}

impl From<FeedRows> for ParsedFeed {
    fn from(rows: FeedRows) -> Self {
        let rows_read = rows.outcomes.len();
        let mut records = Vec::with_capacity(rows_read);
        let mut rejected = Vec::new();
        for outcome in rows.outcomes {
            match outcome {
                RowOutcome::Accepted(record) => records.push(record),
                RowOutcome::Rejected(rejection) => rejected.push(rejection),
            }
        }
        Self {
            delimiter: rows.delimiter,
            header: rows.header,
            records,
            rejected,
            rows_read,
        }
    }
}

/// Pick the payload delimiter: tab anywhere wins, then semicolon, else comma.
pub fn sniff_delimiter(raw: &str) -> Delimiter {
    if raw.contains('\t') {
        Delimiter::Tab
    } else if raw.contains(';') {
        Delimiter::Semicolon
    } else {
        Delimiter::Comma
    }
}

/// Parse a payload into records and rejections.
pub fn parse_feed(raw: &str, options: &ParseOptions) -> Result<ParsedFeed, FeedError> {
    let rows = parse_feed_rows(raw, options)?;
    let parsed = ParsedFeed::from(rows);
    tracing::debug!(
        delimiter = parsed.delimiter.display_name(),
        rows_read = parsed.rows_read,
        rows_used = parsed.rows_used(),
        rejected = parsed.rejected.len(),
        "parsed feed"
    );
    Ok(parsed)
}

/// Parse a payload into one `RowOutcome` per non-blank data line.
pub fn parse_feed_rows(raw: &str, options: &ParseOptions) -> Result<FeedRows, FeedError> {
    let delimiter = options.delimiter.fixed().unwrap_or_else(|| sniff_delimiter(raw));

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .delimiter(delimiter.as_byte())
        .from_reader(raw.as_bytes());

    let mut records = reader.records();

    // The header is the first non-blank line.
    let header = loop {
        match records.next() {
            None => return Err(FeedError::EmptyPayload),
            Some(Err(e)) => return Err(FeedError::Header(e.to_string())),
            Some(Ok(record)) if is_blank(&record) => continue,
            Some(Ok(record)) => break record,
        }
    };

    let header: Vec<String> = header.iter().map(normalize_header_name).collect();
    let index = ColumnIndex::resolve(&header, &options.columns)?;

    let mut outcomes = Vec::new();
    for result in records {
        let outcome = match result {
            Ok(record) if is_blank(&record) => continue,
            Ok(record) => classify_row(&record, &index, delimiter, options.date_grammar),
            Err(e) => RowOutcome::Rejected(RowRejection {
                line: e.position().map(|p| p.line() as usize).unwrap_or(0),
                reason: RejectReason::Malformed(e.to_string()),
                raw: String::new(),
            }),
        };
        if let RowOutcome::Rejected(rejection) = &outcome {
            tracing::debug!(line = rejection.line, reason = %rejection.reason, "rejected feed row");
        }
        outcomes.push(outcome);
    }

    Ok(FeedRows {
        delimiter,
        header,
        outcomes,
    })
}

/// Resolved positions of the configured columns in the header.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    brand: usize,
    date: usize,
    search_volume: usize,
    cpc: Option<usize>,
    ad_spend: Option<usize>,
}

impl ColumnIndex {
    fn resolve(header: &[String], columns: &ColumnMap) -> Result<Self, FeedError> {
        // First occurrence wins when a name repeats.
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for (idx, name) in header.iter().enumerate() {
            positions.entry(name.as_str()).or_insert(idx);
        }

        let get = |name: &str| positions.get(name).copied();
        match (get(columns.brand.as_str()), get(columns.date.as_str()), get(columns.search_volume.as_str())) {
            (Some(brand), Some(date), Some(search_volume)) => Ok(Self {
                brand,
                date,
                search_volume,
                cpc: get(columns.cpc.as_str()),
                ad_spend: get(columns.ad_spend.as_str()),
            }),
            _ => Err(FeedError::HeaderMismatch {
                missing: columns
                    .required()
                    .into_iter()
                    .filter(|name| get(*name).is_none())
                    .map(str::to_string)
                    .collect(),
                found: header.to_vec(),
            }),
        }
    }
}

fn classify_row(record: &StringRecord, index: &ColumnIndex, delimiter: Delimiter, grammar: DateGrammar) -> RowOutcome {
    let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
    let reject = |reason: RejectReason| {
        RowOutcome::Rejected(RowRejection {
            line,
            reason,
            raw: join_fields(record, delimiter),
        })
    };

    if record.len() < 2 {
        return reject(RejectReason::TooFewFields);
    }

    let search_volume = record.get(index.search_volume).unwrap_or("");
    let Some(relative_search_volume) = parse_f64(search_volume) else {
        return reject(RejectReason::InvalidSearchVolume(search_volume.to_string()));
    };

    let Some(brand) = non_empty(record, index.brand) else {
        return reject(RejectReason::MissingField("brand".to_string()));
    };
    let Some(date) = non_empty(record, index.date) else {
        return reject(RejectReason::MissingField("date".to_string()));
    };

    RowOutcome::Accepted(ObservationRecord {
        brand: brand.to_string(),
        date: FeedDate::parse(date, grammar),
        relative_search_volume,
        estimated_cpc: index.cpc.and_then(|idx| record.get(idx)).and_then(parse_f64),
        estimated_ad_spend: index.ad_spend.and_then(|idx| record.get(idx)).and_then(parse_f64),
        line,
    })
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').trim().to_string()
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

fn non_empty(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn join_fields(record: &StringRecord, delimiter: Delimiter) -> String {
    let sep = (delimiter.as_byte() as char).to_string();
    record.iter().collect::<Vec<_>>().join(&sep)
}

fn parse_f64(s: &str) -> Option<f64> {
    let v = s.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DateKind;

    fn parse(raw: &str) -> ParsedFeed {
        parse_feed(raw, &ParseOptions::default()).unwrap()
    }

    #[test]
    fn sniff_prefers_tab_then_semicolon_then_comma() {
        assert_eq!(sniff_delimiter("a,b\tc;d"), Delimiter::Tab);
        assert_eq!(sniff_delimiter("a,b;c"), Delimiter::Semicolon);
        assert_eq!(sniff_delimiter("a,b,c"), Delimiter::Comma);
        assert_eq!(sniff_delimiter(""), Delimiter::Comma);
    }

    #[test]
    fn tab_payload_with_commas_in_values_splits_on_tab() {
        let raw = "brand\tdate\tsearch_volume_relative\nAcme, Inc.\t2023-01\t4.5\n";
        let feed = parse(raw);
        assert_eq!(feed.delimiter, Delimiter::Tab);
        assert_eq!(feed.records.len(), 1);
        assert_eq!(feed.records[0].brand, "Acme, Inc.");
    }

    #[test]
    fn parses_rows_in_input_order_with_optional_columns() {
        let raw = "brand,date,search_volume_relative,cpc_est,ad_spend_est\n\
                   B,2023-02,6,410,1200\n\
                   A,2023-01,2,,900\n\
                   B,2023-01,5,380,abc\n";
        let feed = parse(raw);
        assert_eq!(feed.rows_read, 3);
        let brands: Vec<&str> = feed.records.iter().map(|r| r.brand.as_str()).collect();
        assert_eq!(brands, vec!["B", "A", "B"]);
        assert_eq!(feed.records[0].estimated_cpc, Some(410.0));
        assert_eq!(feed.records[1].estimated_cpc, None);
        assert_eq!(feed.records[2].estimated_ad_spend, None);
        assert_eq!(feed.records[0].line, 2);
        assert_eq!(feed.records[2].line, 4);
    }

    #[test]
    fn missing_optional_columns_yield_absent_values() {
        let feed = parse("date;brand;search_volume_relative\n2023-01;A;1.5\n");
        assert_eq!(feed.delimiter, Delimiter::Semicolon);
        assert_eq!(feed.records[0].estimated_cpc, None);
        assert_eq!(feed.records[0].estimated_ad_spend, None);
    }

    #[test]
    fn missing_required_column_is_header_mismatch() {
        let err = parse_feed("brand,date,cpc_est\nA,2023-01,3\n", &ParseOptions::default()).unwrap_err();
        match err {
            FeedError::HeaderMismatch { missing, found } => {
                assert_eq!(missing, vec!["search_volume_relative".to_string()]);
                assert_eq!(found, vec!["brand", "date", "cpc_est"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn header_names_are_trimmed_and_bom_stripped() {
        let feed = parse("\u{feff}brand , date ,search_volume_relative\nA,2023-01,1\n");
        assert_eq!(feed.header, vec!["brand", "date", "search_volume_relative"]);
        assert_eq!(feed.records.len(), 1);
    }

    #[test]
    fn every_missing_required_column_is_listed() {
        let err = parse_feed("date,cpc_est\n2023-01,3\n", &ParseOptions::default()).unwrap_err();
        assert_eq!(
            err,
            FeedError::HeaderMismatch {
                missing: vec!["brand".to_string(), "search_volume_relative".to_string()],
                found: vec!["date".to_string(), "cpc_est".to_string()],
            }
        );
    }

    #[test]
    fn header_match_is_case_sensitive() {
        let err = parse_feed("Brand,date,search_volume_relative\n", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, FeedError::HeaderMismatch { .. }));
    }

    #[test]
    fn empty_payload_is_reported() {
        let err = parse_feed("\n\n  \n", &ParseOptions::default()).unwrap_err();
        assert_eq!(err, FeedError::EmptyPayload);
    }

    #[test]
    fn bad_lines_are_rejected_without_touching_good_ones() {
        let raw = "brand,date,search_volume_relative\n\
                   A,2023-01,2\n\
                   A\n\
                   A,2023-01,notanumber\n\
                   B,2023-01,6\n";
        let feed = parse(raw);
        assert_eq!(feed.records.len(), 2);
        assert_eq!(feed.records[0].brand, "A");
        assert_eq!(feed.records[1].brand, "B");

        assert_eq!(feed.rejected.len(), 2);
        assert_eq!(feed.rejected[0].line, 3);
        assert_eq!(feed.rejected[0].reason, RejectReason::TooFewFields);
        assert_eq!(
            feed.rejected[1].reason,
            RejectReason::InvalidSearchVolume("notanumber".to_string())
        );
        assert_eq!(feed.rejected[1].raw, "A,2023-01,notanumber");
    }

    #[test]
    fn stray_quote_only_affects_its_own_line() {
        let raw = "brand,date,search_volume_relative\n\
                   \"A,2023-01,oops\n\
                   B,2023-01,6\n\
                   C,2023-01,4\n";
        let feed = parse(raw);
        let brands: Vec<&str> = feed.records.iter().map(|r| r.brand.as_str()).collect();
        assert_eq!(brands, vec!["B", "C"]);
        assert_eq!(feed.records[0].line, 3);

        assert_eq!(feed.rejected.len(), 1);
        assert_eq!(feed.rejected[0].line, 2);
        assert_eq!(feed.rejected[0].reason, RejectReason::InvalidSearchVolume("oops".to_string()));
        assert_eq!(feed.rejected[0].raw, "\"A,2023-01,oops");
    }

    #[test]
    fn quotes_are_kept_as_plain_text() {
        let feed = parse("brand,date,search_volume_relative\n\"Acme\",2023-01,3\n");
        assert_eq!(feed.records[0].brand, "\"Acme\"");
    }

    #[test]
    fn blank_lines_are_skipped_silently() {
        let feed = parse("brand,date,search_volume_relative\n\nA,2023-01,2\n\r\n   \nB,2023-01,3\n");
        assert_eq!(feed.records.len(), 2);
        assert!(feed.rejected.is_empty());
    }

    #[test]
    fn non_finite_search_volume_is_rejected() {
        let feed = parse("brand,date,search_volume_relative\nA,2023-01,inf\nA,2023-02,NaN\n");
        assert!(feed.records.is_empty());
        assert_eq!(feed.rejected.len(), 2);
    }

    #[test]
    fn short_row_missing_date_is_rejected() {
        let feed = parse("search_volume_relative,brand,date\n4,A\n");
        assert_eq!(feed.rejected[0].reason, RejectReason::MissingField("date".to_string()));
    }

    #[test]
    fn renamed_columns_are_honoured() {
        let options = ParseOptions {
            columns: ColumnMap {
                brand: "name".to_string(),
                date: "month".to_string(),
                search_volume: "rsv".to_string(),
                cpc: "cpc".to_string(),
                ad_spend: "spend".to_string(),
            },
            ..ParseOptions::default()
        };
        let feed = parse_feed("name,month,rsv,cpc\nA,202301,7,1.5\n", &options).unwrap();
        assert_eq!(feed.records[0].relative_search_volume, 7.0);
        assert_eq!(feed.records[0].estimated_cpc, Some(1.5));
        assert_eq!(feed.records[0].date.kind, DateKind::Compact { year: 2023, month: 1 });
    }

    #[test]
    fn forced_delimiter_overrides_sniffing() {
        let options = ParseOptions {
            delimiter: DelimiterChoice::Comma,
            ..ParseOptions::default()
        };
        let feed = parse_feed("brand,date,search_volume_relative\nA;x,2023-01,1\n", &options).unwrap();
        assert_eq!(feed.delimiter, Delimiter::Comma);
        assert_eq!(feed.records[0].brand, "A;x");
    }

    #[test]
    fn outcomes_keep_one_entry_per_data_line() {
        let rows = parse_feed_rows(
            "brand,date,search_volume_relative\nA,2023-01,1\nA\n",
            &ParseOptions::default(),
        )
        .unwrap();
        assert_eq!(rows.outcomes.len(), 2);
        assert!(matches!(rows.outcomes[0], RowOutcome::Accepted(_)));
        assert!(matches!(rows.outcomes[1], RowOutcome::Rejected(_)));
    }
}
