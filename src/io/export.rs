//! Export derived panels.
//!
//! JSON is `DerivedPanels` plus the feed source and a UTC timestamp. CSV is long format (`panel,brand,date,value`)
//! so every panel fits one sheet; heatmap rows use `YYYY-MM` as the date and an
//! empty brand.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::derive::{BrandSeries, DerivedPanels, MONTH_LABELS};
use crate::domain::{FeedSource, PanelKind};
use crate::error::{AppError, EXIT_INPUT};

#[derive(Serialize)]
struct PanelExport<'a> {
    generated_at: DateTime<Utc>,
    source: String,
    #[serde(flatten)]
    panels: &'a DerivedPanels,
}

/// Write all derived panels as pretty JSON.
pub fn write_panels_json(path: &Path, source: &FeedSource, panels: &DerivedPanels) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create export JSON '{}': {e}", path.display())))?;
    let export = PanelExport {
        generated_at: Utc::now(),
        source: source.to_string(),
        panels,
    };
    serde_json::to_writer_pretty(file, &export)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write export JSON: {e}")))?;
    tracing::info!(path = %path.display(), "wrote panel JSON");
    Ok(())
}

/// Write all derived panels as one long-format CSV.
pub fn write_panels_csv(path: &Path, panels: &DerivedPanels) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let rows = long_rows(panels);
    let write_err = |e: csv::Error| AppError::new(EXIT_INPUT, format!("Failed to write export CSV row: {e}"));

    writer.write_record(["panel", "brand", "date", "value"]).map_err(write_err)?;
    for row in &rows {
        writer
            .write_record([row.panel, row.brand.as_str(), row.date.as_str(), row.value.as_str()])
            .map_err(write_err)?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to flush export CSV: {e}")))?;

    tracing::info!(path = %path.display(), rows = rows.len(), "wrote panel CSV");
    Ok(())
}

struct LongRow {
    panel: &'static str,
    brand: String,
    date: String,
    value: String,
}

fn long_rows(panels: &DerivedPanels) -> Vec<LongRow> {
    let mut rows = Vec::new();

    for kind in [PanelKind::Trend, PanelKind::Cpc, PanelKind::AdSpend] {
        if let Some(series) = panels.brand_series(kind) {
            push_series(&mut rows, panel_key(kind), series);
        }
    }

    if let Some(share) = &panels.share {
        for brand in &share.brands {
            for (date, v) in share.dates.iter().zip(&brand.shares) {
                rows.push(LongRow {
                    panel: panel_key(PanelKind::Share),
                    brand: brand.brand.clone(),
                    date: date.clone(),
                    value: format!("{v:.4}"),
                });
            }
        }
    }

    if let Some(grid) = &panels.heatmap {
        for (year, cells) in grid.years.iter().zip(&grid.cells) {
            for (label, cell) in MONTH_LABELS.iter().zip(cells) {
                rows.push(LongRow {
                    panel: panel_key(PanelKind::Heatmap),
                    brand: String::new(),
                    date: format!("{year}-{label}"),
                    value: cell.map(|v| format!("{v:.4}")).unwrap_or_default(),
                });
            }
        }
    }

    rows
}

fn push_series(rows: &mut Vec<LongRow>, panel: &'static str, series: &[BrandSeries]) {
    for s in series {
        for p in &s.points {
            rows.push(LongRow {
                panel,
                brand: s.brand.clone(),
                date: p.date.clone(),
                value: format!("{:.4}", p.value),
            });
        }
    }
}

fn panel_key(kind: PanelKind) -> &'static str {
    match kind {
        PanelKind::Trend => "trend",
        PanelKind::Share => "share",
        PanelKind::Cpc => "cpc",
        PanelKind::AdSpend => "ad_spend",
        PanelKind::Heatmap => "heatmap",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive_panels;
    use crate::derive::fixtures::rec;
    use crate::domain::EmptyCell;

    fn sample_panels(kinds: &[PanelKind]) -> DerivedPanels {
        let records = vec![rec("A", "2023-01-05", 10.0), rec("B", "2023-01-05", 30.0)];
        derive_panels(&records, kinds, EmptyCell::Null)
    }

    #[test]
    fn csv_is_long_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panels.csv");
        write_panels_csv(&path, &sample_panels(&[PanelKind::Trend, PanelKind::Share])).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "panel,brand,date,value");
        assert!(lines.contains(&"trend,A,2023-01-05,10.0000"));
        assert!(lines.contains(&"share,B,2023-01-05,75.0000"));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn empty_heatmap_cells_export_blank() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heat.csv");
        write_panels_csv(&path, &sample_panels(&[PanelKind::Heatmap])).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("heatmap,,2023-01,20.0000"));
        assert!(text.contains("heatmap,,2023-02,\n"));
        // header + 12 months for one year
        assert_eq!(text.lines().count(), 13);
    }

    #[test]
    fn json_export_carries_universe() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panels.json");
        let source = FeedSource::Url("http://localhost:5000/data/search_volume".to_string());
        write_panels_json(&path, &source, &sample_panels(&PanelKind::ALL)).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["universe"]["brands"], serde_json::json!(["A", "B"]));
        assert!(value["heatmap"]["cells"][0][1].is_null());
        assert_eq!(value["source"], "http://localhost:5000/data/search_volume");
        assert!(value["generated_at"].is_string());
    }
}
