//! Reporting utilities: per-brand statistics and formatted terminal output.

use crate::derive::BrandSeries;

pub mod format;

pub use format::*;

/// Summary statistics of one brand's series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    pub brand: String,
    pub n: usize,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
    pub last: f64,
}

/// Per-brand statistics; brands without points are left out.
pub fn series_stats(series: &[BrandSeries]) -> Vec<SeriesStats> {
    series
        .iter()
        .filter_map(|s| {
            let last = s.points.last()?.value;
            let n = s.points.len();
            let (min, max, sum) = s
                .values()
                .fold((f64::INFINITY, f64::NEG_INFINITY, 0.0), |(lo, hi, sum), v| {
                    (lo.min(v), hi.max(v), sum + v)
                });
            Some(SeriesStats {
                brand: s.brand.clone(),
                n,
                min,
                mean: sum / n as f64,
                max,
                last,
            })
        })
        .collect()
}
