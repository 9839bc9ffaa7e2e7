//! Year × month mean of relative search volume.
//!
//! The month axis is always `01..12`; months without records are reported
//! according to `EmptyCell`. Records whose date has no year/month are skipped.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{EmptyCell, ObservationRecord};

pub const MONTH_LABELS: [&str; 12] = ["01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapGrid {
    /// Ascending.
    pub years: Vec<i32>,
    /// `cells[row][month - 1]`, empty cells already resolved per `empty`.
    pub cells: Vec<[Option<f64>; 12]>,
    /// Records behind each cell.
    pub counts: Vec<[usize; 12]>,
    pub empty: EmptyCell,
    /// Records without a usable year/month.
    pub skipped: usize,
}

impl HeatmapGrid {
    pub fn cell(&self, year: i32, month: u32) -> Option<f64> {
        let row = self.years.iter().position(|&y| y == year)?;
        let col = (month as usize).checked_sub(1).filter(|&c| c < 12)?;
        self.cells[row][col]
    }

    /// Smallest and largest populated cell.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for (row, counts) in self.cells.iter().zip(&self.counts) {
            for (v, n) in row.iter().zip(counts) {
                if let (Some(v), true) = (v, *n > 0) {
                    lo = lo.min(*v);
                    hi = hi.max(*v);
                }
            }
        }
        (lo.is_finite() && hi.is_finite()).then_some((lo, hi))
    }
}

pub fn heatmap(records: &[ObservationRecord], empty: EmptyCell) -> HeatmapGrid {
    let mut acc: BTreeMap<i32, [(f64, usize); 12]> = BTreeMap::new();
    let mut skipped = 0usize;

    for r in records {
        let Some((year, month)) = r.date.year_month() else {
            skipped += 1;
            continue;
        };
        let slot = &mut acc.entry(year).or_insert([(0.0, 0); 12])[(month - 1) as usize];
        slot.0 += r.relative_search_volume;
        slot.1 += 1;
    }

    if skipped > 0 {
        tracing::debug!(skipped, "heatmap skipped records without year/month");
    }

    let mut years = Vec::with_capacity(acc.len());
    let mut cells = Vec::with_capacity(acc.len());
    let mut counts = Vec::with_capacity(acc.len());
    for (year, months) in acc {
        years.push(year);
        cells.push(months.map(|(sum, n)| match (n, empty) {
            (0, EmptyCell::Null) => None,
            (0, EmptyCell::Zero) => Some(0.0),
            (n, _) => Some(sum / n as f64),
        }));
        counts.push(months.map(|(_, n)| n));
    }

    HeatmapGrid {
        years,
        cells,
        counts,
        empty,
        skipped,
    }
}
