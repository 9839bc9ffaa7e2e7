//! Per-brand trend lines (search volume, CPC, ad spend).

use std::collections::HashMap;

use serde::Serialize;

use crate::derive::Universe;
use crate::domain::{Metric, ObservationRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: String,
    pub value: f64,
}

/// One brand's line. Points follow the brand's own records in parse order;
/// dates are not aligned across brands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandSeries {
    pub brand: String,
    pub metric: Metric,
    pub points: Vec<SeriesPoint>,
}

impl BrandSeries {
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }
}

pub fn trend_series(records: &[ObservationRecord], universe: &Universe, metric: Metric) -> Vec<BrandSeries> {
    let mut out: Vec<BrandSeries> = universe
        .brands
        .iter()
        .map(|brand| BrandSeries {
            brand: brand.clone(),
            metric,
            points: Vec::new(),
        })
        .collect();

    let slot: HashMap<&str, usize> = universe
        .brands
        .iter()
        .enumerate()
        .map(|(i, b)| (b.as_str(), i))
        .collect();

    for r in records {
        if let Some(&i) = slot.get(r.brand.as_str()) {
            out[i].points.push(SeriesPoint {
                date: r.date.raw.clone(),
                value: r.metric(metric),
            });
        }
    }

    out
}
