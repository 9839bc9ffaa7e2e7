//! Chart-series derivation.
//!
//! Everything here is pure: records in, per-panel series out. The brand and
//! date universes are computed once per load and shared by every panel.
//!
//! - per-brand trend lines (`trend`)
//! - daily share of search (`share`)
//! - year × month mean grid (`heatmap`)

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::{EmptyCell, Metric, ObservationRecord, PanelKind};

pub mod heatmap;
pub mod share;
pub mod trend;

pub use heatmap::{HeatmapGrid, MONTH_LABELS, heatmap};
pub use share::{BrandShare, ShareSeries, share_series};
pub use trend::{BrandSeries, SeriesPoint, trend_series};

/// Distinct brands and date labels, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Universe {
    pub brands: Vec<String>,
    pub dates: Vec<String>,
}

impl Universe {
    pub fn from_records(records: &[ObservationRecord]) -> Self {
        let mut seen_brands = HashSet::new();
        let mut seen_dates = HashSet::new();
        let mut universe = Universe::default();
        for r in records {
            if seen_brands.insert(r.brand.as_str()) {
                universe.brands.push(r.brand.clone());
            }
            if seen_dates.insert(r.date.raw.as_str()) {
                universe.dates.push(r.date.raw.clone());
            }
        }
        universe
    }
}

/// Per-panel series for one load. Panels not requested are `None`.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedPanels {
    pub universe: Universe,
    pub trend: Option<Vec<BrandSeries>>,
    pub share: Option<ShareSeries>,
    pub cpc: Option<Vec<BrandSeries>>,
    pub ad_spend: Option<Vec<BrandSeries>>,
    pub heatmap: Option<HeatmapGrid>,
}

impl DerivedPanels {
    /// Per-brand series of a trend-style panel.
    pub fn brand_series(&self, panel: PanelKind) -> Option<&[BrandSeries]> {
        match panel {
            PanelKind::Trend => self.trend.as_deref(),
            PanelKind::Cpc => self.cpc.as_deref(),
            PanelKind::AdSpend => self.ad_spend.as_deref(),
            PanelKind::Share | PanelKind::Heatmap => None,
        }
    }

    pub fn is_present(&self, panel: PanelKind) -> bool {
        match panel {
            PanelKind::Share => self.share.is_some(),
            PanelKind::Heatmap => self.heatmap.is_some(),
            _ => self.brand_series(panel).is_some(),
        }
    }
}

/// Derive the requested panels from one load's records.
pub fn derive_panels(records: &[ObservationRecord], panels: &[PanelKind], empty: EmptyCell) -> DerivedPanels {
    let universe = Universe::from_records(records);
    let wants = |p: PanelKind| panels.contains(&p);
    let per_brand = |p: PanelKind, metric: Metric| wants(p).then(|| trend_series(records, &universe, metric));

    let derived = DerivedPanels {
        trend: per_brand(PanelKind::Trend, Metric::SearchVolume),
        share: wants(PanelKind::Share).then(|| share_series(records, &universe)),
        cpc: per_brand(PanelKind::Cpc, Metric::Cpc),
        ad_spend: per_brand(PanelKind::AdSpend, Metric::AdSpend),
        heatmap: wants(PanelKind::Heatmap).then(|| heatmap(records, empty)),
        universe: universe.clone(),
    };

    tracing::debug!(
        brands = derived.universe.brands.len(),
        dates = derived.universe.dates.len(),
        panels = panels.len(),
        "derived panels"
    );
    derived
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::{DateGrammar, FeedDate, ObservationRecord};

    pub fn rec(brand: &str, date: &str, rsv: f64) -> ObservationRecord {
        ObservationRecord {
            brand: brand.to_string(),
            date: FeedDate::parse(date, DateGrammar::Auto),
            relative_search_volume: rsv,
            estimated_cpc: None,
            estimated_ad_spend: None,
            line: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::rec;
    use super::*;

    #[test]
    fn universe_keeps_first_seen_order() {
        let records = vec![
            rec("B", "2023-02", 1.0),
            rec("A", "2023-01", 1.0),
            rec("B", "2023-01", 1.0),
            rec("C", "2023-02", 1.0),
        ];
        let u = Universe::from_records(&records);
        assert_eq!(u.brands, vec!["B", "A", "C"]);
        assert_eq!(u.dates, vec!["2023-02", "2023-01"]);
    }

    #[test]
    fn only_requested_panels_are_derived() {
        let records = vec![rec("A", "2023-01", 2.0)];
        let panels = derive_panels(&records, &[PanelKind::Share, PanelKind::Cpc], EmptyCell::Null);
        assert!(panels.share.is_some());
        assert!(panels.cpc.is_some());
        assert!(panels.trend.is_none());
        assert!(panels.heatmap.is_none());
        assert!(panels.is_present(PanelKind::Cpc));
        assert!(!panels.is_present(PanelKind::AdSpend));
    }

    #[test]
    fn empty_input_derives_empty_panels() {
        let panels = derive_panels(&[], &PanelKind::ALL, EmptyCell::Zero);
        assert!(panels.universe.brands.is_empty());
        assert_eq!(panels.trend.as_deref().map(<[_]>::len), Some(0));
        assert!(panels.heatmap.as_ref().is_some_and(|h| h.years.is_empty()));
    }
}
