//! Local linear revenue/ROI model.
//!
//! `revenue = β0 + β_search·search + β_live·live + β_event·event`
//! `roi = (revenue − cost) / cost` with `cost = search + live` (divisor 1 when
//! the cost is 0). Revenue is rounded to whole units, ROI to two decimals,
//! both with ties to even, matching what the simulation endpoint reports.

use crate::error::SimError;
use crate::sim::{EventFlag, SimulationBackend, SimulationRequest, SimulationResult};

/// Regression coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OfflineModel {
    pub intercept: f64,
    pub search_coeff: f64,
    pub live_coeff: f64,
    pub event_coeff: f64,
}

impl Default for OfflineModel {
    /// The baseline fit served by the dashboard backend.
    fn default() -> Self {
        Self {
            intercept: 1_471_759_280.851_89,
            search_coeff: 1_399.991_761_526_45,
            live_coeff: 399.270_203_778_113,
            event_coeff: 1_243_765_335.801,
        }
    }
}

impl OfflineModel {
    /// Unrounded `(revenue, roi)` for one scenario.
    pub fn evaluate(&self, search: f64, live: f64, event: EventFlag) -> (f64, f64) {
        let revenue =
            self.intercept + search * self.search_coeff + live * self.live_coeff + event.as_factor() * self.event_coeff;
        let cost = search + live;
        let roi = (revenue - cost) / if cost > 0.0 { cost } else { 1.0 };
        (revenue, roi)
    }
}

impl SimulationBackend for OfflineModel {
    fn simulate(&self, req: &SimulationRequest) -> Result<SimulationResult, SimError> {
        let (base_revenue, base_roi) =
            self.evaluate(req.base_search_ad_cost, req.base_live_ad_cost, req.base_competitor_event);
        let (new_revenue, new_roi) =
            self.evaluate(req.new_search_ad_cost, req.new_live_ad_cost, req.new_competitor_event);

        Ok(SimulationResult {
            success: true,
            base_revenue: base_revenue.round_ties_even(),
            new_revenue: new_revenue.round_ties_even(),
            revenue_change: (new_revenue - base_revenue).round_ties_even(),
            base_roi: round2(base_roi),
            new_roi: round2(new_roi),
            roi_change: round2(new_roi - base_roi),
            message: None,
        })
    }
}

/// Two decimals, ties to even.
fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(new_search: f64, new_live: f64, event: EventFlag) -> SimulationRequest {
        SimulationRequest {
            base_search_ad_cost: 10_000_000.0,
            base_live_ad_cost: 5_000_000.0,
            base_competitor_event: EventFlag::No,
            new_search_ad_cost: new_search,
            new_live_ad_cost: new_live,
            new_competitor_event: event,
        }
    }

    #[test]
    fn unchanged_scenario_has_zero_deltas() {
        let r = OfflineModel::default()
            .simulate(&req(10_000_000.0, 5_000_000.0, EventFlag::No))
            .unwrap();
        assert!(r.success);
        assert_eq!(r.revenue_change, 0.0);
        assert_eq!(r.roi_change, 0.0);
        assert_eq!(r.base_revenue, r.new_revenue);
    }

    #[test]
    fn revenue_change_is_linear_in_search_cost() {
        let model = OfflineModel::default();
        let r = model.simulate(&req(20_000_000.0, 5_000_000.0, EventFlag::No)).unwrap();
        let expected = (10_000_000.0 * model.search_coeff).round();
        assert!((r.revenue_change - expected).abs() <= 1.0);
        assert!(r.new_roi < r.base_roi);
    }

    #[test]
    fn event_adds_its_coefficient() {
        let model = OfflineModel::default();
        let r = model.simulate(&req(10_000_000.0, 5_000_000.0, EventFlag::Yes)).unwrap();
        assert!((r.revenue_change - model.event_coeff.round()).abs() <= 1.0);
    }

    #[test]
    fn zero_cost_divides_by_one() {
        let model = OfflineModel {
            intercept: 50.0,
            search_coeff: 0.0,
            live_coeff: 0.0,
            event_coeff: 0.0,
        };
        assert_eq!(model.evaluate(0.0, 0.0, EventFlag::No), (50.0, 50.0));
    }

    #[test]
    fn roi_is_rounded_to_two_decimals() {
        let r = OfflineModel::default()
            .simulate(&req(12_345_678.0, 3_210_987.0, EventFlag::No))
            .unwrap();
        assert_eq!(r.new_roi, (r.new_roi * 100.0).round_ties_even() / 100.0);
    }

    fn flat(intercept: f64) -> OfflineModel {
        OfflineModel {
            intercept,
            search_coeff: 0.0,
            live_coeff: 0.0,
            event_coeff: 0.0,
        }
    }

    fn zero_cost() -> SimulationRequest {
        SimulationRequest {
            base_search_ad_cost: 0.0,
            base_live_ad_cost: 0.0,
            base_competitor_event: EventFlag::No,
            new_search_ad_cost: 0.0,
            new_live_ad_cost: 0.0,
            new_competitor_event: EventFlag::No,
        }
    }

    #[test]
    fn halves_round_to_even() {
        let r = flat(2.5).simulate(&zero_cost()).unwrap();
        assert_eq!(r.base_revenue, 2.0);
        assert_eq!(r.base_roi, 2.5);

        let r = flat(3.5).simulate(&zero_cost()).unwrap();
        assert_eq!(r.new_revenue, 4.0);

        let r = flat(0.125).simulate(&zero_cost()).unwrap();
        assert_eq!(r.base_revenue, 0.0);
        assert_eq!(r.base_roi, 0.12);
    }
}
