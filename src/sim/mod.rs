//! ROI simulation path.
//!
//! - raw form inputs and validation (`form`)
//! - ordered step log (`log`)
//! - input-keyed session cache (`cache`)
//! - local linear model mirroring the backend (`model`)
//! - a session tying them to a backend (`session`)
//!
//! Wire types for the simulation endpoint live here as well.

use serde::{Deserialize, Serialize};

use crate::error::SimError;

pub mod cache;
pub mod form;
pub mod log;
pub mod model;
pub mod session;

pub use cache::{SimulationCache, cache_key};
pub use form::SimulationForm;
pub use log::{SimulationLog, SimulationStep};
pub use model::OfflineModel;
pub use session::{Session, SimulationOutcome};

/// Competitor event / promotion flag, `Y` or `N` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum EventFlag {
    #[serde(rename = "Y")]
    #[value(name = "Y", alias = "y")]
    Yes,
    #[default]
    #[serde(rename = "N")]
    #[value(name = "N", alias = "n")]
    No,
}

impl EventFlag {
    /// Anything other than `Y` counts as no event.
    pub fn from_text(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("y") {
            EventFlag::Yes
        } else {
            EventFlag::No
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventFlag::Yes => "Y",
            EventFlag::No => "N",
        }
    }

    pub fn as_factor(self) -> f64 {
        match self {
            EventFlag::Yes => 1.0,
            EventFlag::No => 0.0,
        }
    }
}

/// Simulation endpoint payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub base_search_ad_cost: f64,
    pub base_live_ad_cost: f64,
    pub base_competitor_event: EventFlag,
    pub new_search_ad_cost: f64,
    pub new_live_ad_cost: f64,
    pub new_competitor_event: EventFlag,
}

/// Simulation endpoint response.
///
/// Older servers only send the deltas; newer ones add the base/new pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationResult {
    pub success: bool,
    pub base_revenue: f64,
    pub new_revenue: f64,
    pub revenue_change: f64,
    pub base_roi: f64,
    pub new_roi: f64,
    pub roi_change: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Report endpoint payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRequest {
    pub base_search_ad_cost: f64,
    pub base_live_ad_cost: f64,
    pub new_search_ad_cost: f64,
    pub new_live_ad_cost: f64,
    pub competitor_event: EventFlag,
}

impl From<&SimulationRequest> for ReportRequest {
    fn from(req: &SimulationRequest) -> Self {
        Self {
            base_search_ad_cost: req.base_search_ad_cost,
            base_live_ad_cost: req.base_live_ad_cost,
            new_search_ad_cost: req.new_search_ad_cost,
            new_live_ad_cost: req.new_live_ad_cost,
            competitor_event: req.new_competitor_event,
        }
    }
}

/// Interpretation endpoint payload: the scenario plus its computed numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterpretRequest {
    pub base_revenue: f64,
    pub new_revenue: f64,
    pub base_roi: f64,
    pub new_roi: f64,
    pub revenue_change: f64,
    pub roi_change: f64,
    pub base_search_ad_cost: f64,
    pub base_live_ad_cost: f64,
    pub new_search_ad_cost: f64,
    pub new_live_ad_cost: f64,
    pub base_promo_flag: EventFlag,
    pub new_promo_flag: EventFlag,
}

impl InterpretRequest {
    pub fn new(req: &SimulationRequest, result: &SimulationResult) -> Self {
        Self {
            base_revenue: result.base_revenue,
            new_revenue: result.new_revenue,
            base_roi: result.base_roi,
            new_roi: result.new_roi,
            revenue_change: result.revenue_change,
            roi_change: result.roi_change,
            base_search_ad_cost: req.base_search_ad_cost,
            base_live_ad_cost: req.base_live_ad_cost,
            new_search_ad_cost: req.new_search_ad_cost,
            new_live_ad_cost: req.new_live_ad_cost,
            base_promo_flag: req.base_competitor_event,
            new_promo_flag: req.new_competitor_event,
        }
    }
}

/// Anything that can evaluate a scenario: the remote endpoint or the local model.
pub trait SimulationBackend {
    fn simulate(&self, req: &SimulationRequest) -> Result<SimulationResult, SimError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_endpoint_field_names_and_flags() {
        let req = SimulationRequest {
            base_search_ad_cost: 1.0,
            base_live_ad_cost: 2.0,
            base_competitor_event: EventFlag::No,
            new_search_ad_cost: 3.0,
            new_live_ad_cost: 4.0,
            new_competitor_event: EventFlag::Yes,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["base_search_ad_cost"], 1.0);
        assert_eq!(json["base_competitor_event"], "N");
        assert_eq!(json["new_competitor_event"], "Y");
    }

    #[test]
    fn delta_only_response_still_deserializes() {
        let r: SimulationResult =
            serde_json::from_str(r#"{"success": true, "revenue_change": 1500.0, "roi_change": -0.25}"#).unwrap();
        assert!(r.success);
        assert_eq!(r.revenue_change, 1500.0);
        assert_eq!(r.new_revenue, 0.0);
        assert_eq!(r.message, None);
    }

    #[test]
    fn failure_response_carries_message() {
        let r: SimulationResult = serde_json::from_str(r#"{"success": false, "message": "bad input"}"#).unwrap();
        assert!(!r.success);
        assert_eq!(r.message.as_deref(), Some("bad input"));
    }

    #[test]
    fn event_flag_text_defaults_to_no() {
        assert_eq!(EventFlag::from_text("Y"), EventFlag::Yes);
        assert_eq!(EventFlag::from_text(" y "), EventFlag::Yes);
        assert_eq!(EventFlag::from_text(""), EventFlag::No);
        assert_eq!(EventFlag::from_text("yes"), EventFlag::No);
    }

    #[test]
    fn report_request_takes_the_new_event_flag() {
        let req = SimulationRequest {
            base_search_ad_cost: 1.0,
            base_live_ad_cost: 2.0,
            base_competitor_event: EventFlag::No,
            new_search_ad_cost: 3.0,
            new_live_ad_cost: 4.0,
            new_competitor_event: EventFlag::Yes,
        };
        let report = ReportRequest::from(&req);
        assert_eq!(report.competitor_event, EventFlag::Yes);
        assert_eq!(report.new_live_ad_cost, 4.0);
    }
}
