//! Raw simulation inputs as typed by a user, and their validation.

use crate::error::SimError;
use crate::sim::{EventFlag, SimulationRequest};

/// Unvalidated text inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationForm {
    pub base_search_ad_cost: String,
    pub base_live_ad_cost: String,
    pub base_competitor_event: String,
    pub new_search_ad_cost: String,
    pub new_live_ad_cost: String,
    pub new_competitor_event: String,
}

impl SimulationForm {
    /// Build a request, or list every blank cost input.
    ///
    /// Costs that are present but not numeric read as 0.
    pub fn validate(&self) -> Result<SimulationRequest, SimError> {
        let costs = [
            ("base_search_ad_cost", &self.base_search_ad_cost),
            ("base_live_ad_cost", &self.base_live_ad_cost),
            ("new_search_ad_cost", &self.new_search_ad_cost),
            ("new_live_ad_cost", &self.new_live_ad_cost),
        ];
        let missing: Vec<&'static str> = costs
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(SimError::ValidationFailed(missing));
        }

        Ok(SimulationRequest {
            base_search_ad_cost: cost(&self.base_search_ad_cost),
            base_live_ad_cost: cost(&self.base_live_ad_cost),
            base_competitor_event: EventFlag::from_text(&self.base_competitor_event),
            new_search_ad_cost: cost(&self.new_search_ad_cost),
            new_live_ad_cost: cost(&self.new_live_ad_cost),
            new_competitor_event: EventFlag::from_text(&self.new_competitor_event),
        })
    }
}

fn cost(s: &str) -> f64 {
    s.trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> SimulationForm {
        SimulationForm {
            base_search_ad_cost: "10000000".to_string(),
            base_live_ad_cost: "5,000,000".to_string(),
            base_competitor_event: "N".to_string(),
            new_search_ad_cost: "20000000".to_string(),
            new_live_ad_cost: "abc".to_string(),
            new_competitor_event: "Y".to_string(),
        }
    }

    #[test]
    fn filled_form_validates() {
        let req = filled().validate().unwrap();
        assert_eq!(req.base_search_ad_cost, 10_000_000.0);
        assert_eq!(req.base_live_ad_cost, 5_000_000.0);
        assert_eq!(req.new_live_ad_cost, 0.0);
        assert_eq!(req.new_competitor_event, EventFlag::Yes);
        assert_eq!(req.base_competitor_event, EventFlag::No);
    }

    #[test]
    fn every_blank_cost_is_listed() {
        let form = SimulationForm {
            base_live_ad_cost: "  ".to_string(),
            new_search_ad_cost: String::new(),
            ..filled()
        };
        match form.validate() {
            Err(SimError::ValidationFailed(missing)) => {
                assert_eq!(missing, vec!["base_live_ad_cost", "new_search_ad_cost"]);
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn blank_event_flags_are_not_required() {
        let form = SimulationForm {
            base_competitor_event: String::new(),
            new_competitor_event: String::new(),
            ..filled()
        };
        let req = form.validate().unwrap();
        assert_eq!(req.new_competitor_event, EventFlag::No);
    }
}
