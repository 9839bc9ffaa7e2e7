//! Ordered history of simulation results for the revenue/ROI chart.

use serde::Serialize;

use crate::sim::SimulationResult;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationStep {
    pub step: usize,
    pub revenue: f64,
    pub roi: f64,
}

/// Step 0 is the baseline of the first recorded result; every result then
/// appends its scenario as the next step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationLog {
    steps: Vec<SimulationStep>,
}

impl SimulationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result and return the step it was stored as.
    pub fn record(&mut self, result: &SimulationResult) -> SimulationStep {
        if self.steps.is_empty() {
            self.steps.push(SimulationStep {
                step: 0,
                revenue: result.base_revenue,
                roi: result.base_roi,
            });
        }
        let step = SimulationStep {
            step: self.steps.len(),
            revenue: result.new_revenue,
            roi: result.new_roi,
        };
        self.steps.push(step);
        step
    }

    pub fn steps(&self) -> &[SimulationStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn revenue_points(&self) -> Vec<(f64, f64)> {
        self.steps.iter().map(|s| (s.step as f64, s.revenue)).collect()
    }

    pub fn roi_points(&self) -> Vec<(f64, f64)> {
        self.steps.iter().map(|s| (s.step as f64, s.roi)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(base: f64, new: f64) -> SimulationResult {
        SimulationResult {
            success: true,
            base_revenue: base,
            new_revenue: new,
            base_roi: base / 100.0,
            new_roi: new / 100.0,
            ..SimulationResult::default()
        }
    }

    #[test]
    fn baseline_is_inserted_once() {
        let mut log = SimulationLog::new();
        let first = log.record(&result(100.0, 150.0));
        let second = log.record(&result(100.0, 90.0));

        assert_eq!(first.step, 1);
        assert_eq!(second.step, 2);
        let steps: Vec<(usize, f64)> = log.steps().iter().map(|s| (s.step, s.revenue)).collect();
        assert_eq!(steps, vec![(0, 100.0), (1, 150.0), (2, 90.0)]);
    }

    #[test]
    fn chart_points_follow_steps() {
        let mut log = SimulationLog::new();
        log.record(&result(200.0, 300.0));
        assert_eq!(log.roi_points(), vec![(0.0, 2.0), (1.0, 3.0)]);
        assert_eq!(log.len(), 2);
    }
}
