//! A simulation session: one backend, one step log, one result cache.

use serde::Serialize;

use crate::error::SimError;
use crate::sim::{
    SimulationBackend, SimulationCache, SimulationForm, SimulationLog, SimulationRequest, SimulationResult,
    SimulationStep,
};

/// What one submitted scenario produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutcome {
    pub request: SimulationRequest,
    pub result: SimulationResult,
    pub step: SimulationStep,
    /// Served from the session cache instead of the backend.
    pub cached: bool,
}

pub struct Session<B> {
    backend: B,
    log: SimulationLog,
    results: SimulationCache<SimulationResult>,
}

impl<B: SimulationBackend> Session<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            log: SimulationLog::new(),
            results: SimulationCache::new(),
        }
    }

    /// Validate a form and run it. Invalid forms never reach the backend.
    pub fn submit(&mut self, form: &SimulationForm) -> Result<SimulationOutcome, SimError> {
        let request = form.validate()?;
        self.run(request)
    }

    pub fn run(&mut self, request: SimulationRequest) -> Result<SimulationOutcome, SimError> {
        let backend = &self.backend;
        let (result, cached) = self
            .results
            .get_or_try_insert(&request, || backend.simulate(&request))?;

        let step = self.log.record(&result);
        tracing::info!(
            step = step.step,
            cached,
            revenue = result.new_revenue,
            roi = result.new_roi,
            "simulation step recorded"
        );

        Ok(SimulationOutcome {
            request,
            result,
            step,
            cached,
        })
    }

    pub fn log(&self) -> &SimulationLog {
        &self.log
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn cache_hits(&self) -> usize {
        self.results.hits()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::sim::{EventFlag, OfflineModel};

    struct Counting {
        calls: Cell<usize>,
        inner: OfflineModel,
    }

    impl SimulationBackend for Counting {
        fn simulate(&self, req: &SimulationRequest) -> Result<SimulationResult, SimError> {
            self.calls.set(self.calls.get() + 1);
            self.inner.simulate(req)
        }
    }

    struct Down;

    impl SimulationBackend for Down {
        fn simulate(&self, _req: &SimulationRequest) -> Result<SimulationResult, SimError> {
            Err(SimError::RequestFailed {
                endpoint: "/simulate".to_string(),
                message: "connection refused".to_string(),
            })
        }
    }

    fn form(new_search: &str) -> SimulationForm {
        SimulationForm {
            base_search_ad_cost: "10000000".to_string(),
            base_live_ad_cost: "5000000".to_string(),
            base_competitor_event: "N".to_string(),
            new_search_ad_cost: new_search.to_string(),
            new_live_ad_cost: "5000000".to_string(),
            new_competitor_event: "N".to_string(),
        }
    }

    #[test]
    fn repeated_inputs_skip_the_backend_but_still_log() {
        let mut session = Session::new(Counting {
            calls: Cell::new(0),
            inner: OfflineModel::default(),
        });
        let first = session.submit(&form("20000000")).unwrap();
        let second = session.submit(&form("20000000")).unwrap();

        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(session.backend().calls.get(), 1);
        assert_eq!(session.cache_hits(), 1);
        assert_eq!(session.log().len(), 3);
        assert_eq!(second.step.step, 2);
    }

    #[test]
    fn invalid_form_never_reaches_backend() {
        let mut session = Session::new(Counting {
            calls: Cell::new(0),
            inner: OfflineModel::default(),
        });
        let err = session.submit(&form("")).unwrap_err();
        assert!(matches!(err, SimError::ValidationFailed(_)));
        assert_eq!(session.backend().calls.get(), 0);
        assert!(session.log().is_empty());
    }

    #[test]
    fn failed_request_leaves_log_untouched() {
        let mut session = Session::new(Down);
        let req = form("1").validate().unwrap();
        assert_eq!(req.new_competitor_event, EventFlag::No);
        assert!(session.run(req).is_err());
        assert!(session.log().is_empty());
    }
}
