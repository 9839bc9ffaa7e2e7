//! Session cache keyed by the concatenated scenario inputs.

use std::collections::HashMap;

use crate::sim::SimulationRequest;

/// `base_search_base_live_new_search_new_live_baseflag_newflag`.
pub fn cache_key(req: &SimulationRequest) -> String {
    format!(
        "{}_{}_{}_{}_{}_{}",
        req.base_search_ad_cost,
        req.base_live_ad_cost,
        req.new_search_ad_cost,
        req.new_live_ad_cost,
        req.base_competitor_event.as_str(),
        req.new_competitor_event.as_str(),
    )
}

/// Lives as long as the session; never evicts.
#[derive(Debug, Clone)]
pub struct SimulationCache<V> {
    entries: HashMap<String, V>,
    hits: usize,
}

impl<V> Default for SimulationCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
        }
    }
}

impl<V: Clone> SimulationCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, req: &SimulationRequest) -> Option<V> {
        let hit = self.entries.get(&cache_key(req)).cloned();
        if hit.is_some() {
            self.hits += 1;
        }
        hit
    }

    pub fn insert(&mut self, req: &SimulationRequest, value: V) {
        self.entries.insert(cache_key(req), value);
    }

    /// Return the cached value or compute, store and return a fresh one.
    ///
    /// Errors are not cached.
    pub fn get_or_try_insert<E>(
        &mut self,
        req: &SimulationRequest,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<(V, bool), E> {
        if let Some(v) = self.get(req) {
            return Ok((v, true));
        }
        let v = compute()?;
        self.insert(req, v.clone());
        Ok((v, false))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }
}
