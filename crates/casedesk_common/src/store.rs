//! In-memory case store.
//!
//! The single authoritative keyed collection of cases for the process.
//! Listing preserves insertion order, so the store keeps an id vector
//! beside the map. No persistence, no deletion; teardown is a no-op.

use std::collections::HashMap;

use crate::error::{CaseError, CaseResult};
use crate::model::{Case, CaseState, Priority};

/// Keyed collection of cases with insertion-ordered listing
#[derive(Debug, Default)]
pub struct CaseStore {
    cases: HashMap<String, Case>,
    order: Vec<String>,
}

impl CaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite by id. Overwrite is a supported idempotent save.
    pub fn put(&mut self, case: Case) -> String {
        let id = case.id.clone();
        if self.cases.insert(id.clone(), case).is_none() {
            self.order.push(id.clone());
        }
        id
    }

    /// Point lookup
    pub fn get(&self, id: &str) -> CaseResult<&Case> {
        self.cases
            .get(id)
            .ok_or_else(|| CaseError::CaseNotFound(id.to_string()))
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> CaseResult<&mut Case> {
        self.cases
            .get_mut(id)
            .ok_or_else(|| CaseError::CaseNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.cases.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// All cases in insertion order
    pub fn list(&self) -> Vec<&Case> {
        self.order
            .iter()
            .filter_map(|id| self.cases.get(id))
            .collect()
    }

    /// Non-mutating filter view over the full listing
    pub fn filter<F>(&self, predicate: F) -> Vec<&Case>
    where
        F: Fn(&Case) -> bool,
    {
        self.list().into_iter().filter(|c| predicate(c)).collect()
    }

    pub fn by_state(&self, state: CaseState) -> Vec<&Case> {
        self.filter(|c| c.state == state)
    }

    pub fn by_priority(&self, priority: Priority) -> Vec<&Case> {
        self.filter(|c| c.priority == priority)
    }

    pub fn by_assignee(&self, assignee_id: &str) -> Vec<&Case> {
        self.filter(|c| c.assignee_id.as_deref() == Some(assignee_id))
    }

    pub fn by_component(&self, component_id: &str) -> Vec<&Case> {
        self.filter(|c| c.component_id.as_deref() == Some(component_id))
    }

    pub fn by_customer(&self, customer_id: &str) -> Vec<&Case> {
        self.filter(|c| c.customer_id.as_deref() == Some(customer_id))
    }
}

// ============================================================================
// Tests
// ============================================================================
