//! Similarity search over resolved cases.
//!
//! Ranked-search interface for "have we seen this before" lookups. The
//! built-in scorer ranks resolved cases by token overlap between the query
//! and each candidate's title and description. Deterministic and cheap; a
//! real vector index can implement the same trait.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::Case;

/// One ranked hit from a similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarCase {
    pub case_id: String,
    pub title: String,
    /// Overlap score in [0.0, 1.0]
    pub score: f64,
}

/// Ranked search over prior cases
pub trait SimilarCases: Send + Sync {
    /// Rank candidates against a free-text query, best first.
    /// Candidates with zero overlap are omitted.
    fn find(&self, query: &str, candidates: &[&Case], limit: usize) -> Vec<SimilarCase>;
}

/// Token-overlap ranking over resolved cases
#[derive(Debug, Clone, Default)]
pub struct ResolvedCaseIndex;

impl ResolvedCaseIndex {
    pub fn new() -> Self {
        Self
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 2)
        .map(|t| t.to_string())
        .collect()
}

fn overlap_score(query: &HashSet<String>, candidate: &HashSet<String>) -> f64 {
    if query.is_empty() || candidate.is_empty() {
        return 0.0;
    }
    let shared = query.intersection(candidate).count();
    shared as f64 / query.len() as f64
}

impl SimilarCases for ResolvedCaseIndex {
    fn find(&self, query: &str, candidates: &[&Case], limit: usize) -> Vec<SimilarCase> {
        let query_tokens = tokenize(query);

        let mut hits: Vec<SimilarCase> = candidates
            .iter()
            .filter(|c| c.is_resolved())
            .map(|c| {
                let text = match &c.description {
                    Some(desc) => format!("{} {}", c.title, desc),
                    None => c.title.clone(),
                };
                SimilarCase {
                    case_id: c.id.clone(),
                    title: c.title.clone(),
                    score: overlap_score(&query_tokens, &tokenize(&text)),
                }
            })
            .filter(|hit| hit.score > 0.0)
            .collect();

        // Best first; ties broken by id for determinism
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.case_id.cmp(&b.case_id))
        });
        hits.truncate(limit);
        hits
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Actor, Case, CaseState, Priority};

    fn resolved_case(id: &str, title: &str, description: &str) -> Case {
        let mut case = Case::create_new(
            id,
            title,
            Some(description),
            Priority::Medium,
            None,
            Some(&Actor::new("support001", "Alex Rodriguez")),
            None,
        );
        case.change_state(CaseState::Resolved, None);
        case
    }

    #[test]
    fn test_closest_resolved_case_ranks_first() {
        let hang = resolved_case(
            "CASE-1",
            "WebApp hangs when clicking run job button",
            "Application freezes and becomes unresponsive",
        );
        let perms = resolved_case(
            "CASE-2",
            "Permission denied creating job",
            "Non-admin user blocked from job creation",
        );
        let candidates = vec![&hang, &perms];

        let index = ResolvedCaseIndex::new();
        let hits = index.find("webapp hangs after clicking run job", &candidates, 10);

        assert!(!hits.is_empty());
        assert_eq!(hits[0].case_id, "CASE-1");
        assert!(hits[0].score > 0.0);
    }

    #[test]
    fn test_unresolved_cases_excluded() {
        let open = Case::create_new(
            "CASE-3",
            "WebApp hangs when clicking run job button",
            None,
            Priority::High,
            None,
            None,
            None,
        );
        let candidates = vec![&open];

        let index = ResolvedCaseIndex::new();
        assert!(index.find("webapp hangs run job", &candidates, 10).is_empty());
    }

    #[test]
    fn test_zero_overlap_omitted_and_limit_applied() {
        let a = resolved_case("CASE-A", "Database deadlock on nightly batch", "locks");
        let b = resolved_case("CASE-B", "Database deadlock on import", "locks held");
        let c = resolved_case("CASE-C", "Printer jam", "paper stuck");
        let candidates = vec![&a, &b, &c];

        let index = ResolvedCaseIndex::new();
        let hits = index.find("database deadlock", &candidates, 1);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].case_id.starts_with("CASE-"));
        assert_ne!(hits[0].case_id, "CASE-C");
    }
}
