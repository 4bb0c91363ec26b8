//! Case service - the deterministic tool layer over the store.
//!
//! Every operation is atomic with respect to a single case: validate,
//! mutate, append exactly one audit entry, return a confirmation the
//! calling agent can read back. The store lives behind an `RwLock`; a
//! mutation holds the write lock for the whole sequence, and reads hand
//! out cloned snapshots so nobody observes a case mid-mutation.
//!
//! Failures are discriminated results (`CaseError`), never panics, and a
//! failed operation leaves the store exactly as it was.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::{CaseError, CaseResult};
use crate::knowledge::{DesignGuidance, DesignReview, StaticDesignIndex};
use crate::model::{Actor, Case, CaseState, Comment, Priority};
use crate::similar::{ResolvedCaseIndex, SimilarCase, SimilarCases};
use crate::store::CaseStore;

/// Default result count for similarity searches
pub const DEFAULT_SIMILAR_LIMIT: usize = 5;

/// Parameters for creating a case
#[derive(Debug, Clone, Default)]
pub struct NewCase {
    /// Explicit id; generated when absent
    pub id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub component_id: Option<String>,
    pub creator: Option<Actor>,
    pub customer_company: Option<String>,
}

/// Single-field filter for case listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseFilter {
    State(CaseState),
    Priority(Priority),
    Assignee(String),
    Component(String),
    Customer(String),
}

/// What to search against when looking for similar cases
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimilarityQuery {
    /// Use an existing case's title and description as the query
    Case(String),
    /// Free-text query
    Text(String),
}

/// The tool layer: sole mutator of store state
pub struct CaseService {
    store: RwLock<CaseStore>,
    catalog: Catalog,
    design_index: Box<dyn DesignReview>,
    similar_index: Box<dyn SimilarCases>,
}

impl CaseService {
    /// Service over an empty store with the built-in lookups
    pub fn new(catalog: Catalog) -> Self {
        Self {
            store: RwLock::new(CaseStore::new()),
            catalog,
            design_index: Box::new(StaticDesignIndex::new()),
            similar_index: Box::new(ResolvedCaseIndex::new()),
        }
    }

    /// Swap in a different design-review source
    pub fn with_design_index(mut self, index: Box<dyn DesignReview>) -> Self {
        self.design_index = index;
        self
    }

    /// Swap in a different similarity index
    pub fn with_similar_index(mut self, index: Box<dyn SimilarCases>) -> Self {
        self.similar_index = index;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // A poisoned lock only means another caller panicked mid-operation;
    // the store itself is still consistent (mutations are applied through
    // invariant-preserving methods), so recover rather than propagate.
    fn read(&self) -> RwLockReadGuard<'_, CaseStore> {
        self.store.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CaseStore> {
        self.store.write().unwrap_or_else(|e| e.into_inner())
    }

    // ========================================================================
    // Creation and lookup
    // ========================================================================

    /// Create a case: state `New`, one `Created` history entry.
    pub fn create_case(&self, req: NewCase) -> CaseResult<Case> {
        if req.title.trim().is_empty() {
            return Err(CaseError::Validation("title must not be empty".to_string()));
        }
        // At creation an unresolvable component means the request as a whole
        // is invalid, so it surfaces as a validation failure rather than the
        // catalog's lookup error.
        if let Some(component_id) = &req.component_id {
            if self.catalog.component(component_id).is_err() {
                return Err(CaseError::Validation(format!(
                    "Invalid component ID: {component_id}"
                )));
            }
        }

        let id = req
            .id
            .unwrap_or_else(|| format!("CASE-{}", uuid::Uuid::new_v4()));

        let mut store = self.write();
        if store.contains(&id) {
            return Err(CaseError::Validation(format!("Case {id} already exists")));
        }

        let case = Case::create_new(
            &id,
            &req.title,
            req.description.as_deref(),
            req.priority,
            req.component_id.as_deref(),
            req.creator.as_ref(),
            req.customer_company.as_deref(),
        );
        store.put(case.clone());

        info!(case_id = %id, priority = %case.priority, "case created");
        Ok(case)
    }

    /// Full case snapshot
    pub fn get_case(&self, case_id: &str) -> CaseResult<Case> {
        self.read().get(case_id).cloned()
    }

    /// Snapshots of all cases, optionally filtered by a single field
    pub fn list_cases(&self, filter: Option<CaseFilter>) -> Vec<Case> {
        let store = self.read();
        let cases = match &filter {
            None => store.list(),
            Some(CaseFilter::State(state)) => store.by_state(*state),
            Some(CaseFilter::Priority(priority)) => store.by_priority(*priority),
            Some(CaseFilter::Assignee(id)) => store.by_assignee(id),
            Some(CaseFilter::Component(id)) => store.by_component(id),
            Some(CaseFilter::Customer(id)) => store.by_customer(id),
        };
        cases.into_iter().cloned().collect()
    }

    /// Number of cases in the store
    pub fn case_count(&self) -> usize {
        self.read().len()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Assign a case to a catalog assignee
    pub fn assign_case(
        &self,
        case_id: &str,
        assignee_id: &str,
        performed_by: Option<&Actor>,
    ) -> CaseResult<String> {
        let assignee = self.catalog.assignee(assignee_id)?.clone();

        let mut store = self.write();
        let case = store.get_mut(case_id)?;
        let old_name = case
            .assignee_id
            .as_deref()
            .and_then(|id| self.catalog.assignee(id).ok())
            .map(|a| a.name.clone())
            .unwrap_or_else(|| "nobody".to_string());
        case.assign_to(&assignee.id, &assignee.name, performed_by);

        info!(case_id, assignee_id, "case assigned");
        Ok(format!(
            "Changed assignee from {} to {} for case {}",
            old_name, assignee.name, case_id
        ))
    }

    /// Clear a case's assignee
    pub fn unassign_case(&self, case_id: &str, performed_by: Option<&Actor>) -> CaseResult<String> {
        let mut store = self.write();
        let case = store.get_mut(case_id)?;
        case.unassign(performed_by);

        info!(case_id, "case unassigned");
        Ok(format!("Unassigned case {}", case_id))
    }

    /// Change a case's workflow state.
    ///
    /// Transitions are unrestricted, and a redundant change to the current
    /// state still appends a history entry.
    pub fn change_state(
        &self,
        case_id: &str,
        new_state: CaseState,
        performed_by: Option<&Actor>,
    ) -> CaseResult<String> {
        let mut store = self.write();
        let case = store.get_mut(case_id)?;
        let old_state = case.state;
        case.change_state(new_state, performed_by);

        info!(case_id, from = %old_state, to = %new_state, "state changed");
        Ok(format!(
            "Changed state from {} to {} for case {}",
            old_state, new_state, case_id
        ))
    }

    /// Change a case's priority
    pub fn change_priority(
        &self,
        case_id: &str,
        new_priority: Priority,
        performed_by: Option<&Actor>,
    ) -> CaseResult<String> {
        let mut store = self.write();
        let case = store.get_mut(case_id)?;
        let old_priority = case.priority;
        case.change_priority(new_priority, performed_by);

        info!(case_id, from = %old_priority, to = %new_priority, "priority changed");
        Ok(format!(
            "Changed priority from {} to {} for case {}",
            old_priority, new_priority, case_id
        ))
    }

    /// Attribute a case to a different catalog component
    pub fn change_component(
        &self,
        case_id: &str,
        new_component_id: &str,
        performed_by: Option<&Actor>,
    ) -> CaseResult<String> {
        self.catalog.component(new_component_id)?;

        let mut store = self.write();
        let case = store.get_mut(case_id)?;
        let old_component = case
            .component_id
            .clone()
            .unwrap_or_else(|| "none".to_string());
        case.change_component(new_component_id, performed_by);

        info!(case_id, from = %old_component, to = new_component_id, "component changed");
        Ok(format!(
            "Changed component from {} to {} for case {}",
            old_component, new_component_id, case_id
        ))
    }

    /// Append a comment to a case's thread
    pub fn add_comment(
        &self,
        case_id: &str,
        content: &str,
        author: &Actor,
        is_internal: bool,
    ) -> CaseResult<Comment> {
        if content.trim().is_empty() {
            return Err(CaseError::InvalidArgument(
                "comment content must not be empty".to_string(),
            ));
        }

        let mut store = self.write();
        let case = store.get_mut(case_id)?;
        let comment = case.add_comment(content, &author.id, &author.name, is_internal);

        info!(case_id, comment_id = %comment.id, is_internal, "comment added");
        Ok(comment)
    }

    /// Accept a consolidated comment summary produced by the caller.
    ///
    /// Content quality is entirely the decision-maker's business; the
    /// service's contract is to echo the text back and, when asked, store
    /// it as an internal comment on the case.
    pub fn synthesize_comments(
        &self,
        case_id: &str,
        summary: &str,
        store_as_comment: bool,
        author: Option<&Actor>,
    ) -> CaseResult<String> {
        // Validate the case exists even when only echoing
        self.read().get(case_id)?;

        if store_as_comment {
            let author = author.cloned().unwrap_or_else(|| Actor::new("agent", "Agent"));
            self.add_comment(case_id, summary, &author, true)?;
        }

        debug!(case_id, stored = store_as_comment, "comments synthesized");
        Ok(format!("Here is the summary of the comments: \n\n {summary}"))
    }

    // ========================================================================
    // Read-only lookups
    // ========================================================================

    /// Look up design guidance for a case's problem
    pub fn review_design(&self, case_id: &str, query: &str) -> CaseResult<DesignGuidance> {
        self.read().get(case_id)?;
        Ok(self.design_index.review(query))
    }

    /// Ranked similarity search over resolved cases.
    ///
    /// A `SimilarityQuery::Case` query never returns the source case itself.
    pub fn find_similar(
        &self,
        query: SimilarityQuery,
        limit: usize,
    ) -> CaseResult<Vec<SimilarCase>> {
        let store = self.read();

        let (query_text, exclude_id) = match &query {
            SimilarityQuery::Case(case_id) => {
                let case = store.get(case_id)?;
                let text = match &case.description {
                    Some(desc) => format!("{} {}", case.title, desc),
                    None => case.title.clone(),
                };
                (text, Some(case_id.clone()))
            }
            SimilarityQuery::Text(text) => {
                if text.trim().is_empty() {
                    return Err(CaseError::InvalidArgument(
                        "similarity query must not be empty".to_string(),
                    ));
                }
                (text.clone(), None)
            }
        };

        let all = store.list();
        let candidates: Vec<&Case> = all
            .into_iter()
            .filter(|c| exclude_id.as_deref() != Some(c.id.as_str()))
            .collect();

        Ok(self.similar_index.find(&query_text, &candidates, limit))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ActionKind;

    fn service() -> CaseService {
        CaseService::new(Catalog::seed())
    }

    fn create(svc: &CaseService, title: &str) -> Case {
        svc.create_case(NewCase {
            title: title.to_string(),
            priority: Priority::High,
            component_id: Some("webapp".to_string()),
            creator: Some(Actor::new("support001", "Alex Rodriguez")),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_create_validates_title_and_component() {
        let svc = service();

        let err = svc
            .create_case(NewCase {
                title: "   ".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.code(), "validation_error");

        // A bad component at create time fails the whole request as
        // validation, unlike the lookup error a later change_component gets
        let err = svc
            .create_case(NewCase {
                title: "broken".to_string(),
                component_id: Some("mainframe".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.code(), "validation_error");

        // Nothing was stored by the failed attempts
        assert_eq!(svc.case_count(), 0);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let svc = service();
        svc.create_case(NewCase {
            id: Some("CASE-X".to_string()),
            title: "first".to_string(),
            ..Default::default()
        })
        .unwrap();

        let err = svc
            .create_case(NewCase {
                id: Some("CASE-X".to_string()),
                title: "second".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.code(), "validation_error");
        assert_eq!(svc.get_case("CASE-X").unwrap().title, "first");
    }

    #[test]
    fn test_unknown_case_leaves_store_untouched() {
        let svc = service();
        let case = create(&svc, "Login broken");
        let history_before = svc.get_case(&case.id).unwrap().history.len();

        let actor = Actor::new("dev001", "Sarah Johnson");
        assert!(matches!(
            svc.change_state("CASE-404", CaseState::Resolved, Some(&actor)),
            Err(CaseError::CaseNotFound(_))
        ));
        assert!(matches!(
            svc.assign_case("CASE-404", "dev001", None),
            Err(CaseError::CaseNotFound(_))
        ));
        assert!(matches!(
            svc.add_comment("CASE-404", "hello", &actor, false),
            Err(CaseError::CaseNotFound(_))
        ));

        assert_eq!(svc.case_count(), 1);
        assert_eq!(svc.get_case(&case.id).unwrap().history.len(), history_before);
    }

    #[test]
    fn test_bad_component_change_leaves_case_unchanged() {
        let svc = service();
        let case = create(&svc, "Login broken");

        let err = svc.change_component(&case.id, "mainframe", None).unwrap_err();
        assert_eq!(err.code(), "invalid_argument");

        let after = svc.get_case(&case.id).unwrap();
        assert_eq!(after.component_id.as_deref(), Some("webapp"));
        assert_eq!(after.history.len(), case.history.len());
    }

    #[test]
    fn test_confirmation_strings() {
        let svc = service();
        let case = create(&svc, "Login broken");

        let msg = svc
            .change_state(&case.id, CaseState::InProgress, None)
            .unwrap();
        assert_eq!(
            msg,
            format!("Changed state from new to in_progress for case {}", case.id)
        );

        let msg = svc.assign_case(&case.id, "dev002", None).unwrap();
        assert_eq!(
            msg,
            format!("Changed assignee from nobody to Mike Chen for case {}", case.id)
        );

        let msg = svc.assign_case(&case.id, "dev001", None).unwrap();
        assert_eq!(
            msg,
            format!(
                "Changed assignee from Mike Chen to Sarah Johnson for case {}",
                case.id
            )
        );

        let msg = svc.change_component(&case.id, "applog", None).unwrap();
        assert_eq!(
            msg,
            format!("Changed component from webapp to applog for case {}", case.id)
        );
    }

    #[test]
    fn test_every_mutation_appends_one_entry() {
        let svc = service();
        let case = create(&svc, "Login broken");
        let actor = Actor::new("dev001", "Sarah Johnson");

        svc.change_state(&case.id, CaseState::InProgress, Some(&actor)).unwrap();
        svc.change_priority(&case.id, Priority::VeryHigh, Some(&actor)).unwrap();
        svc.assign_case(&case.id, "dev001", Some(&actor)).unwrap();
        svc.unassign_case(&case.id, Some(&actor)).unwrap();
        svc.change_component(&case.id, "api", Some(&actor)).unwrap();
        svc.add_comment(&case.id, "looking", &actor, true).unwrap();

        let after = svc.get_case(&case.id).unwrap();
        assert_eq!(after.history.len(), 7);
        assert_eq!(after.history[0].action, ActionKind::Created);
        assert_eq!(after.comments.len(), 1);
        assert_eq!(after.count_actions(ActionKind::CommentAdded), 1);
        assert!(after.updated_at >= after.created_at);
    }

    #[test]
    fn test_synthesize_echoes_and_optionally_stores() {
        let svc = service();
        let case = create(&svc, "Login broken");

        let echoed = svc
            .synthesize_comments(&case.id, "All clear.", false, None)
            .unwrap();
        assert!(echoed.contains("All clear."));
        assert!(svc.get_case(&case.id).unwrap().comments.is_empty());

        svc.synthesize_comments(&case.id, "All clear.", true, None).unwrap();
        let after = svc.get_case(&case.id).unwrap();
        assert_eq!(after.comments.len(), 1);
        assert!(after.comments[0].is_internal);

        assert!(matches!(
            svc.synthesize_comments("CASE-404", "x", false, None),
            Err(CaseError::CaseNotFound(_))
        ));
    }

    #[test]
    fn test_review_design_requires_known_case() {
        let svc = service();
        let case = create(&svc, "Cannot create job");

        match svc.review_design(&case.id, "permission denied creating job").unwrap() {
            DesignGuidance::Found(text) => assert!(text.contains("DESIGN LIMITATION")),
            DesignGuidance::NoMatch => panic!("expected guidance"),
        }
        assert_eq!(
            svc.review_design(&case.id, "quantum flux").unwrap(),
            DesignGuidance::NoMatch
        );
        assert!(svc.review_design("CASE-404", "anything").is_err());
    }

    #[test]
    fn test_find_similar_excludes_source_case() {
        let svc = service();
        let old = create(&svc, "WebApp hangs when clicking run job button");
        svc.change_state(&old.id, CaseState::Resolved, None).unwrap();
        let incoming = create(&svc, "WebApp hangs when clicking run job button");

        let hits = svc
            .find_similar(SimilarityQuery::Case(incoming.id.clone()), DEFAULT_SIMILAR_LIMIT)
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].case_id, old.id);

        let hits = svc
            .find_similar(
                SimilarityQuery::Text("webapp hangs run job".to_string()),
                DEFAULT_SIMILAR_LIMIT,
            )
            .unwrap();
        assert_eq!(hits[0].case_id, old.id);

        assert!(svc
            .find_similar(SimilarityQuery::Text("  ".to_string()), 5)
            .is_err());
    }

    #[test]
    fn test_list_filters() {
        let svc = service();
        let a = create(&svc, "one");
        let _b = create(&svc, "two");
        svc.change_priority(&a.id, Priority::Low, None).unwrap();
        svc.assign_case(&a.id, "dev003", None).unwrap();

        assert_eq!(svc.list_cases(None).len(), 2);
        assert_eq!(
            svc.list_cases(Some(CaseFilter::Priority(Priority::Low))).len(),
            1
        );
        assert_eq!(
            svc.list_cases(Some(CaseFilter::Assignee("dev003".to_string()))).len(),
            1
        );
        assert_eq!(
            svc.list_cases(Some(CaseFilter::State(CaseState::Resolved))).len(),
            0
        );
        assert_eq!(
            svc.list_cases(Some(CaseFilter::Component("webapp".to_string()))).len(),
            2
        );
    }
}
