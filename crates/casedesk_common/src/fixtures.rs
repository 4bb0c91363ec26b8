//! Demo case fixtures.
//!
//! The four scripted scenario cases, built through the service path so
//! every fixture carries a valid audit trail. Used by the demo CLI and by
//! lifecycle tests.

use crate::error::CaseResult;
use crate::model::{Actor, CaseState, Priority};
use crate::service::{CaseService, NewCase};

/// Ids of the seeded demo cases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoCaseIds {
    /// Resolved historical case the similarity search should surface
    pub historical: String,
    /// Freshly reported duplicate of the historical problem
    pub incoming: String,
    /// Long-running multi-team investigation
    pub complex: String,
    /// Design-limitation report (permission denied)
    pub permissions: String,
}

fn support() -> Actor {
    Actor::new("support001", "Alex Rodriguez")
}

fn webapp_dev() -> Actor {
    Actor::new("dev001", "Sarah Johnson")
}

fn applog_dev() -> Actor {
    Actor::new("dev002", "Mike Chen")
}

/// Seed the four demo cases into the service's store
pub fn load_demo_cases(service: &CaseService) -> CaseResult<DemoCaseIds> {
    let historical = load_historical_case(service)?;
    let incoming = load_incoming_case(service)?;
    let complex = load_complex_case(service)?;
    let permissions = load_permissions_case(service)?;

    Ok(DemoCaseIds {
        historical,
        incoming,
        complex,
        permissions,
    })
}

fn load_historical_case(service: &CaseService) -> CaseResult<String> {
    let case = service.create_case(NewCase {
        id: Some("CASE-2025-001".to_string()),
        title: "WebApp Hangs When Clicking Run Job Button".to_string(),
        description: Some(
            "Customer reports that clicking the 'run job' button causes the entire web \
             application to hang and become unresponsive. This makes the app completely \
             unusable for their business operations."
                .to_string(),
        ),
        priority: Priority::High,
        component_id: Some("webapp".to_string()),
        creator: Some(support()),
        customer_company: Some("Initech".to_string()),
    })?;
    let id = case.id;

    service.assign_case(&id, "dev001", Some(&support()))?;
    service.change_state(&id, CaseState::InProgress, Some(&webapp_dev()))?;
    service.add_comment(
        &id,
        "Initial report received from customer. WebApp freezes when 'run job' button is \
         clicked. Assigning to WebApp development team for initial investigation.",
        &support(),
        false,
    )?;
    service.add_comment(
        &id,
        "Started investigation. Checking WebApp frontend code and button click handlers. \
         Initial tests show button click triggers but app becomes unresponsive.",
        &webapp_dev(),
        true,
    )?;
    service.add_comment(
        &id,
        "WebApp frontend code appears correct. Button click successfully initiates job \
         process. However, discovered that app hangs occur when job tries to write logs. \
         Suspecting AppLog component issue. Reassigning to AppLog team.",
        &webapp_dev(),
        true,
    )?;
    service.assign_case(&id, "dev002", Some(&webapp_dev()))?;
    service.change_component(&id, "applog", Some(&webapp_dev()))?;
    service.add_comment(
        &id,
        "Investigation confirmed: AppLog component has a deadlock issue when multiple log \
         entries are written simultaneously during job execution. This causes the entire \
         application to hang waiting for log writes to complete.",
        &applog_dev(),
        true,
    )?;
    service.add_comment(
        &id,
        "Fix implemented: Updated AppLog component to use async logging with proper queue \
         management. Deployed to production. Customer confirmed 'run job' button now works \
         correctly without hanging.",
        &applog_dev(),
        false,
    )?;
    service.change_state(&id, CaseState::Resolved, Some(&applog_dev()))?;

    Ok(id)
}

fn load_incoming_case(service: &CaseService) -> CaseResult<String> {
    let case = service.create_case(NewCase {
        id: Some("CASE-2025-002".to_string()),
        title: "WebApp Hangs When Clicking Run Job Button".to_string(),
        description: Some(
            "Customer reports that clicking the 'run job' button causes the entire web \
             application to hang and become unresponsive. This makes the app completely \
             unusable for their business operations."
                .to_string(),
        ),
        priority: Priority::High,
        component_id: Some("webapp".to_string()),
        creator: Some(support()),
        customer_company: Some("Globex".to_string()),
    })?;
    let id = case.id;

    service.assign_case(&id, "dev001", Some(&support()))?;
    Ok(id)
}

fn load_complex_case(service: &CaseService) -> CaseResult<String> {
    let dba = Actor::new("dba001", "Robert Kim");
    let api_dev = Actor::new("dev003", "Jennifer Martinez");
    let security = Actor::new("sec001", "Emma Thompson");

    let case = service.create_case(NewCase {
        id: Some("CASE-2025-003".to_string()),
        title: "Performance Issues and Intermittent 500 Errors in Production".to_string(),
        description: Some(
            "Multiple customers reporting slow response times and intermittent 500 errors \
             across different parts of the application. Issue seems to be affecting the \
             entire platform with no clear pattern."
                .to_string(),
        ),
        priority: Priority::High,
        component_id: Some("other".to_string()),
        creator: Some(support()),
        customer_company: Some("Multiple customers".to_string()),
    })?;
    let id = case.id;

    service.add_comment(
        &id,
        "Initial customer reports coming in about slow performance and 500 errors. Creating \
         high priority case. Multiple customers affected across different browsers and devices.",
        &support(),
        false,
    )?;
    service.assign_case(&id, "dba001", Some(&support()))?;
    service.change_state(&id, CaseState::InProgress, Some(&dba))?;
    service.change_priority(&id, Priority::VeryHigh, Some(&support()))?;
    service.add_comment(
        &id,
        "Database team investigating performance issues. Initial analysis shows database \
         queries are performing normally. No blocking queries detected.",
        &dba,
        true,
    )?;
    service.add_comment(
        &id,
        "API team analysis: Backend endpoints are responding correctly with normal latency. \
         500 errors appear to be triggered by malformed requests coming from the frontend.",
        &api_dev,
        true,
    )?;
    service.add_comment(
        &id,
        "Security team investigated potential DDoS or attack vectors. No malicious activity \
         detected. The errors seem to be legitimate user interactions gone wrong.",
        &security,
        true,
    )?;
    service.assign_case(&id, "dev001", Some(&dba))?;
    service.change_component(&id, "webapp", Some(&dba))?;
    service.add_comment(
        &id,
        "WebApp team taking over investigation. Found significant memory leaks in frontend \
         components. DOM nodes not being properly cleaned up, causing browser performance \
         degradation over time and corrupted form data before submission.",
        &webapp_dev(),
        true,
    )?;
    service.add_comment(
        &id,
        "Deployed comprehensive fix including component optimization, proper event listener \
         cleanup, and improved state management. Monitoring shows normal memory usage.",
        &webapp_dev(),
        false,
    )?;

    Ok(id)
}

fn load_permissions_case(service: &CaseService) -> CaseResult<String> {
    let case = service.create_case(NewCase {
        id: Some("CASE-2025-004".to_string()),
        title: "Cannot Create New Job - Permission Denied Error".to_string(),
        description: Some(
            "Customer reports that when they try to create a new job using their regular \
             user account, they get a 'Permission Denied' error. They need to be able to \
             create jobs for their daily workflow but the system is blocking them."
                .to_string(),
        ),
        priority: Priority::Medium,
        component_id: Some("webapp".to_string()),
        creator: Some(support()),
        customer_company: Some("Hooli".to_string()),
    })?;
    let id = case.id;

    service.assign_case(&id, "support001", Some(&support()))?;
    Ok(id)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::model::ActionKind;

    #[test]
    fn test_demo_cases_load_cleanly() {
        let svc = CaseService::new(Catalog::seed());
        let ids = load_demo_cases(&svc).unwrap();

        assert_eq!(svc.case_count(), 4);
        assert_eq!(ids.historical, "CASE-2025-001");
        assert_eq!(ids.permissions, "CASE-2025-004");

        // every fixture has a replayable trail starting with Created
        for case in svc.list_cases(None) {
            assert_eq!(case.history[0].action, ActionKind::Created);
            assert_eq!(case.count_actions(ActionKind::Created), 1);
            assert_eq!(
                case.comments.len(),
                case.count_actions(ActionKind::CommentAdded)
            );
            assert!(case.updated_at >= case.created_at);
        }
    }

    #[test]
    fn test_historical_case_shape() {
        let svc = CaseService::new(Catalog::seed());
        let ids = load_demo_cases(&svc).unwrap();

        let historical = svc.get_case(&ids.historical).unwrap();
        assert!(historical.is_resolved());
        assert_eq!(historical.component_id.as_deref(), Some("applog"));
        assert_eq!(historical.assignee_id.as_deref(), Some("dev002"));
        assert_eq!(historical.comments.len(), 5);

        let incoming = svc.get_case(&ids.incoming).unwrap();
        assert_eq!(incoming.state, CaseState::New);
        assert!(incoming.comments.is_empty());
    }

    #[test]
    fn test_incoming_case_finds_historical_twin() {
        use crate::service::SimilarityQuery;

        let svc = CaseService::new(Catalog::seed());
        let ids = load_demo_cases(&svc).unwrap();

        let hits = svc
            .find_similar(SimilarityQuery::Case(ids.incoming.clone()), 5)
            .unwrap();
        assert!(!hits.is_empty());
        assert_eq!(hits[0].case_id, ids.historical);
    }
}
