//! Command handlers for casedeskctl.
//!
//! Each handler maps CLI arguments onto one service operation and prints
//! the result through the shared envelope. Operation failures are local
//! and recoverable, so they become failure envelopes rather than process
//! aborts.

use anyhow::Result;
use owo_colors::OwoColorize;
use serde_json::json;

use casedesk_common::{
    dispatch, fixtures::DemoCaseIds, tool_catalog, Actor, CaseError, CaseFilter, CaseResult,
    CaseService, CaseState, DesignGuidance, NewCase, Priority, SimilarityQuery, ToolCall,
};

use crate::output::{print_case, print_case_line, CommandOutput};

fn finish(command: &str, result: CaseResult<String>, json: bool) -> Result<()> {
    let envelope = match result {
        Ok(message) => CommandOutput::success(command, message),
        Err(err) => CommandOutput::failure(command, err.code(), err.to_string()),
    };
    envelope.print(json);
    Ok(())
}

fn parse_state(s: &str) -> CaseResult<CaseState> {
    CaseState::parse(s).ok_or_else(|| CaseError::InvalidArgument(format!("Invalid state: {s}")))
}

fn parse_priority(s: &str) -> CaseResult<Priority> {
    Priority::parse(s).ok_or_else(|| CaseError::InvalidArgument(format!("Invalid priority: {s}")))
}

/// The CLI acts on behalf of a catalog identity; default is the support desk.
fn cli_actor(service: &CaseService, id: &str) -> CaseResult<Actor> {
    let assignee = service.catalog().assignee(id)?;
    Ok(Actor::new(&assignee.id, &assignee.name))
}

pub fn list(
    service: &CaseService,
    state: Option<String>,
    priority: Option<String>,
    assignee: Option<String>,
    component: Option<String>,
    json: bool,
) -> Result<()> {
    let filter = match (state, priority, assignee, component) {
        (None, None, None, None) => None,
        (Some(s), None, None, None) => Some(CaseFilter::State(parse_state(&s)?)),
        (None, Some(p), None, None) => Some(CaseFilter::Priority(parse_priority(&p)?)),
        (None, None, Some(a), None) => Some(CaseFilter::Assignee(a)),
        (None, None, None, Some(c)) => Some(CaseFilter::Component(c)),
        _ => {
            return finish(
                "list",
                Err(CaseError::InvalidArgument(
                    "use at most one filter field".to_string(),
                )),
                json,
            )
        }
    };

    let cases = service.list_cases(filter);
    if json {
        println!("{}", serde_json::to_string_pretty(&cases)?);
        return Ok(());
    }
    for case in &cases {
        print_case_line(case);
    }
    if cases.is_empty() {
        println!("{}", "no cases".dimmed());
    }
    Ok(())
}

pub fn show(service: &CaseService, case_id: &str, json: bool) -> Result<()> {
    match service.get_case(case_id) {
        Ok(case) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&case)?);
            } else {
                print_case(&case);
            }
            Ok(())
        }
        Err(err) => finish("show", Err(err), json),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn create(
    service: &CaseService,
    title: String,
    description: Option<String>,
    priority: String,
    component: Option<String>,
    company: Option<String>,
    json: bool,
) -> Result<()> {
    let result = parse_priority(&priority).and_then(|priority| {
        let creator = cli_actor(service, "support001")?;
        let case = service.create_case(NewCase {
            id: None,
            title,
            description,
            priority,
            component_id: component,
            creator: Some(creator),
            customer_company: company,
        })?;
        Ok(format!("Created case {} ({})", case.id, case.title))
    });
    finish("create", result, json)
}

pub fn assign(service: &CaseService, case_id: &str, assignee_id: &str, json: bool) -> Result<()> {
    let result = cli_actor(service, "support001")
        .and_then(|actor| service.assign_case(case_id, assignee_id, Some(&actor)));
    finish("assign", result, json)
}

pub fn unassign(service: &CaseService, case_id: &str, json: bool) -> Result<()> {
    let result = cli_actor(service, "support001")
        .and_then(|actor| service.unassign_case(case_id, Some(&actor)));
    finish("unassign", result, json)
}

pub fn change_state(service: &CaseService, case_id: &str, state: &str, json: bool) -> Result<()> {
    let result = parse_state(state).and_then(|state| {
        let actor = cli_actor(service, "support001")?;
        service.change_state(case_id, state, Some(&actor))
    });
    finish("state", result, json)
}

pub fn change_priority(
    service: &CaseService,
    case_id: &str,
    priority: &str,
    json: bool,
) -> Result<()> {
    let result = parse_priority(priority).and_then(|priority| {
        let actor = cli_actor(service, "support001")?;
        service.change_priority(case_id, priority, Some(&actor))
    });
    finish("priority", result, json)
}

pub fn change_component(
    service: &CaseService,
    case_id: &str,
    component_id: &str,
    json: bool,
) -> Result<()> {
    let result = cli_actor(service, "support001")
        .and_then(|actor| service.change_component(case_id, component_id, Some(&actor)));
    finish("component", result, json)
}

pub fn comment(
    service: &CaseService,
    case_id: &str,
    content: &str,
    internal: bool,
    author: &str,
    json: bool,
) -> Result<()> {
    let result = cli_actor(service, author).and_then(|author| {
        let comment = service.add_comment(case_id, content, &author, internal)?;
        Ok(format!("Added comment {} to case {}", comment.id, case_id))
    });
    finish("comment", result, json)
}

pub fn similar(
    service: &CaseService,
    case_id: Option<String>,
    query: Option<String>,
    json: bool,
) -> Result<()> {
    let query = match (case_id, query) {
        (Some(id), None) => SimilarityQuery::Case(id),
        (None, Some(text)) => SimilarityQuery::Text(text),
        _ => {
            return finish(
                "similar",
                Err(CaseError::InvalidArgument(
                    "use exactly one of --case-id or --query".to_string(),
                )),
                json,
            )
        }
    };

    match service.find_similar(query, 5) {
        Ok(hits) => {
            if json {
                let doc: Vec<_> = hits
                    .iter()
                    .map(|h| json!({"case_id": h.case_id, "title": h.title, "score": h.score}))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&doc)?);
                return Ok(());
            }
            if hits.is_empty() {
                println!("{}", "no similar resolved cases".dimmed());
            }
            for hit in hits {
                println!("{:.2}  {}  {}", hit.score, hit.case_id.bold(), hit.title);
            }
            Ok(())
        }
        Err(err) => finish("similar", Err(err), json),
    }
}

pub fn review(service: &CaseService, case_id: &str, query: &str, json: bool) -> Result<()> {
    let result = service.review_design(case_id, query).map(|g| match g {
        DesignGuidance::Found(text) => text,
        DesignGuidance::NoMatch => "No design guidance found for this query".to_string(),
    });
    finish("review", result, json)
}

pub fn call(service: &CaseService, name: &str, args: &str, json: bool) -> Result<()> {
    let result = serde_json::from_str(args)
        .map_err(|e| CaseError::InvalidArgument(format!("bad args JSON: {e}")))
        .and_then(|args| dispatch(service, &ToolCall::new(name, args)));
    finish("call", result, json)
}

pub fn tools(json: bool) -> Result<()> {
    let catalog = tool_catalog();
    if json {
        let doc: Vec<_> = catalog
            .iter()
            .map(|t| json!({"name": t.name, "description": t.description}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }
    for tool in catalog {
        println!("{}", tool.name.bold());
        println!("  {}", tool.description.dimmed());
    }
    Ok(())
}

/// Replay the scripted scenarios: the calls an agent would make, issued in
/// a fixed order so the output is reproducible.
pub fn demo(service: &CaseService) -> Result<()> {
    let ids = DemoCaseIds {
        historical: "CASE-2025-001".to_string(),
        incoming: "CASE-2025-002".to_string(),
        complex: "CASE-2025-003".to_string(),
        permissions: "CASE-2025-004".to_string(),
    };

    println!("{}", "scenario 1: incoming duplicate of a resolved case".bold());
    let hits = service.find_similar(SimilarityQuery::Case(ids.incoming.clone()), 3)?;
    for hit in &hits {
        println!("  similar: {:.2} {} {}", hit.score, hit.case_id, hit.title);
    }
    let step = dispatch(
        service,
        &ToolCall::new(
            "assign_case",
            json!({"case_id": ids.incoming, "assignee_id": "dev002"}),
        ),
    )?;
    println!("  {}", step);
    let step = dispatch(
        service,
        &ToolCall::new(
            "change_component",
            json!({"case_id": ids.incoming, "component_id": "applog"}),
        ),
    )?;
    println!("  {}", step);
    let step = dispatch(
        service,
        &ToolCall::new(
            "add_comment",
            json!({
                "case_id": ids.incoming,
                "content": "Matches resolved CASE-2025-001: AppLog deadlock during job \
                            execution. Applying the same async-logging fix.",
                "author_id": "dev002",
                "author_name": "Mike Chen",
                "is_internal": true,
            }),
        ),
    )?;
    println!("  {}", step);
    let step = dispatch(
        service,
        &ToolCall::new(
            "change_state",
            json!({"case_id": ids.incoming, "state": "resolved", "performed_by_id": "dev002"}),
        ),
    )?;
    println!("  {}", step);

    println!("\n{}", "scenario 2: synthesize the long investigation thread".bold());
    let case = service.get_case(&ids.complex)?;
    let summary = format!(
        "{} comments across database, API, security and webapp teams; root cause was \
         frontend memory leaks corrupting requests; fix deployed and verified.",
        case.comments.len()
    );
    let step = dispatch(
        service,
        &ToolCall::new(
            "synthesize_comments",
            json!({"case_id": ids.complex, "summary": summary, "store_as_comment": true}),
        ),
    )?;
    println!("  {}", step);

    println!("\n{}", "scenario 3: permission denied is a design limitation".bold());
    let step = dispatch(
        service,
        &ToolCall::new(
            "review_design",
            json!({"case_id": ids.permissions, "query": "permission denied creating new job"}),
        ),
    )?;
    println!("  {}", step);
    let step = dispatch(
        service,
        &ToolCall::new(
            "add_comment",
            json!({
                "case_id": ids.permissions,
                "content": "This is a known design limitation: non-admin users cannot create \
                            jobs. Please ask your administrator to grant admin privileges or \
                            create the job on your behalf.",
                "author_id": "support001",
                "author_name": "Alex Rodriguez",
                "is_internal": false,
            }),
        ),
    )?;
    println!("  {}", step);
    let step = dispatch(
        service,
        &ToolCall::new(
            "change_state",
            json!({"case_id": ids.permissions, "state": "awaiting_customer_info"}),
        ),
    )?;
    println!("  {}", step);

    println!("\n{}", "final store".bold());
    for case in service.list_cases(None) {
        print_case_line(&case);
    }
    Ok(())
}
