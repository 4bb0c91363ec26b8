//! Tool dispatch - the agent-facing operation boundary.
//!
//! An external decision-maker drives the case service by name + argument
//! bag. The operation set is a closed catalog: unknown tool names and
//! malformed argument shapes are rejected with `InvalidArgument` before
//! any store access. The decision-maker may call tools in any order; no
//! fixed sequence is assumed.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{CaseError, CaseResult};
use crate::knowledge::DesignGuidance;
use crate::model::{Actor, CaseState, Priority};
use crate::service::{CaseFilter, CaseService, NewCase, SimilarityQuery, DEFAULT_SIMILAR_LIMIT};

/// One tool invocation from the decision-maker
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    /// Tool name from the catalog
    pub name: String,
    /// Argument bag; shape depends on the tool
    #[serde(default)]
    pub args: Value,
}

impl ToolCall {
    pub fn new(name: &str, args: Value) -> Self {
        Self {
            name: name.to_string(),
            args,
        }
    }
}

/// A tool's entry in the catalog, for prompt construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
}

/// The closed catalog of tools the decision-maker may select from
pub fn tool_catalog() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "create_case",
            description: "Create a new case. Args: title, description?, priority? (low, medium, high, very_high), component_id?, creator_id?, creator_name?, customer_company?",
        },
        ToolSpec {
            name: "get_case",
            description: "Fetch the full snapshot of a case. Args: case_id",
        },
        ToolSpec {
            name: "list_cases",
            description: "List all cases, optionally filtered by one of: state, priority, assignee_id, component_id, customer_id",
        },
        ToolSpec {
            name: "assign_case",
            description: "Change the assignee of a case. Args: case_id, assignee_id (dev001 Sarah Johnson - WebApp, dev002 Mike Chen - AppLog, dev003 Jennifer Martinez - API, dba001 Robert Kim - Database, sec001 Emma Thompson - Security, support001 Alex Rodriguez - Support)",
        },
        ToolSpec {
            name: "unassign_case",
            description: "Clear the assignee of a case. Args: case_id",
        },
        ToolSpec {
            name: "change_state",
            description: "Change the state of a case. Args: case_id, state (new, in_progress, awaiting_customer_info, resolved)",
        },
        ToolSpec {
            name: "change_priority",
            description: "Change the priority of a case. Args: case_id, priority (low, medium, high, very_high)",
        },
        ToolSpec {
            name: "change_component",
            description: "Change the component of a case. Args: case_id, component_id (webapp, applog, api, database, other)",
        },
        ToolSpec {
            name: "add_comment",
            description: "Add a comment to a case. Args: case_id, content, author_id, author_name, is_internal?",
        },
        ToolSpec {
            name: "synthesize_comments",
            description: "Accept a consolidated summary of a case's comments. Args: case_id, summary, store_as_comment?",
        },
        ToolSpec {
            name: "review_design",
            description: "Look up product design guidance for a case's problem. Args: case_id, query",
        },
        ToolSpec {
            name: "find_similar_cases",
            description: "Rank past resolved cases similar to a case or free-text query. Args: case_id or query, limit?",
        },
    ]
}

// ============================================================================
// Argument schemas
// ============================================================================

// Unknown fields are rejected so the decision-maker cannot silently pass
// arguments the tool does not understand.

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateCaseArgs {
    title: String,
    description: Option<String>,
    priority: Option<String>,
    component_id: Option<String>,
    creator_id: Option<String>,
    creator_name: Option<String>,
    customer_company: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CaseIdArgs {
    case_id: String,
    performed_by_id: Option<String>,
    performed_by_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListCasesArgs {
    state: Option<String>,
    priority: Option<String>,
    assignee_id: Option<String>,
    component_id: Option<String>,
    customer_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AssignCaseArgs {
    case_id: String,
    assignee_id: String,
    performed_by_id: Option<String>,
    performed_by_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChangeStateArgs {
    case_id: String,
    state: String,
    performed_by_id: Option<String>,
    performed_by_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChangePriorityArgs {
    case_id: String,
    priority: String,
    performed_by_id: Option<String>,
    performed_by_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChangeComponentArgs {
    case_id: String,
    component_id: String,
    performed_by_id: Option<String>,
    performed_by_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AddCommentArgs {
    case_id: String,
    content: String,
    author_id: String,
    author_name: String,
    #[serde(default)]
    is_internal: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SynthesizeArgs {
    case_id: String,
    summary: String,
    #[serde(default)]
    store_as_comment: bool,
    author_id: Option<String>,
    author_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReviewDesignArgs {
    case_id: String,
    query: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FindSimilarArgs {
    case_id: Option<String>,
    query: Option<String>,
    limit: Option<usize>,
}

fn decode<T: serde::de::DeserializeOwned>(name: &str, args: &Value) -> CaseResult<T> {
    // An omitted argument bag arrives as Null; treat it like an empty
    // object so tools whose arguments are all optional accept it.
    let args = match args {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other.clone(),
    };
    serde_json::from_value(args)
        .map_err(|e| CaseError::InvalidArgument(format!("bad arguments for {name}: {e}")))
}

fn actor_from(id: Option<String>, name: Option<String>) -> Option<Actor> {
    let id = id?;
    let name = name.unwrap_or_else(|| id.clone());
    Some(Actor { id, name })
}

fn parse_state(s: &str) -> CaseResult<CaseState> {
    CaseState::parse(s).ok_or_else(|| {
        CaseError::InvalidArgument(format!(
            "Invalid state: {s}. Use values: new, in_progress, awaiting_customer_info, resolved"
        ))
    })
}

fn parse_priority(s: &str) -> CaseResult<Priority> {
    Priority::parse(s).ok_or_else(|| {
        CaseError::InvalidArgument(format!(
            "Invalid priority: {s}. Use values: low, medium, high, very_high"
        ))
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> CaseResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CaseError::InvalidArgument(format!("serialization failed: {e}")))
}

// ============================================================================
// Dispatch
// ============================================================================

/// Execute one tool call against the service.
///
/// Returns the textual result the decision-maker reads back, or the error
/// it should recover from. Validation happens before any store access.
pub fn dispatch(service: &CaseService, call: &ToolCall) -> CaseResult<String> {
    debug!(tool = %call.name, "dispatching tool call");

    match call.name.as_str() {
        "create_case" => {
            let args: CreateCaseArgs = decode(&call.name, &call.args)?;
            let priority = match args.priority.as_deref() {
                Some(s) => parse_priority(s)?,
                None => Priority::default(),
            };
            let case = service.create_case(NewCase {
                id: None,
                title: args.title,
                description: args.description,
                priority,
                component_id: args.component_id,
                creator: actor_from(args.creator_id, args.creator_name),
                customer_company: args.customer_company,
            })?;
            to_json(&case)
        }
        "get_case" => {
            let args: CaseIdArgs = decode(&call.name, &call.args)?;
            let case = service.get_case(&args.case_id)?;
            to_json(&case)
        }
        "list_cases" => {
            let args: ListCasesArgs = decode(&call.name, &call.args)?;
            let filter = list_filter(args)?;
            let cases = service.list_cases(filter);
            to_json(&cases)
        }
        "assign_case" => {
            let args: AssignCaseArgs = decode(&call.name, &call.args)?;
            let actor = actor_from(args.performed_by_id, args.performed_by_name);
            service.assign_case(&args.case_id, &args.assignee_id, actor.as_ref())
        }
        "unassign_case" => {
            let args: CaseIdArgs = decode(&call.name, &call.args)?;
            let actor = actor_from(args.performed_by_id, args.performed_by_name);
            service.unassign_case(&args.case_id, actor.as_ref())
        }
        "change_state" => {
            let args: ChangeStateArgs = decode(&call.name, &call.args)?;
            let state = parse_state(&args.state)?;
            let actor = actor_from(args.performed_by_id, args.performed_by_name);
            service.change_state(&args.case_id, state, actor.as_ref())
        }
        "change_priority" => {
            let args: ChangePriorityArgs = decode(&call.name, &call.args)?;
            let priority = parse_priority(&args.priority)?;
            let actor = actor_from(args.performed_by_id, args.performed_by_name);
            service.change_priority(&args.case_id, priority, actor.as_ref())
        }
        "change_component" => {
            let args: ChangeComponentArgs = decode(&call.name, &call.args)?;
            let actor = actor_from(args.performed_by_id, args.performed_by_name);
            service.change_component(&args.case_id, &args.component_id, actor.as_ref())
        }
        "add_comment" => {
            let args: AddCommentArgs = decode(&call.name, &call.args)?;
            let author = Actor::new(&args.author_id, &args.author_name);
            let comment =
                service.add_comment(&args.case_id, &args.content, &author, args.is_internal)?;
            Ok(format!(
                "Added comment {} to case {}: {}",
                comment.id, args.case_id, args.content
            ))
        }
        "synthesize_comments" => {
            let args: SynthesizeArgs = decode(&call.name, &call.args)?;
            let author = actor_from(args.author_id, args.author_name);
            service.synthesize_comments(
                &args.case_id,
                &args.summary,
                args.store_as_comment,
                author.as_ref(),
            )
        }
        "review_design" => {
            let args: ReviewDesignArgs = decode(&call.name, &call.args)?;
            match service.review_design(&args.case_id, &args.query)? {
                DesignGuidance::Found(text) => Ok(text),
                DesignGuidance::NoMatch => {
                    Ok("No design guidance found for this query".to_string())
                }
            }
        }
        "find_similar_cases" => {
            let args: FindSimilarArgs = decode(&call.name, &call.args)?;
            let query = match (args.case_id, args.query) {
                (Some(case_id), None) => SimilarityQuery::Case(case_id),
                (None, Some(query)) => SimilarityQuery::Text(query),
                _ => {
                    return Err(CaseError::InvalidArgument(
                        "find_similar_cases takes exactly one of case_id or query".to_string(),
                    ))
                }
            };
            let hits =
                service.find_similar(query, args.limit.unwrap_or(DEFAULT_SIMILAR_LIMIT))?;
            to_json(&hits)
        }
        other => Err(CaseError::InvalidArgument(format!(
            "Unknown tool: {other}"
        ))),
    }
}

fn list_filter(args: ListCasesArgs) -> CaseResult<Option<CaseFilter>> {
    let mut filters = Vec::new();
    if let Some(s) = args.state {
        filters.push(CaseFilter::State(parse_state(&s)?));
    }
    if let Some(p) = args.priority {
        filters.push(CaseFilter::Priority(parse_priority(&p)?));
    }
    if let Some(id) = args.assignee_id {
        filters.push(CaseFilter::Assignee(id));
    }
    if let Some(id) = args.component_id {
        filters.push(CaseFilter::Component(id));
    }
    if let Some(id) = args.customer_id {
        filters.push(CaseFilter::Customer(id));
    }

    match filters.len() {
        0 => Ok(None),
        1 => Ok(filters.pop()),
        _ => Err(CaseError::InvalidArgument(
            "list_cases takes at most one filter field".to_string(),
        )),
    }
}

// ============================================================================
// Tests
// ============================================================================
