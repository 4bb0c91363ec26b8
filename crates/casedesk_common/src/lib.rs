//! Casedesk Common - case tracking core for an agent-driven service desk.
//!
//! The pieces: a typed case model with an append-only audit trail, an
//! insertion-ordered in-memory store, the service layer that is the sole
//! mutator of store state, and a closed tool-dispatch boundary an external
//! decision-making agent drives by name + argument bag. The agent loop
//! itself lives outside this crate.

pub mod catalog;
pub mod dispatch;
pub mod error;
pub mod fixtures;
pub mod knowledge;
pub mod model;
pub mod service;
pub mod similar;
pub mod store;

pub use catalog::{Assignee, Catalog, Component};
pub use dispatch::{dispatch, tool_catalog, ToolCall, ToolSpec};
pub use error::{CaseError, CaseResult};
pub use knowledge::{DesignGuidance, DesignReview, StaticDesignIndex};
pub use model::{ActionKind, Actor, AuditEntry, Case, CaseState, Comment, Priority};
pub use service::{CaseFilter, CaseService, NewCase, SimilarityQuery};
pub use similar::{ResolvedCaseIndex, SimilarCase, SimilarCases};
pub use store::CaseStore;
