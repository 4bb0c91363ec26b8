//! Case data model - entities and their append-only audit trail.
//!
//! A `Case` is the central entity: classification (priority, state,
//! component), ownership (assignee), customer linkage, an ordered comment
//! thread, and an append-only `history` of `AuditEntry` records. Every
//! mutation appends exactly one audit entry and bumps `updated_at`, so the
//! trail can be replayed to reconstruct what happened to a case.
//!
//! Fields are public for serialization and read access; the mutation
//! methods are crate-private so all writes flow through the service layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Priority
// ============================================================================

/// Priority levels for cases
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    VeryHigh,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::VeryHigh => "very_high",
        }
    }

    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "very_high" | "veryhigh" => Some(Priority::VeryHigh),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Case State
// ============================================================================

/// Workflow states for a case.
///
/// Transitions are deliberately unrestricted: any state can move to any
/// other, including out of `Resolved`. `Resolved` is terminal only as
/// workflow guidance, not structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseState {
    New,
    InProgress,
    AwaitingCustomerInfo,
    Resolved,
}

impl CaseState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseState::New => "new",
            CaseState::InProgress => "in_progress",
            CaseState::AwaitingCustomerInfo => "awaiting_customer_info",
            CaseState::Resolved => "resolved",
        }
    }

    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "new" => Some(CaseState::New),
            "in_progress" | "inprogress" => Some(CaseState::InProgress),
            "awaiting_customer_info" | "awaitingcustomerinfo" => {
                Some(CaseState::AwaitingCustomerInfo)
            }
            "resolved" => Some(CaseState::Resolved),
            _ => None,
        }
    }
}

impl std::fmt::Display for CaseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Audit Trail
// ============================================================================

/// Kinds of actions recorded in a case's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Created,
    Updated,
    Assigned,
    Unassigned,
    StateChanged,
    PriorityChanged,
    CommentAdded,
    Resolved,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Created => "created",
            ActionKind::Updated => "updated",
            ActionKind::Assigned => "assigned",
            ActionKind::Unassigned => "unassigned",
            ActionKind::StateChanged => "state_changed",
            ActionKind::PriorityChanged => "priority_changed",
            ActionKind::CommentAdded => "comment_added",
            ActionKind::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable record in a case's audit trail.
///
/// Unifies the typed action-kind representation with generic field diffs:
/// the kind says what happened, the optional `field`/`old_value`/`new_value`
/// carry the diff for value changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Entry ID
    pub id: Uuid,
    /// What kind of action this records
    pub action: ActionKind,
    /// When the action was performed
    pub timestamp: DateTime<Utc>,
    /// Field affected, for value changes ("state", "priority", ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Value before the change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    /// Value after the change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
    /// Who performed the action (catalog key)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performed_by_id: Option<String>,
    /// Display name of the actor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performed_by_name: Option<String>,
    /// Free-text details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AuditEntry {
    /// Create a new entry timestamped now
    pub fn new(action: ActionKind) -> Self {
        Self::at(action, Utc::now())
    }

    /// Create a new entry with an explicit timestamp
    pub fn at(action: ActionKind, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            action,
            timestamp,
            field: None,
            old_value: None,
            new_value: None,
            performed_by_id: None,
            performed_by_name: None,
            details: None,
        }
    }

    /// Set the affected field name
    pub fn with_field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    /// Set the old/new value diff
    pub fn with_change(mut self, old_value: Option<String>, new_value: Option<String>) -> Self {
        self.old_value = old_value;
        self.new_value = new_value;
        self
    }

    /// Set the actor
    pub fn with_actor(mut self, actor: &Actor) -> Self {
        self.performed_by_id = Some(actor.id.clone());
        self.performed_by_name = Some(actor.name.clone());
        self
    }

    /// Set free-text details
    pub fn with_details(mut self, details: &str) -> Self {
        self.details = Some(details.to_string());
        self
    }
}

/// Who is performing an operation (identity + display name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
}

impl Actor {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

// ============================================================================
// Comment
// ============================================================================

/// One conversational entry on a case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Comment ID
    pub id: Uuid,
    /// Comment body
    pub content: String,
    /// Author identity (catalog key or external id)
    pub author_id: String,
    /// Author display name
    pub author_name: String,
    /// Internal note vs. customer-visible
    pub is_internal: bool,
    /// When the comment was added
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Case
// ============================================================================

/// A trackable support case with classification, ownership, and a full
/// audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    /// Unique case ID, immutable after creation
    pub id: String,
    /// Short summary (non-empty)
    pub title: String,
    /// Longer free-text description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Current priority
    pub priority: Priority,
    /// Current workflow state
    pub state: CaseState,
    /// Component the case is attributed to (catalog key)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    /// Person currently responsible (catalog key)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    /// Customer identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// Customer company name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_company: Option<String>,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// External reference (e.g. upstream tracker id)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_reference: Option<String>,
    /// Set once at construction
    pub created_at: DateTime<Utc>,
    /// Bumped on every mutation
    pub updated_at: DateTime<Utc>,
    /// Comment thread, insertion order, append-only
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Audit trail, insertion order, append-only
    #[serde(default)]
    pub history: Vec<AuditEntry>,
}

impl Case {
    /// Create a new case in state `New` with the initial `Created` entry.
    pub(crate) fn create_new(
        id: &str,
        title: &str,
        description: Option<&str>,
        priority: Priority,
        component_id: Option<&str>,
        creator: Option<&Actor>,
        customer_company: Option<&str>,
    ) -> Self {
        let now = Utc::now();
        let mut case = Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.map(|s| s.to_string()),
            priority,
            state: CaseState::New,
            component_id: component_id.map(|s| s.to_string()),
            assignee_id: None,
            customer_id: None,
            customer_company: customer_company.map(|s| s.to_string()),
            tags: Vec::new(),
            external_reference: None,
            created_at: now,
            updated_at: now,
            comments: Vec::new(),
            history: Vec::new(),
        };

        // Stamp the Created entry with the construction instant so a fresh
        // case has created_at == updated_at until something mutates it.
        let mut entry = AuditEntry::at(ActionKind::Created, now).with_details(&format!(
            "Case '{}' created for {}",
            title,
            customer_company.unwrap_or("unknown customer")
        ));
        if let Some(actor) = creator {
            entry = entry.with_actor(actor);
        }
        case.push_entry(entry);
        case
    }

    /// Append an audit entry and bump `updated_at`.
    ///
    /// The entry's timestamp becomes the case's new `updated_at` so the
    /// two never disagree about when the last mutation happened.
    pub(crate) fn push_entry(&mut self, entry: AuditEntry) {
        self.updated_at = entry.timestamp;
        self.history.push(entry);
    }

    /// Add a comment and record a `CommentAdded` entry.
    pub(crate) fn add_comment(
        &mut self,
        content: &str,
        author_id: &str,
        author_name: &str,
        is_internal: bool,
    ) -> Comment {
        let comment = Comment {
            id: Uuid::new_v4(),
            content: content.to_string(),
            author_id: author_id.to_string(),
            author_name: author_name.to_string(),
            is_internal,
            created_at: Utc::now(),
        };
        self.comments.push(comment.clone());

        let visibility = if is_internal { "internal" } else { "external" };
        self.push_entry(
            AuditEntry::new(ActionKind::CommentAdded)
                .with_actor(&Actor::new(author_id, author_name))
                .with_details(&format!("Added {} comment", visibility)),
        );
        comment
    }

    /// Change the state and record a `StateChanged` entry.
    ///
    /// A change to the current state still appends an entry: the trail
    /// records what was requested, not just what differed.
    pub(crate) fn change_state(&mut self, new_state: CaseState, actor: Option<&Actor>) {
        let old_state = self.state;
        self.state = new_state;

        let mut entry = AuditEntry::new(ActionKind::StateChanged)
            .with_field("state")
            .with_change(
                Some(old_state.as_str().to_string()),
                Some(new_state.as_str().to_string()),
            )
            .with_details(&format!("State changed from {} to {}", old_state, new_state));
        if let Some(actor) = actor {
            entry = entry.with_actor(actor);
        }
        self.push_entry(entry);
    }

    /// Change the priority and record a `PriorityChanged` entry.
    pub(crate) fn change_priority(&mut self, new_priority: Priority, actor: Option<&Actor>) {
        let old_priority = self.priority;
        self.priority = new_priority;

        let mut entry = AuditEntry::new(ActionKind::PriorityChanged)
            .with_field("priority")
            .with_change(
                Some(old_priority.as_str().to_string()),
                Some(new_priority.as_str().to_string()),
            )
            .with_details(&format!(
                "Priority changed from {} to {}",
                old_priority, new_priority
            ));
        if let Some(actor) = actor {
            entry = entry.with_actor(actor);
        }
        self.push_entry(entry);
    }

    /// Change the component and record an `Updated` entry with the diff.
    pub(crate) fn change_component(&mut self, new_component_id: &str, actor: Option<&Actor>) {
        let old_component = self.component_id.take();
        self.component_id = Some(new_component_id.to_string());

        let mut entry = AuditEntry::new(ActionKind::Updated)
            .with_field("component")
            .with_change(old_component, Some(new_component_id.to_string()));
        if let Some(actor) = actor {
            entry = entry.with_actor(actor);
        }
        self.push_entry(entry);
    }

    /// Assign the case and record an `Assigned` entry.
    pub(crate) fn assign_to(
        &mut self,
        assignee_id: &str,
        assignee_name: &str,
        actor: Option<&Actor>,
    ) {
        let old_assignee = self.assignee_id.take();
        self.assignee_id = Some(assignee_id.to_string());

        let mut entry = AuditEntry::new(ActionKind::Assigned)
            .with_field("assignee")
            .with_change(old_assignee, Some(assignee_id.to_string()))
            .with_details(&format!("Case assigned to {}", assignee_name));
        if let Some(actor) = actor {
            entry = entry.with_actor(actor);
        }
        self.push_entry(entry);
    }

    /// Clear the assignee and record an `Unassigned` entry.
    pub(crate) fn unassign(&mut self, actor: Option<&Actor>) {
        let old_assignee = self.assignee_id.take();

        let mut entry = AuditEntry::new(ActionKind::Unassigned)
            .with_field("assignee")
            .with_change(old_assignee, None)
            .with_details("Case unassigned");
        if let Some(actor) = actor {
            entry = entry.with_actor(actor);
        }
        self.push_entry(entry);
    }

    /// Whether the case is resolved
    pub fn is_resolved(&self) -> bool {
        self.state == CaseState::Resolved
    }

    /// Count of audit entries with the given kind
    pub fn count_actions(&self, kind: ActionKind) -> usize {
        self.history.iter().filter(|e| e.action == kind).count()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn new_case() -> Case {
        Case::create_new(
            "CASE-1",
            "Login broken",
            Some("Users cannot log in"),
            Priority::High,
            Some("webapp"),
            Some(&Actor::new("support001", "Alex Rodriguez")),
            Some("Acme Corp"),
        )
    }

    #[test]
    fn test_enum_wire_strings() {
        assert_eq!(Priority::VeryHigh.as_str(), "very_high");
        assert_eq!(CaseState::AwaitingCustomerInfo.as_str(), "awaiting_customer_info");
        assert_eq!(ActionKind::StateChanged.as_str(), "state_changed");

        let json = serde_json::to_string(&CaseState::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!(Priority::parse("VERY_HIGH"), Some(Priority::VeryHigh));
        assert_eq!(Priority::parse("bogus"), None);
        assert_eq!(CaseState::parse("in_progress"), Some(CaseState::InProgress));
        assert_eq!(CaseState::parse("closed"), None);
    }

    #[test]
    fn test_create_new_invariants() {
        let case = new_case();
        assert_eq!(case.state, CaseState::New);
        assert_eq!(case.priority, Priority::High);
        assert_eq!(case.history.len(), 1);
        assert_eq!(case.history[0].action, ActionKind::Created);
        assert!(case.comments.is_empty());
        assert_eq!(case.created_at, case.updated_at);
        assert_eq!(case.history[0].timestamp, case.created_at);
    }

    #[test]
    fn test_change_state_records_diff() {
        let mut case = new_case();
        case.change_state(CaseState::InProgress, None);

        assert_eq!(case.state, CaseState::InProgress);
        assert_eq!(case.history.len(), 2);
        let entry = &case.history[1];
        assert_eq!(entry.action, ActionKind::StateChanged);
        assert_eq!(entry.old_value.as_deref(), Some("new"));
        assert_eq!(entry.new_value.as_deref(), Some("in_progress"));
        assert!(case.updated_at >= case.created_at);
    }

    #[test]
    fn test_redundant_state_change_still_recorded() {
        let mut case = new_case();
        case.change_state(CaseState::New, None);
        assert_eq!(case.history.len(), 2);
        assert_eq!(case.history[1].old_value.as_deref(), Some("new"));
        assert_eq!(case.history[1].new_value.as_deref(), Some("new"));
    }

    #[test]
    fn test_assign_unassign_cycle() {
        let mut case = new_case();
        case.assign_to("dev001", "Sarah Johnson", None);
        assert_eq!(case.assignee_id.as_deref(), Some("dev001"));
        assert_eq!(case.history[1].action, ActionKind::Assigned);
        assert_eq!(case.history[1].old_value, None);
        assert_eq!(case.history[1].new_value.as_deref(), Some("dev001"));

        case.unassign(None);
        assert_eq!(case.assignee_id, None);
        assert_eq!(case.history[2].action, ActionKind::Unassigned);
        assert_eq!(case.history[2].old_value.as_deref(), Some("dev001"));
        assert_eq!(case.history[2].new_value, None);
    }

    #[test]
    fn test_add_comment_preserves_visibility() {
        let mut case = new_case();
        let c1 = case.add_comment("Investigating", "dev001", "Sarah Johnson", true);
        let c2 = case.add_comment("Fixed", "dev001", "Sarah Johnson", false);

        assert_eq!(case.comments.len(), 2);
        assert!(c1.is_internal);
        assert!(!c2.is_internal);
        assert!(case.comments[0].is_internal);
        assert!(!case.comments[1].is_internal);
        assert_eq!(case.count_actions(ActionKind::CommentAdded), 2);
    }

    #[test]
    fn test_case_serde_round_trip() {
        let mut case = new_case();
        case.change_state(CaseState::InProgress, Some(&Actor::new("dev002", "Mike Chen")));
        case.add_comment("note one", "dev002", "Mike Chen", true);
        case.add_comment("note two", "dev002", "Mike Chen", false);
        case.change_priority(Priority::VeryHigh, None);

        let json = serde_json::to_string(&case).unwrap();
        let back: Case = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, case.id);
        assert_eq!(back.state, case.state);
        assert_eq!(back.priority, case.priority);
        assert_eq!(back.comments.len(), case.comments.len());
        assert_eq!(back.history.len(), case.history.len());
        for (a, b) in case.history.iter().zip(back.history.iter()) {
            assert_eq!(a.action, b.action);
            assert_eq!(a.old_value, b.old_value);
            assert_eq!(a.new_value, b.new_value);
        }
        for (a, b) in case.comments.iter().zip(back.comments.iter()) {
            assert_eq!(a.content, b.content);
            assert_eq!(a.is_internal, b.is_internal);
        }
    }
}
