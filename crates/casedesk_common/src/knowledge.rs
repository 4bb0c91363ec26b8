//! Design-review knowledge lookup.
//!
//! Read-only external collaborator: given a case and a query, return
//! product design guidance (known limitations, workarounds) or NoMatch.
//! The trait is the seam; `StaticDesignIndex` is the built-in index a real
//! documentation store can replace without touching the service layer.

/// Outcome of a design-review lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesignGuidance {
    /// Guidance text found for the query
    Found(String),
    /// Nothing in the index matches the query
    NoMatch,
}

/// Read-only lookup against a design knowledge source
pub trait DesignReview: Send + Sync {
    fn review(&self, query: &str) -> DesignGuidance;
}

/// One note in the static index
#[derive(Debug, Clone)]
struct DesignNote {
    keywords: &'static [&'static str],
    guidance: &'static str,
}

/// Built-in keyword-matched design notes
#[derive(Debug, Clone)]
pub struct StaticDesignIndex {
    notes: Vec<DesignNote>,
}

impl Default for StaticDesignIndex {
    fn default() -> Self {
        Self {
            notes: vec![
                DesignNote {
                    keywords: &["permission", "permission denied", "create job", "new job", "admin"],
                    guidance: "DESIGN LIMITATION: Non-Admin users are not permitted to create \
                               new jobs. This is by design for security reasons. WORKAROUND: \
                               Please contact your administrator to either: 1) Grant you admin \
                               privileges, or 2) Have an admin create the job on your behalf.",
                },
                DesignNote {
                    keywords: &["run job", "hang", "freeze", "unresponsive"],
                    guidance: "KNOWN BEHAVIOR: Long-running jobs block the UI thread while log \
                               writes flush. WORKAROUND: Ask the customer to retry after the \
                               current job completes; the async logging fix removes the hang.",
                },
            ],
        }
    }
}

impl StaticDesignIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DesignReview for StaticDesignIndex {
    fn review(&self, query: &str) -> DesignGuidance {
        let lower = query.to_lowercase();
        for note in &self.notes {
            if note.keywords.iter().any(|k| lower.contains(k)) {
                return DesignGuidance::Found(note.guidance.to_string());
            }
        }
        DesignGuidance::NoMatch
    }
}

// ============================================================================
// Tests
// ============================================================================
