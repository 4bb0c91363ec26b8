//! Reference catalogs with stable assignee and component profiles.
//!
//! Assignees and components are static seed data loaded at process start:
//! deterministic identities, read-only lookup by key, never mutated by the
//! case lifecycle. A catalog can also be loaded from a TOML document so
//! deployments can swap the roster without a rebuild.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CaseError, CaseResult};

/// A person who can be assigned to a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl Assignee {
    /// Get formatted display: "Name (Department)"
    pub fn display(&self) -> String {
        match &self.department {
            Some(dept) => format!("{} ({})", self.name, dept),
            None => self.name.clone(),
        }
    }
}

/// A system component a case can be attributed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// TOML document shape for catalog files
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    assignees: Vec<Assignee>,
    #[serde(default)]
    components: Vec<Component>,
}

/// Read-only keyed catalogs of assignees and components
#[derive(Debug, Clone)]
pub struct Catalog {
    assignees: HashMap<String, Assignee>,
    components: HashMap<String, Component>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seed()
    }
}

impl Catalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self {
            assignees: HashMap::new(),
            components: HashMap::new(),
        }
    }

    /// The built-in deterministic roster
    pub fn seed() -> Self {
        let mut catalog = Self::new();

        for (id, name, email, department) in [
            ("dev001", "Sarah Johnson", "sarah.j@company.com", "WebApp Development"),
            ("dev002", "Mike Chen", "mike.c@company.com", "AppLog Development"),
            ("dev003", "Jennifer Martinez", "jen.m@company.com", "API Development"),
            ("dba001", "Robert Kim", "robert.k@company.com", "Database Administration"),
            ("sec001", "Emma Thompson", "emma.t@company.com", "Security Team"),
            ("support001", "Alex Rodriguez", "alex.r@company.com", "Customer Support"),
        ] {
            catalog.add_assignee(Assignee {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                department: Some(department.to_string()),
            });
        }

        for (id, name, description) in [
            ("webapp", "WebApp", "Customer-facing web application frontend"),
            ("applog", "AppLog", "Application logging subsystem"),
            ("api", "API", "Backend API endpoints"),
            ("database", "Database", "Database layer"),
            ("other", "Other", "Anything not covered by a named component"),
        ] {
            catalog.add_component(Component {
                id: id.to_string(),
                name: name.to_string(),
                description: Some(description.to_string()),
            });
        }

        catalog
    }

    /// Load a catalog from a TOML file on disk
    pub fn from_toml_file(path: &std::path::Path) -> CaseResult<Self> {
        let doc = std::fs::read_to_string(path).map_err(|e| {
            CaseError::InvalidArgument(format!("cannot read catalog file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&doc)
    }

    /// Load a catalog from a TOML document
    pub fn from_toml_str(doc: &str) -> CaseResult<Self> {
        let file: CatalogFile = toml::from_str(doc)
            .map_err(|e| CaseError::InvalidArgument(format!("bad catalog file: {e}")))?;

        let mut catalog = Self::new();
        for assignee in file.assignees {
            catalog.add_assignee(assignee);
        }
        for component in file.components {
            catalog.add_component(component);
        }
        Ok(catalog)
    }

    pub fn add_assignee(&mut self, assignee: Assignee) {
        self.assignees.insert(assignee.id.clone(), assignee);
    }

    pub fn add_component(&mut self, component: Component) {
        self.components.insert(component.id.clone(), component);
    }

    /// Look up an assignee, failing with `InvalidArgument` on unknown keys
    pub fn assignee(&self, id: &str) -> CaseResult<&Assignee> {
        self.assignees
            .get(id)
            .ok_or_else(|| CaseError::InvalidArgument(format!("Invalid assignee ID: {id}")))
    }

    /// Look up a component, failing with `InvalidArgument` on unknown keys
    pub fn component(&self, id: &str) -> CaseResult<&Component> {
        self.components
            .get(id)
            .ok_or_else(|| CaseError::InvalidArgument(format!("Invalid component ID: {id}")))
    }

    /// All assignees, sorted by id for stable output
    pub fn assignees(&self) -> Vec<&Assignee> {
        let mut all: Vec<&Assignee> = self.assignees.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// All components, sorted by id for stable output
    pub fn components(&self) -> Vec<&Component> {
        let mut all: Vec<&Component> = self.components.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_roster() {
        let catalog = Catalog::seed();
        assert_eq!(catalog.assignees().len(), 6);
        assert_eq!(catalog.components().len(), 5);

        let sarah = catalog.assignee("dev001").unwrap();
        assert_eq!(sarah.name, "Sarah Johnson");
        assert_eq!(sarah.display(), "Sarah Johnson (WebApp Development)");

        let webapp = catalog.component("webapp").unwrap();
        assert_eq!(webapp.name, "WebApp");
    }

    #[test]
    fn test_unknown_keys_are_errors() {
        let catalog = Catalog::seed();
        assert!(matches!(
            catalog.assignee("nobody"),
            Err(CaseError::InvalidArgument(_))
        ));
        assert!(matches!(
            catalog.component("mainframe"),
            Err(CaseError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_from_toml() {
        let doc = r#"
            [[assignees]]
            id = "dev009"
            name = "Jan Novak"
            email = "jan.n@company.com"
            department = "Platform"

            [[components]]
            id = "billing"
            name = "Billing"
        "#;
        let catalog = Catalog::from_toml_str(doc).unwrap();
        assert_eq!(catalog.assignee("dev009").unwrap().name, "Jan Novak");
        assert_eq!(catalog.component("billing").unwrap().description, None);
    }

    #[test]
    fn test_bad_toml_is_invalid_argument() {
        let err = Catalog::from_toml_str("not [ valid").unwrap_err();
        assert_eq!(err.code(), "invalid_argument");
    }

    #[test]
    fn test_from_toml_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[components]]\nid = \"search\"\nname = \"Search\"\n"
        )
        .unwrap();

        let catalog = Catalog::from_toml_file(file.path()).unwrap();
        assert_eq!(catalog.component("search").unwrap().name, "Search");

        let err = Catalog::from_toml_file(std::path::Path::new("/nonexistent.toml")).unwrap_err();
        assert_eq!(err.code(), "invalid_argument");
    }
}
