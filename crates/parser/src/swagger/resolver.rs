//! Single-hop `$ref` resolution against `definitions`
//!
//! A reference is followed exactly once. References found inside the
//! resolved schema are left for the caller, which decides how deep each
//! construct is inlined.

use super::types::{Schema, SchemaOrRef, SwaggerSpec};
use std::borrow::Cow;
use std::cell::RefCell;
use tracing::warn;

/// A reference that degraded to the empty schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceIssue {
    /// Missing target, a non-definition pointer, or another document
    Unresolved(String),
    /// The target exists but does not decode as a schema
    Malformed { reference: String, message: String },
}

/// Resolves references for one operation and remembers the ones that failed
pub struct RefResolver<'a> {
    spec: &'a SwaggerSpec,
    issues: RefCell<Vec<ReferenceIssue>>,
}

impl<'a> RefResolver<'a> {
    pub fn new(spec: &'a SwaggerSpec) -> Self {
        Self {
            spec,
            issues: RefCell::new(Vec::new()),
        }
    }

    /// Resolve a reference path, degrading to an empty schema
    pub fn resolve_ref(&self, ref_path: &str) -> Schema {
        match self.spec.resolve_schema_ref(ref_path) {
            Some(Ok(schema)) => schema,
            Some(Err(e)) => {
                warn!(reference = ref_path, error = %e, "malformed definition, using empty schema");
                self.record(ReferenceIssue::Malformed {
                    reference: ref_path.to_string(),
                    message: e.to_string(),
                });
                Schema::default()
            }
            None => {
                warn!(reference = ref_path, "unresolvable $ref, using empty schema");
                self.record(ReferenceIssue::Unresolved(ref_path.to_string()));
                Schema::default()
            }
        }
    }

    /// Inline schema as-is, or the target of a reference
    pub fn resolve<'s>(&self, schema_or_ref: &'s SchemaOrRef) -> Cow<'s, Schema> {
        match schema_or_ref {
            SchemaOrRef::Schema(schema) => Cow::Borrowed(schema),
            SchemaOrRef::Reference { ref_path } => Cow::Owned(self.resolve_ref(ref_path)),
        }
    }

    /// Note a reference that is never followed, such as a shared parameter
    pub fn skip_ref(&self, ref_path: &str) {
        warn!(reference = ref_path, "unsupported $ref, entry dropped");
        self.record(ReferenceIssue::Unresolved(ref_path.to_string()));
    }

    fn record(&self, issue: ReferenceIssue) {
        let mut issues = self.issues.borrow_mut();
        if !issues.contains(&issue) {
            issues.push(issue);
        }
    }

    /// Every degraded reference, in first-seen order
    pub fn into_issues(self) -> Vec<ReferenceIssue> {
        self.issues.into_inner()
    }

    /// References that could not be found, in first-seen order
    pub fn into_unresolved(self) -> Vec<String> {
        self.into_issues()
            .into_iter()
            .filter_map(|issue| match issue {
                ReferenceIssue::Unresolved(reference) => Some(reference),
                ReferenceIssue::Malformed { .. } => None,
            })
            .collect()
    }
}
