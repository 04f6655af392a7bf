//! Endpoint selection
//!
//! Two independent predicates gate which operations are compiled: a
//! required-scope text match and an explicit `{path, method}` allow-list.
//! Both work purely on spec text and caller-supplied lists.

use crate::swagger::Operation;
use modeldef_common::EndpointRef;
use std::fmt;

/// Outcome of filtering one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDecision {
    Included,
    /// Required scopes absent from the operation's text
    MissingScopes(Vec<String>),
    NotInEndpointList,
}

impl FilterDecision {
    pub fn is_included(&self) -> bool {
        matches!(self, FilterDecision::Included)
    }
}

impl fmt::Display for FilterDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterDecision::Included => f.write_str("included"),
            FilterDecision::MissingScopes(scopes) => {
                write!(f, "doesn't match required scopes ({})", scopes.join(", "))
            }
            FilterDecision::NotInEndpointList => f.write_str("not in endpoint list"),
        }
    }
}

/// Scope and allow-list filter
#[derive(Debug, Clone, Default)]
pub struct EndpointFilter {
    required_scopes: Vec<String>,
    endpoints: Vec<EndpointRef>,
}

impl EndpointFilter {
    /// Filter that includes every operation
    pub fn new() -> Self {
        Self::default()
    }

    /// Require every scope to appear in the operation's text
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.required_scopes = scopes;
        self
    }

    /// Restrict to the listed endpoints
    pub fn with_endpoints(mut self, endpoints: Vec<EndpointRef>) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn include(&self, operation: &Operation, path: &str, method: &str) -> bool {
        self.decide(operation, path, method).is_included()
    }

    pub fn decide(&self, operation: &Operation, path: &str, method: &str) -> FilterDecision {
        let missing = self.missing_scopes(operation);
        if !missing.is_empty() {
            return FilterDecision::MissingScopes(missing);
        }

        if !self.in_endpoint_list(path, method) {
            return FilterDecision::NotInEndpointList;
        }

        FilterDecision::Included
    }

    fn missing_scopes(&self, operation: &Operation) -> Vec<String> {
        if self.required_scopes.is_empty() {
            return Vec::new();
        }

        let mut docs = String::new();
        if let Some(summary) = &operation.summary {
            docs.push_str(summary);
            docs.push(' ');
        }
        if let Some(description) = &operation.description {
            docs.push_str(description);
            docs.push(' ');
        }
        for requirement in &operation.security {
            for scopes in requirement.values() {
                for scope in scopes {
                    docs.push(' ');
                    docs.push_str(scope);
                    docs.push(' ');
                }
            }
        }

        self.required_scopes
            .iter()
            .filter(|scope| !docs.contains(scope.as_str()))
            .cloned()
            .collect()
    }

    fn in_endpoint_list(&self, path: &str, method: &str) -> bool {
        self.endpoints.is_empty()
            || self
                .endpoints
                .iter()
                .any(|e| e.path == path && e.method.eq_ignore_ascii_case(method))
    }
}
