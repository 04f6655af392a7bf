//! Convert a Swagger document into connection model definitions

use super::docs::DocumentationRenderer;
use super::resolver::{RefResolver, ReferenceIssue};
use super::responses::extract_responses;
use super::samples::extract_samples;
use super::schema::{extract_body, extract_params};
use super::types::{Operation, ParameterLocation, SwaggerSpec};
use crate::filter::{EndpointFilter, FilterDecision};
use crate::operation_mapper::ActionInferencer;
use chrono::Utc;
use indexmap::IndexMap;
use modeldef_common::{
    ActionName, AuthMethod, ConnectorDefinition, HttpMethod, ModelDefError, ModelPaths,
    NumberLong, Result, SchemaBlock, Schemas, TestConnectionStatus,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};

const RECORD_VERSION: &str = "1.0.0";
const LAST_MODIFIED_BY: &str = "system";

/// Per-run compiler inputs
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub platform: String,
    pub definition_id: String,
    pub base_url: String,
    pub filter: EndpointFilter,
    pub actions: ActionInferencer,
}

impl CompileOptions {
    pub fn new(
        platform: impl Into<String>,
        definition_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            platform: platform.into(),
            definition_id: definition_id.into(),
            base_url: base_url.into(),
            filter: EndpointFilter::default(),
            actions: ActionInferencer::default(),
        }
    }

    pub fn with_filter(mut self, filter: EndpointFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_actions(mut self, actions: ActionInferencer) -> Self {
        self.actions = actions;
        self
    }
}

/// Why an operation produced no definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Filtered(FilterDecision),
    UnsupportedMethod(String),
    InvalidAction(String),
    MalformedOperation(String),
    /// The definition could not be built, e.g. the template failed
    AssemblyFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Filtered(decision) => write!(f, "{}", decision),
            SkipReason::UnsupportedMethod(method) => {
                write!(f, "unsupported HTTP method '{}'", method)
            }
            SkipReason::InvalidAction(action) => write!(f, "action '{}' is not allowed", action),
            SkipReason::MalformedOperation(message) => f.write_str(message),
            SkipReason::AssemblyFailed(message) => write!(f, "assembly failed: {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedOperation {
    pub path: String,
    pub method: String,
    pub reason: SkipReason,
}

/// Degradations that still produced a definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileWarning {
    /// A `$ref` was replaced by an empty schema
    UnresolvedReference {
        path: String,
        method: String,
        reference: String,
    },
    /// A `$ref` target that does not decode as a schema was replaced by an
    /// empty schema
    MalformedDefinition {
        path: String,
        method: String,
        reference: String,
        message: String,
    },
    /// Two definitions of one document share a key
    DuplicateKey { key: String },
}

impl fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileWarning::UnresolvedReference {
                path,
                method,
                reference,
            } => write!(
                f,
                "{} {}: unresolved reference {}",
                method.to_uppercase(),
                path,
                reference
            ),
            CompileWarning::MalformedDefinition {
                path,
                method,
                reference,
                message,
            } => write!(
                f,
                "{} {}: malformed definition {} ({})",
                method.to_uppercase(),
                path,
                reference,
                message
            ),
            CompileWarning::DuplicateKey { key } => write!(f, "duplicate key {}", key),
        }
    }
}

/// Result of compiling one document
#[derive(Debug, Clone, Default)]
pub struct CompileReport {
    pub definitions: Vec<ConnectorDefinition>,
    pub skipped: Vec<SkippedOperation>,
    pub warnings: Vec<CompileWarning>,
}

/// Builds one definition from an operation and its inferred action
pub struct PayloadAssembler<'a> {
    spec: &'a SwaggerSpec,
    options: &'a CompileOptions,
    docs: DocumentationRenderer,
}

impl<'a> PayloadAssembler<'a> {
    pub fn new(spec: &'a SwaggerSpec, options: &'a CompileOptions) -> Result<Self> {
        Ok(Self {
            spec,
            options,
            docs: DocumentationRenderer::new()?,
        })
    }

    /// Assemble a definition; unresolved references are left in `resolver`
    pub fn assemble(
        &self,
        path: &str,
        method: HttpMethod,
        action: ActionName,
        operation: &Operation,
        resolver: &RefResolver<'_>,
    ) -> Result<ConnectorDefinition> {
        let platform = &self.options.platform;
        let version = self.spec.version();
        let resource = SwaggerSpec::extract_resource_from_path(path);

        let (body_properties, body_required) = extract_body(operation, resolver);
        let schemas = Schemas {
            headers: extract_params(operation, ParameterLocation::Header),
            query_params: extract_params(operation, ParameterLocation::Query),
            path_params: extract_params(operation, ParameterLocation::Path),
            body: body_properties.map(|properties| {
                SchemaBlock::object(properties, body_required.unwrap_or_default())
            }),
        };

        let title = match operation.summary.as_deref().filter(|s| !s.is_empty()) {
            Some(summary) => summary.to_string(),
            None => operation
                .operation_id
                .as_deref()
                .map(capitalize)
                .unwrap_or_default(),
        };
        let name = match operation.operation_id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => format!("{}{}", action, camel_case(&resource)),
        };

        let now = NumberLong(Utc::now().timestamp_millis());

        Ok(ConnectorDefinition {
            connection_platform: platform.clone(),
            connection_definition_id: self.options.definition_id.clone(),
            platform_version: version.to_string(),
            key: ConnectorDefinition::compose_key(platform, version, &resource, action, path),
            title,
            name,
            model_name: format!("{}{}", upper_first(platform), camel_case(&resource)),
            action: method,
            action_name: action,
            base_url: self.options.base_url.clone(),
            path: path.to_string(),
            auth_method: AuthMethod::oauth(),
            schemas,
            samples: extract_samples(operation),
            responses: extract_responses(operation, resolver)?,
            paths: ModelPaths::default(),
            knowledge: self.docs.render(operation)?,
            test_connection_status: TestConnectionStatus::default(),
            is_default_crud_mapping: None,
            mapping: None,
            created_at: now,
            updated_at: now,
            updated: false,
            version: RECORD_VERSION.to_string(),
            last_modified_by: LAST_MODIFIED_BY.to_string(),
            deleted: false,
            change_log: IndexMap::new(),
            tags: Vec::new(),
            active: true,
            deprecated: false,
            supported: true,
        })
    }
}

/// Compile every operation of a document
///
/// Per-operation failures are recorded in the report and never stop the
/// remaining operations.
pub fn compile_spec(spec: &SwaggerSpec, options: &CompileOptions) -> Result<CompileReport> {
    let assembler = PayloadAssembler::new(spec, options)?;
    let mut report = CompileReport::default();
    let mut seen_keys = HashSet::new();

    for (path, item) in &spec.paths {
        for (method, raw) in item.operations() {
            let skip = |reason: SkipReason| {
                info!(path = %path, method = %method, reason = %reason, "skipping operation");
                SkippedOperation {
                    path: path.clone(),
                    method: method.to_string(),
                    reason,
                }
            };

            let operation = match decode_operation(raw) {
                Ok(operation) => operation,
                Err(e) => {
                    report
                        .skipped
                        .push(skip(SkipReason::MalformedOperation(e.to_string())));
                    continue;
                }
            };

            let decision = options.filter.decide(&operation, path, method);
            if !decision.is_included() {
                report.skipped.push(skip(SkipReason::Filtered(decision)));
                continue;
            }

            let http_method: HttpMethod = match method.parse() {
                Ok(m) => m,
                Err(ModelDefError::UnsupportedMethod(m)) => {
                    report.skipped.push(skip(SkipReason::UnsupportedMethod(m)));
                    continue;
                }
                Err(e) => {
                    report.skipped.push(skip(SkipReason::MalformedOperation(e.to_string())));
                    continue;
                }
            };
            let action = match options.actions.infer_method(http_method, path) {
                Ok(action) => action,
                Err(ModelDefError::InvalidAction(a)) => {
                    report.skipped.push(skip(SkipReason::InvalidAction(a)));
                    continue;
                }
                Err(e) => {
                    report.skipped.push(skip(SkipReason::MalformedOperation(e.to_string())));
                    continue;
                }
            };

            let resolver = RefResolver::new(spec);
            for ref_path in operation.parameters.iter().filter_map(|p| p.ref_path.as_deref()) {
                resolver.skip_ref(ref_path);
            }

            let assembled = assembler.assemble(path, http_method, action, &operation, &resolver);
            for issue in resolver.into_issues() {
                report.warnings.push(match issue {
                    ReferenceIssue::Unresolved(reference) => CompileWarning::UnresolvedReference {
                        path: path.clone(),
                        method: method.to_string(),
                        reference,
                    },
                    ReferenceIssue::Malformed { reference, message } => {
                        CompileWarning::MalformedDefinition {
                            path: path.clone(),
                            method: method.to_string(),
                            reference,
                            message,
                        }
                    }
                });
            }

            let definition = match assembled {
                Ok(definition) => definition,
                Err(e) => {
                    report.skipped.push(skip(SkipReason::AssemblyFailed(e.to_string())));
                    continue;
                }
            };

            if !seen_keys.insert(definition.key.clone()) {
                warn!(key = %definition.key, "duplicate definition key");
                report.warnings.push(CompileWarning::DuplicateKey {
                    key: definition.key.clone(),
                });
            }

            debug!(key = %definition.key, "compiled operation");
            report.definitions.push(definition);
        }
    }

    Ok(report)
}

fn decode_operation(raw: &Value) -> Result<Operation> {
    Operation::deserialize(raw).map_err(|e| ModelDefError::MalformedOperation(e.to_string()))
}

/// First letter upper-cased, the rest lower-cased
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn upper_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "unit-groups" -> "UnitGroups"
fn camel_case(text: &str) -> String {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(upper_first)
        .collect()
}
