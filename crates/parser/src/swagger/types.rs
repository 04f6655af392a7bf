//! Swagger 2.0 type definitions
//!
//! Simplified representation focusing on what connection model definitions
//! need: operations, parameters, schemas and responses.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Swagger document root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwaggerSpec {
    /// Swagger version (e.g., "2.0")
    #[serde(default)]
    pub swagger: Option<String>,

    /// API metadata
    #[serde(default)]
    pub info: Info,

    /// Host serving the API
    #[serde(default)]
    pub host: Option<String>,

    /// Base path prefixed to every path
    #[serde(rename = "basePath")]
    #[serde(default)]
    pub base_path: Option<String>,

    /// API paths (endpoints), in document order
    pub paths: IndexMap<String, PathItem>,

    /// Reusable schemas, decoded when a reference reaches them
    ///
    /// Kept raw so that a definition this model cannot hold only degrades
    /// the operations that use it.
    #[serde(default)]
    pub definitions: IndexMap<String, Value>,
}

/// API information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    /// API title
    #[serde(default)]
    pub title: Option<String>,

    /// API version
    #[serde(default = "default_api_version")]
    pub version: String,

    /// API description
    #[serde(default)]
    pub description: Option<String>,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            title: None,
            version: default_api_version(),
            description: None,
        }
    }
}

fn default_api_version() -> String {
    "v1".to_string()
}

/// Path item: method keys mapped to raw operation objects
///
/// Operations are kept as raw JSON until compiled so that one malformed
/// operation cannot prevent the rest of the document from loading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    /// Parameters shared by every operation of the path
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Value>,

    /// Reference to an external path item
    #[serde(rename = "$ref")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,

    /// Method keys and vendor extensions
    #[serde(flatten)]
    pub entries: IndexMap<String, Value>,
}

impl PathItem {
    /// Method keys with their raw operation objects, extensions excluded
    pub fn operations(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .filter(|(key, _)| !key.starts_with("x-"))
            .map(|(key, value)| (key.as_str(), value))
    }
}

/// HTTP operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    /// Operation ID (unique identifier)
    #[serde(rename = "operationId")]
    #[serde(default)]
    pub operation_id: Option<String>,

    /// Summary
    #[serde(default)]
    pub summary: Option<String>,

    /// Description
    #[serde(default)]
    pub description: Option<String>,

    /// Parameters
    #[serde(default)]
    pub parameters: Vec<Parameter>,

    /// Responses, in document order
    #[serde(default)]
    pub responses: IndexMap<String, Response>,

    /// Security requirements: scheme name -> scopes
    #[serde(default)]
    pub security: Vec<IndexMap<String, Vec<String>>>,

    /// Tags (for grouping)
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Operation {
    /// Parameters declared in the given location
    pub fn parameters_in(
        &self,
        location: ParameterLocation,
    ) -> impl Iterator<Item = &Parameter> + '_ {
        self.parameters
            .iter()
            .filter(move |param| param.location == Some(location))
    }

    /// The body parameter, if it carries a schema
    ///
    /// Swagger allows at most one body parameter per operation.
    pub fn body_parameter(&self) -> Option<&Parameter> {
        self.parameters_in(ParameterLocation::Body)
            .find(|param| param.schema.is_some())
    }
}

/// Parameter location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Header,
    Query,
    Path,
    Body,
    FormData,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Header => "header",
            ParameterLocation::Query => "query",
            ParameterLocation::Path => "path",
            ParameterLocation::Body => "body",
            ParameterLocation::FormData => "formData",
        }
    }
}

/// Parameter definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    #[serde(default)]
    pub name: String,

    /// Reference to a shared parameter; these are not followed
    #[serde(rename = "$ref")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,

    /// Location: header, query, path, body, formData
    #[serde(rename = "in")]
    #[serde(default)]
    pub location: Option<ParameterLocation>,

    /// Description
    #[serde(default)]
    pub description: Option<String>,

    /// Required flag
    #[serde(default)]
    pub required: bool,

    /// Primitive type (non-body parameters)
    #[serde(rename = "type")]
    #[serde(default)]
    pub param_type: Option<String>,

    /// Format (e.g., int32, date-time)
    #[serde(default)]
    pub format: Option<String>,

    /// Schema (body parameters)
    #[serde(default)]
    pub schema: Option<SchemaOrRef>,

    /// Example value
    #[serde(default)]
    pub example: Option<Value>,

    /// Named examples, in document order
    #[serde(default)]
    pub examples: Option<IndexMap<String, Value>>,
}

/// Response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    /// Description
    #[serde(default)]
    pub description: Option<String>,

    /// Response schema
    #[serde(default)]
    pub schema: Option<SchemaOrRef>,

    /// Examples keyed by media type
    #[serde(default)]
    pub examples: Option<IndexMap<String, Value>>,

    /// Response headers
    #[serde(default)]
    pub headers: Option<IndexMap<String, Header>>,
}

/// Response header
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Header {
    #[serde(rename = "type")]
    #[serde(default)]
    pub header_type: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

/// Schema or reference
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrRef {
    /// Reference to a definition
    Reference {
        #[serde(rename = "$ref")]
        ref_path: String,
    },

    /// Inline schema
    Schema(Box<Schema>),
}

impl SchemaOrRef {
    /// The inline schema, if this is not a reference
    pub fn as_schema(&self) -> Option<&Schema> {
        match self {
            SchemaOrRef::Schema(schema) => Some(schema),
            SchemaOrRef::Reference { .. } => None,
        }
    }

    /// Declared type without following references
    pub fn declared_type(&self) -> Option<&str> {
        self.as_schema().and_then(|s| s.schema_type.as_deref())
    }
}

/// Schema definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Type: string, number, integer, boolean, array, object
    #[serde(rename = "type")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    /// Format (e.g., int32, int64, date-time)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Enum values
    #[serde(rename = "enum")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    /// Properties (for object type), in document order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaOrRef>,

    /// Required properties
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Items schema (for array type)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaOrRef>>,

    /// Everything else (additionalProperties, example, x-*, ...)
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl SwaggerSpec {
    /// Get a schema by reference path
    /// e.g., "#/definitions/Block" -> decoded Block schema
    ///
    /// Only local definitions are supported; references into other
    /// documents never resolve. `Some(Err(_))` means the definition exists
    /// but does not decode as a schema.
    pub fn resolve_schema_ref(&self, ref_path: &str) -> Option<serde_json::Result<Schema>> {
        let schema_name = ref_path.strip_prefix(DEFINITIONS_PREFIX)?;
        self.definitions
            .get(schema_name)
            .map(|raw| Schema::deserialize(raw))
    }

    /// API version from `info.version`
    pub fn version(&self) -> &str {
        &self.info.version
    }

    /// Extract resource segment from path
    /// e.g., "/booking/v1/blocks/{id}" -> "blocks"
    ///
    /// The resource is the last segment that is neither a template
    /// placeholder nor a count suffix.
    pub fn extract_resource_from_path(path: &str) -> String {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .rev()
            .find(|segment| {
                !segment.starts_with('{') && !matches!(*segment, "$count" | "count")
            })
            .unwrap_or("root")
            .to_string()
    }
}
