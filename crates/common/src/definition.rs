//! Connection model definition IR
//!
//! These types serialize to the JSON payload accepted by the
//! `connection-model-definitions` endpoint of the integration platform.
//! Field names follow the platform's camelCase wire format.

use crate::{ActionName, HttpMethod};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Normalized leaf schema with a value locator
///
/// `path` is a JSONPath-like locator (`$.<field>`) used by the platform to
/// extract values at runtime. Query and path parameters carry `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyBlock {
    #[serde(rename = "type")]
    pub kind: String,

    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<ItemsBlock>,
}

impl PropertyBlock {
    /// Block of the given type located at `$.<name>`
    pub fn located(kind: impl Into<String>, name: &str) -> Self {
        Self {
            kind: kind.into(),
            path: Some(format!("$.{name}")),
            format: None,
            enum_values: None,
            description: None,
            items: None,
        }
    }

    /// Block of the given type with no locator
    pub fn unlocated(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            path: None,
            format: None,
            enum_values: None,
            description: None,
            items: None,
        }
    }
}

/// Item description of an array property
///
/// Object items carry their inlined `properties`; scalar items carry the
/// remaining keys of their schema in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemsBlock {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, PropertyBlock>>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Default for ItemsBlock {
    fn default() -> Self {
        Self {
            kind: "object".to_string(),
            properties: None,
            extra: IndexMap::new(),
        }
    }
}

/// Object-shaped schema block for one request location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: IndexMap<String, PropertyBlock>,
    pub required: Vec<String>,
    pub path: Option<String>,
}

impl SchemaBlock {
    pub fn object(properties: IndexMap<String, PropertyBlock>, required: Vec<String>) -> Self {
        Self {
            kind: "object".to_string(),
            properties,
            required,
            path: None,
        }
    }
}

/// Request schemas, one per parameter location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schemas {
    pub headers: Option<SchemaBlock>,
    pub query_params: Option<SchemaBlock>,
    pub path_params: Option<SchemaBlock>,
    pub body: Option<SchemaBlock>,
}

/// Extended-JSON binary wrapper (`{"$binary": {"base64", "subType"}}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarySample {
    #[serde(rename = "$binary")]
    pub binary: BinaryPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryPayload {
    pub base64: String,
    pub sub_type: String,
}

impl BinarySample {
    /// Generic binary subtype wrapping already-encoded data
    pub fn generic(base64: impl Into<String>) -> Self {
        Self {
            binary: BinaryPayload {
                base64: base64.into(),
                sub_type: "00".to_string(),
            },
        }
    }
}

/// Illustrative request values per parameter location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Samples {
    pub headers: IndexMap<String, Vec<BinarySample>>,
    pub query_params: Option<IndexMap<String, Value>>,
    pub path_params: IndexMap<String, Value>,
    pub body: Option<Value>,
}

/// Response status key: numeric when the spec key is all digits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusCode {
    Numeric(u16),
    Named(String),
}

impl StatusCode {
    pub fn parse(key: &str) -> Self {
        if !key.is_empty() && key.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(code) = key.parse() {
                return StatusCode::Numeric(code);
            }
        }
        StatusCode::Named(key.to_string())
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusCode::Numeric(code) => write!(f, "{code}"),
            StatusCode::Named(name) => f.write_str(name),
        }
    }
}

/// One declared response of an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEntry {
    pub status_code: StatusCode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<IndexMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthMethod {
    #[serde(rename = "type")]
    pub kind: String,
}

impl AuthMethod {
    pub fn oauth() -> Self {
        Self {
            kind: "OAuth".to_string(),
        }
    }
}

/// Request/response object locators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPaths {
    pub request: RequestPaths,
    pub response: ResponsePaths,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestPaths {
    pub object: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePaths {
    pub object: String,
    pub id: String,
    pub cursor: Option<String>,
}

impl Default for ModelPaths {
    fn default() -> Self {
        Self {
            request: RequestPaths {
                object: "$.body".to_string(),
            },
            response: ResponsePaths {
                object: "$".to_string(),
                id: "$.id".to_string(),
                cursor: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConnectionStatus {
    pub last_tested_at: i64,
    pub state: String,
}

impl Default for TestConnectionStatus {
    fn default() -> Self {
        Self {
            last_tested_at: 0,
            state: "untested".to_string(),
        }
    }
}

/// Extended-JSON 64-bit integer (`{"$numberLong": "<digits>"}`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLong(pub i64);

impl Serialize for NumberLong {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("$numberLong", &self.0.to_string())?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for NumberLong {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(rename = "$numberLong")]
            number_long: String,
        }
        let raw = Raw::deserialize(deserializer)?;
        raw.number_long
            .parse()
            .map(NumberLong)
            .map_err(serde::de::Error::custom)
    }
}

/// One compiled operation, ready to be persisted or delivered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorDefinition {
    pub connection_platform: String,
    pub connection_definition_id: String,
    pub platform_version: String,
    pub key: String,
    pub title: String,
    pub name: String,
    pub model_name: String,
    pub action: HttpMethod,
    pub action_name: ActionName,
    pub base_url: String,
    pub path: String,
    pub auth_method: AuthMethod,
    pub schemas: Schemas,
    pub samples: Samples,
    pub responses: Vec<ResponseEntry>,
    pub paths: ModelPaths,
    pub knowledge: String,
    pub test_connection_status: TestConnectionStatus,
    pub is_default_crud_mapping: Option<bool>,
    pub mapping: Option<Value>,
    pub created_at: NumberLong,
    pub updated_at: NumberLong,
    pub updated: bool,
    pub version: String,
    pub last_modified_by: String,
    pub deleted: bool,
    pub change_log: IndexMap<String, Value>,
    pub tags: Vec<String>,
    pub active: bool,
    pub deprecated: bool,
    pub supported: bool,
}

impl ConnectorDefinition {
    /// Composite identity of a record
    pub fn compose_key(
        platform: &str,
        version: &str,
        resource: &str,
        action: ActionName,
        path: &str,
    ) -> String {
        format!("api::{platform}::{version}::{resource}::{action}::{path}")
    }
}
