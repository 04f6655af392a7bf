//! Generator configuration loading
//!
//! Defaults for a generation run can be kept in a YAML file instead of being
//! repeated on every command line. Command-line values always win over
//! values loaded here.

use crate::{ModelDefError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Defaults for a generation run
///
/// ```yaml
/// platform: apaleo
/// definition_id: conn_def::XYZ123
/// base_url: https://api.apaleo.com
/// target: http://localhost:3005/v1/connection-model-definitions
/// scopes: [setup.read]
/// endpoints:
///   - path: /booking/v1/blocks
///     method: get
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneratorConfig {
    /// Target platform name (e.g., "apaleo")
    #[serde(default)]
    pub platform: Option<String>,
    /// Connection definition identifier stamped on every record
    #[serde(default)]
    pub definition_id: Option<String>,
    /// Base URL of the API being described
    #[serde(default)]
    pub base_url: Option<String>,
    /// URL that compiled definitions are POSTed to
    #[serde(default)]
    pub target: Option<String>,
    /// Directory to write payload files to
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Scopes every included operation must mention
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Explicit allow-list of endpoints
    #[serde(default)]
    pub endpoints: Vec<EndpointRef>,
}

impl GeneratorConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ModelDefError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::from_yaml(&content).map_err(|e| {
            ModelDefError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// One `{path, method}` entry of an endpoint allow-list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EndpointRef {
    pub path: String,
    pub method: String,
}

impl EndpointRef {
    pub fn new(path: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
        }
    }
}

/// Load an endpoint allow-list from an inline JSON array or a JSON file
///
/// The argument is read as a file when it ends in `.json` or names an
/// existing file; otherwise it is parsed as JSON text.
pub fn load_endpoint_list(arg: &str) -> Result<Vec<EndpointRef>> {
    let path = Path::new(arg);
    if arg.ends_with(".json") || path.is_file() {
        let content = fs::read_to_string(path).map_err(|e| {
            ModelDefError::Config(format!("Failed to read endpoint list {}: {}", arg, e))
        })?;
        return serde_json::from_str(&content).map_err(|e| {
            ModelDefError::Config(format!("Failed to parse endpoint list {}: {}", arg, e))
        });
    }

    serde_json::from_str(arg)
        .map_err(|e| ModelDefError::Config(format!("Failed to parse endpoint list: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let config = GeneratorConfig::from_yaml(
            r#"
platform: apaleo
definition_id: conn_def::XYZ123
base_url: https://api.apaleo.com
scopes:
  - setup.read
endpoints:
  - path: /booking/v1/blocks
    method: get
"#,
        )
        .unwrap();

        assert_eq!(config.platform.as_deref(), Some("apaleo"));
        assert_eq!(config.definition_id.as_deref(), Some("conn_def::XYZ123"));
        assert_eq!(config.scopes, vec!["setup.read".to_string()]);
        assert_eq!(
            config.endpoints,
            vec![EndpointRef::new("/booking/v1/blocks", "get")]
        );
        assert!(config.target.is_none());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = GeneratorConfig::from_yaml("{}").unwrap();
        assert!(config.platform.is_none());
        assert!(config.scopes.is_empty());
        assert!(config.endpoints.is_empty());
    }

    #[test]
    fn test_load_missing_config_file() {
        let err = GeneratorConfig::load(Path::new("/nonexistent/modeldef.yaml")).unwrap_err();
        assert!(matches!(err, ModelDefError::Config(_)));
    }

    #[test]
    fn test_endpoint_list_inline_json() {
        let list = load_endpoint_list(r#"[{"path": "/v1/x", "method": "GET"}]"#).unwrap();
        assert_eq!(list, vec![EndpointRef::new("/v1/x", "GET")]);
    }

    #[test]
    fn test_endpoint_list_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"[{{"path": "/v1/y", "method": "post"}}]"#).unwrap();

        let list = load_endpoint_list(file.path().to_str().unwrap()).unwrap();
        assert_eq!(list, vec![EndpointRef::new("/v1/y", "post")]);
    }

    #[test]
    fn test_endpoint_list_missing_file() {
        let err = load_endpoint_list("missing-endpoints.json").unwrap_err();
        assert!(matches!(err, ModelDefError::Config(_)));
    }

    #[test]
    fn test_endpoint_list_invalid_json() {
        assert!(load_endpoint_list("not json").is_err());
    }
}
