//! Swagger spec file parser

use super::converter::{compile_spec, CompileOptions, CompileReport};
use super::types::SwaggerSpec;
use modeldef_common::{ModelDefError, Result};
use std::fs;
use std::path::Path;

/// Swagger 2.0 specification parser
///
/// Loads one document and compiles it into connection model definitions.
pub struct SwaggerParser {
    spec: SwaggerSpec,
}

impl SwaggerParser {
    /// Load a Swagger spec from a file path
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = SwaggerParser::from_file("apaleo-booking.json")?;
    /// let report = parser.compile(&CompileOptions::new("apaleo", "conn_def", "https://api.apaleo.com"))?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ModelDefError::MalformedSpec(format!(
                "Failed to read spec file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_json(&content)
    }

    /// Parse a Swagger spec from a JSON string
    ///
    /// Fails with `MalformedSpec` on invalid JSON or a missing `paths` mapping.
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: SwaggerSpec = serde_json::from_str(json).map_err(|e| {
            ModelDefError::MalformedSpec(format!("Failed to parse Swagger JSON: {}", e))
        })?;

        Ok(Self { spec })
    }

    /// Compile every operation into definitions
    pub fn compile(&self, options: &CompileOptions) -> Result<CompileReport> {
        compile_spec(&self.spec, options)
    }

    /// Get reference to the underlying Swagger spec
    pub fn spec(&self) -> &SwaggerSpec {
        &self.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_minimal_swagger() {
        let swagger_json = r#"{
            "swagger": "2.0",
            "info": {"title": "Booking", "version": "v1"},
            "paths": {}
        }"#;

        let parser = SwaggerParser::from_json(swagger_json).unwrap();
        assert_eq!(parser.spec().version(), "v1");
        assert_eq!(parser.spec().info.title.as_deref(), Some("Booking"));
        assert!(parser.spec().paths.is_empty());
    }

    #[test]
    fn test_missing_version_defaults() {
        let parser = SwaggerParser::from_json(r#"{"paths": {}}"#).unwrap();
        assert_eq!(parser.spec().version(), "v1");
    }

    #[test]
    fn test_missing_paths_is_malformed() {
        let result = SwaggerParser::from_json(r#"{"swagger": "2.0", "info": {"version": "v1"}}"#);
        assert!(matches!(result, Err(ModelDefError::MalformedSpec(_))));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let result = SwaggerParser::from_json("{not json");
        assert!(matches!(result, Err(ModelDefError::MalformedSpec(_))));

        let result = SwaggerParser::from_json(r#"{"paths": []}"#);
        assert!(matches!(result, Err(ModelDefError::MalformedSpec(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"paths": {{"/v1/x": {{"get": {{}}}}}}}}"#).unwrap();

        let parser = SwaggerParser::from_file(file.path()).unwrap();
        assert_eq!(parser.spec().paths.len(), 1);

        let missing = SwaggerParser::from_file("/nonexistent/spec.json");
        assert!(matches!(missing, Err(ModelDefError::MalformedSpec(_))));
    }
}
