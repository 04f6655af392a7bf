//! Sample value extraction
//!
//! Best-effort illustrative request values taken from the examples a spec
//! declares. Nothing here is validated against the schemas.

use super::types::{Operation, ParameterLocation};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use indexmap::IndexMap;
use modeldef_common::{BinarySample, Samples};
use serde_json::Value;

/// Placeholder used for path parameters without an example
pub const PATH_PARAM_PLACEHOLDER: &str = "sample_value";

const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Derive samples for every parameter location of an operation
pub fn extract_samples(operation: &Operation) -> Samples {
    let mut samples = Samples::default();

    for param in &operation.parameters {
        match param.location {
            Some(ParameterLocation::Header) => {
                let name = param.name.to_lowercase();
                let encoded = match &param.example {
                    Some(example) => encode_example(example),
                    None if name == "content-type" => STANDARD.encode(DEFAULT_CONTENT_TYPE),
                    None => continue,
                };
                samples
                    .headers
                    .insert(name, vec![BinarySample::generic(encoded)]);
            }
            Some(ParameterLocation::Path) => {
                let value = param
                    .example
                    .clone()
                    .unwrap_or_else(|| Value::String(PATH_PARAM_PLACEHOLDER.to_string()));
                samples.path_params.insert(param.name.clone(), value);
            }
            Some(ParameterLocation::Query) => {
                if let Some(example) = &param.example {
                    samples
                        .query_params
                        .get_or_insert_with(IndexMap::new)
                        .insert(param.name.clone(), example.clone());
                }
            }
            Some(ParameterLocation::Body) if param.schema.is_some() => {
                let example = param.example.clone().or_else(|| {
                    param
                        .examples
                        .as_ref()
                        .and_then(|examples| examples.values().next().cloned())
                });
                if example.is_some() {
                    samples.body = example;
                }
            }
            _ => {}
        }
    }

    samples
}

/// Base64 of a header example: strings as raw text, anything else as JSON
fn encode_example(example: &Value) -> String {
    match example {
        Value::String(text) => STANDARD.encode(text),
        other => STANDARD.encode(other.to_string()),
    }
}
