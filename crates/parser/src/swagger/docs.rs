//! Operation documentation rendering
//!
//! Produces the `knowledge` text of a definition: bolded summary,
//! description, then one bullet per parameter.

use super::types::{Operation, Parameter};
use modeldef_common::{ModelDefError, Result};
use serde::Serialize;
use tera::{Context, Tera};

const TEMPLATE_NAME: &str = "knowledge.md";

fn non_empty(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|t| !t.is_empty())
}

#[derive(Serialize)]
struct ParameterDoc<'a> {
    name: &'a str,
    kind: &'a str,
    location: &'a str,
    requirement: &'a str,
    description: &'a str,
}

impl<'a> ParameterDoc<'a> {
    fn new(param: &'a Parameter) -> Self {
        let kind = param
            .param_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| param.schema.as_ref().and_then(|s| s.declared_type()))
            .unwrap_or("");

        Self {
            name: &param.name,
            kind,
            location: param.location.map(|l| l.as_str()).unwrap_or(""),
            requirement: if param.required {
                "*required*"
            } else {
                "optional"
            },
            description: param.description.as_deref().unwrap_or(""),
        }
    }
}

/// Renders operation documentation
pub struct DocumentationRenderer {
    tera: Tera,
}

impl DocumentationRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, include_str!("../../templates/knowledge.md.tera"))
            .map_err(|e| {
                ModelDefError::Template(format!("Failed to load knowledge template: {}", e))
            })?;
        Ok(Self { tera })
    }

    pub fn render(&self, operation: &Operation) -> Result<String> {
        let parameters: Vec<ParameterDoc<'_>> =
            operation
                .parameters
                .iter()
                .filter(|param| param.ref_path.is_none())
                .map(ParameterDoc::new)
                .collect();

        let mut context = Context::new();
        context.insert("summary", &non_empty(&operation.summary));
        context.insert("description", &non_empty(&operation.description));
        context.insert("parameters", &parameters);

        let rendered = self
            .tera
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| ModelDefError::Template(format!("Template error: {:?}", e)))?;

        // Every rendered line ends in a newline; the last one is dropped
        Ok(match rendered.strip_suffix('\n') {
            Some(trimmed) => trimmed.to_string(),
            None => rendered,
        })
    }
}
