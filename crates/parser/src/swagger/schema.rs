//! Request schema extraction
//!
//! Converts parameter and body schemas into property blocks carrying
//! JSONPath-style locators. Body properties are located at `$.<name>`,
//! headers at `$.<name without hyphens, lower-cased>`; query and path
//! parameters are identified by name and carry no locator.

use super::resolver::RefResolver;
use super::types::{Operation, ParameterLocation, Schema, SchemaOrRef};
use indexmap::IndexMap;
use modeldef_common::{ItemsBlock, PropertyBlock, SchemaBlock};
use serde_json::Value;

/// Body properties and required fields, each absent when not derivable
pub type BodyExtraction = (Option<IndexMap<String, PropertyBlock>>, Option<Vec<String>>);

/// Extract the body schema of an operation
///
/// Returns `(None, None)` when the operation has no body parameter and
/// `(None, Some(required))` when the body schema declares no properties.
pub fn extract_body(operation: &Operation, resolver: &RefResolver<'_>) -> BodyExtraction {
    let Some((param, schema_or_ref)) = operation
        .body_parameter()
        .and_then(|param| param.schema.as_ref().map(|schema| (param, schema)))
    else {
        return (None, None);
    };

    let schema = resolver.resolve(schema_or_ref);

    if schema.schema_type.as_deref() == Some("array") {
        let mut block = PropertyBlock::located("array", "body");
        block.items = Some(
            schema
                .items
                .as_deref()
                .map(|items| items_block(items, resolver))
                .unwrap_or_default(),
        );

        let required = if param.required {
            vec![param.name.clone()]
        } else {
            Vec::new()
        };

        let mut properties = IndexMap::new();
        properties.insert("body".to_string(), block);
        return (Some(properties), Some(required));
    }

    let properties: IndexMap<String, PropertyBlock> = schema
        .properties
        .iter()
        .map(|(name, prop)| {
            let prop_schema = resolver.resolve(prop);
            (name.clone(), property_block(name, &prop_schema, resolver))
        })
        .collect();

    let required = schema.required.clone();
    if properties.is_empty() {
        (None, Some(required))
    } else {
        (Some(properties), Some(required))
    }
}

/// Extract the header, query or path parameters of an operation
///
/// Returns `None` when the operation declares no parameter in `location`.
pub fn extract_params(operation: &Operation, location: ParameterLocation) -> Option<SchemaBlock> {
    let mut properties = IndexMap::new();
    let mut required = Vec::new();

    for param in operation.parameters_in(location) {
        let kind = param.param_type.as_deref().unwrap_or("string");
        let block = match location {
            ParameterLocation::Header => {
                PropertyBlock::located(kind, &header_field(&param.name))
            }
            _ => PropertyBlock::unlocated(kind),
        };

        if param.required {
            required.push(param.name.clone());
        }
        properties.insert(param.name.clone(), block);
    }

    if properties.is_empty() {
        None
    } else {
        Some(SchemaBlock::object(properties, required))
    }
}

/// Locator field for a header: hyphens dropped, lower-cased
fn header_field(name: &str) -> String {
    name.replace('-', "").to_lowercase()
}

/// Build the block of one top-level body property
fn property_block(name: &str, schema: &Schema, resolver: &RefResolver<'_>) -> PropertyBlock {
    let kind = schema.schema_type.as_deref().unwrap_or("string");
    let mut block = PropertyBlock::located(kind, name);
    block.format = schema.format.clone();
    block.enum_values = schema.enum_values.clone();
    block.description = schema.description.clone();

    if schema.schema_type.as_deref() == Some("array") {
        if let Some(items) = schema.items.as_deref() {
            block.items = Some(items_block(items, resolver));
        }
    }

    block
}

/// Describe array items, inlining object properties one level deep
fn items_block(items: &SchemaOrRef, resolver: &RefResolver<'_>) -> ItemsBlock {
    match items {
        SchemaOrRef::Reference { ref_path } => {
            let target = resolver.resolve_ref(ref_path);
            ItemsBlock {
                properties: (!target.properties.is_empty()).then(|| leaf_properties(&target)),
                ..ItemsBlock::default()
            }
        }
        SchemaOrRef::Schema(inline) if !inline.properties.is_empty() => ItemsBlock {
            properties: Some(leaf_properties(inline)),
            ..ItemsBlock::default()
        },
        SchemaOrRef::Schema(inline) => {
            let mut block = ItemsBlock::default();
            if let Ok(Value::Object(fields)) = serde_json::to_value(&**inline) {
                for (key, value) in fields {
                    match key.as_str() {
                        "$ref" => {}
                        "type" => {
                            if let Value::String(kind) = value {
                                block.kind = kind;
                            }
                        }
                        _ => {
                            block.extra.insert(key, value);
                        }
                    }
                }
            }
            block
        }
    }
}

/// Leaf blocks for the properties of an item schema
///
/// Nested references are not followed; a property given only as a `$ref`
/// falls back to the default `string` type.
fn leaf_properties(schema: &Schema) -> IndexMap<String, PropertyBlock> {
    schema
        .properties
        .iter()
        .map(|(name, prop)| {
            let block = match prop.as_schema() {
                Some(inline) => {
                    let mut block = PropertyBlock::located(
                        inline.schema_type.as_deref().unwrap_or("string"),
                        name,
                    );
                    block.enum_values = inline.enum_values.clone();
                    block
                }
                None => PropertyBlock::located("string", name),
            };
            (name.clone(), block)
        })
        .collect()
}
