//! Response extraction

use super::resolver::RefResolver;
use super::types::Operation;
use modeldef_common::{ResponseEntry, Result, StatusCode};

/// One entry per declared status code, in document order
pub fn extract_responses(
    operation: &Operation,
    resolver: &RefResolver<'_>,
) -> Result<Vec<ResponseEntry>> {
    let mut entries = Vec::with_capacity(operation.responses.len());

    for (status, response) in &operation.responses {
        let schema = match &response.schema {
            Some(schema_or_ref) => Some(serde_json::to_value(&*resolver.resolve(schema_or_ref))?),
            None => None,
        };

        let body = response
            .examples
            .as_ref()
            .and_then(|examples| examples.values().next().cloned());

        let headers = response.headers.as_ref().map(|headers| {
            headers
                .iter()
                .map(|(name, header)| {
                    let kind = header.header_type.as_deref().unwrap_or("string");
                    (name.clone(), kind.to_string())
                })
                .collect()
        });

        entries.push(ResponseEntry {
            status_code: StatusCode::parse(status),
            schema,
            body,
            headers,
            description: response.description.clone(),
        });
    }

    Ok(entries)
}
