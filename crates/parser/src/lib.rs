//! Swagger parsing and connection model definition compilation
//!
//! This crate turns Swagger v2 documents into `ConnectorDefinition`
//! records (see `modeldef-common`).
//!
//! ## Compilation Strategy
//!
//! Each operation is compiled independently. Operations are mapped to
//! actions by HTTP method and path shape:
//! - POST → create
//! - PATCH, PUT → update
//! - DELETE → delete
//! - HEAD → getOne
//! - GET → getCount (`count` suffix), getOne (templated path), getMany

mod filter;
mod operation_mapper;
pub mod swagger;

pub use filter::{EndpointFilter, FilterDecision};
pub use operation_mapper::ActionInferencer;
pub use swagger::{
    compile_spec, CompileOptions, CompileReport, CompileWarning, SkipReason, SkippedOperation,
    SwaggerParser,
};

use modeldef_common::Result;

/// Parse a Swagger document and compile it in one step
pub fn compile_json(json: &str, options: &CompileOptions) -> Result<CompileReport> {
    SwaggerParser::from_json(json)?.compile(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_json() {
        let json = r#"{"info": {"version": "v2"}, "paths": {"/setup/v1/properties": {"get": {}}}}"#;
        let options = CompileOptions::new("apaleo", "conn_def", "https://api.apaleo.com");
        let report = compile_json(json, &options).unwrap();

        assert_eq!(report.definitions.len(), 1);
        assert_eq!(
            report.definitions[0].key,
            "api::apaleo::v2::properties::getMany::/setup/v1/properties"
        );
    }
}
