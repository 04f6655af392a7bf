//! Swagger 2.0 specification compiler
//!
//! Compiles Swagger (OpenAPI v2) documents into connection model
//! definitions: one record per included operation.
//!
//! ## Pipeline
//! For every path and method of a document:
//! - the endpoint filter decides inclusion
//! - the action inferencer maps the method and path to an action name
//! - schemas, samples, responses and documentation are extracted
//! - the payload assembler composes the final record
//!
//! `$ref` pointers resolve a single hop against `#/definitions/`.
//!
//! ## Usage
//! ```rust,ignore
//! use modeldef_parser::swagger::{CompileOptions, SwaggerParser};
//!
//! let parser = SwaggerParser::from_file("booking.json")?;
//! let report = parser.compile(&CompileOptions::new("apaleo", "conn_def", "https://api.apaleo.com"))?;
//! ```

mod converter;
mod docs;
mod parser;
mod resolver;
mod responses;
mod samples;
mod schema;
mod types;

pub use converter::{
    compile_spec, CompileOptions, CompileReport, CompileWarning, PayloadAssembler, SkipReason,
    SkippedOperation,
};
pub use docs::DocumentationRenderer;
pub use parser::SwaggerParser;
pub use resolver::{ReferenceIssue, RefResolver};
pub use responses::extract_responses;
pub use samples::{extract_samples, PATH_PARAM_PLACEHOLDER};
pub use schema::{extract_body, extract_params, BodyExtraction};
pub use types::*;
