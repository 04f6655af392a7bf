//! Common types and utilities for the modeldef compiler
//!
//! This crate contains the connection model definition IR, error types,
//! and configuration loading shared by the parser, writer, and CLI
//! components.

pub mod action;
pub mod config;
pub mod definition;

pub use action::{ActionName, HttpMethod};
pub use config::{load_endpoint_list, EndpointRef, GeneratorConfig};
pub use definition::*;

use thiserror::Error;

/// Errors that can occur while compiling or publishing model definitions
#[derive(Error, Debug)]
pub enum ModelDefError {
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("Derived actionName '{0}' not allowed")]
    InvalidAction(String),

    #[error("Malformed spec: {0}")]
    MalformedSpec(String),

    #[error("Malformed operation: {0}")]
    MalformedOperation(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for modeldef operations
pub type Result<T> = std::result::Result<T, ModelDefError>;
