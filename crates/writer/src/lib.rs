//! Output of compiled connection model definitions
//!
//! Definitions leave the compiler through a [`DefinitionSink`]: either as
//! pretty-printed JSON files ([`FileSink`]) or as authenticated HTTP POSTs
//! to the platform API ([`HttpSink`]).

mod sink;

pub use sink::{FileSink, HttpSink, DEFAULT_TIMEOUT};

use modeldef_common::{ConnectorDefinition, Result};
use tracing::{debug, warn};

/// Destination for compiled definitions
#[cfg_attr(test, mockall::automock)]
pub trait DefinitionSink {
    /// Persist or deliver one definition
    fn publish(&self, definition: &ConnectorDefinition) -> Result<()>;

    /// Short human-readable description of the destination
    fn describe(&self) -> String;
}

/// File name for one definition
///
/// `<stem>_<platform>_<method>_<path>.json`, where the path loses its
/// leading and trailing slashes and the remaining ones become underscores.
///
/// # Examples
/// ```
/// use modeldef_writer::output_file_name;
///
/// assert_eq!(
///     output_file_name("booking", "apaleo", "get", "/booking/v1/blocks/{id}"),
///     "booking_apaleo_get_booking_v1_blocks_{id}.json"
/// );
/// ```
pub fn output_file_name(stem: &str, platform: &str, method: &str, path: &str) -> String {
    let path = path.trim_matches('/').replace('/', "_");
    format!("{stem}_{platform}_{method}_{path}.json")
}

/// One definition that could not be published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishFailure {
    pub key: String,
    pub error: String,
}

/// Outcome of publishing a batch of definitions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishSummary {
    pub published: usize,
    pub failures: Vec<PublishFailure>,
}

impl PublishSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Publish every definition, continuing past individual failures
pub fn publish_all(sink: &dyn DefinitionSink, definitions: &[ConnectorDefinition]) -> PublishSummary {
    let mut summary = PublishSummary::default();

    for definition in definitions {
        match sink.publish(definition) {
            Ok(()) => {
                debug!(key = %definition.key, sink = %sink.describe(), "published definition");
                summary.published += 1;
            }
            Err(e) => {
                warn!(key = %definition.key, sink = %sink.describe(), error = %e, "failed to publish definition");
                summary.failures.push(PublishFailure {
                    key: definition.key.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    summary
}
