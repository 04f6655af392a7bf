//! File and HTTP sinks

use crate::{output_file_name, DefinitionSink};
use modeldef_common::{ConnectorDefinition, ModelDefError, Result};
use reqwest::blocking::Client;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Request timeout of [`HttpSink`]
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Writes each definition to its own JSON file
///
/// Files are named by [`output_file_name`] from the spec file stem, the
/// platform, the method and the path.
pub struct FileSink {
    dir: PathBuf,
    stem: String,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.into(),
        }
    }

    /// Target path of one definition
    pub fn path_for(&self, definition: &ConnectorDefinition) -> PathBuf {
        self.dir.join(output_file_name(
            &self.stem,
            &definition.connection_platform,
            definition.action.as_str(),
            &definition.path,
        ))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DefinitionSink for FileSink {
    fn publish(&self, definition: &ConnectorDefinition) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string_pretty(definition)?;
        fs::write(self.path_for(definition), json)?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

/// POSTs each definition to the platform API with bearer authentication
pub struct HttpSink {
    client: Client,
    target: String,
    token: String,
}

impl HttpSink {
    pub fn new(target: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(target, token, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        target: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModelDefError::Delivery(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            target: target.into(),
            token: token.into(),
        })
    }
}

impl DefinitionSink for HttpSink {
    fn publish(&self, definition: &ConnectorDefinition) -> Result<()> {
        let response = self
            .client
            .post(&self.target)
            .bearer_auth(&self.token)
            .json(definition)
            .send()
            .map_err(|e| ModelDefError::Delivery(format!("POST {} failed: {}", self.target, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ModelDefError::Delivery(format!(
                "POST {} returned {}: {}",
                self.target,
                status,
                body.trim()
            )));
        }

        Ok(())
    }

    fn describe(&self) -> String {
        self.target.clone()
    }
}
