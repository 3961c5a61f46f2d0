// Copyright 2025 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.
//
// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while validating a [`WarehouseConfig`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no project id provided")]
    MissingProject,

    #[error("no credentials provided")]
    MissingCredentials,

    #[error("invalid option '{key}': {reason}")]
    InvalidOption { key: String, reason: String },
}

/// Where the warehouse client obtains its credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum CredentialSource {
    /// Service account key as an inline JSON string
    Json(String),
    /// Path to a service account key file
    File(String),
    /// Credentials resolved from the environment by the driver
    ApplicationDefault,
}

/// Connection configuration for a warehouse client.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use warehouse_reconcile::warehouse::WarehouseConfig;
///
/// let config = WarehouseConfig::new("my-project")
///     .with_location("EU")
///     .with_credentials_file("/path/to/key.json")
///     .with_operation_timeout(Duration::from_secs(30));
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WarehouseConfig {
    /// Home project, used when a table name only has two segments.
    pub project_id: String,

    /// Processing location applied to every job, e.g. "US" or "EU".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<CredentialSource>,

    /// Upper bound for a single warehouse call, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_timeout_ms: Option<u64>,

    /// Driver-specific options, passed through untouched.
    #[serde(default)]
    pub options: HashMap<String, String>,
}

impl WarehouseConfig {
    /// Create a new configuration for the given home project.
    ///
    /// # Arguments
    ///
    /// * `project_id` - The project used to qualify two-segment table names
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            location: None,
            credentials: None,
            operation_timeout_ms: None,
            options: HashMap::new(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_credentials_json(mut self, json: impl Into<String>) -> Self {
        self.credentials = Some(CredentialSource::Json(json.into()));
        self
    }

    pub fn with_credentials_file(mut self, path: impl Into<String>) -> Self {
        self.credentials = Some(CredentialSource::File(path.into()));
        self
    }

    pub fn with_application_default_credentials(mut self) -> Self {
        self.credentials = Some(CredentialSource::ApplicationDefault);
        self
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Add a driver-specific option.
    ///
    /// # Returns
    ///
    /// The `WarehouseConfig` instance with the added option (for method chaining).
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn get_option(&self, key: &str) -> Option<&String> {
        self.options.get(key)
    }

    pub fn operation_timeout(&self) -> Option<Duration> {
        self.operation_timeout_ms.map(Duration::from_millis)
    }

    /// Check that the configuration can be used to build a client.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// * The project id is empty
    /// * No credential source is configured
    /// * A credential source is configured with an empty value
    /// * The operation timeout is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_id.trim().is_empty() {
            return Err(ConfigError::MissingProject);
        }

        match &self.credentials {
            None => return Err(ConfigError::MissingCredentials),
            Some(CredentialSource::Json(value)) | Some(CredentialSource::File(value))
                if value.trim().is_empty() =>
            {
                return Err(ConfigError::MissingCredentials)
            }
            Some(_) => {}
        }

        if self.operation_timeout_ms == Some(0) {
            return Err(ConfigError::InvalidOption {
                key: "operation_timeout_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
