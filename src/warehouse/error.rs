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

use thiserror::Error;

/// Errors reported by a warehouse client.
///
/// Variants carry the structured status of the failed call so callers can
/// branch on "not found" and "version conflict" without parsing messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WarehouseError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    /// The supplied version token no longer matches the live object.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("warehouse API error {code}: {message}")]
    Api { code: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("deadline exceeded after {millis}ms in {operation}")]
    DeadlineExceeded { operation: String, millis: u128 },

    #[error("operation cancelled: {0}")]
    Cancelled(String),

    /// A message already stripped of vendor wrapping by [`WarehouseError::normalize`].
    #[error("{0}")]
    Message(String),
}

impl WarehouseError {
    /// HTTP-style status code of the failed call, when there is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            WarehouseError::NotFound(_) => Some(404),
            WarehouseError::BadRequest(_) => Some(400),
            WarehouseError::PreconditionFailed(_) => Some(412),
            WarehouseError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    pub fn is_conflict(&self) -> bool {
        self.status_code() == Some(412)
    }

    /// Reduce "not found" and "bad request" failures to their bare message.
    ///
    /// Query errors surface to users verbatim, and the vendor wrapping around
    /// these two statuses carries nothing but noise. Every other error passes
    /// through unchanged.
    pub fn normalize(self) -> Self {
        match self {
            WarehouseError::NotFound(message) | WarehouseError::BadRequest(message) => {
                WarehouseError::Message(message)
            }
            WarehouseError::Api { code, message } if code == 404 || code == 400 => {
                WarehouseError::Message(message)
            }
            other => other,
        }
    }
}

/// Result type for warehouse operations
pub type WarehouseResult<T> = Result<T, WarehouseError>;
