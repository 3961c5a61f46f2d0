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

use crate::warehouse::WarehouseError;

/// Errors surfaced by the reconciliation engine.
///
/// Absence of a table or dataset is never reported through this type: each
/// operation that expects possible absence turns it into a success outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// The qualified name is neither `dataset.table` nor `project.dataset.table`.
    #[error("table name must be in dataset.table or project.dataset.table format, '{0}' given")]
    MalformedName(String),

    #[error("failed to {action} dataset '{dataset}': {source}")]
    Provisioning {
        action: &'static str,
        dataset: String,
        source: WarehouseError,
    },

    #[error("failed to fetch metadata for table '{table}': {source}")]
    DriftCheck {
        table: String,
        source: WarehouseError,
    },

    /// The table drifted but could not be deleted. It is left as it was.
    #[error("failed to delete table '{table}' after detecting drift in {drift}: {source}")]
    Recreation {
        table: String,
        drift: String,
        source: WarehouseError,
    },

    #[error("failed to {action} metadata for table '{table}': {source}")]
    Reconciliation {
        action: &'static str,
        table: String,
        source: WarehouseError,
    },
}

impl ReconcileError {
    /// The underlying warehouse error, if the failure came from a warehouse call.
    pub fn warehouse_error(&self) -> Option<&WarehouseError> {
        match self {
            ReconcileError::MalformedName(_) => None,
            ReconcileError::Provisioning { source, .. }
            | ReconcileError::DriftCheck { source, .. }
            | ReconcileError::Recreation { source, .. }
            | ReconcileError::Reconciliation { source, .. } => Some(source),
        }
    }

    /// Whether a metadata update lost an optimistic-concurrency race.
    ///
    /// Callers may re-run the sync, which fetches a fresh version token; the
    /// engine never does so on its own.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            ReconcileError::Reconciliation { source, .. } if source.is_conflict()
        )
    }
}

/// Result type for reconciliation operations
pub type ReconcileResult<T> = Result<T, ReconcileError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_malformed_name_display() {
        let error = ReconcileError::MalformedName("a.b.c.d".to_string());
        assert_eq!(
            error.to_string(),
            "table name must be in dataset.table or project.dataset.table format, 'a.b.c.d' given"
        );
        assert!(error.warehouse_error().is_none());
        assert!(error.source().is_none());
    }

    #[test]
    fn test_provisioning_display_carries_context() {
        let error = ReconcileError::Provisioning {
            action: "create",
            dataset: "proj.ds".to_string(),
            source: WarehouseError::Api {
                code: 403,
                message: "Access Denied".to_string(),
            },
        };
        assert_eq!(
            error.to_string(),
            "failed to create dataset 'proj.ds': warehouse API error 403: Access Denied"
        );
        assert!(error.source().is_some());
    }

    #[test]
    fn test_conflict_only_for_reconciliation() {
        let conflict = WarehouseError::PreconditionFailed("stale".to_string());

        let update = ReconcileError::Reconciliation {
            action: "update",
            table: "proj.ds.t".to_string(),
            source: conflict.clone(),
        };
        assert!(update.is_conflict());

        let drift = ReconcileError::DriftCheck {
            table: "proj.ds.t".to_string(),
            source: conflict,
        };
        assert!(!drift.is_conflict());
    }
}
