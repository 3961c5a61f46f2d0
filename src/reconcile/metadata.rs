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

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::error::{ReconcileError, ReconcileResult};
use super::name::NameResolver;
use crate::asset::Asset;
use crate::util::deadline::with_deadline;
use crate::warehouse::{
    PrimaryKey, TableConstraints, TableMetadata, TableMetadataUpdate, WarehouseClient,
};

/// Why a metadata sync made no update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The asset declares no table or column descriptions.
    NoMetadataDeclared,
    /// The table is not materialized yet; a later run will sync it.
    TableNotFound,
    /// The asset's metadata is already in place.
    NothingToUpdate,
}

/// Outcome of [`MetadataReconciler::sync_metadata`]. Failures are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataSync {
    /// The update was accepted; carries the table's new version token.
    Updated { etag: String },
    Skipped(SkipReason),
}

/// Pushes descriptions and primary-key constraints from an asset onto its table.
pub struct MetadataReconciler {
    client: Arc<dyn WarehouseClient>,
    resolver: NameResolver,
    timeout: Option<Duration>,
}

impl MetadataReconciler {
    pub fn new(client: Arc<dyn WarehouseClient>, resolver: NameResolver) -> Self {
        Self {
            client,
            resolver,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the update that brings `live` in line with `asset`.
    fn build_update(asset: &Asset, live: &TableMetadata) -> TableMetadataUpdate {
        let columns: HashMap<&str, &str> = asset
            .columns
            .iter()
            .map(|c| (c.name.as_str(), c.description.as_str()))
            .collect();

        let mut schema = live.schema.clone();
        let mut schema_changed = false;
        for field in schema.iter_mut() {
            if let Some(description) = columns.get(field.name.as_str()) {
                if field.description != *description {
                    field.description = description.to_string();
                    schema_changed = true;
                }
            }
        }

        let primary_key = asset.column_names_with_primary_key();

        TableMetadataUpdate {
            schema: schema_changed.then_some(schema),
            description: (!asset.description.is_empty()).then(|| asset.description.clone()),
            table_constraints: (!primary_key.is_empty()).then(|| TableConstraints {
                primary_key: Some(PrimaryKey {
                    columns: primary_key,
                }),
            }),
        }
    }

    /// Sync the asset's descriptions and primary key onto the live table.
    ///
    /// The update is guarded by the version token of the metadata it was
    /// built from. A concurrent writer makes it fail with a conflict, which
    /// [`ReconcileError::is_conflict`] reports; the sync is not retried here.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// * The asset name is malformed
    /// * Fetching the live metadata fails for a reason other than "not found"
    /// * The update is rejected, including on a stale version token
    pub async fn sync_metadata(&self, asset: &Asset) -> ReconcileResult<MetadataSync> {
        if !asset.has_any_description() {
            debug!(asset = %asset.name, "no metadata declared, skipping sync");
            return Ok(MetadataSync::Skipped(SkipReason::NoMetadataDeclared));
        }

        let reference = self.resolver.resolve(&asset.name)?;

        let live = match with_deadline(
            "table_metadata",
            self.timeout,
            self.client.table_metadata(&reference),
        )
        .await
        {
            Ok(live) => live,
            Err(err) if err.is_not_found() => {
                debug!(table = %reference, "table not materialized yet, deferring metadata sync");
                return Ok(MetadataSync::Skipped(SkipReason::TableNotFound));
            }
            Err(source) => {
                return Err(ReconcileError::Reconciliation {
                    action: "fetch",
                    table: asset.name.clone(),
                    source,
                })
            }
        };

        let update = Self::build_update(asset, &live);
        if update.is_empty() {
            return Ok(MetadataSync::Skipped(SkipReason::NothingToUpdate));
        }

        let updated = with_deadline(
            "update_table_metadata",
            self.timeout,
            self.client
                .update_table_metadata(&reference, &update, &live.etag),
        )
        .await
        .map_err(|source| ReconcileError::Reconciliation {
            action: "update",
            table: asset.name.clone(),
            source,
        })?;

        info!(
            table = %reference,
            schema = update.schema.is_some(),
            description = update.description.is_some(),
            primary_key = update.table_constraints.is_some(),
            "updated table metadata"
        );
        Ok(MetadataSync::Updated {
            etag: updated.etag,
        })
    }
}
