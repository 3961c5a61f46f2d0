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

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::drift::DriftReport;
use super::error::{ReconcileError, ReconcileResult};
use super::name::NameResolver;
use crate::asset::Asset;
use crate::util::deadline::with_deadline;
use crate::warehouse::WarehouseClient;

/// What [`TableRecreator::reconcile_or_drop`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The table does not exist; there was nothing to compare.
    Absent,
    /// The table matches the asset and was left alone.
    Unchanged,
    /// The table drifted and was deleted. The caller must recreate it.
    Dropped(DriftReport),
}

/// Deletes tables whose layout or kind no longer matches their asset.
pub struct TableRecreator {
    client: Arc<dyn WarehouseClient>,
    resolver: NameResolver,
    timeout: Option<Duration>,
}

impl TableRecreator {
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

    /// Compare the live table against `asset` and delete it on drift.
    ///
    /// Deletion cannot be undone. Only call this when the table is about to
    /// be rebuilt from the asset.
    ///
    /// # Arguments
    ///
    /// * `table_name` - Qualified name of the live table
    /// * `asset` - The asset the table should reflect
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// * `table_name` is malformed ([`ReconcileError::MalformedName`])
    /// * Fetching the live metadata fails for a reason other than "not found"
    ///   ([`ReconcileError::DriftCheck`])
    /// * The table drifted and deleting it failed ([`ReconcileError::Recreation`])
    pub async fn reconcile_or_drop(
        &self,
        table_name: &str,
        asset: &Asset,
    ) -> ReconcileResult<DropOutcome> {
        let reference = self.resolver.resolve(table_name)?;

        let live = match with_deadline(
            "table_metadata",
            self.timeout,
            self.client.table_metadata(&reference),
        )
        .await
        {
            Ok(live) => live,
            Err(err) if err.is_not_found() => {
                debug!(table = %reference, "table does not exist, nothing to drop");
                return Ok(DropOutcome::Absent);
            }
            Err(source) => {
                return Err(ReconcileError::DriftCheck {
                    table: table_name.to_string(),
                    source,
                })
            }
        };

        let drift = DriftReport::detect(&live, asset);
        if !drift.has_drift() {
            return Ok(DropOutcome::Unchanged);
        }

        warn!(table = %reference, drift = %drift, "table drifted from its asset, dropping it");
        with_deadline(
            "delete_table",
            self.timeout,
            self.client.delete_table(&reference),
        )
        .await
        .map_err(|source| ReconcileError::Recreation {
            table: table_name.to_string(),
            drift: drift.to_string(),
            source,
        })?;

        Ok(DropOutcome::Dropped(drift))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::MaterializationType;
    use crate::warehouse::{
        Clustering, InMemoryWarehouse, Operation, TableMetadata, TableReference,
        TimePartitioning, WarehouseError,
    };

    fn events() -> TableReference {
        TableReference::new("proj", "ds", "events")
    }

    fn events_asset() -> Asset {
        Asset::new("proj.ds.events")
            .with_materialization_type(MaterializationType::Table)
            .with_partition_by("event_date")
    }

    fn partitioned_on(field: &str) -> TableMetadata {
        TableMetadata {
            table_type: "TABLE".to_string(),
            time_partitioning: Some(TimePartitioning {
                field: field.to_string(),
            }),
            ..Default::default()
        }
    }

    fn recreator(warehouse: &Arc<InMemoryWarehouse>) -> TableRecreator {
        TableRecreator::new(warehouse.clone(), NameResolver::new("home"))
    }

    #[tokio::test]
    async fn test_matching_table_is_kept() {
        let warehouse = Arc::new(InMemoryWarehouse::new());
        warehouse.insert_table(events(), partitioned_on("event_date"));

        let outcome = recreator(&warehouse)
            .reconcile_or_drop("proj.ds.events", &events_asset())
            .await
            .unwrap();

        assert_eq!(outcome, DropOutcome::Unchanged);
        assert_eq!(warehouse.call_count(Operation::DeleteTable), 0);
        assert!(warehouse.has_table(&events()));
    }

    #[tokio::test]
    async fn test_partition_drift_drops_table() {
        let warehouse = Arc::new(InMemoryWarehouse::new());
        warehouse.insert_table(events(), partitioned_on("created_at"));

        let outcome = recreator(&warehouse)
            .reconcile_or_drop("proj.ds.events", &events_asset())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DropOutcome::Dropped(DriftReport {
                materialization_type: false,
                partitioning: true,
                clustering: false,
            })
        );
        assert_eq!(warehouse.call_count(Operation::DeleteTable), 1);
        assert!(!warehouse.has_table(&events()));
    }

    #[tokio::test]
    async fn test_missing_table_is_absent() {
        let warehouse = Arc::new(InMemoryWarehouse::new());

        let outcome = recreator(&warehouse)
            .reconcile_or_drop("proj.ds.events", &events_asset())
            .await
            .unwrap();

        assert_eq!(outcome, DropOutcome::Absent);
        assert_eq!(warehouse.call_count(Operation::DeleteTable), 0);
    }

    #[tokio::test]
    async fn test_type_drift_on_plain_table() {
        let warehouse = Arc::new(InMemoryWarehouse::new());
        warehouse.insert_table(
            TableReference::new("home", "ds", "report"),
            TableMetadata {
                table_type: "TABLE".to_string(),
                ..Default::default()
            },
        );
        let asset = Asset::new("ds.report").with_materialization_type(MaterializationType::View);

        let outcome = recreator(&warehouse)
            .reconcile_or_drop("ds.report", &asset)
            .await
            .unwrap();

        assert!(matches!(outcome, DropOutcome::Dropped(d) if d.materialization_type));
        assert_eq!(warehouse.call_count(Operation::DeleteTable), 1);
    }

    #[tokio::test]
    async fn test_clustering_order_drift() {
        let warehouse = Arc::new(InMemoryWarehouse::new());
        warehouse.insert_table(
            events(),
            TableMetadata {
                clustering: Some(Clustering {
                    fields: vec!["b".to_string(), "a".to_string()],
                }),
                ..partitioned_on("event_date")
            },
        );
        let asset = events_asset().with_cluster_by(["a", "b"]);

        let outcome = recreator(&warehouse)
            .reconcile_or_drop("proj.ds.events", &asset)
            .await
            .unwrap();

        assert!(matches!(outcome, DropOutcome::Dropped(d) if d.clustering && !d.partitioning));
    }

    #[tokio::test]
    async fn test_malformed_name_makes_no_calls() {
        let warehouse = Arc::new(InMemoryWarehouse::new());

        let err = recreator(&warehouse)
            .reconcile_or_drop("events", &events_asset())
            .await
            .unwrap_err();

        assert_eq!(err, ReconcileError::MalformedName("events".to_string()));
        assert_eq!(warehouse.call_count(Operation::TableMetadata), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_drift_check_error() {
        let warehouse = Arc::new(InMemoryWarehouse::new());
        warehouse.fail_on(
            Operation::TableMetadata,
            WarehouseError::Api {
                code: 500,
                message: "backend error".to_string(),
            },
        );

        let err = recreator(&warehouse)
            .reconcile_or_drop("proj.ds.events", &events_asset())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "failed to fetch metadata for table 'proj.ds.events': warehouse API error 500: backend error"
        );
        assert_eq!(warehouse.call_count(Operation::DeleteTable), 0);
    }

    #[tokio::test]
    async fn test_delete_failure_is_recreation_error() {
        let warehouse = Arc::new(InMemoryWarehouse::new());
        warehouse.insert_table(events(), partitioned_on("created_at"));
        warehouse.fail_on(
            Operation::DeleteTable,
            WarehouseError::Api {
                code: 403,
                message: "Access Denied".to_string(),
            },
        );

        let err = recreator(&warehouse)
            .reconcile_or_drop("proj.ds.events", &events_asset())
            .await
            .unwrap_err();

        assert!(matches!(err, ReconcileError::Recreation { ref drift, .. } if drift == "partitioning"));
        assert!(warehouse.has_table(&events()));
    }
}
