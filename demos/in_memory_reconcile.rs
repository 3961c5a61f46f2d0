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

use std::error::Error;
use std::sync::Arc;
use tracing::info;
use warehouse_reconcile::asset::{Asset, Column, MaterializationType};
use warehouse_reconcile::reconcile::DatasetRegistry;
use warehouse_reconcile::warehouse::{
    FieldSchema, InMemoryWarehouse, Operation, TableMetadata, TableReference, TimePartitioning,
    WarehouseConfig,
};
use warehouse_reconcile::Connector;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let warehouse = Arc::new(InMemoryWarehouse::new());
    let config = WarehouseConfig::new("proj").with_application_default_credentials();
    let connector = Connector::builder(config)
        .with_client(warehouse.clone())
        .with_registry(Arc::new(DatasetRegistry::new()))
        .build()?;

    let asset = Asset::new("proj.ds.events")
        .with_description("Every tracked event")
        .with_materialization_type(MaterializationType::Table)
        .with_partition_by("event_date")
        .with_column(Column::new("id").with_description("Event id").primary_key())
        .with_column(Column::new("event_date").with_description("Day of the event"));

    let outcome = connector.ensure_dataset(&asset).await?;
    info!(outcome = ?outcome, "provisioned dataset");

    let events = TableReference::new("proj", "ds", "events");
    let live = TableMetadata {
        table_type: "TABLE".to_string(),
        time_partitioning: Some(TimePartitioning {
            field: "event_date".to_string(),
        }),
        schema: vec![
            FieldSchema::new("id", "INT64"),
            FieldSchema::new("event_date", "DATE"),
        ],
        ..Default::default()
    };
    warehouse.insert_table(events.clone(), live.clone());

    let outcome = connector.reconcile_or_drop(&asset.name, &asset).await?;
    info!(outcome = ?outcome, "reconciled matching table");

    let outcome = connector.sync_metadata(&asset).await?;
    info!(outcome = ?outcome, "synced metadata");

    warehouse.insert_table(
        events,
        TableMetadata {
            time_partitioning: Some(TimePartitioning {
                field: "created_at".to_string(),
            }),
            etag: String::new(),
            ..live
        },
    );
    let outcome = connector.reconcile_or_drop(&asset.name, &asset).await?;
    info!(outcome = ?outcome, "reconciled drifted table");

    println!("{}", connector.build_table_exists_query(&asset.name)?);
    println!("deletes issued: {}", warehouse.call_count(Operation::DeleteTable));

    Ok(())
}
