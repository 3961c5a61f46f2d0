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

//! # Warehouse Reconcile
//!
//! Table materialization reconciliation for analytical warehouse connectors.
//!
//! A data-pipeline orchestrator materializes each asset (a named table with a
//! column schema and a materialization strategy) into a warehouse table. Before
//! it builds the table, this crate makes sure the target is in a state the build
//! can rely on:
//!
//! - **Dataset provisioning**: the containing dataset is created if missing,
//!   with at most one lookup-or-create round trip per dataset per process, even
//!   when many assets sharing it are materialized in parallel
//! - **Drift detection**: partitioning, clustering and materialization type of
//!   the live table are compared against the asset
//! - **Drop on mismatch**: a drifted table is deleted so it can be rebuilt
//! - **Metadata sync**: descriptions and primary-key constraints are pushed onto
//!   the table, guarded by the table's version token
//! - **Query execution**: dry runs, side-effect queries and result collection
//!   with normalized errors
//!
//! The warehouse driver itself sits behind the [`WarehouseClient`] trait.
//! [`InMemoryWarehouse`](warehouse::InMemoryWarehouse) implements it without
//! network access.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use warehouse_reconcile::asset::{Asset, MaterializationType};
//! use warehouse_reconcile::reconcile::DropOutcome;
//! use warehouse_reconcile::warehouse::{InMemoryWarehouse, WarehouseConfig};
//! use warehouse_reconcile::Connector;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let config = WarehouseConfig::new("my-project").with_credentials_file("/path/to/key.json");
//! let connector = Connector::builder(config)
//!     .with_client(Arc::new(InMemoryWarehouse::new()))
//!     .build()?;
//!
//! let asset = Asset::new("analytics.events")
//!     .with_materialization_type(MaterializationType::Table)
//!     .with_partition_by("event_date");
//!
//! connector.ensure_dataset(&asset).await?;
//! if let DropOutcome::Dropped(drift) = connector.reconcile_or_drop(&asset.name, &asset).await? {
//!     println!("dropped {} because of {}", asset.name, drift);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`asset`] - Asset definitions consumed from the orchestrator
//! - [`warehouse`] - Warehouse client abstraction, metadata types and configuration
//! - [`reconcile`] - Provisioning, drift detection, drop-on-mismatch and metadata sync
//! - [`query`] - Query execution facade
//! - [`util`] - Utility functions and helpers

pub mod asset;
pub mod connector;
pub mod query;
pub mod reconcile;
pub mod util;
pub mod warehouse;

// Re-export commonly used types
pub use connector::{Connector, ConnectorBuilder, ConnectorError};
pub use reconcile::{ReconcileError, ReconcileResult};
pub use warehouse::{WarehouseClient, WarehouseConfig, WarehouseError};
