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

//! Warehouse client abstraction layer
//!
//! This module defines the boundary between the reconciliation engine and the
//! analytical warehouse driver: the [`WarehouseClient`] trait, the metadata
//! types it exchanges, its error type, and connection configuration.
//!
//! [`InMemoryWarehouse`] implements the trait without any network access.

pub mod client;
pub mod config;
pub mod error;
pub mod memory;
pub mod types;

// Public exports
pub use client::WarehouseClient;
pub use config::{ConfigError, CredentialSource, WarehouseConfig};
pub use error::{WarehouseError, WarehouseResult};
pub use memory::{InMemoryWarehouse, Operation};
pub use types::{
    Clustering, DatasetMetadata, DatasetReference, FieldSchema, PrimaryKey, Query, QueryResult,
    QueryRows, RangePartitioning, TableConstraints, TableMetadata, TableMetadataUpdate,
    TableReference, TimePartitioning,
};
