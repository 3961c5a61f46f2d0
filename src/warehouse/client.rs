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

use async_trait::async_trait;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use super::error::WarehouseResult;
use super::types::{
    DatasetMetadata, DatasetReference, Query, QueryRows, TableMetadata, TableMetadataUpdate,
    TableReference,
};

/// Generic trait for analytical warehouse clients
///
/// This trait is the boundary between the reconciliation engine and the
/// vendor driver. Every operation must report a missing object as
/// [`WarehouseError::NotFound`](super::WarehouseError::NotFound) (or an API
/// error with status 404) so callers can tell absence apart from failure.
///
/// Cancellation is dropping the returned future. Implementations must not
/// retry internally; retry policy belongs to the caller.
#[async_trait]
pub trait WarehouseClient: Send + Sync {
    /// Name of the backend, used in logs.
    fn backend_name(&self) -> &str;

    /// Run a query for its side effects, discarding any rows.
    ///
    /// # Arguments
    ///
    /// * `query` - The query to execute
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// * The query fails to compile or execute
    /// * Network or authentication errors occur
    async fn run_query(&self, query: &Query) -> WarehouseResult<()>;

    /// Run a query and collect every row together with the result schema.
    ///
    /// # Arguments
    ///
    /// * `query` - The query to execute
    ///
    /// # Returns
    ///
    /// A `Result` containing:
    /// * `Ok(QueryRows)` - All rows, plus the schema when the warehouse reports one
    /// * `Err(WarehouseError)` - If the query or row iteration fails
    async fn read_query(&self, query: &Query) -> WarehouseResult<QueryRows>;

    /// Compile a query without executing it.
    ///
    /// # Errors
    ///
    /// Returns an error describing why the query is invalid, or why the
    /// validation call itself failed.
    async fn dry_run(&self, query: &Query) -> WarehouseResult<()>;

    /// Fetch dataset metadata by project and dataset name.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// * The dataset does not exist (not-found status)
    /// * Permission denied or network errors occur
    async fn dataset_metadata(&self, dataset: &DatasetReference)
        -> WarehouseResult<DatasetMetadata>;

    /// Create an empty dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset already exists or cannot be created.
    async fn create_dataset(
        &self,
        dataset: &DatasetReference,
        metadata: &DatasetMetadata,
    ) -> WarehouseResult<()>;

    /// Fetch table metadata, including its current version token.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// * The table does not exist (not-found status)
    /// * Permission denied or network errors occur
    async fn table_metadata(&self, table: &TableReference) -> WarehouseResult<TableMetadata>;

    /// Apply a metadata update guarded by a version token.
    ///
    /// # Arguments
    ///
    /// * `table` - The table to update
    /// * `update` - The changes to apply
    /// * `etag` - Version token from the metadata snapshot the update was built on
    ///
    /// # Returns
    ///
    /// The table metadata after the update.
    ///
    /// # Errors
    ///
    /// Returns [`WarehouseError::PreconditionFailed`](super::WarehouseError::PreconditionFailed)
    /// when `etag` is stale, and other errors for API failures.
    async fn update_table_metadata(
        &self,
        table: &TableReference,
        update: &TableMetadataUpdate,
        etag: &str,
    ) -> WarehouseResult<TableMetadata>;

    /// Delete a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not exist or cannot be deleted.
    async fn delete_table(&self, table: &TableReference) -> WarehouseResult<()>;
}

impl Debug for dyn WarehouseClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "WarehouseClient(backend={})", self.backend_name())
    }
}
