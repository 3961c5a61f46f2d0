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

//! In-process warehouse backend
//!
//! [`InMemoryWarehouse`] keeps datasets and tables in process memory and
//! follows the same contract as a real driver: missing objects are reported
//! as not found, and metadata updates are guarded by version tokens. It also
//! counts calls per operation and can inject failures, which makes it the
//! backend of choice for offline runs and tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

use super::client::WarehouseClient;
use super::error::{WarehouseError, WarehouseResult};
use super::types::{
    DatasetMetadata, DatasetReference, Query, QueryRows, TableMetadata, TableMetadataUpdate,
    TableReference,
};

/// Operations of the [`WarehouseClient`] trait, used for call accounting
/// and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    RunQuery,
    ReadQuery,
    DryRun,
    DatasetMetadata,
    CreateDataset,
    TableMetadata,
    UpdateTableMetadata,
    DeleteTable,
}

#[derive(Debug, Default)]
struct State {
    datasets: HashMap<DatasetReference, DatasetMetadata>,
    tables: HashMap<TableReference, TableMetadata>,
    scripted_rows: HashMap<String, QueryRows>,
    rejected_queries: HashMap<String, String>,
    failures: HashMap<Operation, WarehouseError>,
    calls: HashMap<Operation, usize>,
    executed: Vec<String>,
    dry_runs: Vec<String>,
    update_tokens: Vec<String>,
    concurrent_writes: HashSet<TableReference>,
    next_etag: u64,
}

impl State {
    /// Record a call and return the injected failure for it, if any.
    fn enter(&mut self, operation: Operation) -> WarehouseResult<()> {
        *self.calls.entry(operation).or_insert(0) += 1;
        match self.failures.get(&operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn fresh_etag(&mut self) -> String {
        self.next_etag += 1;
        format!("etag-{}", self.next_etag)
    }

    fn check_query(&self, query: &Query) -> WarehouseResult<()> {
        match self.rejected_queries.get(query.text.trim()) {
            Some(message) => Err(WarehouseError::BadRequest(message.clone())),
            None => Ok(()),
        }
    }
}

/// Warehouse client backed by in-process maps.
///
/// # Examples
///
/// ```
/// use warehouse_reconcile::warehouse::{InMemoryWarehouse, TableMetadata, TableReference};
///
/// let warehouse = InMemoryWarehouse::new();
/// warehouse.insert_table(
///     TableReference::new("proj", "ds", "events"),
///     TableMetadata { table_type: "TABLE".to_string(), ..Default::default() },
/// );
/// assert!(warehouse.has_table(&TableReference::new("proj", "ds", "events")));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryWarehouse {
    state: Mutex<State>,
    latency: Option<Duration>,
}

impl InMemoryWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every dataset lookup and creation by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    pub fn insert_dataset(&self, dataset: DatasetReference) {
        self.state()
            .datasets
            .insert(dataset, DatasetMetadata::default());
    }

    /// Store a table, assigning a version token when the snapshot has none.
    pub fn insert_table(&self, table: TableReference, mut metadata: TableMetadata) {
        let mut state = self.state();
        if metadata.etag.is_empty() {
            metadata.etag = state.fresh_etag();
        }
        state.tables.insert(table, metadata);
    }

    pub fn has_dataset(&self, dataset: &DatasetReference) -> bool {
        self.state().datasets.contains_key(dataset)
    }

    pub fn has_table(&self, table: &TableReference) -> bool {
        self.state().tables.contains_key(table)
    }

    pub fn table(&self, table: &TableReference) -> Option<TableMetadata> {
        self.state().tables.get(table).cloned()
    }

    /// Make every call to `operation` fail with `error` until cleared.
    pub fn fail_on(&self, operation: Operation, error: WarehouseError) {
        self.state().failures.insert(operation, error);
    }

    pub fn clear_failure(&self, operation: Operation) {
        self.state().failures.remove(&operation);
    }

    /// Number of calls made to `operation`, including failed ones.
    pub fn call_count(&self, operation: Operation) -> usize {
        self.state().calls.get(&operation).copied().unwrap_or(0)
    }

    /// Rows returned by `read_query` for this exact query text.
    pub fn script_query(&self, text: impl Into<String>, rows: QueryRows) {
        self.state().scripted_rows.insert(text.into(), rows);
    }

    /// Make this query text fail to compile with `message`.
    pub fn reject_query(&self, text: impl Into<String>, message: impl Into<String>) {
        self.state()
            .rejected_queries
            .insert(text.into(), message.into());
    }

    /// Texts of the queries executed so far, in order.
    pub fn executed_queries(&self) -> Vec<String> {
        self.state().executed.clone()
    }

    /// Texts received by `dry_run` so far, in order.
    pub fn dry_run_queries(&self) -> Vec<String> {
        self.state().dry_runs.clone()
    }

    /// Version tokens passed to `update_table_metadata` so far, in order.
    pub fn update_tokens(&self) -> Vec<String> {
        self.state().update_tokens.clone()
    }

    /// Simulate another writer touching `table` right after the next
    /// metadata read: the caller gets the old snapshot while the stored
    /// version token moves on.
    pub fn write_after_next_read(&self, table: TableReference) {
        self.state().concurrent_writes.insert(table);
    }
}

#[async_trait]
impl WarehouseClient for InMemoryWarehouse {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn run_query(&self, query: &Query) -> WarehouseResult<()> {
        let mut state = self.state();
        state.enter(Operation::RunQuery)?;
        state.check_query(query)?;
        state.executed.push(query.text.clone());
        Ok(())
    }

    async fn read_query(&self, query: &Query) -> WarehouseResult<QueryRows> {
        let mut state = self.state();
        state.enter(Operation::ReadQuery)?;
        state.check_query(query)?;
        state.executed.push(query.text.clone());
        Ok(state
            .scripted_rows
            .get(query.text.trim())
            .cloned()
            .unwrap_or_else(|| QueryRows {
                schema: Some(Vec::new()),
                rows: Vec::new(),
            }))
    }

    async fn dry_run(&self, query: &Query) -> WarehouseResult<()> {
        let mut state = self.state();
        state.enter(Operation::DryRun)?;
        state.dry_runs.push(query.text.clone());
        state.check_query(query)
    }

    async fn dataset_metadata(
        &self,
        dataset: &DatasetReference,
    ) -> WarehouseResult<DatasetMetadata> {
        self.simulate_latency().await;
        let mut state = self.state();
        state.enter(Operation::DatasetMetadata)?;
        state.datasets.get(dataset).cloned().ok_or_else(|| {
            WarehouseError::NotFound(format!(
                "Not found: Dataset {}:{}",
                dataset.project, dataset.dataset
            ))
        })
    }

    async fn create_dataset(
        &self,
        dataset: &DatasetReference,
        metadata: &DatasetMetadata,
    ) -> WarehouseResult<()> {
        self.simulate_latency().await;
        let mut state = self.state();
        state.enter(Operation::CreateDataset)?;
        if state.datasets.contains_key(dataset) {
            return Err(WarehouseError::Api {
                code: 409,
                message: format!(
                    "Already Exists: Dataset {}:{}",
                    dataset.project, dataset.dataset
                ),
            });
        }
        let mut metadata = metadata.clone();
        metadata.last_modified = Some(Utc::now());
        state.datasets.insert(dataset.clone(), metadata);
        debug!(dataset = %dataset, "memory warehouse created dataset");
        Ok(())
    }

    async fn table_metadata(&self, table: &TableReference) -> WarehouseResult<TableMetadata> {
        let mut state = self.state();
        state.enter(Operation::TableMetadata)?;
        let snapshot = state
            .tables
            .get(table)
            .cloned()
            .ok_or_else(|| WarehouseError::NotFound(format!("Not found: Table {}", table)))?;

        if state.concurrent_writes.remove(table) {
            let etag = state.fresh_etag();
            if let Some(current) = state.tables.get_mut(table) {
                current.etag = etag;
                current.last_modified = Some(Utc::now());
            }
            debug!(table = %table, "memory warehouse simulated a concurrent write");
        }
        Ok(snapshot)
    }

    async fn update_table_metadata(
        &self,
        table: &TableReference,
        update: &TableMetadataUpdate,
        etag: &str,
    ) -> WarehouseResult<TableMetadata> {
        let mut state = self.state();
        state.enter(Operation::UpdateTableMetadata)?;
        state.update_tokens.push(etag.to_string());
        let new_etag = state.fresh_etag();
        let current = state
            .tables
            .get_mut(table)
            .ok_or_else(|| WarehouseError::NotFound(format!("Not found: Table {}", table)))?;

        if etag.is_empty() || current.etag != etag {
            return Err(WarehouseError::PreconditionFailed(format!(
                "version token {} does not match {} for table {}",
                etag, current.etag, table
            )));
        }

        if let Some(schema) = &update.schema {
            current.schema = schema.clone();
        }
        if let Some(description) = &update.description {
            current.description = description.clone();
        }
        if let Some(constraints) = &update.table_constraints {
            current.table_constraints = Some(constraints.clone());
        }
        current.etag = new_etag;
        current.last_modified = Some(Utc::now());
        Ok(current.clone())
    }

    async fn delete_table(&self, table: &TableReference) -> WarehouseResult<()> {
        let mut state = self.state();
        state.enter(Operation::DeleteTable)?;
        state
            .tables
            .remove(table)
            .map(|_| ())
            .ok_or_else(|| WarehouseError::NotFound(format!("Not found: Table {}", table)))
    }
}
