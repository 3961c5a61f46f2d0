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

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::asset::Asset;
use crate::query::{QueryExecResult, QueryExecutor};
use crate::reconcile::{
    DatasetProvisioner, DatasetRegistry, DropOutcome, MetadataReconciler, MetadataSync,
    NameResolver, ProvisionOutcome, ReconcileResult, TableRecreator,
};
use crate::warehouse::{
    ConfigError, Query, QueryResult, TableReference, WarehouseClient, WarehouseConfig,
};

/// Errors raised while building a [`Connector`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    #[error("invalid warehouse configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("no warehouse client provided")]
    MissingClient,
}

/// Builder for constructing a [`Connector`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use warehouse_reconcile::reconcile::DatasetRegistry;
/// use warehouse_reconcile::warehouse::{InMemoryWarehouse, WarehouseConfig};
/// use warehouse_reconcile::Connector;
///
/// let config = WarehouseConfig::new("my-project").with_application_default_credentials();
/// let connector = Connector::builder(config)
///     .with_client(Arc::new(InMemoryWarehouse::new()))
///     .with_registry(Arc::new(DatasetRegistry::new()))
///     .build()
///     .unwrap();
/// ```
pub struct ConnectorBuilder {
    config: WarehouseConfig,
    client: Option<Arc<dyn WarehouseClient>>,
    registry: Option<Arc<DatasetRegistry>>,
}

impl ConnectorBuilder {
    pub fn new(config: WarehouseConfig) -> Self {
        Self {
            config,
            client: None,
            registry: None,
        }
    }

    /// Sets the warehouse client every operation goes through.
    pub fn with_client(mut self, client: Arc<dyn WarehouseClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets the dataset registry.
    ///
    /// Without one, the connector shares [`DatasetRegistry::global`] with every
    /// other connector in the process.
    pub fn with_registry(mut self, registry: Arc<DatasetRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Builds the `Connector` instance.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// * The configuration fails validation
    /// * No client was provided
    pub fn build(self) -> Result<Connector, ConnectorError> {
        self.config.validate()?;
        let client = self.client.ok_or(ConnectorError::MissingClient)?;
        let registry = self.registry.unwrap_or_else(DatasetRegistry::global);
        let resolver = NameResolver::new(self.config.project_id.clone());
        let timeout = self.config.operation_timeout();

        Ok(Connector {
            provisioner: DatasetProvisioner::new(
                Arc::clone(&client),
                resolver.clone(),
                Arc::clone(&registry),
            )
            .with_location(self.config.location.clone())
            .with_timeout(timeout),
            recreator: TableRecreator::new(Arc::clone(&client), resolver.clone())
                .with_timeout(timeout),
            reconciler: MetadataReconciler::new(Arc::clone(&client), resolver.clone())
                .with_timeout(timeout),
            executor: QueryExecutor::new(Arc::clone(&client)).with_timeout(timeout),
            config: self.config,
            client,
            registry,
            resolver,
        })
    }
}

/// Warehouse connector used by the orchestrator for each asset it materializes.
///
/// A connector is cheap to share behind an `Arc` and safe to use from many
/// tasks at once; the only state it shares between calls is its
/// [`DatasetRegistry`].
pub struct Connector {
    config: WarehouseConfig,
    client: Arc<dyn WarehouseClient>,
    registry: Arc<DatasetRegistry>,
    resolver: NameResolver,
    provisioner: DatasetProvisioner,
    recreator: TableRecreator,
    reconciler: MetadataReconciler,
    executor: QueryExecutor,
}

impl Connector {
    pub fn builder(config: WarehouseConfig) -> ConnectorBuilder {
        ConnectorBuilder::new(config)
    }

    pub fn config(&self) -> &WarehouseConfig {
        &self.config
    }

    pub fn client(&self) -> &Arc<dyn WarehouseClient> {
        &self.client
    }

    pub fn registry(&self) -> &Arc<DatasetRegistry> {
        &self.registry
    }

    /// Resolve a qualified table name against the configured home project.
    pub fn resolve(&self, name: &str) -> ReconcileResult<TableReference> {
        self.resolver.resolve(name)
    }

    /// See [`DatasetProvisioner::ensure_dataset`].
    pub async fn ensure_dataset(&self, asset: &Asset) -> ReconcileResult<ProvisionOutcome> {
        self.provisioner.ensure_dataset(asset).await
    }

    /// See [`TableRecreator::reconcile_or_drop`].
    pub async fn reconcile_or_drop(
        &self,
        table_name: &str,
        asset: &Asset,
    ) -> ReconcileResult<DropOutcome> {
        self.recreator.reconcile_or_drop(table_name, asset).await
    }

    /// See [`MetadataReconciler::sync_metadata`].
    pub async fn sync_metadata(&self, asset: &Asset) -> ReconcileResult<MetadataSync> {
        self.reconciler.sync_metadata(asset).await
    }

    /// See [`NameResolver::build_table_exists_query`].
    pub fn build_table_exists_query(&self, table_name: &str) -> ReconcileResult<String> {
        self.resolver.build_table_exists_query(table_name)
    }

    pub async fn validate_query(&self, query: &Query) -> QueryExecResult<()> {
        self.executor.validate(query).await
    }

    pub async fn run_without_result(&self, query: &Query) -> QueryExecResult<()> {
        self.executor.run_without_result(query).await
    }

    pub async fn select(&self, query: &Query) -> QueryExecResult<Vec<Vec<Value>>> {
        self.executor.select(query).await
    }

    pub async fn select_with_schema(&self, query: &Query) -> QueryExecResult<QueryResult> {
        self.executor.select_with_schema(query).await
    }

    pub async fn ping(&self) -> QueryExecResult<()> {
        self.executor.ping().await
    }
}
