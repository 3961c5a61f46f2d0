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
use tracing::{debug, info};

use super::error::{ReconcileError, ReconcileResult};
use super::name::NameResolver;
use super::registry::DatasetRegistry;
use crate::asset::Asset;
use crate::util::deadline::with_deadline;
use crate::warehouse::{DatasetMetadata, WarehouseClient};

/// How [`DatasetProvisioner::ensure_dataset`] satisfied the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The asset name does not map to a dataset; nothing was done.
    Unqualified,
    /// The registry already knew the dataset; no warehouse call was made.
    Cached,
    /// The dataset existed in the warehouse.
    Existing,
    Created,
}

/// Makes sure the dataset containing an asset exists before any table work.
///
/// At most one lookup-or-create round trip is made per dataset for the life
/// of the [`DatasetRegistry`], no matter how many assets share the dataset or
/// how many of them are provisioned concurrently.
pub struct DatasetProvisioner {
    client: Arc<dyn WarehouseClient>,
    resolver: NameResolver,
    registry: Arc<DatasetRegistry>,
    location: Option<String>,
    timeout: Option<Duration>,
}

impl DatasetProvisioner {
    pub fn new(
        client: Arc<dyn WarehouseClient>,
        resolver: NameResolver,
        registry: Arc<DatasetRegistry>,
    ) -> Self {
        Self {
            client,
            resolver,
            registry,
            location: None,
            timeout: None,
        }
    }

    /// Location given to datasets this provisioner creates.
    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ensure the dataset of `asset` exists, creating it if needed.
    ///
    /// Names that are not `dataset.table` or `project.dataset.table` are
    /// skipped rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Provisioning`] if the dataset lookup fails for
    /// a reason other than "not found", or if creation fails. The registry is
    /// left untouched so a later call retries.
    pub async fn ensure_dataset(&self, asset: &Asset) -> ReconcileResult<ProvisionOutcome> {
        let Some(dataset) = self.resolver.dataset_of(&asset.name) else {
            debug!(asset = %asset.name, "asset name has no dataset, skipping provisioning");
            return Ok(ProvisionOutcome::Unqualified);
        };
        let key = dataset.cache_key();

        if self.registry.contains(&key) {
            debug!(dataset = %key, "dataset cached");
            return Ok(ProvisionOutcome::Cached);
        }

        let lock = self.registry.lock_for(&key);
        let _guard = lock.lock().await;

        // Another caller may have finished while we waited for the lock.
        if self.registry.contains(&key) {
            debug!(dataset = %key, "dataset cached");
            return Ok(ProvisionOutcome::Cached);
        }

        let lookup = with_deadline(
            "dataset_metadata",
            self.timeout,
            self.client.dataset_metadata(&dataset),
        )
        .await;

        match lookup {
            Ok(_) => {
                self.registry.mark_present(&key);
                debug!(dataset = %key, "dataset already exists");
                Ok(ProvisionOutcome::Existing)
            }
            Err(err) if err.is_not_found() => {
                let metadata = DatasetMetadata {
                    location: self.location.clone(),
                    ..Default::default()
                };
                with_deadline(
                    "create_dataset",
                    self.timeout,
                    self.client.create_dataset(&dataset, &metadata),
                )
                .await
                .map_err(|source| ReconcileError::Provisioning {
                    action: "create",
                    dataset: key.clone(),
                    source,
                })?;

                self.registry.mark_present(&key);
                info!(dataset = %key, "created dataset");
                Ok(ProvisionOutcome::Created)
            }
            Err(source) => Err(ReconcileError::Provisioning {
                action: "fetch metadata for",
                dataset: key,
                source,
            }),
        }
    }
}
