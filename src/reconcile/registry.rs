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

//! Dataset registry
//!
//! Tracks which datasets are known to exist and hands out one lock per
//! dataset so concurrent provisioning of the same dataset is serialized.
//! Both maps are append-only for the life of the registry: datasets are never
//! deleted by this crate, and a lock that was handed out is never replaced.

use dashmap::{DashMap, DashSet};
use std::sync::{Arc, OnceLock};
use tokio::sync::Mutex;

/// Per-dataset lock handle.
pub type DatasetLock = Arc<Mutex<()>>;

/// Existence cache and lock table, keyed by `project.dataset`.
///
/// A registry is normally shared by every provisioner in the process through
/// an `Arc`. Tests build their own with [`DatasetRegistry::new`] so state
/// does not leak between them.
#[derive(Debug, Default)]
pub struct DatasetRegistry {
    present: DashSet<String>,
    locks: DashMap<String, DatasetLock>,
}

impl DatasetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by every connector that is not given its own.
    pub fn global() -> Arc<DatasetRegistry> {
        static GLOBAL: OnceLock<Arc<DatasetRegistry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(DatasetRegistry::new())))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.present.contains(key)
    }

    /// Record a dataset as existing. Only call after a confirmed lookup or create.
    pub fn mark_present(&self, key: &str) {
        self.present.insert(key.to_string());
    }

    /// Lock for `key`, created on first use.
    pub fn lock_for(&self, key: &str) -> DatasetLock {
        Arc::clone(
            self.locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        )
    }

    /// Number of datasets known to exist.
    pub fn len(&self) -> usize {
        self.present.len()
    }

    pub fn is_empty(&self) -> bool {
        self.present.is_empty()
    }

    pub fn lock_count(&self) -> usize {
        self.locks.len()
    }
}
