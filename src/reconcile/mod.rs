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

//! Table materialization reconciliation
//!
//! The engine an orchestrator runs before (and after) building a table for
//! an asset:
//!
//! 1. [`DatasetProvisioner`] makes sure the containing dataset exists
//! 2. [`TableRecreator`] drops the live table if it drifted from the asset
//! 3. [`MetadataReconciler`] pushes descriptions and primary keys onto it
//!
//! Drift detection itself lives in [`drift`] as pure predicates.
//!
//! ## Modules
//!
//! - [`name`] - Qualified table name resolution
//! - [`registry`] - Dataset existence cache and per-dataset locks
//! - [`provisioner`] - Dataset provisioning
//! - [`drift`] - Partitioning, clustering and materialization type comparison
//! - [`recreator`] - Drop-on-mismatch
//! - [`metadata`] - Description and constraint sync

pub mod drift;
pub mod error;
pub mod metadata;
pub mod name;
pub mod provisioner;
pub mod recreator;
pub mod registry;

pub use drift::DriftReport;
pub use error::{ReconcileError, ReconcileResult};
pub use metadata::{MetadataReconciler, MetadataSync, SkipReason};
pub use name::NameResolver;
pub use provisioner::{DatasetProvisioner, ProvisionOutcome};
pub use recreator::{DropOutcome, TableRecreator};
pub use registry::DatasetRegistry;
