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

//! Qualified name resolution
//!
//! Table names come in two forms: `dataset.table`, qualified with the home
//! project, and `project.dataset.table`. Every segment must be non-empty.

use super::error::{ReconcileError, ReconcileResult};
use crate::warehouse::{DatasetReference, TableReference};

/// Resolves dotted table names against a home project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameResolver {
    home_project: String,
}

impl NameResolver {
    pub fn new(home_project: impl Into<String>) -> Self {
        Self {
            home_project: home_project.into(),
        }
    }

    pub fn home_project(&self) -> &str {
        &self.home_project
    }

    /// Resolve a qualified table name.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::MalformedName`] if any segment is empty or the
    /// name does not have two or three segments.
    pub fn resolve(&self, name: &str) -> ReconcileResult<TableReference> {
        let segments: Vec<&str> = name.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(ReconcileError::MalformedName(name.to_string()));
        }

        match segments.as_slice() {
            [dataset, table] => Ok(TableReference::new(
                self.home_project.clone(),
                *dataset,
                *table,
            )),
            [project, dataset, table] => Ok(TableReference::new(*project, *dataset, *table)),
            _ => Err(ReconcileError::MalformedName(name.to_string())),
        }
    }

    /// Dataset a table name lives in, or `None` when the name does not map to
    /// a provisionable dataset.
    pub fn dataset_of(&self, name: &str) -> Option<DatasetReference> {
        self.resolve(name)
            .ok()
            .map(|reference| reference.dataset_reference())
    }

    /// Build a query returning a single boolean: whether the table exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use warehouse_reconcile::reconcile::NameResolver;
    ///
    /// let resolver = NameResolver::new("home");
    /// assert_eq!(
    ///     resolver.build_table_exists_query("ds.events").unwrap(),
    ///     "SELECT EXISTS (SELECT 1 FROM home.ds.INFORMATION_SCHEMA.TABLES WHERE table_name = 'events')"
    /// );
    /// ```
    pub fn build_table_exists_query(&self, name: &str) -> ReconcileResult<String> {
        let reference = self.resolve(name)?;
        Ok(format!(
            "SELECT EXISTS (SELECT 1 FROM {}.{}.INFORMATION_SCHEMA.TABLES WHERE table_name = '{}')",
            reference.project,
            reference.dataset,
            escape_string_literal(&reference.table)
        ))
    }
}

fn escape_string_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
