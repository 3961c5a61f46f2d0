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

//! Asset definitions
//!
//! An asset is the orchestrator's declarative description of a table to
//! materialize. The reconciliation engine only ever reads these values.

use serde::{Deserialize, Serialize};

/// The kind of warehouse object an asset should become.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MaterializationType {
    /// No opinion on the live object kind.
    #[default]
    None,
    Table,
    View,
    MaterializedView,
    External,
    Snapshot,
}

impl MaterializationType {
    /// Get the materialization type as a string.
    ///
    /// The returned value uses the same spelling as the serialized form, which
    /// is also how warehouses report object kinds modulo case.
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterializationType::None => "none",
            MaterializationType::Table => "table",
            MaterializationType::View => "view",
            MaterializationType::MaterializedView => "materialized_view",
            MaterializationType::External => "external",
            MaterializationType::Snapshot => "snapshot",
        }
    }
}

/// Materialization settings for an asset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Materialization {
    #[serde(rename = "type", default)]
    pub materialization_type: MaterializationType,

    /// Partition column, if the asset is partitioned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_by: Option<String>,

    /// Cluster columns. Order is significant.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cluster_by: Vec<String>,
}

impl Materialization {
    /// Partition column, treating an empty string as undeclared.
    pub fn partition_column(&self) -> Option<&str> {
        self.partition_by.as_deref().filter(|p| !p.is_empty())
    }

    /// Whether the asset declares any partitioning or clustering.
    pub fn declares_layout(&self) -> bool {
        self.partition_column().is_some() || !self.cluster_by.is_empty()
    }
}

/// A single column of an asset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Column {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub primary_key: bool,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
}

/// Declarative description of a table to materialize.
///
/// # Examples
///
/// ```
/// use warehouse_reconcile::asset::{Asset, Column, MaterializationType};
///
/// let asset = Asset::new("proj.ds.events")
///     .with_materialization_type(MaterializationType::Table)
///     .with_partition_by("event_date")
///     .with_column(Column::new("id").primary_key());
///
/// assert_eq!(asset.column_names_with_primary_key(), vec!["id"]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Asset {
    /// Qualified table name, `dataset.table` or `project.dataset.table`.
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub columns: Vec<Column>,

    #[serde(default)]
    pub materialization: Materialization,
}

impl Asset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_materialization_type(mut self, materialization_type: MaterializationType) -> Self {
        self.materialization.materialization_type = materialization_type;
        self
    }

    pub fn with_partition_by(mut self, column: impl Into<String>) -> Self {
        self.materialization.partition_by = Some(column.into());
        self
    }

    pub fn with_cluster_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.materialization.cluster_by = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Names of the columns flagged as primary key, in declaration order.
    pub fn column_names_with_primary_key(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Whether the asset carries any description worth pushing to the warehouse.
    pub fn has_any_description(&self) -> bool {
        !self.description.is_empty() || self.columns.iter().any(|c| !c.description.is_empty())
    }
}
