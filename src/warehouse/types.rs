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

//! Warehouse object model
//!
//! Plain data types exchanged with a [`WarehouseClient`](super::WarehouseClient).
//! Table metadata is a snapshot of the live object at fetch time and is never
//! cached across calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Reference to a dataset within a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetReference {
    pub project: String,
    pub dataset: String,
}

impl DatasetReference {
    pub fn new(project: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            dataset: dataset.into(),
        }
    }

    /// Key used by the dataset registry, `project.dataset`.
    pub fn cache_key(&self) -> String {
        format!("{}.{}", self.project, self.dataset)
    }
}

impl Display for DatasetReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}.{}", self.project, self.dataset)
    }
}

/// Fully resolved reference to a table.
///
/// All three parts are non-empty once produced by the name resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableReference {
    pub project: String,
    pub dataset: String,
    pub table: String,
}

impl TableReference {
    pub fn new(
        project: impl Into<String>,
        dataset: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            dataset: dataset.into(),
            table: table.into(),
        }
    }

    pub fn dataset_reference(&self) -> DatasetReference {
        DatasetReference::new(self.project.clone(), self.dataset.clone())
    }
}

impl Display for TableReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}.{}.{}", self.project, self.dataset, self.table)
    }
}

/// Metadata of a dataset container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

/// Time-unit partitioning. An empty `field` means ingestion-time partitioning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePartitioning {
    #[serde(default)]
    pub field: String,
}

/// Integer-range partitioning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangePartitioning {
    pub field: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clustering {
    #[serde(default)]
    pub fields: Vec<String>,
}

/// A single field of a table schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: String,

    #[serde(default)]
    pub description: String,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKey {
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<PrimaryKey>,
}

/// Snapshot of a live table's metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Object kind as reported by the warehouse, e.g. `TABLE` or `VIEW`.
    #[serde(rename = "type")]
    pub table_type: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_partitioning: Option<TimePartitioning>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_partitioning: Option<RangePartitioning>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clustering: Option<Clustering>,

    #[serde(default)]
    pub schema: Vec<FieldSchema>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_constraints: Option<TableConstraints>,

    /// Opaque version token required by metadata updates.
    #[serde(default)]
    pub etag: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl TableMetadata {
    /// Whether the live table carries any partitioning or clustering signal.
    pub fn has_layout(&self) -> bool {
        self.time_partitioning.is_some()
            || self.range_partitioning.is_some()
            || self.clustering.is_some()
    }
}

/// Changes to apply to a table's metadata. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadataUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Vec<FieldSchema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_constraints: Option<TableConstraints>,
}

impl TableMetadataUpdate {
    pub fn is_empty(&self) -> bool {
        self.schema.is_none() && self.description.is_none() && self.table_constraints.is_none()
    }
}

/// A query submitted to the warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Script variable declarations the query depends on, e.g. `DECLARE x INT64 DEFAULT 1`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variable_definitions: Vec<String>,

    pub text: String,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            variable_definitions: Vec::new(),
            text: text.into(),
        }
    }

    pub fn with_variable_definition(mut self, definition: impl Into<String>) -> Self {
        self.variable_definitions.push(definition.into());
        self
    }

    /// Text sent to a dry run: the variable declarations followed by the query,
    /// so a query referencing script variables still compiles on its own.
    pub fn to_dry_run_query(&self) -> String {
        if self.variable_definitions.is_empty() {
            return self.text.clone();
        }
        format!("{};\n{}", self.variable_definitions.join(";\n"), self.text)
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.text)
    }
}

/// Raw rows returned by a query, with the result schema when the warehouse reports one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRows {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Vec<FieldSchema>>,

    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

/// In-memory result set with column names and type names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub column_types: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}
