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

//! Query execution facade
//!
//! Thin layer over [`WarehouseClient`] query calls that normalizes errors:
//! "not found" and "bad request" failures are reduced to their bare message
//! before reaching the caller.

pub mod error;

pub use error::{QueryError, QueryExecResult};

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::util::deadline::with_deadline;
use crate::warehouse::{Query, QueryResult, WarehouseClient};

const PING_QUERY: &str = "SELECT 1";

/// Runs queries against a warehouse.
pub struct QueryExecutor {
    client: Arc<dyn WarehouseClient>,
    timeout: Option<Duration>,
}

impl QueryExecutor {
    pub fn new(client: Arc<dyn WarehouseClient>) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Compile `query` without executing it.
    ///
    /// # Errors
    ///
    /// Returns the normalized compilation error when the query is invalid.
    pub async fn validate(&self, query: &Query) -> QueryExecResult<()> {
        let dry_run = Query::new(query.to_dry_run_query());
        with_deadline("dry_run", self.timeout, self.client.dry_run(&dry_run))
            .await
            .map_err(|e| QueryError::Warehouse(e.normalize()))
    }

    /// Run `query` for its side effects.
    pub async fn run_without_result(&self, query: &Query) -> QueryExecResult<()> {
        with_deadline("run_query", self.timeout, self.client.run_query(query))
            .await
            .map_err(|e| QueryError::Warehouse(e.normalize()))
    }

    /// Run `query` and return its rows.
    pub async fn select(&self, query: &Query) -> QueryExecResult<Vec<Vec<Value>>> {
        let rows = with_deadline("read_query", self.timeout, self.client.read_query(query))
            .await
            .map_err(|e| QueryError::Warehouse(e.normalize()))?;
        Ok(rows.rows)
    }

    /// Run `query` and return its rows together with column names and type names.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MissingSchema`] when the warehouse does not
    /// report a result schema.
    pub async fn select_with_schema(&self, query: &Query) -> QueryExecResult<QueryResult> {
        let rows = with_deadline("read_query", self.timeout, self.client.read_query(query))
            .await
            .map_err(|e| QueryError::Warehouse(e.normalize()))?;
        let schema = rows.schema.ok_or(QueryError::MissingSchema)?;

        let (columns, column_types) = schema
            .into_iter()
            .map(|field| (field.name, field.field_type))
            .unzip();
        debug!(rows = rows.rows.len(), "collected query result");

        Ok(QueryResult {
            columns,
            column_types,
            rows: rows.rows,
        })
    }

    /// Check the connection with a trivial query.
    pub async fn ping(&self) -> QueryExecResult<()> {
        with_deadline(
            "ping",
            self.timeout,
            self.client.run_query(&Query::new(PING_QUERY)),
        )
        .await
        .map_err(|source| QueryError::Ping {
            backend: self.client.backend_name().to_string(),
            source: source.normalize(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::{
        FieldSchema, InMemoryWarehouse, Operation, QueryRows, WarehouseError,
    };
    use serde_json::json;

    fn executor(warehouse: &Arc<InMemoryWarehouse>) -> QueryExecutor {
        QueryExecutor::new(warehouse.clone())
    }

    #[tokio::test]
    async fn test_validate_strips_bad_request_wrapping() {
        let warehouse = Arc::new(InMemoryWarehouse::new());
        warehouse.reject_query("SELEC 1", "Syntax error: Unexpected identifier \"SELEC\"");

        let err = executor(&warehouse)
            .validate(&Query::new("SELEC 1"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Syntax error: Unexpected identifier \"SELEC\"");
        assert!(executor(&warehouse)
            .validate(&Query::new("SELECT 1"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_validate_sends_dry_run_form() {
        let warehouse = Arc::new(InMemoryWarehouse::new());
        let query = Query::new("SELECT run_date")
            .with_variable_definition("DECLARE run_date DATE DEFAULT CURRENT_DATE()");

        executor(&warehouse).validate(&query).await.unwrap();

        assert_eq!(
            warehouse.dry_run_queries(),
            vec!["DECLARE run_date DATE DEFAULT CURRENT_DATE();\nSELECT run_date".to_string()]
        );
        assert!(warehouse.executed_queries().is_empty());
    }

    #[tokio::test]
    async fn test_other_errors_pass_through() {
        let warehouse = Arc::new(InMemoryWarehouse::new());
        let error = WarehouseError::Api {
            code: 503,
            message: "unavailable".to_string(),
        };
        warehouse.fail_on(Operation::RunQuery, error.clone());

        let err = executor(&warehouse)
            .run_without_result(&Query::new("DELETE FROM ds.t WHERE true"))
            .await
            .unwrap_err();

        assert_eq!(err, QueryError::Warehouse(error));
    }

    #[tokio::test]
    async fn test_select_with_schema() {
        let warehouse = Arc::new(InMemoryWarehouse::new());
        warehouse.script_query(
            "SELECT id, name FROM ds.users",
            QueryRows {
                schema: Some(vec![
                    FieldSchema::new("id", "INTEGER"),
                    FieldSchema::new("name", "STRING"),
                ]),
                rows: vec![vec![json!(1), json!("ada")], vec![json!(2), json!("grace")]],
            },
        );

        let result = executor(&warehouse)
            .select_with_schema(&Query::new("SELECT id, name FROM ds.users"))
            .await
            .unwrap();

        assert_eq!(result.columns, vec!["id", "name"]);
        assert_eq!(result.column_types, vec!["INTEGER", "STRING"]);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[1][1], json!("grace"));
    }

    #[tokio::test]
    async fn test_select_with_schema_requires_schema() {
        let warehouse = Arc::new(InMemoryWarehouse::new());
        warehouse.script_query(
            "SELECT 1",
            QueryRows {
                schema: None,
                rows: vec![vec![json!(1)]],
            },
        );

        let err = executor(&warehouse)
            .select_with_schema(&Query::new("SELECT 1"))
            .await
            .unwrap_err();
        assert_eq!(err, QueryError::MissingSchema);

        let rows = executor(&warehouse)
            .select(&Query::new("SELECT 1"))
            .await
            .unwrap();
        assert_eq!(rows, vec![vec![json!(1)]]);
    }

    #[tokio::test]
    async fn test_ping() {
        let warehouse = Arc::new(InMemoryWarehouse::new());
        executor(&warehouse).ping().await.unwrap();
        assert_eq!(warehouse.executed_queries(), vec!["SELECT 1".to_string()]);

        warehouse.fail_on(
            Operation::RunQuery,
            WarehouseError::Transport("connection refused".to_string()),
        );
        let err = executor(&warehouse).ping().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to run test query on memory connection: transport error: connection refused"
        );
    }
}
