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

use thiserror::Error;

use crate::warehouse::WarehouseError;

/// Errors returned by the query facade.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error(transparent)]
    Warehouse(#[from] WarehouseError),

    #[error("schema information is not available")]
    MissingSchema,

    #[error("failed to run test query on {backend} connection: {source}")]
    Ping {
        backend: String,
        source: WarehouseError,
    },
}

/// Result type for query operations
pub type QueryExecResult<T> = Result<T, QueryError>;
