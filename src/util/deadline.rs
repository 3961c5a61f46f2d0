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

use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::warehouse::{WarehouseError, WarehouseResult};

/// Run a warehouse call under an optional deadline.
///
/// Expiry drops the in-flight call and is reported as
/// [`WarehouseError::DeadlineExceeded`]. Nothing is retried here.
///
/// # Arguments
///
/// * `operation_name` - Name of the call, used in logs and in the deadline error
/// * `timeout` - Upper bound for the call, `None` to wait indefinitely
/// * `operation` - The call to run
pub async fn with_deadline<F, T>(
    operation_name: &str,
    timeout: Option<Duration>,
    operation: F,
) -> WarehouseResult<T>
where
    F: Future<Output = WarehouseResult<T>>,
{
    let start = Instant::now();
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, operation).await {
            Ok(result) => result,
            Err(_) => Err(WarehouseError::DeadlineExceeded {
                operation: operation_name.to_string(),
                millis: limit.as_millis(),
            }),
        },
        None => operation.await,
    };
    debug!(
        operation = operation_name,
        ok = result.is_ok(),
        took_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "warehouse call finished"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::log_capture::CapturedLogs;

    #[tokio::test]
    async fn test_without_timeout_passes_result_through() {
        let result = with_deadline("op", None, async { Ok::<_, WarehouseError>(42) }).await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test]
    async fn test_error_is_not_rewritten() {
        let result: WarehouseResult<()> = with_deadline(
            "op",
            Some(Duration::from_secs(5)),
            async { Err(WarehouseError::NotFound("t".to_string())) },
        )
        .await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_expired_deadline() {
        let result: WarehouseResult<()> =
            with_deadline("table_metadata", Some(Duration::from_millis(10)), async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;

        assert_eq!(
            result,
            Err(WarehouseError::DeadlineExceeded {
                operation: "table_metadata".to_string(),
                millis: 10,
            })
        );
    }

    #[tokio::test]
    async fn test_completion_is_logged_with_fields() {
        let (logs, _guard) = CapturedLogs::install();

        let _ = with_deadline("delete_table", None, async {
            Err::<(), _>(WarehouseError::NotFound("t".to_string()))
        })
        .await;

        let output = logs.contents();
        assert!(output.contains("warehouse call finished"), "{output}");
        assert!(output.contains("operation=\"delete_table\""), "{output}");
        assert!(output.contains("ok=false"), "{output}");
        assert!(output.contains("took_ms="), "{output}");
    }
}
