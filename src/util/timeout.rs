//! Timeout and cancellation helpers.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::CallbackError;

/// Wrap a future with an optional timeout.
pub async fn with_timeout<T>(
    duration: Option<Duration>,
    future: impl Future<Output = Result<T, CallbackError>>,
) -> Result<T, CallbackError> {
    let Some(duration) = duration else {
        return future.await;
    };
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(CallbackError::Timeout(saturating_millis(duration))),
    }
}

fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Race a future against a cancellation token.
pub async fn with_cancellation<T>(
    cancel: Option<&CancellationToken>,
    future: impl Future<Output = Result<T, CallbackError>>,
) -> Result<T, CallbackError> {
    let Some(cancel) = cancel else {
        return future.await;
    };
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(CallbackError::Cancelled),
        result = future => result,
    }
}
