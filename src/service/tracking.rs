//! Best-effort side-effect boundary
//!
//! Peripheral instrumentation writes (attribution touches and the like) must
//! never abort the primary operation. Routing them through this helper keeps
//! the distinction from the eligibility log's strict guarantee explicit.

use std::fmt::Display;
use std::future::Future;

/// Await a side effect, log its failure at warn, and move on
pub async fn best_effort<T, E: Display>(op: &str, fut: impl Future<Output = Result<T, E>>) {
    if let Err(e) = fut.await {
        tracing::warn!(op = %op, error = %e, "Best-effort side effect failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failure_is_swallowed() {
        // Must not panic or propagate
        best_effort("noop", async { Err::<(), _>("boom") }).await;
    }

    #[tokio::test]
    async fn test_success_is_swallowed_too() {
        best_effort("noop", async { Ok::<_, String>(42) }).await;
    }
}
