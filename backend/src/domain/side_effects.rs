//! Fire-and-forget work that must never fail the request that caused it.

use std::fmt::Display;
use std::future::Future;

use tracing::{debug, warn};

use crate::domain::TraceId;

/// Run `work` on a background task under the caller's trace identifier.
///
/// Failures are logged at `warn` and otherwise dropped.
pub(crate) fn spawn_best_effort<F, E>(action: &'static str, work: F)
where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let task = TraceId::propagate(async move {
        match work.await {
            Ok(()) => debug!(action, "side effect completed"),
            Err(error) => warn!(action, %error, "side effect failed"),
        }
    });
    drop(tokio::spawn(task));
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn failures_do_not_escape() {
        let (tx, rx) = oneshot::channel();
        spawn_best_effort("test", async move {
            let _ = tx.send(());
            Err::<(), _>("boom")
        });
        tokio::time::timeout(Duration::from_secs(1), rx)
            .await
            .expect("task ran")
            .expect("sender kept");
    }

    #[tokio::test]
    async fn work_sees_the_callers_trace() {
        let trace_id: TraceId = "00000000-0000-0000-0000-000000000001"
            .parse()
            .expect("valid UUID");
        let (tx, rx) = oneshot::channel();
        TraceId::scope(trace_id, async move {
            spawn_best_effort("trace", async move {
                let _ = tx.send(TraceId::current());
                Ok::<(), String>(())
            });
        })
        .await;
        let observed = tokio::time::timeout(Duration::from_secs(1), rx)
            .await
            .expect("task ran")
            .expect("sender kept");
        assert_eq!(observed, Some(trace_id));
    }
}
