//! Bounded task shutdown

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Join tasks that have already been asked to stop
///
/// All handles share one deadline. Tasks still running when it passes are
/// aborted, so the wait never exceeds `timeout`.
pub(crate) async fn join_bounded(component: &'static str, handles: Vec<JoinHandle<()>>, timeout: Duration) {
    let deadline = Instant::now() + timeout;

    for mut handle in handles {
        match tokio::time::timeout_at(deadline, &mut handle).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) if e.is_cancelled() => {}
            Ok(Err(e)) => {
                tracing::error!(component, error = %e, "Task panicked during shutdown");
            }
            Err(_) => {
                tracing::warn!(
                    component,
                    timeout_ms = timeout.as_millis() as u64,
                    "Task did not stop in time, aborting"
                );
                handle.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_join_finished_tasks() {
        let handles = vec![tokio::spawn(async {}), tokio::spawn(async {})];
        join_bounded("test", handles, Duration::from_secs(1)).await;
    }

    #[tokio::test]
    async fn test_stuck_task_is_aborted() {
        let stuck = tokio::spawn(std::future::pending::<()>());
        let started = std::time::Instant::now();

        join_bounded("test", vec![stuck], Duration::from_millis(50)).await;

        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
