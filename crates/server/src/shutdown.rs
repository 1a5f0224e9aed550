use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::sync::oneshot;

/// How the serve loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeExit {
    /// The server future finished before any shutdown signal.
    Stopped,
    /// A shutdown signal arrived and in-flight requests drained in time.
    Drained,
    /// A shutdown signal arrived and the grace window elapsed first.
    TimedOut,
}

/// Runs the server built by `serve` until it exits on its own or `shutdown`
/// resolves. On shutdown the server gets a stop signal and `grace` to drain.
///
/// A server error is returned as soon as it happens, without waiting for
/// a signal.
pub async fn serve_until<S, F>(
    serve: impl FnOnce(oneshot::Receiver<()>) -> S,
    shutdown: F,
    grace: Duration,
) -> anyhow::Result<ServeExit>
where
    S: Future<Output = io::Result<()>> + Send + 'static,
    F: Future<Output = anyhow::Result<()>>,
{
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(serve(stop_rx));

    tokio::select! {
        joined = &mut server => {
            joined??;
            tracing::warn!(
                event_name = "system.server.exited",
                correlation_id = "shutdown",
                "ronja-server stopped without a shutdown signal"
            );
            return Ok(ServeExit::Stopped);
        }
        signal = shutdown => signal?,
    }

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "ronja-server draining in-flight requests"
    );
    let _ = stop_tx.send(());

    match tokio::time::timeout(grace, server).await {
        Ok(joined) => {
            joined??;
            Ok(ServeExit::Drained)
        }
        Err(_) => {
            tracing::warn!(
                event_name = "system.server.shutdown_timeout",
                correlation_id = "shutdown",
                grace_secs = grace.as_secs(),
                "graceful shutdown window elapsed; exiting"
            );
            Ok(ServeExit::TimedOut)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::pending;
    use std::io;
    use std::time::Duration;

    use super::{serve_until, ServeExit};

    const GRACE: Duration = Duration::from_millis(200);

    #[tokio::test]
    async fn server_error_surfaces_without_waiting_for_signal() {
        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            serve_until(
                |_stop| async { Err(io::Error::new(io::ErrorKind::AddrInUse, "listener failed")) },
                pending::<anyhow::Result<()>>(),
                GRACE,
            ),
        )
        .await
        .expect("serve_until should not wait for a signal");

        let error = outcome.expect_err("server error");
        assert!(error.to_string().contains("listener failed"));
    }

    #[tokio::test]
    async fn signal_stops_server_and_drains() {
        let outcome = serve_until(
            |stop| async move {
                let _ = stop.await;
                Ok(())
            },
            async { Ok(()) },
            GRACE,
        )
        .await
        .expect("clean shutdown");

        assert_eq!(outcome, ServeExit::Drained);
    }

    #[tokio::test]
    async fn stuck_server_is_abandoned_after_grace() {
        let outcome = serve_until(|_stop| pending::<io::Result<()>>(), async { Ok(()) }, GRACE)
            .await
            .expect("timed out shutdown");

        assert_eq!(outcome, ServeExit::TimedOut);
    }

    #[tokio::test]
    async fn server_finishing_early_is_reported() {
        let outcome =
            serve_until(|_stop| async { Ok(()) }, pending::<anyhow::Result<()>>(), GRACE)
                .await
                .expect("early stop");

        assert_eq!(outcome, ServeExit::Stopped);
    }
}
