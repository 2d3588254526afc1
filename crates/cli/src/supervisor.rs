//! Top-level supervision of the event listener.
//!
//! The listener never terminates the process itself. It forwards fatal relay
//! errors over a channel; the supervisor reports them at critical severity and
//! tells `main` to exit with a failure status.

use std::future::Future;

use anyhow::Context;
use listener::EventListener;
use relay::{RelayError, StatusNotifier, RUN_NAME_EXAMPLE};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Why the listener stopped.
#[derive(Debug)]
pub enum Termination {
    /// The shutdown signal fired and in-flight requests drained.
    Shutdown,
    /// A fatal relay error was escalated.
    Fatal(RelayError),
}

/// Runs `listener` on `tcp` until `shutdown` resolves or a fatal error arrives
/// on `fatal_rx`.
///
/// On a fatal error the server task is aborted without draining, so the
/// request that triggered it is never answered.
pub async fn supervise<N, F>(
    listener: EventListener<N>,
    tcp: TcpListener,
    mut fatal_rx: mpsc::Receiver<RelayError>,
    shutdown: F,
) -> anyhow::Result<Termination>
where
    N: StatusNotifier + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let mut server = tokio::spawn(listener.serve(tcp, shutdown));

    tokio::select! {
        Some(err) = fatal_rx.recv() => {
            server.abort();
            Ok(Termination::Fatal(err))
        }
        joined = &mut server => {
            joined
                .context("event listener task panicked")?
                .context("event listener failed")?;
            Ok(Termination::Shutdown)
        }
    }
}

/// Logs a fatal relay error at critical severity.
pub fn report_fatal(err: &RelayError) {
    match err {
        RelayError::InvalidRunName { run_name } => {
            tracing::error!(severity = "critical", %run_name, "Invalid workflow ID: {run_name}");
            tracing::error!(
                severity = "critical",
                "Workflow ID must be in the format: {RUN_NAME_EXAMPLE}"
            );
        }
        RelayError::BackendRejected { .. } | RelayError::BackendUnreachable { .. } => {
            tracing::error!(severity = "critical", error = %err, "Backend notification failed, bailing out");
        }
        _ => {
            tracing::error!(severity = "critical", error = %err, "Fatal relay error, bailing out");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use relay::{CallbackToken, Dispatcher, Namespace, NotifyError, RelayConfig, StatusRequest};
    use tokio::sync::oneshot;

    use super::*;

    struct FixedStatus(u16);

    #[async_trait]
    impl StatusNotifier for FixedStatus {
        async fn post_status(&self, _request: &StatusRequest) -> Result<u16, NotifyError> {
            Ok(self.0)
        }
    }

    async fn start(
        status: u16,
    ) -> (
        std::net::SocketAddr,
        oneshot::Sender<()>,
        tokio::task::JoinHandle<anyhow::Result<Termination>>,
    ) {
        let config = RelayConfig::new(Namespace::Dev, CallbackToken::new("token").unwrap());
        let (fatal_tx, fatal_rx) = mpsc::channel(1);
        let listener = EventListener::new(Dispatcher::new(config, Arc::new(FixedStatus(status))), fatal_tx);
        let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = tcp.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let supervisor = tokio::spawn(supervise(listener, tcp, fatal_rx, async {
            let _ = shutdown_rx.await;
        }));
        (addr, shutdown_tx, supervisor)
    }

    #[tokio::test]
    async fn backend_failure_terminates_without_answering() {
        let (addr, _shutdown_tx, supervisor) = start(500).await;

        let request = tokio::spawn(
            reqwest::Client::new()
                .post(format!("http://{addr}/"))
                .body(r#"{"event":"started","runName":"INTP00000000408","utcTime":"2024-01-01T00:00:00Z"}"#)
                .send(),
        );

        assert!(matches!(
            supervisor.await.unwrap().unwrap(),
            Termination::Fatal(RelayError::BackendRejected { status: 500, .. })
        ));
        assert!(!request.is_finished());
        request.abort();
    }

    #[tokio::test]
    async fn shutdown_signal_stops_cleanly() {
        let (addr, shutdown_tx, supervisor) = start(200).await;

        let response = reqwest::Client::new()
            .post(format!("http://{addr}/"))
            .body(r#"{"event":"process_submitted"}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        drop(response);

        shutdown_tx.send(()).unwrap();
        assert!(matches!(supervisor.await.unwrap().unwrap(), Termination::Shutdown));
    }
}
