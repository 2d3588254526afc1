//! Workflow monitor inbound event listener.
//!
//! Binds an HTTP server that accepts lifecycle notifications from the
//! upstream pipeline engine and feeds each one to the [`relay::Dispatcher`].
//!
//! ## Request handling
//!
//! | Outcome | Response |
//! |---------|----------|
//! | Body is not JSON | `400 Invalid JSON data.` |
//! | Event is malformed (recoverable) | `400 Invalid event data.` |
//! | Event forwarded or dropped | `200 JSON data received and processed.` |
//! | Fatal relay error | no response; the error is escalated to the supervisor |
//!
//! Requests are handled strictly one at a time, outbound call included. Any
//! path is accepted; only `POST` is routed.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Transport details and response mapping live here. The
//! [`relay`] crate sees only a parsed JSON value.

use std::future::Future;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use relay::{Dispatched, Dispatcher, RelayError, StatusNotifier};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};
use tracing::Instrument;
use uuid::Uuid;

/// Address the listener binds when none is configured.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

pub const ACCEPTED_BODY: &str = "JSON data received and processed.";
pub const INVALID_JSON_BODY: &str = "Invalid JSON data.";
pub const INVALID_EVENT_BODY: &str = "Invalid event data.";

struct ListenerState<N> {
    dispatcher: Dispatcher<N>,
    /// Held for the whole of one request so dispatches never overlap.
    serial: Mutex<()>,
    fatal_tx: mpsc::Sender<RelayError>,
}

/// HTTP front end for a [`Dispatcher`].
///
/// Fatal errors are sent on the channel given to [`EventListener::new`]. The
/// receiving end belongs to whoever decides the process's fate.
pub struct EventListener<N> {
    state: Arc<ListenerState<N>>,
}

impl<N> EventListener<N>
where
    N: StatusNotifier + 'static,
{
    pub fn new(dispatcher: Dispatcher<N>, fatal_tx: mpsc::Sender<RelayError>) -> Self {
        Self {
            state: Arc::new(ListenerState {
                dispatcher,
                serial: Mutex::new(()),
                fatal_tx,
            }),
        }
    }

    /// Builds the router accepting `POST` on every path.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", post(handle_event::<N>))
            .route("/*path", post(handle_event::<N>))
            .with_state(Arc::clone(&self.state))
    }

    /// Serves requests on `listener` until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(%addr, "Event listener accepting connections");
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
    }
}

async fn handle_event<N>(State(state): State<Arc<ListenerState<N>>>, body: Bytes) -> Response
where
    N: StatusNotifier + 'static,
{
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("inbound_event", %request_id, bytes = body.len());

    async move {
        let _serial = state.serial.lock().await;

        let message: Value = match serde_json::from_slice(&body) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(error = %err, "Rejecting request with invalid JSON body");
                return (StatusCode::BAD_REQUEST, INVALID_JSON_BODY).into_response();
            }
        };

        match state.dispatcher.dispatch(&message).await {
            Ok(Dispatched::Forwarded { run_name }) => {
                tracing::debug!(%run_name, "Event forwarded");
                (StatusCode::OK, ACCEPTED_BODY).into_response()
            }
            Ok(Dispatched::Dropped) => {
                tracing::debug!("Event dropped, nothing forwarded");
                (StatusCode::OK, ACCEPTED_BODY).into_response()
            }
            Err(err) if err.is_fatal() => escalate(&state.fatal_tx, err).await,
            Err(err) => {
                tracing::warn!(error = %err, "Rejecting malformed event");
                (StatusCode::BAD_REQUEST, INVALID_EVENT_BODY).into_response()
            }
        }
    }
    .instrument(span)
    .await
}

/// Hands a fatal error to the supervisor and never completes, so the
/// originating request is left unanswered while the process shuts down.
async fn escalate(fatal_tx: &mpsc::Sender<RelayError>, err: RelayError) -> Response {
    if let Err(mpsc::error::SendError(err)) = fatal_tx.send(err).await {
        tracing::error!(severity = "critical", error = %err, "No supervisor to escalate fatal error to");
    }
    std::future::pending().await
}
