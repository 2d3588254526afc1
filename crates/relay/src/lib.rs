//! Core relay domain for the workflow monitor.
//!
//! This crate decides which pipeline lifecycle notifications reach the
//! backend status tracker, what they look like when they get there, and which
//! failures are severe enough to stop the process. Infrastructure crates
//! implement the [`StatusNotifier`] port defined here; they never add relay
//! rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | `RunName`, `CallbackToken` |
//! | [`namespace`] | Deployment namespace selection |
//! | [`events`] | Lifecycle event kinds and the message filter |
//! | [`config`] | Immutable process configuration and URL construction |
//! | [`dispatcher`] | `Dispatcher` and the `StatusNotifier` port |
//! | [`errors`] | `RelayError` and its `Severity` |

pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod events;
pub mod identifiers;
pub mod namespace;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{RelayConfig, DEFAULT_BACKEND_DOMAIN};
pub use dispatcher::{
    Dispatched, Dispatcher, NotifyError, StatusNotifier, StatusRequest, CONTENT_TYPE_JSON,
};
pub use errors::{RelayError, Severity, RUN_NAME_EXAMPLE};
pub use events::{filter_message, FilteredEvent, LifecycleEvent, TraceSummary};
pub use identifiers::{CallbackToken, RunName, WORKFLOW_ID_MARKER};
pub use namespace::Namespace;
