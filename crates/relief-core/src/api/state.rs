//! Application state for the relief REST API.
//!
//! The coordinator is built once at startup and only read afterwards, so the
//! state needs no locking.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::ReliefCoordinator;

/// Shared application state for the API.
///
/// Cloned for each request handler; clones share one coordinator.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (not cloned, shared via Arc).
struct AppStateInner {
    coordinator: ReliefCoordinator,
    started_at: DateTime<Utc>,
}

impl AppState {
    /// Wrap a fully loaded coordinator.
    pub fn new(coordinator: ReliefCoordinator) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                coordinator,
                started_at: Utc::now(),
            }),
        }
    }

    /// The relief coordinator.
    pub fn coordinator(&self) -> &ReliefCoordinator {
        &self.inner.coordinator
    }

    /// When the service started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.inner.started_at
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ReliefCoordinator::builtin())
    }
}
