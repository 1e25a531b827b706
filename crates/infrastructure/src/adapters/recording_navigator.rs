//! Navigator adapter for hosts without a router.

use std::sync::{Mutex, PoisonError};

use tenant_auth_application::Navigator;
use tracing::info;

/// Navigator that remembers every route it was sent to.
///
/// Hosts without a client-side router (terminal, tests) read the history
/// to decide what to show next.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Creates a navigator with an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes navigated to, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent route, if any.
    #[must_use]
    pub fn current_route(&self) -> Option<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&self, route: &str) {
        info!(route, "navigating");
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route.to_string());
    }
}
