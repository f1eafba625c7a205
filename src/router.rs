//! Page routing for the single page session.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::info;

use crate::models::session::Route;

/// Navigation collaborator used by guards and pages to move between routes.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
    fn current_route(&self) -> Option<Route>;
}

/// In-memory router tracking which page the session is on.
#[derive(Debug, Default)]
pub struct PageRouter {
    current: Mutex<Option<Route>>,
}

impl PageRouter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Navigator for PageRouter {
    fn navigate(&self, route: Route) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != Some(route) {
            info!("Navigating to {}", route);
        }
        *current = Some(route);
    }

    fn current_route(&self) -> Option<Route> {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Navigate to `route` once `delay` has elapsed.
pub fn navigate_after(navigator: Arc<dyn Navigator>, route: Route, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        navigator.navigate(route);
    });
}
