use tracing::{debug, info};

use crate::auth::SessionContext;
use crate::models::session::Route;
use crate::router::Navigator;

/// Outcome of a guarded navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Navigation denied; the guard has already navigated to this route
    Redirect(Route),
}

/// Access guard attached to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteGuard {
    /// Only signed-in users may enter; others are sent to the login page
    Protected,
    /// Only signed-out users may enter; others are sent to the flight form
    Login,
}

impl RouteGuard {
    pub fn for_route(route: Route) -> Self {
        match route {
            Route::Login => RouteGuard::Login,
            Route::FlightForm => RouteGuard::Protected,
        }
    }

    /// Decision for a resolved authentication status
    pub fn decide(&self, authenticated: bool) -> GuardDecision {
        match (self, authenticated) {
            (RouteGuard::Protected, true) | (RouteGuard::Login, false) => GuardDecision::Allow,
            (RouteGuard::Protected, false) => GuardDecision::Redirect(Route::Login),
            (RouteGuard::Login, true) => GuardDecision::Redirect(Route::FlightForm),
        }
    }

    /// Decide whether a navigation may proceed.
    ///
    /// Suspends until the first resolved auth-state notification and decides
    /// exactly once from it; later changes do not affect this attempt. When
    /// navigation is denied the guard redirects through `navigator`.
    pub async fn can_activate(
        &self,
        session: &SessionContext,
        navigator: &dyn Navigator,
    ) -> GuardDecision {
        let state = session.first_resolved_state().await;
        let decision = self.decide(state.is_authenticated());

        match decision {
            GuardDecision::Allow => debug!("{:?} guard allowed navigation", self),
            GuardDecision::Redirect(route) => {
                info!("{:?} guard denied navigation, redirecting to {}", self, route);
                navigator.navigate(route);
            }
        }

        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client_mock::{test_user, FakeIdentityProvider};
    use crate::models::session::AuthState;
    use crate::router::{MockNavigator, PageRouter};
    use mockall::predicate::eq;
    use std::sync::Arc;

    fn session_with(state: AuthState) -> (SessionContext, Arc<FakeIdentityProvider>) {
        let provider = Arc::new(FakeIdentityProvider::with_state(state));
        (SessionContext::new(provider.clone()), provider)
    }

    #[test]
    fn test_decision_matrix() {
        assert_eq!(RouteGuard::Protected.decide(true), GuardDecision::Allow);
        assert_eq!(
            RouteGuard::Protected.decide(false),
            GuardDecision::Redirect(Route::Login)
        );
        assert_eq!(
            RouteGuard::Login.decide(true),
            GuardDecision::Redirect(Route::FlightForm)
        );
        assert_eq!(RouteGuard::Login.decide(false), GuardDecision::Allow);
        assert_eq!(RouteGuard::for_route(Route::FlightForm), RouteGuard::Protected);
    }

    #[tokio::test]
    async fn test_authenticated_session() {
        let (session, _) = session_with(AuthState::Authenticated(test_user("ada@example.com")));

        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().times(0);
        assert_eq!(
            RouteGuard::Protected.can_activate(&session, &navigator).await,
            GuardDecision::Allow
        );

        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .with(eq(Route::FlightForm))
            .times(1)
            .return_const(());
        assert_eq!(
            RouteGuard::Login.can_activate(&session, &navigator).await,
            GuardDecision::Redirect(Route::FlightForm)
        );
    }

    #[tokio::test]
    async fn test_unauthenticated_session() {
        let (session, _) = session_with(AuthState::Unauthenticated);
        let router = PageRouter::new();

        assert_eq!(
            RouteGuard::Login.can_activate(&session, &router).await,
            GuardDecision::Allow
        );
        assert_eq!(router.current_route(), None);

        assert_eq!(
            RouteGuard::Protected.can_activate(&session, &router).await,
            GuardDecision::Redirect(Route::Login)
        );
        assert_eq!(router.current_route(), Some(Route::Login));
    }

    #[tokio::test]
    async fn test_waits_for_first_notification() {
        let (session, provider) = session_with(AuthState::Pending);
        let router = Arc::new(PageRouter::new());

        let guard_router = router.clone();
        let attempt = tokio::spawn(async move {
            RouteGuard::Protected
                .can_activate(&session, guard_router.as_ref())
                .await
        });

        tokio::task::yield_now().await;
        assert!(!attempt.is_finished());

        provider.set_state(AuthState::Authenticated(test_user("ada@example.com")));
        assert_eq!(attempt.await.unwrap(), GuardDecision::Allow);
        assert_eq!(router.current_route(), None);
    }

    #[tokio::test]
    async fn test_decides_once_per_attempt() {
        let (session, provider) = session_with(AuthState::Unauthenticated);
        let router = PageRouter::new();

        let decision = RouteGuard::Protected.can_activate(&session, &router).await;
        provider.set_state(AuthState::Authenticated(test_user("ada@example.com")));

        assert_eq!(decision, GuardDecision::Redirect(Route::Login));
        assert_eq!(router.current_route(), Some(Route::Login));
    }
}
