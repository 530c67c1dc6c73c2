//! Navigation gate for protected routes.

use seedline_core::{Navigator, Route, SessionContext};
use std::sync::Arc;

/// Allows entry only while a credential is present.
///
/// Validity is presence: there is no expiry or server-side check here. A
/// revoked credential is caught later by the interceptor's 401 handling.
pub struct RouteGuard {
    session: SessionContext,
    navigator: Arc<dyn Navigator>,
}

impl RouteGuard {
    pub fn new(session: SessionContext, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    /// Returns `true` when a credential is stored; otherwise redirects to
    /// login and returns `false`.
    pub fn can_activate(&self, route: Route) -> bool {
        if self.session.is_authenticated() {
            return true;
        }
        tracing::info!("[Guard] No session, refusing {}", route.path());
        self.navigator.navigate(Route::Login);
        false
    }

    /// Same decision for child routes.
    pub fn can_activate_child(&self, route: Route) -> bool {
        self.can_activate(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedline_core::session::InMemoryCredentialStore;
    use seedline_interaction::testing::RecordingNavigator;

    #[test]
    fn test_refuses_and_redirects_without_credential() {
        let (session, _writer) =
            SessionContext::open(Arc::new(InMemoryCredentialStore::new())).unwrap();
        let navigator = Arc::new(RecordingNavigator::default());
        let guard = RouteGuard::new(session, navigator.clone());

        assert!(!guard.can_activate(Route::MyFiles));
        assert!(!guard.can_activate_child(Route::SharedFiles));
        assert_eq!(navigator.history(), vec![Route::Login, Route::Login]);
    }

    #[test]
    fn test_allows_with_credential_and_does_not_navigate() {
        let (session, _writer) =
            SessionContext::open(Arc::new(InMemoryCredentialStore::with_token("t"))).unwrap();
        let navigator = Arc::new(RecordingNavigator::default());
        let guard = RouteGuard::new(session, navigator.clone());

        assert!(guard.can_activate(Route::MyFiles));
        assert!(guard.can_activate_child(Route::Nodes));
        assert!(navigator.history().is_empty());
    }

    #[test]
    fn test_follows_session_changes() {
        let (session, writer) =
            SessionContext::open(Arc::new(InMemoryCredentialStore::new())).unwrap();
        let guard = RouteGuard::new(session, Arc::new(RecordingNavigator::default()));

        assert!(!guard.can_activate(Route::Dashboard));
        writer.sign_in("t", None, None).unwrap();
        assert!(guard.can_activate(Route::Dashboard));
        writer.sign_out().unwrap();
        assert!(!guard.can_activate(Route::Dashboard));
    }
}
