//! Current-route state.

use crate::guard::RouteGuard;
use seedline_core::{Navigator, Route, SessionContext};
use std::sync::Arc;
use tokio::sync::watch;

/// Owns the active route and publishes every change.
pub struct Router {
    tx: watch::Sender<Route>,
    session: SessionContext,
}

impl Router {
    pub fn new(session: SessionContext, initial: Route) -> Arc<Self> {
        let (tx, _rx) = watch::channel(initial);
        Arc::new(Self { tx, session })
    }

    /// Receiver notified whenever the route changes.
    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.tx.subscribe()
    }

    /// Enters `route`, consulting the guard for protected routes.
    ///
    /// Returns `false` when the guard refused; in that case the router is
    /// already on [`Route::Login`].
    pub fn enter(self: &Arc<Self>, route: Route) -> bool {
        if route.is_protected() {
            let guard = RouteGuard::new(self.session.clone(), self.clone());
            if !guard.can_activate(route) {
                return false;
            }
        }
        self.navigate(route);
        true
    }
}

impl Navigator for Router {
    fn navigate(&self, route: Route) {
        let previous = self.tx.send_replace(route);
        if previous != route {
            tracing::debug!("[Router] {} -> {}", previous.path(), route.path());
        }
    }

    fn current(&self) -> Route {
        *self.tx.borrow()
    }
}
