//! Client-side routes and the navigation seam.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Routes the client can be on.
///
/// Only [`Route::Login`] is public; every other route sits behind the route guard.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Route {
    /// Login entry point.
    Login,
    /// Landing dashboard.
    Dashboard,
    /// Files uploaded from this device ("my files").
    MyFiles,
    /// Shared file catalog of the whole swarm.
    SharedFiles,
    /// Connected distribution nodes.
    Nodes,
}

impl Route {
    /// URL-style path of the route.
    pub fn path(&self) -> String {
        format!("/{}", self.as_ref())
    }

    /// Whether entering this route requires a stored credential.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl Default for Route {
    fn default() -> Self {
        Route::Dashboard
    }
}

/// Global navigation state.
///
/// The request interceptor and the route guard only need to force the client
/// onto a route, so this trait is the whole contract between them and whatever
/// owns the current route.
pub trait Navigator: Send + Sync {
    /// Moves the client to `route` unconditionally.
    fn navigate(&self, route: Route);

    /// Returns the route the client is currently on.
    fn current(&self) -> Route;
}
