//! Application layer for seedline.
//!
//! Wires the session, request chain and feature services into the pieces a
//! front end drives: navigation, notifications, polled list views and the
//! login flow.

pub mod app;
pub mod auth_usecase;
pub mod guard;
pub mod notifications;
pub mod polling;
pub mod router;
pub mod views;

pub use app::ClientApp;
pub use auth_usecase::AuthUseCase;
pub use guard::RouteGuard;
pub use notifications::{NotificationQueue, ShownNotification};
pub use polling::{ActivityToken, PollingController, RefreshSchedule};
pub use router::Router;
pub use views::{ListSource, ListState, ListView, MyFilesView, NodesView, SharedFilesView};
