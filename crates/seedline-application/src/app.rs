//! Composition root.
//!
//! Wires store → session → router → transport → interceptor → gateway →
//! services → views, and maps routes onto the views they show. Every route
//! change, including redirects made by the interceptor or the auth flow,
//! re-syncs which views are polling.

use crate::auth_usecase::AuthUseCase;
use crate::notifications::NotificationQueue;
use crate::polling::RefreshSchedule;
use crate::router::Router;
use crate::views::{MyFilesView, NodesView, SharedFilesView};
use seedline_core::config::ClientConfig;
use seedline_core::{CredentialStore, Navigator, Result, Route, SessionContext};
use seedline_infrastructure::{ConfigStorage, FileCredentialStore, SeedlinePaths};
use seedline_interaction::{
    ApiGateway, AuthInterceptor, AuthRequestService, FileRequestService, MessagingService,
    NodeRequestService, RequestHandler, ReqwestTransport,
};
use std::path::Path;
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// The routed list views.
struct Views {
    shared_files: SharedFilesView,
    my_files: MyFilesView,
    nodes: NodesView,
}

impl Views {
    /// Activates the view shown on `current` and deactivates the others.
    fn sync(&self, current: Route) {
        for (route, active) in [
            (Route::SharedFiles, self.shared_files.list().is_active()),
            (Route::MyFiles, self.my_files.list().is_active()),
            (Route::Nodes, self.nodes.list().is_active()),
        ] {
            match (route == current, active) {
                (true, false) => self.activate(route),
                (false, true) => self.deactivate(route),
                _ => {}
            }
        }
    }

    fn activate(&self, route: Route) {
        match route {
            Route::SharedFiles => {
                self.shared_files.list().activate();
            }
            Route::MyFiles => {
                self.my_files.list().activate();
            }
            Route::Nodes => {
                self.nodes.list().activate();
            }
            Route::Login | Route::Dashboard => {}
        }
    }

    fn deactivate(&self, route: Route) {
        match route {
            Route::SharedFiles => self.shared_files.list().deactivate(),
            Route::MyFiles => self.my_files.list().deactivate(),
            Route::Nodes => self.nodes.list().deactivate(),
            Route::Login | Route::Dashboard => {}
        }
    }

    fn deactivate_all(&self) {
        self.shared_files.list().deactivate();
        self.my_files.list().deactivate();
        self.nodes.list().deactivate();
    }
}

pub struct ClientApp {
    config: ClientConfig,
    session: SessionContext,
    router: Arc<Router>,
    notifications: NotificationQueue,
    gateway: Arc<ApiGateway>,
    messaging: Option<MessagingService>,
    auth: AuthUseCase,
    views: Arc<Views>,
    follower: Mutex<Option<JoinHandle<()>>>,
}

impl ClientApp {
    /// Builds the app from the files under `config_dir` (or the platform
    /// default), with `SEEDLINE_*` environment overrides applied.
    pub fn from_config_dir(config_dir: Option<&Path>) -> Result<Self> {
        let paths = SeedlinePaths::new(config_dir);
        let config_file = paths
            .config_file()
            .map_err(|e| seedline_core::SeedlineError::config(e.to_string()))?;
        let session_file = paths
            .session_file()
            .map_err(|e| seedline_core::SeedlineError::config(e.to_string()))?;

        let config = ConfigStorage::with_path(config_file).load_with_env()?;
        let store = Arc::new(FileCredentialStore::with_path(session_file));
        Self::bootstrap(config, store)
    }

    /// Builds the app talking to the real backend over HTTP.
    pub fn bootstrap(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let transport = ReqwestTransport::new(config.request_timeout())?;
        Self::with_transport(config, store, Arc::new(transport))
    }

    /// Builds the app on top of an arbitrary terminal handler.
    pub fn with_transport(
        config: ClientConfig,
        store: Arc<dyn CredentialStore>,
        transport: Arc<dyn RequestHandler>,
    ) -> Result<Self> {
        let (session, writer) = SessionContext::open(store)?;
        let initial = if session.is_authenticated() {
            Route::Dashboard
        } else {
            Route::Login
        };
        let router = Router::new(session.clone(), initial);

        let chain: Arc<dyn RequestHandler> = Arc::new(
            AuthInterceptor::new(transport, session.clone(), router.clone())
                .with_accept_language(&config.accept_language)?,
        );

        let base_url = config.resolve_base_url();
        tracing::info!("[ClientApp] Backend at {}", base_url);
        let gateway = Arc::new(ApiGateway::new(chain.clone(), base_url));

        let messaging = config.messaging.base_url.as_ref().map(|url| {
            MessagingService::new(chain.clone(), url.clone(), config.messaging.access_token.clone())
        });

        let notifications = NotificationQueue::new();
        let files = FileRequestService::new(gateway.clone());
        let views = &config.views;

        let shared_files = SharedFilesView::new(
            files.clone(),
            notifications.clone(),
            RefreshSchedule::from_secs(views.catalog_poll_secs),
        );
        let my_files = MyFilesView::new(
            files,
            notifications.clone(),
            RefreshSchedule::from_secs(views.my_files_poll_secs),
        );
        let nodes = NodesView::new(
            NodeRequestService::new(gateway.clone()),
            RefreshSchedule::from_secs(views.nodes_poll_secs),
        );

        let auth = AuthUseCase::new(
            AuthRequestService::new(gateway.clone()),
            writer,
            router.clone(),
            notifications.clone(),
            config.login_variant,
        );

        let views = Arc::new(Views {
            shared_files,
            my_files,
            nodes,
        });
        let follower = follow_routes(router.subscribe(), Arc::downgrade(&views));

        Ok(Self {
            config,
            session,
            router,
            notifications,
            gateway,
            messaging,
            auth,
            views,
            follower: Mutex::new(follower),
        })
    }

    /// Navigates to `route` through the guard and activates its view.
    ///
    /// Views that are not shown on the resulting route are deactivated.
    pub fn enter(&self, route: Route) -> bool {
        let allowed = self.router.enter(route);
        self.sync_views();
        allowed
    }

    /// Aligns view activity with the router's current route.
    pub fn sync_views(&self) {
        self.views.sync(self.router.current());
    }

    /// Stops following the router and every polling schedule.
    pub fn shutdown(&self) {
        let follower = self
            .follower
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(task) = follower {
            task.abort();
        }
        self.views.deactivate_all();
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn gateway(&self) -> &Arc<ApiGateway> {
        &self.gateway
    }

    pub fn messaging(&self) -> Option<&MessagingService> {
        self.messaging.as_ref()
    }

    pub fn auth(&self) -> &AuthUseCase {
        &self.auth
    }

    pub fn shared_files(&self) -> &SharedFilesView {
        &self.views.shared_files
    }

    pub fn my_files(&self) -> &MyFilesView {
        &self.views.my_files
    }

    pub fn nodes(&self) -> &NodesView {
        &self.views.nodes
    }
}

impl Drop for ClientApp {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Re-syncs views on every published route until the app is dropped.
///
/// Outside a Tokio runtime nothing is spawned and only [`ClientApp::enter`]
/// syncs views.
fn follow_routes(mut routes: watch::Receiver<Route>, views: Weak<Views>) -> Option<JoinHandle<()>> {
    let handle = match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle,
        Err(_) => {
            tracing::warn!("[ClientApp] No runtime, views follow explicit enter() only");
            return None;
        }
    };

    Some(handle.spawn(async move {
        while routes.changed().await.is_ok() {
            let current = *routes.borrow_and_update();
            let Some(views) = views.upgrade() else {
                break;
            };
            views.sync(current);
        }
        tracing::trace!("[ClientApp] Route follower ended");
    }))
}
