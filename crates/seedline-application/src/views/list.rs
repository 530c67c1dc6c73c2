use crate::polling::{ActivityToken, PollingController, RefreshSchedule};
use async_trait::async_trait;
use seedline_core::ApiOutcome;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Where a list view gets its items from.
#[async_trait]
pub trait ListSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn fetch(&self) -> ApiOutcome<Vec<Self::Item>>;
}

/// What the view currently displays.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    /// Description of the last failed fetch, cleared by the next success.
    pub last_error: Option<String>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            last_error: None,
        }
    }
}

/// A list kept in sync with the backend by a [`PollingController`].
///
/// Failed fetches leave `items` as they were. Among applied results the last
/// one to finish wins.
pub struct ListView<S: ListSource> {
    source: Arc<S>,
    state: Arc<RwLock<ListState<S::Item>>>,
    poller: PollingController,
}

impl<S: ListSource> ListView<S> {
    pub fn new(source: S, schedule: RefreshSchedule) -> Self {
        let source = Arc::new(source);
        let state = Arc::new(RwLock::new(ListState::default()));

        let poller = {
            let source = source.clone();
            let state = state.clone();
            PollingController::new(source.name(), schedule, move |token| {
                let source = source.clone();
                let state = state.clone();
                async move { refresh_into(source.as_ref(), &state, &token).await }
            })
        };

        Self {
            source,
            state,
            poller,
        }
    }

    /// Shows the view: starts fetching per its schedule.
    pub fn activate(&self) -> ActivityToken {
        self.poller.activate()
    }

    /// Hides the view: stops the schedule and discards in-flight results.
    pub fn deactivate(&self) {
        self.poller.deactivate();
    }

    pub fn is_active(&self) -> bool {
        self.poller.is_active()
    }

    pub fn schedule(&self) -> RefreshSchedule {
        self.poller.schedule()
    }

    /// Token of the current activation, or a detached one when the view is
    /// not shown.
    pub fn activity(&self) -> ActivityToken {
        self.poller.token().unwrap_or_else(ActivityToken::detached)
    }

    /// Fetches once right now, outside the schedule.
    pub async fn refresh(&self) {
        self.refresh_with(&self.activity()).await;
    }

    /// Fetches once, applying the result only while `token` is active.
    pub async fn refresh_with(&self, token: &ActivityToken) {
        refresh_into(self.source.as_ref(), &self.state, token).await;
    }

    pub async fn items(&self) -> Vec<S::Item> {
        self.state.read().await.items.clone()
    }

    pub async fn state(&self) -> ListState<S::Item> {
        self.state.read().await.clone()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

async fn refresh_into<S: ListSource>(
    source: &S,
    state: &RwLock<ListState<S::Item>>,
    token: &ActivityToken,
) {
    if !token.is_active() {
        return;
    }
    state.write().await.loading = true;

    let outcome = source.fetch().await;

    let mut state = state.write().await;
    state.loading = false;
    if !token.is_active() {
        tracing::debug!("[ListView] {} inactive, discarding result", source.name());
        return;
    }

    match outcome.into_result() {
        Ok(items) => {
            tracing::trace!("[ListView] {} loaded {} items", source.name(), items.len());
            state.items = items;
            state.last_error = None;
        }
        Err(e) => {
            tracing::debug!("[ListView] {} refresh failed: {}", source.name(), e);
            state.last_error = Some(e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedline_core::SeedlineError;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    struct Scripted {
        outcomes: Mutex<VecDeque<ApiOutcome<Vec<u32>>>>,
    }

    impl Scripted {
        fn new(outcomes: Vec<ApiOutcome<Vec<u32>>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
            }
        }
    }

    #[async_trait]
    impl ListSource for Scripted {
        type Item = u32;

        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn fetch(&self) -> ApiOutcome<Vec<u32>> {
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| SeedlineError::transport("script exhausted").into())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_previous_items() {
        let view = ListView::new(
            Scripted::new(vec![
                ApiOutcome::Ok(vec![1, 2]),
                ApiOutcome::HttpError {
                    status: 500,
                    body: serde_json::Value::Null,
                },
                ApiOutcome::Malformed("missing items".to_string()),
            ]),
            RefreshSchedule::Every(Duration::from_secs(5)),
        );

        view.activate();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(view.items().await, vec![1, 2]);

        tokio::time::sleep(Duration::from_secs(10)).await;
        let state = view.state().await;
        assert_eq!(state.items, vec![1, 2]);
        assert!(!state.loading);
        assert!(state.last_error.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_applies_without_activation() {
        let view = ListView::new(
            Scripted::new(vec![ApiOutcome::Ok(vec![7])]),
            RefreshSchedule::Once,
        );
        assert!(!view.is_active());

        view.refresh().await;
        assert_eq!(view.items().await, vec![7]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deactivated_view_stays_unchanged() {
        let view = ListView::new(
            Scripted::new(vec![ApiOutcome::Ok(vec![1])]),
            RefreshSchedule::Every(Duration::from_secs(5)),
        );
        view.activate();
        view.deactivate();

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert!(view.items().await.is_empty());
        assert!(!view.state().await.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_with_cleared_token_is_discarded() {
        let view = ListView::new(
            Scripted::new(vec![ApiOutcome::Ok(vec![1]), ApiOutcome::Ok(vec![2])]),
            RefreshSchedule::Once,
        );
        view.activate();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(view.items().await, vec![1]);

        let token = view.activity();
        assert!(token.is_active());
        view.deactivate();

        view.refresh_with(&token).await;
        assert_eq!(view.items().await, vec![1]);

        // Not shown any more, so a plain refresh uses a detached token
        view.refresh().await;
        assert_eq!(view.items().await, vec![2]);
    }
}
