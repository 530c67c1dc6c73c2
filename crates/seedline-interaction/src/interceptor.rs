//! Credential injection and uniform handling of rejected sessions.

use crate::handler::RequestHandler;
use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, AUTHORIZATION, HeaderValue};
use seedline_core::{
    ApiResponse, Navigator, OutboundRequest, Result, Route, SeedlineError, SessionContext,
};
use std::sync::Arc;

const DEFAULT_ACCEPT_LANGUAGE: &str = "vi";

/// Interceptor that attaches the session credential to every outbound call.
///
/// - Requests flagged `bypass_auth` are forwarded with the flag stripped and
///   without this client's credential.
/// - Otherwise, when a credential is present, the forwarded copy carries
///   exactly one `Authorization: Bearer <credential>` plus `Accept-Language`.
/// - A 401 from downstream navigates to the login route and is then returned
///   to the caller unchanged. The stored credential is left alone.
pub struct AuthInterceptor<H> {
    next: H,
    session: SessionContext,
    navigator: Arc<dyn Navigator>,
    accept_language: HeaderValue,
}

impl<H> AuthInterceptor<H>
where
    H: RequestHandler,
{
    pub fn new(next: H, session: SessionContext, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            next,
            session,
            navigator,
            accept_language: HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE),
        }
    }

    /// Overrides the `Accept-Language` sent alongside the credential.
    pub fn with_accept_language(mut self, language: &str) -> Result<Self> {
        self.accept_language = HeaderValue::from_str(language).map_err(|e| {
            SeedlineError::config(format!("invalid accept_language {:?}: {}", language, e))
        })?;
        Ok(self)
    }

    fn prepare(&self, request: &OutboundRequest) -> Result<OutboundRequest> {
        if request.is_bypass_auth() {
            tracing::trace!("[Interceptor] Bypassing auth for {}", request.url());
            return Ok(request.without_bypass());
        }

        let Some(credential) = self.session.credential() else {
            return Ok(request.clone());
        };

        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", credential))
            .map_err(|_| SeedlineError::invalid_request("stored credential is not a valid header value"))?;
        bearer.set_sensitive(true);

        Ok(request
            .with_header(AUTHORIZATION, bearer)
            .with_header(ACCEPT_LANGUAGE, self.accept_language.clone()))
    }
}

#[async_trait]
impl<H> RequestHandler for AuthInterceptor<H>
where
    H: RequestHandler,
{
    async fn handle(&self, request: OutboundRequest) -> Result<ApiResponse> {
        let prepared = self.prepare(&request)?;
        let result = self.next.handle(prepared).await;

        if let Err(e) = &result
            && e.is_unauthorized()
        {
            tracing::warn!(
                "[Interceptor] {} {} rejected with 401, redirecting to login",
                request.method(),
                request.url()
            );
            self.navigator.navigate(Route::Login);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingHandler, RecordingNavigator};
    use reqwest::Method;
    use seedline_core::session::InMemoryCredentialStore;
    use serde_json::json;

    fn session_with(token: Option<&str>) -> SessionContext {
        let store = match token {
            Some(t) => InMemoryCredentialStore::with_token(t),
            None => InMemoryCredentialStore::new(),
        };
        let (context, _writer) = SessionContext::open(Arc::new(store)).unwrap();
        context
    }

    #[tokio::test]
    async fn test_injects_single_bearer_header() {
        let handler = Arc::new(RecordingHandler::ok(json!({})));
        let navigator = Arc::new(RecordingNavigator::default());
        let interceptor =
            AuthInterceptor::new(handler.clone(), session_with(Some("abc")), navigator);

        let request = OutboundRequest::new(Method::GET, "http://h/api/v1/torrent/list")
            .try_header("Authorization", "Bearer stale")
            .unwrap();
        interceptor.handle(request.clone()).await.unwrap();

        let sent = handler.last().unwrap();
        let values: Vec<_> = sent.header_map().get_all(AUTHORIZATION).iter().collect();
        assert_eq!(values, vec!["Bearer abc"]);
        assert_eq!(sent.header_map().get(ACCEPT_LANGUAGE).unwrap(), "vi");
        // The caller's request is untouched
        assert_eq!(
            request.header_map().get(AUTHORIZATION).unwrap(),
            "Bearer stale"
        );
    }

    #[tokio::test]
    async fn test_no_credential_forwards_unmodified() {
        let handler = Arc::new(RecordingHandler::ok(json!({})));
        let interceptor = AuthInterceptor::new(
            handler.clone(),
            session_with(None),
            Arc::new(RecordingNavigator::default()),
        );

        interceptor
            .handle(OutboundRequest::new(Method::GET, "http://h/x"))
            .await
            .unwrap();

        let sent = handler.last().unwrap();
        assert!(sent.header_map().get(AUTHORIZATION).is_none());
        assert!(sent.header_map().get(ACCEPT_LANGUAGE).is_none());
    }

    #[tokio::test]
    async fn test_bypass_strips_marker_and_skips_credential() {
        let handler = Arc::new(RecordingHandler::ok(json!({})));
        let interceptor = AuthInterceptor::new(
            handler.clone(),
            session_with(Some("abc")),
            Arc::new(RecordingNavigator::default()),
        );

        let request = OutboundRequest::new(Method::GET, "https://third.party/v2.0/oa")
            .try_header("access_token", "zz")
            .unwrap()
            .bypass_auth();
        interceptor.handle(request).await.unwrap();

        let sent = handler.last().unwrap();
        assert!(!sent.is_bypass_auth());
        assert!(sent.header_map().get(AUTHORIZATION).is_none());
        assert_eq!(sent.header_map().get("access_token").unwrap(), "zz");
    }

    #[tokio::test]
    async fn test_unauthorized_redirects_then_rethrows() {
        let handler = Arc::new(RecordingHandler::failing(SeedlineError::http(
            401,
            json!({"error": "expired"}),
        )));
        let navigator = Arc::new(RecordingNavigator::default());
        let interceptor =
            AuthInterceptor::new(handler, session_with(Some("abc")), navigator.clone());

        let err = interceptor
            .handle(OutboundRequest::new(Method::GET, "http://h/x"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(navigator.current(), Route::Login);
    }

    #[tokio::test]
    async fn test_other_errors_do_not_redirect() {
        let handler = Arc::new(RecordingHandler::failing(SeedlineError::http(
            500,
            json!(null),
        )));
        let navigator = Arc::new(RecordingNavigator::default());
        let interceptor =
            AuthInterceptor::new(handler, session_with(Some("abc")), navigator.clone());

        assert!(
            interceptor
                .handle(OutboundRequest::new(Method::GET, "http://h/x"))
                .await
                .is_err()
        );
        assert!(navigator.history().is_empty());
    }

    #[tokio::test]
    async fn test_custom_accept_language() {
        let handler = Arc::new(RecordingHandler::ok(json!({})));
        let interceptor = AuthInterceptor::new(
            handler.clone(),
            session_with(Some("abc")),
            Arc::new(RecordingNavigator::default()),
        )
        .with_accept_language("en")
        .unwrap();

        interceptor
            .handle(OutboundRequest::new(Method::GET, "http://h/x"))
            .await
            .unwrap();
        assert_eq!(
            handler.last().unwrap().header_map().get(ACCEPT_LANGUAGE).unwrap(),
            "en"
        );
    }
}
