use crate::gateway::{ApiGateway, api_path};
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use seedline_core::catalog::ActionReply;
use seedline_core::config::API_V1;
use seedline_core::user::{ChangePassword, ChangeRole, LoginForm, UserProfile};
use seedline_core::{ApiOutcome, OutboundRequest, QueryParams, SeedlineError};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Account endpoints: login, registration and user administration.
#[derive(Clone)]
pub struct AuthRequestService {
    gateway: Arc<ApiGateway>,
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, SeedlineError> {
    Ok(serde_json::to_value(value)?)
}

impl AuthRequestService {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// POST `api/v1/login` with the form as JSON. The reply carries the token.
    pub async fn login(&self, form: &LoginForm) -> ApiOutcome<Value> {
        let body = match to_json(form) {
            Ok(body) => body,
            Err(e) => return e.into(),
        };
        let result = self.gateway.post_option(API_V1, &body, "/login").await;
        ApiOutcome::from_response(result, |r| Ok(r.body.clone()))
    }

    /// POST `api/v1/login` with `Authorization: Basic base64(user:pass)`.
    ///
    /// Sent with the bypass marker so a leftover session never replaces the
    /// Basic header with a Bearer one.
    pub async fn login_basic(&self, form: &LoginForm) -> ApiOutcome<Value> {
        let mut basic = match HeaderValue::from_str(&format!("Basic {}", form.basic_digest())) {
            Ok(value) => value,
            Err(e) => return SeedlineError::invalid_request(e.to_string()).into(),
        };
        basic.set_sensitive(true);

        let request = OutboundRequest::new(Method::POST, self.gateway.endpoint(API_V1, "/login"))
            .json(json!({}))
            .bypass_auth()
            .with_header(AUTHORIZATION, basic);
        let result = self.gateway.send(request).await;
        ApiOutcome::from_response(result, |r| Ok(r.body.clone()))
    }

    /// POST `api/v1/register`.
    pub async fn register(&self, form: &LoginForm) -> ApiOutcome<ActionReply> {
        let body = match to_json(form) {
            Ok(body) => body,
            Err(e) => return e.into(),
        };
        let result = self.gateway.post_option(API_V1, &body, "/register").await;
        ApiOutcome::from_response(result, |r| Ok(ActionReply::from_value(&r.body)))
    }

    /// PUT `api/v1/update`.
    pub async fn update(&self, user: &Value) -> ApiOutcome<Value> {
        let result = self.gateway.put(API_V1, user, "/update").await;
        ApiOutcome::from_response(result, |r| Ok(r.body.clone()))
    }

    /// GET `api/v1/search` with `params`.
    pub async fn search(&self, params: &QueryParams) -> ApiOutcome<Value> {
        let result = self.gateway.get_option(API_V1, params, "/search").await;
        ApiOutcome::from_response(result, |r| Ok(r.body.clone()))
    }

    /// DELETE `api/v1/delete?id=<id>`.
    pub async fn delete(&self, id: &str) -> ApiOutcome<ActionReply> {
        let result = self.gateway.delete(&api_path("/delete"), id).await;
        ApiOutcome::from_response(result, |r| Ok(ActionReply::from_value(&r.body)))
    }

    /// POST `api/v1/change-role`.
    pub async fn change_role(&self, change: &ChangeRole) -> ApiOutcome<ActionReply> {
        let body = match to_json(change) {
            Ok(body) => body,
            Err(e) => return e.into(),
        };
        let result = self.gateway.post_option(API_V1, &body, "/change-role").await;
        ApiOutcome::from_response(result, |r| Ok(ActionReply::from_value(&r.body)))
    }

    /// POST `api/v1/change-password`.
    pub async fn change_password(&self, change: &ChangePassword) -> ApiOutcome<ActionReply> {
        let body = match to_json(change) {
            Ok(body) => body,
            Err(e) => return e.into(),
        };
        let result = self
            .gateway
            .post_option(API_V1, &body, "/change-password")
            .await;
        ApiOutcome::from_response(result, |r| Ok(ActionReply::from_value(&r.body)))
    }

    /// GET `api/v1/get-all`.
    pub async fn get_all(&self) -> ApiOutcome<Value> {
        let result = self.gateway.get(&api_path("/get-all")).await;
        ApiOutcome::from_response(result, |r| Ok(r.body.clone()))
    }

    /// GET `api/v1/detail?id=<id>`.
    pub async fn detail(&self, id: &str) -> ApiOutcome<UserProfile> {
        let params = QueryParams::new().push("id", id);
        let result = self.gateway.get_option(API_V1, &params, "/detail").await;
        ApiOutcome::from_response(result, |r| r.decode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingHandler;
    use seedline_core::RequestBody;

    fn service(handler: Arc<RecordingHandler>) -> AuthRequestService {
        AuthRequestService::new(Arc::new(ApiGateway::new(handler, "http://127.0.0.1:5001/")))
    }

    #[tokio::test]
    async fn test_login_basic_sends_digest_and_bypasses() {
        let handler = Arc::new(RecordingHandler::ok(json!({"message": "ok"})));
        let outcome = service(handler.clone())
            .login_basic(&LoginForm::new("alice", "secret"))
            .await;
        assert!(outcome.is_ok());

        let sent = handler.last().unwrap();
        assert_eq!(sent.url(), "http://127.0.0.1:5001/api/v1/login");
        assert!(sent.is_bypass_auth());
        assert_eq!(
            sent.header_map().get(AUTHORIZATION).unwrap(),
            "Basic YWxpY2U6c2VjcmV0"
        );
    }

    #[tokio::test]
    async fn test_login_json_posts_form() {
        let handler = Arc::new(RecordingHandler::ok(json!({"token": "t-1"})));
        let body = service(handler.clone())
            .login(&LoginForm::new("alice", "secret"))
            .await
            .ok()
            .unwrap();

        assert_eq!(body["token"], "t-1");
        let sent = handler.last().unwrap();
        assert!(!sent.is_bypass_auth());
        assert_eq!(
            sent.body(),
            &RequestBody::Json(json!({"username": "alice", "password": "secret"}))
        );
    }

    #[tokio::test]
    async fn test_account_admin_paths() {
        let handler = Arc::new(RecordingHandler::ok(json!({"id": 3, "username": "bob"})));
        let service = service(handler.clone());

        let profile = service.detail("3").await.ok().unwrap();
        assert_eq!(profile.username.as_deref(), Some("bob"));
        let sent = handler.last().unwrap();
        assert!(sent.url().ends_with("/api/v1/detail"));
        assert_eq!(sent.query_params().pairs()[0], ("id".to_string(), "3".to_string()));

        service.delete("3").await;
        assert!(handler.last().unwrap().url().ends_with("/api/v1/delete"));

        service.get_all().await;
        assert!(handler.last().unwrap().url().ends_with("/api/v1/get-all"));

        service
            .change_role(&ChangeRole {
                id: json!(3),
                role: "ADMIN".to_string(),
            })
            .await;
        assert!(handler.last().unwrap().url().ends_with("/api/v1/change-role"));

        service
            .change_password(&ChangePassword {
                old_password: "a".to_string(),
                new_password: "b".to_string(),
            })
            .await;
        assert!(
            handler
                .last()
                .unwrap()
                .url()
                .ends_with("/api/v1/change-password")
        );

        service.register(&LoginForm::new("carol", "pw")).await;
        assert!(handler.last().unwrap().url().ends_with("/api/v1/register"));

        service
            .search(&QueryParams::new().push("username", "bo"))
            .await;
        assert!(handler.last().unwrap().url().ends_with("/api/v1/search"));

        service.update(&json!({"id": 3, "role": "USER"})).await;
        let sent = handler.last().unwrap();
        assert_eq!(sent.method(), Method::PUT);
        assert!(sent.url().ends_with("/api/v1/update"));
    }
}
