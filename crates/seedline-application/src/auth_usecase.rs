//! Login, logout, registration and the cached profile.
//!
//! This is the only holder of the [`SessionWriter`]: every change to the
//! stored credential goes through here.

use crate::notifications::NotificationQueue;
use seedline_core::catalog::ActionReply;
use seedline_core::config::LoginVariant;
use seedline_core::user::{LoginForm, UserProfile};
use seedline_core::{
    ApiOutcome, Navigator, Result, Route, SeedlineError, SessionContext, SessionWriter,
};
use seedline_interaction::AuthRequestService;
use serde_json::{Value, json};
use std::sync::Arc;

/// Fields of a JSON login reply that may carry the token.
const TOKEN_FIELDS: [&str; 2] = ["token", "access_token"];

pub struct AuthUseCase {
    auth: AuthRequestService,
    writer: SessionWriter,
    navigator: Arc<dyn Navigator>,
    notifications: NotificationQueue,
    variant: LoginVariant,
}

impl AuthUseCase {
    pub fn new(
        auth: AuthRequestService,
        writer: SessionWriter,
        navigator: Arc<dyn Navigator>,
        notifications: NotificationQueue,
        variant: LoginVariant,
    ) -> Self {
        Self {
            auth,
            writer,
            navigator,
            notifications,
            variant,
        }
    }

    pub fn session(&self) -> SessionContext {
        self.writer.context()
    }

    pub fn variant(&self) -> LoginVariant {
        self.variant
    }

    /// Entering the login view discards whatever session was stored.
    pub fn enter_login(&self) -> Result<()> {
        self.writer.sign_out()?;
        self.navigator.navigate(Route::Login);
        Ok(())
    }

    /// Authenticates with `form` and, on success, lands on the uploaded-file view.
    ///
    /// On failure an error notification is shown and the stored session is
    /// left as it was.
    pub async fn login(&self, form: &LoginForm) -> Result<()> {
        let credential = match self.variant {
            LoginVariant::Basic => self
                .auth
                .login_basic(form)
                .await
                .into_result()
                .map(|_| form.basic_digest()),
            LoginVariant::Json => self
                .auth
                .login(form)
                .await
                .into_result()
                .and_then(|body| token_from(&body)),
        };

        let credential = match credential {
            Ok(credential) => credential,
            Err(e) => {
                tracing::info!("[Auth] Login as {} failed: {}", form.username, e);
                self.notifications.error(login_failure_message(&e));
                return Err(e);
            }
        };

        let user = json!({ "username": form.username }).to_string();
        self.writer
            .sign_in(&credential, Some(&form.username), Some(&user))?;
        self.notifications.success("Login successful");
        self.navigator.navigate(Route::MyFiles);
        Ok(())
    }

    /// Clears the session and returns to the login view.
    pub fn logout(&self) -> Result<()> {
        self.enter_login()
    }

    pub async fn register(&self, form: &LoginForm) -> ApiOutcome<ActionReply> {
        let outcome = self.auth.register(form).await;
        match &outcome {
            ApiOutcome::Ok(_) => {
                self.notifications.success("Register successful");
            }
            failed => {
                tracing::debug!("[Auth] Register failed: {:?}", failed);
                self.notifications.error("Register failed");
            }
        }
        outcome
    }

    /// Fetches the profile of user `id` and caches it under `infoUser`.
    pub async fn load_profile(&self, id: &str) -> Result<UserProfile> {
        let profile = self.auth.detail(id).await.into_result()?;
        self.writer.cache_profile(&serde_json::to_string(&profile)?)?;
        Ok(profile)
    }

    /// The cached profile, if one was loaded and is still readable.
    pub fn cached_profile(&self) -> Result<Option<UserProfile>> {
        let Some(raw) = self.writer.cached_profile()? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                tracing::warn!("[Auth] Ignoring unreadable cached profile: {}", e);
                Ok(None)
            }
        }
    }
}

fn token_from(body: &Value) -> Result<String> {
    TOKEN_FIELDS
        .iter()
        .filter_map(|field| body.get(*field).and_then(Value::as_str))
        .find(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SeedlineError::malformed("login reply carries no token"))
}

fn login_failure_message(err: &SeedlineError) -> String {
    match err {
        SeedlineError::Http { status: 401, .. } | SeedlineError::Http { status: 403, .. } => {
            "Invalid username or password".to_string()
        }
        SeedlineError::Transport(_) => "Cannot reach the server".to_string(),
        _ => "Login failed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_reply() {
        assert_eq!(token_from(&json!({"token": "a"})).unwrap(), "a");
        assert_eq!(token_from(&json!({"access_token": "b"})).unwrap(), "b");
        assert_eq!(
            token_from(&json!({"token": "", "access_token": "c"})).unwrap(),
            "c"
        );
        assert!(token_from(&json!({"message": "ok"})).unwrap_err().is_malformed());
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            login_failure_message(&SeedlineError::http(401, Value::Null)),
            "Invalid username or password"
        );
        assert_eq!(
            login_failure_message(&SeedlineError::transport("refused")),
            "Cannot reach the server"
        );
        assert_eq!(
            login_failure_message(&SeedlineError::http(500, Value::Null)),
            "Login failed"
        );
    }
}
