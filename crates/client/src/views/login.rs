//! Sign-in screen.

use greenworld_shared::{ApiError, Credentials, FieldErrors};

use super::form::FormState;
use crate::api_client::ApiClient;
use crate::auth_session::Session;

pub const SIGN_IN_FAILED: &str = "Sign in failed";
pub const NETWORK_ERROR: &str = "Network or server error";

#[derive(Debug, Clone, Default)]
pub struct LoginView {
    pub credentials: Credentials,
    pub form: FormState,
}

impl LoginView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.credentials.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.credentials.password = password.into();
    }

    /// Sign in. On success the session holds the returned user and `true`
    /// is returned; on failure the session is left as it was and the errors
    /// are on `self.form`.
    pub async fn submit(&mut self, api: &ApiClient, session: &Session) -> bool {
        self.form.begin();

        let signed_in = match api.sign_in(&self.credentials).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "signed in");
                session.set(user);
                true
            }
            Err(ApiError::Network(e)) => {
                tracing::warn!(error = %e, "sign in request failed");
                self.form.fail(FieldErrors::base(NETWORK_ERROR));
                false
            }
            Err(e) => {
                let errors = e
                    .field_errors()
                    .filter(|errors| !errors.is_empty())
                    .unwrap_or_else(|| FieldErrors::base(SIGN_IN_FAILED));
                self.form.fail(errors);
                false
            }
        };

        self.form.finish();
        signed_in
    }
}
