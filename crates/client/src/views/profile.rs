//! Account edit screen.

use greenworld_shared::{ApiError, FieldErrors, ProfileUpdate};

use super::form::FormState;
use super::login::NETWORK_ERROR;
use super::register::UNEXPECTED_ERROR;
use crate::api_client::ApiClient;
use crate::auth_session::Session;

#[derive(Debug, Clone)]
pub struct ProfileView {
    pub update: ProfileUpdate,
    /// Left blank to keep the current password.
    pub new_password: String,
    pub password_confirmation: String,
    pub form: FormState,
}

impl ProfileView {
    /// `None` when nobody is signed in.
    pub fn for_session(session: &Session) -> Option<Self> {
        let user = session.get()?;
        Some(Self {
            update: ProfileUpdate::from_user(&user),
            new_password: String::new(),
            password_confirmation: String::new(),
            form: FormState::new(),
        })
    }

    fn request(&self) -> ProfileUpdate {
        let mut update = self.update.clone();
        if !self.new_password.is_empty() {
            update.password = Some(self.new_password.clone());
            update.password_confirmation = Some(self.password_confirmation.clone());
        }
        update
    }

    /// Save the profile, then refresh the session's copy of the user.
    pub async fn submit(&mut self, api: &ApiClient, session: &Session) -> bool {
        self.form.begin();

        let saved = match api.update_profile(&self.request()).await {
            Ok(()) => {
                match api.current_user().await {
                    Ok(user) => session.set(user),
                    Err(e) => tracing::warn!(error = %e, "could not refresh user after update"),
                }
                true
            }
            Err(ApiError::Network(e)) => {
                tracing::warn!(error = %e, "profile update request failed");
                self.form.fail(FieldErrors::base(NETWORK_ERROR));
                false
            }
            Err(e) => {
                match e.field_errors().filter(|errors| !errors.is_empty()) {
                    Some(errors) => self.form.fail(errors),
                    None => {
                        tracing::error!(error = %e, "profile update failed");
                        self.form.fail(FieldErrors::base(UNEXPECTED_ERROR));
                    }
                }
                false
            }
        };

        self.form.finish();
        saved
    }
}
