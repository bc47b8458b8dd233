//! Sign-up screen.

use greenworld_shared::{FieldErrors, Registration};

use super::form::FormState;
use crate::api_client::ApiClient;

pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

#[derive(Debug, Clone, Default)]
pub struct RegisterView {
    pub registration: Registration,
    pub form: FormState,
}

impl RegisterView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the account. `true` means the caller should move on to sign-in.
    pub async fn submit(&mut self, api: &ApiClient) -> bool {
        self.form.begin();

        let created = match api.sign_up(&self.registration).await {
            Ok(()) => true,
            Err(e) => {
                match e.field_errors().filter(|errors| !errors.is_empty()) {
                    Some(errors) => self.form.fail(errors),
                    None => {
                        tracing::error!(error = %e, "sign up failed");
                        self.form.fail(FieldErrors::base(UNEXPECTED_ERROR));
                    }
                }
                false
            }
        };

        self.form.finish();
        created
    }
}
