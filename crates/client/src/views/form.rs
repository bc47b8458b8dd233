//! Processing flag and field errors shared by every form screen.

use greenworld_shared::FieldErrors;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    processing: bool,
    errors: FieldErrors,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A submit started: clear old errors and show the spinner.
    pub fn begin(&mut self) {
        self.errors.clear();
        self.processing = true;
    }

    pub fn fail(&mut self, errors: FieldErrors) {
        self.errors = errors;
    }

    pub fn finish(&mut self) {
        self.processing = false;
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Message to show under one input.
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn base_error(&self) -> Option<&str> {
        self.errors.base_message()
    }
}
