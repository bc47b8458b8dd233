//! Shared error types, including the backend's field-level error map.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Key used for errors that do not belong to a single form field.
pub const BASE_FIELD: &str = "base";

/// Field-level validation errors, keyed by form field name.
///
/// The backend sends either `{"email": "is invalid"}` or
/// `{"email": ["is invalid", "is taken"]}`; both collapse to one message per
/// field.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single error not tied to any field.
    pub fn base(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(BASE_FIELD, message);
        errors
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn base_message(&self) -> Option<&str> {
        self.get(BASE_FIELD)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Pull errors out of a response body.
    ///
    /// Prefers an `errors` object, falls back to a top-level `message` string
    /// reported under `base`.
    pub fn from_body(body: &str) -> Option<Self> {
        #[derive(Deserialize)]
        struct ErrorBody {
            #[serde(default)]
            errors: Option<FieldErrors>,
            #[serde(default)]
            message: Option<String>,
        }

        let parsed = serde_json::from_str::<ErrorBody>(body).ok()?;
        if let Some(errors) = parsed.errors.filter(|e| !e.is_empty()) {
            return Some(errors);
        }
        parsed
            .message
            .filter(|m| !m.trim().is_empty())
            .map(FieldErrors::base)
    }
}

impl<'de> Deserialize<'de> for FieldErrors {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Messages {
            One(String),
            Many(Vec<String>),
        }

        let raw = BTreeMap::<String, Messages>::deserialize(deserializer)?;
        let map = raw
            .into_iter()
            .filter_map(|(field, messages)| {
                let message = match messages {
                    Messages::One(m) => m,
                    Messages::Many(list) => list.join(", "),
                };
                (!message.is_empty()).then_some((field, message))
            })
            .collect();
        Ok(FieldErrors(map))
    }
}

/// API error type for client-side use
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    /// The server answered, but refused the request with field errors.
    #[error("Request rejected: {0:?}")]
    Rejected(FieldErrors),
}

impl ApiError {
    /// Field errors carried by this failure, if the server sent any.
    pub fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            ApiError::Rejected(errors) => Some(errors.clone()),
            ApiError::Http { body, .. } => FieldErrors::from_body(body),
            _ => None,
        }
    }

    /// No response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}
