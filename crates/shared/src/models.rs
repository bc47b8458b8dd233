//! Shared data models for the Green World backend and client.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::FieldErrors;

/// Anything that carries a numeric server identifier.
pub trait Identified {
    fn id(&self) -> u64;
}

// --- Identity ---

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Collector,
    Admin,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Collector => "collector",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub points: u64,
    #[serde(default)]
    pub role: Role,
    /// Target in kilograms.
    #[serde(
        default,
        deserialize_with = "lenient_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub recycling_goal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unread_notifications_count: Option<u32>,
}

/// Accepts `12.5`, `"12.5"`, `""` and `null`.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Decimal {
        Number(f64),
        Text(String),
    }

    match Option::<Decimal>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Decimal::Number(n)) => Ok(Some(n)),
        Some(Decimal::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Decimal::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Treats an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// --- Waste ---

/// Processing state of a submission. The server may add states the client
/// does not know yet; those decode to `Unknown` and render in the neutral
/// color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WasteStatus {
    Pending,
    Identified,
    Processed,
    Unknown(String),
}

impl From<String> for WasteStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => WasteStatus::Pending,
            "identified" => WasteStatus::Identified,
            "processed" => WasteStatus::Processed,
            _ => WasteStatus::Unknown(value),
        }
    }
}

impl From<WasteStatus> for String {
    fn from(value: WasteStatus) -> Self {
        value.label().to_string()
    }
}

impl Default for WasteStatus {
    fn default() -> Self {
        WasteStatus::Unknown(String::new())
    }
}

impl WasteStatus {
    pub fn label(&self) -> &str {
        match self {
            WasteStatus::Pending => "pending",
            WasteStatus::Identified => "identified",
            WasteStatus::Processed => "processed",
            WasteStatus::Unknown(raw) => raw,
        }
    }

    /// Accent color used for the status stripe.
    pub fn color(&self) -> &'static str {
        match self {
            WasteStatus::Pending => "#facc15",
            WasteStatus::Identified => "#3b82f6",
            WasteStatus::Processed => "#22c55e",
            WasteStatus::Unknown(_) => "#9ca3af",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Waste {
    pub id: u64,
    /// Empty until the classifier has run.
    #[serde(default, deserialize_with = "null_as_default")]
    pub waste_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: WasteStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Waste {
    /// Waste type for display, `N/A` while unclassified.
    pub fn type_label(&self) -> &str {
        if self.waste_type.is_empty() {
            "N/A"
        } else {
            &self.waste_type
        }
    }
}

impl Identified for Waste {
    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WasteList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub wastes: Vec<Waste>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewWaste {
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateWasteRequest {
    pub waste: NewWaste,
}

// --- Notifications ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub read: bool,
    /// Server timestamp, kept verbatim.
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
}

impl Identified for Notification {
    fn id(&self) -> u64 {
        self.id
    }
}

/// `GET /notifications` has been seen both wrapped and bare.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NotificationList {
    Wrapped { notifications: Vec<Notification> },
    Bare(Vec<Notification>),
}

impl NotificationList {
    pub fn into_vec(self) -> Vec<Notification> {
        match self {
            NotificationList::Wrapped { notifications } => notifications,
            NotificationList::Bare(list) => list,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkReadRequest {
    pub read: bool,
}

// --- Accounts ---

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignInRequest {
    pub user: Credentials,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SignInResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub errors: Option<FieldErrors>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Form fields are sent as typed text, the way the sign-up screen collects them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub location: String,
    pub recycling_goal: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignUpRequest {
    pub user: Registration,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub location: String,
    pub recycling_goal: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_confirmation: Option<String>,
}

impl ProfileUpdate {
    /// Seed the edit form from the signed-in user.
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            location: user.location.clone().unwrap_or_default(),
            recycling_goal: user
                .recycling_goal
                .map(|goal| goal.to_string())
                .unwrap_or_default(),
            role: user.role,
            password: None,
            password_confirmation: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileUpdateRequest {
    pub user: ProfileUpdate,
}

/// `GET /user` answers either `{ "user": {...} }` or the bare record.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum UserEnvelope {
    Wrapped { user: User },
    Bare(User),
}

impl UserEnvelope {
    pub fn into_user(self) -> User {
        match self {
            UserEnvelope::Wrapped { user } => user,
            UserEnvelope::Bare(user) => user,
        }
    }
}

// --- Classification ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifyRequest {
    pub image: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    #[serde(default)]
    pub types: Vec<String>,
    /// Annotated image as a data URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Prediction {
    pub fn label(&self) -> &str {
        self.types
            .first()
            .map(String::as_str)
            .filter(|label| !label.is_empty())
            .unwrap_or("Unknown")
    }
}

/// Embed a base64 payload in a `data:` URI.
pub fn data_uri(mime: &str, base64_payload: &str) -> String {
    format!("data:{mime};base64,{base64_payload}")
}

/// Encode raw bytes as a JPEG data URI.
pub fn jpeg_data_uri(bytes: &[u8]) -> String {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
    data_uri("image/jpeg", &BASE64.encode(bytes))
}
