//! HTTP API client for the Green World backend.

use greenworld_shared::{
    jpeg_data_uri, ApiError, CreateWasteRequest, Credentials, FieldErrors, MarkReadRequest,
    NewWaste, Notification, NotificationList, ProfileUpdate, ProfileUpdateRequest, Registration,
    SignInRequest, SignInResponse, SignUpRequest, User, UserEnvelope, Waste, WasteList,
};
use reqwest::{header, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;

/// HTTP client for the REST backend.
///
/// Cookies set by the backend (the login session) are kept and sent back on
/// every later request. Clones share the same cookie jar.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(config.api_url.as_str())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header(header::ACCEPT, "application/json")
    }

    /// Send a request and return the raw body of a successful response.
    async fn send(&self, rb: RequestBuilder) -> Result<String, ApiError> {
        let resp = rb.send().await.map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let is_success = resp.status().is_success();
        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))?;

        if !is_success {
            tracing::debug!(status, "request failed");
            return Err(ApiError::Http { status, body: text });
        }
        Ok(text)
    }

    fn decode<TRes: DeserializeOwned>(text: &str) -> Result<TRes, ApiError> {
        let text = if text.trim().is_empty() { "null" } else { text };
        serde_json::from_str(text).map_err(|e| ApiError::Deserialize(e.to_string()))
    }

    /// Make a GET request
    pub async fn get_json<TRes: DeserializeOwned>(&self, path: &str) -> Result<TRes, ApiError> {
        let text = self.send(self.request(Method::GET, path)).await?;
        Self::decode(&text)
    }

    /// Make a POST request with JSON body
    pub async fn post_json<TReq: Serialize, TRes: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TRes, ApiError> {
        let text = self.send(self.request(Method::POST, path).json(body)).await?;
        Self::decode(&text)
    }

    /// Make a PUT request with JSON body
    pub async fn put_json<TReq: Serialize, TRes: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TRes, ApiError> {
        let text = self.send(self.request(Method::PUT, path).json(body)).await?;
        Self::decode(&text)
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    // --- Account ---

    /// Sign in and return the user record from the response.
    ///
    /// A 2xx answer with `success: false` is a rejection, same as a 4xx with
    /// an error body.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let body = SignInRequest {
            user: credentials.clone(),
        };
        let resp: SignInResponse = self.post_json("/users/sign_in", &body).await?;

        match resp {
            SignInResponse {
                success: true,
                user: Some(user),
                ..
            } => Ok(user),
            SignInResponse {
                errors, message, ..
            } => {
                let errors = errors
                    .filter(|e| !e.is_empty())
                    .or_else(|| message.map(FieldErrors::base))
                    .unwrap_or_default();
                Err(ApiError::Rejected(errors))
            }
        }
    }

    pub async fn sign_up(&self, registration: &Registration) -> Result<(), ApiError> {
        let body = SignUpRequest {
            user: registration.clone(),
        };
        let _: serde_json::Value = self.post_json("/users", &body).await?;
        Ok(())
    }

    /// End the server-side session. The local session is the caller's to clear.
    pub async fn sign_out(&self) -> Result<(), ApiError> {
        self.delete("/users/sign_out").await
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        let envelope: UserEnvelope = self.get_json("/user").await?;
        Ok(envelope.into_user())
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), ApiError> {
        let body = ProfileUpdateRequest {
            user: update.clone(),
        };
        let _: serde_json::Value = self.put_json("/user", &body).await?;
        Ok(())
    }

    // --- Waste ---

    pub async fn list_wastes(&self) -> Result<Vec<Waste>, ApiError> {
        let list: Option<WasteList> = self.get_json("/wastes").await?;
        Ok(list.map(|l| l.wastes).unwrap_or_default())
    }

    /// Submit a photo for classification. The server classifies it
    /// asynchronously and pushes the result over the waste channel.
    pub async fn create_waste(&self, image_data_uri: String) -> Result<Waste, ApiError> {
        let body = CreateWasteRequest {
            waste: NewWaste {
                image: image_data_uri,
            },
        };
        self.post_json("/wastes", &body).await
    }

    /// Same as [`ApiClient::create_waste`], from raw JPEG bytes.
    pub async fn create_waste_from_jpeg(&self, bytes: &[u8]) -> Result<Waste, ApiError> {
        self.create_waste(jpeg_data_uri(bytes)).await
    }

    // --- Notifications ---

    pub async fn list_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        let list: NotificationList = self.get_json("/notifications").await?;
        Ok(list.into_vec())
    }

    pub async fn mark_notification_read(&self, id: u64) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .put_json(&format!("/notifications/{id}"), &MarkReadRequest { read: true })
            .await?;
        Ok(())
    }
}
