//! Client for the image classification service.

use greenworld_shared::{data_uri, ApiError, ClassifyRequest, Prediction};
use reqwest::Client;

use crate::config::ClientConfig;

#[derive(Debug, Clone)]
pub struct ClassifierClient {
    client: Client,
    predict_url: String,
}

impl ClassifierClient {
    pub fn new(predict_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            predict_url: predict_url.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.predict_url())
    }

    /// Classify a base64-encoded JPEG.
    pub async fn predict(&self, base64_jpeg: &str) -> Result<Prediction, ApiError> {
        let body = ClassifyRequest {
            image: data_uri("image/jpeg", base64_jpeg),
        };

        let resp = self
            .client
            .post(&self.predict_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let is_success = resp.status().is_success();
        let text = resp.text().await.map_err(|e| ApiError::Network(e.to_string()))?;

        if !is_success {
            return Err(ApiError::Http { status, body: text });
        }

        let prediction: Prediction =
            serde_json::from_str(&text).map_err(|e| ApiError::Deserialize(e.to_string()))?;
        tracing::debug!(label = prediction.label(), "classified image");
        Ok(prediction)
    }
}
