//! Photo classification screen.

use greenworld_shared::Waste;

use crate::auth_session::Session;
use crate::classifier::ClassifierClient;
use crate::config::ClientConfig;
use crate::image::{ImagePicker, PickOutcome};
use crate::ws::{SessionSubscription, WasteTopic};

pub const PERMISSION_REQUIRED: &str = "Please allow access to photos.";

#[derive(Debug, Default)]
pub struct IdentifyView {
    pub image_uri: Option<String>,
    /// Annotated image returned by the classifier.
    pub detected_image: Option<String>,
    pub result: Option<String>,
    pub error: Option<String>,
    processing: bool,
    subscription: Option<SessionSubscription<WasteTopic>>,
}

impl IdentifyView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Log waste updates pushed while this screen is open.
    pub fn subscribe(&mut self, config: &ClientConfig, session: &Session) {
        self.subscription = Some(SessionSubscription::<WasteTopic>::activate(
            config.cable_url(),
            session,
            |waste: Waste| {
                tracing::info!(id = waste.id, waste_type = waste.type_label(), "waste update");
            },
        ));
    }

    pub fn subscription(&self) -> Option<&SessionSubscription<WasteTopic>> {
        self.subscription.as_ref()
    }

    /// Ask the picker for a photo and classify it.
    pub async fn pick_and_identify(
        &mut self,
        picker: &dyn ImagePicker,
        classifier: &ClassifierClient,
    ) {
        match picker.pick().await {
            PickOutcome::PermissionDenied => {
                self.error = Some(PERMISSION_REQUIRED.to_string());
            }
            PickOutcome::Cancelled => {}
            PickOutcome::Picked(image) => {
                let Some(base64) = image.base64 else {
                    tracing::debug!(uri = %image.uri, "picker returned no image data");
                    return;
                };
                self.image_uri = Some(image.uri);
                self.identify(classifier, &base64).await;
            }
        }
    }

    pub async fn identify(&mut self, classifier: &ClassifierClient, base64_jpeg: &str) {
        self.processing = true;
        self.error = None;
        self.result = None;
        self.detected_image = None;

        match classifier.predict(base64_jpeg).await {
            Ok(prediction) => {
                self.result = Some(prediction.label().to_string());
                self.detected_image = prediction.image;
            }
            Err(e) => {
                tracing::warn!(error = %e, "classification failed");
                self.error = Some(e.to_string());
            }
        }

        self.processing = false;
    }
}
