//! Picking an image to classify.
//!
//! On a phone this is the permission-gated system gallery. The trait keeps
//! the identify flow independent of where the picture comes from.

use std::path::PathBuf;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedImage {
    /// Where the image lives, for display.
    pub uri: String,
    /// Image bytes, base64-encoded. Pickers may not always provide them.
    pub base64: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Picked(PickedImage),
    PermissionDenied,
    Cancelled,
}

#[async_trait]
pub trait ImagePicker: Send + Sync {
    async fn pick(&self) -> PickOutcome;
}

/// Picks a file from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct FileImagePicker {
    path: Option<PathBuf>,
}

impl FileImagePicker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ImagePicker for FileImagePicker {
    async fn pick(&self) -> PickOutcome {
        let Some(path) = &self.path else {
            return PickOutcome::Cancelled;
        };

        match tokio::fs::read(path).await {
            Ok(bytes) => PickOutcome::Picked(PickedImage {
                uri: format!("file://{}", path.display()),
                base64: Some(BASE64.encode(bytes)),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                PickOutcome::PermissionDenied
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read image");
                PickOutcome::Cancelled
            }
        }
    }
}
