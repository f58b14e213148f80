/// Remote image service
///
/// This module handles:
/// - The `ImageService` seam the workflow talks to (generate, composite)
/// - Encoded image payloads passed in and out of the service
/// - The production client for the Generative Language API (gemini.rs)
/// - Reading design files picked by the user (upload.rs)

pub mod gemini;
pub mod upload;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// Errors raised while talking to the remote image service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Transport failure or timeout
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The service answered but carried no usable image
    #[error("Empty response: {0}")]
    EmptyResponse(&'static str),

    /// Image payload was not valid base64
    #[error("Decode error: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// Encoded image bytes tagged with their MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageData {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Decode a base64 payload as returned by the API
    pub fn from_base64(data: &str, mime_type: impl Into<String>) -> Result<Self, ServiceError> {
        Ok(Self::new(BASE64.decode(data.trim())?, mime_type))
    }

    /// Base64 of the raw bytes, for inline request parts
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    /// Handle for displaying these bytes in an image widget
    pub fn handle(&self) -> iced::widget::image::Handle {
        iced::widget::image::Handle::from_bytes(self.bytes.clone())
    }
}

/// The remote collaborator that synthesizes and edits images
///
/// Constructed once at startup and shared behind an `Arc`, so tests can
/// substitute their own implementation.
#[async_trait]
pub trait ImageService: Send + Sync {
    /// Generate one square image from a fully composed prompt
    async fn generate(&self, prompt: &str) -> Result<ImageData, ServiceError>;

    /// Blend `design` into `base` following `prompt`
    async fn composite(
        &self,
        base: &ImageData,
        design: &ImageData,
        prompt: &str,
    ) -> Result<ImageData, ServiceError>;
}
