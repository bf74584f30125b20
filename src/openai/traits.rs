use crate::{
    error::ProviderError,
    models::image::{ImageGenerationRequest, ImageGenerationResponse},
};
use async_trait::async_trait;

/// A backend that can answer an images/generations request.
///
/// Implementations return the provider's response untouched; interpreting
/// missing entries or payloads is left to [`ImageGenerationClient`](super::ImageGenerationClient).
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate(
        &self,
        request: &ImageGenerationRequest,
    ) -> std::result::Result<ImageGenerationResponse, ProviderError>;
}
