use crate::{
    config::{OpenAIConfig, DEFAULT_IMAGE_MODEL},
    error::{BotError, GenerationError, GenerationErrorKind, Result},
    models::{
        image::{GeneratedImage, ImageGenerationRequest, ImageGenerationResponse, ImageSize},
        ModelInfo,
    },
    openai::{http::OpenAIImageProvider, traits::ImageProvider},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

#[derive(Clone)]
pub struct ImageGenerationClient {
    model: String,
    provider: Arc<dyn ImageProvider>,
}

impl ImageGenerationClient {
    pub const DEFAULT_MODEL: &'static str = DEFAULT_IMAGE_MODEL;

    pub fn new(config: &OpenAIConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(BotError::Config(
                "OPENAI_API_KEY environment variable is not set.".into(),
            ));
        }

        let provider = OpenAIImageProvider::new(config)?;
        Ok(Self::with_provider(config.model.clone(), Arc::new(provider)))
    }

    pub fn with_provider(model: impl Into<String>, provider: Arc<dyn ImageProvider>) -> Self {
        Self {
            model: model.into(),
            provider,
        }
    }

    pub fn supported_models() -> Vec<ModelInfo> {
        vec![
            ModelInfo::new("gpt-image-1", "GPT Image 1", "OpenAI"),
            ModelInfo::new("dall-e-3", "DALL·E 3", "OpenAI"),
            ModelInfo::new("dall-e-2", "DALL·E 2", "OpenAI"),
        ]
    }

    /// Generates one default-sized image.
    pub async fn generate(&self, prompt: &str) -> std::result::Result<GeneratedImage, GenerationError> {
        self.generate_image(prompt, ImageSize::default(), 1).await
    }

    /// Requests `n` images of `size` for `prompt` and decodes the first one.
    ///
    /// Every outcome is either decoded bytes or an error carrying a non-empty
    /// message; nothing is retried. `n` is sent as given, so the provider
    /// decides what an out-of-range count means.
    pub async fn generate_image(
        &self,
        prompt: &str,
        size: ImageSize,
        n: u32,
    ) -> std::result::Result<GeneratedImage, GenerationError> {
        let request = ImageGenerationRequest::new(&self.model, prompt)
            .with_size(size)
            .with_count(n);

        log::info!("Generating image with model: {}", self.model);

        let response = match self.provider.generate(&request).await {
            Ok(response) => response,
            Err(e) => {
                log::error!(
                    prompt = prompt,
                    size = size.as_str(),
                    n = request.n,
                    model = self.model.as_str(),
                    status = e.status.unwrap_or_default(),
                    kind = e.kind.as_str(),
                    transient = e.kind.is_transient();
                    "Failed to generate image: {:?}",
                    e
                );
                return Err(e.into());
            }
        };

        decode_first_image(response, &self.model)
    }
}

fn decode_first_image(
    response: ImageGenerationResponse,
    model: &str,
) -> std::result::Result<GeneratedImage, GenerationError> {
    let Some(first) = response.data.and_then(|data| data.into_iter().next()) else {
        let err = GenerationError::no_data();
        log::warn!("{}", err);
        return Err(err);
    };

    let Some(b64) = first.b64_json.filter(|b64| !b64.trim().is_empty()) else {
        let err = GenerationError::no_base64();
        log::warn!("{}", err);
        return Err(err);
    };

    let bytes = STANDARD.decode(b64.trim()).map_err(|e| {
        log::error!(model = model; "Failed to decode image payload: {}", e);
        GenerationError::new(GenerationErrorKind::Decode, e.to_string())
    })?;

    if bytes.is_empty() {
        let err = GenerationError::no_base64();
        log::warn!("{}", err);
        return Err(err);
    }

    Ok(GeneratedImage {
        bytes,
        model: model.to_string(),
        revised_prompt: first.revised_prompt,
    })
}
