use crate::{
    config::OpenAIConfig,
    error::{GenerationErrorKind, ProviderError, Result},
    models::image::{ApiErrorResponse, ImageGenerationRequest, ImageGenerationResponse},
    openai::traits::ImageProvider,
};
use async_trait::async_trait;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Longest slice of a non-JSON error body quoted back in the error message.
const MAX_BODY_EXCERPT_CHARS: usize = 300;

/// [`ImageProvider`] speaking the OpenAI images API over HTTPS.
#[derive(Clone)]
pub struct OpenAIImageProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAIImageProvider {
    pub fn new(config: &OpenAIConfig) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/images/generations", self.base_url)
    }
}

#[async_trait]
impl ImageProvider for OpenAIImageProvider {
    async fn generate(
        &self,
        request: &ImageGenerationRequest,
    ) -> std::result::Result<ImageGenerationResponse, ProviderError> {
        log::debug!(
            "POST {} (model: {}, size: {}, n: {})",
            self.endpoint(),
            request.model,
            request.size,
            request.n
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        if !(200..300).contains(&status) {
            return Err(error_from_response(status, &body));
        }

        serde_json::from_str::<ImageGenerationResponse>(&body).map_err(|e| {
            ProviderError::new(
                GenerationErrorKind::Provider,
                format!("Invalid response from image API: {}", e),
            )
            .with_status(status)
        })
    }
}

fn classify(status: u16, code: Option<&str>) -> GenerationErrorKind {
    match (status, code) {
        (_, Some("content_policy_violation" | "moderation_blocked")) => {
            GenerationErrorKind::ContentPolicy
        }
        (401 | 403, _) => GenerationErrorKind::Authentication,
        (429, _) => GenerationErrorKind::RateLimited,
        (400..=499, _) => GenerationErrorKind::InvalidRequest,
        _ => GenerationErrorKind::Provider,
    }
}

/// Turns a non-2xx answer into a [`ProviderError`], preferring the API's own message.
pub(crate) fn error_from_response(status: u16, body: &str) -> ProviderError {
    let error = serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .map(|r| r.error);
    let kind = classify(
        status,
        error.as_ref().and_then(|e| e.code.as_deref()),
    );
    let message = error
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            let body = body.trim();
            if body.is_empty() {
                format!("Image API returned status {}", status)
            } else {
                format!("Image API returned status {}: {}", status, body_excerpt(body))
            }
        });

    ProviderError::new(kind, message).with_status(status)
}

fn body_excerpt(body: &str) -> String {
    match body.char_indices().nth(MAX_BODY_EXCERPT_CHARS) {
        Some((end, _)) => format!("{}…", &body[..end]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::image::ImageSize;
    use httpmock::prelude::*;
    use serde_json::json;

    fn provider_for(server: &MockServer) -> OpenAIImageProvider {
        let config = OpenAIConfig::new("sk-test").with_base_url(server.url("/v1/"));
        OpenAIImageProvider::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_posts_request_with_bearer_auth() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/images/generations")
                    .header("Authorization", "Bearer sk-test")
                    .json_body(json!({
                        "model": "gpt-image-1",
                        "prompt": "a red balloon",
                        "n": 1,
                        "size": "1024x1024"
                    }));
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "created": 1713833628,
                        "data": [{ "b64_json": "aGVsbG8=" }]
                    }));
            })
            .await;

        let request = ImageGenerationRequest::new("gpt-image-1", "a red balloon")
            .with_size(ImageSize::Square1024);
        let response = provider_for(&server).generate(&request).await.unwrap();

        mock.assert_async().await;
        let data = response.data.unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].b64_json.as_deref(), Some("aGVsbG8="));
    }

    #[tokio::test]
    async fn test_rate_limit_uses_api_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/images/generations");
                then.status(429).json_body(json!({
                    "error": {
                        "message": "Rate limit exceeded",
                        "type": "requests",
                        "code": "rate_limit_exceeded"
                    }
                }));
            })
            .await;

        let request = ImageGenerationRequest::new("gpt-image-1", "anything");
        let err = provider_for(&server).generate(&request).await.unwrap_err();

        assert_eq!(err.kind, GenerationErrorKind::RateLimited);
        assert_eq!(err.message, "Rate limit exceeded");
        assert_eq!(err.status, Some(429));
    }

    #[tokio::test]
    async fn test_unparsable_success_body_is_provider_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/images/generations");
                then.status(200).body("not json");
            })
            .await;

        let request = ImageGenerationRequest::new("gpt-image-1", "anything");
        let err = provider_for(&server).generate(&request).await.unwrap_err();

        assert_eq!(err.kind, GenerationErrorKind::Provider);
        assert!(err.message.starts_with("Invalid response from image API"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let config = OpenAIConfig::new("sk-test").with_base_url("http://127.0.0.1:1/v1");
        let provider = OpenAIImageProvider::new(&config).unwrap();

        let request = ImageGenerationRequest::new("gpt-image-1", "anything");
        let err = provider.generate(&request).await.unwrap_err();

        assert_eq!(err.kind, GenerationErrorKind::Transport);
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_error_classification() {
        let policy = error_from_response(
            400,
            r#"{"error":{"message":"Your request was rejected by the safety system.","type":"invalid_request_error","code":"content_policy_violation"}}"#,
        );
        assert_eq!(policy.kind, GenerationErrorKind::ContentPolicy);
        assert_eq!(
            policy.message,
            "Your request was rejected by the safety system."
        );

        let auth = error_from_response(
            401,
            r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","code":"invalid_api_key"}}"#,
        );
        assert_eq!(auth.kind, GenerationErrorKind::Authentication);

        let bad = error_from_response(400, r#"{"error":{"message":"Invalid size","code":null}}"#);
        assert_eq!(bad.kind, GenerationErrorKind::InvalidRequest);

        let outage = error_from_response(503, "upstream unavailable");
        assert_eq!(outage.kind, GenerationErrorKind::Provider);
        assert_eq!(
            outage.message,
            "Image API returned status 503: upstream unavailable"
        );

        let empty = error_from_response(502, "");
        assert_eq!(empty.message, "Image API returned status 502");
    }

    #[test]
    fn test_long_error_page_is_cut_short() {
        let page = format!("<html><body>{}</body></html>", "é".repeat(2000));
        let err = error_from_response(502, &page);

        assert_eq!(err.kind, GenerationErrorKind::Provider);
        let excerpt = err
            .message
            .strip_prefix("Image API returned status 502: ")
            .unwrap();
        assert_eq!(excerpt.chars().count(), MAX_BODY_EXCERPT_CHARS + 1);
        assert!(excerpt.starts_with("<html><body>é"));
        assert!(excerpt.ends_with('…'));
    }
}
