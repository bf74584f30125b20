use serde::{Deserialize, Serialize};
use std::fmt;

/// Output dimensions accepted by the images endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ImageSize {
    #[serde(rename = "auto")]
    Auto,
    #[default]
    #[serde(rename = "1024x1024")]
    Square1024,
    #[serde(rename = "1536x1024")]
    Landscape1536,
    #[serde(rename = "1024x1536")]
    Portrait1536,
    #[serde(rename = "256x256")]
    Square256,
    #[serde(rename = "512x512")]
    Square512,
    #[serde(rename = "1792x1024")]
    Landscape1792,
    #[serde(rename = "1024x1792")]
    Portrait1792,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Auto => "auto",
            ImageSize::Square1024 => "1024x1024",
            ImageSize::Landscape1536 => "1536x1024",
            ImageSize::Portrait1536 => "1024x1536",
            ImageSize::Square256 => "256x256",
            ImageSize::Square512 => "512x512",
            ImageSize::Landscape1792 => "1792x1024",
            ImageSize::Portrait1792 => "1024x1792",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /images/generations`.
#[derive(Debug, Clone, Serialize)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
    pub n: u32,
    pub size: ImageSize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<String>,
}

impl ImageGenerationRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        let model = model.into();
        // dall-e models default to URLs; gpt-image models only return base64 and reject the field.
        let response_format = model
            .starts_with("dall-e")
            .then(|| "b64_json".to_string());

        Self {
            model,
            prompt: prompt.into(),
            n: 1,
            size: ImageSize::default(),
            response_format,
        }
    }

    pub fn with_size(mut self, size: ImageSize) -> Self {
        self.size = size;
        self
    }

    /// Sets `n` unchecked; the API rejects counts it does not support.
    pub fn with_count(mut self, n: u32) -> Self {
        self.n = n;
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageData {
    #[serde(default)]
    pub b64_json: Option<String>,
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub data: Option<Vec<ImageData>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

/// Decoded output of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub model: String,
    pub revised_prompt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_size_wire_names() {
        for size in [
            ImageSize::Auto,
            ImageSize::Square1024,
            ImageSize::Portrait1536,
            ImageSize::Landscape1792,
        ] {
            assert_eq!(serde_json::to_value(size).unwrap(), size.as_str());
        }
        assert_eq!(ImageSize::default(), ImageSize::Square1024);
        assert_eq!(ImageSize::Square512.to_string(), "512x512");
    }

    #[test]
    fn test_request_serialization() {
        let request = ImageGenerationRequest::new("gpt-image-1", "a red balloon")
            .with_size(ImageSize::Landscape1536)
            .with_count(2);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "gpt-image-1",
                "prompt": "a red balloon",
                "n": 2,
                "size": "1536x1024"
            })
        );

        let dalle = ImageGenerationRequest::new("dall-e-3", "a red balloon").with_count(0);
        let value = serde_json::to_value(&dalle).unwrap();
        assert_eq!(value["response_format"], "b64_json");
        assert_eq!(value["n"], 0);
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let empty: ImageGenerationResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.data.is_none());

        let partial: ImageGenerationResponse =
            serde_json::from_str(r#"{"created": 1, "data": [{"url": "https://x"}]}"#).unwrap();
        let data = partial.data.unwrap();
        assert!(data[0].b64_json.is_none());
        assert!(data[0].revised_prompt.is_none());
    }
}
