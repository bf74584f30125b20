pub mod http;
pub mod image_client;
pub mod traits;

pub use http::OpenAIImageProvider;
pub use image_client::ImageGenerationClient;
pub use traits::ImageProvider;
