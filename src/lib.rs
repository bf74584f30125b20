pub mod bot;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod openai;
pub mod storage;

pub use commands::{Acknowledge, Followup, ImageCommand, Invoker, Reply};
pub use config::{Config, DiscordConfig, OpenAIConfig, StorageConfig};
pub use error::{BotError, GenerationError, GenerationErrorKind, ProviderError, Result};
pub use models::{GeneratedImage, ImageSize};
pub use openai::{ImageGenerationClient, ImageProvider, OpenAIImageProvider};
pub use storage::{ImageStore, LocalImageStore};
