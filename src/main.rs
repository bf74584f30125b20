use imagegen_bot::{
    bot, logger, Config, ImageCommand, ImageGenerationClient, LocalImageStore,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(logger::LoggerConfig::from_env())
        .map_err(imagegen_bot::BotError::Logger)?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ {}", e);
            return Err(e.into());
        }
    };
    logger::log_config_info(&config);

    log::info!("🖼️  Available image generation models:");
    for model in ImageGenerationClient::supported_models() {
        log::info!("  {} - {} ({})", model.id, model.name, model.provider);
    }

    let client = ImageGenerationClient::new(&config.openai)?;
    let store = Arc::new(LocalImageStore::from_config(&config.storage));
    let command = Arc::new(ImageCommand::new(client, store));

    log::info!("🔄 Connecting to Discord...");
    let mut discord = bot::build_client(&config.discord, command).await?;
    discord.start().await?;

    Ok(())
}
