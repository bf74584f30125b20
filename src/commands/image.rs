use crate::{
    commands::responder::{Acknowledge, Followup, Invoker, Reply},
    error::Result,
    models::image::ImageSize,
    openai::ImageGenerationClient,
    storage::{generated_filename, image_path, ImageStore},
};
use std::sync::Arc;

/// Prompts longer than this are shortened when echoed back to the user.
const MAX_PROMPT_ECHO_CHARS: usize = 1500;

/// The `/image` slash command.
pub struct ImageCommand {
    client: ImageGenerationClient,
    store: Arc<dyn ImageStore>,
}

impl ImageCommand {
    pub const NAME: &'static str = "image";
    pub const DESCRIPTION: &'static str = "Generate an image with OpenAI.";
    pub const PROMPT_OPTION: &'static str = "prompt";
    pub const PROMPT_DESCRIPTION: &'static str = "Describe the image you want to generate.";

    pub fn new(client: ImageGenerationClient, store: Arc<dyn ImageStore>) -> Self {
        Self { client, store }
    }

    /// Defers `interaction`, generates the image and sends the single follow-up.
    ///
    /// Generation and storage failures end up in the follow-up text; only
    /// failures to talk to Discord are returned.
    pub async fn run<A: Acknowledge>(
        &self,
        interaction: A,
        invoker: &Invoker,
        prompt: &str,
    ) -> Result<()> {
        println!("Generating image...");

        let followup = interaction.defer().await?;
        let reply = self.respond(invoker, prompt).await;
        followup.send(reply).await
    }

    async fn respond(&self, invoker: &Invoker, prompt: &str) -> Reply {
        let shown_prompt = echo_prompt(prompt);

        let image = match self
            .client
            .generate_image(prompt, ImageSize::default(), 1)
            .await
        {
            Ok(image) => image,
            Err(e) => {
                return Reply::text(format!(
                    "{}: Image generation failed\n\nprompt: *{}*\n\n{}",
                    invoker.mention, shown_prompt, e
                ));
            }
        };

        let filename = generated_filename();
        let relative = image_path(&invoker.display_name, &filename);
        let content = format!(
            "Image generated for {}:\nPrompt: *{}*\n`{}`.",
            invoker.mention, shown_prompt, filename
        );

        if let Some(revised) = &image.revised_prompt {
            log::debug!(model = image.model.as_str(); "Provider revised prompt: {}", revised);
        }

        match self.store.write_bytes(&relative, &image.bytes).await {
            Ok(path) => {
                log::info!(model = image.model.as_str(); "Generated image: {}", path.display());
                Reply::text(content).with_attachment(filename, image.bytes)
            }
            Err(e) => {
                let path = relative.display().to_string();
                log::error!(path = path.as_str(); "Failed to save image: {}", e);
                Reply::text(format!("{}\n\nFailed to save to disk.\n\n{}", content, e))
                    .with_attachment(filename, image.bytes)
            }
        }
    }
}

fn echo_prompt(prompt: &str) -> String {
    if prompt.chars().count() <= MAX_PROMPT_ECHO_CHARS {
        return prompt.to_string();
    }
    let mut shown: String = prompt.chars().take(MAX_PROMPT_ECHO_CHARS).collect();
    shown.push('…');
    shown
}
