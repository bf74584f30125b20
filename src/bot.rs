//! Serenity glue for the `/image` command.
use crate::{
    commands::{Acknowledge, Followup, ImageCommand, Invoker, Reply},
    config::DiscordConfig,
    error::Result,
};
use async_trait::async_trait;
use serenity::all::{
    Command, CommandInteraction, CommandOptionType, Context, CreateAttachment, CreateCommand,
    CreateCommandOption, CreateInteractionResponseFollowup, EventHandler, GatewayIntents,
    Interaction, Mentionable, Ready, ResolvedValue,
};
use std::sync::Arc;

/// A slash-command interaction that has not been acknowledged yet.
pub struct SerenityInteraction<'a> {
    ctx: &'a Context,
    command: &'a CommandInteraction,
}

/// An acknowledged interaction waiting for its follow-up.
pub struct SerenityFollowup<'a> {
    ctx: &'a Context,
    command: &'a CommandInteraction,
}

impl<'a> SerenityInteraction<'a> {
    pub fn new(ctx: &'a Context, command: &'a CommandInteraction) -> Self {
        Self { ctx, command }
    }
}

#[async_trait]
impl<'a> Acknowledge for SerenityInteraction<'a> {
    type Followup = SerenityFollowup<'a>;

    async fn defer(self) -> Result<Self::Followup> {
        self.command.defer(&self.ctx.http).await?;
        Ok(SerenityFollowup {
            ctx: self.ctx,
            command: self.command,
        })
    }
}

#[async_trait]
impl<'a> Followup for SerenityFollowup<'a> {
    async fn send(self, reply: Reply) -> Result<()> {
        let mut message = CreateInteractionResponseFollowup::new().content(reply.content);
        if let Some(attachment) = reply.attachment {
            message = message.add_file(CreateAttachment::bytes(
                attachment.bytes,
                attachment.filename,
            ));
        }

        self.command.create_followup(&self.ctx.http, message).await?;
        Ok(())
    }
}

/// Registration payload for `/image prompt:<text>`.
pub fn image_command() -> CreateCommand {
    CreateCommand::new(ImageCommand::NAME)
        .description(ImageCommand::DESCRIPTION)
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                ImageCommand::PROMPT_OPTION,
                ImageCommand::PROMPT_DESCRIPTION,
            )
            .required(true),
        )
}

fn invoker(command: &CommandInteraction) -> Invoker {
    let display_name = command
        .member
        .as_ref()
        .map(|member| member.display_name().to_string())
        .unwrap_or_else(|| command.user.display_name().to_string());

    Invoker {
        mention: command.user.mention().to_string(),
        display_name,
    }
}

fn prompt_option(command: &CommandInteraction) -> Option<String> {
    command
        .data
        .options()
        .into_iter()
        .find_map(|option| match option.value {
            ResolvedValue::String(value) if option.name == ImageCommand::PROMPT_OPTION => {
                Some(value.to_string())
            }
            _ => None,
        })
}

pub struct Handler {
    command: Arc<ImageCommand>,
}

impl Handler {
    pub fn new(command: Arc<ImageCommand>) -> Self {
        Self { command }
    }

    async fn dispatch(&self, ctx: &Context, command: &CommandInteraction) {
        if command.data.name != ImageCommand::NAME {
            log::debug!("Ignoring unknown command: {}", command.data.name);
            return;
        }

        let prompt = prompt_option(command).unwrap_or_else(|| {
            log::warn!("/{} invoked without a prompt", ImageCommand::NAME);
            String::new()
        });
        let invoker = invoker(command);

        if let Err(e) = self
            .command
            .run(SerenityInteraction::new(ctx, command), &invoker, &prompt)
            .await
        {
            log::error!(
                user = invoker.display_name.as_str();
                "Failed to answer /{} interaction: {}",
                ImageCommand::NAME,
                e
            );
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        log::info!("{} is connected!", ready.user.name);

        match Command::create_global_command(&ctx.http, image_command()).await {
            Ok(cmd) => log::info!("Registered global command: {}", cmd.name),
            Err(e) => log::error!("Failed to register command: {}", e),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            self.dispatch(&ctx, &command).await;
        }
    }
}

pub async fn build_client(
    config: &DiscordConfig,
    command: Arc<ImageCommand>,
) -> Result<serenity::Client> {
    let client = serenity::Client::builder(&config.token, GatewayIntents::non_privileged())
        .event_handler(Handler::new(command))
        .await?;

    Ok(client)
}
