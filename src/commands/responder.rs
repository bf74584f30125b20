//! Two-phase interaction replies.
//!
//! A command first acknowledges its interaction with [`Acknowledge::defer`],
//! then sends exactly one terminal [`Reply`] through the returned
//! [`Followup`]. Both steps take `self` by value, so a handle cannot be
//! deferred twice or answered twice.

use crate::error::Result;
use async_trait::async_trait;

/// Discord rejects message content longer than this many characters.
pub const MAX_CONTENT_CHARS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    pub attachment: Option<Attachment>,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: truncate_content(content.into()),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.attachment = Some(Attachment {
            filename: filename.into(),
            bytes,
        });
        self
    }
}

/// The user who invoked a command, as it should appear in replies and on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoker {
    pub mention: String,
    pub display_name: String,
}

#[async_trait]
pub trait Acknowledge: Send {
    type Followup: Followup;

    async fn defer(self) -> Result<Self::Followup>;
}

#[async_trait]
pub trait Followup: Send {
    async fn send(self, reply: Reply) -> Result<()>;
}

fn truncate_content(content: String) -> String {
    if content.chars().count() <= MAX_CONTENT_CHARS {
        return content;
    }

    let mut truncated: String = content.chars().take(MAX_CONTENT_CHARS - 1).collect();
    truncated.push('…');
    truncated
}
