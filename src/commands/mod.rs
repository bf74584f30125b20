pub mod image;
pub mod responder;

pub use image::ImageCommand;
pub use responder::{Acknowledge, Attachment, Followup, Invoker, Reply};
