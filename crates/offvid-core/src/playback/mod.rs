//! Playback controller: decides whether a download is needed and turns the
//! stored payload into something a player can open.

mod controller;
mod message;
mod source;

pub use controller::PlaybackController;
pub use message::StatusMessage;
pub use source::{MediaBlob, PlaybackSource, DEFAULT_MIME_TYPE};
