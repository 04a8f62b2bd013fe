//! Status text shown to the user, derived from two booleans.

use std::fmt;

/// What the status region should say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMessage {
    /// Nothing stored yet.
    PromptDownload,
    /// Stored, but still online: watching is for offline use.
    PromptGoOffline,
    /// Stored and offline: nothing to say, ready to watch.
    Ready,
}

impl StatusMessage {
    pub fn derive(has_downloaded: bool, is_online: bool) -> Self {
        match (has_downloaded, is_online) {
            (false, _) => StatusMessage::PromptDownload,
            (true, true) => StatusMessage::PromptGoOffline,
            (true, false) => StatusMessage::Ready,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            StatusMessage::PromptDownload => {
                "You haven't downloaded the video yet. Run `offvid download` to download it."
            }
            StatusMessage::PromptGoOffline => {
                "Video is downloaded, turn off your internet to watch it."
            }
            StatusMessage::Ready => "",
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
