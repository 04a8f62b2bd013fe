//! Which affordances the user surface shows for a given state, and a watcher
//! that re-derives them on every connectivity change.

use tokio::sync::watch;

use crate::connectivity::Connectivity;
use crate::error::OfflineError;
use crate::playback::{PlaybackController, StatusMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageView {
    pub message: StatusMessage,
    /// "You are offline" banner.
    pub offline_banner: bool,
    pub show_download: bool,
    pub show_watch: bool,
}

impl PageView {
    /// Watching is offered only offline; downloading only while nothing is
    /// stored and the network is up.
    pub fn derive(has_downloaded: bool, is_online: bool) -> Self {
        PageView {
            message: StatusMessage::derive(has_downloaded, is_online),
            offline_banner: !is_online,
            show_download: !has_downloaded && is_online,
            show_watch: !is_online,
        }
    }

    /// Text rendering used by the CLI.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.offline_banner {
            out.push("You are offline.".to_string());
        }
        if !self.message.text().is_empty() {
            out.push(self.message.text().to_string());
        }
        if self.show_download {
            out.push("[download]  offvid download".to_string());
        }
        if self.show_watch {
            out.push("[watch]     offvid watch".to_string());
        }
        out
    }
}

/// Follows a connectivity signal and yields a fresh [`PageView`] per change.
///
/// Each view re-reads the store first, so the controller's payload is current
/// when the signal flips to offline and the user goes to watch.
pub struct PageWatcher {
    controller: PlaybackController,
    rx: watch::Receiver<bool>,
    rendered: bool,
}

impl PageWatcher {
    pub fn new(controller: PlaybackController, signal: &Connectivity) -> Self {
        PageWatcher {
            controller,
            rx: signal.subscribe(),
            rendered: false,
        }
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    /// First call renders the current state; later calls wait for the next
    /// change. `Ok(None)` once every handle to the signal is gone.
    pub async fn next_view(&mut self) -> Result<Option<PageView>, OfflineError> {
        if self.rendered && self.rx.changed().await.is_err() {
            return Ok(None);
        }
        self.rendered = true;
        let online = *self.rx.borrow_and_update();
        let has_downloaded = self.controller.has_download().await?;
        Ok(Some(PageView::derive(has_downloaded, online)))
    }
}
