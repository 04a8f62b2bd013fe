//! Reads the stored payload and hands out playback sources.

use std::path::PathBuf;

use super::message::StatusMessage;
use super::source::{MediaBlob, PlaybackSource, DEFAULT_MIME_TYPE};
use crate::error::OfflineError;
use crate::store::{VideoStore, VIDEO_KEY};

/// Holds the last payload retrieved from the store.
///
/// [`has_download`](Self::has_download) refreshes it; [`prepare_playback`](Self::prepare_playback)
/// only uses what was already retrieved.
pub struct PlaybackController {
    store: VideoStore,
    mime_type: String,
    playback_dir: PathBuf,
    payload: Option<MediaBlob>,
}

impl PlaybackController {
    pub fn new(store: VideoStore) -> Self {
        PlaybackController {
            store,
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            playback_dir: std::env::temp_dir(),
            payload: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Directory playback files are materialized in.
    pub fn with_playback_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.playback_dir = dir.into();
        self
    }

    pub fn store(&self) -> &VideoStore {
        &self.store
    }

    /// Query the store for the video and remember what came back.
    pub async fn has_download(&mut self) -> Result<bool, OfflineError> {
        let bytes = self.store.get(VIDEO_KEY).await?;
        self.payload = bytes.map(|b| MediaBlob::new(b, self.mime_type.clone()));
        tracing::debug!(
            present = self.payload.is_some(),
            bytes = self.payload.as_ref().map(MediaBlob::len).unwrap_or(0),
            "checked for downloaded video"
        );
        Ok(self.payload.is_some())
    }

    /// Whether the last lookup found a payload.
    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// Turn the retrieved payload into a playable reference.
    pub fn prepare_playback(&self) -> Result<PlaybackSource, OfflineError> {
        let blob = self.payload.as_ref().ok_or(OfflineError::NothingDownloaded)?;
        let source =
            PlaybackSource::materialize(blob, &self.playback_dir).map_err(OfflineError::Playback)?;
        tracing::info!(
            url = %source.url(),
            bytes = source.len(),
            mime = source.mime_type(),
            "playback source ready"
        );
        Ok(source)
    }

    /// Status text for the current payload and network state.
    pub fn message(&self, is_online: bool) -> StatusMessage {
        StatusMessage::derive(self.has_payload(), is_online)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(dir: &std::path::Path) -> PlaybackController {
        PlaybackController::new(VideoStore::in_memory()).with_playback_dir(dir)
    }

    #[tokio::test]
    async fn fresh_store_prompts_download_then_download_flips_presence() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(dir.path());

        assert!(!c.has_download().await.unwrap());
        assert_eq!(c.message(true), StatusMessage::PromptDownload);

        c.store().put(VIDEO_KEY, b"video bytes").await.unwrap();
        assert!(c.has_download().await.unwrap());
        assert_eq!(c.message(true), StatusMessage::PromptGoOffline);
        assert_eq!(c.message(false), StatusMessage::Ready);
    }

    #[tokio::test]
    async fn prepare_playback_length_matches_stored_payload() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(dir.path());
        let body: Vec<u8> = (0u8..100).cycle().take(4096 + 17).collect();
        c.store().put(VIDEO_KEY, &body).await.unwrap();
        assert!(c.has_download().await.unwrap());

        let source = c.prepare_playback().unwrap();
        assert_eq!(source.len(), body.len() as u64);
        assert_eq!(
            std::fs::metadata(source.path()).unwrap().len(),
            body.len() as u64
        );
        assert_eq!(source.mime_type(), DEFAULT_MIME_TYPE);
    }

    #[tokio::test]
    async fn prepare_playback_without_payload_is_nothing_downloaded() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(dir.path());
        assert!(matches!(
            c.prepare_playback(),
            Err(OfflineError::NothingDownloaded)
        ));

        c.has_download().await.unwrap();
        assert!(matches!(
            c.prepare_playback(),
            Err(OfflineError::NothingDownloaded)
        ));
    }

    #[tokio::test]
    async fn prepare_playback_uses_retrieved_payload_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(dir.path());
        // Stored but not yet retrieved.
        c.store().put(VIDEO_KEY, b"abc").await.unwrap();
        assert!(matches!(
            c.prepare_playback(),
            Err(OfflineError::NothingDownloaded)
        ));
        c.has_download().await.unwrap();
        assert_eq!(c.prepare_playback().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn configured_mime_type_is_carried_to_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(dir.path()).with_mime_type("video/webm");
        c.store().put(VIDEO_KEY, b"webm").await.unwrap();
        c.has_download().await.unwrap();
        let source = c.prepare_playback().unwrap();
        assert_eq!(source.mime_type(), "video/webm");
        assert!(source.path().to_string_lossy().ends_with(".webm"));
    }
}
