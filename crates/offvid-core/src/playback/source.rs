//! Media-typed payload and the transient file that exposes it to a player.

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use url::Url;

/// MIME type the stored video is served as unless configured otherwise.
pub const DEFAULT_MIME_TYPE: &str = "video/mp4";

/// Binary payload tagged with a media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBlob {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl MediaBlob {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        MediaBlob {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// File extension players expect for this media type.
    pub fn extension(&self) -> &'static str {
        let essence = self
            .mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "video/mp4" => "mp4",
            "video/webm" => "webm",
            "video/ogg" => "ogv",
            "video/quicktime" => "mov",
            "video/x-matroska" => "mkv",
            _ => "bin",
        }
    }
}

/// A revocable, renderable reference to a [`MediaBlob`].
///
/// Backed by a temp file in `dir`; the file is removed on [`revoke`](Self::revoke)
/// or drop. Never persisted.
#[derive(Debug)]
pub struct PlaybackSource {
    file: NamedTempFile,
    url: Url,
    mime_type: String,
    len: u64,
}

impl PlaybackSource {
    pub(crate) fn materialize(blob: &MediaBlob, dir: &Path) -> std::io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("offvid-")
            .suffix(&format!(".{}", blob.extension()))
            .tempfile_in(dir)?;
        file.write_all(&blob.bytes)?;
        file.flush()?;

        let url = Url::from_file_path(file.path()).map_err(|()| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not an absolute path: {}", file.path().display()),
            )
        })?;

        Ok(PlaybackSource {
            file,
            url,
            mime_type: blob.mime_type.clone(),
            len: blob.len() as u64,
        })
    }

    /// `file://` URL a player can open.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Byte length of the underlying payload.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Release the reference now, deleting the backing file.
    pub fn revoke(self) -> std::io::Result<()> {
        let path = self.file.path().to_path_buf();
        self.file.close()?;
        tracing::debug!(path = %path.display(), "playback source revoked");
        Ok(())
    }
}
