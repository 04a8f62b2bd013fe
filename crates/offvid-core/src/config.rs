use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetch::FetchOptions;
use crate::playback::DEFAULT_MIME_TYPE;
use crate::store::DATABASE_NAME;

/// Sample video fetched by `offvid download` when no URL is given.
pub const DEFAULT_VIDEO_URL: &str =
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/WeAreGoingOnBullrun.mp4";

/// Global configuration loaded from `~/.config/offvid/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffvidConfig {
    /// URL of the video to download.
    pub video_url: String,
    /// Media type the stored payload is played back as.
    pub mime_type: String,
    /// Database name; the file is `<name>.db` under the XDG state dir.
    pub database_name: String,
    /// URL probed with HEAD to decide whether we are online.
    pub probe_url: String,
    pub probe_interval_secs: u64,
    pub probe_timeout_secs: u64,
    /// Player command launched by `offvid watch` with the file path as its
    /// only argument (e.g. "mpv"). If missing, the URL is printed instead.
    #[serde(default)]
    pub player: Option<String>,
    /// Asset URLs kept warm by the background cache worker.
    #[serde(default)]
    pub assets: Vec<String>,
    /// How long a command waits for the asset worker before exiting.
    #[serde(default = "default_asset_grace_secs")]
    pub asset_grace_secs: u64,
    /// Optional transfer limits; if missing, built-in defaults are used.
    #[serde(default)]
    pub fetch: Option<FetchOptions>,
}

impl Default for OffvidConfig {
    fn default() -> Self {
        Self {
            video_url: DEFAULT_VIDEO_URL.to_string(),
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            database_name: DATABASE_NAME.to_string(),
            probe_url: "https://commondatastorage.googleapis.com/".to_string(),
            probe_interval_secs: 5,
            probe_timeout_secs: 5,
            player: None,
            assets: Vec::new(),
            asset_grace_secs: default_asset_grace_secs(),
            fetch: None,
        }
    }
}

fn default_asset_grace_secs() -> u64 {
    10
}

impl OffvidConfig {
    pub fn fetch_options(&self) -> FetchOptions {
        self.fetch.unwrap_or_default()
    }

    pub fn asset_grace(&self) -> Duration {
        Duration::from_secs(self.asset_grace_secs.max(1))
    }

    /// Transfer limits for asset fetches: no single fetch may outlive the
    /// grace period, so an aborted worker leaves no transfer behind.
    pub fn asset_fetch_options(&self) -> FetchOptions {
        let mut opts = self.fetch_options();
        let grace = self.asset_grace().as_secs();
        opts.timeout_secs = opts.timeout_secs.min(grace);
        opts.connect_timeout_secs = opts.connect_timeout_secs.min(grace);
        opts
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("offvid")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Cache directory for the asset worker (`~/.cache/offvid/assets`).
pub fn asset_cache_dir() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("offvid")?;
    Ok(xdg_dirs.get_cache_home().join("assets"))
}

/// Read `config.toml`; on first run write the defaults there and use them.
pub fn load_or_init() -> Result<OffvidConfig> {
    let path = config_path()?;
    match fs::read_to_string(&path) {
        Ok(data) => toml::from_str(&data)
            .with_context(|| format!("parse {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let cfg = OffvidConfig::default();
            write_config(&path, &cfg)?;
            tracing::info!(path = %path.display(), "wrote default config");
            Ok(cfg)
        }
        Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
    }
}

fn write_config(path: &Path, cfg: &OffvidConfig) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    fs::write(path, toml::to_string_pretty(cfg)?)
        .with_context(|| format!("write {}", path.display()))
}
