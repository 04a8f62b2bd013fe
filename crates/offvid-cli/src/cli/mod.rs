//! CLI for offvid. Each subcommand stands in for one control of the page.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use offvid_core::config::{self, OffvidConfig};
use offvid_core::assets;
use offvid_core::connectivity::Connectivity;
use offvid_core::error::OfflineError;
use offvid_core::store::VideoStore;
use std::time::Duration;

use commands::{run_download, run_monitor, run_status, run_watch};

/// Top-level CLI for offvid.
#[derive(Debug, Parser)]
#[command(name = "offvid")]
#[command(about = "offvid: download a video once, watch it offline", long_about = None)]
pub struct Cli {
    /// Treat the network as down instead of probing it.
    #[arg(long, global = true, conflicts_with = "online")]
    pub offline: bool,

    /// Treat the network as up instead of probing it.
    #[arg(long, global = true)]
    pub online: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Show whether the video is downloaded and what you can do next.
    Status,

    /// Download the video and keep it in the local store.
    Download {
        /// Video URL (defaults to `video_url` from config.toml).
        #[arg(long)]
        url: Option<String>,
    },

    /// Play the downloaded video.
    Watch {
        /// Player command to open the video with (overrides `player` from config.toml).
        #[arg(long)]
        player: Option<String>,
    },

    /// Follow connectivity changes and re-render the status until Ctrl-C.
    Monitor,
}

/// Connectivity override from `--offline` / `--online`, if any.
fn forced_connectivity(offline: bool, online: bool) -> Option<bool> {
    match (offline, online) {
        (true, _) => Some(false),
        (false, true) => Some(true),
        (false, false) => None,
    }
}

async fn connectivity(forced: Option<bool>, cfg: &OffvidConfig) -> Connectivity {
    match forced {
        Some(online) => Connectivity::fixed(online),
        None => {
            let (signal, _probe) = Connectivity::spawn_probe(
                cfg.probe_url.clone(),
                Duration::from_secs(cfg.probe_interval_secs.max(1)),
                Duration::from_secs(cfg.probe_timeout_secs.max(1)),
            )
            .await;
            signal
        }
    }
}

/// Log label for a failed command: the store/playback error kind, or "other".
pub fn failure_kind(err: &anyhow::Error) -> &'static str {
    err.downcast_ref::<OfflineError>()
        .map(OfflineError::kind)
        .unwrap_or("other")
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let worker = assets::register(
            cfg.assets.clone(),
            config::asset_cache_dir()?,
            cfg.asset_fetch_options(),
        );

        let result = Self::dispatch(cli, &cfg).await;

        // Give the asset worker its grace period before the runtime goes away.
        worker.settle(cfg.asset_grace()).await;
        result
    }

    async fn dispatch(cli: Cli, cfg: &OffvidConfig) -> Result<()> {
        let store = VideoStore::open_default(&cfg.database_name)?;
        let forced = forced_connectivity(cli.offline, cli.online);

        match cli.command {
            CliCommand::Status => {
                let signal = connectivity(forced, cfg).await;
                run_status(&store, cfg, &signal).await
            }
            CliCommand::Download { url } => {
                let url = url.unwrap_or_else(|| cfg.video_url.clone());
                run_download(&store, cfg, &url).await
            }
            CliCommand::Watch { player } => {
                let player = player.or_else(|| cfg.player.clone());
                run_watch(&store, cfg, player.as_deref()).await
            }
            CliCommand::Monitor => {
                let signal = connectivity(forced, cfg).await;
                run_monitor(&store, cfg, &signal).await
            }
        }
    }
}

#[cfg(test)]
mod tests;
