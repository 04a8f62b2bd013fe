//! `offvid watch` – play the stored video, then release the playback file.

use anyhow::{Context, Result};
use offvid_core::config::OffvidConfig;
use offvid_core::store::VideoStore;

use super::controller;

pub async fn run_watch(store: &VideoStore, cfg: &OffvidConfig, player: Option<&str>) -> Result<()> {
    let mut controller = controller(store, cfg);
    controller.has_download().await?;
    let source = controller.prepare_playback()?;

    match player {
        Some(player) => {
            tracing::info!(player, path = %source.path().display(), "launching player");
            let status = tokio::process::Command::new(player)
                .arg(source.path())
                .status()
                .await
                .with_context(|| format!("failed to launch player `{player}`"))?;
            if !status.success() {
                tracing::warn!(player, %status, "player exited with failure");
            }
        }
        None => {
            println!("{}", source.url());
            println!("({}, {} bytes) Press Ctrl-C to stop.", source.mime_type(), source.len());
            tokio::signal::ctrl_c()
                .await
                .context("waiting for Ctrl-C")?;
        }
    }

    source.revoke().context("failed to release playback file")?;
    Ok(())
}
