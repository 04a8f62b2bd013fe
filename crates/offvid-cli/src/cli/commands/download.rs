//! `offvid download` – fetch the video and store it.

use anyhow::Result;
use offvid_core::config::OffvidConfig;
use offvid_core::download::download_video;
use offvid_core::playback::StatusMessage;
use offvid_core::store::VideoStore;

pub async fn run_download(store: &VideoStore, cfg: &OffvidConfig, url: &str) -> Result<()> {
    println!("Downloading video from {url}");
    let bytes = download_video(store, url, cfg.fetch_options()).await?;
    println!("Saved video ({bytes} bytes)");
    // We just fetched it, so the network is up.
    println!("{}", StatusMessage::derive(true, true));
    Ok(())
}
