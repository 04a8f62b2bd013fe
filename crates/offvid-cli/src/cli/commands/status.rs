//! `offvid status` – show the message and available actions.

use anyhow::Result;
use offvid_core::config::OffvidConfig;
use offvid_core::connectivity::Connectivity;
use offvid_core::page::PageView;
use offvid_core::store::VideoStore;

use super::{controller, print_view};

pub async fn run_status(store: &VideoStore, cfg: &OffvidConfig, signal: &Connectivity) -> Result<()> {
    let mut controller = controller(store, cfg);
    let has_downloaded = controller.has_download().await?;
    print_view(&PageView::derive(has_downloaded, signal.is_online()));
    Ok(())
}
