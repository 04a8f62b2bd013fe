//! `offvid monitor` – re-render the status whenever connectivity changes.

use anyhow::Result;
use offvid_core::config::OffvidConfig;
use offvid_core::connectivity::Connectivity;
use offvid_core::page::PageWatcher;
use offvid_core::store::VideoStore;

use super::{controller, print_view};

pub async fn run_monitor(store: &VideoStore, cfg: &OffvidConfig, signal: &Connectivity) -> Result<()> {
    let mut pages = PageWatcher::new(controller(store, cfg), signal);

    loop {
        tokio::select! {
            view = pages.next_view() => match view? {
                Some(view) => {
                    println!("--- {}", if view.offline_banner { "offline" } else { "online" });
                    print_view(&view);
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}
