//! CLI command handlers, one per file.

mod download;
mod monitor;
mod status;
mod watch;

pub use download::run_download;
pub use monitor::run_monitor;
pub use status::run_status;
pub use watch::run_watch;

use offvid_core::config::OffvidConfig;
use offvid_core::page::PageView;
use offvid_core::playback::PlaybackController;
use offvid_core::store::VideoStore;

fn controller(store: &VideoStore, cfg: &OffvidConfig) -> PlaybackController {
    PlaybackController::new(store.clone()).with_mime_type(cfg.mime_type.clone())
}

fn print_view(view: &PageView) {
    for line in view.lines() {
        println!("{line}");
    }
}
