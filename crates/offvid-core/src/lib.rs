pub mod config;
pub mod logging;

pub mod assets;
pub mod connectivity;
pub mod download;
pub mod error;
pub mod fetch;
pub mod page;
pub mod playback;
pub mod store;
