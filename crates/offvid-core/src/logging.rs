//! Tracing setup for the `offvid` binary.
//!
//! Events go to `offvid.log` in the XDG state dir. When that file cannot be
//! opened the caller switches to `init_logging_stderr`.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,offvid=debug,offvid_core=debug";

/// Per-event sink. A failed handle clone degrades to stderr for that event.
enum LogSink {
    Log(File),
    Stderr,
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::Log(f) => f.write(buf),
            LogSink::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::Log(f) => f.flush(),
            LogSink::Stderr => io::stderr().lock().flush(),
        }
    }
}

/// Hands every event its own clone of the append-mode log file.
struct LogFile(File);

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        match self.0.try_clone() {
            Ok(f) => LogSink::Log(f),
            Err(_) => LogSink::Stderr,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn open_log(dir: &Path) -> Result<File> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join("offvid.log");
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))
}

/// Log to `~/.local/state/offvid/offvid.log`.
pub fn init_logging() -> Result<()> {
    let log_dir = xdg::BaseDirectories::with_prefix("offvid")?.get_state_home();
    let file = open_log(&log_dir)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(BoxMakeWriter::new(LogFile(file)))
        .with_ansi(false)
        .init();

    tracing::info!(dir = %log_dir.display(), "offvid logging initialized");
    Ok(())
}

/// Log to stderr; the fallback when the log file is unavailable.
pub fn init_logging_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_log_creates_dir_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("state").join("offvid");
        let mut first = open_log(&log_dir).unwrap();
        first.write_all(b"one\n").unwrap();
        let mut second = open_log(&log_dir).unwrap();
        second.write_all(b"two\n").unwrap();
        let text = fs::read_to_string(log_dir.join("offvid.log")).unwrap();
        assert_eq!(text, "one\ntwo\n");
    }

    #[test]
    fn sink_writes_through_file_handle() {
        let dir = tempfile::tempdir().unwrap();
        let file = open_log(dir.path()).unwrap();
        let mut sink = LogFile(file).make_writer();
        sink.write_all(b"event\n").unwrap();
        sink.flush().unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("offvid.log")).unwrap(),
            "event\n"
        );
    }
}
