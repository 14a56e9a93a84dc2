//! Rolling file logger
//!
//! Installs a `tracing-subscriber` fmt layer that writes to `<app>.log` in a
//! log directory. When the file grows past a size limit it is rotated to
//! `<app>.log.1`, `<app>.log.2` and so on, oldest dropped. The most recent
//! lines are also kept in memory for display without touching the disk.
//!
//! Records emitted through the `log` facade are forwarded to the same layer.

mod writer;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::util::SubscriberInitExt;

pub use writer::RollingWriter;

/// Rotation and buffering limits
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Size at which the active file is rotated
    pub max_file_bytes: u64,
    /// Rotated files kept besides the active one
    pub max_files: usize,
    /// Lines kept in the in-memory buffer
    pub buffer_lines: usize,
    pub level: LevelFilter,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 5 * 1024 * 1024,
            max_files: 5,
            buffer_lines: 500,
            level: LevelFilter::INFO,
        }
    }
}

static WRITER: OnceLock<RollingWriter> = OnceLock::new();

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Initialize the global logger with default limits
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), String> {
    init_logger_with(log_dir, app_name, LoggerConfig::default())
}

pub fn init_logger_with(log_dir: impl AsRef<Path>, app_name: &str, config: LoggerConfig) -> Result<(), String> {
    if WRITER.get().is_some() {
        return Err("Logger already initialized".to_string());
    }

    let path = log_dir.as_ref().join(format!("{}.log", app_name));
    let writer = RollingWriter::open(&path, config.max_file_bytes, config.max_files, config.buffer_lines)
        .map_err(|e| format!("Failed to open log file {}: {}", path.display(), e))?;

    tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_ansi(false)
        .with_timer(LocalTimer)
        .with_max_level(config.level)
        .finish()
        .try_init()
        .map_err(|e| format!("Failed to install logger: {}", e))?;

    WRITER.set(writer).map_err(|_| "Logger already initialized".to_string())?;
    tracing::info!("Logging to {}", path.display());
    Ok(())
}

fn ensure_init() -> Result<(), String> {
    match WRITER.get() {
        Some(_) => Ok(()),
        None => Err("Logger not initialized".to_string()),
    }
}

pub fn info(message: &str) -> Result<(), String> {
    ensure_init()?;
    tracing::info!("{}", message);
    Ok(())
}

pub fn warn(message: &str) -> Result<(), String> {
    ensure_init()?;
    tracing::warn!("{}", message);
    Ok(())
}

pub fn error(message: &str) -> Result<(), String> {
    ensure_init()?;
    tracing::error!("{}", message);
    Ok(())
}

/// The newest lines written, oldest first. Empty before initialization.
pub fn recent_lines() -> Vec<String> {
    WRITER.get().map(|w| w.recent_lines()).unwrap_or_default()
}

/// Path of the active log file
pub fn log_file_path() -> Option<PathBuf> {
    WRITER.get().map(|w| w.path())
}
