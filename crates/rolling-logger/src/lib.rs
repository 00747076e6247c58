//! Rolling Logger
//!
//! File logger for the board store: size-rotated log files plus a bounded
//! in-memory tail of recent lines. `log` records are bridged into the same
//! `tracing` subscriber.

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use thiserror::Error;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("logger already initialized")]
    AlreadyInitialized,
    #[error("logger not initialized")]
    NotInitialized,
    #[error("log file error: {0}")]
    Io(#[from] io::Error),
}

/// Rotation and buffering limits
#[derive(Debug, Clone, Copy)]
pub struct RollingConfig {
    /// Rotate once the active file would grow past this many bytes
    pub max_file_bytes: u64,
    /// Rotated files kept next to the active one (`.1` is the newest)
    pub max_backups: usize,
    /// Lines kept in memory for `recent_lines`
    pub buffer_lines: usize,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 5 * 1024 * 1024,
            max_backups: 3,
            buffer_lines: 500,
        }
    }
}

struct RollingState {
    dir: PathBuf,
    stem: String,
    config: RollingConfig,
    file: File,
    written: u64,
    tail: VecDeque<String>,
    partial: String,
}

impl RollingState {
    fn active_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.stem))
    }

    fn backup_path(&self, n: usize) -> PathBuf {
        self.dir.join(format!("{}.log.{}", self.stem, n))
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.config.max_backups == 0 {
            self.file = File::create(self.active_path())?;
            self.written = 0;
            return Ok(());
        }

        let oldest = self.backup_path(self.config.max_backups);
        if oldest.exists() {
            std::fs::remove_file(&oldest)?;
        }
        for n in (1..self.config.max_backups).rev() {
            let from = self.backup_path(n);
            if from.exists() {
                std::fs::rename(&from, self.backup_path(n + 1))?;
            }
        }
        std::fs::rename(self.active_path(), self.backup_path(1))?;

        self.file = File::create(self.active_path())?;
        self.written = 0;
        Ok(())
    }

    fn remember(&mut self, buf: &[u8]) {
        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(idx) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=idx).collect();
            self.tail.push_back(line.trim_end().to_string());
            while self.tail.len() > self.config.buffer_lines {
                self.tail.pop_front();
            }
        }
    }
}

/// Writer shared by every subscriber call. Cloning shares the same file.
#[derive(Clone)]
pub struct RollingWriter {
    state: Arc<Mutex<RollingState>>,
}

impl RollingWriter {
    pub fn new(log_dir: &Path, app_name: &str, config: RollingConfig) -> Result<Self, LoggerError> {
        std::fs::create_dir_all(log_dir)?;
        let path = log_dir.join(format!("{}.log", app_name));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();

        Ok(Self {
            state: Arc::new(Mutex::new(RollingState {
                dir: log_dir.to_path_buf(),
                stem: app_name.to_string(),
                config,
                file,
                written,
                tail: VecDeque::with_capacity(config.buffer_lines.min(1024)),
                partial: String::new(),
            })),
        })
    }

    /// Most recent complete lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        self.lock().tail.iter().cloned().collect()
    }

    /// Path of the file currently being written
    pub fn active_path(&self) -> PathBuf {
        self.lock().active_path()
    }

    fn lock(&self) -> MutexGuard<'_, RollingState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.lock();
        if state.written > 0 && state.written + buf.len() as u64 > state.config.max_file_bytes {
            state.rotate()?;
        }
        state.file.write_all(buf)?;
        state.written += buf.len() as u64;
        state.remember(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().file.flush()
    }
}

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

static WRITER: OnceLock<RollingWriter> = OnceLock::new();

/// Install the global subscriber writing to `<log_dir>/<app_name>.log`
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), LoggerError> {
    init_logger_with(log_dir, app_name, RollingConfig::default())
}

pub fn init_logger_with(
    log_dir: PathBuf,
    app_name: &str,
    config: RollingConfig,
) -> Result<(), LoggerError> {
    if WRITER.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }
    let writer = RollingWriter::new(&log_dir, app_name, config)?;
    let make_writer = writer.clone();

    tracing_subscriber::fmt()
        .with_writer(move || make_writer.clone())
        .with_timer(LocalTimer)
        .with_ansi(false)
        .with_target(true)
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    WRITER
        .set(writer)
        .map_err(|_| LoggerError::AlreadyInitialized)?;
    tracing::info!(dir = %log_dir.display(), "rolling logger started");
    Ok(())
}

pub fn info(msg: &str) -> Result<(), LoggerError> {
    WRITER.get().ok_or(LoggerError::NotInitialized)?;
    tracing::info!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), LoggerError> {
    WRITER.get().ok_or(LoggerError::NotInitialized)?;
    tracing::error!("{}", msg);
    Ok(())
}

/// Recent lines from the global logger, empty before `init_logger`
pub fn recent_lines() -> Vec<String> {
    WRITER.get().map(RollingWriter::recent_lines).unwrap_or_default()
}
