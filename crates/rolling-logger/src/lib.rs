//! Rolling Logger
//!
//! Installs a `tracing` subscriber that logs to stderr and to a size-capped
//! set of files in a log directory:
//! `<app>.log` (current), `<app>.log.1`, ..., `<app>.log.<max_files - 1>`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INITIALIZED: OnceLock<String> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Failed to open log file in '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid log filter '{0}'")]
    Filter(String),
    #[error("Logger already initialized: {0}")]
    Init(String),
    #[error("Logger not initialized")]
    NotInitialized,
}

/// Rotation and filter settings
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Filter directive used when `RUST_LOG` is not set
    pub level: String,
    /// Size at which the current file is rotated
    pub max_file_bytes: u64,
    /// Total number of files kept, current one included
    pub max_files: usize,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            max_file_bytes: 1024 * 1024,
            max_files: 5,
        }
    }
}

/// Size-rotated log file
pub struct RollingFile {
    dir: PathBuf,
    base_name: String,
    file: File,
    written: u64,
    max_file_bytes: u64,
    max_files: usize,
}

impl RollingFile {
    pub fn open(dir: &Path, app_name: &str, options: &LogOptions) -> io::Result<Self> {
        fs::create_dir_all(dir)?;

        let base_name = format!("{}.log", app_name);
        let path = dir.join(&base_name);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();

        Ok(Self {
            dir: dir.to_path_buf(),
            base_name,
            file,
            written,
            max_file_bytes: options.max_file_bytes.max(1),
            max_files: options.max_files.max(1),
        })
    }

    /// Path of the file at `index` (0 = current)
    pub fn path(&self, index: usize) -> PathBuf {
        if index == 0 {
            self.dir.join(&self.base_name)
        } else {
            self.dir.join(format!("{}.{}", self.base_name, index))
        }
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        for index in (1..self.max_files).rev() {
            let src = self.path(index - 1);
            if !src.exists() {
                continue;
            }
            let dst = self.path(index);
            if dst.exists() {
                fs::remove_file(&dst)?;
            }
            fs::rename(&src, &dst)?;
        }

        // With max_files == 1 nothing was renamed and the file is truncated
        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.path(0))?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_file_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Initialize global logging to stderr and `<log_dir>/<app_name>.log`
pub fn init_logger(log_dir: PathBuf, app_name: &str, options: &LogOptions) -> Result<(), LoggerError> {
    let mut file = RollingFile::open(&log_dir, app_name, options).map_err(|source| LoggerError::Io {
        path: log_dir.clone(),
        source,
    })?;

    let header = format!(
        "=== {} started {} ===\n",
        app_name,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f")
    );
    file.write_all(header.as_bytes()).map_err(|source| LoggerError::Io {
        path: log_dir.clone(),
        source,
    })?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&options.level))
        .map_err(|_| LoggerError::Filter(options.level.clone()))?;

    let stderr_layer = fmt::layer().with_target(true).with_writer(io::stderr);
    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggerError::Init(e.to_string()))?;

    let _ = INITIALIZED.set(app_name.to_string());
    tracing::info!(dir = %log_dir.display(), "logger initialized");
    Ok(())
}

fn ensure_initialized() -> Result<(), LoggerError> {
    INITIALIZED.get().map(|_| ()).ok_or(LoggerError::NotInitialized)
}

/// Log an info message through the installed logger
pub fn info(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::info!("{}", msg);
    Ok(())
}

/// Log an error message through the installed logger
pub fn error(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::error!("{}", msg);
    Ok(())
}
