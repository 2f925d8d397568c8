//! Process-wide logging bootstrap.
//!
//! # Responsibility
//! - Initialize rolling file logs exactly once per process.
//! - Capture panics as sanitized log events.
//!
//! # Invariants
//! - Re-initialization with the same level and directory is a no-op.
//! - Re-initialization with a different level or directory is rejected.
//! - Initialization never panics.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "notekeep";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

#[derive(Debug)]
pub enum LoggingError {
    UnsupportedLevel(String),
    InvalidDirectory(String),
    CreateDirectory { dir: PathBuf, source: std::io::Error },
    Conflict { active: String, requested: String },
    Backend(flexi_logger::FlexiLoggerError),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidDirectory(message) => write!(f, "{message}"),
            Self::CreateDirectory { dir, source } => write!(
                f,
                "failed to create log directory `{}`: {source}",
                dir.display()
            ),
            Self::Conflict { active, requested } => write!(
                f,
                "logging already initialized with {active}; refusing to switch to {requested}"
            ),
            Self::Backend(err) => write!(f, "failed to start logger: {err}"),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDirectory { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

/// Initializes file logging at `log_dir` with `level`.
///
/// # Errors
/// - `UnsupportedLevel` / `InvalidDirectory` for bad input.
/// - `Conflict` when already initialized with another level or directory.
/// - `CreateDirectory` / `Backend` when the file backend cannot start.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), LoggingError> {
    let level = normalize_level(level)?;
    let log_dir = normalize_log_dir(log_dir)?;

    let state = LOGGING_STATE.get_or_try_init(|| start_logger(level, &log_dir))?;
    ensure_same_config(state, level, &log_dir)
}

/// Returns `(level, log_dir)` once logging is active.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.log_dir.clone()))
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(level: &'static str, log_dir: &Path) -> Result<LoggingState, LoggingError> {
    std::fs::create_dir_all(log_dir).map_err(|source| LoggingError::CreateDirectory {
        dir: log_dir.to_path_buf(),
        source,
    })?;

    let logger = Logger::try_with_str(level)
        .map_err(LoggingError::Backend)?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(LoggingError::Backend)?;

    install_panic_hook_once();
    info!(
        "event=app_start module=core status=ok platform={} version={} level={level}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION"),
    );

    Ok(LoggingState {
        level,
        log_dir: log_dir.to_path_buf(),
        _logger: logger,
    })
}

fn ensure_same_config(
    state: &LoggingState,
    level: &'static str,
    log_dir: &Path,
) -> Result<(), LoggingError> {
    if state.log_dir != log_dir {
        return Err(LoggingError::Conflict {
            active: format!("directory `{}`", state.log_dir.display()),
            requested: format!("`{}`", log_dir.display()),
        });
    }
    if state.level != level {
        return Err(LoggingError::Conflict {
            active: format!("level `{}`", state.level),
            requested: format!("`{level}`"),
        });
    }
    Ok(())
}

fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::UnsupportedLevel(other.to_string())),
    }
}

fn normalize_log_dir(log_dir: &Path) -> Result<PathBuf, LoggingError> {
    if log_dir.as_os_str().is_empty() {
        return Err(LoggingError::InvalidDirectory(
            "log directory cannot be empty".to_string(),
        ));
    }
    if !log_dir.is_absolute() {
        return Err(LoggingError::InvalidDirectory(format!(
            "log directory must be absolute, got `{}`",
            log_dir.display()
        )));
    }
    Ok(log_dir.to_path_buf())
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        error!(
            "event=panic_captured module=core status=error location={location} payload={}",
            panic_payload_summary(panic_info)
        );
        previous_hook(panic_info);
    }));
}

fn panic_payload_summary(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = info
        .payload()
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| info.payload().downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
}

/// Flattens newlines and caps length so panic payloads stay one log line.
fn sanitize_message(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_level_accepts_known_values() {
        assert_eq!(normalize_level("INFO").unwrap(), "info");
        assert_eq!(normalize_level(" warning ").unwrap(), "warn");
        assert!(matches!(
            normalize_level("verbose"),
            Err(LoggingError::UnsupportedLevel(_))
        ));
    }

    #[test]
    fn normalize_log_dir_rejects_relative_and_empty_paths() {
        assert!(matches!(
            normalize_log_dir(Path::new("logs/dev")),
            Err(LoggingError::InvalidDirectory(_))
        ));
        assert!(matches!(
            normalize_log_dir(Path::new("")),
            Err(LoggingError::InvalidDirectory(_))
        ));
    }

    #[test]
    fn sanitize_message_removes_newlines_and_truncates() {
        let sanitized = sanitize_message("line1\nline2\rline3", 8);
        assert!(!sanitized.contains('\n'));
        assert!(!sanitized.contains('\r'));
        assert!(sanitized.ends_with("..."));
    }

    #[test]
    fn init_logging_is_idempotent_and_rejects_conflicts() {
        let log_dir = tempfile::tempdir().unwrap();
        let other_dir = tempfile::tempdir().unwrap();

        init_logging("info", log_dir.path()).unwrap();
        init_logging("INFO", log_dir.path()).unwrap();

        assert!(matches!(
            init_logging("debug", log_dir.path()),
            Err(LoggingError::Conflict { .. })
        ));
        assert!(matches!(
            init_logging("info", other_dir.path()),
            Err(LoggingError::Conflict { .. })
        ));

        let (active_level, active_dir) = logging_status().unwrap();
        assert_eq!(active_level, "info");
        assert_eq!(active_dir, log_dir.path());
    }
}
