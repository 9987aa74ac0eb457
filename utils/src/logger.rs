use slog::o;
use slog::Drain;
use slog::Level;
use slog::LevelFilter;
#[cfg(all(target_os = "linux", feature = "journald"))]
use slog_journald::JournaldDrain;
#[cfg(feature = "syslog")]
use slog_syslog::Facility;

use std::fs::OpenOptions;
use std::path::Path;

use super::error::Result;
use crate::app_config::{AppConfig, LogConfig};

/// Install the diagnostics logger globally and route the `log` facade into it.
///
/// Diagnostics go to stderr (and optionally a file). Stdout is left to the
/// synchronization event stream.
pub fn setup_logging() -> Result<slog_scope::GlobalLoggerGuard> {
    let config = AppConfig::get::<LogConfig>("log").ok();
    let guard = slog_scope::set_global_logger(default_root_logger(config.as_ref())?);
    slog_stdlog::init_with_level(log_level_filter(config.as_ref()))?;

    Ok(guard)
}

pub fn default_root_logger(config: Option<&LogConfig>) -> Result<slog::Logger> {
    let level = parse_level(config.map(|c| c.level.as_str()).unwrap_or("warn"));

    let term_drain = default_term_drain()?;

    let file_drain = match config.and_then(|c| c.file.as_deref()) {
        Some(path) => default_file_drain(Path::new(path))?,
        None => default_discard()?,
    };

    let drain = slog::Duplicate(term_drain, file_drain).fuse();

    #[cfg(feature = "syslog")]
    let drain = slog::Duplicate(default_syslog_drain().unwrap_or(default_discard()?), drain).fuse();
    #[cfg(feature = "journald")]
    #[cfg(target_os = "linux")]
    let drain = slog::Duplicate(
        default_journald_drain().unwrap_or(default_discard()?),
        drain,
    )
    .fuse();

    let drain = LevelFilter::new(drain, level).fuse();

    Ok(slog::Logger::root(drain, o!("app" => "folder-mirror")))
}

/// Unknown names fall back to `warn`.
pub fn parse_level(name: &str) -> Level {
    match name.to_ascii_lowercase().as_str() {
        "trace" => Level::Trace,
        "debug" => Level::Debug,
        "info" => Level::Info,
        "warn" | "warning" => Level::Warning,
        "error" => Level::Error,
        "critical" => Level::Critical,
        _ => Level::Warning,
    }
}

fn log_level_filter(config: Option<&LogConfig>) -> log::Level {
    match parse_level(config.map(|c| c.level.as_str()).unwrap_or("warn")) {
        Level::Trace => log::Level::Trace,
        Level::Debug => log::Level::Debug,
        Level::Info => log::Level::Info,
        Level::Warning => log::Level::Warn,
        Level::Error | Level::Critical => log::Level::Error,
    }
}

fn default_discard() -> Result<slog_async::Async> {
    let drain = slog_async::Async::new(slog::Discard).chan_size(1024).build();

    Ok(drain)
}

// term drain: Log to stderr
#[cfg(not(feature = "termlog"))]
fn default_term_drain() -> Result<slog_async::Async> {
    let plain = slog_term::PlainSyncDecorator::new(std::io::stderr());
    let term = slog_term::FullFormat::new(plain).use_custom_timestamp(slog_term::timestamp_local);

    let drain = slog_async::Async::new(term.build().fuse())
        .chan_size(1024)
        .build();

    Ok(drain)
}

// term drain: colored, with file locations
#[cfg(feature = "termlog")]
fn default_term_drain() -> Result<slog_async::Async> {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let term = slog_term::FullFormat::new(decorator)
        .use_file_location()
        .use_custom_timestamp(slog_term::timestamp_local);

    let drain = slog_async::Async::new(term.build().fuse())
        .chan_size(1024)
        .build();

    Ok(drain)
}

// file drain: Log to file
fn default_file_drain(path: &Path) -> Result<slog_async::Async> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let decorator = slog_term::PlainSyncDecorator::new(file);
    let formatter = slog_term::FullFormat::new(decorator)
        .use_file_location()
        .use_custom_timestamp(slog_term::timestamp_local)
        .build()
        .fuse();

    let drain = slog_async::Async::new(formatter).chan_size(1024).build();

    Ok(drain)
}

// syslog drain: Log to syslog
#[cfg(feature = "syslog")]
fn default_syslog_drain() -> Result<slog_async::Async> {
    let syslog = slog_syslog::unix_3164(Facility::LOG_USER)?;

    let drain = slog_async::Async::new(syslog.fuse()).chan_size(1024).build();

    Ok(drain)
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn default_journald_drain() -> Result<slog_async::Async> {
    let journald = JournaldDrain.ignore_res();
    let drain = slog_async::Async::new(journald).chan_size(1024).build();

    Ok(drain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::Debug);
        assert_eq!(parse_level("INFO"), Level::Info);
        assert_eq!(parse_level("warning"), Level::Warning);
        assert_eq!(parse_level("nonsense"), Level::Warning);
    }

    #[test]
    fn test_file_drain_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig {
            level: "info".to_string(),
            file: Some(dir.path().join("diag/run.log").to_string_lossy().into_owned()),
        };

        let logger = default_root_logger(Some(&config)).unwrap();
        slog::info!(logger, "hello");
        drop(logger);

        assert!(dir.path().join("diag/run.log").exists());
    }
}
