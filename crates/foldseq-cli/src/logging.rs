use crate::error::{CliError, Result};
use std::fs::File;
use std::path::Path;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn create_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    File::create(path).map_err(CliError::Io)
}

/// Installs the global subscriber: compact stderr output plus an optional
/// plain-text copy in `log_file`. `quiet` wins over any verbosity.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .without_time()
        .compact();

    let file_layer = match log_file {
        Some(path) => Some(
            fmt::layer()
                .with_writer(create_log_file(path)?)
                .with_ansi(false)
                .with_thread_ids(true)
                .with_target(true),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(level_for(verbosity, quiet))
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to install logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Once;
    use tracing::{debug, info, warn};

    static INIT: Once = Once::new();

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for(0, false), LevelFilter::WARN);
        assert_eq!(level_for(1, false), LevelFilter::INFO);
        assert_eq!(level_for(2, false), LevelFilter::DEBUG);
        assert_eq!(level_for(7, false), LevelFilter::TRACE);
        assert_eq!(level_for(3, true), LevelFilter::OFF);
    }

    #[test]
    #[serial]
    fn global_logger_accepts_macros() {
        INIT.call_once(|| {
            setup_logging(3, false, None).expect("Failed to set up global logger for tests");
        });
        warn!("warning from test");
        info!("info from test");
        debug!("debug from test");
    }

    #[test]
    #[serial]
    fn file_layer_writes_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("nested").join("run.log");
        let file = create_log_file(&log_path).unwrap();

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_thread_ids(true),
        );
        tracing::subscriber::with_default(subscriber, || {
            info!("Frame 3 written");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Frame 3 written"));
        assert!(content.contains("INFO"));
        assert!(content.contains("ThreadId"));
    }

    #[test]
    fn log_file_pointing_at_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = create_log_file(dir.path());
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
