use crate::error::{CliError, Result};
use std::fs::File;
use std::path::Path;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

/// Maps the `-v`/`-q` flags to a level. `-q` still lets errors through.
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber: compact lines on stderr, plus a plain
/// copy with thread ids in `log_file` when one is given.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let log_copy = log_file
        .map(File::create)
        .transpose()
        .map_err(CliError::Io)?
        .map(|file| {
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_thread_ids(true)
        });

    tracing_subscriber::registry()
        .with(level_filter(verbosity, quiet))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .with(log_copy)
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Once;
    use tracing::{debug, info, warn};

    static GLOBAL: Once = Once::new();

    #[test]
    fn verbosity_flags_map_to_levels() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(7, false), LevelFilter::TRACE);
        assert_eq!(level_filter(0, true), LevelFilter::ERROR);
        assert_eq!(level_filter(3, true), LevelFilter::ERROR);
    }

    #[test]
    #[serial]
    fn global_subscriber_accepts_batch_events() {
        GLOBAL.call_once(|| {
            setup_logging(3, false, None).expect("global subscriber should install once");
        });
        warn!("Corpus 'empty.list' lists no entries.");
        info!("Last tested PDB entry was: {}", "1abc");
    }

    #[test]
    #[serial]
    fn log_copy_is_plain_text_with_thread_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.log");
        let file = File::create(&path).unwrap();
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_thread_ids(true),
        );

        tracing::subscriber::with_default(subscriber, || {
            debug!("Waived known exception for {}", "2bad");
        });

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Waived known exception for 2bad"));
        assert!(content.contains("ThreadId"));
        assert!(!content.contains('\u{1b}'));
    }

    #[test]
    #[serial]
    fn unwritable_log_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = setup_logging(0, false, Some(dir.path()));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
