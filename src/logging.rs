//! Logging setup for the command line tool, using `tracing` and
//! `tracing-subscriber`. Everything goes to stderr so stdout stays free for
//! the CSV output.

use std::io;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Maps the `-q`/`-v` flags to a level.
///
/// - `-q`: errors only
/// - none: warnings
/// - `-v`: info, `-vv`: debug, `-vvv` and up: trace
pub fn level_from_flags(verbosity: u8, quiet: bool) -> LevelFilter {
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

/// Installs the global subscriber. `RUST_LOG` is honoured only when no
/// flag was given.
pub fn init_logging(
    verbosity: u8,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let level = level_from_flags(verbosity, quiet);

    let filter = if verbosity == 0 && !quiet {
        EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy()
    } else {
        EnvFilter::default().add_directive(level.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::level_from_flags;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_levels() {
        assert_eq!(level_from_flags(0, false), LevelFilter::WARN);
        assert_eq!(level_from_flags(1, false), LevelFilter::INFO);
        assert_eq!(level_from_flags(2, false), LevelFilter::DEBUG);
        assert_eq!(level_from_flags(7, false), LevelFilter::TRACE);
        assert_eq!(level_from_flags(3, true), LevelFilter::ERROR);
    }
}
