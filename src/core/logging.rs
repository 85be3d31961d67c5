//! Logging setup shared by the server and the CLI.
//!
//! Everything goes to stderr: stdout carries MCP frames for the server and
//! the JSON result for the CLI.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

/// Parse a level name, falling back to `default` for anything unknown.
pub fn parse_level(level: &str, default: Level) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => default,
    }
}

/// Initialize the logging subsystem.
///
/// Configures tracing with the specified log level; `RUST_LOG` directives
/// are honoured on top of it. Calling this twice is a no-op.
pub fn init_logging(level: Level, with_timestamps: bool) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    let _ = if with_timestamps {
        builder.try_init()
    } else {
        builder.without_time().try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG", Level::INFO), Level::DEBUG);
        assert_eq!(parse_level("warn", Level::INFO), Level::WARN);
        assert_eq!(parse_level("loud", Level::WARN), Level::WARN);
    }
}
