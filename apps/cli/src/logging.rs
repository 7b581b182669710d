use std::sync::Once;

use tracing_subscriber::{EnvFilter, filter::LevelFilter};

static INIT_LOGGER: Once = Once::new();

/// Logs go to stderr so `--json` output on stdout stays clean. `RUST_LOG` wins over
/// the verbosity flag.
pub fn init_logger_once(verbosity: u8) {
    INIT_LOGGER.call_once(|| {
        let default_level = match verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            _ => LevelFilter::DEBUG,
        };
        let env_filter = EnvFilter::builder()
            .with_default_directive(default_level.into())
            .from_env_lossy();
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
