//! Logger initialization for the viewer.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Once;

use crate::error::ViewerError;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "warn",
/// "rtt_core=debug,rtt_terminal=info"). Without a `file` the log goes to
/// stderr.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub file: Option<PathBuf>,
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) -> Result<(), ViewerError> {
    // Opening the file would truncate it even when the call is ignored
    if INIT.is_completed() {
        return Ok(());
    }

    let target = match &config.file {
        Some(path) => env_logger::Target::Pipe(Box::new(File::create(path)?)),
        None => env_logger::Target::Stderr,
    };

    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = &config.env_filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Warn);
        }

        builder.target(target);
        // Another logger may already be installed, e.g. by a test harness
        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });

    Ok(())
}
