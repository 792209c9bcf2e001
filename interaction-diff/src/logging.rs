//! Logging setup for the command line tool.
//!
//! Log events go to stderr so they never mix with the report on stdout.

use std::{io, sync::Once};
use tracing_subscriber::EnvFilter;

static INIT_ONCE: Once = Once::new();

fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over
/// `verbosity`; calling this more than once has no effect.
pub fn init(verbosity: u8) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("interaction_diff={}", default_level(verbosity)))
        });

        let _ = tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(filter)
            .try_init();
    });
}
