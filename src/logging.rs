//! Tracing initialization

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding per-target log directives
pub const LOG_ENV: &str = "VALUEKIT_LOG";

static INIT: Once = Once::new();

/// Default directive for a `-v` count: 0 warn, 1 info, 2+ debug
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "valuekit=warn",
        1 => "valuekit=info",
        _ => "valuekit=debug",
    }
}

/// Initialize logging to stderr
///
/// `VALUEKIT_LOG` (e.g. `VALUEKIT_LOG=valuekit::core::driver=debug`) wins over
/// the verbosity flag. Calling this more than once is a no-op.
pub fn init_tracing(verbosity: u8) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_directives() {
        assert_eq!(default_directive(0), "valuekit=warn");
        assert_eq!(default_directive(1), "valuekit=info");
        assert_eq!(default_directive(5), "valuekit=debug");
    }
}
