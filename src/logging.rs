//! Logging setup

use tracing_subscriber::EnvFilter;

/// Initialise logging.
///
/// Without `debug` the level is fixed at `info`, whatever `RUST_LOG` says.
/// With `debug` the default is `debug` and `RUST_LOG` may override it.
/// Calling this more than once is a no-op.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
        tracing::info!("logging initialised");
    }
}
