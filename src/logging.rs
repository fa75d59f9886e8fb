//! Diagnostic tracing.
//!
//! Output goes to stderr so it never interleaves with command output on
//! stdout. `RUST_LOG` wins when set; otherwise the level is `warn`, or
//! `debug` for this crate with `--verbose`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init(verbose: bool) {
    let fallback = if verbose { "warn,giti=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A subscriber may already be installed (tests); keep the existing one.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
