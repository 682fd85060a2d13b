use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Log to stderr so console output on stdout stays readable.
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter),
        )
        .init();
}
