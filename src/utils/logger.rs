use tracing::Subscriber;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins; otherwise the crate logs at `debug` when verbose and at
/// `fallback` when not.
fn filter(verbose: bool, fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("folio_admin=debug,info")
        } else {
            EnvFilter::new(fallback)
        }
    })
}

/// Compact human output on stderr. Stdout stays free for command output.
fn cli_subscriber(verbose: bool) -> impl Subscriber + Send + Sync + 'static {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(filter(verbose, "folio_admin=warn"))
        .with(layer)
}

/// JSON lines on stderr, for when the CLI output is piped into another tool.
fn json_subscriber(verbose: bool) -> impl Subscriber + Send + Sync + 'static {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .json()
        .with_current_span(false);

    tracing_subscriber::registry()
        .with(filter(verbose, "folio_admin=info"))
        .with(layer)
}

pub fn init_cli_logger(verbose: bool) {
    cli_subscriber(verbose).init();
}

pub fn init_json_logger(verbose: bool) {
    json_subscriber(verbose).init();
}
