//! Tracing setup for the CLI.
//!
//! Commands carry `#[instrument]` spans. With `--timing` every span close is logged
//! together with its duration, so `roster list --timing` shows how long the page fetch
//! took. `log` records from the business crate go through the same subscriber.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Level used when `RUST_LOG` is not set.
fn default_level(verbose: bool, timing: bool) -> LevelFilter {
    match (verbose, timing) {
        (true, _) => LevelFilter::DEBUG,
        // span close events are emitted at INFO
        (false, true) => LevelFilter::INFO,
        (false, false) => LevelFilter::WARN,
    }
}

/// Install the global subscriber, writing to stderr.
pub fn init_tracing(verbose: bool, timing: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbose, timing).into())
        .from_env_lossy();

    let span_events = if timing {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(verbose)
                .with_span_events(span_events)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
