//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

const QUIET_TARGETS: [&str; 2] = ["reqwest=warn", "hyper_util=warn"];

/// Install a compact stderr subscriber. `RUST_LOG` overrides the default
/// `info` level; `verbose` lowers it to `debug`.
pub fn setup_logger(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    for target in QUIET_TARGETS {
        if let Ok(directive) = target.parse() {
            filter = filter.add_directive(directive);
        }
    }

    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact()
        .with_env_filter(filter)
        .try_init();
}
