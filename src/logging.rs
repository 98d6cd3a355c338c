// SPDX-License-Identifier: MIT
//
// Logging — tracing to stderr.
//
// stdout carries the resulting buffer, so log lines go to stderr. The filter
// comes from the first of these that is set:
//
//   1. KEYANO_LOG   a bare level (`debug`) is expanded to the keyano crates,
//                   anything with `=`, `:` or `,` is used as-is
//   2. RUST_LOG     the standard tracing variable, used as-is
//   3. config.log   the `log` key of config.toml
//   4. default      warn globally, info for the keyano crates

use std::env;

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,keyano=info,keyano_core=info";

/// Pick the filter directives by priority.
fn filter_directives(
    keyano_log: Option<&str>,
    rust_log: Option<&str>,
    configured: Option<&str>,
) -> String {
    if let Some(level) = keyano_log {
        return expand_keyano_log(level);
    }
    rust_log
        .or(configured)
        .map_or_else(|| DEFAULT_FILTER.to_owned(), str::to_owned)
}

/// `debug` becomes `warn,keyano=debug,keyano_core=debug`.
fn expand_keyano_log(value: &str) -> String {
    if value.contains(['=', ':', ',']) {
        return value.to_owned();
    }
    format!("warn,keyano={value},keyano_core={value}")
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails if the directives do not parse or a subscriber is already set.
pub fn init(configured: Option<&str>) -> Result<()> {
    let keyano_log = env::var("KEYANO_LOG").ok();
    let rust_log = env::var("RUST_LOG").ok();
    let directives = filter_directives(keyano_log.as_deref(), rust_log.as_deref(), configured);
    let filter = EnvFilter::try_new(&directives)
        .map_err(|e| anyhow!("invalid log filter `{directives}`: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {e}"))
}
