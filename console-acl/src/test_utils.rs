// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities.
use crate::Rights;

/// Collect string literals into a rights set.
pub fn rights<const N: usize>(names: [&str; N]) -> Rights {
    names.into_iter().map(str::to_string).collect()
}

pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}
