// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PollerError {
    /// Polling runs on a tokio task and needs to be started from within a runtime.
    #[error("poller needs to be started from within a tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
