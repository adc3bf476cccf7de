// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keep a view live by fetching on a timer whose interval adapts to slow backends.
//!
//! A [`Poller`] calls a [`Fetch`] implementation over and over. After each completed fetch the
//! next wait is at least as long as the slowest fetch observed so far and never shorter than a
//! configured floor. The interval only ever grows within the lifetime of one poller, also across
//! stop and start cycles.
//!
//! ```no_run
//! use console_poll::{Poller, PollerConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let poller = Poller::new(PollerConfig::default().fetch_on_start(true), || async {
//!     // Request cluster info from the backend and store it somewhere.
//!     Ok::<(), std::io::Error>(())
//! });
//!
//! poller.start()?;
//!
//! // Leaving the view.
//! poller.stop();
//! # Ok(())
//! # }
//! ```
mod config;
mod error;
mod fetch;
mod poller;
mod ratchet;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use config::{DEFAULT_INTERVAL, PollerConfig};
pub use error::PollerError;
pub use fetch::Fetch;
pub use poller::{PollState, PollStatus, Poller};
pub use ratchet::Ratchet;
