// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

/// Default floor and starting value of the polling interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct PollerConfig {
    /// The interval never drops below this value.
    ///
    /// Defaults to 30 seconds.
    pub(crate) min_interval: Duration,

    /// Interval a new poller starts with. Raised to `min_interval` if lower.
    ///
    /// Defaults to 30 seconds.
    pub(crate) initial_interval: Duration,

    /// Fetch right after `start` instead of waiting one interval first.
    ///
    /// Defaults to `false`.
    pub(crate) fetch_on_start: bool,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            min_interval: DEFAULT_INTERVAL,
            initial_interval: DEFAULT_INTERVAL,
            fetch_on_start: false,
        }
    }
}

impl PollerConfig {
    pub fn min_interval(mut self, value: Duration) -> Self {
        self.min_interval = value;
        self
    }

    pub fn initial_interval(mut self, value: Duration) -> Self {
        self.initial_interval = value;
        self
    }

    pub fn fetch_on_start(mut self, value: bool) -> Self {
        self.fetch_on_start = value;
        self
    }
}
