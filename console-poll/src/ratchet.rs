// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

use tracing::trace;

/// Polling interval which only ever grows.
///
/// Every observed fetch duration may raise the interval, so the next wait is at least as long as
/// the slowest fetch so far. It never falls below the floor and never shrinks when fetches get
/// fast again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ratchet {
    value: Duration,
    floor: Duration,
}

impl Ratchet {
    pub fn new(initial: Duration, floor: Duration) -> Self {
        Self {
            value: initial.max(floor),
            floor,
        }
    }

    /// Current interval.
    pub fn value(&self) -> Duration {
        self.value
    }

    pub fn floor(&self) -> Duration {
        self.floor
    }

    /// Account for a completed fetch and return the interval to wait next.
    pub fn observe(&mut self, elapsed: Duration) -> Duration {
        let next = self.value.max(self.floor).max(elapsed);
        if next > self.value {
            trace!(from = ?self.value, to = ?next, "raise polling interval");
        }

        self.value = next;
        self.value
    }
}
