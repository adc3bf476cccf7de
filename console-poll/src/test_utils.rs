// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities.
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

use crate::Fetch;

#[derive(Debug, Error)]
#[error("scripted fetch {0} failed")]
pub struct ScriptedError(pub usize);

#[derive(Clone, Copy, Debug, Default)]
struct Step {
    latency: Duration,
    fail: bool,
}

#[derive(Debug, Default)]
struct Script {
    steps: VecDeque<Step>,
    calls: usize,
    in_flight: usize,
    max_in_flight: usize,
}

/// Fetcher replaying a scripted sequence of latencies and outcomes.
///
/// Once the script is exhausted every fetch succeeds immediately.
#[derive(Clone, Debug, Default)]
pub struct ScriptedFetcher {
    script: Arc<Mutex<Script>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful fetch taking the given time.
    pub fn respond_after(&self, latency: Duration) {
        self.push(Step {
            latency,
            fail: false,
        });
    }

    /// Queue a failing fetch taking the given time.
    pub fn fail_after(&self, latency: Duration) {
        self.push(Step {
            latency,
            fail: true,
        });
    }

    /// Number of fetches started so far.
    pub fn calls(&self) -> usize {
        self.script.lock().unwrap().calls
    }

    /// Highest number of fetches that were running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.script.lock().unwrap().max_in_flight
    }

    fn push(&self, step: Step) {
        self.script.lock().unwrap().steps.push_back(step);
    }
}

impl Fetch for ScriptedFetcher {
    type Error = ScriptedError;

    fn fetch(&self) -> impl Future<Output = Result<(), Self::Error>> + Send {
        let (call, step) = {
            let mut script = self.script.lock().unwrap();
            script.calls += 1;
            (script.calls, script.steps.pop_front().unwrap_or_default())
        };

        let script = self.script.clone();
        async move {
            {
                let mut script = script.lock().unwrap();
                script.in_flight += 1;
                script.max_in_flight = script.max_in_flight.max(script.in_flight);
            }

            if !step.latency.is_zero() {
                tokio::time::sleep(step.latency).await;
            }

            script.lock().unwrap().in_flight -= 1;

            if step.fail {
                Err(ScriptedError(call))
            } else {
                Ok(())
            }
        }
    }
}

pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}
