// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::{Fetch, PollerConfig, PollerError, Ratchet};

/// Lifecycle of a poller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollState {
    /// Created, never started.
    Idle,

    /// Timer armed, no request in flight.
    Waiting,

    /// Request in flight.
    Fetching,

    /// Stopped until `start` is called again.
    Stopped,
}

/// Snapshot of a poller, published after every transition.
#[derive(Debug)]
pub struct PollStatus<E> {
    pub state: PollState,

    /// Interval the next timer will be armed with.
    pub interval: Duration,

    /// Number of completed fetches, failed ones included.
    pub fetches: u64,

    /// Error of the last completed fetch, `None` if it succeeded.
    pub last_error: Option<Arc<E>>,
}

impl<E> Clone for PollStatus<E> {
    fn clone(&self) -> Self {
        Self {
            state: self.state,
            interval: self.interval,
            fetches: self.fetches,
            last_error: self.last_error.clone(),
        }
    }
}

struct Inner<E> {
    state: PollState,
    active: bool,
    ratchet: Ratchet,
    fetches: u64,
    last_error: Option<Arc<E>>,

    /// Incremented whenever `start` spawns a new loop. A loop only ever touches the state of its
    /// own run.
    run: u64,

    /// A fetch is running. Stays set after `stop` until that fetch settled.
    in_flight: bool,

    /// Task driving the current run.
    task: Option<JoinHandle<()>>,
}

impl<E> Inner<E> {
    fn status(&self) -> PollStatus<E> {
        PollStatus {
            state: self.state,
            interval: self.ratchet.value(),
            fetches: self.fetches,
            last_error: self.last_error.clone(),
        }
    }

    fn is_current(&self, run: u64) -> bool {
        self.active && self.run == run
    }
}

struct Shared<E> {
    inner: Mutex<Inner<E>>,
    status_tx: watch::Sender<PollStatus<E>>,
}

impl<E> Shared<E> {
    fn lock(&self) -> MutexGuard<'_, Inner<E>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &Inner<E>) {
        self.status_tx.send_replace(inner.status());
    }
}

/// Restartable fetch loop with a ratcheting interval.
///
/// Fetches of one run are strictly sequential: the next timer is only armed after the previous
/// fetch settled, successfully or not. Stopping clears an armed timer right away but lets an
/// in-flight fetch complete, without scheduling anything after it. Dropping the poller stops it.
pub struct Poller<F>
where
    F: Fetch,
{
    config: PollerConfig,
    fetcher: Arc<F>,
    shared: Arc<Shared<F::Error>>,
}

impl<F> Poller<F>
where
    F: Fetch,
{
    pub fn new(config: PollerConfig, fetcher: F) -> Self {
        let inner = Inner {
            state: PollState::Idle,
            active: false,
            ratchet: Ratchet::new(config.initial_interval, config.min_interval),
            fetches: 0,
            last_error: None,
            run: 0,
            in_flight: false,
            task: None,
        };
        let (status_tx, _) = watch::channel(inner.status());

        Self {
            config,
            fetcher: Arc::new(fetcher),
            shared: Arc::new(Shared {
                inner: Mutex::new(inner),
                status_tx,
            }),
        }
    }

    /// Arm the timer, or fetch right away when configured to.
    ///
    /// Calling this while already running does nothing. The interval keeps the value it ratcheted
    /// up to before the poller was stopped.
    ///
    /// If a fetch of the stopped run is still in flight, no new loop is spawned. The loop of that
    /// fetch resumes once it settled and arms the next timer, so there is never more than one
    /// fetch in flight.
    pub fn start(&self) -> Result<(), PollerError> {
        let handle = Handle::try_current()?;

        let mut inner = self.shared.lock();
        if inner.active {
            return Ok(());
        }

        inner.active = true;
        if inner.in_flight {
            debug!(run = inner.run, "resume polling after fetch in flight");
            inner.state = PollState::Fetching;
            self.shared.publish(&inner);
            return Ok(());
        }

        inner.run += 1;
        inner.state = PollState::Waiting;

        let delay = if self.config.fetch_on_start {
            Duration::ZERO
        } else {
            inner.ratchet.value()
        };

        debug!(run = inner.run, ?delay, "start polling");

        let task = handle.spawn(run_loop(
            self.shared.clone(),
            self.fetcher.clone(),
            inner.run,
            delay,
        ));
        inner.task = Some(task);
        self.shared.publish(&inner);

        Ok(())
    }

    /// Stop polling.
    ///
    /// An armed timer is cleared immediately. A fetch in flight is not cancelled, its completion
    /// is still recorded but no new timer gets armed, unless the poller is started again before it
    /// settled.
    pub fn stop(&self) {
        let mut inner = self.shared.lock();
        if !inner.active {
            return;
        }

        inner.active = false;

        // The loop of a fetch in flight is kept, it either exits after the fetch settled or
        // resumes when started again in the meantime.
        if !inner.in_flight {
            if let Some(task) = inner.task.take() {
                task.abort();
            }
        }

        debug!(run = inner.run, state = ?inner.state, "stop polling");
        inner.state = PollState::Stopped;
        self.shared.publish(&inner);
    }

    /// Returns `true` if the poller is started.
    pub fn is_active(&self) -> bool {
        self.shared.lock().active
    }

    pub fn state(&self) -> PollState {
        self.shared.lock().state
    }

    /// Interval the next timer will be armed with.
    pub fn interval(&self) -> Duration {
        self.shared.lock().ratchet.value()
    }

    pub fn status(&self) -> PollStatus<F::Error> {
        self.shared.lock().status()
    }

    /// Observe status changes.
    pub fn subscribe(&self) -> watch::Receiver<PollStatus<F::Error>> {
        self.shared.status_tx.subscribe()
    }
}

impl<F> Drop for Poller<F>
where
    F: Fetch,
{
    fn drop(&mut self) {
        self.stop();
    }
}

impl<F> Debug for Poller<F>
where
    F: Fetch,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.shared.lock();
        f.debug_struct("Poller")
            .field("config", &self.config)
            .field("state", &inner.state)
            .field("interval", &inner.ratchet.value())
            .field("fetches", &inner.fetches)
            .finish()
    }
}

async fn run_loop<F>(shared: Arc<Shared<F::Error>>, fetcher: Arc<F>, run: u64, delay: Duration)
where
    F: Fetch,
{
    let mut delay = delay;

    loop {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        {
            let mut inner = shared.lock();
            if !inner.is_current(run) {
                // Stop was requested while the timer was armed.
                if inner.run == run {
                    inner.state = PollState::Stopped;
                    shared.publish(&inner);
                }
                return;
            }

            trace!(run, "timer fired");
            inner.state = PollState::Fetching;
            inner.in_flight = true;
            shared.publish(&inner);
        }

        let started_at = Instant::now();
        let result = fetcher.fetch().await;
        let elapsed = started_at.elapsed();

        let mut inner = shared.lock();
        inner.in_flight = false;
        inner.fetches += 1;
        let interval = inner.ratchet.observe(elapsed);

        match result {
            Ok(()) => {
                trace!(run, ?elapsed, "fetch completed");
                inner.last_error = None;
            }
            Err(err) => {
                warn!(run, ?elapsed, "fetch failed: {err}");
                inner.last_error = Some(Arc::new(err));
            }
        }

        if !inner.is_current(run) {
            trace!(run, "fetch settled after stop, not rescheduling");
            shared.publish(&inner);
            return;
        }

        inner.state = PollState::Waiting;
        shared.publish(&inner);
        delay = interval;
    }
}
