// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;
use std::future::Future;

/// Asynchronous operation a poller invokes on every tick.
///
/// Implementations are expected to be idempotent and safe to abandon: a fetch which is in flight
/// when the poller stops still runs to completion, its result is recorded but nothing gets
/// scheduled after it. The poller does not deduplicate requests across instances, callers who need
/// that should cancel or key requests themselves.
pub trait Fetch: Send + Sync + 'static {
    type Error: Error + Send + Sync + 'static;

    fn fetch(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

impl<F, Fut, E> Fetch for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), E>> + Send,
    E: Error + Send + Sync + 'static,
{
    type Error = E;

    fn fetch(&self) -> impl Future<Output = Result<(), Self::Error>> + Send {
        (self)()
    }
}
