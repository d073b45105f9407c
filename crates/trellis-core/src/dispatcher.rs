//! Owning-thread dispatch.
//!
//! A rendering surface is owned by exactly one thread. Work that must touch
//! it, requested from anywhere, goes through that thread's [`Dispatcher`]:
//!
//! - The owning thread creates a `Dispatcher` and pumps it
//!   ([`process_pending`](Dispatcher::process_pending),
//!   [`run_until`](Dispatcher::run_until)) as part of its event loop.
//! - Any thread holding a [`DispatchHandle`] calls
//!   [`invoke`](DispatchHandle::invoke). On the owning thread the closure runs
//!   inline, which also covers re-entrant calls made from inside a dispatched
//!   closure. On any other thread the closure is queued and the caller blocks
//!   until the owning thread has run it.
//!
//! Calls from one thread reach the owning thread in the order they were made.
//! There is no cancellation and no timeout. A panic inside the closure is
//! re-raised on the calling thread with its original payload.
//!
//! # Example
//!
//! ```
//! use trellis_core::Dispatcher;
//!
//! let dispatcher = Dispatcher::new();
//! let handle = dispatcher.handle();
//!
//! let worker = std::thread::spawn(move || {
//!     handle.invoke(|| std::thread::current().name().map(str::to_owned))
//! });
//!
//! // Pump on the owning thread until the worker's call has been served.
//! dispatcher.run_until(|| worker.is_finished());
//! let ran_on = worker.join().unwrap().unwrap();
//! assert_eq!(ran_on, std::thread::current().name().map(str::to_owned));
//! ```

use std::fmt;
use std::panic;
use std::sync::Arc;
use std::thread::ThreadId;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};

use crate::error::DispatchError;
use crate::invocation::QueuedInvocation;
use crate::logging::{span_names, targets};
use crate::thread_check::ThreadAffinity;

/// How long [`Dispatcher::run_until`] waits for work before re-checking its
/// predicate.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Configuration for creating a [`Dispatcher`].
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Name used in logs and errors.
    pub name: String,
    /// Marshaled invocations running longer than this are logged at `warn`.
    pub slow_dispatch_threshold: Option<Duration>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            name: "trellis-ui".to_string(),
            slow_dispatch_threshold: None,
        }
    }
}

impl DispatcherConfig {
    /// Create a new configuration with the given name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Builder for creating Dispatchers with custom configuration.
#[derive(Debug, Default)]
pub struct DispatcherBuilder {
    config: DispatcherConfig,
}

impl DispatcherBuilder {
    /// Create a new DispatcherBuilder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dispatcher name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Warn about marshaled invocations that take longer than `threshold`.
    pub fn slow_dispatch_threshold(mut self, threshold: Duration) -> Self {
        self.config.slow_dispatch_threshold = Some(threshold);
        self
    }

    /// Build a dispatcher owned by the calling thread.
    pub fn build(self) -> Dispatcher {
        Dispatcher::with_config(self.config)
    }
}

struct HandleInner {
    sender: Sender<QueuedInvocation>,
    owner: ThreadAffinity,
    name: String,
}

/// A cloneable, thread-safe handle for marshaling calls onto the owning
/// thread of a [`Dispatcher`].
#[derive(Clone)]
pub struct DispatchHandle {
    inner: Arc<HandleInner>,
}

impl DispatchHandle {
    /// The dispatcher's name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The thread calls are marshaled onto.
    pub fn owner_thread(&self) -> ThreadId {
        self.inner.owner.thread_id()
    }

    /// Whether the calling thread is the owning thread.
    pub fn is_owner_thread(&self) -> bool {
        self.inner.owner.is_same_thread()
    }

    /// Run `f` on the owning thread and return its result.
    ///
    /// On the owning thread `f` runs inline. Elsewhere it is queued and the
    /// calling thread blocks until the owning thread has executed it.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Disconnected`] if the dispatcher is dropped
    /// before `f` runs.
    ///
    /// # Panics
    ///
    /// Re-raises, on the calling thread, any panic raised by `f`.
    pub fn invoke<F, R>(&self, f: F) -> Result<R, DispatchError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        if self.is_owner_thread() {
            tracing::trace!(
                target: targets::DISPATCH,
                dispatcher = %self.inner.name,
                "invoking inline"
            );
            return Ok(f());
        }

        let (invocation, outcome) = QueuedInvocation::with_result(f);
        tracing::trace!(
            target: targets::DISPATCH,
            dispatcher = %self.inner.name,
            "marshaling to owning thread"
        );

        if self.inner.sender.send(invocation).is_err() {
            return Err(self.disconnected());
        }

        match outcome.recv() {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(payload)) => panic::resume_unwind(payload),
            Err(_) => Err(self.disconnected()),
        }
    }

    fn disconnected(&self) -> DispatchError {
        tracing::debug!(
            target: targets::DISPATCH,
            dispatcher = %self.inner.name,
            "dispatch after shutdown"
        );
        DispatchError::Disconnected {
            name: self.inner.name.clone(),
        }
    }
}

impl fmt::Debug for DispatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchHandle")
            .field("name", &self.inner.name)
            .field("owner", &self.inner.owner.thread_id())
            .finish()
    }
}

/// The owning-thread side of the dispatch channel.
///
/// Create it on the thread that owns the rendering surface. Dropping it (or
/// calling [`shutdown`](Self::shutdown)) discards queued invocations; their
/// callers receive [`DispatchError::Disconnected`].
pub struct Dispatcher {
    handle: DispatchHandle,
    receiver: Receiver<QueuedInvocation>,
    slow_dispatch_threshold: Option<Duration>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Create a dispatcher owned by the calling thread, with default settings.
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    /// Create a dispatcher owned by the calling thread.
    pub fn with_config(config: DispatcherConfig) -> Self {
        let (sender, receiver) = unbounded();
        let owner = ThreadAffinity::current();
        tracing::debug!(
            target: targets::DISPATCH,
            dispatcher = %config.name,
            owner = ?owner.thread_id(),
            "dispatcher created"
        );

        Self {
            handle: DispatchHandle {
                inner: Arc::new(HandleInner {
                    sender,
                    owner,
                    name: config.name,
                }),
            },
            receiver,
            slow_dispatch_threshold: config.slow_dispatch_threshold,
        }
    }

    /// Create a builder for a custom dispatcher.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Get a handle other threads can marshal calls through.
    pub fn handle(&self) -> DispatchHandle {
        self.handle.clone()
    }

    /// The dispatcher's name.
    pub fn name(&self) -> &str {
        self.handle.name()
    }

    /// Number of invocations waiting to run.
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Run every queued invocation, in arrival order, and return how many ran.
    ///
    /// # Panics
    ///
    /// Panics if called from a thread other than the owning thread.
    pub fn process_pending(&self) -> usize {
        self.assert_owner();
        let mut count = 0;
        while let Ok(invocation) = self.receiver.try_recv() {
            self.execute(invocation);
            count += 1;
        }
        count
    }

    /// Run queued invocations as they arrive until `deadline` passes.
    ///
    /// Returns how many ran.
    ///
    /// # Panics
    ///
    /// Panics if called from a thread other than the owning thread.
    pub fn process_until(&self, deadline: Instant) -> usize {
        self.assert_owner();
        let mut count = 0;
        loop {
            let now = Instant::now();
            if now >= deadline {
                return count;
            }
            match self.receiver.recv_timeout(deadline - now) {
                Ok(invocation) => {
                    self.execute(invocation);
                    count += 1;
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return count;
                }
            }
        }
    }

    /// Pump queued invocations until `done` returns `true`.
    ///
    /// `done` is checked before each wait, so work that completes the
    /// condition is observed promptly. Returns how many invocations ran.
    ///
    /// # Panics
    ///
    /// Panics if called from a thread other than the owning thread.
    pub fn run_until<F>(&self, mut done: F) -> usize
    where
        F: FnMut() -> bool,
    {
        self.assert_owner();
        let mut count = 0;
        while !done() {
            match self.receiver.recv_timeout(POLL_INTERVAL) {
                Ok(invocation) => {
                    self.execute(invocation);
                    count += 1;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        count + self.process_pending()
    }

    /// Shut the dispatcher down, discarding queued invocations.
    pub fn shutdown(self) {
        drop(self);
    }

    fn execute(&self, invocation: QueuedInvocation) {
        let _span = tracing::trace_span!(
            target: targets::DISPATCH,
            span_names::DISPATCH,
            dispatcher = %self.handle.inner.name
        )
        .entered();
        let started = Instant::now();
        invocation.execute();
        let elapsed = started.elapsed();

        if let Some(threshold) = self.slow_dispatch_threshold {
            if elapsed > threshold {
                tracing::warn!(
                    target: targets::DISPATCH,
                    dispatcher = %self.handle.inner.name,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "slow dispatched invocation"
                );
            }
        }
    }

    fn assert_owner(&self) {
        self.handle
            .inner
            .owner
            .assert_same_thread_with_msg("a dispatcher can only be pumped by its owning thread");
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        // Dropping the receiver discards whatever is still queued, which in
        // turn disconnects every caller blocked on a result.
        let discarded = self.receiver.len();
        tracing::debug!(
            target: targets::DISPATCH,
            dispatcher = %self.handle.inner.name,
            discarded,
            "dispatcher shut down"
        );
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("name", &self.handle.inner.name)
            .field("pending", &self.pending_count())
            .finish()
    }
}
