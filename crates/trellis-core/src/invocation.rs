//! Queued invocations waiting to run on an owning thread.
//!
//! A [`QueuedInvocation`] wraps a closure that has been marshaled from a
//! calling thread together with the channel its result travels back on. The
//! owning thread executes it; the caller blocks on the paired receiver.
//!
//! Panics raised by the closure are caught on the owning thread and shipped
//! back to the caller as the original payload, so the caller can re-raise
//! them unchanged.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crossbeam_channel::{Receiver, Sender, bounded};

/// Outcome of an invocation as seen by the waiting caller: the closure's
/// return value, or the payload of the panic it raised.
pub type InvocationOutcome<R> = std::result::Result<R, Box<dyn Any + Send + 'static>>;

/// A type-erased invocation that can be executed later on another thread.
pub struct QueuedInvocation {
    invoke: Box<dyn FnOnce() + Send>,
}

impl QueuedInvocation {
    /// Wrap `f`, returning the invocation and the receiver its outcome will
    /// arrive on.
    ///
    /// If the invocation is dropped without being executed, the receiver
    /// observes a disconnect.
    pub fn with_result<F, R>(f: F) -> (Self, Receiver<InvocationOutcome<R>>)
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (sender, receiver): (Sender<InvocationOutcome<R>>, _) = bounded(1);
        let invocation = Self {
            invoke: Box::new(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(f));
                // The caller may have gone away; nothing left to deliver to.
                let _ = sender.send(outcome);
            }),
        };
        (invocation, receiver)
    }

    /// Execute the invocation on the current thread.
    pub fn execute(self) {
        (self.invoke)();
    }
}

impl std::fmt::Debug for QueuedInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedInvocation").finish_non_exhaustive()
    }
}
