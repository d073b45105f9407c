//! Core systems for Trellis.
//!
//! This crate provides the plumbing the cell system is built on:
//!
//! - **Signal/Slot System**: ordered multi-subscriber notification channels
//! - **Property System**: values that report whether an assignment changed them
//! - **Thread Affinity**: checks that code runs on the thread owning a surface
//! - **Dispatcher**: marshals calls onto the owning thread and blocks until done
//!
//! # Signal/Slot Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Dispatch Example
//!
//! ```
//! use trellis_core::Dispatcher;
//!
//! let dispatcher = Dispatcher::new();
//! let handle = dispatcher.handle();
//!
//! // Already on the owning thread: runs inline.
//! assert_eq!(handle.invoke(|| 1 + 1).unwrap(), 2);
//! ```

mod dispatcher;
mod error;
pub mod invocation;
pub mod logging;
pub mod property;
pub mod signal;
pub mod thread_check;

pub use dispatcher::{DispatchHandle, Dispatcher, DispatcherBuilder, DispatcherConfig};
pub use error::{CoreError, DispatchError, Result};
pub use logging::PerfSpan;
pub use property::Property;
pub use signal::{ConnectionId, Signal};
pub use thread_check::ThreadAffinity;

static_assertions::assert_impl_all!(DispatchHandle: Send, Sync, Clone);
static_assertions::assert_impl_all!(Signal<()>: Send, Sync);
static_assertions::assert_impl_all!(Property<String>: Send, Sync);
