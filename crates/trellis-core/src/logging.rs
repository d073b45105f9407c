//! Logging facilities for Trellis.
//!
//! Trellis uses the `tracing` crate for instrumentation and never installs a
//! subscriber itself. To see logs, install one in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("trellis_core::dispatch=trace")
//!     .init();
//! ```
//!
//! The constants in [`targets`] and [`span_names`] can be used in filter
//! directives to select individual subsystems.

/// Span names used throughout Trellis for tracing.
pub mod span_names {
    /// Signal emission span.
    pub const SIGNAL: &str = "trellis::signal";
    /// Owning-thread dispatch span.
    pub const DISPATCH: &str = "trellis::dispatch";
    /// Performance measurement span.
    pub const PERF: &str = "trellis::perf";
}

/// Target names for log filtering.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "trellis_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "trellis_core::signal";
    /// Property system target.
    pub const PROPERTY: &str = "trellis_core::property";
    /// Owning-thread dispatcher target.
    pub const DISPATCH: &str = "trellis_core::dispatch";
    /// Thread affinity checks target.
    pub const THREAD: &str = "trellis_core::thread";
    /// Performance measurement target.
    pub const PERF: &str = "trellis::perf";
}

/// A guard that records the duration of an operation as a tracing span.
///
/// The span stays entered until the guard is dropped.
///
/// ```
/// use trellis_core::PerfSpan;
///
/// fn measure_row() {
///     let _span = PerfSpan::new("measure_row");
///     // ... work ...
/// }
/// measure_row();
/// ```
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, span_names::PERF, operation = name);
        Self {
            span: span.entered(),
        }
    }
}
