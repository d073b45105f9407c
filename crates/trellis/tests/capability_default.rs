//! Without an installed backend the capability flag is false.
//!
//! Kept in its own test binary: the flag is process-global and fixed after
//! the first read.

use trellis::cell::CellCallback;
use trellis::platform::{self, HeadlessBackend, PlatformError};
use trellis::CellError;
use trellis_core::Dispatcher;

#[test]
fn defaults_to_painting_and_rejects_late_install() {
    assert!(!platform::supports_control_view());
    assert_eq!(platform::backend_name(), None);

    let dispatcher = Dispatcher::new();
    assert!(!CellCallback::new(dispatcher.handle()).supports_control_view());

    assert_eq!(
        platform::install_backend(HeadlessBackend),
        Err(CellError::Platform(PlatformError::CapabilitiesResolved))
    );
    assert!(!platform::supports_control_view());
    assert_eq!(platform::backend_name(), None);
}
