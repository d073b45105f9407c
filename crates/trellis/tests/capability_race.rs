//! Installing a backend while other threads read the flag.
//!
//! Kept in its own test binary: the flag is process-global and fixed after
//! the first read.

use std::sync::{Arc, Barrier};
use std::thread;

use trellis::platform::{self, PlatformError, PlatformFeatures, RenderBackend};
use trellis::CellError;

struct Retained;

impl RenderBackend for Retained {
    fn name(&self) -> &str {
        "retained"
    }

    fn supported_features(&self) -> PlatformFeatures {
        PlatformFeatures::CUSTOM_CELL_SUPPORTS_CONTROL_VIEW
    }
}

#[test]
fn install_racing_first_read_either_applies_or_fails() {
    let barrier = Arc::new(Barrier::new(5));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                platform::supports_control_view()
            })
        })
        .collect();

    barrier.wait();
    let installed = platform::install_backend(Retained);
    let seen: Vec<bool> = readers.into_iter().map(|r| r.join().unwrap()).collect();
    let flag = platform::supports_control_view();

    match installed {
        Ok(()) => {
            assert!(flag);
            assert_eq!(platform::backend_name(), Some("retained"));
        }
        Err(error) => {
            assert_eq!(error, CellError::Platform(PlatformError::CapabilitiesResolved));
            assert!(!flag);
            assert_eq!(platform::backend_name(), None);
        }
    }
    // Every reader saw the value the process settled on.
    assert!(seen.iter().all(|value| *value == flag));
}
