//! The capability flag resolves from the installed backend.
//!
//! Kept in its own test binary: the flag is process-global and fixed after
//! the first read.

use std::sync::Arc;

use trellis::cell::{CellCallback, CellContext, CellItem, CellState, CustomCell};
use trellis::drawing::{Color, Graphics, Point, Rect};
use trellis::platform::{self, PlatformError, PlatformFeatures, RenderBackend};
use trellis::CellError;
use trellis_core::Dispatcher;

struct Retained;

impl RenderBackend for Retained {
    fn name(&self) -> &str {
        "retained"
    }

    fn supported_features(&self) -> PlatformFeatures {
        PlatformFeatures::CUSTOM_CELL_SUPPORTS_CONTROL_VIEW
    }
}

struct Immediate;

impl RenderBackend for Immediate {
    fn name(&self) -> &str {
        "immediate"
    }

    fn supported_features(&self) -> PlatformFeatures {
        PlatformFeatures::empty()
    }
}

struct NullGraphics;

impl Graphics for NullGraphics {
    fn fill_rect(&self, _rect: Rect, _color: Color) {}
    fn draw_text(&self, _origin: Point, _text: &str, _color: Color) {}
}

#[test]
fn installed_backend_decides_and_stays_fixed() {
    platform::install_backend(Retained).unwrap();
    assert_eq!(platform::backend_name(), Some("retained"));

    // Rejected before anything read the flag: the first backend wins.
    assert_eq!(
        platform::install_backend(Immediate),
        Err(CellError::Platform(PlatformError::BackendAlreadyInstalled {
            name: "retained".to_string()
        }))
    );
    assert_eq!(platform::backend_name(), Some("retained"));

    assert!(platform::supports_control_view());
    assert!(CustomCell::supports_control_view());

    // Still the installed backend that is reported once the flag was read.
    assert_eq!(
        platform::install_backend(Immediate),
        Err(CellError::Platform(PlatformError::BackendAlreadyInstalled {
            name: "retained".to_string()
        }))
    );
    assert!(platform::supports_control_view());

    let dispatcher = Dispatcher::new();
    let callback = CellCallback::new(dispatcher.handle());
    assert!(callback.supports_control_view());

    let cell = Arc::new(CustomCell::new());
    let args = Arc::new(CellContext::new(0, CellItem::none(), CellState::NONE));
    let graphics: Arc<dyn Graphics> = Arc::new(NullGraphics);
    let shown = callback
        .present(&cell, &args, &graphics, Rect::default(), |_| None)
        .unwrap();
    assert!(shown.is_materialized());
}
