//! System font shared by tests that rasterize text.

use std::sync::{Arc, OnceLock};

pub(crate) fn system_font() -> Arc<Vec<u8>> {
    static FONT: OnceLock<Arc<Vec<u8>>> = OnceLock::new();
    FONT.get_or_init(|| {
        crate::assets::font::discover_system_font().expect("a system font is installed")
    })
    .clone()
}
