//! SnapEdit WASM - WebAssembly bindings for SnapEdit
//!
//! This crate exposes the snapedit-core editing session to
//! JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `session` - The stateful editor session (filters, transform, overlays,
//!   crop, export)
//! - `types` - WASM-compatible wrapper types for image data
//!
//! # Usage
//!
//! ```typescript
//! import init, { EditorSession, JsBitmap } from '@snapedit/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const session = new EditorSession(container.clientWidth, container.clientHeight);
//! session.load_image_bytes(new Uint8Array(await file.arrayBuffer()));
//!
//! // Push slider changes, read the surface back for display
//! session.set_brightness(120);
//! const data = new ImageData(
//!   new Uint8ClampedArray(session.surface_pixels()),
//!   session.surface_width,
//!   session.surface_height,
//! );
//! ctx.putImageData(data, 0, 0);
//! ```

use wasm_bindgen::prelude::*;

mod session;
mod types;

// Re-export public types
pub use session::EditorSession;
pub use types::JsBitmap;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
    web_sys::console::debug_1(&format!("snapedit-wasm {} ready", version()).into());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
