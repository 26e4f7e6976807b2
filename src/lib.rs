//! Scroll reveal, animated geometric background and small click helpers for
//! a static page. The core modules are plain Rust; `wasm` wires them to the
//! DOM.

pub mod config;
pub mod error;
pub mod interact;
pub mod reveal;
pub mod shapes;

pub use config::PageConfig;
pub use error::{Error, Result};

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm;
