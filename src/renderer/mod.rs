//! Rendering module
//!
//! `view` derives a platform-free view model from the game state; the DOM
//! and text renderers draw that model.

pub mod text;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub mod dom;

#[cfg(target_arch = "wasm32")]
pub use dom::DomRenderer;
pub use text::render_text;
pub use view::{BoardView, CLASSIC_VICTORY_MESSAGE, CellView, HudView, SummaryView};
