//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, navigation bar, auth screens and overlays
//! - `input`: keyboard event handling per route
//! - `styles`: color scheme and text styling
//! - `screens`: content for the diary routes (home, list, detail, editor, stats)

pub mod input;
pub mod render;
pub mod screens;
pub mod styles;
