//! Content renderers for the diary routes.

pub mod diaries;
pub mod editor;
pub mod stats;
