//!
//! Terminal stock viewer: a grid of live quotes with a per-symbol detail view.
//!
//! This crate aggregates:
//! - `app` — the view-model and its single `dispatch` entry point.
//! - `args` — command-line flags and settings assembly.
//! - `input` — key bindings.
//! - `theme` — palette conversion for ratatui.
//! - `ui` — rendering.
#![warn(missing_docs)]
pub mod app;
pub mod args;
pub mod input;
pub mod theme;
pub mod ui;

pub use app::{Action, App};
pub use args::Args;
