//! TUI Module - live dashboard
//!
//! - event_loop: entry point, terminal setup and key dispatch
//! - state: screens, input modes and key handling
//! - render: header, status bar and help overlay
//! - screens: per-screen layouts
//! - widgets: widget adapters drawn as ratatui widgets

mod event_loop;
mod render;
mod screens;
pub mod state;
mod widgets;

pub use event_loop::{apply_action, run};
pub use render::draw_ui;
