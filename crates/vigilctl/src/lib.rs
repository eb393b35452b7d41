//! Vigil Control - terminal console for the telemetry API
//!
//! Library half of `vigilctl`, split out so the CLI parser, command
//! helpers and dashboard state can be exercised from tests.

pub mod cli;
pub mod commands;
pub mod errors;
pub mod logging;
pub mod tui;
