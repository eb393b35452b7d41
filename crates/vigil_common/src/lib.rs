//! Vigil Common - telemetry rendering core shared by the console frontends
//!
//! Bounded series buffers, poll tasks with a scheduler, widget adapters,
//! the log filter controller and the API client they all sit on.

pub mod actions;
pub mod api;
pub mod buffer;
pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod filter;
pub mod panels;
pub mod poll_task;
pub mod scheduler;
pub mod widgets;

pub use buffer::{Sample, Series, TimeSeriesBuffer};
pub use client::{ApiRequest, HttpTelemetryClient, TelemetrySource};
pub use config::Config;
pub use console::Console;
pub use error::{BufferError, ConfigError, FetchError};
pub use filter::{LogFilterController, LogLevelFilter, Pagination};
pub use poll_task::{PanelBinding, PollTask, TaskState, TaskStatus, TickOutcome};
pub use scheduler::Scheduler;
