//! Scheduler - owns poll tasks and their timers
//!
//! Every registered task gets its own timer loop. The first tick fires
//! immediately (cold start), later ticks follow the task's interval. Each
//! tick is spawned so a slow fetch never delays the timer; the task's
//! in-flight guard turns overlapping ticks into no-ops.
//!
//! Nothing is ordered across tasks. Within one task, tick N finishes before
//! tick N+1 can issue a request.

use crate::poll_task::{Tick, TaskStatus};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Owner of all poll task timing and lifecycle
#[derive(Default)]
pub struct Scheduler {
    tasks: Vec<Arc<dyn Tick>>,
    timers: Vec<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task. A task registered while running is armed immediately.
    pub fn register(&mut self, task: Arc<dyn Tick>) {
        debug!(
            task = task.name(),
            interval_ms = task.interval().as_millis() as u64,
            "registered poll task"
        );
        if self.is_running() {
            self.timers.push(spawn_timer(task.clone()));
        }
        self.tasks.push(task);
    }

    /// Fire every task once and arm its periodic timer
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        info!("Starting {} poll tasks", self.tasks.len());
        self.timers = self.tasks.iter().cloned().map(spawn_timer).collect();
    }

    /// Cancel all timers. In-flight fetches run to completion and are
    /// discarded if their panel is gone by then.
    pub fn stop(&mut self) {
        if self.timers.is_empty() {
            return;
        }
        for timer in self.timers.drain(..) {
            timer.abort();
        }
        info!("Stopped {} poll tasks", self.tasks.len());
    }

    pub fn is_running(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Run `name` now, outside its regular cadence.
    ///
    /// If the task is mid-fetch, the refresh runs right after that fetch.
    /// Returns false when no such task is registered.
    pub fn trigger(&self, name: &str) -> bool {
        let Some(task) = self.task(name) else {
            return false;
        };
        task.request_refresh();
        tokio::spawn(async move {
            task.tick().await;
        });
        true
    }

    pub fn task(&self, name: &str) -> Option<Arc<dyn Tick>> {
        self.tasks.iter().find(|t| t.name() == name).cloned()
    }

    pub fn task_names(&self) -> Vec<String> {
        self.tasks.iter().map(|t| t.name().to_string()).collect()
    }

    pub fn statuses(&self) -> Vec<TaskStatus> {
        self.tasks.iter().map(|t| t.status()).collect()
    }

    pub fn status(&self, name: &str) -> Option<TaskStatus> {
        self.task(name).map(|t| t.status())
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn spawn_timer(task: Arc<dyn Tick>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(task.interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let task = task.clone();
            tokio::spawn(async move {
                task.tick().await;
            });
        }
    })
}
