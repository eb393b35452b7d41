//! Console - builds every panel and poll task and owns the scheduler
//!
//! Panels are shared as `Arc<RwLock<_>>` between the renderer (reads) and
//! their one poll task (writes, through a weak handle). Dropping the console
//! stops the timers and releases the panels, so late results are discarded.

use crate::client::TelemetrySource;
use crate::config::Config;
use crate::error::BufferError;
use crate::filter::LogFilterController;
use crate::panels::{
    AlertHistoryPanel, BottlenecksPanel, LogPanel, MetricsPanel, NetworkPanel, PerformancePanel,
    PortsPanel, ProcessPanel, RecommendationsPanel, SystemStatsPanel, TASK_ALERTS,
    TASK_BOTTLENECKS, TASK_LOGS, TASK_METRICS, TASK_NETWORK, TASK_PERFORMANCE, TASK_PORTS,
    TASK_PROCESSES, TASK_RECOMMENDATIONS, TASK_SYSTEM,
};
use crate::poll_task::{PanelBinding, PollTask, TaskStatus, Tick};
use crate::scheduler::Scheduler;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use tracing::info;

pub type Shared<P> = Arc<RwLock<P>>;

/// Read access to a shared panel
pub fn read<P>(panel: &Shared<P>) -> RwLockReadGuard<'_, P> {
    panel.read().unwrap_or_else(PoisonError::into_inner)
}

/// Every panel of the console
pub struct Panels {
    pub metrics: Shared<MetricsPanel>,
    pub system: Shared<SystemStatsPanel>,
    pub network: Shared<NetworkPanel>,
    pub ports: Shared<PortsPanel>,
    pub performance: Shared<PerformancePanel>,
    pub bottlenecks: Shared<BottlenecksPanel>,
    pub recommendations: Shared<RecommendationsPanel>,
    pub processes: Shared<ProcessPanel>,
    pub alerts: Shared<AlertHistoryPanel>,
    pub logs: Shared<LogPanel>,
}

impl Panels {
    fn new(config: &Config) -> Result<Self, BufferError> {
        let buffers = &config.buffers;
        Ok(Self {
            metrics: shared(MetricsPanel::new(buffers.metrics_points)?),
            system: shared(SystemStatsPanel::new(buffers.system_points)?),
            network: shared(NetworkPanel::new(buffers.network_points)?),
            ports: shared(PortsPanel::new()),
            performance: shared(PerformancePanel::new(buffers.performance_points)?),
            bottlenecks: shared(BottlenecksPanel::new()),
            recommendations: shared(RecommendationsPanel::new()),
            processes: shared(ProcessPanel::new()),
            alerts: shared(AlertHistoryPanel::new()),
            logs: shared(LogPanel::new(config.logs.page_size)),
        })
    }
}

fn shared<P>(panel: P) -> Shared<P> {
    Arc::new(RwLock::new(panel))
}

/// The live telemetry console
pub struct Console {
    panels: Panels,
    scheduler: Scheduler,
}

impl Console {
    pub fn new(config: &Config, source: Arc<dyn TelemetrySource>) -> Result<Self, BufferError> {
        let panels = Panels::new(config)?;
        let mut scheduler = Scheduler::new();

        let mut add = |task: Arc<dyn Tick>| scheduler.register(task);
        add(poll_task(TASK_METRICS, config, &source, &panels.metrics));
        add(poll_task(TASK_SYSTEM, config, &source, &panels.system));
        add(poll_task(TASK_NETWORK, config, &source, &panels.network));
        add(poll_task(TASK_PORTS, config, &source, &panels.ports));
        add(poll_task(TASK_PERFORMANCE, config, &source, &panels.performance));
        add(poll_task(TASK_BOTTLENECKS, config, &source, &panels.bottlenecks));
        add(poll_task(TASK_RECOMMENDATIONS, config, &source, &panels.recommendations));
        add(poll_task(TASK_PROCESSES, config, &source, &panels.processes));
        add(poll_task(TASK_ALERTS, config, &source, &panels.alerts));
        add(poll_task(TASK_LOGS, config, &source, &panels.logs));

        Ok(Self { panels, scheduler })
    }

    pub fn panels(&self) -> &Panels {
        &self.panels
    }

    /// Cold-start every task and arm the timers
    pub fn start(&mut self) {
        self.scheduler.start();
    }

    pub fn shutdown(&mut self) {
        if self.scheduler.is_running() {
            info!("Shutting down console");
        }
        self.scheduler.stop();
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Run one task now; false for an unknown task name
    pub fn refresh(&self, task: &str) -> bool {
        self.scheduler.trigger(task)
    }

    pub fn statuses(&self) -> Vec<TaskStatus> {
        self.scheduler.statuses()
    }

    pub fn status(&self, task: &str) -> Option<TaskStatus> {
        self.scheduler.status(task)
    }

    /// Edit the log filter, then fetch the resulting page right away
    pub fn update_log_filter<F>(&self, edit: F)
    where
        F: FnOnce(&mut LogFilterController),
    {
        {
            let mut logs = self.panels.logs.write().unwrap_or_else(PoisonError::into_inner);
            edit(logs.controller_mut());
        }
        self.refresh(TASK_LOGS);
    }

    /// Change the process name filter and refresh the table
    pub fn set_process_search(&self, search: &str) {
        self.panels
            .processes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_search(search);
        self.refresh(TASK_PROCESSES);
    }
}

fn poll_task<P: PanelBinding>(
    name: &str,
    config: &Config,
    source: &Arc<dyn TelemetrySource>,
    panel: &Shared<P>,
) -> Arc<dyn Tick> {
    Arc::new(PollTask::new(
        name,
        config.interval(name),
        config.request_timeout(),
        source.clone(),
        panel,
    ))
}
