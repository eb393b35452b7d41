//! Processes screen: process table with client-side name search

use crate::api::{ProcessInfo, PATH_PROCESSES};
use crate::client::ApiRequest;
use crate::error::FetchError;
use crate::poll_task::PanelBinding;
use crate::widgets::TableWidget;

#[derive(Debug, Clone)]
pub struct ProcessPanel {
    search: String,
    table: TableWidget<ProcessInfo>,
}

impl Default for ProcessPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessPanel {
    pub fn new() -> Self {
        Self {
            search: String::new(),
            table: TableWidget::new("processes"),
        }
    }

    /// New search text. Takes effect on the next applied snapshot.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn table(&self) -> &TableWidget<ProcessInfo> {
        &self.table
    }

    fn matches(&self, process: &ProcessInfo) -> bool {
        self.search.is_empty() || process.name.to_lowercase().contains(&self.search.to_lowercase())
    }
}

impl PanelBinding for ProcessPanel {
    type Snapshot = Vec<ProcessInfo>;

    fn request(&self) -> ApiRequest {
        ApiRequest::get(PATH_PROCESSES)
    }

    fn apply(
        &mut self,
        processes: Vec<ProcessInfo>,
        _request: &ApiRequest,
    ) -> Result<(), FetchError> {
        let rows = processes.into_iter().filter(|p| self.matches(p)).collect();
        self.table.replace(rows);
        Ok(())
    }

    fn show_error(&mut self, _error: &FetchError) {
        self.table.show_error();
    }
}
