//! Logs screen: filtered, paginated log table

use crate::api::{LogPage, LogRecord};
use crate::client::ApiRequest;
use crate::error::FetchError;
use crate::filter::{LogFilterController, Pagination};
use crate::poll_task::PanelBinding;
use crate::widgets::{TableWidget, TextField};
use tracing::debug;

/// Log page view driven by a `LogFilterController`
#[derive(Debug, Clone)]
pub struct LogPanel {
    controller: LogFilterController,
    table: TableWidget<LogRecord>,
    total: TextField,
}

impl LogPanel {
    pub fn new(page_size: u32) -> Self {
        Self {
            controller: LogFilterController::new(page_size),
            table: TableWidget::new("logs"),
            total: TextField::new("totalLogs", "Total"),
        }
    }

    pub fn controller(&self) -> &LogFilterController {
        &self.controller
    }

    /// Mutable access for filter edits. The caller triggers the refresh.
    pub fn controller_mut(&mut self) -> &mut LogFilterController {
        &mut self.controller
    }

    pub fn table(&self) -> &TableWidget<LogRecord> {
        &self.table
    }

    pub fn total(&self) -> &TextField {
        &self.total
    }

    pub fn pagination(&self) -> Pagination {
        self.controller.pagination()
    }
}

impl PanelBinding for LogPanel {
    type Snapshot = LogPage;

    fn request(&self) -> ApiRequest {
        self.controller.request()
    }

    fn apply(&mut self, page: LogPage, request: &ApiRequest) -> Result<(), FetchError> {
        if *request != self.controller.request() {
            debug!(page = ?request.param("page"), "dropping log page for an outdated filter");
            return Ok(());
        }
        self.controller.record_total(page.total);
        self.total.set(page.total.to_string());
        self.table.replace(page.logs);
        Ok(())
    }

    fn show_error(&mut self, _error: &FetchError) {
        self.table.show_error();
        self.total.show_error();
    }
}
