//! Filtered List Controller for the log view
//!
//! Holds the operator's filter and the current page, builds the request for
//! the log endpoint and computes pagination controls from the server's
//! `total`. Any filter change sends the view back to page 1.

use crate::api::PATH_LOGS;
use crate::client::ApiRequest;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default rows per log page
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Page buttons shown on either side of the current page
const PAGE_WINDOW: u32 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevelFilter {
    #[default]
    All,
    Error,
    Warning,
    Info,
}

impl LogLevelFilter {
    /// Value sent as the `level` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            LogLevelFilter::All => "all",
            LogLevelFilter::Error => "ERROR",
            LogLevelFilter::Warning => "WARNING",
            LogLevelFilter::Info => "INFO",
        }
    }

    /// Next level in the cycle All → Error → Warning → Info → All
    pub fn next(&self) -> Self {
        match self {
            LogLevelFilter::All => LogLevelFilter::Error,
            LogLevelFilter::Error => LogLevelFilter::Warning,
            LogLevelFilter::Warning => LogLevelFilter::Info,
            LogLevelFilter::Info => LogLevelFilter::All,
        }
    }
}

/// Operator-controlled log query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub level: LogLevelFilter,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// 1-based
    pub page: u32,
    pub page_size: u32,
}

/// Page button layout for the current result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub current: u32,
    pub total_pages: u32,
    pub pages: Vec<u32>,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Compute page buttons: `current±2` clipped to `1..=total_pages`
pub fn paginate(total: u64, page_size: u32, current: u32) -> Pagination {
    let page_size = u64::from(page_size.max(1));
    let total_pages = u32::try_from(total.div_ceil(page_size)).unwrap_or(u32::MAX);
    let first = current.saturating_sub(PAGE_WINDOW).max(1);
    let last = current.saturating_add(PAGE_WINDOW).min(total_pages);

    Pagination {
        current,
        total_pages,
        pages: (first..=last).collect(),
        has_prev: current > 1,
        has_next: current < total_pages,
    }
}

/// Log filter + pagination state machine
#[derive(Debug, Clone)]
pub struct LogFilterController {
    filter: FilterState,
    total: u64,
}

impl LogFilterController {
    pub fn new(page_size: u32) -> Self {
        Self {
            filter: FilterState {
                search: String::new(),
                level: LogLevelFilter::All,
                start_date: None,
                end_date: None,
                page: 1,
                page_size: page_size.max(1),
            },
            total: 0,
        }
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
        self.filter.page = 1;
    }

    pub fn set_level(&mut self, level: LogLevelFilter) {
        self.filter.level = level;
        self.filter.page = 1;
    }

    pub fn cycle_level(&mut self) {
        self.set_level(self.filter.level.next());
    }

    pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.filter.start_date = start;
        self.filter.end_date = end;
        self.filter.page = 1;
    }

    /// Explicit "apply": re-query from the first page
    pub fn apply(&mut self) {
        self.filter.page = 1;
    }

    /// Jump to `page`, clamped to the known page range
    pub fn go_to_page(&mut self, page: u32) {
        let last = self.pagination().total_pages.max(1);
        self.filter.page = page.clamp(1, last);
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.filter.page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.go_to_page(self.filter.page.saturating_sub(1));
    }

    /// Store the server's match count for the current filter
    pub fn record_total(&mut self, total: u64) {
        self.total = total;
    }

    pub fn pagination(&self) -> Pagination {
        paginate(self.total, self.filter.page_size, self.filter.page)
    }

    /// `GET /api/logs` for the current filter; unset fields are sent empty
    pub fn request(&self) -> ApiRequest {
        let date = |d: Option<NaiveDate>| {
            d.map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        };
        ApiRequest::get(PATH_LOGS)
            .with_query("search", &self.filter.search)
            .with_query("level", self.filter.level.as_query())
            .with_query("start", date(self.filter.start_date))
            .with_query("end", date(self.filter.end_date))
            .with_query("page", self.filter.page)
            .with_query("per_page", self.filter.page_size)
    }
}

/// Parse "YYYY-MM-DD..YYYY-MM-DD"; either side may be empty
pub fn parse_date_range(input: &str) -> Result<(Option<NaiveDate>, Option<NaiveDate>), String> {
    let parse = |s: &str| -> Result<Option<NaiveDate>, String> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| format!("invalid date '{}': {}", s, e))
    };

    let (start, end) = input.split_once("..").unwrap_or((input, ""));
    let start = parse(start)?;
    let end = parse(end)?;
    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(format!("start date {} is after end date {}", s, e));
        }
    }
    Ok((start, end))
}
