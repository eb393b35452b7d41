//! Operator actions - one-shot request/response calls
//!
//! None of these keep state between calls. Endpoints that answer with a
//! `success`/`status` discriminator are checked here so callers only see
//! `Ok` for an accepted action.

use crate::api::{
    ActionResult, AlertRecord, AlertSettings, ReportList, ReportRequest, ReportSummary,
    SpeedTestResult, PATH_ALERT_HISTORY, PATH_ALERT_SETTINGS, PATH_ALERT_TEST, PATH_EXPORT_CSV,
    PATH_NETWORK_SPEEDTEST, PATH_PERFORMANCE_REPORT, PATH_REPORTS_GENERATE, PATH_REPORTS_LIST,
};
use crate::client::HttpTelemetryClient;
use crate::error::FetchError;
use chrono::NaiveDate;
use std::fmt;
use tracing::info;

/// Download format offered for a generated report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Excel,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Excel => "excel",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `/api/reports/<action>/<id>` with the id escaped into one path segment
fn report_path(action: &str, id: &str) -> Result<String, FetchError> {
    if id.trim().is_empty() {
        return Err(FetchError::Rejected("report id is empty".into()));
    }
    Ok(format!("/api/reports/{}/{}", action, urlencoding::encode(id)))
}

/// Turn a rejected action into `FetchError::Rejected`
fn ensure_success(result: ActionResult, action: &str) -> Result<ActionResult, FetchError> {
    if result.is_success() {
        Ok(result)
    } else {
        let message = result
            .message
            .clone()
            .unwrap_or_else(|| format!("{} failed", action));
        Err(FetchError::Rejected(message))
    }
}

/// Request/response actions against the telemetry API
#[derive(Debug, Clone)]
pub struct ConsoleActions {
    client: HttpTelemetryClient,
}

impl ConsoleActions {
    pub fn new(client: HttpTelemetryClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &HttpTelemetryClient {
        &self.client
    }

    /// Collected metrics as CSV
    pub async fn export_csv(&self) -> Result<Vec<u8>, FetchError> {
        self.client.get_bytes(PATH_EXPORT_CSV).await
    }

    pub async fn speed_test(&self) -> Result<SpeedTestResult, FetchError> {
        self.client.get_json(PATH_NETWORK_SPEEDTEST).await
    }

    pub async fn stop_process(&self, pid: u32) -> Result<(), FetchError> {
        let path = format!("/api/processes/{}/stop", pid);
        let result = self.client.post_json::<(), ActionResult>(&path, None).await?;
        ensure_success(result, "stop process")?;
        info!(pid, "Process stop requested");
        Ok(())
    }

    pub async fn list_reports(&self) -> Result<Vec<ReportSummary>, FetchError> {
        let list: ReportList = self.client.get_json(PATH_REPORTS_LIST).await?;
        Ok(list.reports)
    }

    /// Ask the server to build a report for `start..=end`
    pub async fn generate_report(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        kind: &str,
    ) -> Result<Option<String>, FetchError> {
        if start > end {
            return Err(FetchError::Rejected(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }
        let body = ReportRequest {
            start_date: start.format("%Y-%m-%d").to_string(),
            end_date: end.format("%Y-%m-%d").to_string(),
            kind: kind.to_string(),
        };
        let result = self
            .client
            .post_json::<_, ActionResult>(PATH_REPORTS_GENERATE, Some(&body))
            .await?;
        Ok(ensure_success(result, "report generation")?.message)
    }

    pub async fn download_report(
        &self,
        id: &str,
        format: ReportFormat,
    ) -> Result<Vec<u8>, FetchError> {
        let path = format!("{}/{}", report_path("download", id)?, format);
        self.client.get_bytes(&path).await
    }

    pub async fn delete_report(&self, id: &str) -> Result<(), FetchError> {
        let result: ActionResult = self.client.delete(&report_path("delete", id)?).await?;
        ensure_success(result, "report deletion")?;
        Ok(())
    }

    /// PDF summary of the current performance analysis
    pub async fn performance_report(&self) -> Result<Vec<u8>, FetchError> {
        self.client.post_bytes(PATH_PERFORMANCE_REPORT).await
    }

    pub async fn alert_settings(&self) -> Result<AlertSettings, FetchError> {
        self.client.get_json(PATH_ALERT_SETTINGS).await
    }

    pub async fn save_alert_settings(&self, settings: &AlertSettings) -> Result<(), FetchError> {
        let result = self
            .client
            .post_json::<_, ActionResult>(PATH_ALERT_SETTINGS, Some(settings))
            .await?;
        ensure_success(result, "saving alert settings")?;
        Ok(())
    }

    pub async fn send_test_alert(&self) -> Result<(), FetchError> {
        let result = self
            .client
            .post_json::<(), ActionResult>(PATH_ALERT_TEST, None)
            .await?;
        ensure_success(result, "test alert")?;
        Ok(())
    }

    pub async fn alert_history(&self) -> Result<Vec<AlertRecord>, FetchError> {
        self.client.get_json(PATH_ALERT_HISTORY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_success() {
        let ok = ActionResult {
            success: Some(true),
            ..Default::default()
        };
        assert!(ensure_success(ok, "x").is_ok());

        let rejected = ActionResult {
            status: Some("error".into()),
            message: Some("report already exists".into()),
            ..Default::default()
        };
        assert_eq!(
            ensure_success(rejected, "x").unwrap_err(),
            FetchError::Rejected("report already exists".into())
        );

        let silent = ActionResult::default();
        assert_eq!(
            ensure_success(silent, "test alert").unwrap_err(),
            FetchError::Rejected("test alert failed".into())
        );
    }

    #[test]
    fn test_report_format_path_segment() {
        assert_eq!(ReportFormat::Csv.to_string(), "csv");
        assert_eq!(ReportFormat::Excel.as_str(), "excel");
    }

    #[test]
    fn test_report_path_escapes_id() {
        assert_eq!(
            report_path("delete", "report_20240228").unwrap(),
            "/api/reports/delete/report_20240228"
        );
        assert_eq!(
            report_path("download", "../x?y#z").unwrap(),
            "/api/reports/download/..%2Fx%3Fy%23z"
        );
        assert!(matches!(report_path("delete", "  "), Err(FetchError::Rejected(_))));
    }
}
