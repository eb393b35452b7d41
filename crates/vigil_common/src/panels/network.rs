//! Network screen: throughput chart and port table

use super::clock_label;
use crate::api::{NetworkStats, PortStatus, PortsResponse, PATH_NETWORK_PORTS, PATH_NETWORK_STATS};
use crate::client::ApiRequest;
use crate::error::{BufferError, FetchError};
use crate::poll_task::PanelBinding;
use crate::widgets::{LineChart, TableWidget, TextField};

/// Live receive/send rates in KB/s
#[derive(Debug, Clone)]
pub struct NetworkPanel {
    traffic: LineChart,
    download: TextField,
    upload: TextField,
}

impl NetworkPanel {
    pub fn new(capacity: usize) -> Result<Self, BufferError> {
        Ok(Self {
            traffic: LineChart::new("Traffic", "KB/s", None, &["recv", "sent"], capacity)?,
            download: TextField::new("downloadSpeed", "Download"),
            upload: TextField::new("uploadSpeed", "Upload"),
        })
    }

    pub fn traffic(&self) -> &LineChart {
        &self.traffic
    }

    pub fn fields(&self) -> [&TextField; 2] {
        [&self.download, &self.upload]
    }
}

impl PanelBinding for NetworkPanel {
    type Snapshot = NetworkStats;

    fn request(&self) -> ApiRequest {
        ApiRequest::get(PATH_NETWORK_STATS)
    }

    fn apply(&mut self, stats: NetworkStats, _request: &ApiRequest) -> Result<(), FetchError> {
        let recv = stats.bytes_recv_per_sec / 1024.0;
        let sent = stats.bytes_sent_per_sec / 1024.0;
        self.traffic.push(&clock_label(), &[recv, sent]);
        self.download.set(format!("{:.2} KB/s", recv));
        self.upload.set(format!("{:.2} KB/s", sent));
        Ok(())
    }

    fn show_error(&mut self, _error: &FetchError) {
        self.traffic.show_error();
        self.download.show_error();
        self.upload.show_error();
    }
}

/// Well-known port states
#[derive(Debug, Clone)]
pub struct PortsPanel {
    table: TableWidget<PortStatus>,
}

impl Default for PortsPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl PortsPanel {
    pub fn new() -> Self {
        Self {
            table: TableWidget::new("ports"),
        }
    }

    pub fn table(&self) -> &TableWidget<PortStatus> {
        &self.table
    }
}

impl PanelBinding for PortsPanel {
    type Snapshot = PortsResponse;

    fn request(&self) -> ApiRequest {
        ApiRequest::get(PATH_NETWORK_PORTS)
    }

    fn apply(&mut self, response: PortsResponse, _request: &ApiRequest) -> Result<(), FetchError> {
        if !response.is_success() {
            return Err(FetchError::Rejected(format!(
                "port scan returned status {:?}",
                response.status
            )));
        }
        self.table.replace(response.data);
        Ok(())
    }

    fn show_error(&mut self, _error: &FetchError) {
        self.table.show_error();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_rates_in_kb() {
        let mut panel = NetworkPanel::new(30).unwrap();
        panel
            .apply(
                NetworkStats {
                    bytes_recv_per_sec: 2048.0,
                    bytes_sent_per_sec: 512.0,
                },
                &panel.request(),
            )
            .unwrap();
        let [download, upload] = panel.fields();
        assert_eq!(download.render(), "2.00 KB/s");
        assert_eq!(upload.render(), "0.50 KB/s");
        let view = panel.traffic().render();
        assert_eq!(view.datasets[0].latest, Some(2.0));
        assert_eq!(view.datasets[1].latest, Some(0.5));
    }

    #[test]
    fn test_ports_failure_status_is_rejected() {
        let mut panel = PortsPanel::new();
        panel
            .apply(
                PortsResponse {
                    status: "success".into(),
                    data: vec![PortStatus {
                        port: 22,
                        status: "open".into(),
                    }],
                },
                &panel.request(),
            )
            .unwrap();
        assert_eq!(panel.table().rows().len(), 1);

        let result = panel.apply(
            PortsResponse {
                status: "error".into(),
                data: Vec::new(),
            },
            &panel.request(),
        );
        let Err(error) = result else {
            panic!("non-success status must be rejected");
        };
        assert_eq!(error.kind(), "rejected");
        // Rows are left alone; the owning task switches the table to its error marker
        assert_eq!(panel.table().rows().len(), 1);

        panel.show_error(&error);
        assert!(panel.table().is_error());
        assert_eq!(panel.table().placeholder().as_deref(), Some("Failed to load ports"));
    }
}
