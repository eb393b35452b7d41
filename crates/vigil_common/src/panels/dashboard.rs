//! Dashboard screen: live metrics and system stats

use super::clock_label;
use crate::api::{MetricsSnapshot, SystemStats, PATH_METRICS, PATH_SYSTEM_STATS};
use crate::client::ApiRequest;
use crate::error::{BufferError, FetchError};
use crate::poll_task::PanelBinding;
use crate::widgets::{GaugeWidget, LineChart, TextField};

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

// ============================================================================
// Metrics (1s)
// ============================================================================

/// Four headline values and their rolling charts
#[derive(Debug, Clone)]
pub struct MetricsPanel {
    cpu: TextField,
    memory: TextField,
    disk_read: TextField,
    disk_write: TextField,
    cpu_chart: LineChart,
    memory_chart: LineChart,
    disk_read_chart: LineChart,
    disk_write_chart: LineChart,
}

impl MetricsPanel {
    pub fn new(capacity: usize) -> Result<Self, BufferError> {
        Ok(Self {
            cpu: TextField::new("cpu-value", "CPU"),
            memory: TextField::new("memory-value", "Memory"),
            disk_read: TextField::new("disk-read", "Disk read"),
            disk_write: TextField::new("disk-write", "Disk write"),
            cpu_chart: LineChart::new("CPU", "%", Some(100.0), &["cpu"], capacity)?,
            memory_chart: LineChart::new("Memory", "%", Some(100.0), &["memory"], capacity)?,
            disk_read_chart: LineChart::new("Disk read", "IOPS", None, &["read"], capacity)?,
            disk_write_chart: LineChart::new("Disk write", "IOPS", None, &["write"], capacity)?,
        })
    }

    pub fn fields(&self) -> [&TextField; 4] {
        [&self.cpu, &self.memory, &self.disk_read, &self.disk_write]
    }

    /// Look a field up by its element id
    pub fn field(&self, id: &str) -> Option<&TextField> {
        self.fields().into_iter().find(|f| f.id() == id)
    }

    pub fn charts(&self) -> [&LineChart; 4] {
        [
            &self.cpu_chart,
            &self.memory_chart,
            &self.disk_read_chart,
            &self.disk_write_chart,
        ]
    }
}

impl PanelBinding for MetricsPanel {
    type Snapshot = MetricsSnapshot;

    fn request(&self) -> ApiRequest {
        ApiRequest::get(PATH_METRICS)
    }

    fn apply(
        &mut self,
        snapshot: MetricsSnapshot,
        _request: &ApiRequest,
    ) -> Result<(), FetchError> {
        self.cpu.set(format!("{}%", snapshot.cpu));
        self.memory.set(format!("{}%", snapshot.memory.usage_percent));
        self.disk_read.set(format!("{} IOPS", snapshot.disk_io.read_iops));
        self.disk_write.set(format!("{} IOPS", snapshot.disk_io.write_iops));

        let label = snapshot.time_label();
        self.cpu_chart.push(label, &[snapshot.cpu]);
        self.memory_chart.push(label, &[snapshot.memory.usage_percent]);
        self.disk_read_chart.push(label, &[snapshot.disk_io.read_iops]);
        self.disk_write_chart.push(label, &[snapshot.disk_io.write_iops]);
        Ok(())
    }

    fn show_error(&mut self, _error: &FetchError) {
        for field in [
            &mut self.cpu,
            &mut self.memory,
            &mut self.disk_read,
            &mut self.disk_write,
        ] {
            field.show_error();
        }
        for chart in [
            &mut self.cpu_chart,
            &mut self.memory_chart,
            &mut self.disk_read_chart,
            &mut self.disk_write_chart,
        ] {
            chart.show_error();
        }
    }
}

// ============================================================================
// System stats (2s)
// ============================================================================

/// Host summary: usage charts, disk gauge and static facts
#[derive(Debug, Clone)]
pub struct SystemStatsPanel {
    cpu_chart: LineChart,
    memory_chart: LineChart,
    disk: GaugeWidget,
    cpu_usage: TextField,
    memory_usage: TextField,
    disk_usage: TextField,
    os_info: TextField,
    cpu_cores: TextField,
    total_memory: TextField,
    running_processes: TextField,
    uptime: TextField,
}

impl SystemStatsPanel {
    pub fn new(capacity: usize) -> Result<Self, BufferError> {
        Ok(Self {
            cpu_chart: LineChart::new("CPU usage", "%", Some(100.0), &["cpu"], capacity)?,
            memory_chart: LineChart::new("Memory usage", "%", Some(100.0), &["memory"], capacity)?,
            disk: GaugeWidget::new("Disk"),
            cpu_usage: TextField::new("cpuUsage", "CPU"),
            memory_usage: TextField::new("memoryUsage", "Memory"),
            disk_usage: TextField::new("diskUsage", "Disk"),
            os_info: TextField::new("osInfo", "OS"),
            cpu_cores: TextField::new("cpuCores", "Cores"),
            total_memory: TextField::new("totalMemory", "Total memory"),
            running_processes: TextField::new("runningProcesses", "Processes"),
            uptime: TextField::new("uptime", "Uptime"),
        })
    }

    pub fn fields(&self) -> [&TextField; 8] {
        [
            &self.cpu_usage,
            &self.memory_usage,
            &self.disk_usage,
            &self.os_info,
            &self.cpu_cores,
            &self.total_memory,
            &self.running_processes,
            &self.uptime,
        ]
    }

    pub fn field(&self, id: &str) -> Option<&TextField> {
        self.fields().into_iter().find(|f| f.id() == id)
    }

    pub fn charts(&self) -> [&LineChart; 2] {
        [&self.cpu_chart, &self.memory_chart]
    }

    pub fn disk(&self) -> &GaugeWidget {
        &self.disk
    }
}

impl PanelBinding for SystemStatsPanel {
    type Snapshot = SystemStats;

    fn request(&self) -> ApiRequest {
        ApiRequest::get(PATH_SYSTEM_STATS)
    }

    fn apply(&mut self, stats: SystemStats, _request: &ApiRequest) -> Result<(), FetchError> {
        let now = clock_label();
        self.cpu_chart.push(&now, &[stats.cpu_percent]);
        self.memory_chart.push(&now, &[stats.memory_percent]);
        self.disk.set(stats.disk_percent);

        self.cpu_usage.set(format!("{:.1}%", stats.cpu_percent));
        self.memory_usage.set(format!("{:.1}%", stats.memory_percent));
        self.disk_usage.set(format!("{:.1}%", stats.disk_percent));
        self.os_info.set(stats.os_info);
        self.cpu_cores.set(stats.cpu_cores.to_string());
        self.total_memory
            .set(format!("{:.1} GB", stats.total_memory as f64 / BYTES_PER_GB));
        self.running_processes.set(stats.running_processes.to_string());
        self.uptime.set(stats.uptime.to_string());
        Ok(())
    }

    fn show_error(&mut self, _error: &FetchError) {
        self.cpu_chart.show_error();
        self.memory_chart.show_error();
        self.disk.show_error();
        for field in [
            &mut self.cpu_usage,
            &mut self.memory_usage,
            &mut self.disk_usage,
            &mut self.os_info,
            &mut self.cpu_cores,
            &mut self.total_memory,
            &mut self.running_processes,
            &mut self.uptime,
        ] {
            field.show_error();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{DiskIo, DisplayValue, MemoryUsage};

    fn metrics(cpu: f64, datetime: &str) -> MetricsSnapshot {
        MetricsSnapshot {
            cpu,
            memory: MemoryUsage { usage_percent: 41.5 },
            disk_io: DiskIo {
                read_iops: 12.0,
                write_iops: 3.0,
            },
            datetime: datetime.to_string(),
        }
    }

    #[test]
    fn test_metrics_apply_formats_fields() {
        let mut panel = MetricsPanel::new(60).unwrap();
        panel.apply(metrics(12.5, "2024-02-28 10:00:01"), &panel.request()).unwrap();

        assert_eq!(panel.field("cpu-value").unwrap().render(), "12.5%");
        assert_eq!(panel.field("memory-value").unwrap().render(), "41.5%");
        assert_eq!(panel.field("disk-read").unwrap().render(), "12 IOPS");
        assert_eq!(panel.field("disk-write").unwrap().render(), "3 IOPS");
        let cpu = &panel.charts()[0].series()[0];
        assert_eq!(cpu.last_label(), Some("10:00:01"));
    }

    #[test]
    fn test_metrics_error_marks_every_field() {
        let mut panel = MetricsPanel::new(60).unwrap();
        panel.apply(metrics(10.0, "2024-02-28 10:00:01"), &panel.request()).unwrap();
        panel.show_error(&FetchError::Status {
            status: 500,
            path: PATH_METRICS.into(),
        });

        for id in ["cpu-value", "memory-value", "disk-read", "disk-write"] {
            assert_eq!(panel.field(id).unwrap().render(), "Error", "{}", id);
        }
        assert!(panel.charts().iter().all(|c| c.is_stale()));
        // Series stop advancing but keep what they had
        assert_eq!(panel.charts()[0].series()[0].len(), 1);
    }

    #[test]
    fn test_metrics_chart_is_bounded() {
        let mut panel = MetricsPanel::new(3).unwrap();
        for (i, cpu) in [60.0, 70.0, 80.0, 90.0].into_iter().enumerate() {
            let request = panel.request();
            panel.apply(metrics(cpu, &format!("2024-02-28 10:00:0{}", i)), &request).unwrap();
        }
        let values: Vec<f64> = panel.charts()[0].series()[0]
            .snapshot()
            .iter()
            .map(|s| s.value)
            .collect();
        assert_eq!(values, vec![70.0, 80.0, 90.0]);
    }

    #[test]
    fn test_system_stats_formatting() {
        let mut panel = SystemStatsPanel::new(10).unwrap();
        let stats = SystemStats {
            cpu_percent: 23.456,
            memory_percent: 50.0,
            disk_percent: 71.3,
            os_info: "Linux 6.1".into(),
            cpu_cores: 8,
            total_memory: 17_179_869_184,
            running_processes: 312,
            uptime: DisplayValue::Text("3 days, 4:05:06".into()),
        };
        panel.apply(stats, &panel.request()).unwrap();

        assert_eq!(panel.field("cpuUsage").unwrap().render(), "23.5%");
        assert_eq!(panel.field("diskUsage").unwrap().render(), "71.3%");
        assert_eq!(panel.field("totalMemory").unwrap().render(), "16.0 GB");
        assert_eq!(panel.field("cpuCores").unwrap().render(), "8");
        assert_eq!(panel.field("uptime").unwrap().render(), "3 days, 4:05:06");
        assert!((panel.disk().ratio() - 0.713).abs() < 1e-9);

        panel.show_error(&FetchError::Decode("bad".into()));
        assert!(panel.fields().iter().all(|f| f.is_error()));
        assert!(panel.disk().is_error());
    }
}
