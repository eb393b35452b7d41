//! Alerts screen: recent alert history

use super::performance::table_panel;
use crate::api::{AlertRecord, PATH_ALERT_HISTORY};
use crate::client::ApiRequest;
use crate::error::FetchError;
use crate::poll_task::PanelBinding;
use crate::widgets::TableWidget;

table_panel!(
    /// Alerts raised by the server, newest first as sent (30s)
    AlertHistoryPanel,
    AlertRecord,
    PATH_ALERT_HISTORY,
    "alerts"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_replaced_wholesale() {
        let mut panel = AlertHistoryPanel::new();
        let alert = |message: &str| AlertRecord {
            level: "warning".into(),
            message: message.into(),
            timestamp: "2024-02-28 10:00:00".into(),
        };
        panel.apply(vec![alert("cpu high"), alert("disk high")], &panel.request()).unwrap();
        panel.apply(vec![alert("memory high")], &panel.request()).unwrap();
        assert_eq!(panel.table().rows().len(), 1);
        assert_eq!(panel.table().rows()[0].message, "memory high");

        panel.show_error(&FetchError::Transport("refused".into()));
        assert_eq!(panel.table().placeholder().as_deref(), Some("Failed to load alerts"));
    }
}
