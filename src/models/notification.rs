use serde::{Deserialize, Serialize};

use super::enums::NotificationKind;

/// In-session notification shown in the header bell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub time: String,
    pub read: bool,
}

/// Notifications every new session starts with.
pub fn initial_notifications() -> Vec<Notification> {
    vec![
        Notification {
            id: "1".into(),
            title: "High Risk Alert".into(),
            message: "Patient PX-1029 shows toxicity risk for Clopidogrel.".into(),
            kind: NotificationKind::Alert,
            time: "2m ago".into(),
            read: false,
        },
        Notification {
            id: "2".into(),
            title: "System Update".into(),
            message: "CPIC guidelines v2.4 successfully integrated.".into(),
            kind: NotificationKind::Success,
            time: "1h ago".into(),
            read: false,
        },
        Notification {
            id: "3".into(),
            title: "New Report".into(),
            message: "Analysis for Patient PX-2041 is complete.".into(),
            kind: NotificationKind::Info,
            time: "3h ago".into(),
            read: true,
        },
    ]
}

/// Number of notifications not yet marked read.
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}
