mod vote;

pub use vote::{Refresh, ToggleController};

use crate::error::StoreError;
use crate::stats::StatsSnapshot;
use async_trait::async_trait;
use log::{error, info};

pub const VOTE_MARKED_MESSAGE: &str = "Đã đánh dấu bỏ phiếu";
pub const VOTE_UNMARKED_MESSAGE: &str = "Đã bỏ đánh dấu";
pub const VOTE_FAILED_MESSAGE: &str = "Lỗi khi cập nhật trạng thái bỏ phiếu";

/// Durable write of one resident's voting flag.
#[async_trait]
pub trait VoteStore: Send + Sync {
    async fn persist_vote(&self, resident_id: &str, has_voted: bool) -> Result<(), StoreError>;
}

/// Authoritative source for the per-group voting stats.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn fetch_voting_stats(&self) -> Result<StatsSnapshot, StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn vote_applied(has_voted: bool) -> Self {
        let message = if has_voted {
            VOTE_MARKED_MESSAGE
        } else {
            VOTE_UNMARKED_MESSAGE
        };
        Self {
            kind: NotificationKind::Success,
            message: message.to_string(),
        }
    }

    pub fn vote_failed() -> Self {
        Self {
            kind: NotificationKind::Failure,
            message: VOTE_FAILED_MESSAGE.to_string(),
        }
    }
}

/// Toast-equivalent channel, called once after every completed toggle.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log. Used by the command line front end.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => info!("{}", notification.message),
            NotificationKind::Failure => error!("{}", notification.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_message_depends_on_applied_flag() {
        assert_eq!(Notification::vote_applied(true).message, VOTE_MARKED_MESSAGE);
        assert_eq!(Notification::vote_applied(false).message, VOTE_UNMARKED_MESSAGE);
        assert_eq!(Notification::vote_applied(false).kind, NotificationKind::Success);
    }

    #[test]
    fn failure_notification() {
        let notification = Notification::vote_failed();
        assert_eq!(notification.kind, NotificationKind::Failure);
        assert_eq!(notification.message, VOTE_FAILED_MESSAGE);
    }
}
