//! User-visible notices.
//!
//! Controllers and workflows publish short messages ("User deleted successfully",
//! "Failed to fetch users") instead of printing them. Front ends drain [`Notices`]
//! and render them however they like.
//!
//! The queue holds at most [`NOTICE_CAPACITY`] notices. A front end that never drains
//! loses the oldest ones, never the newest.

use flume::{Receiver, Sender, TrySendError};

/// Notices kept before the oldest is dropped.
pub const NOTICE_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Sending half. Cheap to clone; publishing never blocks or fails.
#[derive(Debug, Clone)]
pub struct Notifier {
    send: Sender<Notice>,
    // used only to evict the oldest notice when the queue is full
    evict: Receiver<Notice>,
}

/// Receiving half, held by the front end.
#[derive(Debug, Clone)]
pub struct Notices {
    recv: Receiver<Notice>,
}

/// Create a connected notifier/receiver pair.
pub fn channel() -> (Notifier, Notices) {
    let (send, recv) = flume::bounded(NOTICE_CAPACITY);
    let notifier = Notifier {
        send,
        evict: recv.clone(),
    };
    (notifier, Notices { recv })
}

impl Notifier {
    pub fn success(&self, message: impl Into<String>) {
        self.publish(NoticeLevel::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(NoticeLevel::Error, message.into());
    }

    fn publish(&self, level: NoticeLevel, message: String) {
        let mut notice = Notice { level, message };
        loop {
            match self.send.try_send(notice) {
                Ok(()) | Err(TrySendError::Disconnected(_)) => return,
                Err(TrySendError::Full(rejected)) => {
                    drop(self.evict.try_recv());
                    notice = rejected;
                }
            }
        }
    }
}

impl Notices {
    /// Take every notice published so far, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        self.recv.try_iter().collect()
    }

    /// Wait for the next notice. `None` once every notifier is gone and the queue is empty.
    pub async fn next(&self) -> Option<Notice> {
        self.recv.recv_async().await.ok()
    }
}
