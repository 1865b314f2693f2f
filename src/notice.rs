use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Blocking user-facing notices.
///
/// Everything else the manager runs into is only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// No wallet provider is available
    WalletMissing,
    /// Name shorter than the registry minimum
    DomainTooShort,
    /// Registration mined with a failure status
    MintFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::WalletMissing => {
                "No wallet found. Install MetaMask -> https://metamask.io/ or set PRIVATE_KEY"
            }
            Notice::DomainTooShort => "Domain is too short. Must be at least 3 characters long",
            Notice::MintFailed => "Domain minting failed. Please try again.",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Where notices go
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Queues notices until a front end collects them
#[derive(Debug, Default)]
pub struct NoticeBoard {
    pending: Mutex<VecDeque<Notice>>,
}

impl NoticeBoard {
    /// Take every pending notice, oldest first
    pub fn drain(&self) -> Vec<Notice> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }
}

impl Notifier for NoticeBoard {
    fn notify(&self, notice: Notice) {
        tracing::warn!(notice = ?notice, "{}", notice.message());
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(notice);
    }
}
