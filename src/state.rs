//! In-memory application state
//! Everything here lives for one session and is rebuilt on reload

use serde::Serialize;

/// Connected wallet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Wallet address, empty while disconnected
    pub account: String,
    /// Network name derived from the chain ID, empty when unknown
    pub network: String,
}

impl Session {
    pub fn is_connected(&self) -> bool {
        !self.account.is_empty()
    }
}

/// Mint / update form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
    pub domain: String,
    pub record: String,
    /// Submitting updates an existing domain instead of minting
    pub editing: bool,
    /// A write transaction is in flight
    pub loading: bool,
}

/// A registered domain as last fetched.
///
/// `id` is the position in the fetched name list and is not stable across
/// fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintEntry {
    pub id: usize,
    pub name: String,
    pub record: String,
    pub owner: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppState {
    pub session: Session,
    pub form: FormState,
    pub mints: Vec<MintEntry>,
    /// Bumped on every reset; writes started in an older session are stale
    #[serde(skip)]
    epoch: u64,
}

impl AppState {
    pub fn set_account(&mut self, account: impl Into<String>) {
        self.session.account = account.into();
    }

    pub fn set_network(&mut self, network: Option<&str>) {
        self.session.network = network.unwrap_or_default().to_string();
    }

    pub fn set_domain(&mut self, domain: impl Into<String>) {
        self.form.domain = domain.into();
    }

    pub fn set_record(&mut self, record: impl Into<String>) {
        self.form.record = record.into();
    }

    /// Current session epoch
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Claim the form for a write.
    ///
    /// Returns the epoch the write belongs to, or `None` if another write
    /// is already in flight.
    pub fn try_begin_write(&mut self) -> Option<u64> {
        if self.form.loading {
            return None;
        }
        self.form.loading = true;
        Some(self.epoch)
    }

    pub fn end_write(&mut self) {
        self.form.loading = false;
    }

    /// Clear both inputs after a successful write
    pub fn clear_inputs(&mut self) {
        self.form.domain.clear();
        self.form.record.clear();
    }

    /// Leave edit mode after an update went through
    pub fn finish_update(&mut self) {
        self.clear_inputs();
        self.form.editing = false;
    }

    /// Load an entry into the form for updating.
    ///
    /// Returns `false` when no entry has that id.
    pub fn edit(&mut self, id: usize) -> bool {
        let Some(entry) = self.mints.iter().find(|m| m.id == id) else {
            return false;
        };

        self.form.editing = true;
        self.form.domain = entry.name.clone();
        self.form.record = entry.record.clone();
        true
    }

    /// Swap in a freshly fetched snapshot
    pub fn replace_mints(&mut self, mints: Vec<MintEntry>) {
        self.mints = mints;
    }

    /// Discard everything and start a new session
    pub fn reset(&mut self) {
        let epoch = self.epoch + 1;
        *self = Self::default();
        self.epoch = epoch;
    }
}
