//! Test doubles for the wallet, registry and notifier

use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, Notify};

use crate::app::{DomainManager, WalletConnection};
use crate::config::Config;
use crate::error::{RegistryError, WalletError};
use crate::notice::{Notice, Notifier};
use crate::registry::{Registry, TxOutcome};
use crate::wallet::{AddChainParams, WalletProvider};

/// Account every fake wallet hands out and every fake registration is owned by
pub fn owner() -> Address {
    Address::repeat_byte(0xaa)
}

pub struct FakeWallet {
    authorized: AtomicBool,
    reject_connect: bool,
    reject_switch: bool,
    chain_id: Mutex<u64>,
    known: Mutex<HashSet<u64>>,
    added: Mutex<Vec<AddChainParams>>,
    calls: Mutex<Vec<&'static str>>,
    changes: broadcast::Sender<u64>,
}

impl FakeWallet {
    pub fn on_chain(chain_id: u64) -> Self {
        let (changes, _) = broadcast::channel(8);
        Self {
            authorized: AtomicBool::new(false),
            reject_connect: false,
            reject_switch: false,
            chain_id: Mutex::new(chain_id),
            known: Mutex::new(HashSet::from([chain_id])),
            added: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            changes,
        }
    }

    /// The account was approved in an earlier session
    pub fn authorized(self) -> Self {
        self.authorized.store(true, Ordering::SeqCst);
        self
    }

    pub fn knowing(self, chain_id: u64) -> Self {
        self.known.lock().unwrap().insert(chain_id);
        self
    }

    pub fn rejecting_connect(mut self) -> Self {
        self.reject_connect = true;
        self
    }

    pub fn rejecting_switch(mut self) -> Self {
        self.reject_switch = true;
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn added_chains(&self) -> Vec<AddChainParams> {
        self.added.lock().unwrap().clone()
    }

    fn log_call(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn select(&self, chain_id: u64) {
        *self.chain_id.lock().unwrap() = chain_id;
        let _ = self.changes.send(chain_id);
    }
}

#[async_trait]
impl WalletProvider for FakeWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.log_call("request_accounts");
        if self.reject_connect {
            return Err(WalletError::UserRejected);
        }
        self.authorized.store(true, Ordering::SeqCst);
        Ok(vec![owner()])
    }

    async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.log_call("accounts");
        if self.authorized.load(Ordering::SeqCst) {
            Ok(vec![owner()])
        } else {
            Ok(vec![])
        }
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        self.log_call("chain_id");
        Ok(*self.chain_id.lock().unwrap())
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        self.log_call("switch_chain");
        if self.reject_switch {
            return Err(WalletError::UserRejected);
        }
        if !self.known.lock().unwrap().contains(&chain_id) {
            return Err(WalletError::UnrecognizedChain(chain_id));
        }
        self.select(chain_id);
        Ok(())
    }

    async fn add_chain(&self, params: &AddChainParams) -> Result<(), WalletError> {
        self.log_call("add_chain");
        self.added.lock().unwrap().push(params.clone());
        let chain_id = params
            .numeric_chain_id()
            .ok_or_else(|| WalletError::invalid_params("bad chainId"))?;
        self.known.lock().unwrap().insert(chain_id);
        self.select(chain_id);
        Ok(())
    }

    fn subscribe_chain_changed(&self) -> broadcast::Receiver<u64> {
        self.changes.subscribe()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    AllNames,
    Record(String),
    Owner(String),
    Register { name: String, fee: U256 },
    SetRecord { name: String, record: String },
}

/// In-memory registry that records every call
#[derive(Default)]
pub struct FakeRegistry {
    entries: Mutex<Vec<(String, String, Address)>>,
    calls: Mutex<Vec<RegistryCall>>,
    revert_register: bool,
    revert_set_record: bool,
    fail_writes: bool,
    fail_reads: AtomicBool,
    failing_owner: Option<String>,
    hold_registrations: Option<Arc<Notify>>,
    next_tx: AtomicU64,
}

impl FakeRegistry {
    pub fn with_entry(self, name: &str, record: &str, owner: Address) -> Self {
        self.entries
            .lock()
            .unwrap()
            .push((name.to_string(), record.to_string(), owner));
        self
    }

    pub fn reverting_registrations(mut self) -> Self {
        self.revert_register = true;
        self
    }

    pub fn reverting_set_record(mut self) -> Self {
        self.revert_set_record = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn failing_owner(mut self, name: &str) -> Self {
        self.failing_owner = Some(name.to_string());
        self
    }

    /// Registrations block until [`Self::release_handle`] is notified
    pub fn holding_registrations(mut self) -> Self {
        self.hold_registrations = Some(Arc::new(Notify::new()));
        self
    }

    pub fn release_handle(&self) -> Arc<Notify> {
        self.hold_registrations
            .clone()
            .expect("registry is not holding registrations")
    }

    /// Make every later read fail
    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<RegistryCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of transactions submitted
    pub fn writes(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, RegistryCall::Register { .. } | RegistryCall::SetRecord { .. }))
            .count()
    }

    pub fn set_record_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, RegistryCall::SetRecord { .. }))
            .count()
    }

    fn log_call(&self, call: RegistryCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn read_guard(&self) -> Result<(), RegistryError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RegistryError::Contract("execution reverted".into()));
        }
        Ok(())
    }

    fn outcome(&self, succeeded: bool) -> TxOutcome {
        let n = self.next_tx.fetch_add(1, Ordering::SeqCst) + 1;
        TxOutcome {
            hash: H256::from_low_u64_be(n),
            succeeded,
        }
    }
}

#[async_trait]
impl Registry for FakeRegistry {
    async fn all_names(&self) -> Result<Vec<String>, RegistryError> {
        self.log_call(RegistryCall::AllNames);
        self.read_guard()?;
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _, _)| name.clone())
            .collect())
    }

    async fn record(&self, name: &str) -> Result<String, RegistryError> {
        self.log_call(RegistryCall::Record(name.to_string()));
        self.read_guard()?;
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, record, _)| record.clone())
            .unwrap_or_default())
    }

    async fn owner(&self, name: &str) -> Result<Address, RegistryError> {
        self.log_call(RegistryCall::Owner(name.to_string()));
        self.read_guard()?;
        if self.failing_owner.as_deref() == Some(name) {
            return Err(RegistryError::Contract("owner lookup failed".into()));
        }
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, _, owner)| *owner)
            .unwrap_or_default())
    }

    async fn register(&self, name: &str, fee: U256) -> Result<TxOutcome, RegistryError> {
        self.log_call(RegistryCall::Register {
            name: name.to_string(),
            fee,
        });
        if let Some(hold) = &self.hold_registrations {
            hold.notified().await;
        }
        if self.fail_writes {
            return Err(RegistryError::Contract("user rejected transaction".into()));
        }
        if self.revert_register {
            return Ok(self.outcome(false));
        }

        self.entries
            .lock()
            .unwrap()
            .push((name.to_string(), String::new(), owner()));
        Ok(self.outcome(true))
    }

    async fn set_record(&self, name: &str, record: &str) -> Result<TxOutcome, RegistryError> {
        self.log_call(RegistryCall::SetRecord {
            name: name.to_string(),
            record: record.to_string(),
        });
        if self.fail_writes {
            return Err(RegistryError::Contract("user rejected transaction".into()));
        }
        if self.revert_set_record {
            return Ok(self.outcome(false));
        }

        if let Some(entry) = self.entries.lock().unwrap().iter_mut().find(|(n, _, _)| n == name) {
            entry.1 = record.to_string();
        }
        Ok(self.outcome(true))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

pub struct Harness {
    pub manager: Arc<DomainManager>,
    pub registry: Arc<FakeRegistry>,
    pub notices: Arc<RecordingNotifier>,
    wallet: Option<Arc<FakeWallet>>,
}

impl Harness {
    pub fn wallet(&self) -> &FakeWallet {
        self.wallet.as_deref().expect("harness has no wallet")
    }
}

/// Manager wired to fakes; `wallet: None` behaves like a missing wallet
pub fn harness(wallet: Option<FakeWallet>, registry: FakeRegistry) -> Harness {
    let wallet = wallet.map(Arc::new);
    let registry = Arc::new(registry);
    let notices = Arc::new(RecordingNotifier::default());

    let connection = wallet.clone().map(|provider| WalletConnection {
        provider,
        registry: registry.clone(),
    });
    let manager = Arc::new(DomainManager::new(
        Config::default(),
        connection,
        notices.clone(),
    ));

    Harness {
        manager,
        registry,
        notices,
        wallet,
    }
}
