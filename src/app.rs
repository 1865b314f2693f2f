//! Domain manager
//! Drives the wallet session, network gate and registry reads/writes

use ethers::utils::to_checksum;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::WalletError;
use crate::notice::{Notice, Notifier};
use crate::registry::pricing::domain_length;
use crate::registry::{fetch_all, register_with_record, update_record, MintOutcome, Registry, MIN_DOMAIN_LENGTH};
use crate::state::AppState;
use crate::view::{self, View};
use crate::wallet::{network_name, WalletProvider};

/// A wallet together with the registry reached through it
#[derive(Clone)]
pub struct WalletConnection {
    pub provider: Arc<dyn WalletProvider>,
    pub registry: Arc<dyn Registry>,
}

/// Owns the application state and every transition on it.
///
/// State sits behind a mutex that is never held across an await, so a
/// front end can render (and see `loading`) while a write is in flight.
pub struct DomainManager {
    config: Config,
    wallet: Option<WalletConnection>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<AppState>,
    listening: AtomicBool,
}

impl DomainManager {
    /// `wallet` is `None` when no wallet provider is available at all
    pub fn new(config: Config, wallet: Option<WalletConnection>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config,
            wallet,
            notifier,
            state: Mutex::new(AppState::default()),
            listening: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> AppState {
        self.update(|s| s.clone())
    }

    /// Render the current state
    pub fn view(&self) -> View {
        view::render(&self.snapshot(), self.config.required_chain.name())
    }

    fn update<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Apply `f` only if no reload happened since `epoch`
    fn update_if_current<R>(&self, epoch: u64, f: impl FnOnce(&mut AppState) -> R) -> Option<R> {
        self.update(|s| (s.epoch() == epoch).then(|| f(s)))
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.update(|s| s.epoch() == epoch)
    }

    // ---------------------------------------------------------------------
    // Wallet session
    // ---------------------------------------------------------------------

    /// Ask the wallet for account access
    pub async fn connect(&self) {
        let Some(wallet) = &self.wallet else {
            self.notifier.notify(Notice::WalletMissing);
            return;
        };

        match wallet.provider.request_accounts().await {
            Ok(accounts) => match accounts.first() {
                Some(account) => {
                    let account = to_checksum(account, None);
                    tracing::info!(%account, "Connected to wallet");
                    self.update(|s| s.set_account(account));
                    self.refresh_if_ready().await;
                }
                None => tracing::warn!("Wallet returned no accounts"),
            },
            Err(e) => tracing::error!(error = %e, code = ?e.code(), "Wallet connection failed"),
        }
    }

    /// Pick up an already-authorized account and the current network
    /// without prompting, and start listening for chain changes.
    pub async fn check_existing_session(self: &Arc<Self>) {
        let Some(wallet) = &self.wallet else {
            tracing::warn!("No wallet provider available");
            return;
        };

        match wallet.provider.accounts().await {
            Ok(accounts) => match accounts.first() {
                Some(account) => {
                    let account = to_checksum(account, None);
                    tracing::info!(%account, "Found an authorized account");
                    self.update(|s| s.set_account(account));
                }
                None => tracing::info!("No authorized accounts found"),
            },
            Err(e) => tracing::error!(error = %e, "Failed to list wallet accounts"),
        }

        match wallet.provider.chain_id().await {
            Ok(chain_id) => {
                let network = network_name(chain_id);
                tracing::info!(chain_id, network = network.unwrap_or("unknown"), "Detected network");
                self.update(|s| s.set_network(network));
            }
            Err(e) => tracing::error!(error = %e, "Failed to read chain ID"),
        }

        self.listen_for_chain_changes(&wallet.provider);
    }

    /// Startup sequence: restore the session, then load domains if the
    /// network allows it
    pub async fn initialize(self: &Arc<Self>) {
        self.check_existing_session().await;
        self.refresh_if_ready().await;
    }

    /// Throw away all state and start over
    pub async fn reload(self: &Arc<Self>) {
        tracing::info!("Reloading domain manager");
        self.update(AppState::reset);
        self.initialize().await;
    }

    fn listen_for_chain_changes(self: &Arc<Self>, provider: &Arc<dyn WalletProvider>) {
        if self.listening.swap(true, Ordering::SeqCst) {
            return;
        }

        let mut changes = provider.subscribe_chain_changed();
        let manager = Arc::downgrade(self);

        tokio::spawn(async move {
            loop {
                let chain_id = match changes.recv().await {
                    Ok(chain_id) => Some(chain_id),
                    Err(RecvError::Lagged(_)) => None,
                    Err(RecvError::Closed) => break,
                };
                let Some(manager) = manager.upgrade() else {
                    break;
                };

                tracing::info!(chain_id = ?chain_id, "Chain changed");
                manager.reload().await;
            }
        });
    }

    // ---------------------------------------------------------------------
    // Network gate
    // ---------------------------------------------------------------------

    /// Whether the wallet is on the chain the registry lives on
    pub fn is_on_required_network(&self) -> bool {
        let required = self.config.required_chain.name();
        self.update(|s| s.session.network == required)
    }

    /// Ask the wallet to move to the required chain, adding it first if
    /// the wallet has never heard of it
    pub async fn switch_network(&self) {
        let Some(wallet) = &self.wallet else {
            self.notifier.notify(Notice::WalletMissing);
            return;
        };

        let required = self.config.required_chain;
        match wallet.provider.switch_chain(required.chain_id()).await {
            Ok(()) => tracing::info!(chain = %required, "Switched network"),
            Err(e) if e.code() == Some(WalletError::UNRECOGNIZED_CHAIN) => {
                tracing::info!(chain = %required, "Chain unknown to wallet, requesting to add it");
                let Some(params) = required.add_chain_params() else {
                    tracing::error!(chain = %required, "No RPC endpoint to offer the wallet");
                    return;
                };
                if let Err(e) = wallet.provider.add_chain(&params).await {
                    tracing::error!(error = %e, chain = %required, "Failed to add chain");
                }
            }
            Err(e) => tracing::error!(error = %e, chain = %required, "Failed to switch network"),
        }
    }

    // ---------------------------------------------------------------------
    // Registry reader
    // ---------------------------------------------------------------------

    /// Replace the domain list with a fresh snapshot; on failure the old
    /// list stays up
    pub async fn fetch_mints(&self) {
        let Some(wallet) = &self.wallet else {
            return;
        };

        match fetch_all(wallet.registry.as_ref()).await {
            Ok(mints) => {
                tracing::info!(count = mints.len(), "Mints fetched");
                self.update(|s| s.replace_mints(mints));
            }
            Err(e) => tracing::error!(error = %e, "Failed to fetch mints"),
        }
    }

    async fn refresh_if_ready(&self) {
        if self.is_on_required_network() {
            self.fetch_mints().await;
        }
    }

    /// Re-read the registry after `delay`, without waiting for it
    pub fn schedule_refresh(self: &Arc<Self>, delay: Duration) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            manager.fetch_mints().await;
        })
    }

    // ---------------------------------------------------------------------
    // Form
    // ---------------------------------------------------------------------

    pub fn set_domain(&self, domain: impl Into<String>) {
        let domain = domain.into();
        self.update(|s| s.set_domain(domain));
    }

    pub fn set_record(&self, record: impl Into<String>) {
        let record = record.into();
        self.update(|s| s.set_record(record));
    }

    /// Load a listed domain into the form for updating
    pub fn edit(&self, id: usize) -> bool {
        self.update(|s| s.edit(id))
    }

    /// Press the form's submit button
    pub async fn submit(self: &Arc<Self>) {
        let (editing, loading) = self.update(|s| (s.form.editing, s.form.loading));
        if loading {
            tracing::debug!("Write already in flight, ignoring submit");
            return;
        }
        if !self.is_on_required_network() {
            tracing::warn!("Not on the required network, ignoring submit");
            return;
        }

        if editing {
            self.update_domain().await;
        } else {
            self.mint_domain().await;
        }
    }

    // ---------------------------------------------------------------------
    // Registry writer
    // ---------------------------------------------------------------------

    /// Register the name in the form and set its record
    pub async fn mint_domain(self: &Arc<Self>) {
        let (domain, record) = self.update(|s| (s.form.domain.clone(), s.form.record.clone()));

        if domain.is_empty() {
            return;
        }
        if domain_length(&domain) < MIN_DOMAIN_LENGTH {
            self.notifier.notify(Notice::DomainTooShort);
            return;
        }
        let Some(wallet) = &self.wallet else {
            tracing::warn!(%domain, "No wallet provider, cannot mint");
            return;
        };

        let Some(epoch) = self.update(AppState::try_begin_write) else {
            tracing::debug!(%domain, "Write already in flight, not minting");
            return;
        };

        let fee = self.config.fees.fee_for(&domain);
        tracing::info!(%domain, %fee, "Minting domain");

        let outcome = register_with_record(
            wallet.registry.as_ref(),
            self.config.required_chain,
            &domain,
            &record,
            fee,
            || self.is_current(epoch),
        )
        .await;

        match outcome {
            Ok(MintOutcome::Minted { .. }) => {
                let settled = self.update_if_current(epoch, |s| {
                    s.end_write();
                    s.clear_inputs();
                });
                match settled {
                    Some(()) => {
                        self.schedule_refresh(self.config.refresh_delay);
                    }
                    None => discarded(&domain),
                }
            }
            Ok(MintOutcome::Reverted { .. }) => match self.update_if_current(epoch, AppState::end_write) {
                Some(()) => self.notifier.notify(Notice::MintFailed),
                None => discarded(&domain),
            },
            Ok(MintOutcome::Abandoned { .. }) => discarded(&domain),
            Err(e) => {
                tracing::error!(error = %e, %domain, "Minting failed");
                self.update_if_current(epoch, AppState::end_write);
            }
        }
    }

    /// Set a new record on the domain in the form
    pub async fn update_domain(&self) {
        let (domain, record) = self.update(|s| (s.form.domain.clone(), s.form.record.clone()));

        if record.is_empty() || domain.is_empty() {
            return;
        }
        let Some(wallet) = &self.wallet else {
            tracing::warn!(%domain, "No wallet provider, cannot update");
            return;
        };

        let Some(epoch) = self.update(AppState::try_begin_write) else {
            tracing::debug!(%domain, "Write already in flight, not updating");
            return;
        };

        match update_record(wallet.registry.as_ref(), self.config.required_chain, &domain, &record).await {
            Ok(_) if self.is_current(epoch) => {
                self.fetch_mints().await;
                self.update_if_current(epoch, AppState::finish_update);
            }
            Ok(_) => discarded(&domain),
            Err(e) => tracing::error!(error = %e, %domain, "Updating record failed"),
        }

        self.update_if_current(epoch, AppState::end_write);
    }
}

fn discarded(domain: &str) {
    tracing::info!(%domain, "Session reloaded during write, result discarded");
}
