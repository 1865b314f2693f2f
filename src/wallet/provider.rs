use async_trait::async_trait;
use ethers::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

use super::chains::{AddChainParams, Chain};
use crate::error::WalletError;

/// Signing client used for contract calls
pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Capabilities the domain manager needs from a wallet.
///
/// Modelled on the EIP-1193 requests a browser wallet answers:
/// `eth_requestAccounts`, `eth_accounts`, `eth_chainId`,
/// `wallet_switchEthereumChain`, `wallet_addEthereumChain` and the
/// `chainChanged` event.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask for account access (may prompt the user)
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// Accounts already authorized, without prompting
    async fn accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// Current chain ID
    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// Switch to a chain the wallet already knows
    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError>;

    /// Register a new chain with the wallet
    async fn add_chain(&self, params: &AddChainParams) -> Result<(), WalletError>;

    /// Subscribe to chain change notifications
    fn subscribe_chain_changed(&self) -> broadcast::Receiver<u64>;
}

#[derive(Clone)]
struct ActiveChain {
    chain_id: u64,
    provider: Provider<Http>,
    client: Arc<SignerClient>,
}

/// Wallet backed by a local private key and an HTTP RPC endpoint.
///
/// The signer's address is its only (and always authorized) account. The
/// wallet knows the chain it was connected on plus any chain added through
/// [`WalletProvider::add_chain`]; switching re-targets the RPC endpoint.
pub struct SignerWallet {
    wallet: LocalWallet,
    known_chains: RwLock<HashMap<u64, String>>,
    active: RwLock<ActiveChain>,
    chain_changes: broadcast::Sender<u64>,
}

impl SignerWallet {
    /// Connect a signer to an RPC endpoint
    pub async fn connect(rpc_url: &str, private_key: &str) -> Result<Self, WalletError> {
        let provider = http_provider(rpc_url)?;
        let chain_id = provider.get_chainid().await?.as_u64();

        let wallet: LocalWallet = private_key
            .trim_start_matches("0x")
            .parse::<LocalWallet>()
            .map_err(|e| WalletError::Signer(e.to_string()))?;

        tracing::info!(
            address = ?wallet.address(),
            chain_id,
            "Signer wallet connected"
        );

        let active = activate(&wallet, chain_id, provider);
        let (chain_changes, _) = broadcast::channel(16);

        Ok(Self {
            wallet,
            known_chains: RwLock::new(HashMap::from([(chain_id, rpc_url.to_string())])),
            active: RwLock::new(active),
            chain_changes,
        })
    }

    /// Signing client for the currently selected chain
    pub fn client(&self) -> Arc<SignerClient> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .client
            .clone()
    }

    /// Address of the signer
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    fn current(&self) -> ActiveChain {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn select(&self, chain_id: u64, rpc_url: &str) -> Result<(), WalletError> {
        let provider = http_provider(rpc_url)?;
        let next = activate(&self.wallet, chain_id, provider);
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = next;

        tracing::info!(chain_id, rpc_url, "Wallet switched chain");
        // Nobody listening is fine
        let _ = self.chain_changes.send(chain_id);
        Ok(())
    }
}

#[async_trait]
impl WalletProvider for SignerWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(vec![self.wallet.address()])
    }

    async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(vec![self.wallet.address()])
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        let provider = self.current().provider;
        Ok(provider.get_chainid().await?.as_u64())
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        if self.current().chain_id == chain_id {
            return Ok(());
        }

        let rpc_url = self
            .known_chains
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&chain_id)
            .cloned()
            .ok_or(WalletError::UnrecognizedChain(chain_id))?;

        self.select(chain_id, &rpc_url)
    }

    async fn add_chain(&self, params: &AddChainParams) -> Result<(), WalletError> {
        let chain_id = params
            .numeric_chain_id()
            .ok_or_else(|| WalletError::invalid_params(format!("bad chainId {}", params.chain_id)))?;
        let rpc_url = params
            .rpc_urls
            .first()
            .cloned()
            .ok_or_else(|| WalletError::invalid_params("rpcUrls is empty"))?;

        // Validate the endpoint before remembering it
        http_provider(&rpc_url)?;

        tracing::info!(
            chain_id,
            chain_name = %params.chain_name,
            known = Chain::from_id(chain_id).is_some(),
            "Adding chain to wallet"
        );

        self.known_chains
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(chain_id, rpc_url);

        // Like browser wallets, adding a chain also selects it
        self.switch_chain(chain_id).await
    }

    fn subscribe_chain_changed(&self) -> broadcast::Receiver<u64> {
        self.chain_changes.subscribe()
    }
}

fn http_provider(rpc_url: &str) -> Result<Provider<Http>, WalletError> {
    Provider::<Http>::try_from(rpc_url).map_err(|e| WalletError::InvalidRpcUrl(format!("{rpc_url}: {e}")))
}

fn activate(wallet: &LocalWallet, chain_id: u64, provider: Provider<Http>) -> ActiveChain {
    let signer = wallet.clone().with_chain_id(chain_id);
    let client = Arc::new(SignerMiddleware::new(provider.clone(), signer));
    ActiveChain {
        chain_id,
        provider,
        client,
    }
}
