use async_trait::async_trait;
use ethers::prelude::*;
use std::sync::Arc;

use super::{Registry, TxOutcome};
use crate::error::RegistryError;
use crate::wallet::{SignerClient, SignerWallet};

/// Registry contract address on Trigon
pub const DOMAINS_CONTRACT: &str = "0xa1c575342591f6d8fc79a26cBaDDc8485ca8eE52";

// Generate contract bindings for the domain registry
abigen!(
    Domains,
    r#"[
        function register(string name) public payable
        function setRecord(string name, string record) public
        function getAllNames() public view returns (string[])
        function records(string name) public view returns (string)
        function domains(string name) public view returns (address)
    ]"#
);

/// Registry backed by the deployed contract.
///
/// Calls go through whichever chain the wallet currently has selected.
pub struct DomainsContract {
    wallet: Arc<SignerWallet>,
    address: Address,
}

impl DomainsContract {
    pub fn new(wallet: Arc<SignerWallet>, contract_address: &str) -> Result<Self, RegistryError> {
        let address: Address = contract_address
            .parse()
            .map_err(|_| RegistryError::InvalidAddress(contract_address.to_string()))?;

        Ok(Self { wallet, address })
    }

    fn contract(&self) -> Domains<SignerClient> {
        Domains::new(self.address, self.wallet.client())
    }
}

#[async_trait]
impl Registry for DomainsContract {
    async fn all_names(&self) -> Result<Vec<String>, RegistryError> {
        self.contract()
            .get_all_names()
            .call()
            .await
            .map_err(contract_error)
    }

    async fn record(&self, name: &str) -> Result<String, RegistryError> {
        self.contract()
            .records(name.to_string())
            .call()
            .await
            .map_err(contract_error)
    }

    async fn owner(&self, name: &str) -> Result<Address, RegistryError> {
        self.contract()
            .domains(name.to_string())
            .call()
            .await
            .map_err(contract_error)
    }

    async fn register(&self, name: &str, fee: U256) -> Result<TxOutcome, RegistryError> {
        let contract = self.contract();
        let tx = contract.register(name.to_string()).value(fee);
        let pending = tx.send().await.map_err(contract_error)?;
        let receipt = pending.await?.ok_or(RegistryError::Dropped)?;

        Ok(TxOutcome::from(&receipt))
    }

    async fn set_record(&self, name: &str, record: &str) -> Result<TxOutcome, RegistryError> {
        let contract = self.contract();
        let tx = contract.set_record(name.to_string(), record.to_string());
        let pending = tx.send().await.map_err(contract_error)?;
        let receipt = pending.await?.ok_or(RegistryError::Dropped)?;

        Ok(TxOutcome::from(&receipt))
    }
}

fn contract_error<M: Middleware>(e: ContractError<M>) -> RegistryError {
    RegistryError::Contract(e.to_string())
}
