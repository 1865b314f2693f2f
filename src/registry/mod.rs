//! Domain registry access
//! Reads and writes `.trigon` names on the registry contract

pub mod contract;
pub mod pricing;
pub mod reader;
pub mod writer;

use async_trait::async_trait;
use ethers::types::{Address, TransactionReceipt, H256, U256, U64};

use crate::error::RegistryError;

pub use contract::DomainsContract;
pub use pricing::{FeeSchedule, FeeTier, MIN_DOMAIN_LENGTH};
pub use reader::fetch_all;
pub use writer::{register_with_record, update_record, MintOutcome};

/// A confirmed transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOutcome {
    pub hash: H256,
    /// Whether the chain reported a success status
    pub succeeded: bool,
}

impl From<&TransactionReceipt> for TxOutcome {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            hash: receipt.transaction_hash,
            succeeded: receipt.status == Some(U64::from(1)),
        }
    }
}

/// Remote procedure calls offered by the domain registry contract.
///
/// Write methods submit a transaction and resolve once it is mined.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Every registered name, in registration order
    async fn all_names(&self) -> Result<Vec<String>, RegistryError>;

    /// Text record for a name (empty if unset)
    async fn record(&self, name: &str) -> Result<String, RegistryError>;

    /// Owner of a name
    async fn owner(&self, name: &str) -> Result<Address, RegistryError>;

    /// Register a name, attaching `fee` as payment
    async fn register(&self, name: &str, fee: U256) -> Result<TxOutcome, RegistryError>;

    /// Set the text record of an owned name
    async fn set_record(&self, name: &str, record: &str) -> Result<TxOutcome, RegistryError>;
}
