use ethers::providers::ProviderError;

/// Errors reported by a wallet provider.
///
/// Mirrors the EIP-1193 error codes a browser wallet returns, so callers can
/// branch on [`WalletError::code`] the same way regardless of backend.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("User rejected the request")]
    UserRejected,
    #[error("Unrecognized chain ID {0:#x}")]
    UnrecognizedChain(u64),
    #[error("Provider request failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),
    #[error("Invalid signer key: {0}")]
    Signer(String),
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
}

impl WalletError {
    /// EIP-1193 code for a request the user declined
    pub const USER_REJECTED: i64 = 4001;
    /// EIP-1193 code for a chain the wallet has not been told about
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;
    /// JSON-RPC code for malformed parameters
    pub const INVALID_PARAMS: i64 = -32602;

    /// Provider error code, when the failure carries one
    pub fn code(&self) -> Option<i64> {
        match self {
            WalletError::UserRejected => Some(Self::USER_REJECTED),
            WalletError::UnrecognizedChain(_) => Some(Self::UNRECOGNIZED_CHAIN),
            WalletError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        WalletError::Rpc {
            code: Self::INVALID_PARAMS,
            message: message.into(),
        }
    }
}

/// Errors from the on-chain domain registry
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Contract call failed: {0}")]
    Contract(String),
    #[error("Transaction failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("Transaction was dropped from the mempool")]
    Dropped,
    #[error("Invalid contract address: {0}")]
    InvalidAddress(String),
}

/// Errors while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}
