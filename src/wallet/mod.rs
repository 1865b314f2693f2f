pub mod chains;
pub mod provider;

pub use chains::{network_name, AddChainParams, Chain, NativeCurrency};
pub use provider::{SignerClient, SignerWallet, WalletProvider};
