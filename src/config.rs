use std::net::SocketAddr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::registry::contract::DOMAINS_CONTRACT;
use crate::registry::FeeSchedule;
use crate::wallet::Chain;

/// Suffix shown after every registered name
pub const TLD: &str = ".trigon";

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// RPC endpoint the signer wallet starts on
    pub rpc_url: String,
    /// Signer key; without it the app runs with no wallet
    pub private_key: Option<String>,
    pub contract_address: String,
    pub bind_addr: SocketAddr,
    /// Wait before re-reading the registry after a mint
    pub refresh_delay: Duration,
    pub fees: FeeSchedule,
    /// The one chain contract calls are allowed on
    pub required_chain: Chain,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: Chain::Trigon
                .rpc_url()
                .unwrap_or("https://929.rpc.thirdweb.com/")
                .to_string(),
            private_key: None,
            contract_address: DOMAINS_CONTRACT.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            refresh_delay: Duration::from_millis(1000),
            fees: FeeSchedule::default(),
            required_chain: Chain::Trigon,
        }
    }
}

impl Config {
    /// Load configuration from the environment (call `dotenvy::dotenv()` first)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = match get("BIND_ADDR") {
            Some(addr) => addr.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                key: "BIND_ADDR",
                message: e.to_string(),
            })?,
            None => defaults.bind_addr,
        };

        let refresh_delay = match get("REFRESH_DELAY_MS") {
            Some(ms) => Duration::from_millis(ms.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    key: "REFRESH_DELAY_MS",
                    message: e.to_string(),
                }
            })?),
            None => defaults.refresh_delay,
        };

        let fees = FeeSchedule::from_ether(
            &get("MINT_FEE_3").unwrap_or_else(|| "0.5".to_string()),
            &get("MINT_FEE_4").unwrap_or_else(|| "0.3".to_string()),
            &get("MINT_FEE").unwrap_or_else(|| "0.1".to_string()),
        )?;

        Ok(Self {
            rpc_url: get("RPC_URL").unwrap_or(defaults.rpc_url),
            private_key: get("PRIVATE_KEY"),
            contract_address: get("CONTRACT_ADDRESS").unwrap_or(defaults.contract_address),
            bind_addr,
            refresh_delay,
            fees,
            required_chain: defaults.required_chain,
        })
    }
}
