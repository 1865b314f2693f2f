use ethers::types::H256;
use serde::{Deserialize, Serialize};

/// Networks a wallet may report, keyed by chain ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chain {
    /// Ethereum Mainnet
    EthereumMainnet,
    /// Ropsten Testnet (retired)
    Ropsten,
    /// Kovan Testnet (retired)
    Kovan,
    /// Rinkeby Testnet (retired)
    Rinkeby,
    /// Goerli Testnet
    Goerli,
    /// BNB Smart Chain Testnet
    BscTestnet,
    /// BNB Smart Chain Mainnet
    BscMainnet,
    /// Polygon Mainnet
    PolygonMainnet,
    /// Polygon Mumbai Testnet
    PolygonMumbai,
    /// Avalanche C-Chain
    AvalancheMainnet,
    /// Local development node
    Localhost,
    /// Trigon, the chain the domain registry lives on
    Trigon,
}

impl Chain {
    pub const ALL: [Chain; 12] = [
        Chain::EthereumMainnet,
        Chain::Ropsten,
        Chain::Kovan,
        Chain::Rinkeby,
        Chain::Goerli,
        Chain::BscTestnet,
        Chain::BscMainnet,
        Chain::PolygonMainnet,
        Chain::PolygonMumbai,
        Chain::AvalancheMainnet,
        Chain::Localhost,
        Chain::Trigon,
    ];

    /// Get chain ID
    pub fn chain_id(&self) -> u64 {
        match self {
            Chain::EthereumMainnet => 1,
            Chain::Ropsten => 3,
            Chain::Kovan => 42,
            Chain::Rinkeby => 4,
            Chain::Goerli => 5,
            Chain::BscTestnet => 97,
            Chain::BscMainnet => 56,
            Chain::PolygonMainnet => 137,
            Chain::PolygonMumbai => 80001,
            Chain::AvalancheMainnet => 43114,
            Chain::Localhost => 1337,
            Chain::Trigon => 929,
        }
    }

    /// Chain ID in the `0x`-prefixed form wallets exchange over RPC
    pub fn hex_id(&self) -> String {
        format!("{:#x}", self.chain_id())
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            Chain::EthereumMainnet => "Mainnet",
            Chain::Ropsten => "Ropsten",
            Chain::Kovan => "Kovan",
            Chain::Rinkeby => "Rinkeby",
            Chain::Goerli => "Goerli",
            Chain::BscTestnet => "BSC Testnet",
            Chain::BscMainnet => "BSC Mainnet",
            Chain::PolygonMainnet => "Polygon Mainnet",
            Chain::PolygonMumbai => "Polygon Mumbai Testnet",
            Chain::AvalancheMainnet => "AVAX Mainnet",
            Chain::Localhost => "Localhost 8545",
            Chain::Trigon => "Trigon",
        }
    }

    /// Public RPC endpoint, if the network is still served
    pub fn rpc_url(&self) -> Option<&'static str> {
        match self {
            Chain::EthereumMainnet => Some("https://eth.llamarpc.com"),
            Chain::BscTestnet => Some("https://data-seed-prebsc-1-s1.binance.org:8545"),
            Chain::BscMainnet => Some("https://bsc-dataseed.binance.org"),
            Chain::PolygonMainnet => Some("https://polygon-rpc.com"),
            Chain::AvalancheMainnet => Some("https://api.avax.network/ext/bc/C/rpc"),
            Chain::Localhost => Some("http://127.0.0.1:8545"),
            Chain::Trigon => Some("https://929.rpc.thirdweb.com/"),
            Chain::Ropsten
            | Chain::Kovan
            | Chain::Rinkeby
            | Chain::Goerli
            | Chain::PolygonMumbai => None,
        }
    }

    /// Block explorer base URL
    pub fn explorer_url(&self) -> Option<&'static str> {
        match self {
            Chain::EthereumMainnet => Some("https://etherscan.io/"),
            Chain::BscMainnet => Some("https://bscscan.com/"),
            Chain::BscTestnet => Some("https://testnet.bscscan.com/"),
            Chain::PolygonMainnet => Some("https://polygonscan.com/"),
            Chain::AvalancheMainnet => Some("https://snowtrace.io/"),
            Chain::Trigon => Some("https://explorer-trigon-52af1phymr.t.conduit.xyz/"),
            _ => None,
        }
    }

    /// Native currency descriptor
    pub fn native_currency(&self) -> NativeCurrency {
        let (name, symbol) = match self {
            Chain::BscTestnet | Chain::BscMainnet => ("BNB", "BNB"),
            Chain::PolygonMainnet | Chain::PolygonMumbai => ("MATIC", "MATIC"),
            Chain::AvalancheMainnet => ("Avalanche", "AVAX"),
            Chain::Trigon => ("Trigon", "TRI"),
            _ => ("Ether", "ETH"),
        };
        NativeCurrency {
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals: 18,
        }
    }

    /// Look up a chain by numeric ID
    pub fn from_id(chain_id: u64) -> Option<Chain> {
        Self::ALL.into_iter().find(|c| c.chain_id() == chain_id)
    }

    /// Look up a chain by its `0x`-prefixed hex ID (case-insensitive)
    pub fn from_hex(hex_id: &str) -> Option<Chain> {
        parse_hex_id(hex_id).and_then(Self::from_id)
    }

    /// Parameters for asking a wallet to add this chain.
    ///
    /// `None` when there is no RPC endpoint to hand over.
    pub fn add_chain_params(&self) -> Option<AddChainParams> {
        Some(AddChainParams {
            chain_id: self.hex_id(),
            chain_name: self.name().to_string(),
            rpc_urls: vec![self.rpc_url()?.to_string()],
            native_currency: self.native_currency(),
            block_explorer_urls: self.explorer_url().map(str::to_string).into_iter().collect(),
        })
    }

    /// Explorer link for a transaction
    pub fn tx_url(&self, hash: H256) -> Option<String> {
        self.explorer_url().map(|base| format!("{}tx/{:?}", base, hash))
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Human-readable network name for a chain ID, `None` when unknown
pub fn network_name(chain_id: u64) -> Option<&'static str> {
    Chain::from_id(chain_id).map(|c| c.name())
}

/// Native currency of a chain, as handed to `wallet_addEthereumChain`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// `wallet_addEthereumChain` request parameters (EIP-3085)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: String,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
    pub block_explorer_urls: Vec<String>,
}

impl AddChainParams {
    /// Numeric chain ID, `None` if the hex string is malformed
    pub fn numeric_chain_id(&self) -> Option<u64> {
        parse_hex_id(&self.chain_id)
    }
}

/// Parse a `0x`-prefixed hex chain ID, either prefix case
fn parse_hex_id(hex_id: &str) -> Option<u64> {
    let digits = hex_id
        .strip_prefix("0x")
        .or_else(|| hex_id.strip_prefix("0X"))?;
    u64::from_str_radix(digits, 16).ok()
}
