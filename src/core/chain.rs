//! Supported chain identifiers
//!
//! The set is closed: anything outside it is invalid input, not a new chain.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain {
    #[serde(rename = "solana:mainnet")]
    Mainnet,
    #[serde(rename = "solana:devnet")]
    Devnet,
    #[serde(rename = "solana:testnet")]
    Testnet,
    #[serde(rename = "solana:localnet")]
    Localnet,
}

impl Chain {
    pub const ALL: [Chain; 4] = [Chain::Mainnet, Chain::Devnet, Chain::Testnet, Chain::Localnet];

    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Mainnet => "solana:mainnet",
            Chain::Devnet => "solana:devnet",
            Chain::Testnet => "solana:testnet",
            Chain::Localnet => "solana:localnet",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Chain::ALL.into_iter().find(|chain| chain.as_str() == value)
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_solana_chain(value: &str) -> bool {
    Chain::parse(value).is_some()
}
