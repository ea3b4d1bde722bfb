//! Supported chains and the chain-access layer.

pub mod client;

use std::fmt;

/// Networks the gateway can target.
///
/// The argument schemas enumerate exactly these chain identifiers; the
/// connection-handle registry is built for the same set at startup, so the
/// two stay in sync by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChainId {
    /// Base mainnet (8453).
    Base,
    /// Base Sepolia testnet (84532).
    BaseSepolia,
}

impl ChainId {
    pub const ALL: [ChainId; 2] = [ChainId::Base, ChainId::BaseSepolia];

    /// Numeric chain identifier as used on the wire.
    pub fn id(&self) -> u64 {
        match self {
            ChainId::Base => 8453,
            ChainId::BaseSepolia => 84532,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChainId::Base => "Base",
            ChainId::BaseSepolia => "Base-Sepolia",
        }
    }

    /// Subdomain label used when constructing provider URLs.
    pub fn short_name(&self) -> &'static str {
        match self {
            ChainId::Base => "base-mainnet",
            ChainId::BaseSepolia => "base-sepolia",
        }
    }

    pub fn from_id(id: u64) -> Option<Self> {
        match id {
            8453 => Some(ChainId::Base),
            84532 => Some(ChainId::BaseSepolia),
            _ => None,
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.id())
    }
}
