//! Process configuration loaded from the environment.
//!
//! The factory address is mandatory: its absence is a startup failure, not a
//! per-call failure. The default lock address is optional; operations on
//! membership locks fail per-call when neither an override nor a default is
//! available.

use crate::chain::ChainId;
use ethers::types::Address;
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("UNLOCK_ADDRESS environment variable is required")]
    MissingFactoryAddress,

    #[error("either INFURA_API_KEY or ALCHEMY_API_KEY is required")]
    MissingRpcCredential,

    #[error("PRIVATE_KEY environment variable is required for the submit-capable transport")]
    MissingSigningKey,

    #[error("invalid address in {0}: {1}")]
    InvalidAddress(&'static str, String),

    #[error("invalid PORT value: {0}")]
    InvalidPort(String),
}

/// Read-provider credential; selects how per-chain RPC URLs are built.
#[derive(Debug, Clone)]
pub enum RpcCredential {
    Infura(String),
    Alchemy(String),
}

/// Gateway configuration shared by both transports.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address of the Unlock factory contract.
    pub factory_address: Address,
    /// Default PublicLock address used when a call supplies no override.
    pub default_lock_address: Option<Address>,
    /// Credential backing the per-chain read providers.
    pub rpc_credential: RpcCredential,
    /// Signing key for the submit-capable transport.
    pub signing_key: Option<String>,
    /// HTTP transport bind port.
    pub http_port: u16,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let factory_address = match env::var("UNLOCK_ADDRESS") {
            Ok(raw) => parse_address("UNLOCK_ADDRESS", &raw)?,
            Err(_) => return Err(ConfigError::MissingFactoryAddress),
        };

        let default_lock_address = match env::var("LOCK_ADDRESS") {
            Ok(raw) => Some(parse_address("LOCK_ADDRESS", &raw)?),
            Err(_) => None,
        };

        let rpc_credential = if let Ok(key) = env::var("INFURA_API_KEY") {
            RpcCredential::Infura(key)
        } else if let Ok(key) = env::var("ALCHEMY_API_KEY") {
            RpcCredential::Alchemy(key)
        } else {
            return Err(ConfigError::MissingRpcCredential);
        };

        let signing_key = env::var("PRIVATE_KEY").ok();

        let http_port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => 3000,
        };

        Ok(Self {
            factory_address,
            default_lock_address,
            rpc_credential,
            signing_key,
            http_port,
        })
    }

    /// The signing key, or a startup error for transports that submit.
    pub fn require_signing_key(&self) -> Result<&str, ConfigError> {
        self.signing_key
            .as_deref()
            .ok_or(ConfigError::MissingSigningKey)
    }

    /// Read-provider URL for one chain.
    pub fn rpc_url(&self, chain: ChainId) -> String {
        match &self.rpc_credential {
            RpcCredential::Infura(key) => {
                format!("https://{}.infura.io/v3/{}", chain.short_name(), key)
            }
            RpcCredential::Alchemy(key) => {
                format!("https://{}.g.alchemy.com/v2/{}", chain.short_name(), key)
            }
        }
    }
}

fn parse_address(var: &'static str, raw: &str) -> Result<Address, ConfigError> {
    raw.parse::<Address>()
        .map_err(|e| ConfigError::InvalidAddress(var, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(credential: RpcCredential) -> GatewayConfig {
        GatewayConfig {
            factory_address: Address::zero(),
            default_lock_address: None,
            rpc_credential: credential,
            signing_key: None,
            http_port: 3000,
        }
    }

    #[test]
    fn test_rpc_url_infura() {
        let config = config_with(RpcCredential::Infura("abc123".to_string()));
        assert_eq!(
            config.rpc_url(ChainId::Base),
            "https://base-mainnet.infura.io/v3/abc123"
        );
        assert_eq!(
            config.rpc_url(ChainId::BaseSepolia),
            "https://base-sepolia.infura.io/v3/abc123"
        );
    }

    #[test]
    fn test_rpc_url_alchemy() {
        let config = config_with(RpcCredential::Alchemy("xyz".to_string()));
        assert_eq!(
            config.rpc_url(ChainId::Base),
            "https://base-mainnet.g.alchemy.com/v2/xyz"
        );
    }

    #[test]
    fn test_require_signing_key() {
        let mut config = config_with(RpcCredential::Infura("k".to_string()));
        assert!(config.require_signing_key().is_err());
        config.signing_key = Some("0xdeadbeef".to_string());
        assert_eq!(config.require_signing_key().unwrap(), "0xdeadbeef");
    }
}
