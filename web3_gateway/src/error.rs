use std::error::Error;

use thiserror::Error;

use crate::config::Network;

pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Deployment or programming errors. These are never reported as web3 failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("network is required")]
    MissingNetwork,
    #[error("unsupported network: {0}")]
    UnknownNetwork(String),
    #[error("{0} env var is required")]
    MissingEndpoint(&'static str),
    #[error("invalid endpoint for {network}: {source}")]
    InvalidEndpoint {
        network: Network,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid ENS registry address: {0}")]
    InvalidRegistry(String),
    #[error("invalid contract ABI: {0}")]
    Abi(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid contract address: {0}")]
    InvalidAddress(String),
    /// The original RPC or contract call error, untouched.
    #[error(transparent)]
    Operational(BoxError),
}

impl GatewayError {
    pub fn is_operational(&self) -> bool {
        matches!(self, GatewayError::Operational(_))
    }

    /// The original operational error, if it is a `T`.
    pub fn downcast_ref<T: Error + 'static>(&self) -> Option<&T> {
        match self {
            GatewayError::Operational(source) => source.downcast_ref::<T>(),
            _ => None,
        }
    }
}
