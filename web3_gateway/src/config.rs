use std::{env, fmt, str::FromStr};

use ethers::{providers::ens::ENS_ADDRESS, types::Address};

use crate::error::ConfigError;

pub const NETWORK_MAINNET: &str = "mainnet";
pub const NETWORK_RINKEBY: &str = "rinkeby";

const ETH_NODE_MAINNET_ENV_VAR: &str = "ETH_NODE_MAINNET";
const ETH_NODE_RINKEBY_ENV_VAR: &str = "ETH_NODE_RINKEBY";
const ENS_REGISTRY_MAINNET_ENV_VAR: &str = "ENS_REGISTRY_MAINNET";
const ENS_REGISTRY_RINKEBY_ENV_VAR: &str = "ENS_REGISTRY_RINKEBY";

/// The networks the gateway holds a connection for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Network {
    Mainnet,
    Rinkeby,
}

impl Network {
    pub const ALL: [Network; 2] = [Network::Mainnet, Network::Rinkeby];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => NETWORK_MAINNET,
            Network::Rinkeby => NETWORK_RINKEBY,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    /// An empty label is treated as an absent network.
    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label {
            "" => Err(ConfigError::MissingNetwork),
            NETWORK_MAINNET => Ok(Network::Mainnet),
            NETWORK_RINKEBY => Ok(Network::Rinkeby),
            other => Err(ConfigError::UnknownNetwork(other.to_owned())),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NetworkConfig {
    pub rpc_url: String,
    pub ens_registry: Address,
}

impl NetworkConfig {
    /// Network config against the canonical ENS registry deployment.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            ens_registry: ENS_ADDRESS,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GatewayConfig {
    pub mainnet: NetworkConfig,
    pub rinkeby: NetworkConfig,
}

impl GatewayConfig {
    /// load from env (and `.env` if present). Both node endpoints are required.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Ok(Self {
            mainnet: network_config_from_env(
                ETH_NODE_MAINNET_ENV_VAR,
                ENS_REGISTRY_MAINNET_ENV_VAR,
            )?,
            rinkeby: network_config_from_env(
                ETH_NODE_RINKEBY_ENV_VAR,
                ENS_REGISTRY_RINKEBY_ENV_VAR,
            )?,
        })
    }

    pub fn network(&self, network: Network) -> &NetworkConfig {
        match network {
            Network::Mainnet => &self.mainnet,
            Network::Rinkeby => &self.rinkeby,
        }
    }
}

fn network_config_from_env(
    node_var: &'static str,
    registry_var: &'static str,
) -> Result<NetworkConfig, ConfigError> {
    let rpc_url = env::var(node_var)
        .ok()
        .filter(|url| !url.is_empty())
        .ok_or(ConfigError::MissingEndpoint(node_var))?;

    let mut config = NetworkConfig::new(rpc_url);
    if let Ok(registry) = env::var(registry_var) {
        config.ens_registry = registry
            .parse()
            .map_err(|_| ConfigError::InvalidRegistry(registry.clone()))?;
    }

    Ok(config)
}
