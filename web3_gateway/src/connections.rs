use std::sync::Arc;

use ethers::providers::{Http, Provider};

use crate::{
    config::{GatewayConfig, Network, NetworkConfig},
    ens::EnsResolver,
    error::ConfigError,
};

/// The long-lived client for one network, plus its ENS resolver.
pub struct NetworkConnection<M> {
    network: Network,
    client: Arc<M>,
    ens: EnsResolver<M>,
}

impl<M> NetworkConnection<M> {
    pub fn new(network: Network, client: Arc<M>, config: &NetworkConfig) -> Self {
        Self {
            network,
            ens: EnsResolver::new(client.clone(), config.ens_registry),
            client,
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn client(&self) -> &Arc<M> {
        &self.client
    }

    pub fn ens(&self) -> &EnsResolver<M> {
        &self.ens
    }
}

/// Exactly one connection per known network, built once up front.
pub struct ConnectionPool<M> {
    mainnet: NetworkConnection<M>,
    rinkeby: NetworkConnection<M>,
}

impl ConnectionPool<Provider<Http>> {
    /// Dial every configured endpoint. Fails if any endpoint is not a valid url.
    pub fn dial(config: &GatewayConfig) -> Result<Self, ConfigError> {
        let dial = |network: Network| -> Result<NetworkConnection<Provider<Http>>, ConfigError> {
            let network_config = config.network(network);
            let provider = Provider::<Http>::try_from(network_config.rpc_url.as_str())
                .map_err(|source| ConfigError::InvalidEndpoint { network, source })?;
            tracing::info!(%network, rpc_url = %network_config.rpc_url, "dialed web3 endpoint");

            Ok(NetworkConnection::new(
                network,
                Arc::new(provider),
                network_config,
            ))
        };

        Ok(Self {
            mainnet: dial(Network::Mainnet)?,
            rinkeby: dial(Network::Rinkeby)?,
        })
    }
}

impl<M> ConnectionPool<M> {
    pub fn new(mainnet: NetworkConnection<M>, rinkeby: NetworkConnection<M>) -> Self {
        Self { mainnet, rinkeby }
    }

    pub fn connection_for(&self, network: Network) -> &NetworkConnection<M> {
        match network {
            Network::Mainnet => &self.mainnet,
            Network::Rinkeby => &self.rinkeby,
        }
    }

    /// Look up a connection by network label.
    pub fn get(&self, network: &str) -> Result<&NetworkConnection<M>, ConfigError> {
        Ok(self.connection_for(network.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        config::{GatewayConfig, Network, NetworkConfig},
        error::ConfigError,
        test_utils::mocked_pool,
    };

    use super::ConnectionPool;

    #[test]
    fn test_connection_for_each_network() {
        let (pool, _mainnet_mock, _rinkeby_mock) = mocked_pool();

        for network in Network::ALL {
            let connection = pool.get(network.as_str()).unwrap();
            assert_eq!(connection.network(), network);
            assert!(Arc::ptr_eq(
                connection.client(),
                pool.connection_for(network).client()
            ));
        }

        assert!(!Arc::ptr_eq(
            pool.connection_for(Network::Mainnet).client(),
            pool.connection_for(Network::Rinkeby).client()
        ));
    }

    #[test]
    fn test_get_rejects_absent_and_unknown_networks() {
        let (pool, _mainnet_mock, _rinkeby_mock) = mocked_pool();

        assert!(matches!(pool.get(""), Err(ConfigError::MissingNetwork)));
        assert!(matches!(
            pool.get("ropsten"),
            Err(ConfigError::UnknownNetwork(_))
        ));
    }

    #[test]
    fn test_dial_binds_configured_endpoints() {
        let config = GatewayConfig {
            mainnet: NetworkConfig::new("http://localhost:8545"),
            rinkeby: NetworkConfig::new("http://localhost:8546"),
        };
        let pool = ConnectionPool::dial(&config).unwrap();

        assert_eq!(
            pool.connection_for(Network::Mainnet).client().url().as_str(),
            "http://localhost:8545/"
        );
        assert_eq!(
            pool.connection_for(Network::Rinkeby).client().url().as_str(),
            "http://localhost:8546/"
        );
    }

    #[test]
    fn test_dial_rejects_invalid_endpoint() {
        let config = GatewayConfig {
            mainnet: NetworkConfig::new("http://localhost:8545"),
            rinkeby: NetworkConfig::new("not a url"),
        };

        let Err(err) = ConnectionPool::dial(&config) else {
            panic!("dial should fail for an invalid endpoint");
        };
        assert!(matches!(
            err,
            ConfigError::InvalidEndpoint {
                network: Network::Rinkeby,
                ..
            }
        ));
    }
}
