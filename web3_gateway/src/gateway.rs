use std::{error::Error, sync::Arc};

use ethers::{
    contract::{BaseContract, Contract},
    providers::{Http, Middleware, Provider},
    types::{Address, H256},
    utils::to_checksum,
};

use crate::{
    config::{GatewayConfig, Network},
    connections::{ConnectionPool, NetworkConnection},
    contracts::{
        aragon_app::{aragon_app_abi, APP_ID_METHOD, KERNEL_METHOD},
        ContractCache, ContractCacheKey,
    },
    ens::EnsError,
    error::{BoxError, ConfigError, GatewayError},
    reporter::FailureReporter,
};

/// Cache context of the contracts the gateway binds for its own operations.
pub const WEB3_CONTEXT: &str = "web3";

/// Read-path access to every configured network: one shared connection per network,
/// a cache of bound contracts, and one failure report per failed call.
pub struct Web3Gateway<M> {
    connections: ConnectionPool<M>,
    contracts: ContractCache<Contract<M>>,
    app_abi: BaseContract,
    reporter: Arc<dyn FailureReporter>,
}

impl Web3Gateway<Provider<Http>> {
    /// Dial every network in `config`. Any missing or invalid endpoint fails startup.
    pub fn connect(
        config: &GatewayConfig,
        reporter: Arc<dyn FailureReporter>,
    ) -> Result<Self, ConfigError> {
        Self::new(ConnectionPool::dial(config)?, reporter)
    }
}

impl<M> Web3Gateway<M>
where
    M: Middleware + 'static,
    M::Error: 'static,
{
    pub fn new(
        connections: ConnectionPool<M>,
        reporter: Arc<dyn FailureReporter>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            connections,
            contracts: ContractCache::new(),
            app_abi: aragon_app_abi()?,
            reporter,
        })
    }

    pub fn get_web3(&self, network: &str) -> Result<Arc<M>, GatewayError> {
        Ok(self.connections.get(network)?.client().clone())
    }

    /// Cached contract bound to `abi` at `contract_address`. Binding does no I/O.
    pub fn get_contract(
        &self,
        context: &str,
        network: &str,
        contract_address: &str,
        abi: &BaseContract,
    ) -> Result<Arc<Contract<M>>, GatewayError> {
        let connection = self.connections.get(network)?;
        self.contract_on(context, connection, contract_address, abi)
    }

    pub async fn get_latest_block(&self, network: &str) -> Result<u64, GatewayError> {
        let connection = self.connections.get(network)?;

        let block = connection
            .client()
            .get_block_number()
            .await
            .map_err(|err| self.fail(connection.network(), err))?;

        tracing::trace!(network = %connection.network(), %block, "fetched latest block");
        Ok(block.as_u64())
    }

    /// Kernel address of an Aragon app, EIP-55 checksummed.
    pub async fn get_kernel_for_app(
        &self,
        network: &str,
        contract_address: &str,
    ) -> Result<String, GatewayError> {
        let connection = self.connections.get(network)?;
        let app = self.contract_on(WEB3_CONTEXT, connection, contract_address, &self.app_abi)?;

        let kernel: Address = self
            .call_view(connection.network(), &app, KERNEL_METHOD)
            .await?;

        Ok(to_checksum(&kernel, None))
    }

    /// App id (bytes32) of an Aragon app, as 0x-prefixed hex.
    pub async fn get_app_id(
        &self,
        network: &str,
        contract_address: &str,
    ) -> Result<String, GatewayError> {
        let connection = self.connections.get(network)?;
        let app = self.contract_on(WEB3_CONTEXT, connection, contract_address, &self.app_abi)?;

        let app_id: H256 = self
            .call_view(connection.network(), &app, APP_ID_METHOD)
            .await?;

        Ok(format!("{app_id:?}"))
    }

    /// Resolves an ENS name to its address.
    ///
    /// Resolves with an empty string if the name has no resolver on `network`.
    pub async fn resolve_ens_domain(
        &self,
        name: &str,
        network: &str,
    ) -> Result<String, GatewayError> {
        let connection = self.connections.get(network)?;

        match connection.ens().resolve_address(name).await {
            Ok(address) => Ok(to_checksum(&address, None)),
            Err(EnsError::NotFound(_)) => {
                tracing::debug!(network = %connection.network(), name, "ENS name not found");
                Ok(String::new())
            }
            Err(EnsError::Provider(err)) => Err(self.report(connection.network(), err)),
        }
    }

    /// Number of contract handles bound so far.
    pub fn cached_contracts(&self) -> usize {
        self.contracts.len()
    }

    pub fn connections(&self) -> &ConnectionPool<M> {
        &self.connections
    }

    pub fn connection_for(&self, network: Network) -> &NetworkConnection<M> {
        self.connections.connection_for(network)
    }

    fn contract_on(
        &self,
        context: &str,
        connection: &NetworkConnection<M>,
        contract_address: &str,
        abi: &BaseContract,
    ) -> Result<Arc<Contract<M>>, GatewayError> {
        let key = ContractCacheKey::new(context, connection.network(), contract_address);

        self.contracts.get_or_try_insert_with(key, || {
            let address = parse_address(contract_address)?;
            Ok(Contract::new(
                address,
                abi.clone(),
                connection.client().clone(),
            ))
        })
    }

    async fn call_view<D>(
        &self,
        network: Network,
        contract: &Contract<M>,
        method: &str,
    ) -> Result<D, GatewayError>
    where
        D: ethers::abi::Detokenize,
    {
        let call = contract
            .method::<_, D>(method, ())
            .map_err(|err| self.fail(network, err))?;

        call.call().await.map_err(|err| self.fail(network, err))
    }

    fn fail<E>(&self, network: Network, err: E) -> GatewayError
    where
        E: Error + Send + Sync + 'static,
    {
        self.report(network, Box::new(err))
    }

    fn report(&self, network: Network, err: BoxError) -> GatewayError {
        self.reporter.report(&*err, network);
        GatewayError::Operational(err)
    }
}

/// Parses a hex address. Mixed-case input must carry a valid EIP-55 checksum;
/// all-lowercase and all-uppercase input is taken as is.
fn parse_address(contract_address: &str) -> Result<Address, GatewayError> {
    let invalid = || GatewayError::InvalidAddress(contract_address.to_owned());
    let address: Address = contract_address.parse().map_err(|_| invalid())?;

    let hex = contract_address
        .strip_prefix("0x")
        .unwrap_or(contract_address);
    let mixed_case = hex.chars().any(|c| c.is_ascii_uppercase())
        && hex.chars().any(|c| c.is_ascii_lowercase());
    if mixed_case && &to_checksum(&address, None)[2..] != hex {
        return Err(invalid());
    }

    Ok(address)
}
