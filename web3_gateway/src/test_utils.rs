use std::sync::Arc;

use ethers::{
    abi::{self, Token},
    providers::{MockProvider, Provider},
    types::{
        transaction::eip2718::TypedTransaction, Address, BlockId, BlockNumber, Bytes,
        TransactionRequest,
    },
};
use prometheus::Registry;

use crate::{
    config::{Network, NetworkConfig},
    connections::{ConnectionPool, NetworkConnection},
    gateway::Web3Gateway,
    reporter::Web3ErrorReporter,
};

pub type MockedGateway = Web3Gateway<Provider<MockProvider>>;

/// A pool over one mock provider per network, returned as (pool, mainnet mock, rinkeby mock).
pub fn mocked_pool() -> (
    ConnectionPool<Provider<MockProvider>>,
    MockProvider,
    MockProvider,
) {
    let (mainnet, mainnet_mock) = Provider::mocked();
    let (rinkeby, rinkeby_mock) = Provider::mocked();

    let pool = ConnectionPool::new(
        NetworkConnection::new(
            Network::Mainnet,
            Arc::new(mainnet),
            &NetworkConfig::new("http://mainnet.invalid"),
        ),
        NetworkConnection::new(
            Network::Rinkeby,
            Arc::new(rinkeby),
            &NetworkConfig::new("http://rinkeby.invalid"),
        ),
    );

    (pool, mainnet_mock, rinkeby_mock)
}

pub fn mocked_gateway() -> (
    MockedGateway,
    MockProvider,
    MockProvider,
    Arc<Web3ErrorReporter>,
) {
    let (pool, mainnet_mock, rinkeby_mock) = mocked_pool();
    let reporter = Arc::new(Web3ErrorReporter::register(&Registry::new()).unwrap());
    let gateway = Web3Gateway::new(pool, reporter.clone()).unwrap();

    (gateway, mainnet_mock, rinkeby_mock, reporter)
}

/// ABI encoded `address` return data.
pub fn encoded_address(address: Address) -> Bytes {
    abi::encode(&[Token::Address(address)]).into()
}

/// The params of the `eth_call` a `Provider` sends for `tx` at the latest block.
pub fn eth_call_params(tx: TransactionRequest) -> [serde_json::Value; 2] {
    let tx = <TypedTransaction as From<TransactionRequest>>::from(tx);
    [
        serde_json::to_value(&tx).unwrap(),
        serde_json::to_value(BlockId::from(BlockNumber::Latest)).unwrap(),
    ]
}
