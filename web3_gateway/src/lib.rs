pub mod config;
pub mod connections;
pub mod contracts;
pub mod ens;
pub mod error;
pub mod gateway;
pub mod reporter;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{GatewayConfig, Network, NetworkConfig};
pub use error::{ConfigError, GatewayError};
pub use gateway::Web3Gateway;
pub use reporter::{FailureReporter, Web3ErrorReporter};
