use std::env;

use web3_gateway::config::NETWORK_MAINNET;

const DEMO_NETWORK_ENV_VAR: &str = "DEMO_NETWORK";
const DEMO_APP_ADDRESS_ENV_VAR: &str = "DEMO_APP_ADDRESS";
const DEMO_ENS_NAME_ENV_VAR: &str = "DEMO_ENS_NAME";

const DEFAULT_ENS_NAME: &str = "aragon.eth";

/// What the demo queries, on top of the latest block of every network.
pub struct DemoConfig {
    pub network: String,
    pub app_address: Option<String>,
    pub ens_name: String,
}

impl DemoConfig {
    /// load from env, else defaults
    pub fn load() -> Self {
        dotenv::dotenv().ok();

        Self {
            network: env::var(DEMO_NETWORK_ENV_VAR)
                .unwrap_or_else(|_| NETWORK_MAINNET.to_owned()),
            app_address: env::var(DEMO_APP_ADDRESS_ENV_VAR).ok(),
            ens_name: env::var(DEMO_ENS_NAME_ENV_VAR)
                .unwrap_or_else(|_| DEFAULT_ENS_NAME.to_owned()),
        }
    }
}
