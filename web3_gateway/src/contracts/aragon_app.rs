use ethers::{abi::Abi, contract::BaseContract};

use crate::error::ConfigError;

// the view functions of an Aragon app that the gateway reads
const ARAGON_APP_ABI: &str = include_str!("../../abi/AragonApp.json");

pub const KERNEL_METHOD: &str = "kernel";
pub const APP_ID_METHOD: &str = "appId";

pub fn aragon_app_abi() -> Result<BaseContract, ConfigError> {
    let abi: Abi = serde_json::from_str(ARAGON_APP_ABI)?;
    Ok(BaseContract::from(abi))
}
