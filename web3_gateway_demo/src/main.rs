pub mod config;

use std::sync::Arc;

use anyhow::Context;
use ethers::providers::{Http, Provider};
use prometheus::{Encoder, Registry, TextEncoder};
use tracing_subscriber::EnvFilter;
use web3_gateway::{GatewayConfig, Network, Web3ErrorReporter, Web3Gateway};

use crate::config::DemoConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let gateway_config = GatewayConfig::from_env().context("loading gateway config")?;
    let demo_config = DemoConfig::load();

    let registry = Registry::new();
    let reporter = Arc::new(Web3ErrorReporter::register(&registry)?);
    let gateway = Web3Gateway::connect(&gateway_config, reporter)?;
    tracing::info!(
        network = %demo_config.network,
        ens_name = %demo_config.ens_name,
        "gateway connected, running demo"
    );

    full_demo(&gateway, &demo_config).await;

    let mut metrics = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut metrics)?;
    println!("\n########## METRICS ###########\n");
    println!("{}", String::from_utf8(metrics)?);

    Ok(())
}

/// Failures are already counted by the gateway; here they are only logged.
async fn full_demo(gateway: &Web3Gateway<Provider<Http>>, config: &DemoConfig) {
    println!("\n########## LATEST BLOCKS ###########\n");
    for network in Network::ALL {
        match gateway.get_latest_block(network.as_str()).await {
            Ok(block) => println!("{network}: block {block}"),
            Err(e) => tracing::warn!(%network, error = %e, "failed to fetch latest block"),
        }
    }

    if let Some(app_address) = &config.app_address {
        println!("\n########## ARAGON APP ###########\n");
        match gateway.get_kernel_for_app(&config.network, app_address).await {
            Ok(kernel) => println!("App {app_address}: kernel {kernel}"),
            Err(e) => tracing::warn!(%app_address, error = %e, "failed to fetch kernel"),
        }
        match gateway.get_app_id(&config.network, app_address).await {
            Ok(app_id) => println!("App {app_address}: app id {app_id}"),
            Err(e) => tracing::warn!(%app_address, error = %e, "failed to fetch app id"),
        }
    }

    println!("\n########## ENS ###########\n");
    let name = &config.ens_name;
    match gateway.resolve_ens_domain(name, &config.network).await {
        Ok(address) if address.is_empty() => println!("{name}: not registered"),
        Ok(address) => println!("{name}: {address}"),
        Err(e) => tracing::warn!(%name, error = %e, "failed to resolve ENS name"),
    }
}
