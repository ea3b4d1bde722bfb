//! Submit-capable gateway server over stdin/stdout.

use anyhow::Result;
use log::info;
use std::sync::Arc;
use unlock_gateway::chain::client::EthersChainClient;
use unlock_gateway::config::GatewayConfig;
use unlock_gateway::ops::catalogue;
use unlock_gateway::ops::dispatch::DispatchEngine;
use unlock_gateway::ops::resolve::Resolver;
use unlock_gateway::rpc::stdio::StdioServer;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol; env_logger writes to stderr.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GatewayConfig::from_env()?;
    // This transport signs and submits; a missing key is a startup failure.
    config.require_signing_key()?;

    let client = Arc::new(EthersChainClient::connect(&config)?);
    let resolver = Resolver::new(config.factory_address, config.default_lock_address);
    let engine = DispatchEngine::new(resolver, client);

    info!(
        "starting submit-capable gateway: {} operations, factory {:#x}",
        catalogue::OPERATIONS.len(),
        config.factory_address,
    );

    StdioServer::new(engine).run().await
}
