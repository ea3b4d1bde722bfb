//! Encode-only HTTP gateway server.

use anyhow::Result;
use clap::Parser;
use log::info;
use std::sync::Arc;
use unlock_gateway::api::server::{HttpServer, HttpState};
use unlock_gateway::chain::client::EthersChainClient;
use unlock_gateway::config::GatewayConfig;
use unlock_gateway::ops::catalogue;
use unlock_gateway::ops::dispatch::DispatchEngine;
use unlock_gateway::ops::resolve::Resolver;

#[derive(Parser)]
#[command(name = "http_server", about = "Unlock contract gateway over HTTP")]
struct Args {
    /// Bind port; falls back to the PORT environment variable, then 3000.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = GatewayConfig::from_env()?;
    let client = Arc::new(EthersChainClient::connect(&config)?);
    let resolver = Resolver::new(config.factory_address, config.default_lock_address);
    let engine = DispatchEngine::new(resolver, client);

    let port = args.port.unwrap_or(config.http_port);
    info!(
        "starting gateway: {} operations, factory {:#x}, default lock {}",
        catalogue::OPERATIONS.len(),
        config.factory_address,
        config
            .default_lock_address
            .map(|a| format!("{a:#x}"))
            .unwrap_or_else(|| "none".to_string()),
    );

    HttpServer::new(port, Arc::new(HttpState { engine, config }))
        .run()
        .await
}
