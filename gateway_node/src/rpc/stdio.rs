//! Line-oriented RPC transport over stdin/stdout (submit-capable).
//!
//! One JSON request per line in, one JSON response per line out. Mutations
//! are signed with the configured credential, submitted, and confirmed
//! before the response is written. All logging goes to stderr; stdout
//! carries nothing but protocol lines.

use crate::ops::build::Capabilities;
use crate::ops::catalogue;
use crate::ops::dispatch::DispatchEngine;
use log::{error, info};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Debug, Deserialize)]
struct RpcRequest {
    #[serde(default)]
    id: Value,
    method: String,
    #[serde(default)]
    params: Value,
}

pub struct StdioServer {
    engine: DispatchEngine,
}

impl StdioServer {
    pub fn new(engine: DispatchEngine) -> Self {
        Self { engine }
    }

    /// Serve until stdin closes.
    pub async fn run(self) -> anyhow::Result<()> {
        info!(
            "gateway stdio server ready ({} operations)",
            catalogue::OPERATIONS.len()
        );

        let mut lines = BufReader::new(io::stdin()).lines();
        let mut stdout = io::stdout();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let response = self.handle_line(&line).await;
            let mut payload = response.to_string();
            payload.push('\n');
            stdout.write_all(payload.as_bytes()).await?;
            stdout.flush().await?;
        }

        info!("stdin closed, shutting down");
        Ok(())
    }

    async fn handle_line(&self, line: &str) -> Value {
        let request: RpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                error!("malformed request line: {e}");
                return json!({
                    "id": null,
                    "error": { "message": format!("invalid request: {e}") },
                });
            }
        };

        let id = request.id.clone();
        match self.handle(request).await {
            Ok(result) => json!({ "id": id, "result": result }),
            Err(message) => json!({ "id": id, "error": { "message": message } }),
        }
    }

    async fn handle(&self, request: RpcRequest) -> Result<Value, String> {
        match request.method.as_str() {
            "tools/list" => Ok(json!({ "tools": catalogue::listing() })),
            "tools/call" => {
                let name = request
                    .params
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| "params.name is required".to_string())?;
                let empty = json!({});
                let arguments = request.params.get("arguments").unwrap_or(&empty);

                let outcome = self
                    .engine
                    .dispatch(name, arguments, Capabilities { can_submit: true })
                    .await;
                Ok(outcome.to_json())
            }
            other => Err(format!("unknown method: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::client::{ChainClient, ChainClientError, ReceiptSummary};
    use crate::chain::ChainId;
    use crate::ops::resolve::Resolver;
    use async_trait::async_trait;
    use ethers::types::{Address, Bytes, U256};
    use std::sync::Arc;

    struct NullClient;

    #[async_trait]
    impl ChainClient for NullClient {
        fn supports(&self, _chain: ChainId) -> bool {
            true
        }

        async fn call(
            &self,
            _chain: ChainId,
            _to: Address,
            _data: Bytes,
        ) -> Result<Bytes, ChainClientError> {
            Ok(Bytes::from(ethers::abi::encode(&[
                ethers::abi::Token::Uint(U256::zero()),
            ])))
        }

        async fn submit(
            &self,
            _chain: ChainId,
            _to: Address,
            _data: Bytes,
        ) -> Result<ReceiptSummary, ChainClientError> {
            Ok(ReceiptSummary {
                transaction_hash: "0x0".to_string(),
                block_number: 0,
                gas_used: U256::zero(),
            })
        }
    }

    fn server() -> StdioServer {
        let resolver = Resolver::new(Address::zero(), None);
        StdioServer::new(DispatchEngine::new(resolver, Arc::new(NullClient)))
    }

    #[tokio::test]
    async fn test_tools_list() {
        let response = server()
            .handle_line(r#"{"id": 1, "method": "tools/list"}"#)
            .await;
        assert_eq!(response["id"], 1);
        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), catalogue::OPERATIONS.len());
    }

    #[tokio::test]
    async fn test_malformed_line() {
        let response = server().handle_line("not json").await;
        assert!(response["id"].is_null());
        assert!(response["error"]["message"]
            .as_str()
            .unwrap()
            .contains("invalid request"));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = server()
            .handle_line(r#"{"id": "a", "method": "tools/destroy"}"#)
            .await;
        assert_eq!(response["id"], "a");
        assert!(response["error"]["message"]
            .as_str()
            .unwrap()
            .contains("unknown method"));
    }

    #[tokio::test]
    async fn test_call_reports_failure_as_outcome() {
        // Dispatch failures come back as outcome JSON, not protocol errors.
        let response = server()
            .handle_line(
                r#"{"id": 2, "method": "tools/call", "params": {"name": "balanceOf", "arguments": {"chainId": 8453}}}"#,
            )
            .await;
        assert_eq!(response["id"], 2);
        assert_eq!(response["result"]["success"], false);
        assert!(response["result"]["error"]
            .as_str()
            .unwrap()
            .contains("_keyOwner"));
    }

    #[tokio::test]
    async fn test_call_submits_mutation() {
        let response = server()
            .handle_line(
                r#"{"id": 3, "method": "tools/call", "params": {"name": "cancelAndRefund", "arguments": {"chainId": 8453, "lockAddress": "0x1234567890123456789012345678901234567890", "_tokenId": "1"}}}"#,
            )
            .await;
        assert_eq!(response["result"]["success"], true);
        assert_eq!(response["result"]["transactionHash"], "0x0");
    }
}
