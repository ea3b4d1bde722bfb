//! The dispatch engine: validate → classify → resolve → build → execute.
//!
//! State is fully request-scoped. The engine shares only the immutable
//! resolver configuration and the chain client constructed at startup; it
//! performs at most one outbound chain interaction per call and never
//! retries. Every failure is folded into an `Outcome` value at this
//! boundary.

use crate::chain::client::ChainClient;
use crate::ops::build::{build, Capabilities, CallPlan, PlanMode};
use crate::ops::catalogue;
use crate::ops::classify::{classify, Classification};
use crate::ops::error::DispatchError;
use crate::ops::outcome::{render_tokens, Outcome};
use crate::ops::resolve::Resolver;
use ethers::types::Bytes;
use log::{debug, warn};
use serde_json::Value;
use std::sync::Arc;

pub struct DispatchEngine {
    resolver: Resolver,
    client: Arc<dyn ChainClient>,
}

impl DispatchEngine {
    pub fn new(resolver: Resolver, client: Arc<dyn ChainClient>) -> Self {
        Self { resolver, client }
    }

    /// Dispatch one operation. Never panics and never returns an error:
    /// failures come back as `Outcome::Failure`.
    pub async fn dispatch(&self, name: &str, raw_args: &Value, capabilities: Capabilities) -> Outcome {
        match self.run(name, raw_args, capabilities).await {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!("dispatch of {name} failed: {error}");
                error.into()
            }
        }
    }

    async fn run(
        &self,
        name: &str,
        raw_args: &Value,
        capabilities: Capabilities,
    ) -> Result<Outcome, DispatchError> {
        let descriptor = catalogue::lookup(name)
            .ok_or_else(|| DispatchError::UnknownOperation(name.to_string()))?;

        let args = descriptor
            .validate(raw_args)
            .map_err(DispatchError::InvalidArguments)?;

        // Unreachable once lookup succeeded; handled defensively so a
        // classification gap can never reach the chain.
        if classify(name) == Classification::Unknown {
            return Err(DispatchError::UnknownOperation(name.to_string()));
        }

        let target = self.resolver.resolve(descriptor, &args)?;
        let plan = build(target, descriptor, &args, capabilities)?;

        debug!(
            "dispatching {} as {:?} against {:#x} on {}",
            plan.operation, plan.mode, plan.target.address, plan.chain
        );
        self.execute(plan).await
    }

    async fn execute(&self, plan: CallPlan) -> Result<Outcome, DispatchError> {
        let chain = plan.chain;
        if !self.client.supports(chain) {
            return Err(DispatchError::UnsupportedChain(chain.id()));
        }

        let data = Bytes::from(plan.calldata()?);
        let to = plan.target.address;

        match plan.mode {
            PlanMode::Read => {
                let output = self.client.call(chain, to, data).await?;
                let tokens = plan
                    .function
                    .decode_output(&output)
                    .map_err(|e| DispatchError::ChainCallFailed(e.to_string()))?;
                Ok(Outcome::Query {
                    operation: plan.operation.to_string(),
                    chain_id: chain.id(),
                    result: render_tokens(&tokens),
                })
            }
            PlanMode::Submit => {
                let receipt = self.client.submit(chain, to, data).await?;
                Ok(Outcome::Submitted {
                    operation: plan.operation.to_string(),
                    transaction_hash: receipt.transaction_hash,
                    block_number: receipt.block_number,
                    gas_used: receipt.gas_used.to_string(),
                })
            }
            PlanMode::Encode => Ok(Outcome::Unsigned {
                operation: plan.operation.to_string(),
                chain_id: chain.id(),
                to: format!("{to:#x}"),
                data: format!("0x{}", hex::encode(&data)),
            }),
        }
    }
}
