//! Transport-agnostic dispatch outcomes and their wire JSON.

use crate::ops::error::FailureKind;
use ethers::abi::Token;
use serde_json::{json, Value};

/// The result of dispatching one operation. Failures are values, never
/// raised errors; no exception crosses the dispatch boundary.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// A read answered immediately.
    Query {
        operation: String,
        chain_id: u64,
        result: String,
    },
    /// A mutation submitted on-chain and confirmed.
    Submitted {
        operation: String,
        transaction_hash: String,
        block_number: u64,
        gas_used: String,
    },
    /// A mutation encoded into an unsigned payload for external signing.
    Unsigned {
        operation: String,
        chain_id: u64,
        to: String,
        data: String,
    },
    Failure {
        kind: FailureKind,
        message: String,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Failure { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Outcome::Failure { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Outcome::Query {
                operation,
                chain_id,
                result,
            } => json!({
                "success": true,
                "result": result,
                "function": operation,
                "chainId": chain_id,
            }),
            Outcome::Submitted {
                operation,
                transaction_hash,
                block_number,
                gas_used,
            } => json!({
                "success": true,
                "message": format!(
                    "Transaction {transaction_hash} mined in block {block_number}. Gas used: {gas_used}"
                ),
                "transactionHash": transaction_hash,
                "blockNumber": block_number,
                "gasUsed": gas_used,
                "function": operation,
            }),
            Outcome::Unsigned {
                operation,
                chain_id,
                to,
                data,
            } => json!({
                "success": true,
                "transaction": {
                    "to": to,
                    "data": data,
                    "value": "0",
                    "chainId": chain_id,
                },
                "function": operation,
                "chainId": chain_id,
            }),
            Outcome::Failure { message, .. } => json!({
                "success": false,
                "error": message,
            }),
        }
    }
}

/// Render decoded return values the way callers expect them: big integers as
/// base-10 digit strings (never floating point), addresses and byte strings
/// as 0x-prefixed hex, sequences joined with commas. Multiple return values
/// are joined the same way.
pub fn render_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(render_token)
        .collect::<Vec<_>>()
        .join(",")
}

fn render_token(token: &Token) -> String {
    match token {
        Token::Address(address) => format!("{address:#x}"),
        Token::Uint(value) | Token::Int(value) => value.to_string(),
        Token::Bool(value) => value.to_string(),
        Token::String(value) => value.clone(),
        Token::Bytes(data) | Token::FixedBytes(data) => format!("0x{}", hex::encode(data)),
        Token::Array(items) | Token::FixedArray(items) | Token::Tuple(items) => {
            render_tokens(items)
        }
    }
}
