//! Call plan construction.
//!
//! Takes a resolved target and a validated argument set, strips the
//! bookkeeping fields, places the remaining values in the interface's
//! declared parameter order, applies the one method-name alias, and
//! tokenizes every value against the declared parameter types. The builder
//! is transport-agnostic: whether a mutation is submitted or merely encoded
//! is chosen by the capability flag the dispatch engine passes in.

use crate::chain::ChainId;
use crate::contracts;
use crate::ops::catalogue::{OpKind, OperationDescriptor};
use crate::ops::resolve::ResolvedTarget;
use crate::ops::schema::{ArgValue, ValidatedArgs};
use ethers::abi::{Function, ParamType, Token};
use thiserror::Error;

/// Transport capabilities supplied per dispatch call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Capabilities {
    /// Whether the transport holds a signer and submits mutations itself.
    pub can_submit: bool,
}

/// Executable form of a call plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanMode {
    /// Invoke for the return value, no value transfer.
    Read,
    /// Sign, submit, and await confirmation.
    Submit,
    /// Encode into an unsigned payload for external signing.
    Encode,
}

/// The fully resolved, ready-to-execute description of one interaction.
/// Built fresh per request and discarded once the outcome is produced.
#[derive(Debug, Clone)]
pub struct CallPlan {
    pub target: ResolvedTarget,
    /// Public operation name, echoed in outcomes.
    pub operation: &'static str,
    pub function: Function,
    pub tokens: Vec<Token>,
    pub chain: ChainId,
    pub mode: PlanMode,
}

impl CallPlan {
    /// ABI-encoded call data for this plan.
    pub fn calldata(&self) -> Result<Vec<u8>, BuildError> {
        self.function
            .encode_input(&self.tokens)
            .map_err(|e| BuildError::Encode(e.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("interface has no method {method} accepting {arity} arguments")]
    MethodNotFound { method: String, arity: usize },

    #[error("{field}: {reason}")]
    Tokenize { field: String, reason: String },

    #[error("failed to encode call data: {0}")]
    Encode(String),
}

pub fn build(
    target: ResolvedTarget,
    descriptor: &'static OperationDescriptor,
    args: &ValidatedArgs,
    capabilities: Capabilities,
) -> Result<CallPlan, BuildError> {
    let method = descriptor.method_name();
    let ordered = args.contract_values();

    let function = contracts::function(target.interface, method, ordered.len())
        .ok_or_else(|| BuildError::MethodNotFound {
            method: method.to_string(),
            arity: ordered.len(),
        })?
        .clone();

    let tokens = ordered
        .iter()
        .zip(&function.inputs)
        .map(|((name, value), param)| tokenize(name, value, &param.kind))
        .collect::<Result<Vec<_>, _>>()?;

    let mode = match descriptor.kind {
        OpKind::Query => PlanMode::Read,
        OpKind::Mutation if capabilities.can_submit => PlanMode::Submit,
        OpKind::Mutation => PlanMode::Encode,
    };

    Ok(CallPlan {
        target,
        operation: descriptor.name,
        function,
        tokens,
        chain: args.chain(),
        mode,
    })
}

fn tokenize(field: &str, value: &ArgValue, param: &ParamType) -> Result<Token, BuildError> {
    match (value, param) {
        (ArgValue::Address(address), ParamType::Address) => Ok(Token::Address(*address)),
        (ArgValue::Uint(uint), ParamType::Uint(_)) => Ok(Token::Uint(*uint)),
        (ArgValue::Bytes(data), ParamType::Bytes) => Ok(Token::Bytes(data.clone())),
        (ArgValue::Bytes(data), ParamType::FixedBytes(width)) => {
            if data.len() != *width {
                return Err(BuildError::Tokenize {
                    field: field.to_string(),
                    reason: format!("must be exactly {width} bytes, got {}", data.len()),
                });
            }
            Ok(Token::FixedBytes(data.clone()))
        }
        (ArgValue::Text(text), ParamType::String) => Ok(Token::String(text.clone())),
        (ArgValue::List(items), ParamType::Array(inner)) => {
            let tokens = items
                .iter()
                .enumerate()
                .map(|(index, item)| tokenize(&format!("{field}[{index}]"), item, inner))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Token::Array(tokens))
        }
        _ => Err(BuildError::Tokenize {
            field: field.to_string(),
            reason: format!("does not match interface parameter type {param}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::TargetGroup;
    use crate::ops::catalogue::lookup;
    use ethers::types::Address;
    use serde_json::json;

    const LOCK: &str = "0x1234567890123456789012345678901234567890";
    const OWNER: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

    fn instance_target() -> ResolvedTarget {
        ResolvedTarget {
            address: LOCK.parse().unwrap(),
            interface: TargetGroup::Instance,
        }
    }

    fn factory_target() -> ResolvedTarget {
        ResolvedTarget {
            address: "0x00000000000000000000000000000000000000f1".parse().unwrap(),
            interface: TargetGroup::Factory,
        }
    }

    #[test]
    fn test_order_independent_of_input_key_order() {
        let descriptor = lookup("tokenOfOwnerByIndex").unwrap();
        // Keys deliberately supplied in reverse of the interface order.
        let args = descriptor
            .validate(&json!({"_index": "7", "_keyOwner": OWNER, "chainId": 8453}))
            .unwrap();
        let plan = build(instance_target(), descriptor, &args, Capabilities::default()).unwrap();
        assert_eq!(plan.tokens.len(), 2);
        assert_eq!(plan.tokens[0], Token::Address(OWNER.parse::<Address>().unwrap()));
        assert_eq!(plan.tokens[1], Token::Uint(7u64.into()));
    }

    #[test]
    fn test_bookkeeping_fields_are_stripped() {
        let descriptor = lookup("balanceOf").unwrap();
        let args = descriptor
            .validate(&json!({"chainId": 8453, "lockAddress": LOCK, "_keyOwner": OWNER}))
            .unwrap();
        let plan = build(instance_target(), descriptor, &args, Capabilities::default()).unwrap();
        assert_eq!(plan.tokens, vec![Token::Address(OWNER.parse::<Address>().unwrap())]);
        assert_eq!(plan.mode, PlanMode::Read);
    }

    #[test]
    fn test_chain_id_read_alias() {
        let descriptor = lookup("chainIdRead").unwrap();
        let args = descriptor.validate(&json!({"chainId": 84532})).unwrap();
        let plan = build(factory_target(), descriptor, &args, Capabilities::default()).unwrap();
        assert_eq!(plan.function.name, "chainId");
        assert_eq!(plan.operation, "chainIdRead");
        assert!(plan.tokens.is_empty());
    }

    #[test]
    fn test_upgrade_lock_keeps_lock_address_argument() {
        let descriptor = lookup("upgradeLock").unwrap();
        let args = descriptor
            .validate(&json!({"chainId": 8453, "lockAddress": LOCK, "version": "14"}))
            .unwrap();
        let plan = build(
            factory_target(),
            descriptor,
            &args,
            Capabilities { can_submit: true },
        )
        .unwrap();
        assert_eq!(plan.tokens.len(), 2);
        assert_eq!(plan.tokens[0], Token::Address(LOCK.parse::<Address>().unwrap()));
        assert_eq!(plan.tokens[1], Token::Uint(14u64.into()));
        assert_eq!(plan.mode, PlanMode::Submit);
    }

    #[test]
    fn test_purchase_tokens_and_mode() {
        let descriptor = lookup("purchase").unwrap();
        let args = descriptor
            .validate(&json!({
                "chainId": 8453,
                "lockAddress": LOCK,
                "_values": ["1000000000000000000"],
                "_recipients": [OWNER],
                "_referrers": ["0x0000000000000000000000000000000000000000"],
                "_keyManagers": [OWNER],
                "_data": ["0x"],
            }))
            .unwrap();
        let plan = build(instance_target(), descriptor, &args, Capabilities::default()).unwrap();
        assert_eq!(plan.mode, PlanMode::Encode);
        assert_eq!(plan.tokens.len(), 5);
        let data = plan.calldata().unwrap();
        assert!(!data.is_empty());
        // Selector plus ABI-encoded argument words.
        assert!(data.len() > 4);
    }

    #[test]
    fn test_safe_transfer_from_selects_overload_by_arity() {
        let descriptor = lookup("safeTransferFrom").unwrap();

        let three = descriptor
            .validate(&json!({"chainId": 8453, "lockAddress": LOCK, "_from": OWNER, "_to": OWNER, "_tokenId": "1"}))
            .unwrap();
        let plan = build(instance_target(), descriptor, &three, Capabilities::default()).unwrap();
        assert_eq!(plan.function.inputs.len(), 3);

        let four = descriptor
            .validate(&json!({"chainId": 8453, "lockAddress": LOCK, "_from": OWNER, "_to": OWNER, "_tokenId": "1", "_data": "0xdead"}))
            .unwrap();
        let plan = build(instance_target(), descriptor, &four, Capabilities::default()).unwrap();
        assert_eq!(plan.function.inputs.len(), 4);
    }

    #[test]
    fn test_fixed_bytes_width_enforced() {
        let descriptor = lookup("supportsInterface").unwrap();
        let args = descriptor
            .validate(&json!({"chainId": 8453, "lockAddress": LOCK, "interfaceId": "0x80ac58cd"}))
            .unwrap();
        assert!(build(instance_target(), descriptor, &args, Capabilities::default()).is_ok());

        let args = descriptor
            .validate(&json!({"chainId": 8453, "lockAddress": LOCK, "interfaceId": "0x80ac"}))
            .unwrap();
        let err = build(instance_target(), descriptor, &args, Capabilities::default()).unwrap_err();
        match err {
            BuildError::Tokenize { field, .. } => assert_eq!(field, "interfaceId"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
