//! The operation catalogue: one descriptor per supported contract function.
//!
//! The descriptor table is the single source of truth for argument schemas,
//! query/mutation classification and target-group resolution. Each
//! descriptor's field list follows the interface's declared parameter order,
//! with the bookkeeping fields (`chainId`, the per-call lock override) ahead
//! of the contract arguments.

use crate::contracts::TargetGroup;
use crate::ops::schema::{validate, Elem, FieldKind, FieldSpec, FieldViolation, ValidatedArgs};
use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Whether an operation reads or mutates chain state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Read-only, answered immediately, no transaction cost.
    Query,
    /// State-changing; signed submission or unsigned encoded payload.
    Mutation,
}

/// One supported contract function.
#[derive(Debug)]
pub struct OperationDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: OpKind,
    pub group: TargetGroup,
    pub fields: &'static [FieldSpec],
}

impl OperationDescriptor {
    /// Validate a raw argument object against this schema. Mutation schemas
    /// are strict about unknown fields; query schemas are permissive.
    pub fn validate(&self, raw: &Value) -> Result<ValidatedArgs, Vec<FieldViolation>> {
        validate(self.fields, matches!(self.kind, OpKind::Mutation), raw)
    }

    /// The interface method name. One documented alias exists: the public
    /// `chainIdRead` query invokes the factory's `chainId` method.
    pub fn method_name(&self) -> &'static str {
        if self.name == "chainIdRead" {
            "chainId"
        } else {
            self.name
        }
    }

    /// JSON-schema-style description of the argument object, for discovery.
    pub fn argument_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in self.fields {
            properties.insert(field.name.to_string(), kind_schema(field.kind));
            if field.required {
                required.push(Value::String(field.name.to_string()));
            }
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

fn kind_schema(kind: FieldKind) -> Value {
    match kind {
        FieldKind::Address => json!({"type": "string", "pattern": "^0x[a-fA-F0-9]{40}$"}),
        FieldKind::Uint => json!({"type": "string", "pattern": "^\\d+$"}),
        FieldKind::Bytes => json!({"type": "string", "pattern": "^0x([a-fA-F0-9]{2})*$"}),
        FieldKind::ChainId => json!({"type": "number", "enum": [8453, 84532]}),
        FieldKind::Text => json!({"type": "string"}),
        FieldKind::Seq(elem) => {
            let inner = match elem {
                Elem::Address => FieldKind::Address,
                Elem::Uint => FieldKind::Uint,
                Elem::Bytes => FieldKind::Bytes,
            };
            json!({"type": "array", "items": kind_schema(inner)})
        }
    }
}

const CHAIN: FieldSpec = FieldSpec::bookkeeping("chainId", FieldKind::ChainId, true);
/// Optional per-call instance address override for lock operations.
const LOCK: FieldSpec = FieldSpec::bookkeeping("lockAddress", FieldKind::Address, false);

const fn addr(name: &'static str) -> FieldSpec {
    FieldSpec::required(name, FieldKind::Address)
}

const fn uint(name: &'static str) -> FieldSpec {
    FieldSpec::required(name, FieldKind::Uint)
}

const fn bytes(name: &'static str) -> FieldSpec {
    FieldSpec::required(name, FieldKind::Bytes)
}

const fn text(name: &'static str) -> FieldSpec {
    FieldSpec::required(name, FieldKind::Text)
}

const fn addr_seq(name: &'static str) -> FieldSpec {
    FieldSpec::required(name, FieldKind::Seq(Elem::Address))
}

const fn uint_seq(name: &'static str) -> FieldSpec {
    FieldSpec::required(name, FieldKind::Seq(Elem::Uint))
}

const fn bytes_seq(name: &'static str) -> FieldSpec {
    FieldSpec::required(name, FieldKind::Seq(Elem::Bytes))
}

const fn query(
    name: &'static str,
    description: &'static str,
    group: TargetGroup,
    fields: &'static [FieldSpec],
) -> OperationDescriptor {
    OperationDescriptor {
        name,
        description,
        kind: OpKind::Query,
        group,
        fields,
    }
}

const fn mutation(
    name: &'static str,
    description: &'static str,
    group: TargetGroup,
    fields: &'static [FieldSpec],
) -> OperationDescriptor {
    OperationDescriptor {
        name,
        description,
        kind: OpKind::Mutation,
        group,
        fields,
    }
}

pub static OPERATIONS: &[OperationDescriptor] = &[
    // ── Factory queries ──
    query("chainIdRead", "Get the chain ID for the current network", TargetGroup::Factory, &[CHAIN]),
    query("unlockVersion", "Get the current version of the Unlock protocol", TargetGroup::Factory, &[CHAIN]),
    query("governanceToken", "Get the governance token address", TargetGroup::Factory, &[CHAIN]),
    query("getGlobalTokenSymbol", "Get the global token symbol for the protocol", TargetGroup::Factory, &[CHAIN]),
    query("publicLockLatestVersion", "Get the latest PublicLock template version number", TargetGroup::Factory, &[CHAIN]),
    // ── Factory mutations ──
    // Factory mutations accept the lock-override bookkeeping field so a
    // stray lockAddress is ignored, never an error; resolution disregards
    // it for this group.
    mutation(
        "createLock",
        "Deploy a new PublicLock contract",
        TargetGroup::Factory,
        &[CHAIN, LOCK, addr("_lockCreator"), uint("_expirationDuration"), addr("_tokenAddress"), uint("_keyPrice"), uint("_maxNumberOfKeys"), text("_lockName")],
    ),
    mutation(
        "createUpgradeableLock",
        "Deploy a new upgradeable PublicLock contract with initialization data",
        TargetGroup::Factory,
        &[CHAIN, LOCK, bytes("data")],
    ),
    mutation(
        "upgradeLock",
        "Upgrade a lock contract to a new version",
        TargetGroup::Factory,
        // lockAddress is a true contract argument of the factory method, not
        // an instance override; it stays in the ordered argument list.
        &[CHAIN, addr("lockAddress"), uint("version")],
    ),
    // ── Lock queries: ERC-721 ──
    query("balanceOf", "Get the number of keys owned by an address", TargetGroup::Instance, &[CHAIN, LOCK, addr("_keyOwner")]),
    query("getApproved", "Get the approved address for a specific token", TargetGroup::Instance, &[CHAIN, LOCK, uint("_tokenId")]),
    query("ownerOf", "Get the owner of a specific token", TargetGroup::Instance, &[CHAIN, LOCK, uint("_tokenId")]),
    query("tokenByIndex", "Get token ID by index in total supply", TargetGroup::Instance, &[CHAIN, LOCK, uint("_index")]),
    query("tokenOfOwnerByIndex", "Get token ID by owner and index", TargetGroup::Instance, &[CHAIN, LOCK, addr("_keyOwner"), uint("_index")]),
    query("tokenURI", "Get metadata URI for a token", TargetGroup::Instance, &[CHAIN, LOCK, uint("_tokenId")]),
    query("totalSupply", "Get total number of keys created", TargetGroup::Instance, &[CHAIN, LOCK]),
    query("supportsInterface", "Check if contract supports a specific interface", TargetGroup::Instance, &[CHAIN, LOCK, bytes("interfaceId")]),
    // ── Lock queries: configuration ──
    query("expirationDuration", "Get duration keys are valid for", TargetGroup::Instance, &[CHAIN, LOCK]),
    query("freeTrialLength", "Get free trial period length", TargetGroup::Instance, &[CHAIN, LOCK]),
    query("gasRefundValue", "Get gas refund amount", TargetGroup::Instance, &[CHAIN, LOCK]),
    query("keyPrice", "Get current key price", TargetGroup::Instance, &[CHAIN, LOCK]),
    query("maxKeysPerAddress", "Get maximum keys per address", TargetGroup::Instance, &[CHAIN, LOCK]),
    query("maxNumberOfKeys", "Get maximum total keys", TargetGroup::Instance, &[CHAIN, LOCK]),
    query("name", "Get lock name", TargetGroup::Instance, &[CHAIN, LOCK]),
    query("numberOfOwners", "Get number of key owners", TargetGroup::Instance, &[CHAIN, LOCK]),
    query("publicLockVersion", "Get lock contract version", TargetGroup::Instance, &[CHAIN, LOCK]),
    query("refundPenaltyBasisPoints", "Get refund penalty percentage", TargetGroup::Instance, &[CHAIN, LOCK]),
    query("symbol", "Get lock symbol", TargetGroup::Instance, &[CHAIN, LOCK]),
    query("tokenAddress", "Get payment token address", TargetGroup::Instance, &[CHAIN, LOCK]),
    query("transferFeeBasisPoints", "Get transfer fee percentage", TargetGroup::Instance, &[CHAIN, LOCK]),
    query("unlockProtocol", "Get the factory address this lock was deployed from", TargetGroup::Instance, &[CHAIN, LOCK]),
    // ── Lock queries: key status ──
    query("getHasValidKey", "Check if address has valid key", TargetGroup::Instance, &[CHAIN, LOCK, addr("_keyOwner")]),
    query("isValidKey", "Check if specific token is valid", TargetGroup::Instance, &[CHAIN, LOCK, uint("_tokenId")]),
    query("keyExpirationTimestampFor", "Get expiration timestamp for a key", TargetGroup::Instance, &[CHAIN, LOCK, uint("_tokenId")]),
    query("keyManagerOf", "Get key manager address", TargetGroup::Instance, &[CHAIN, LOCK, uint("_tokenId")]),
    query("totalKeys", "Get total keys for an address", TargetGroup::Instance, &[CHAIN, LOCK, addr("_keyOwner")]),
    query("isRenewable", "Check if a key can be renewed", TargetGroup::Instance, &[CHAIN, LOCK, uint("_tokenId"), addr("_referrer")]),
    // ── Lock queries: pricing and fees ──
    query("getCancelAndRefundValue", "Get refund amount for cancellation", TargetGroup::Instance, &[CHAIN, LOCK, uint("_tokenId")]),
    query("getTransferFee", "Get transfer fee amount", TargetGroup::Instance, &[CHAIN, LOCK, uint("_tokenId"), uint("_time")]),
    query("purchasePriceFor", "Calculate purchase price for recipient", TargetGroup::Instance, &[CHAIN, LOCK, addr("_recipient"), addr("_referrer"), bytes("_data")]),
    query("referrerFees", "Get the fee share configured for a referrer", TargetGroup::Instance, &[CHAIN, LOCK, addr("_referrer")]),
    // ── Lock queries: access control ──
    query("hasRole", "Check if account has role", TargetGroup::Instance, &[CHAIN, LOCK, bytes("role"), addr("account")]),
    query("isLockManager", "Check if address is lock manager", TargetGroup::Instance, &[CHAIN, LOCK, addr("account")]),
    query("isOwner", "Check if address is owner", TargetGroup::Instance, &[CHAIN, LOCK, addr("account")]),
    query("owner", "Get lock owner address", TargetGroup::Instance, &[CHAIN, LOCK]),
    // ── Lock mutations: purchase ──
    mutation(
        "purchase",
        "Purchase keys for multiple recipients",
        TargetGroup::Instance,
        &[CHAIN, LOCK, uint_seq("_values"), addr_seq("_recipients"), addr_seq("_referrers"), addr_seq("_keyManagers"), bytes_seq("_data")],
    ),
    mutation(
        "extend",
        "Extend key duration",
        TargetGroup::Instance,
        &[CHAIN, LOCK, uint("_value"), uint("_tokenId"), addr("_referrer"), bytes("_data")],
    ),
    // ── Lock mutations: key management ──
    mutation(
        "grantKeys",
        "Grant keys to recipients",
        TargetGroup::Instance,
        &[CHAIN, LOCK, addr_seq("_recipients"), uint_seq("_expirationTimestamps"), addr_seq("_keyManagers")],
    ),
    mutation("grantKeyExtension", "Grant extra duration to an existing key", TargetGroup::Instance, &[CHAIN, LOCK, uint("_tokenId"), uint("_duration")]),
    mutation("setKeyExpiration", "Set key expiration time", TargetGroup::Instance, &[CHAIN, LOCK, uint("_tokenId"), uint("_newExpiration")]),
    mutation("setKeyManagerOf", "Set the manager of a key", TargetGroup::Instance, &[CHAIN, LOCK, uint("_tokenId"), addr("_keyManager")]),
    mutation("renewMembershipFor", "Renew an expired membership", TargetGroup::Instance, &[CHAIN, LOCK, uint("_tokenId"), addr("_referrer")]),
    // ── Lock mutations: transfer ──
    mutation("approve", "Approve address to transfer token", TargetGroup::Instance, &[CHAIN, LOCK, addr("_approved"), uint("_tokenId")]),
    mutation("transferFrom", "Transfer key between addresses", TargetGroup::Instance, &[CHAIN, LOCK, addr("_from"), addr("_to"), uint("_tokenId")]),
    mutation(
        "safeTransferFrom",
        "Safely transfer key between addresses",
        TargetGroup::Instance,
        &[CHAIN, LOCK, addr("_from"), addr("_to"), uint("_tokenId"), FieldSpec::optional("_data", FieldKind::Bytes)],
    ),
    mutation("lendKey", "Lend a key to a recipient", TargetGroup::Instance, &[CHAIN, LOCK, addr("_from"), addr("_recipient"), uint("_tokenId")]),
    mutation("unlendKey", "Reclaim a lent key", TargetGroup::Instance, &[CHAIN, LOCK, addr("_recipient"), uint("_tokenId")]),
    mutation("shareKey", "Share part of a key's remaining time", TargetGroup::Instance, &[CHAIN, LOCK, addr("_to"), uint("_tokenIdFrom"), uint("_timeShared")]),
    // ── Lock mutations: cancellation ──
    mutation("cancelAndRefund", "Cancel key and get refund", TargetGroup::Instance, &[CHAIN, LOCK, uint("_tokenId")]),
    mutation("expireAndRefundFor", "Expire a key and refund a chosen amount", TargetGroup::Instance, &[CHAIN, LOCK, uint("_tokenId"), uint("_amount")]),
    mutation("burn", "Burn a key", TargetGroup::Instance, &[CHAIN, LOCK, uint("_tokenId")]),
    mutation("mergeKeys", "Merge time from one key into another", TargetGroup::Instance, &[CHAIN, LOCK, uint("_tokenIdFrom"), uint("_tokenIdTo"), uint("_amount")]),
    // ── Lock mutations: configuration ──
    mutation("updateKeyPricing", "Update key price and payment token", TargetGroup::Instance, &[CHAIN, LOCK, uint("_keyPrice"), addr("_tokenAddress")]),
    mutation(
        "updateLockConfig",
        "Update lock configuration settings",
        TargetGroup::Instance,
        &[CHAIN, LOCK, uint("_newExpirationDuration"), uint("_maxNumberOfKeys"), uint("_maxKeysPerAccount")],
    ),
    mutation("updateRefundPenalty", "Update free trial and refund penalty", TargetGroup::Instance, &[CHAIN, LOCK, uint("_freeTrialLength"), uint("_refundPenaltyBasisPoints")]),
    mutation("updateTransferFee", "Update the transfer fee", TargetGroup::Instance, &[CHAIN, LOCK, uint("_transferFeeBasisPoints")]),
    mutation("setLockMetadata", "Update lock metadata", TargetGroup::Instance, &[CHAIN, LOCK, text("_lockName"), text("_lockSymbol"), text("_baseTokenURI")]),
    mutation("setReferrerFee", "Set referrer fee", TargetGroup::Instance, &[CHAIN, LOCK, addr("_referrer"), uint("_feeBasisPoint")]),
    mutation("setGasRefundValue", "Set the gas refund amount", TargetGroup::Instance, &[CHAIN, LOCK, uint("_refundValue")]),
    mutation(
        "setEventHooks",
        "Register hook contracts for lock events",
        TargetGroup::Instance,
        &[CHAIN, LOCK, addr("_onKeyPurchaseHook"), addr("_onKeyCancelHook"), addr("_onValidKeyHook"), addr("_onTokenURIHook"), addr("_onKeyTransferHook"), addr("_onKeyExtendHook"), addr("_onKeyGrantHook"), addr("_onHasRoleHook")],
    ),
    // ── Lock mutations: revenue ──
    mutation("withdraw", "Withdraw funds from lock", TargetGroup::Instance, &[CHAIN, LOCK, addr("_tokenAddress"), addr("_recipient"), uint("_amount")]),
    // ── Lock mutations: access control ──
    mutation("grantRole", "Grant role to account", TargetGroup::Instance, &[CHAIN, LOCK, bytes("role"), addr("account")]),
    mutation("revokeRole", "Revoke role from account", TargetGroup::Instance, &[CHAIN, LOCK, bytes("role"), addr("account")]),
    mutation("renounceRole", "Renounce a role held by the caller", TargetGroup::Instance, &[CHAIN, LOCK, bytes("role"), addr("account")]),
    mutation("renounceLockManager", "Renounce the caller's lock manager role", TargetGroup::Instance, &[CHAIN, LOCK]),
    mutation("setOwner", "Transfer lock ownership", TargetGroup::Instance, &[CHAIN, LOCK, addr("account")]),
    // ── Lock mutations: migration ──
    mutation("migrate", "Migrate lock data after an upgrade", TargetGroup::Instance, &[CHAIN, LOCK, bytes("data")]),
];

static INDEX: Lazy<BTreeMap<&'static str, &'static OperationDescriptor>> = Lazy::new(|| {
    OPERATIONS
        .iter()
        .map(|descriptor| (descriptor.name, descriptor))
        .collect()
});

/// Look up a descriptor by public operation name.
pub fn lookup(name: &str) -> Option<&'static OperationDescriptor> {
    INDEX.get(name).copied()
}

/// Discovery listing: `{name, description, argumentSchema}` per operation.
pub fn listing() -> Value {
    Value::Array(
        OPERATIONS
            .iter()
            .map(|descriptor| {
                json!({
                    "name": descriptor.name,
                    "description": descriptor.description,
                    "argumentSchema": descriptor.argument_schema(),
                })
            })
            .collect(),
    )
}
