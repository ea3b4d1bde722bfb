//! Argument field types and validation.
//!
//! Every raw argument object is validated against its operation's schema
//! before any contract interaction; a single invalid field blocks the whole
//! operation. Validation collects all violating fields, each with the field
//! name and a reason.

use crate::chain::ChainId;
use ethers::types::{Address, U256};
use serde_json::Value;
use std::fmt;

/// Element type allowed inside a sequence field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elem {
    Address,
    Uint,
    Bytes,
}

/// Semantic type of an argument field, drawn from a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 20-byte 0x-prefixed hex, case-insensitive.
    Address,
    /// Base-10 digit string, no sign, no decimal point, no exponent.
    Uint,
    /// 0x-prefixed hex of even (possibly zero) length.
    Bytes,
    /// Enumerated chain identifier.
    ChainId,
    /// Free text.
    Text,
    /// Ordered list of one element type; order is semantically meaningful.
    Seq(Elem),
}

/// One named parameter of an operation schema, in interface parameter order.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Bookkeeping fields steer dispatch and are stripped before the call.
    pub bookkeeping: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            bookkeeping: false,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            bookkeeping: false,
        }
    }

    pub const fn bookkeeping(name: &'static str, kind: FieldKind, required: bool) -> Self {
        Self {
            name,
            kind,
            required,
            bookkeeping: true,
        }
    }
}

/// A validated argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Address(Address),
    Uint(U256),
    Bytes(Vec<u8>),
    Chain(ChainId),
    Text(String),
    List(Vec<ArgValue>),
}

/// One schema violation: which field, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

impl FieldViolation {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// The validated argument set for one request.
///
/// Contract arguments are kept in schema (interface) order regardless of the
/// key order of the raw input object. Bookkeeping fields are extracted into
/// dedicated accessors and do not appear among the contract arguments.
#[derive(Debug, Clone)]
pub struct ValidatedArgs {
    chain: ChainId,
    lock_override: Option<Address>,
    values: Vec<(&'static str, ArgValue)>,
}

impl ValidatedArgs {
    pub fn chain(&self) -> ChainId {
        self.chain
    }

    /// Per-call instance address override, when the schema carries one.
    pub fn lock_override(&self) -> Option<Address> {
        self.lock_override
    }

    /// Contract arguments in declared parameter order.
    pub fn contract_values(&self) -> &[(&'static str, ArgValue)] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }
}

/// Validate a raw argument object against an ordered field list.
///
/// `strict` schemas (mutations, which encode monetary amounts) reject
/// unrecognized fields; permissive schemas (queries) ignore them.
pub fn validate(
    fields: &'static [FieldSpec],
    strict: bool,
    raw: &Value,
) -> Result<ValidatedArgs, Vec<FieldViolation>> {
    let map = match raw.as_object() {
        Some(map) => map,
        None => {
            return Err(vec![FieldViolation::new(
                "arguments",
                "must be a JSON object",
            )])
        }
    };

    let mut violations = Vec::new();
    let mut chain = None;
    let mut lock_override = None;
    let mut values = Vec::new();

    for field in fields {
        let value = match map.get(field.name) {
            Some(value) => value,
            None => {
                if field.required {
                    violations.push(FieldViolation::new(field.name, "missing required field"));
                }
                continue;
            }
        };

        match parse_value(field.name, field.kind, value) {
            Ok(parsed) => {
                if field.bookkeeping {
                    match parsed {
                        ArgValue::Chain(id) => chain = Some(id),
                        ArgValue::Address(addr) => lock_override = Some(addr),
                        // Bookkeeping fields are only the chain selector and
                        // the instance-address override.
                        other => values.push((field.name, other)),
                    }
                } else {
                    values.push((field.name, parsed));
                }
            }
            Err(violation) => violations.push(violation),
        }
    }

    if strict {
        for key in map.keys() {
            if !fields.iter().any(|f| f.name == key) {
                violations.push(FieldViolation::new(key.clone(), "unknown field"));
            }
        }
    }

    let chain = match chain {
        Some(chain) => chain,
        None => {
            // Every schema declares a required chainId; reachable only when
            // the field itself failed to validate.
            if violations.is_empty() {
                violations.push(FieldViolation::new("chainId", "missing required field"));
            }
            return Err(violations);
        }
    };

    if violations.is_empty() {
        Ok(ValidatedArgs {
            chain,
            lock_override,
            values,
        })
    } else {
        Err(violations)
    }
}

fn parse_value(field: &str, kind: FieldKind, value: &Value) -> Result<ArgValue, FieldViolation> {
    match kind {
        FieldKind::Address => parse_address(field, value).map(ArgValue::Address),
        FieldKind::Uint => parse_uint(field, value).map(ArgValue::Uint),
        FieldKind::Bytes => parse_bytes(field, value).map(ArgValue::Bytes),
        FieldKind::ChainId => parse_chain(field, value).map(ArgValue::Chain),
        FieldKind::Text => value
            .as_str()
            .map(|s| ArgValue::Text(s.to_string()))
            .ok_or_else(|| FieldViolation::new(field, "must be a string")),
        FieldKind::Seq(elem) => {
            let items = value
                .as_array()
                .ok_or_else(|| FieldViolation::new(field, "must be an array"))?;
            let mut parsed = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let name = format!("{field}[{index}]");
                let parsed_item = match elem {
                    Elem::Address => parse_address(&name, item).map(ArgValue::Address),
                    Elem::Uint => parse_uint(&name, item).map(ArgValue::Uint),
                    Elem::Bytes => parse_bytes(&name, item).map(ArgValue::Bytes),
                }?;
                parsed.push(parsed_item);
            }
            Ok(ArgValue::List(parsed))
        }
    }
}

fn parse_address(field: &str, value: &Value) -> Result<Address, FieldViolation> {
    let s = value
        .as_str()
        .ok_or_else(|| FieldViolation::new(field, "must be a string"))?;
    let hex_part = s
        .strip_prefix("0x")
        .ok_or_else(|| FieldViolation::new(field, "must be a 0x-prefixed address"))?;
    if hex_part.len() != 40 || !is_hex(hex_part) {
        return Err(FieldViolation::new(
            field,
            "must be a 20-byte hex address (40 hex characters)",
        ));
    }
    s.parse::<Address>()
        .map_err(|_| FieldViolation::new(field, "must be a 20-byte hex address (40 hex characters)"))
}

fn parse_uint(field: &str, value: &Value) -> Result<U256, FieldViolation> {
    let s = value
        .as_str()
        .ok_or_else(|| FieldViolation::new(field, "must be a base-10 digit string"))?;
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldViolation::new(
            field,
            "must be a base-10 digit string",
        ));
    }
    U256::from_dec_str(s).map_err(|_| FieldViolation::new(field, "exceeds 256 bits"))
}

fn parse_bytes(field: &str, value: &Value) -> Result<Vec<u8>, FieldViolation> {
    let s = value
        .as_str()
        .ok_or_else(|| FieldViolation::new(field, "must be a string"))?;
    let hex_part = s
        .strip_prefix("0x")
        .ok_or_else(|| FieldViolation::new(field, "must be 0x-prefixed hex"))?;
    if hex_part.len() % 2 != 0 || !is_hex(hex_part) {
        return Err(FieldViolation::new(
            field,
            "must be even-length hex data",
        ));
    }
    hex::decode(hex_part).map_err(|_| FieldViolation::new(field, "must be even-length hex data"))
}

fn parse_chain(field: &str, value: &Value) -> Result<ChainId, FieldViolation> {
    let id = value
        .as_u64()
        .ok_or_else(|| FieldViolation::new(field, "must be a number"))?;
    ChainId::from_id(id).ok_or_else(|| {
        FieldViolation::new(
            field,
            format!("unsupported chain identifier {id} (supported: 8453, 84532)"),
        )
    })
}

fn is_hex(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::bookkeeping("chainId", FieldKind::ChainId, true),
        FieldSpec::bookkeeping("lockAddress", FieldKind::Address, false),
        FieldSpec::required("_keyOwner", FieldKind::Address),
    ];

    const SEQ_FIELDS: &[FieldSpec] = &[
        FieldSpec::bookkeeping("chainId", FieldKind::ChainId, true),
        FieldSpec::required("_recipients", FieldKind::Seq(Elem::Address)),
        FieldSpec::required("_values", FieldKind::Seq(Elem::Uint)),
    ];

    const UINT_FIELDS: &[FieldSpec] = &[
        FieldSpec::bookkeeping("chainId", FieldKind::ChainId, true),
        FieldSpec::required("_value", FieldKind::Uint),
    ];

    const BYTES_FIELDS: &[FieldSpec] = &[
        FieldSpec::bookkeeping("chainId", FieldKind::ChainId, true),
        FieldSpec::required("data", FieldKind::Bytes),
    ];

    const OWNER: &str = "0x1234567890123456789012345678901234567890";

    #[test]
    fn test_accepts_fields_in_any_order() {
        let args = validate(
            FIELDS,
            false,
            &json!({"_keyOwner": OWNER, "chainId": 8453}),
        )
        .unwrap();
        assert_eq!(args.chain(), ChainId::Base);
        assert_eq!(args.contract_values().len(), 1);
        assert_eq!(args.contract_values()[0].0, "_keyOwner");
    }

    #[test]
    fn test_missing_required_field() {
        let violations = validate(FIELDS, false, &json!({"chainId": 8453})).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "_keyOwner");
        assert_eq!(violations[0].reason, "missing required field");
    }

    #[test]
    fn test_rejects_malformed_address() {
        for bad in ["0x1234", "1234567890123456789012345678901234567890", "0xZZ34567890123456789012345678901234567890"] {
            let violations =
                validate(FIELDS, false, &json!({"chainId": 8453, "_keyOwner": bad})).unwrap_err();
            assert_eq!(violations[0].field, "_keyOwner");
        }
    }

    #[test]
    fn test_rejects_unsupported_chain() {
        let violations =
            validate(FIELDS, false, &json!({"chainId": 1, "_keyOwner": OWNER})).unwrap_err();
        assert_eq!(violations[0].field, "chainId");
        assert!(violations[0].reason.contains("unsupported chain identifier 1"));
    }

    #[test]
    fn test_lock_override_extracted() {
        let args = validate(
            FIELDS,
            false,
            &json!({"chainId": 84532, "lockAddress": OWNER, "_keyOwner": OWNER}),
        )
        .unwrap();
        assert!(args.lock_override().is_some());
        // The override never appears among contract arguments.
        assert_eq!(args.contract_values().len(), 1);
    }

    #[test]
    fn test_sequence_element_failure_rejects_whole_call() {
        let violations = validate(
            SEQ_FIELDS,
            true,
            &json!({
                "chainId": 8453,
                "_recipients": [OWNER, OWNER, "0xbad"],
                "_values": ["1", "2", "3"],
            }),
        )
        .unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "_recipients[2]");
    }

    #[test]
    fn test_sequence_preserves_order() {
        let args = validate(
            SEQ_FIELDS,
            true,
            &json!({
                "chainId": 8453,
                "_recipients": [OWNER],
                "_values": ["3", "1", "2"],
            }),
        )
        .unwrap();
        match args.get("_values").unwrap() {
            ArgValue::List(items) => {
                let rendered: Vec<String> = items
                    .iter()
                    .map(|v| match v {
                        ArgValue::Uint(u) => u.to_string(),
                        _ => panic!("expected uint"),
                    })
                    .collect();
                assert_eq!(rendered, vec!["3", "1", "2"]);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_strict_rejects_unknown_fields() {
        let violations = validate(
            SEQ_FIELDS,
            true,
            &json!({
                "chainId": 8453,
                "_recipients": [],
                "_values": [],
                "_surprise": "1",
            }),
        )
        .unwrap_err();
        assert_eq!(violations[0].field, "_surprise");
        assert_eq!(violations[0].reason, "unknown field");
    }

    #[test]
    fn test_permissive_ignores_unknown_fields() {
        let args = validate(
            FIELDS,
            false,
            &json!({"chainId": 8453, "_keyOwner": OWNER, "_extra": true}),
        )
        .unwrap();
        assert_eq!(args.contract_values().len(), 1);
    }

    #[test]
    fn test_uint_rules() {
        for bad in ["", "-1", "1.5", "1e18", "0x10"] {
            assert!(validate(UINT_FIELDS, false, &json!({"chainId": 8453, "_value": bad})).is_err());
        }
        let huge = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        let args = validate(UINT_FIELDS, false, &json!({"chainId": 8453, "_value": huge})).unwrap();
        match args.get("_value").unwrap() {
            ArgValue::Uint(u) => assert_eq!(u.to_string(), huge),
            _ => panic!("expected uint"),
        }
    }

    #[test]
    fn test_bytes_rules() {
        // Zero-length payloads are legal.
        assert!(validate(BYTES_FIELDS, false, &json!({"chainId": 8453, "data": "0x"})).is_ok());
        assert!(validate(BYTES_FIELDS, false, &json!({"chainId": 8453, "data": "0xdead"})).is_ok());
        // Odd length and missing prefix are not.
        assert!(validate(BYTES_FIELDS, false, &json!({"chainId": 8453, "data": "0xabc"})).is_err());
        assert!(validate(BYTES_FIELDS, false, &json!({"chainId": 8453, "data": "dead"})).is_err());
    }
}
