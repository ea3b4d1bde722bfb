//! Address and interface resolution.
//!
//! Factory-group operations always target the configured factory address.
//! Instance-group operations take the per-call override when supplied, then
//! the configured default; with neither, resolution fails rather than fall
//! back to an arbitrary address. The interface is selected solely by target
//! group, never by address content.

use crate::contracts::TargetGroup;
use crate::ops::catalogue::OperationDescriptor;
use crate::ops::schema::ValidatedArgs;
use ethers::types::Address;
use thiserror::Error;

/// The contract a call plan will be executed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub address: Address,
    pub interface: TargetGroup,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("lockAddress is required for membership lock operations and no default lock is configured")]
pub struct MissingTarget;

#[derive(Debug, Clone, Copy)]
pub struct Resolver {
    factory: Address,
    default_lock: Option<Address>,
}

impl Resolver {
    pub fn new(factory: Address, default_lock: Option<Address>) -> Self {
        Self {
            factory,
            default_lock,
        }
    }

    pub fn resolve(
        &self,
        descriptor: &OperationDescriptor,
        args: &ValidatedArgs,
    ) -> Result<ResolvedTarget, MissingTarget> {
        match descriptor.group {
            TargetGroup::Factory => Ok(ResolvedTarget {
                address: self.factory,
                interface: TargetGroup::Factory,
            }),
            TargetGroup::Instance => {
                let address = args
                    .lock_override()
                    .or(self.default_lock)
                    .ok_or(MissingTarget)?;
                Ok(ResolvedTarget {
                    address,
                    interface: TargetGroup::Instance,
                })
            }
        }
    }
}
