//! The dispatch error taxonomy.
//!
//! Every error is terminal for the request that produced it; there are no
//! retries here. Callers receive these folded into `Outcome::Failure`.

use crate::chain::client::ChainClientError;
use crate::ops::build::BuildError;
use crate::ops::outcome::Outcome;
use crate::ops::resolve::MissingTarget;
use crate::ops::schema::FieldViolation;
use thiserror::Error;

/// Failure category, used by transports to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    UnknownOperation,
    InvalidArguments,
    UnresolvedTarget,
    UnsupportedChain,
    ChainCallFailed,
}

impl FailureKind {
    /// Caller errors map to 4xx at the HTTP boundary; the rest to 5xx.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, FailureKind::ChainCallFailed)
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown function: {0}")]
    UnknownOperation(String),

    #[error("invalid arguments: {}", format_violations(.0))]
    InvalidArguments(Vec<FieldViolation>),

    #[error(transparent)]
    UnresolvedTarget(#[from] MissingTarget),

    #[error("unsupported chain ID: {0}")]
    UnsupportedChain(u64),

    /// Wraps a contract revert reason or network error, surfaced verbatim.
    #[error("chain call failed: {0}")]
    ChainCallFailed(String),
}

impl DispatchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            DispatchError::UnknownOperation(_) => FailureKind::UnknownOperation,
            DispatchError::InvalidArguments(_) => FailureKind::InvalidArguments,
            DispatchError::UnresolvedTarget(_) => FailureKind::UnresolvedTarget,
            DispatchError::UnsupportedChain(_) => FailureKind::UnsupportedChain,
            DispatchError::ChainCallFailed(_) => FailureKind::ChainCallFailed,
        }
    }
}

impl From<BuildError> for DispatchError {
    fn from(error: BuildError) -> Self {
        match error {
            // A value that does not fit its declared parameter is caller
            // input, reported field-by-field like any schema violation.
            BuildError::Tokenize { field, reason } => {
                DispatchError::InvalidArguments(vec![FieldViolation { field, reason }])
            }
            other => DispatchError::ChainCallFailed(other.to_string()),
        }
    }
}

impl From<ChainClientError> for DispatchError {
    fn from(error: ChainClientError) -> Self {
        match error {
            ChainClientError::Unsupported(id) => DispatchError::UnsupportedChain(id),
            other => DispatchError::ChainCallFailed(other.to_string()),
        }
    }
}

impl From<DispatchError> for Outcome {
    fn from(error: DispatchError) -> Self {
        Outcome::Failure {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_collects_all_violations() {
        let error = DispatchError::InvalidArguments(vec![
            FieldViolation {
                field: "_keyOwner".to_string(),
                reason: "missing required field".to_string(),
            },
            FieldViolation {
                field: "chainId".to_string(),
                reason: "must be a number".to_string(),
            },
        ]);
        let message = error.to_string();
        assert!(message.contains("_keyOwner: missing required field"));
        assert!(message.contains("chainId: must be a number"));
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            DispatchError::UnknownOperation("x".into()).kind(),
            FailureKind::UnknownOperation
        );
        assert_eq!(
            DispatchError::UnresolvedTarget(MissingTarget).kind(),
            FailureKind::UnresolvedTarget
        );
        assert!(FailureKind::InvalidArguments.is_caller_error());
        assert!(!FailureKind::ChainCallFailed.is_caller_error());
    }
}
