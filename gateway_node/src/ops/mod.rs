//! Operation registry and dispatch engine.
//!
//! `catalogue` is the single source of truth: one descriptor per supported
//! contract function, carrying its argument schema, query/mutation kind and
//! target group. `dispatch` orchestrates validate → classify → resolve →
//! build → execute and folds every failure into a transport-agnostic outcome.

pub mod build;
pub mod catalogue;
pub mod classify;
pub mod dispatch;
pub mod error;
pub mod outcome;
pub mod resolve;
pub mod schema;
