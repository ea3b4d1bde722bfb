//! Line-oriented RPC transport binding.

pub mod stdio;
