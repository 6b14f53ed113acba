//! Shared building blocks: chain identifiers and protocol constants.

pub mod chain;
pub mod identifiers;

pub use chain::{is_solana_chain, Chain};
