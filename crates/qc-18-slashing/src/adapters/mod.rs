//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits for single-node use and tests.

mod memory_store;
mod params;
mod validator_set;

pub use memory_store::InMemoryKVStore;
pub use params::StaticParamsProvider;
pub use validator_set::{InMemoryValidatorSet, SlashRecord};
