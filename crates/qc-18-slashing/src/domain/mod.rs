//! Domain module for the Slashing subsystem
//!
//! ## Core Modules
//! - types: addresses, keys, timestamps, fractions
//! - signing_info: per-validator liveness record
//! - window: circular window arithmetic (O(1) per observation)
//! - params: tunables and validation
//! - evidence: double-sign evidence and staleness
//! - address_index: digest -> public key cache

pub mod address_index;
pub mod evidence;
pub mod params;
pub mod signing_info;
pub mod types;
pub mod window;

pub use address_index::AddressIndex;
pub use evidence::{DoubleSignEvidence, Misbehaviour};
pub use params::{SlashingParams, SlashingParamsBuilder};
pub use signing_info::ValidatorSigningInfo;
pub use types::{
    PublicKey, SlashFraction, Timestamp, ValidatorAddress, ADDRESS_LEN, BPS_DENOMINATOR,
    PUBLIC_KEY_LEN,
};
pub use window::{SigningWindow, SlotUpdate};
