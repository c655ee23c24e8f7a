//! # qc-18-slashing
//!
//! Validator liveness and slashing accountability.
//!
//! ## Overview
//!
//! This subsystem provides:
//! - **Liveness Tracking**: Fixed-size circular window of signed/missed bits
//!   per validator, updated in O(1) per block
//! - **Downtime Punishment**: Slash, revoke and jail validators whose signed
//!   count falls below the minimum once a full window of history exists
//! - **Double-Sign Punishment**: Slash, revoke and jail on verified
//!   equivocation evidence that is not older than the maximum evidence age
//! - **Atomic Blocks**: All writes of a block are staged and committed
//!   together, or discarded on a fatal error
//!
//! ## Architecture
//!
//! ```text
//! Block execution ──BlockSigningReport──→ Slashing (18)
//!                                             │
//!                                             ├── slash / revoke / unrevoke ──→ Validator Set
//!                                             │
//!                                             ├── signing info + window bits ──→ KeyValueStore
//!                                             │
//!                                             └── SlashingEvent ──→ observers (drain_events)
//! ```
//!
//! ## Per-Validator Lifecycle
//!
//! ```text
//! [BONDED] ──window elapsed──→ [TRACKED] ──below threshold──→ [JAILED]
//!    │                            │  ↑                            │
//!    │                            │  └────────── unjail ──────────┘
//!    └──────────── double sign ───┴──────────────────────────────→ [JAILED]
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use qc_18_slashing::adapters::{InMemoryKVStore, InMemoryValidatorSet, StaticParamsProvider};
//! use qc_18_slashing::ports::inbound::SlashingApi;
//! use qc_18_slashing::{AddressIndex, BlockSigningReport, SlashingService};
//!
//! let mut service = SlashingService::new(store, validator_set, params);
//! let mut index = AddressIndex::new();
//!
//! service.on_validator_bonded(&mut index, public_key, height)?;
//!
//! let outcome = service.process_block(&mut index, report)?;
//! for event in service.drain_events() {
//!     println!("{:?}", event);
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod events;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod store;

pub use domain::{
    AddressIndex, DoubleSignEvidence, Misbehaviour, PublicKey, SigningWindow, SlashFraction,
    SlashingParams, SlashingParamsBuilder, Timestamp, ValidatorAddress, ValidatorSigningInfo,
};
pub use error::{CodecError, GatewayError, KVStoreError, SlashingError, SlashingResult};
pub use events::{BlockSigningReport, SkipReason, SlashingEvent, ValidatorVote};
pub use ports::inbound::{BlockOutcome, SlashingApi};
pub use service::{SigningObservation, SlashingService};
pub use store::SigningStore;
