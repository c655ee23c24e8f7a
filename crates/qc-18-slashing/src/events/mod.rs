//! Events module for the Slashing subsystem

pub mod incoming;
pub mod outgoing;

pub use incoming::{BlockSigningReport, ValidatorVote};
pub use outgoing::{SkipReason, SlashingEvent};
