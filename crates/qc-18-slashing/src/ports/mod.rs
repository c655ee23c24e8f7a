//! Ports module for the Slashing subsystem

pub mod inbound;
pub mod outbound;

pub use inbound::{BlockOutcome, SlashingApi};
pub use outbound::{
    BatchOperation, KeyValueStore, ParamsProvider, ScanResult, ValidatorRecord,
    ValidatorSetGateway,
};
