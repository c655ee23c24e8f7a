//! Error types for the Slashing subsystem

use crate::domain::{Timestamp, ValidatorAddress};
use std::fmt;
use thiserror::Error;

/// Slashing subsystem errors
#[derive(Debug, Error)]
pub enum SlashingError {
    /// Signing info expected but absent.
    ///
    /// Fatal when raised while handling double-sign evidence: the validator
    /// must have been tracked before it can equivocate.
    #[error("Expected signing info for validator {address} but not found")]
    MissingSigningInfo { address: ValidatorAddress },

    /// Validator could not be resolved by address or public key
    #[error("Unknown validator: {address}")]
    UnknownValidator { address: ValidatorAddress },

    /// Same validator reported twice within one block
    #[error("Validator {address} reported more than once at height {height}")]
    DuplicateVote {
        address: ValidatorAddress,
        height: u64,
    },

    /// Unjail requested for a validator that is not revoked
    #[error("Validator {address} is not jailed")]
    ValidatorNotJailed { address: ValidatorAddress },

    /// Unjail requested before the jail period elapsed
    #[error("Validator {address} jailed until {until}")]
    StillJailed {
        address: ValidatorAddress,
        until: Timestamp,
    },

    /// Parameter set violates its bounds
    #[error("Invalid slashing parameters: {reason}")]
    InvalidParams { reason: String },

    /// Encoding or decoding a stored value failed
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Backing key-value store failed
    #[error("Storage error: {0}")]
    Storage(#[from] KVStoreError),

    /// Validator set gateway failed; propagated unmodified
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl SlashingError {
    /// Whether the error signals a broken invariant.
    ///
    /// Block processing must abort on fatal errors. Non-fatal errors reject a
    /// single request and leave the chain state consistent.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingSigningInfo { .. }
                | Self::UnknownValidator { .. }
                | Self::Codec(_)
                | Self::Storage(_)
                | Self::Gateway(_)
        )
    }
}

/// Result type for slashing operations
pub type SlashingResult<T> = Result<T, SlashingError>;

/// Key-value store errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KVStoreError {
    /// I/O error during read/write.
    IOError { message: String },
    /// Data corruption in the store.
    CorruptionError { message: String },
}

impl fmt::Display for KVStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KVStoreError::IOError { message } => write!(f, "KV store I/O error: {}", message),
            KVStoreError::CorruptionError { message } => {
                write!(f, "KV store corruption: {}", message)
            }
        }
    }
}

impl std::error::Error for KVStoreError {}

/// Serialization failure for a stored value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to {op} {what}: {message}")]
pub struct CodecError {
    pub op: &'static str,
    pub what: &'static str,
    pub message: String,
}

/// Errors reported by the validator set gateway
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Validator {address} not found in stake ledger")]
    ValidatorNotFound { address: ValidatorAddress },

    #[error("Stake ledger inconsistent: {reason}")]
    Inconsistent { reason: String },
}
