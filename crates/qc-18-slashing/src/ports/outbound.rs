//! Driven Ports (SPI - Outbound Dependencies)
//!
//! Interfaces the host node implements for this subsystem: the persistent
//! store, the validator set (authoritative stake ledger) and the parameter
//! source. All calls are synchronous; block processing has no suspension
//! points.

use crate::domain::{PublicKey, SlashFraction, SlashingParams, ValidatorAddress};
use crate::error::{GatewayError, KVStoreError};
use std::time::Duration;

/// Result of a prefix scan: `(key, value)` pairs.
pub type ScanResult = Vec<(Vec<u8>, Vec<u8>)>;

/// Abstract interface for key-value database operations.
///
/// Testing: `InMemoryKVStore` in `adapters`.
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Put a single key-value pair.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Delete a key.
    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Either ALL operations in the batch succeed, or NONE are applied.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError>;

    /// Iterate over keys with a prefix.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError>;
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put { key: Vec<u8>, value: Vec<u8> },
    /// Delete a key.
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }
}

/// Validator as seen by the stake ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidatorRecord {
    pub public_key: PublicKey,
    pub power: u64,
    pub revoked: bool,
}

impl ValidatorRecord {
    pub fn address(&self) -> ValidatorAddress {
        self.public_key.address()
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked
    }
}

/// Validator set gateway (authoritative stake ledger).
///
/// This subsystem only calls into the gateway and never duplicates its
/// state. Implementations needing mutation use interior mutability.
pub trait ValidatorSetGateway: Send + Sync {
    /// Slash `fraction` of the stake the validator held at
    /// `infraction_height`, given its `power` at that height.
    fn slash(
        &self,
        address: &ValidatorAddress,
        infraction_height: u64,
        power: u64,
        fraction: SlashFraction,
    ) -> Result<(), GatewayError>;

    /// Remove the validator from the active set.
    fn revoke(&self, address: &ValidatorAddress) -> Result<(), GatewayError>;

    /// Return a revoked validator to the active set.
    fn unrevoke(&self, address: &ValidatorAddress) -> Result<(), GatewayError>;

    fn validator_by_pubkey(&self, public_key: &PublicKey) -> Option<ValidatorRecord>;

    fn validator_by_address(&self, address: &ValidatorAddress) -> Option<ValidatorRecord>;
}

/// Read-only parameter source.
pub trait ParamsProvider: Send + Sync {
    fn signed_blocks_window(&self) -> u64;
    fn min_signed_per_window(&self) -> u64;
    fn max_evidence_age(&self) -> Duration;
    fn slash_fraction_double_sign(&self) -> SlashFraction;
    fn slash_fraction_downtime(&self) -> SlashFraction;
    fn double_sign_unbond_duration(&self) -> Duration;
    fn downtime_unbond_duration(&self) -> Duration;

    /// Read every tunable once. Handlers take a snapshot per block so that a
    /// block sees one consistent parameter set.
    fn snapshot(&self) -> SlashingParams {
        SlashingParams {
            signed_blocks_window: self.signed_blocks_window(),
            min_signed_per_window: self.min_signed_per_window(),
            max_evidence_age: self.max_evidence_age(),
            slash_fraction_double_sign: self.slash_fraction_double_sign(),
            slash_fraction_downtime: self.slash_fraction_downtime(),
            double_sign_unbond_duration: self.double_sign_unbond_duration(),
            downtime_unbond_duration: self.downtime_unbond_duration(),
        }
    }
}
