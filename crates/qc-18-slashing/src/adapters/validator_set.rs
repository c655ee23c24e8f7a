//! In-memory Validator Set Adapter
//!
//! Implements `ValidatorSetGateway` over a local stake ledger. Used by
//! single-node tooling and as the test double for the service. Every slash
//! and revoke is recorded so callers can assert on exactly what happened.

use crate::domain::{PublicKey, SlashFraction, ValidatorAddress};
use crate::error::GatewayError;
use crate::ports::outbound::{ValidatorRecord, ValidatorSetGateway};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;

/// One call to `slash`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlashRecord {
    pub address: ValidatorAddress,
    pub infraction_height: u64,
    pub power: u64,
    pub fraction: SlashFraction,
    /// Stake removed from the ledger
    pub amount: u128,
}

#[derive(Clone, Debug)]
struct LedgerEntry {
    public_key: PublicKey,
    power: u64,
    stake: u128,
    revoked: bool,
}

#[derive(Default)]
struct Ledger {
    validators: BTreeMap<ValidatorAddress, LedgerEntry>,
    slashes: Vec<SlashRecord>,
    revocations: Vec<ValidatorAddress>,
    fail_next_slash: Option<String>,
}

#[derive(Default)]
pub struct InMemoryValidatorSet {
    ledger: RwLock<Ledger>,
}

impl InMemoryValidatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bond a validator; returns its address.
    pub fn add_validator(&self, public_key: PublicKey, power: u64, stake: u128) -> ValidatorAddress {
        let address = public_key.address();
        self.ledger.write().validators.insert(
            address,
            LedgerEntry {
                public_key,
                power,
                stake,
                revoked: false,
            },
        );
        address
    }

    pub fn stake_of(&self, address: &ValidatorAddress) -> Option<u128> {
        self.ledger.read().validators.get(address).map(|v| v.stake)
    }

    pub fn is_revoked(&self, address: &ValidatorAddress) -> Option<bool> {
        self.ledger.read().validators.get(address).map(|v| v.revoked)
    }

    pub fn slashes(&self) -> Vec<SlashRecord> {
        self.ledger.read().slashes.clone()
    }

    pub fn revocations(&self) -> Vec<ValidatorAddress> {
        self.ledger.read().revocations.clone()
    }

    /// Make the next `slash` call fail as an inconsistent ledger would.
    pub fn fail_next_slash(&self, reason: impl Into<String>) {
        self.ledger.write().fail_next_slash = Some(reason.into());
    }

    fn record(entry: &LedgerEntry) -> ValidatorRecord {
        ValidatorRecord {
            public_key: entry.public_key,
            power: entry.power,
            revoked: entry.revoked,
        }
    }
}

impl ValidatorSetGateway for InMemoryValidatorSet {
    fn slash(
        &self,
        address: &ValidatorAddress,
        infraction_height: u64,
        power: u64,
        fraction: SlashFraction,
    ) -> Result<(), GatewayError> {
        let mut ledger = self.ledger.write();

        if let Some(reason) = ledger.fail_next_slash.take() {
            return Err(GatewayError::Inconsistent { reason });
        }

        let entry = ledger
            .validators
            .get_mut(address)
            .ok_or(GatewayError::ValidatorNotFound { address: *address })?;

        let amount = fraction.apply(entry.stake);
        entry.stake -= amount;
        debug!(
            validator = %address,
            infraction_height,
            amount,
            "[qc-18] Ledger slashed validator stake"
        );

        ledger.slashes.push(SlashRecord {
            address: *address,
            infraction_height,
            power,
            fraction,
            amount,
        });
        Ok(())
    }

    fn revoke(&self, address: &ValidatorAddress) -> Result<(), GatewayError> {
        let mut ledger = self.ledger.write();
        let entry = ledger
            .validators
            .get_mut(address)
            .ok_or(GatewayError::ValidatorNotFound { address: *address })?;
        entry.revoked = true;
        ledger.revocations.push(*address);
        Ok(())
    }

    fn unrevoke(&self, address: &ValidatorAddress) -> Result<(), GatewayError> {
        let mut ledger = self.ledger.write();
        let entry = ledger
            .validators
            .get_mut(address)
            .ok_or(GatewayError::ValidatorNotFound { address: *address })?;
        entry.revoked = false;
        Ok(())
    }

    fn validator_by_pubkey(&self, public_key: &PublicKey) -> Option<ValidatorRecord> {
        self.validator_by_address(&public_key.address())
    }

    fn validator_by_address(&self, address: &ValidatorAddress) -> Option<ValidatorRecord> {
        self.ledger.read().validators.get(address).map(Self::record)
    }
}
