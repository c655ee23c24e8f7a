//! # Validator Address Index
//!
//! Maps an address digest back to the full consensus key. Signing reports
//! and evidence arrive keyed by address; the validator set gateway is keyed
//! by public key.
//!
//! The index is an in-memory cache owned by the node's state container and
//! passed by reference to the handlers that need it. A miss is not an error,
//! the gateway lookup is the fallback.

use crate::domain::{PublicKey, ValidatorAddress};
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct AddressIndex {
    keys: HashMap<ValidatorAddress, PublicKey>,
}

impl AddressIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key` under `raw_address`.
    ///
    /// Input whose length is not the digest width is ignored.
    pub fn remember(&mut self, raw_address: &[u8], key: PublicKey) {
        let Some(address) = ValidatorAddress::from_slice(raw_address) else {
            return;
        };
        self.keys.insert(address, key);
    }

    /// Record `key` under its own derived address.
    pub fn remember_key(&mut self, key: PublicKey) -> ValidatorAddress {
        let address = key.address();
        self.keys.insert(address, key);
        address
    }

    pub fn resolve(&self, address: &ValidatorAddress) -> Option<PublicKey> {
        self.keys.get(address).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
