//! # Signing Store
//!
//! Persistence for signing info records and window bits on top of any
//! [`KeyValueStore`]. No policy lives here.
//!
//! ## Key Layout
//!
//! ```text
//! 0x01 ‖ address                      -> bincode(ValidatorSigningInfo)
//! 0x02 ‖ address ‖ slot (u64 BE)      -> bincode(bool)
//! ```
//!
//! ## Staging
//!
//! Writes are staged in an ordered map and reads consult it first, so a
//! block's handlers see their own writes. `commit` flushes the staged set in
//! one atomic batch; `discard` drops it. The ordered map keeps the batch
//! identical on every replaying node.

use crate::domain::{ValidatorAddress, ValidatorSigningInfo, ADDRESS_LEN};
use crate::error::{CodecError, SlashingResult};
use crate::ports::outbound::{BatchOperation, KeyValueStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

const SIGNING_INFO_PREFIX: u8 = 0x01;
const WINDOW_BIT_PREFIX: u8 = 0x02;

fn signing_info_key(address: &ValidatorAddress) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + ADDRESS_LEN);
    key.push(SIGNING_INFO_PREFIX);
    key.extend_from_slice(address.as_bytes());
    key
}

fn window_bit_key(address: &ValidatorAddress, slot: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + ADDRESS_LEN + 8);
    key.push(WINDOW_BIT_PREFIX);
    key.extend_from_slice(address.as_bytes());
    key.extend_from_slice(&slot.to_be_bytes());
    key
}

fn encode<T: Serialize>(value: &T, what: &'static str) -> SlashingResult<Vec<u8>> {
    bincode::serialize(value).map_err(|e| {
        CodecError {
            op: "encode",
            what,
            message: e.to_string(),
        }
        .into()
    })
}

fn decode<T: DeserializeOwned>(bytes: &[u8], what: &'static str) -> SlashingResult<T> {
    bincode::deserialize(bytes).map_err(|e| {
        CodecError {
            op: "decode",
            what,
            message: e.to_string(),
        }
        .into()
    })
}

pub struct SigningStore<S: KeyValueStore> {
    inner: S,
    staged: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl<S: KeyValueStore> SigningStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            staged: BTreeMap::new(),
        }
    }

    /// Backing store, without staged writes.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn read(&self, key: &[u8]) -> SlashingResult<Option<Vec<u8>>> {
        if let Some(value) = self.staged.get(key) {
            return Ok(Some(value.clone()));
        }
        Ok(self.inner.get(key)?)
    }

    pub fn get_signing_info(
        &self,
        address: &ValidatorAddress,
    ) -> SlashingResult<Option<ValidatorSigningInfo>> {
        self.read(&signing_info_key(address))?
            .map(|bytes| decode(&bytes, "signing info"))
            .transpose()
    }

    pub fn set_signing_info(
        &mut self,
        address: &ValidatorAddress,
        info: &ValidatorSigningInfo,
    ) -> SlashingResult<()> {
        let value = encode(info, "signing info")?;
        self.staged.insert(signing_info_key(address), value);
        Ok(())
    }

    /// Window bit at `slot`; never-written slots read as `false`.
    pub fn get_bit(&self, address: &ValidatorAddress, slot: u64) -> SlashingResult<bool> {
        match self.read(&window_bit_key(address, slot))? {
            Some(bytes) => decode(&bytes, "window bit"),
            None => Ok(false),
        }
    }

    pub fn set_bit(
        &mut self,
        address: &ValidatorAddress,
        slot: u64,
        signed: bool,
    ) -> SlashingResult<()> {
        let value = encode(&signed, "window bit")?;
        self.staged.insert(window_bit_key(address, slot), value);
        Ok(())
    }

    /// Every bit of the window. O(window); for audits and tests only.
    pub fn window_bits(&self, address: &ValidatorAddress, window: u64) -> SlashingResult<Vec<bool>> {
        (0..window).map(|slot| self.get_bit(address, slot)).collect()
    }

    pub fn has_staged(&self) -> bool {
        !self.staged.is_empty()
    }

    /// Flush staged writes in one atomic batch. Returns the number written.
    pub fn commit(&mut self) -> SlashingResult<usize> {
        if self.staged.is_empty() {
            return Ok(0);
        }
        let staged = std::mem::take(&mut self.staged);
        let count = staged.len();
        let operations = staged
            .into_iter()
            .map(|(key, value)| BatchOperation::put(key, value))
            .collect();
        self.inner.atomic_batch_write(operations)?;
        Ok(count)
    }

    pub fn discard(&mut self) {
        self.staged.clear();
    }
}
