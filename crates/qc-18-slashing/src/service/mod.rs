//! Slashing Service - Core business logic
//!
//! Owns the signing store and drives the liveness tracker and the
//! double-sign handler. Every entry point stages its writes and commits them
//! only when the whole call succeeded.

mod double_sign;
mod liveness;


pub use liveness::SigningObservation;

use crate::domain::{
    AddressIndex, DoubleSignEvidence, Misbehaviour, PublicKey, SlashingParams, Timestamp,
    ValidatorAddress, ValidatorSigningInfo,
};
use crate::error::{SlashingError, SlashingResult};
use crate::events::{BlockSigningReport, SlashingEvent};
use crate::metrics;
use crate::ports::inbound::{BlockOutcome, SlashingApi};
use crate::ports::outbound::{KeyValueStore, ParamsProvider, ValidatorSetGateway};
use crate::store::SigningStore;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Slashing Service implementation
pub struct SlashingService<S, G, P>
where
    S: KeyValueStore,
    G: ValidatorSetGateway,
    P: ParamsProvider,
{
    store: SigningStore<S>,
    gateway: Arc<G>,
    params: Arc<P>,
    /// Observability events not yet drained
    events: Vec<SlashingEvent>,
}

impl<S, G, P> SlashingService<S, G, P>
where
    S: KeyValueStore,
    G: ValidatorSetGateway,
    P: ParamsProvider,
{
    pub fn new(store: S, gateway: Arc<G>, params: Arc<P>) -> Self {
        Self {
            store: SigningStore::new(store),
            gateway,
            params,
            events: Vec::new(),
        }
    }

    pub fn store(&self) -> &SigningStore<S> {
        &self.store
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Pending events, oldest first.
    pub fn events(&self) -> &[SlashingEvent] {
        &self.events
    }

    fn current_params(&self) -> SlashingResult<SlashingParams> {
        let params = self.params.snapshot();
        params.validate()?;
        Ok(params)
    }

    fn emit(&mut self, event: SlashingEvent) {
        self.events.push(event);
    }

    /// Run `op` and commit its staged writes, or discard them (and the
    /// events it emitted) if it fails. Only committed events are counted.
    fn committed<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> SlashingResult<T>,
    ) -> SlashingResult<T> {
        let events_before = self.events.len();

        let result = op(self).and_then(|value| {
            self.store.commit()?;
            Ok(value)
        });

        match &result {
            Ok(_) => {
                for event in &self.events[events_before..] {
                    metrics::record_event(event.kind());
                }
            }
            Err(err) => {
                self.store.discard();
                self.events.truncate(events_before);
                if err.is_fatal() {
                    error!("[qc-18] Discarding staged writes after fatal error: {}", err);
                } else {
                    debug!("[qc-18] Discarding staged writes: {}", err);
                }
            }
        }
        result
    }

    /// Index first, then the gateway. Gateway hits are remembered.
    ///
    /// A key whose derived address differs from `address` is never returned,
    /// so a punishment always lands on the validator that was reported.
    fn resolve_key(
        &self,
        index: &mut AddressIndex,
        address: &ValidatorAddress,
    ) -> Option<PublicKey> {
        if let Some(key) = index.resolve(address) {
            if key.address() == *address {
                return Some(key);
            }
            warn!(
                validator = %address,
                indexed = %key.address(),
                "[qc-18] Ignoring address index entry for a different key"
            );
        }
        let record = self
            .gateway
            .validator_by_address(address)
            .filter(|record| record.address() == *address)?;
        index.remember(address.as_bytes(), record.public_key);
        Some(record.public_key)
    }

    fn check_unique_votes(report: &BlockSigningReport) -> SlashingResult<()> {
        let mut seen = BTreeSet::new();
        for vote in &report.votes {
            if !seen.insert(vote.address) {
                return Err(SlashingError::DuplicateVote {
                    address: vote.address,
                    height: report.height,
                });
            }
        }
        Ok(())
    }

    /// Resolve every piece of evidence before anything reaches the gateway.
    ///
    /// A double signer must be resolvable. Unless the evidence is stale it
    /// must also have signing info, either stored already or created by its
    /// vote in this same block.
    fn prepare_evidence(
        &self,
        params: &SlashingParams,
        index: &mut AddressIndex,
        report: &BlockSigningReport,
    ) -> SlashingResult<Vec<PreparedEvidence>> {
        let mut prepared = Vec::with_capacity(report.evidence.len());

        for misbehaviour in &report.evidence {
            let item = match misbehaviour {
                Misbehaviour::DuplicateVote {
                    address,
                    height,
                    time,
                    power,
                } => {
                    let public_key = self.resolve_key(index, address).ok_or_else(|| {
                        error!(
                            validator = %address,
                            "[qc-18] Double sign evidence for unknown validator"
                        );
                        SlashingError::UnknownValidator { address: *address }
                    })?;

                    let evidence = DoubleSignEvidence {
                        public_key,
                        infraction_height: *height,
                        infraction_time: *time,
                        power: *power,
                    };

                    let stale = evidence.is_stale(report.time, params.max_evidence_age);
                    let voted = report.votes.iter().any(|vote| vote.address == *address);
                    if !stale && !voted && self.store.get_signing_info(address)?.is_none() {
                        error!(
                            validator = %address,
                            "[qc-18] Expected signing info for double signer but not found"
                        );
                        return Err(SlashingError::MissingSigningInfo { address: *address });
                    }

                    PreparedEvidence::DoubleSign(evidence)
                }
                Misbehaviour::Unknown { kind, address } => PreparedEvidence::Unsupported {
                    kind: kind.clone(),
                    address: *address,
                },
            };
            prepared.push(item);
        }

        Ok(prepared)
    }

    fn apply_block(
        &mut self,
        index: &mut AddressIndex,
        report: &BlockSigningReport,
    ) -> SlashingResult<BlockOutcome> {
        let params = self.current_params()?;
        Self::check_unique_votes(report)?;
        let evidence = self.prepare_evidence(&params, index, report)?;

        let mut outcome = BlockOutcome::empty(report.height);

        for vote in &report.votes {
            let Some(public_key) = self.resolve_key(index, &vote.address) else {
                warn!(
                    validator = %vote.address,
                    height = report.height,
                    "[qc-18] Skipping vote from unresolvable validator"
                );
                self.emit(SlashingEvent::VoteSkipped {
                    validator: vote.address,
                    height: report.height,
                });
                outcome.votes_skipped += 1;
                continue;
            };

            let observation = SigningObservation {
                address: vote.address,
                public_key,
                power: vote.power,
                signed: vote.signed,
                height: report.height,
                time: report.time,
            };
            let result = self.handle_signature(&params, &observation)?;

            outcome.votes_processed += 1;
            if result.absent {
                outcome.absences += 1;
            }
            if result.punished {
                outcome.downtime_slashes += 1;
            }
        }

        for item in evidence {
            match item {
                PreparedEvidence::DoubleSign(evidence) => {
                    if self.handle_double_sign(&params, &evidence, report.time)? {
                        outcome.double_sign_slashes += 1;
                    } else {
                        outcome.evidence_ignored += 1;
                    }
                }
                PreparedEvidence::Unsupported { kind, address } => {
                    info!(
                        validator = %address,
                        kind = %kind,
                        "[qc-18] Ignored unknown evidence type"
                    );
                    self.emit(SlashingEvent::EvidenceIgnored {
                        validator: address,
                        kind,
                    });
                    outcome.evidence_ignored += 1;
                }
            }
        }

        Ok(outcome)
    }
}

/// Evidence resolved ahead of the block's first gateway call.
enum PreparedEvidence {
    DoubleSign(DoubleSignEvidence),
    Unsupported {
        kind: String,
        address: ValidatorAddress,
    },
}

impl<S, G, P> SlashingApi for SlashingService<S, G, P>
where
    S: KeyValueStore,
    G: ValidatorSetGateway,
    P: ParamsProvider,
{
    fn process_block(
        &mut self,
        index: &mut AddressIndex,
        report: BlockSigningReport,
    ) -> SlashingResult<BlockOutcome> {
        let outcome = self.committed(|svc| svc.apply_block(index, &report))?;

        metrics::record_block_processed();
        if outcome.punished() > 0 || outcome.votes_skipped > 0 {
            info!(
                height = outcome.height,
                votes = outcome.votes_processed,
                skipped = outcome.votes_skipped,
                downtime = outcome.downtime_slashes,
                double_sign = outcome.double_sign_slashes,
                "[qc-18] Block processed"
            );
        }
        Ok(outcome)
    }

    fn report_signing(
        &mut self,
        address: ValidatorAddress,
        public_key: PublicKey,
        power: u64,
        signed: bool,
        height: u64,
        time: Timestamp,
    ) -> SlashingResult<()> {
        let observation = SigningObservation {
            address,
            public_key,
            power,
            signed,
            height,
            time,
        };
        self.committed(|svc| {
            let params = svc.current_params()?;
            svc.handle_signature(&params, &observation).map(|_| ())
        })
    }

    fn report_double_sign(
        &mut self,
        evidence: DoubleSignEvidence,
        block_time: Timestamp,
    ) -> SlashingResult<()> {
        self.committed(|svc| {
            let params = svc.current_params()?;
            svc.handle_double_sign(&params, &evidence, block_time)
                .map(|_| ())
        })
    }

    fn on_validator_bonded(
        &mut self,
        index: &mut AddressIndex,
        public_key: PublicKey,
        height: u64,
    ) -> SlashingResult<()> {
        let address = index.remember_key(public_key);

        self.committed(|svc| {
            if svc.store.get_signing_info(&address)?.is_none() {
                svc.store
                    .set_signing_info(&address, &ValidatorSigningInfo::new(height))?;
                debug!(
                    validator = %address,
                    height,
                    "[qc-18] Started tracking bonded validator"
                );
            }
            Ok(())
        })
    }

    fn unjail(&mut self, address: ValidatorAddress, block_time: Timestamp) -> SlashingResult<()> {
        self.committed(|svc| {
            let info = svc
                .store
                .get_signing_info(&address)?
                .ok_or(SlashingError::MissingSigningInfo { address })?;

            let validator = svc
                .gateway
                .validator_by_address(&address)
                .ok_or(SlashingError::UnknownValidator { address })?;

            if !validator.is_revoked() {
                return Err(SlashingError::ValidatorNotJailed { address });
            }

            if info.is_jailed_at(block_time) {
                return Err(SlashingError::StillJailed {
                    address,
                    until: info.jailed_until,
                });
            }

            svc.gateway.unrevoke(&address)?;

            info!(validator = %address, "[qc-18] Validator unjailed");
            svc.emit(SlashingEvent::Unjailed {
                validator: address,
                time: block_time,
            });
            Ok(())
        })
    }

    fn signing_info(
        &self,
        address: &ValidatorAddress,
    ) -> SlashingResult<Option<ValidatorSigningInfo>> {
        self.store.get_signing_info(address)
    }

    fn missed_blocks(&self, address: &ValidatorAddress) -> SlashingResult<u64> {
        let window = self.params.signed_blocks_window();
        Ok(self
            .store
            .get_signing_info(address)?
            .map(|info| info.missed_in_window(window))
            .unwrap_or(0))
    }

    fn drain_events(&mut self) -> Vec<SlashingEvent> {
        std::mem::take(&mut self.events)
    }
}
