//! # Integration Test Flows
//!
//! Multi-validator, multi-block scenarios through the public API:
//!
//! 1. **Downtime**: only validators below the threshold are punished, once
//! 2. **Double sign**: evidence in a block is handled after that block's votes
//! 3. **Jail cycle**: punish, wait out the jail, unjail, rejoin
//! 4. **Atomicity**: a fatal block leaves no trace
//! 5. **Window accounting**: counters match replayed history under random load

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use tracing_subscriber::EnvFilter;

    use qc_18_slashing::{
        SlashFraction, SlashingApi, SlashingError, SlashingEvent, SlashingParams,
        SlashingParamsBuilder, ValidatorAddress,
    };

    use crate::integration::fixtures::{time_at, GatewayCall, TestChain, BLOCK_INTERVAL};

    const STAKE: u128 = 10_000_000;
    const POWER: u64 = 100;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn downtime_fraction() -> SlashFraction {
        SlashFraction::from_bps(100).unwrap()
    }

    fn double_sign_fraction() -> SlashFraction {
        SlashFraction::from_bps(500).unwrap()
    }

    fn params(window: u64, min_signed: u64) -> SlashingParams {
        SlashingParamsBuilder::new()
            .signed_blocks_window(window)
            .min_signed_per_window(min_signed)
            .max_evidence_age(Duration::from_secs(60))
            .slash_fraction_downtime(downtime_fraction())
            .slash_fraction_double_sign(double_sign_fraction())
            .downtime_unbond_duration(Duration::from_secs(600))
            .double_sign_unbond_duration(Duration::from_secs(3600))
            .build()
            .unwrap()
    }

    // =========================================================================
    // DOWNTIME
    // =========================================================================

    #[test]
    fn test_only_offline_validator_is_jailed() {
        init_tracing();
        let mut chain = TestChain::new(params(20, 10)).unwrap();
        let online = chain.bond(1, POWER, STAKE).unwrap();
        let offline = chain.bond(2, POWER, STAKE).unwrap();
        let flaky = chain.bond(3, POWER, STAKE).unwrap();

        // Flaky signs every even height: exactly 10 of every 20
        chain
            .produce_blocks(40, &[online, offline, flaky], |address, height| {
                if *address == online {
                    true
                } else if *address == flaky {
                    height % 2 == 0
                } else {
                    false
                }
            })
            .unwrap();

        assert_eq!(
            chain.gateway.calls_for(&offline),
            vec![
                GatewayCall::Slash {
                    address: offline,
                    infraction_height: 21,
                    fraction: downtime_fraction(),
                },
                GatewayCall::Revoke(offline),
            ]
        );
        assert!(chain.gateway.calls_for(&online).is_empty());
        assert!(chain.gateway.calls_for(&flaky).is_empty());
        assert_eq!(
            chain.gateway.ledger().stake_of(&offline),
            Some(STAKE - downtime_fraction().apply(STAKE))
        );

        let info = chain.service.signing_info(&offline).unwrap().unwrap();
        assert_eq!(
            info.jailed_until,
            time_at(21).saturating_add(Duration::from_secs(600))
        );
        assert_eq!(chain.service.missed_blocks(&offline).unwrap(), 20);
        assert_eq!(chain.service.missed_blocks(&flaky).unwrap(), 10);
    }

    #[test]
    fn test_late_bonded_validator_gets_own_grace_period() {
        let mut chain = TestChain::new(params(10, 5)).unwrap();
        let veteran = chain.bond(1, POWER, STAKE).unwrap();
        chain.produce_blocks(50, &[veteran], |_, _| true).unwrap();

        let newcomer = chain.bond(2, POWER, STAKE).unwrap();
        let outcomes = chain
            .produce_blocks(11, &[veteran, newcomer], |address, _| *address == veteran)
            .unwrap();

        // Heights 51..=60 are inside the grace period, 61 is not
        assert!(outcomes[..10].iter().all(|o| o.downtime_slashes == 0));
        assert_eq!(outcomes[10].height, 61);
        assert_eq!(outcomes[10].downtime_slashes, 1);
        assert_eq!(
            chain.service.signing_info(&newcomer).unwrap().unwrap().start_height,
            50
        );
    }

    #[test]
    fn test_revoked_validator_is_not_punished_twice() {
        let mut chain = TestChain::new(params(10, 5)).unwrap();
        let offline = chain.bond(2, POWER, STAKE).unwrap();

        let outcomes = chain.produce_blocks(30, &[offline], |_, _| false).unwrap();

        let total: usize = outcomes.iter().map(|o| o.downtime_slashes).sum();
        assert_eq!(total, 1);
        assert_eq!(chain.gateway.ledger().slashes().len(), 1);

        let skipped = chain
            .service
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SlashingEvent::DowntimeSkipped { .. }))
            .count();
        assert_eq!(skipped, 19);
    }

    // =========================================================================
    // DOUBLE SIGN
    // =========================================================================

    #[test]
    fn test_votes_processed_before_evidence_in_same_block() {
        init_tracing();
        let mut chain = TestChain::new(params(10, 5)).unwrap();
        let offender = chain.bond(1, POWER, STAKE).unwrap();
        chain.produce_blocks(10, &[offender], |_, _| false).unwrap();

        let evidence = chain.equivocation(offender, 9);
        let outcome = chain
            .produce_block(&[(offender, false)], vec![evidence])
            .unwrap();

        assert_eq!(outcome.downtime_slashes, 1);
        assert_eq!(outcome.double_sign_slashes, 1);
        assert_eq!(
            chain.gateway.calls_for(&offender),
            vec![
                GatewayCall::Slash {
                    address: offender,
                    infraction_height: 11,
                    fraction: downtime_fraction(),
                },
                GatewayCall::Revoke(offender),
                GatewayCall::Slash {
                    address: offender,
                    infraction_height: 9,
                    fraction: double_sign_fraction(),
                },
                GatewayCall::Revoke(offender),
            ]
        );

        // The double-sign jail overwrites the downtime jail
        let info = chain.service.signing_info(&offender).unwrap().unwrap();
        assert_eq!(
            info.jailed_until,
            time_at(11).saturating_add(Duration::from_secs(3600))
        );
    }

    #[test]
    fn test_evidence_age_is_measured_against_block_time() {
        let mut chain = TestChain::new(params(100, 50)).unwrap();
        let offender = chain.bond(1, POWER, STAKE).unwrap();
        chain.produce_blocks(29, &[offender], |_, _| true).unwrap();

        // Block 30 is 100s after height 10 and 25s after height 25
        let stale = chain.equivocation(offender, 10);
        let fresh = chain.equivocation(offender, 25);
        let outcome = chain
            .produce_block(&[(offender, true)], vec![stale, fresh])
            .unwrap();

        assert_eq!(outcome.evidence_ignored, 1);
        assert_eq!(outcome.double_sign_slashes, 1);

        let slashes = chain.gateway.ledger().slashes();
        assert_eq!(slashes.len(), 1);
        assert_eq!(slashes[0].infraction_height, 25);
        assert_eq!(slashes[0].fraction, double_sign_fraction());
    }

    // =========================================================================
    // JAIL CYCLE
    // =========================================================================

    #[test]
    fn test_unjail_cycle() {
        let mut chain = TestChain::new(params(10, 5)).unwrap();
        let anchor = chain.bond(1, POWER, STAKE).unwrap();
        let offender = chain.bond(2, POWER, STAKE).unwrap();

        chain
            .produce_blocks(11, &[anchor, offender], |address, _| *address == anchor)
            .unwrap();
        let jailed_until = chain
            .service
            .signing_info(&offender)
            .unwrap()
            .unwrap()
            .jailed_until;

        // Revoked validators drop out of the vote set
        let jail_blocks = 600 / BLOCK_INTERVAL.as_secs();
        chain
            .produce_blocks(jail_blocks - 1, &[anchor], |_, _| true)
            .unwrap();

        let err = chain.service.unjail(offender, chain.now()).unwrap_err();
        assert!(matches!(err, SlashingError::StillJailed { until, .. } if until == jailed_until));

        chain.produce_blocks(1, &[anchor], |_, _| true).unwrap();
        assert_eq!(chain.now(), jailed_until);
        chain.service.unjail(offender, chain.now()).unwrap();
        assert_eq!(chain.gateway.ledger().is_revoked(&offender), Some(false));

        let err = chain.service.unjail(offender, chain.now()).unwrap_err();
        assert!(matches!(err, SlashingError::ValidatorNotJailed { .. }));
    }

    #[test]
    fn test_unjailed_validator_below_threshold_is_jailed_again() {
        let mut chain = TestChain::new(params(10, 5)).unwrap();
        let offender = chain.bond(2, POWER, STAKE).unwrap();

        chain.produce_blocks(11, &[offender], |_, _| false).unwrap();
        let jail_blocks = 600 / BLOCK_INTERVAL.as_secs();
        chain.produce_blocks(jail_blocks, &[], |_, _| true).unwrap();
        chain.service.unjail(offender, chain.now()).unwrap();

        // The window still holds the missed blocks; one signature is not enough
        let outcome = chain.produce_block(&[(offender, true)], Vec::new()).unwrap();

        assert_eq!(outcome.downtime_slashes, 1);
        let calls = chain.gateway.calls_for(&offender);
        assert_eq!(calls.len(), 5);
        assert_eq!(calls[2], GatewayCall::Unrevoke(offender));
        assert_eq!(calls[4], GatewayCall::Revoke(offender));
    }

    // =========================================================================
    // ATOMICITY
    // =========================================================================

    #[test]
    fn test_fatal_block_leaves_no_trace() {
        let mut chain = TestChain::new(params(10, 5)).unwrap();
        let validator = chain.bond(1, POWER, STAKE).unwrap();
        chain.produce_blocks(3, &[validator], |_, _| true).unwrap();
        let before = chain.service.signing_info(&validator).unwrap();
        chain.service.drain_events();

        let stranger = ValidatorAddress::new([0xAB; 20]);
        let evidence = chain.equivocation(stranger, 3);
        let err = chain
            .produce_block(&[(validator, false)], vec![evidence])
            .unwrap_err();

        assert!(matches!(err, SlashingError::UnknownValidator { address } if address == stranger));
        assert!(err.is_fatal());
        assert_eq!(chain.height, 3);
        assert_eq!(chain.service.signing_info(&validator).unwrap(), before);
        assert!(chain.service.events().is_empty());
        assert!(chain.gateway.calls().is_empty());

        // The same height replays cleanly without the bad evidence
        let outcome = chain.produce_block(&[(validator, false)], Vec::new()).unwrap();
        assert_eq!(outcome.height, 4);
        assert_eq!(outcome.absences, 1);
    }

    #[test]
    fn test_punishing_block_replays_after_fatal_evidence() {
        let mut chain = TestChain::new(params(10, 5)).unwrap();
        let offender = chain.bond(1, POWER, STAKE).unwrap();
        chain.produce_blocks(10, &[offender], |_, _| false).unwrap();

        // Block 11 crosses the threshold but carries unresolvable evidence
        let stranger = ValidatorAddress::new([0xCD; 20]);
        let evidence = chain.equivocation(stranger, 11);
        let err = chain
            .produce_block(&[(offender, false)], vec![evidence])
            .unwrap_err();

        assert!(err.is_fatal());
        assert!(chain.gateway.calls().is_empty());
        assert_eq!(chain.gateway.ledger().stake_of(&offender), Some(STAKE));

        let outcome = chain.produce_block(&[(offender, false)], Vec::new()).unwrap();
        assert_eq!(outcome.height, 11);
        assert_eq!(outcome.downtime_slashes, 1);
        assert_eq!(
            chain.gateway.calls_for(&offender),
            vec![
                GatewayCall::Slash {
                    address: offender,
                    infraction_height: 11,
                    fraction: downtime_fraction(),
                },
                GatewayCall::Revoke(offender),
            ]
        );

        let err = chain.service.unjail(offender, chain.now()).unwrap_err();
        assert!(matches!(err, SlashingError::StillJailed { .. }));
    }

    #[test]
    fn test_duplicate_vote_rejects_block() {
        let mut chain = TestChain::new(params(10, 5)).unwrap();
        let validator = chain.bond(1, POWER, STAKE).unwrap();

        let err = chain
            .produce_block(&[(validator, true), (validator, true)], Vec::new())
            .unwrap_err();

        assert!(matches!(err, SlashingError::DuplicateVote { height: 1, .. }));
        assert_eq!(
            chain
                .service
                .signing_info(&validator)
                .unwrap()
                .unwrap()
                .index_offset,
            0
        );
    }

    // =========================================================================
    // WINDOW ACCOUNTING
    // =========================================================================

    #[test]
    fn test_counters_match_replayed_history() {
        const WINDOW: u64 = 16;
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let mut chain = TestChain::new(params(WINDOW, 0)).unwrap();

        let validators: Vec<ValidatorAddress> =
            (1..=5).map(|id| chain.bond(id, POWER, STAKE).unwrap()).collect();
        let mut history: HashMap<ValidatorAddress, Vec<bool>> = HashMap::new();

        for _ in 0..200 {
            let signatures: Vec<(ValidatorAddress, bool)> = validators
                .iter()
                .enumerate()
                .map(|(i, address)| (*address, rng.gen_bool(0.2 + 0.15 * i as f64)))
                .collect();
            for (address, signed) in &signatures {
                history.entry(*address).or_default().push(*signed);
            }
            chain.produce_block(&signatures, Vec::new()).unwrap();

            for address in &validators {
                let seen = &history[address];
                let recent = &seen[seen.len().saturating_sub(WINDOW as usize)..];
                let expected = recent.iter().filter(|s| **s).count() as u64;

                let info = chain.service.signing_info(address).unwrap().unwrap();
                assert_eq!(info.signed_blocks_counter, expected);
                assert_eq!(info.index_offset, seen.len() as u64);
                assert_eq!(
                    chain.service.missed_blocks(address).unwrap(),
                    recent.len() as u64 - expected
                );
            }
        }

        // Threshold zero never punishes
        assert!(chain.gateway.calls().is_empty());
    }
}
