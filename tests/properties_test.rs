/*!
 * Alternation Property Tests
 *
 * Ordering and completeness over random round counts and multipliers
 */

use proptest::prelude::*;
use std::sync::Arc;
use turn_alternator::{Driver, DriverConfig, MemorySink, Participant};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_records_alternate_then_drain(
        rounds_a in 1u32..25,
        rounds_b in 1u32..25,
        multiplier_a in 1u64..100,
        multiplier_b in 1u64..100,
    ) {
        let mut config = DriverConfig::default().with_multipliers(multiplier_a, multiplier_b);
        config.rounds_a = rounds_a;
        config.rounds_b = rounds_b;

        let sink = Arc::new(MemorySink::new());
        let report = Driver::with_sink(config, sink.clone()).run().unwrap();
        let records = sink.records();

        prop_assert_eq!(records.len() as u32, rounds_a + rounds_b);
        prop_assert_eq!(report.total_actions(), rounds_a + rounds_b);

        // Strict alternation while both workers still have actions left
        let shared = 2 * rounds_a.min(rounds_b) as usize;
        for (k, record) in records[..shared].iter().enumerate() {
            let expected = if k % 2 == 0 { Participant::A } else { Participant::B };
            prop_assert_eq!(record.participant, expected);
        }
        // The longer worker drains its remainder alone
        let tail = if rounds_a > rounds_b { Participant::A } else { Participant::B };
        prop_assert!(records[shared..].iter().all(|r| r.participant == tail));

        // Each worker's own indices are exactly 1..=N in order
        for (participant, rounds, multiplier) in [
            (Participant::A, rounds_a, multiplier_a),
            (Participant::B, rounds_b, multiplier_b),
        ] {
            let own: Vec<_> = records.iter().filter(|r| r.participant == participant).collect();
            prop_assert_eq!(own.len() as u32, rounds);
            for (position, record) in own.iter().enumerate() {
                prop_assert_eq!(record.index, position as u32 + 1);
                prop_assert_eq!(record.multiplier, multiplier);
                prop_assert_eq!(record.product, multiplier * u64::from(record.index));
            }
        }

        prop_assert!(report.stats.peak_holders <= 1);
    }
}
