// tests/property_reduction.rs

use std::collections::HashSet;

use proptest::prelude::*;

use ocr_reduce::pipeline::EPSILON;
use ocr_reduce_test_utils::{PipelineBuilder, run_serial};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn accumulator_holds_n_times_n_plus_one(
        pairs in 1i64..8,
        length in 1i64..24,
        iterations in 1i64..4,
    ) {
        let mut fixture = PipelineBuilder::new(iterations, pairs, length).build();
        let trace = run_serial(&mut fixture.core).unwrap();

        let expected = (pairs * (pairs + 1)) as f64;
        let acc = fixture.pipeline.accumulator().unwrap();
        prop_assert_eq!(acc.len(), length as usize);
        for (i, value) in acc.iter().enumerate() {
            prop_assert!((value - expected).abs() < EPSILON, "slot {} = {}", i, value);
        }
        prop_assert!(fixture.pipeline.report().unwrap().is_valid());

        // Single assignment and read-after-satisfy hold for every shape.
        let unique: HashSet<_> = trace.satisfied.iter().copied().collect();
        prop_assert_eq!(unique.len(), trace.satisfied.len());
        prop_assert!(trace.early_reads.is_empty());
    }
}
