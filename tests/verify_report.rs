// tests/verify_report.rs

use std::sync::Arc;
use std::time::Duration;

use ocr_reduce::buffer::BufferStore;
use ocr_reduce::dag::Scheduler;
use ocr_reduce::engine::RunStats;
use ocr_reduce::errors::ReduceError;
use ocr_reduce::pipeline::{EPSILON, MAX_GRAPH_EVENTS, Pipeline, ReduceParams, VerifyMode, verify_slots};
use ocr_reduce::report::{RunReport, banner_lines};

#[test]
fn matching_slots_validate() {
    let report = verify_slots(&[12.0, 12.0], 12.0, VerifyMode::First);
    assert!(report.is_valid());
    assert_eq!(report.checked, 2);
    assert_eq!(report.lines(), vec!["Solution validates".to_string()]);
}

#[test]
fn tolerance_is_absolute_and_strict() {
    let inside = verify_slots(&[2.0 + EPSILON / 2.0], 2.0, VerifyMode::First);
    assert!(inside.is_valid());

    let outside = verify_slots(&[2.0 + EPSILON * 2.0], 2.0, VerifyMode::First);
    assert!(!outside.is_valid());

    let nan = verify_slots(&[f64::NAN], 2.0, VerifyMode::First);
    assert!(!nan.is_valid());
}

#[test]
fn first_mode_stops_at_first_mismatch() {
    let report = verify_slots(&[6.0, 5.0, 4.0, 6.0], 6.0, VerifyMode::First);

    assert_eq!(report.mismatches.len(), 1);
    assert_eq!(report.mismatches[0].index, 1);
    assert_eq!(report.checked, 2);
    assert_eq!(
        report.lines(),
        vec!["First error at i=1; value: 5.000000; reference value: 6.000000".to_string()]
    );
}

#[test]
fn all_mode_reports_every_mismatch() {
    let report = verify_slots(&[6.0, 5.0, 4.0, 6.0], 6.0, VerifyMode::All);

    assert_eq!(report.checked, 4);
    let indices: Vec<usize> = report.mismatches.iter().map(|m| m.index).collect();
    assert_eq!(indices, vec![1, 2]);
    assert_eq!(
        report.lines(),
        vec![
            "ERROR at i=1; value: 5.000000; reference value: 6.000000".to_string(),
            "ERROR at i=2; value: 4.000000; reference value: 6.000000".to_string(),
        ]
    );
}

#[test]
fn all_mode_success_prints_the_element_value() {
    let report = verify_slots(&[2.0], 2.0, VerifyMode::All);
    assert_eq!(
        report.lines(),
        vec![
            "Solution validates".to_string(),
            "Element verification value: 2.000000".to_string(),
        ]
    );
}

#[test]
fn verify_mode_parses_from_text() {
    assert_eq!("first".parse::<VerifyMode>().unwrap(), VerifyMode::First);
    assert_eq!(" ALL ".parse::<VerifyMode>().unwrap(), VerifyMode::All);
    assert!("some".parse::<VerifyMode>().is_err());
    assert_eq!(VerifyMode::default(), VerifyMode::First);
}

#[test]
fn banner_echoes_parameters() {
    let params = ReduceParams::new(5, 2, 4).unwrap();
    assert_eq!(
        banner_lines(&params),
        vec![
            "OCR Vector Reduction".to_string(),
            "Number of vector pairs  = 2".to_string(),
            "Vector length           = 4".to_string(),
            "Number of iterations    = 5".to_string(),
        ]
    );
}

#[test]
fn rate_line_uses_per_iteration_time() {
    let params = ReduceParams::new(2, 3, 1000).unwrap();
    let report = RunReport {
        params,
        stats: RunStats {
            tasks_executed: 0,
            events_satisfied: 0,
            elapsed: Duration::from_secs(1),
        },
        verification: Some(verify_slots(&[12.0], 12.0, VerifyMode::First)),
    };

    // (2N - 1) * L = 5000 flops per iteration, 0.5 s per iteration.
    assert!((report.avg_time_secs() - 0.5).abs() < 1e-12);
    assert!((report.mflops() - 0.01).abs() < 1e-12);
    assert!(report.is_valid());

    let lines = report.lines();
    assert_eq!(lines[0], "Solution validates");
    assert_eq!(lines[1], "Rate (MFlops/s): 0.010000,  Avg time (s): 0.500000");
}

#[test]
fn params_reject_non_positive_values() {
    let err = ReduceParams::new(0, 2, 4).unwrap_err();
    assert_eq!(err.to_string(), "ERROR: Iterations must be positive: 0");
    assert_eq!(err.exit_code(), 666);

    let err = ReduceParams::new(1, -3, 4).unwrap_err();
    assert_eq!(err.to_string(), "ERROR: Number of vector pairs must be positive: -3");

    let err = ReduceParams::new(1, 2, 0).unwrap_err();
    assert_eq!(err.to_string(), "ERROR: Vector length should be positive: 0");

    let params = ReduceParams::new(1, 3, 2).unwrap();
    assert_eq!(params.buffer_len(), 4);
    assert_eq!(params.expected_value(), 12.0);
}

#[test]
fn params_reject_graphs_too_large_to_build() {
    for (iterations, pairs) in [(i64::MAX, 1), (1, i64::MAX), (i64::MAX, i64::MAX)] {
        let err = ReduceParams::new(iterations, pairs, 1).unwrap_err();
        assert!(matches!(err, ReduceError::Argument(_)), "{err}");
        assert!(err.to_string().contains("Task graph too large"), "{err}");
        assert_eq!(err.exit_code(), 666);
    }

    // Just under the limit with one pair: N + 4I events.
    let iterations = ((MAX_GRAPH_EVENTS - 1) / 4) as i64;
    let params = ReduceParams::new(iterations, 1, 1).unwrap();
    assert!(params.event_count().unwrap() <= MAX_GRAPH_EVENTS);
    assert!(ReduceParams::new(iterations + 1, 1, 1).is_err());
}

#[test]
fn event_count_matches_built_graph() {
    let params = ReduceParams::new(3, 4, 2).unwrap();
    let mut scheduler = Scheduler::new();
    let pipeline = Pipeline::build(
        &mut scheduler,
        params,
        Arc::new(BufferStore::new()),
        VerifyMode::First,
    )
    .unwrap();

    assert_eq!(params.event_count(), Some(4 + 3 * 13));
    assert_eq!(Some(scheduler.event_count()), params.event_count());
    assert_eq!(pipeline.params(), params);
    assert_eq!(pipeline.global_events().len(), 3);
}
