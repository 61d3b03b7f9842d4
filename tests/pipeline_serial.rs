// tests/pipeline_serial.rs

//! Whole reduction runs on a single worker, driven synchronously.

mod common;
use crate::common::init_tracing;

use std::collections::HashSet;

use ocr_reduce::dag::EventState;
use ocr_reduce::pipeline::VerifyMode;
use ocr_reduce_test_utils::{PipelineBuilder, run_serial};

fn accumulator_after(iterations: i64, pairs: i64, length: i64) -> Vec<f64> {
    let mut fixture = PipelineBuilder::new(iterations, pairs, length).build();
    run_serial(&mut fixture.core).unwrap();
    fixture.pipeline.accumulator().unwrap()
}

#[test]
fn scenario_single_pair_single_slot() {
    init_tracing();
    assert_eq!(accumulator_after(1, 1, 1), vec![2.0]);
}

#[test]
fn scenario_three_pairs() {
    init_tracing();
    assert_eq!(accumulator_after(1, 3, 2), vec![12.0, 12.0]);
}

#[test]
fn scenario_repeated_iterations() {
    init_tracing();
    let mut fixture = PipelineBuilder::new(5, 2, 4).build();
    let trace = run_serial(&mut fixture.core).unwrap();

    assert_eq!(fixture.pipeline.accumulator().unwrap(), vec![6.0; 4]);

    let report = fixture.pipeline.report().unwrap();
    assert!(report.is_valid());
    assert_eq!(report.expected, 6.0);
    assert_eq!(report.lines(), vec!["Solution validates".to_string()]);

    // 2 Allocate + 5 * (2 Initialize + 2 LocalReduce + GlobalReduce) + Verify
    assert_eq!(trace.executed.len(), 2 + 5 * 5 + 1);
    assert_eq!(trace.executed.last().map(|(_, name)| name.as_str()), Some("Verify"));
    assert!(fixture.core.scheduler().is_drained());
    assert!(fixture.core.progress().shutdown_requested);
}

#[test]
fn result_does_not_depend_on_iteration_count() {
    for k in 1..=4 {
        assert_eq!(accumulator_after(k, 3, 5), accumulator_after(k + 1, 3, 5));
    }
}

#[test]
fn every_event_is_satisfied_exactly_once() {
    let mut fixture = PipelineBuilder::new(3, 4, 2).build();
    let trace = run_serial(&mut fixture.core).unwrap();

    let unique: HashSet<_> = trace.satisfied.iter().copied().collect();
    assert_eq!(unique.len(), trace.satisfied.len());

    let scheduler = fixture.core.scheduler();
    for event in scheduler.events() {
        assert_eq!(scheduler.event_state(event), Some(EventState::Satisfied));
        assert_eq!(scheduler.satisfy_count(event), Some(1), "{event}");
    }
    assert_eq!(trace.satisfied.len(), scheduler.event_count());
    assert_eq!(fixture.core.progress().events_satisfied, scheduler.event_count());
}

#[test]
fn no_task_runs_before_its_inputs() {
    let mut fixture = PipelineBuilder::new(4, 3, 3).build();
    let trace = run_serial(&mut fixture.core).unwrap();

    assert!(trace.early_reads.is_empty(), "{:?}", trace.early_reads);
}

#[test]
fn stage_order_within_a_pair() {
    let mut fixture = PipelineBuilder::new(2, 2, 1).build();
    let trace = run_serial(&mut fixture.core).unwrap();
    let names: Vec<&str> = trace.executed.iter().map(|(_, n)| n.as_str()).collect();

    let first = |name: &str| names.iter().position(|n| *n == name).unwrap();
    let last = |name: &str| names.iter().rposition(|n| *n == name).unwrap();

    assert!(last("Allocate") < first("Initialize"));
    // The first GlobalReduce waits for every LocalReduce of its iteration.
    let first_global = first("GlobalReduce");
    assert_eq!(
        names[..first_global].iter().filter(|n| **n == "LocalReduce").count(),
        2
    );
    // Reinitialisation waits for the global reduction that read the buffers.
    assert_eq!(
        names[..first_global].iter().filter(|n| **n == "Initialize").count(),
        2
    );
    assert_eq!(last("Verify"), names.len() - 1);
}

#[test]
fn verbose_mode_reports_element_value() {
    let mut fixture = PipelineBuilder::new(1, 2, 3).verify_mode(VerifyMode::All).build();
    run_serial(&mut fixture.core).unwrap();

    let report = fixture.pipeline.report().unwrap();
    assert_eq!(report.checked, 3);
    assert_eq!(
        report.lines(),
        vec![
            "Solution validates".to_string(),
            "Element verification value: 6.000000".to_string(),
        ]
    );
}
