// tests/graph_validation.rs

mod common;
use crate::common::{noop_body, payload, template};

use ocr_reduce::buffer::BufferStore;
use ocr_reduce::dag::{Join, Param, Scheduler};
use ocr_reduce::errors::ReduceError;
use ocr_reduce::pipeline::VerifyMode;
use ocr_reduce_test_utils::PipelineBuilder;

#[test]
fn event_with_two_producers_is_rejected() {
    let mut scheduler = Scheduler::new();
    let tpl = template(&mut scheduler, "Producer", 1, 0, noop_body());
    let event = scheduler.create_event();

    let first = scheduler.submit(tpl, vec![Param::Event(event)], Join::none()).unwrap();
    let second = scheduler.submit(tpl, vec![Param::Event(event)], Join::none()).unwrap();

    match scheduler.validate_graph() {
        Err(ReduceError::MultipleProducers { event: e, first: f, second: s }) => {
            assert_eq!(e, event);
            assert_eq!((f, s), (first, second));
        }
        other => panic!("Expected MultipleProducers, got: {:?}", other),
    }
}

#[test]
fn dependency_nobody_produces_is_rejected() {
    let mut scheduler = Scheduler::new();
    let tpl = template(&mut scheduler, "Orphan", 0, 1, noop_body());
    let event = scheduler.create_event();
    let task = scheduler.submit(tpl, vec![], Join::one(event)).unwrap();

    match scheduler.validate_graph() {
        Err(ReduceError::DanglingDependency { task: t, event: e }) => {
            assert_eq!(t, task);
            assert_eq!(e, event);
        }
        other => panic!("Expected DanglingDependency, got: {:?}", other),
    }
}

#[test]
fn dependency_on_an_already_satisfied_event_is_fine() {
    let store = BufferStore::new();
    let mut scheduler = Scheduler::new();
    let tpl = template(&mut scheduler, "Reader", 0, 1, noop_body());
    let event = scheduler.create_event();
    scheduler.satisfy(event, payload(&store, 0)).unwrap();
    scheduler.submit(tpl, vec![], Join::one(event)).unwrap();

    scheduler.validate_graph().unwrap();
}

#[test]
fn cycle_is_rejected() {
    let mut scheduler = Scheduler::new();
    let tpl = template(&mut scheduler, "Loop", 1, 1, noop_body());
    let a = scheduler.create_event();
    let b = scheduler.create_event();

    // Each task produces what the other waits on.
    scheduler.submit(tpl, vec![Param::Event(a)], Join::one(b)).unwrap();
    scheduler.submit(tpl, vec![Param::Event(b)], Join::one(a)).unwrap();

    let err = scheduler.validate_graph().unwrap_err();
    assert!(matches!(err, ReduceError::GraphCycle(_)), "got {err:?}");
}

#[test]
fn reduction_graph_has_expected_shape() {
    // N = 2, L = 3, one iteration.
    let fixture = PipelineBuilder::new(1, 2, 3).build();
    let scheduler = fixture.core.scheduler();
    let graph = scheduler.task_graph().unwrap();

    // 2 Allocate + 2 Initialize + 2 LocalReduce + GlobalReduce + Verify
    assert_eq!(graph.task_count(), 8);
    // alloc->init, init->local, local->global per pair, global->verify
    assert_eq!(graph.edge_count(), 7);
    // Allocate -> Initialize -> LocalReduce -> GlobalReduce -> Verify
    assert_eq!(graph.depth(), 5);
    assert_eq!(graph.roots().len(), 2);

    // N alloc + (N init + N local + 1 global + N release)
    assert_eq!(scheduler.event_count(), 9);

    let census = scheduler.template_census();
    assert_eq!(
        census,
        vec![
            ("Allocate", 2),
            ("Initialize", 2),
            ("LocalReduce", 2),
            ("GlobalReduce", 1),
            ("Verify", 1),
        ]
    );
}

#[test]
fn iterations_are_chained_through_release_events() {
    let fixture = PipelineBuilder::new(3, 2, 1).verify_mode(VerifyMode::All).build();
    let graph = fixture.core.scheduler().task_graph().unwrap();

    // Allocate, then (Initialize, LocalReduce, GlobalReduce) per iteration,
    // then Verify.
    assert_eq!(graph.depth(), 2 + 3 * 3);

    // Topological order never puts a later GlobalReduce before an earlier
    // one's consumers.
    let order: Vec<_> = graph.topological_order().collect();
    assert_eq!(order.len(), graph.task_count());
    assert_eq!(fixture.pipeline.global_events().len(), 3);
}
