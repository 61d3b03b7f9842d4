// src/pipeline/mod.rs

//! The vector-pair reduction built on the dataflow scheduler.
//!
//! - [`params`] validates the run shape (iterations, pairs, vector length).
//! - [`tasks`] holds the Allocate, Initialize, LocalReduce, GlobalReduce and
//!   Verify bodies.
//! - [`builder`] wires them into one graph across pairs and iterations.
//! - [`verify`] compares the accumulator with the expected value.

pub mod builder;
pub mod params;
pub mod tasks;
pub mod verify;

pub use builder::Pipeline;
pub use params::{MAX_GRAPH_EVENTS, ReduceParams};
pub use verify::{EPSILON, Mismatch, VerificationReport, VerifyMode, verify_slots};
