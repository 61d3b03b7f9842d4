// src/pipeline/tasks.rs

//! Bodies of the five reduction task kinds.
//!
//! Parameter layouts (index: meaning):
//!
//! | kind         | params                                   | inputs             |
//! |--------------|------------------------------------------|--------------------|
//! | Allocate     | 0: L, 1: pair, 2: out event              | none               |
//! | Initialize   | 0: L, 1: pair, 2: out event              | the pair's buffer  |
//! | LocalReduce  | 0: L, 1: out event                       | the pair's buffer  |
//! | GlobalReduce | 0: L, 1: out event, 2: N, 3: release events | N locally reduced buffers |
//! | Verify       | 0: N, 1: L                               | the accumulator    |

use std::sync::{Arc, OnceLock};

use tracing::{debug, info, warn};

use crate::buffer::BufferStore;
use crate::dag::{TaskArgs, TaskBody, TaskContext};
use crate::errors::{ReduceError, Result};
use crate::pipeline::params::expected_value;
use crate::pipeline::verify::{VerificationReport, VerifyMode, verify_slots};

pub const ALLOCATE: &str = "Allocate";
pub const INITIALIZE: &str = "Initialize";
pub const LOCAL_REDUCE: &str = "LocalReduce";
pub const GLOBAL_REDUCE: &str = "GlobalReduce";
pub const VERIFY: &str = "Verify";

fn buffer_len(args: &TaskArgs, len: usize) -> Result<usize> {
    len.checked_mul(2).ok_or_else(|| ReduceError::BadParam {
        template: args.template.to_string(),
        index: 0,
        expected: "a vector length that fits twice in memory",
    })
}

/// Create the pair's buffer in `store` and hand it downstream.
pub fn allocate(store: Arc<BufferStore>) -> TaskBody {
    TaskBody::new(move |args: &TaskArgs, ctx: &mut TaskContext| {
        let len = args.count(0)?;
        let pair = args.count(1)?;
        let out = args.event(2)?;

        let buffer = store.allocate(pair, buffer_len(args, len)?)?;
        debug!(task = %ctx.task(), pair, buffer = %buffer.id(), "allocated vector pair");

        ctx.satisfy(out, buffer);
        Ok(())
    })
}

/// Fill both halves of pair `s` with `s + 1`.
pub fn initialize() -> TaskBody {
    TaskBody::new(|args: &TaskArgs, ctx: &mut TaskContext| {
        let len = args.count(0)?;
        let pair = args.count(1)?;
        let out = args.event(2)?;
        let buffer = args.input(0)?;

        buffer
            .acquire()?
            .fill_prefix(buffer_len(args, len)?, (pair + 1) as f64)?;
        debug!(task = %ctx.task(), pair, buffer = %buffer.id(), "initialized vector pair");

        ctx.satisfy(out, buffer.clone());
        Ok(())
    })
}

/// Fold the upper half of the pair's buffer onto the lower half.
pub fn local_reduce() -> TaskBody {
    TaskBody::new(|args: &TaskArgs, ctx: &mut TaskContext| {
        let len = args.count(0)?;
        let out = args.event(1)?;
        let buffer = args.input(0)?;

        buffer.acquire()?.fold_halves(len)?;
        debug!(task = %ctx.task(), buffer = %buffer.id(), event = %out, "combined vector pair");

        ctx.satisfy(out, buffer.clone());
        Ok(())
    })
}

/// Add every pair's lower half into pair 0's, in ascending pair order, then
/// release all buffers for the next iteration.
pub fn global_reduce() -> TaskBody {
    TaskBody::new(|args: &TaskArgs, ctx: &mut TaskContext| {
        let len = args.count(0)?;
        let out = args.event(1)?;
        let pairs = args.count(2)?;
        let releases = args.events(3)?;

        if args.inputs.len() != pairs || releases.len() != pairs {
            return Err(ReduceError::ArityMismatch {
                template: args.template.to_string(),
                what: "pairs",
                expected: pairs,
                got: args.inputs.len().min(releases.len()),
            });
        }

        let accumulator = args.input(0)?;
        {
            let mut acc = accumulator.acquire()?;
            for pair in 1..pairs {
                let other = args.input(pair)?;
                let src = other.acquire()?;
                acc.accumulate(&src, len)?;
                debug!(pair, "combined vectors 0 and {pair}");
            }
        }

        ctx.satisfy(out, accumulator.clone());
        debug!(event = %out, "satisfied global reduction event");

        for (&release, buffer) in releases.iter().zip(&args.inputs) {
            ctx.satisfy(release, buffer.clone());
        }
        Ok(())
    })
}

/// Compare the accumulator with `N * (N + 1)`, publish the report and ask for
/// shutdown.
pub fn verify(mode: VerifyMode, sink: Arc<OnceLock<VerificationReport>>) -> TaskBody {
    TaskBody::new(move |args: &TaskArgs, ctx: &mut TaskContext| {
        let pairs = args.count(0)?;
        let len = args.count(1)?;
        let accumulator = args.input(0)?;

        let expected = expected_value(pairs);
        let report = {
            let guard = accumulator.acquire()?;
            verify_slots(guard.prefix(len)?, expected, mode)
        };

        if report.is_valid() {
            info!(expected, slots = report.checked, "verification passed");
        } else {
            for m in &report.mismatches {
                warn!(index = m.index, value = m.value, expected, "verification mismatch");
            }
        }

        if sink.set(report).is_err() {
            warn!("verification report already recorded; keeping the first one");
        }

        ctx.request_shutdown();
        Ok(())
    })
}
