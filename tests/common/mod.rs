#![allow(dead_code)]

use ocr_reduce::buffer::{BufferHandle, BufferStore};
use ocr_reduce::dag::{Param, Scheduler, TaskArgs, TaskBody, TaskContext, TemplateHandle};

pub use ocr_reduce_test_utils::init_tracing;

/// A one-slot buffer to use as an event payload.
pub fn payload(store: &BufferStore, id: usize) -> BufferHandle {
    store.allocate(id, 1).expect("allocating a one-slot buffer")
}

/// Body that does nothing.
pub fn noop_body() -> TaskBody {
    TaskBody::new(|_args: &TaskArgs, _ctx: &mut TaskContext| Ok(()))
}

/// Body that satisfies every `Param::Event` it was given with its first
/// input, or with a fresh buffer when it has no inputs.
pub fn forward_body(store: std::sync::Arc<BufferStore>) -> TaskBody {
    TaskBody::new(move |args: &TaskArgs, ctx: &mut TaskContext| {
        let out = match args.inputs.first() {
            Some(input) => input.clone(),
            None => store.allocate(store.len(), 1)?,
        };
        for param in &args.params {
            if let Param::Event(event) = param {
                ctx.satisfy(*event, out.clone());
            }
        }
        Ok(())
    })
}

/// Template with `params` parameters and `deps` dependencies running `body`.
pub fn template(scheduler: &mut Scheduler, name: &str, params: usize, deps: usize, body: TaskBody) -> TemplateHandle {
    scheduler.create_template(name, body, params, deps)
}
