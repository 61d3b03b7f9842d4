// src/buffer/mod.rs

//! Numeric buffers shared between tasks.
//!
//! - [`block`] holds the length-checked [`Buffer`] and the [`BufferHandle`]
//!   that event payloads carry.
//! - [`store`] allocates buffers and keeps them reachable by pair index.

pub mod block;
pub mod store;

pub use block::{Buffer, BufferGuard, BufferHandle, BufferId};
pub use store::BufferStore;
