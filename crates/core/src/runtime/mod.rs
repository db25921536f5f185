//! Background execution primitives.
//!
//! The engine runs on one cooperative UI thread plus a worker pool. Every
//! component that needs background execution receives the pool explicitly;
//! there is no ambient global. Completion callbacks run on worker threads
//! and must marshal onto the UI thread themselves before touching UI state.

mod join;
mod pool;

pub use join::CompletionGroup;
pub use pool::WorkerPool;
