//! Full-engine scenario benchmarks.
//!
//! These model the actual audio-callback workload: a block rendered through
//! the voice pool, FM operator, and filter chain together.

mod engine;

pub use engine::bench_engine;
