pub mod dsp;
pub mod engine; // Block rendering and the visualization scope
pub mod synth; // Voice pool, additive bank, control messages

pub const MAX_BLOCK_SIZE: usize = 2048;

/// Number of recent output samples retained for display readout.
pub const SCOPE_CAPACITY: usize = 1024;
