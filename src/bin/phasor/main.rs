//! phasor - terminal synthesizer
//!
//! Run with: cargo run
//!
//! The bottom row of the keyboard plays notes; see the on-screen help for
//! filter and FM controls.

#[cfg(feature = "rtrb")]
mod app;
#[cfg(feature = "rtrb")]
mod ui;

#[cfg(feature = "rtrb")]
fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    app::Phasor::new().run()
}

#[cfg(not(feature = "rtrb"))]
fn main() {
    eprintln!("The phasor binary needs the rtrb feature (enabled by default).");
}
