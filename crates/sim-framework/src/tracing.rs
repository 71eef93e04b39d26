//! # Observability & Tracing
//!
//! Structured logging for the simulation runtime.
//!
//! Actors log lifecycle transitions at `info`, per-tick work at `debug` and
//! recovered faults at `warn`, always with the actor name as a field:
//!
//! ```text
//! INFO Started furnace="Furnace #1"
//! DEBUG Tick furnace="Furnace #1" iron_ore=99 coke=99 limestone=49 temperature=22
//! INFO Loaded loader="Loader #1" material=coke quantity=30
//! ```
//!
//! ```bash
//! RUST_LOG=info cargo run
//! RUST_LOG=blast_furnace=debug cargo run
//! ```

/// Initializes the tracing subscriber, filtered through `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
