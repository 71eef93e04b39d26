//! # Blast Furnace
//!
//! > **A small steel plant, simulated with cooperatively cancelled actors.**
//!
//! Three kinds of actors run side by side, each with its own background task:
//!
//! - **Furnace** consumes iron ore, coke and limestone every tick and heats up.
//!   It raises depletion and overheat alarms.
//! - **Loader** carries one batch of material at a time and reports when it is done.
//! - **Worker** performs routine checks and keeps an assigned loader busy.
//!
//! The [`Coordinator`](lifecycle::Coordinator) wires them together: it routes every
//! finished load to the furnace with the least of that material, broadcasts furnace
//! alarms to all workers, and keeps a timestamped plant log.
//!
//! ## 🏗️ Concurrency Model
//!
//! Every actor guards its own state with a `parking_lot::Mutex` and never holds it
//! across an `.await`. Background runs are owned by a
//! [`TaskSlot`](sim_framework::TaskSlot): stopping an actor cancels its token, and the
//! only place a run notices is its sleep. Notifications travel over an
//! [`EventBus`](sim_framework::EventBus), so a slow listener never blocks a tick.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`] - materials, requests, notifications and snapshots
//! - [`config`] - every tunable constant, with the plant's defaults
//! - [`furnace_actor`], [`loader_actor`], [`worker_actor`] - the actors
//! - [`lifecycle`] - the coordinator, delivery routing and the event log
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo plant with lifecycle logs
//! RUST_LOG=info cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test --workspace
//! ```

pub mod config;
pub mod furnace_actor;
pub mod lifecycle;
pub mod loader_actor;
pub mod model;
pub mod worker_actor;
