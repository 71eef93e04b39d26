//! # Simulation Framework
//!
//! This crate provides the plumbing shared by every actor of the blast furnace plant
//! simulation. It knows nothing about furnaces or loaders; it answers the questions
//! every concurrently running actor has to answer:
//!
//! - **When do I act?** [`ticker::Ticker`] is a cancellable periodic timer.
//! - **How do I stop?** [`task::TaskSlot`] launches runs bound to a cancellation token
//!   and can wait for all of them to finish.
//! - **Who hears about my changes?** [`events::EventBus`] is an explicit
//!   publish/subscribe registry.
//! - **Where does chance come from?** [`random::RandomSource`] is injected per actor.
//!
//! ## Concurrency Model
//!
//! - Every actor run is its own Tokio task, launched fire-and-forget from a
//!   lifecycle call. The caller never waits for simulation progress.
//! - Actor state sits behind a mutex owned by that actor only; there is no global lock.
//! - A run observes cancellation only while suspended in a [`ticker`] sleep.
//!
//! ## Testing
//!
//! See the [`mock`] module for a scripted random source and notification assertions
//! that pair with Tokio's paused clock.

pub mod actor;
pub mod error;
pub mod events;
pub mod mock;
pub mod random;
pub mod task;
pub mod ticker;
pub mod tracing;

pub use actor::SimActor;
pub use error::{Cancelled, FrameworkError};
pub use events::{EventBus, Subscription};
pub use random::{RandomSource, SharedRandom, ThreadRandom};
pub use task::TaskSlot;
pub use ticker::Ticker;
pub use tokio_util::sync::CancellationToken;
