//! # Furnace Actor
//!
//! A blast furnace that burns through its stocks once per tick while running.
//!
//! ## Structure
//!
//! - [`entity`] - [`FurnaceState`] and the rules of a single tick
//! - [`error`] - [`FurnaceError`], the recoverable per-tick faults
//! - [`Furnace`] - the actor: guard, event bus and tick loop
//!
//! ## Tick
//!
//! Every tick, under the furnace's own mutex:
//! 1. each stock above zero loses one unit,
//! 2. with coke left the temperature rises by 1 or 2, otherwise it falls by 1 (never below ambient),
//! 3. an empty stock stops the furnace and raises [`Notification::Depleted`],
//! 4. above the overheat threshold a 5% draw raises [`Notification::Overheat`]. The alarm
//!    is not latched and can repeat on any later tick.
//!
//! [`Furnace::add_materials`] goes through the same mutex, so deliveries never race
//! the tick.
//!
//! ## Usage
//!
//! ```rust
//! use blast_furnace::furnace_actor::Furnace;
//! use blast_furnace::model::Notification;
//!
//! #[tokio::main(flavor = "current_thread", start_paused = true)]
//! async fn main() {
//!     let furnace = Furnace::with_defaults("Furnace #1");
//!     let mut events = furnace.subscribe();
//!
//!     furnace.start();
//!     assert_eq!(events.recv().await, Some(Notification::status("Furnace started")));
//!
//!     furnace.add_materials(10, 0, 0);
//!     furnace.stop();
//!     assert!(!furnace.is_running());
//! }
//! ```

pub mod entity;
pub mod error;

pub use entity::*;
pub use error::*;

use crate::config::FurnaceConfig;
use crate::model::{FurnaceSnapshot, MaterialKind, Notification};
use async_trait::async_trait;
use parking_lot::Mutex;
use sim_framework::{
    CancellationToken, EventBus, FrameworkError, SharedRandom, SimActor, Subscription, TaskSlot,
    ThreadRandom, Ticker,
};
use std::fmt::{self, Display};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Whether the tick loop should keep going.
enum TickOutcome {
    Continue,
    Stopped,
}

pub struct Furnace {
    name: String,
    config: FurnaceConfig,
    state: Mutex<FurnaceState>,
    events: EventBus<Notification>,
    tasks: TaskSlot,
    random: SharedRandom,
}

impl Furnace {
    pub fn new(name: impl Into<String>, config: FurnaceConfig, random: SharedRandom) -> Arc<Self> {
        let name = name.into();
        Arc::new(Self {
            state: Mutex::new(FurnaceState::new(&config)),
            events: EventBus::new(name.as_str()),
            tasks: TaskSlot::new(name.as_str()),
            name,
            config,
            random,
        })
    }

    pub fn with_defaults(name: impl Into<String>) -> Arc<Self> {
        Self::new(name, FurnaceConfig::default(), ThreadRandom::shared())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subscribe(&self) -> Subscription<Notification> {
        self.events.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    pub fn iron_ore(&self) -> u32 {
        self.state.lock().iron_ore
    }

    pub fn coke(&self) -> u32 {
        self.state.lock().coke
    }

    pub fn limestone(&self) -> u32 {
        self.state.lock().limestone
    }

    pub fn temperature(&self) -> i32 {
        self.state.lock().temperature
    }

    pub fn stock(&self, kind: MaterialKind) -> u32 {
        self.state.lock().stock(kind)
    }

    pub fn snapshot(&self) -> FurnaceSnapshot {
        let state = self.state.lock();
        FurnaceSnapshot {
            name: self.name.clone(),
            iron_ore: state.iron_ore,
            coke: state.coke,
            limestone: state.limestone,
            temperature: state.temperature,
            running: state.running,
        }
    }

    /// Lights the furnace and launches its tick loop. A no-op if already running.
    pub fn start(self: &Arc<Self>) {
        let mut state = self.state.lock();
        if state.running {
            debug!(furnace = %self.name, "Already running");
            return;
        }
        state.running = true;
        self.events.publish(Notification::status("Furnace started"));

        let furnace = Arc::clone(self);
        let generation = self
            .tasks
            .launch(move |generation, token| furnace.run(generation, token));
        info!(furnace = %self.name, generation, "Started");
    }

    /// Cancels the tick loop. A no-op if not running.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        if !state.running {
            debug!(furnace = %self.name, "Not running");
            return;
        }
        self.tasks.cancel();
        state.running = false;
        self.events.publish(Notification::status("Furnace stopped"));
        info!(furnace = %self.name, "Stopped");
    }

    /// Adds a delivery to the stocks. Safe to call while the tick loop runs.
    pub fn add_materials(&self, iron_ore: u32, coke: u32, limestone: u32) {
        let mut state = self.state.lock();
        for notification in state.add(iron_ore, coke, limestone) {
            self.events.publish(notification);
        }
        self.events.publish(Notification::status(format!(
            "Materials added: iron ore={iron_ore}, coke={coke}, limestone={limestone}"
        )));
        info!(furnace = %self.name, iron_ore, coke, limestone, "Materials added");
    }

    async fn run(self: Arc<Self>, generation: u64, token: CancellationToken) {
        let mut ticker = Ticker::new(self.config.tick_period, token);
        loop {
            match self.tick(generation) {
                Ok(TickOutcome::Continue) => {}
                Ok(TickOutcome::Stopped) => break,
                Err(e) => {
                    warn!(furnace = %self.name, error = %e, "Tick failed");
                    self.events.publish(Notification::status(format!("Simulation error: {e}")));
                }
            }
            if !ticker.tick().await {
                break;
            }
        }
        debug!(furnace = %self.name, generation, ticks = ticker.ticks(), "Tick loop finished");
    }

    fn tick(&self, generation: u64) -> Result<TickOutcome, FurnaceError> {
        let mut state = self.state.lock();
        if !state.running || !self.tasks.is_current(generation) {
            return Ok(TickOutcome::Stopped);
        }

        let report = state.tick(&self.config, self.random.as_ref())?;
        for notification in report.notifications {
            self.events.publish(notification);
        }
        debug!(
            furnace = %self.name,
            iron_ore = state.iron_ore,
            coke = state.coke,
            limestone = state.limestone,
            temperature = state.temperature,
            "Tick"
        );

        if report.depleted {
            state.running = false;
            self.tasks.cancel();
            self.events.publish(Notification::status("Furnace stopped"));
            self.events.publish(Notification::Depleted);
            warn!(furnace = %self.name, "Materials depleted");
        }

        if state.temperature > self.config.overheat_threshold && self.random.chance(self.config.overheat_chance) {
            self.events.publish(Notification::Overheat);
            warn!(furnace = %self.name, temperature = state.temperature, "Overheating");
        }

        Ok(if report.depleted {
            TickOutcome::Stopped
        } else {
            TickOutcome::Continue
        })
    }
}

impl Display for Furnace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.snapshot();
        write!(
            f,
            "{}: iron ore={}, coke={}, limestone={}, temp={}°C",
            s.name, s.iron_ore, s.coke, s.limestone, s.temperature
        )
    }
}

impl fmt::Debug for Furnace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Furnace")
            .field("state", &*self.state.lock())
            .field("tasks", &self.tasks)
            .finish()
    }
}

#[async_trait]
impl SimActor for Furnace {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.is_running()
    }

    fn halt(&self) {
        self.stop();
    }

    async fn join(&self) -> Result<(), FrameworkError> {
        self.tasks.join().await
    }
}
