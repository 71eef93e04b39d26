//! # Worker Actor
//!
//! A plant worker who performs a routine check every cycle and, when tending a
//! loader, keeps it busy with fresh requests.
//!
//! The cycle is `max(2000, 5000 - 200 * experience)` ms: seasoned workers go round
//! faster. Alarms observed elsewhere in the plant reach the worker through
//! [`Worker::respond_to_event`], which only reports; it never changes whether the
//! worker is working.

pub mod activities;

pub use activities::ACTIVITIES;

use crate::config::WorkerConfig;
use crate::loader_actor::{LoaderError, MaterialLoader};
use crate::model::{LoadRequest, MaterialKind, Notification, PlantEvent, WorkerSnapshot};
use async_trait::async_trait;
use parking_lot::Mutex;
use sim_framework::random::pick;
use sim_framework::{
    CancellationToken, EventBus, FrameworkError, SharedRandom, SimActor, Subscription, TaskSlot,
    ThreadRandom, Ticker,
};
use std::fmt::{self, Display};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct Worker {
    name: String,
    experience: u32,
    config: WorkerConfig,
    working: Mutex<bool>,
    events: EventBus<Notification>,
    tasks: TaskSlot,
    random: SharedRandom,
}

impl Worker {
    pub fn new(
        name: impl Into<String>,
        experience: u32,
        config: WorkerConfig,
        random: SharedRandom,
    ) -> Arc<Self> {
        let name = name.into();
        Arc::new(Self {
            events: EventBus::new(name.as_str()),
            tasks: TaskSlot::new(name.as_str()),
            name,
            experience,
            config,
            working: Mutex::new(false),
            random,
        })
    }

    pub fn with_defaults(name: impl Into<String>, experience: u32) -> Arc<Self> {
        Self::new(name, experience, WorkerConfig::default(), ThreadRandom::shared())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn cycle_period(&self) -> Duration {
        self.config.cycle_period(self.experience)
    }

    pub fn subscribe(&self) -> Subscription<Notification> {
        self.events.subscribe()
    }

    pub fn is_working(&self) -> bool {
        *self.working.lock()
    }

    pub fn snapshot(&self) -> WorkerSnapshot {
        WorkerSnapshot {
            name: self.name.clone(),
            experience: self.experience,
            working: self.is_working(),
        }
    }

    /// Starts the work loop, optionally tending `loader`. A no-op if already working.
    pub fn start_work(self: &Arc<Self>, loader: Option<Arc<dyn MaterialLoader>>) {
        let mut working = self.working.lock();
        if *working {
            debug!(worker = %self.name, "Already working");
            return;
        }
        *working = true;
        self.events
            .publish(Notification::status(format!("{} started work", self.name)));

        let worker = Arc::clone(self);
        let tending = loader.as_ref().map(|l| l.name().to_string());
        let generation = self
            .tasks
            .launch(move |generation, token| worker.run(generation, token, loader));
        info!(worker = %self.name, generation, ?tending, period_ms = self.cycle_period().as_millis() as u64, "Work started");
    }

    /// Cancels the work loop. A no-op if not working.
    pub fn stop_work(&self) {
        let mut working = self.working.lock();
        if !*working {
            debug!(worker = %self.name, "Not working");
            return;
        }
        self.tasks.cancel();
        *working = false;
        self.events
            .publish(Notification::status(format!("{} finished work", self.name)));
        info!(worker = %self.name, "Work stopped");
    }

    /// Reacts to an alarm raised somewhere in the plant.
    pub fn respond_to_event(&self, event: impl Into<PlantEvent>) {
        let event = event.into();
        let response = match &event {
            PlantEvent::MaterialDepleted => format!(
                "{} responds to material depletion - starting emergency shutdown",
                self.name
            ),
            PlantEvent::Overheat => format!(
                "{} responds to overheating - activating cooling systems",
                self.name
            ),
            PlantEvent::Other(name) => format!("{} acknowledges event: {name}", self.name),
        };
        debug!(worker = %self.name, %event, "Responding");
        self.events.publish(Notification::status(response));
    }

    async fn run(
        self: Arc<Self>,
        generation: u64,
        token: CancellationToken,
        loader: Option<Arc<dyn MaterialLoader>>,
    ) {
        let mut ticker = Ticker::new(self.cycle_period(), token);
        loop {
            self.perform_cycle(loader.as_deref());
            if !ticker.tick().await {
                break;
            }
        }
        self.finish(generation, ticker.ticks());
    }

    fn perform_cycle(&self, loader: Option<&dyn MaterialLoader>) {
        let activity = pick(self.random.as_ref(), &ACTIVITIES).copied().unwrap_or(ACTIVITIES[0]);
        debug!(worker = %self.name, activity, "Cycle");
        self.events
            .publish(Notification::WorkPerformed(activity.to_string()));

        let Some(loader) = loader else {
            return;
        };
        if loader.is_loading() {
            return;
        }
        match self.dispatch(loader) {
            Ok(Some(request)) => self.events.publish(Notification::status(format!(
                "{} dispatched {} to load {request}",
                self.name,
                loader.name()
            ))),
            Ok(None) => debug!(worker = %self.name, loader = loader.name(), "Loader busy"),
            Err(e) => {
                warn!(worker = %self.name, loader = loader.name(), error = %e, "Dispatch failed");
                self.events
                    .publish(Notification::status(format!("Error during work: {e}")));
            }
        }
    }

    /// Asks an idle loader for a random batch. `None` if another worker got there first.
    fn dispatch(&self, loader: &dyn MaterialLoader) -> Result<Option<LoadRequest>, LoaderError> {
        let kind = pick(self.random.as_ref(), &MaterialKind::ALL)
            .copied()
            .unwrap_or(MaterialKind::IronOre);
        let drawn = self
            .random
            .range(u64::from(self.config.min_load), u64::from(self.config.max_load));
        let quantity = u32::try_from(drawn).unwrap_or(self.config.min_load);

        if !loader.try_dispatch(kind.into(), quantity)? {
            return Ok(None);
        }
        Ok(Some(LoadRequest {
            material: kind.into(),
            quantity,
        }))
    }

    fn finish(&self, generation: u64, cycles: u64) {
        {
            let mut working = self.working.lock();
            if *working && self.tasks.is_current(generation) {
                *working = false;
                self.events
                    .publish(Notification::status(format!("{} finished work", self.name)));
            }
        }
        self.events.publish(Notification::Completed);
        info!(worker = %self.name, generation, cycles, "Work completed");
    }
}

impl Display for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.is_working() { "working" } else { "idle" };
        write!(f, "{} (experience: {}) - {status}", self.name, self.experience)
    }
}

impl fmt::Debug for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker")
            .field("name", &self.name)
            .field("experience", &self.experience)
            .field("working", &self.is_working())
            .field("tasks", &self.tasks)
            .finish()
    }
}

#[async_trait]
impl SimActor for Worker {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.is_working()
    }

    fn halt(&self) {
        self.stop_work();
    }

    async fn join(&self) -> Result<(), FrameworkError> {
        self.tasks.join().await
    }
}
