//! # Loader Actor
//!
//! Carries one batch of material at a time towards the furnaces.
//!
//! ## Structure
//!
//! - [`capability`] - the [`MaterialLoader`] trait workers depend on
//! - [`error`] - [`LoaderError`]
//! - [`Loader`] - the actor
//!
//! ## Lifecycle
//!
//! 1. [`Loader::load_material`] records what to carry. Nothing moves yet.
//! 2. [`Loader::start_loading`] marks the loader busy and launches a one-shot run that
//!    waits a random 3–8 s and then raises [`Notification::Loaded`] with the request.
//! 3. [`Loader::stop_loading`] cancels the wait; a cancelled run reports
//!    `loading cancelled` and never raises `Loaded`.
//!
//! The busy flag is cleared by a drop guard inside the run, so it is reset on
//! completion, cancellation and panic alike.
//!
//! ```rust
//! use blast_furnace::loader_actor::Loader;
//! use blast_furnace::model::{MaterialKind, Notification};
//! use sim_framework::mock::expect_event;
//! use std::time::Duration;
//!
//! #[tokio::main(flavor = "current_thread", start_paused = true)]
//! async fn main() {
//!     let loader = Loader::with_defaults("Loader #1");
//!     let mut events = loader.subscribe();
//!
//!     loader.load_material(MaterialKind::Coke, 30).unwrap();
//!     loader.start_loading();
//!
//!     let loaded = expect_event(&mut events, Duration::from_secs(10), |n| {
//!         matches!(n, Notification::Loaded(_))
//!     })
//!     .await;
//!     assert!(loaded.is_some());
//! }
//! ```

pub mod capability;
pub mod error;

pub use capability::*;
pub use error::*;

use crate::config::LoaderConfig;
use crate::model::{LoadRequest, LoaderSnapshot, Material, Notification};
use async_trait::async_trait;
use parking_lot::Mutex;
use sim_framework::ticker::sleep_or_cancel;
use sim_framework::{
    CancellationToken, EventBus, FrameworkError, SharedRandom, SimActor, Subscription, TaskSlot,
    ThreadRandom,
};
use std::fmt::{self, Display};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct LoaderState {
    request: Option<LoadRequest>,
    busy: bool,
}

pub struct Loader {
    name: String,
    config: LoaderConfig,
    state: Mutex<LoaderState>,
    events: EventBus<Notification>,
    tasks: TaskSlot,
    random: SharedRandom,
    me: Weak<Loader>,
}

impl Loader {
    pub fn new(name: impl Into<String>, config: LoaderConfig, random: SharedRandom) -> Arc<Self> {
        let name = name.into();
        Arc::new_cyclic(|me| Self {
            state: Mutex::new(LoaderState::default()),
            events: EventBus::new(name.as_str()),
            tasks: TaskSlot::new(name.as_str()),
            name,
            config,
            random,
            me: me.clone(),
        })
    }

    pub fn with_defaults(name: impl Into<String>) -> Arc<Self> {
        Self::new(name, LoaderConfig::default(), ThreadRandom::shared())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subscribe(&self) -> Subscription<Notification> {
        self.events.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().busy
    }

    /// The recorded request, if any.
    pub fn current_request(&self) -> Option<LoadRequest> {
        self.state.lock().request.clone()
    }

    pub fn snapshot(&self) -> LoaderSnapshot {
        let state = self.state.lock();
        LoaderSnapshot {
            name: self.name.clone(),
            request: state.request.clone(),
            busy: state.busy,
        }
    }

    /// Records what the next load carries. Does not start loading.
    pub fn load_material(&self, material: impl Into<Material>, quantity: u32) -> Result<(), LoaderError> {
        let request = validate(material.into(), quantity)?;
        let mut state = self.state.lock();
        self.record(&mut state, request);
        Ok(())
    }

    /// Launches the timed load. A no-op if already busy.
    pub fn start_loading(&self) {
        let Some(loader) = self.me.upgrade() else {
            return;
        };
        let mut state = self.state.lock();
        if state.busy {
            debug!(loader = %self.name, "Already loading");
            return;
        }
        self.launch(&mut state, loader);
    }

    /// Records `material` and starts loading it in one step, unless the loader is
    /// already busy. Returns whether the load was started.
    pub fn dispatch(&self, material: impl Into<Material>, quantity: u32) -> Result<bool, LoaderError> {
        let request = validate(material.into(), quantity)?;
        let Some(loader) = self.me.upgrade() else {
            return Ok(false);
        };
        let mut state = self.state.lock();
        if state.busy {
            debug!(loader = %self.name, %request, "Busy, dispatch refused");
            return Ok(false);
        }
        self.record(&mut state, request);
        self.launch(&mut state, loader);
        Ok(true)
    }

    fn record(&self, state: &mut LoaderState, request: LoadRequest) {
        debug!(loader = %self.name, %request, "Request recorded");
        self.events
            .publish(Notification::status(format!("{} is ready to load {request}", self.name)));
        state.request = Some(request);
    }

    fn launch(&self, state: &mut LoaderState, loader: Arc<Loader>) {
        state.busy = true;
        self.events
            .publish(Notification::status(format!("{} started loading", self.name)));

        let generation = self
            .tasks
            .launch(move |generation, token| loader.run(generation, token));
        info!(loader = %self.name, generation, "Loading started");
    }

    /// Cancels the in-flight load. A no-op if idle.
    pub fn stop_loading(&self) {
        let mut state = self.state.lock();
        if !state.busy {
            debug!(loader = %self.name, "Not loading");
            return;
        }
        self.tasks.cancel();
        state.busy = false;
        self.events
            .publish(Notification::status(format!("{} stopped loading", self.name)));
        info!(loader = %self.name, "Loading stopped");
    }

    async fn run(self: Arc<Self>, generation: u64, token: CancellationToken) {
        let _busy = BusyGuard {
            loader: &self,
            generation,
        };

        let status = match self.current_request() {
            Some(request) => format!("{} is loading {request}", self.name),
            None => format!("{} is loading with no material requested", self.name),
        };
        self.events.publish(Notification::status(status));

        let wait = Duration::from_millis(
            self.random
                .range(self.config.min_duration_ms, self.config.max_duration_ms),
        );
        match sleep_or_cancel(wait, &token).await {
            Ok(()) => {
                let request = self.current_request();
                self.events.publish(Notification::Loaded(request.clone()));
                let status = match &request {
                    Some(request) => format!("{} finished loading {request}", self.name),
                    None => format!("{} finished loading", self.name),
                };
                self.events.publish(Notification::status(status));
                info!(loader = %self.name, ?request, waited_ms = wait.as_millis() as u64, "Loaded");
            }
            Err(_) => {
                self.events
                    .publish(Notification::status(format!("{} loading cancelled", self.name)));
                info!(loader = %self.name, "Loading cancelled");
            }
        }
    }
}

fn validate(material: Material, quantity: u32) -> Result<LoadRequest, LoaderError> {
    if quantity == 0 {
        return Err(LoaderError::InvalidQuantity(quantity));
    }
    Ok(LoadRequest { material, quantity })
}

/// Clears the busy flag when a run ends, however it ends.
struct BusyGuard<'a> {
    loader: &'a Loader,
    generation: u64,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let loader = self.loader;
        let mut state = loader.state.lock();
        if state.busy && loader.tasks.is_current(self.generation) {
            state.busy = false;
            loader
                .events
                .publish(Notification::status(format!("{} stopped loading", loader.name)));
        }
    }
}

impl MaterialLoader for Loader {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_loading(&self) -> bool {
        Loader::is_loading(self)
    }

    fn request_load(&self, material: Material, quantity: u32) -> Result<(), LoaderError> {
        self.load_material(material, quantity)
    }

    fn start_loading(&self) {
        Loader::start_loading(self)
    }

    fn try_dispatch(&self, material: Material, quantity: u32) -> Result<bool, LoaderError> {
        self.dispatch(material, quantity)
    }

    fn stop_loading(&self) {
        Loader::stop_loading(self)
    }

    fn subscribe(&self) -> Subscription<Notification> {
        Loader::subscribe(self)
    }
}

#[async_trait]
impl SimActor for Loader {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        Loader::is_loading(self)
    }

    fn halt(&self) {
        Loader::stop_loading(self);
    }

    async fn join(&self) -> Result<(), FrameworkError> {
        self.tasks.join().await
    }
}

impl Display for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        match (&state.request, state.busy) {
            (Some(request), true) => write!(f, "{} - loading {}", self.name, request.material),
            (None, true) => write!(f, "{} - loading", self.name),
            (_, false) => write!(f, "{} - idle", self.name),
        }
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("name", &self.name)
            .field("state", &*self.state.lock())
            .field("tasks", &self.tasks)
            .finish()
    }
}
