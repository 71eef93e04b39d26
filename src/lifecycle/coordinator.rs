//! # Plant Coordinator
//!
//! Owns the live registry of furnaces, loaders and workers, listens to every one
//! of them, and applies the plant-wide policy:
//!
//! - furnace alarms are broadcast to every registered worker,
//! - a completed load is routed to the furnace that needs it most
//!   (see [`routing`](super::routing)),
//! - every notification lands in the event log.
//!
//! Each registered actor gets one listener task. Listeners never mutate actor
//! fields directly; they only call the actors' own operations.
//!
//! ```rust
//! use blast_furnace::config::SimConfig;
//! use blast_furnace::lifecycle::Coordinator;
//!
//! #[tokio::main(flavor = "current_thread", start_paused = true)]
//! async fn main() {
//!     let plant = Coordinator::bootstrap(SimConfig::default());
//!     tokio::time::sleep(std::time::Duration::from_secs(3)).await;
//!
//!     let snapshot = plant.snapshot();
//!     assert_eq!(snapshot.furnaces[0].name, "Furnace #1");
//!
//!     let log = plant.shutdown().await.unwrap();
//!     assert!(!log.is_empty());
//! }
//! ```

use super::error::CoordinatorError;
use super::event_log::{EventLog, EventLogClient, LogEntry};
use super::routing::{plan_delivery, select_furnace, Amounts};
use crate::config::SimConfig;
use crate::furnace_actor::Furnace;
use crate::loader_actor::{Loader, MaterialLoader};
use crate::model::{Notification, PlantEvent, PlantSnapshot};
use crate::worker_actor::Worker;
use parking_lot::{Mutex, RwLock};
use sim_framework::{
    CancellationToken, SharedRandom, SimActor, Subscription, ThreadRandom,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const LOG_BUFFER: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Furnace,
    Worker,
    Loader,
}

impl Source {
    /// Listener stop order. Draining a loader can publish on a furnace (delivery),
    /// and draining a furnace can publish on workers (alarm responses), so each
    /// group stops only after the groups that feed it.
    const SHUTDOWN_ORDER: [Source; 3] = [Source::Loader, Source::Furnace, Source::Worker];
}

struct Listener {
    source: Source,
    actor: String,
    handle: JoinHandle<()>,
}

/// One stop signal per actor kind.
#[derive(Default)]
struct ListenerTokens {
    furnaces: CancellationToken,
    workers: CancellationToken,
    loaders: CancellationToken,
}

impl ListenerTokens {
    fn get(&self, source: Source) -> &CancellationToken {
        match source {
            Source::Furnace => &self.furnaces,
            Source::Worker => &self.workers,
            Source::Loader => &self.loaders,
        }
    }
}

#[derive(Default)]
struct Registry {
    furnaces: RwLock<Vec<Arc<Furnace>>>,
    workers: RwLock<Vec<Arc<Worker>>>,
    loaders: RwLock<Vec<Arc<Loader>>>,
}

/// The reactive half of the coordinator, shared with every listener task.
struct Policy {
    registry: Registry,
    log: EventLogClient,
    config: SimConfig,
}

impl Policy {
    async fn handle(&self, source: Source, actor: &str, notification: Notification) {
        match source {
            Source::Furnace => self.on_furnace(actor, notification).await,
            Source::Worker => self.on_worker(actor, notification).await,
            Source::Loader => self.on_loader(actor, notification).await,
        }
    }

    async fn on_furnace(&self, furnace: &str, notification: Notification) {
        match notification {
            Notification::Depleted => {
                self.log(format!("Warning: {furnace} has run out of materials!")).await;
                self.broadcast(PlantEvent::MaterialDepleted);
            }
            Notification::Overheat => {
                self.log(format!("Warning: {furnace} is overheating!")).await;
                self.broadcast(PlantEvent::Overheat);
            }
            Notification::TemperatureChanged(t) => {
                self.log(format!("[{furnace}] Temperature changed to {t}°C")).await;
            }
            other => self.log_generic(furnace, other).await,
        }
    }

    async fn on_worker(&self, worker: &str, notification: Notification) {
        match notification {
            Notification::WorkPerformed(activity) => {
                self.log(format!("[{worker}] Performing: {activity}")).await;
            }
            Notification::Completed => {
                self.log(format!("[{worker}] Work completed")).await;
            }
            other => self.log_generic(worker, other).await,
        }
    }

    async fn on_loader(&self, loader: &str, notification: Notification) {
        match notification {
            Notification::Loaded(request) => {
                self.log(format!("[{loader}] Materials loaded successfully")).await;
                if let Some(target) = self.deliver(request.as_ref()) {
                    self.log(format!("[{loader}] Delivered to {target}")).await;
                }
            }
            other => self.log_generic(loader, other).await,
        }
    }

    async fn log_generic(&self, actor: &str, notification: Notification) {
        let line = match notification {
            Notification::StatusChanged(text) => format!("[{actor}] {text}"),
            other => format!("[{actor}] {other:?}"),
        };
        self.log(line).await;
    }

    /// Applies a completed load to the furnace selected by the routing policy.
    /// Returns the target furnace's name.
    fn deliver(&self, request: Option<&crate::model::LoadRequest>) -> Option<String> {
        let furnaces = self.registry.furnaces.read().clone();
        let stocks: Vec<Amounts> = furnaces
            .iter()
            .map(|f| Amounts::new(f.iron_ore(), f.coke(), f.limestone()))
            .collect();
        let Some(index) = select_furnace(&stocks, request) else {
            warn!(?request, "No furnace to deliver to");
            return None;
        };
        let target = &furnaces[index];
        let amounts = plan_delivery(request, &self.config.routing);
        info!(furnace = target.name(), ?amounts, "Routing delivery");
        target.add_materials(amounts.iron_ore, amounts.coke, amounts.limestone);
        Some(target.name().to_string())
    }

    fn broadcast(&self, event: PlantEvent) {
        let workers = self.registry.workers.read().clone();
        debug!(%event, workers = workers.len(), "Broadcasting");
        for worker in workers {
            worker.respond_to_event(event.clone());
        }
    }

    async fn log(&self, message: String) {
        if let Err(e) = self.log.append(message).await {
            warn!(error = %e, "Dropped log line");
        }
    }
}

/// Orchestrates one simulated plant.
///
/// Must be created from within a Tokio runtime: construction spawns the event
/// log actor and registration spawns listener tasks.
pub struct Coordinator {
    policy: Arc<Policy>,
    random: SharedRandom,
    log_handle: JoinHandle<Vec<LogEntry>>,
    listeners: Mutex<Vec<Listener>>,
    stop_listening: ListenerTokens,
}

impl Coordinator {
    pub fn new(config: SimConfig, random: SharedRandom) -> Self {
        let (log, client) = EventLog::new(LOG_BUFFER);
        let log_handle = tokio::spawn(log.run());
        Self {
            policy: Arc::new(Policy {
                registry: Registry::default(),
                log: client,
                config,
            }),
            random,
            log_handle,
            listeners: Mutex::new(Vec::new()),
            stop_listening: ListenerTokens::default(),
        }
    }

    /// The initial plant: one running furnace and one worker tending one loader.
    pub fn bootstrap(config: SimConfig) -> Self {
        let plant = Self::new(config, ThreadRandom::shared());
        let furnace = plant.build_furnace("Furnace #1".to_string());
        let loader = plant.build_loader("Loader #1".to_string());
        let worker = plant.build_worker("Ivan Ivanov".to_string(), 5);

        plant.add_furnace(Arc::clone(&furnace));
        plant.add_loader(Arc::clone(&loader));
        plant.add_worker(Arc::clone(&worker));

        furnace.start();
        worker.start_work(Some(loader as Arc<dyn MaterialLoader>));
        info!("Plant bootstrapped");
        plant
    }

    pub fn config(&self) -> &SimConfig {
        &self.policy.config
    }

    pub fn furnaces(&self) -> Vec<Arc<Furnace>> {
        self.policy.registry.furnaces.read().clone()
    }

    pub fn workers(&self) -> Vec<Arc<Worker>> {
        self.policy.registry.workers.read().clone()
    }

    pub fn loaders(&self) -> Vec<Arc<Loader>> {
        self.policy.registry.loaders.read().clone()
    }

    pub fn add_furnace(&self, furnace: Arc<Furnace>) {
        self.listen(Source::Furnace, furnace.name(), furnace.subscribe());
        self.policy.registry.furnaces.write().push(furnace);
    }

    pub fn add_worker(&self, worker: Arc<Worker>) {
        self.listen(Source::Worker, worker.name(), worker.subscribe());
        self.policy.registry.workers.write().push(worker);
    }

    pub fn add_loader(&self, loader: Arc<Loader>) {
        self.listen(Source::Loader, loader.name(), loader.subscribe());
        self.policy.registry.loaders.write().push(loader);
    }

    /// Registers and starts a new `Furnace #n`.
    pub async fn commission_furnace(&self) -> Result<Arc<Furnace>, CoordinatorError> {
        let n = self.policy.registry.furnaces.read().len() + 1;
        let furnace = self.build_furnace(format!("Furnace #{n}"));
        self.add_furnace(Arc::clone(&furnace));
        furnace.start();
        self.log_message(format!("New furnace added: {}", furnace.name()))
            .await?;
        Ok(furnace)
    }

    /// Registers and starts a new `Worker #n` with a random experience in [1, 10).
    /// The worker tends no loader.
    pub async fn hire_worker(&self) -> Result<Arc<Worker>, CoordinatorError> {
        let n = self.policy.registry.workers.read().len() + 1;
        let experience = u32::try_from(self.random.range(1, 10)).unwrap_or(1);
        let worker = self.build_worker(format!("Worker #{n}"), experience);
        self.add_worker(Arc::clone(&worker));
        worker.start_work(None);
        self.log_message(format!("New worker added: {}", worker.name()))
            .await?;
        Ok(worker)
    }

    /// Registers a new idle `Loader #n`.
    pub async fn commission_loader(&self) -> Result<Arc<Loader>, CoordinatorError> {
        let n = self.policy.registry.loaders.read().len() + 1;
        let loader = self.build_loader(format!("Loader #{n}"));
        self.add_loader(Arc::clone(&loader));
        self.log_message(format!("New loader added: {}", loader.name()))
            .await?;
        Ok(loader)
    }

    pub async fn log_message(&self, message: impl Into<String>) -> Result<(), CoordinatorError> {
        Ok(self.policy.log.append(message).await?)
    }

    /// Everything logged so far.
    pub async fn entries(&self) -> Result<Vec<LogEntry>, CoordinatorError> {
        Ok(self.policy.log.entries().await?)
    }

    pub fn snapshot(&self) -> PlantSnapshot {
        let registry = &self.policy.registry;
        PlantSnapshot {
            furnaces: registry.furnaces.read().iter().map(|f| f.snapshot()).collect(),
            loaders: registry.loaders.read().iter().map(|l| l.snapshot()).collect(),
            workers: registry.workers.read().iter().map(|w| w.snapshot()).collect(),
        }
    }

    /// Stops the whole plant and returns the final log.
    ///
    /// Workers are halted first so they cannot re-arm loaders, then loaders so no
    /// delivery arrives late, then furnaces. Every actor task is joined before the
    /// listeners drain what is left in their queues and exit, loaders' first, then
    /// furnaces', then workers'. The log closes last.
    /// All actors are joined even if one fails; the first failure is returned.
    pub async fn shutdown(self) -> Result<Vec<LogEntry>, CoordinatorError> {
        info!("Shutting down plant...");
        let mut outcome: Result<(), CoordinatorError> = Ok(());
        let mut record = |result: Result<(), CoordinatorError>| {
            if let Err(e) = result {
                warn!(error = %e, "Shutdown step failed");
                if outcome.is_ok() {
                    outcome = Err(e);
                }
            }
        };

        let registry = &self.policy.registry;
        let workers = registry.workers.read().clone();
        let loaders = registry.loaders.read().clone();
        let furnaces = registry.furnaces.read().clone();
        for worker in &workers {
            record(stop_actor(worker.as_ref()).await);
        }
        for loader in &loaders {
            record(stop_actor(loader.as_ref()).await);
        }
        for furnace in &furnaces {
            record(stop_actor(furnace.as_ref()).await);
        }

        let mut listeners = std::mem::take(&mut *self.listeners.lock());
        for source in Source::SHUTDOWN_ORDER {
            self.stop_listening.get(source).cancel();
            let (group, rest): (Vec<_>, Vec<_>) =
                listeners.into_iter().partition(|l| l.source == source);
            listeners = rest;
            for listener in group {
                if let Err(e) = listener.handle.await {
                    record(Err(CoordinatorError::Listener {
                        actor: listener.actor,
                        reason: e.to_string(),
                    }));
                }
            }
        }

        // Last client gone: the log actor exits and hands back its entries.
        drop(self.policy);
        let entries = self
            .log_handle
            .await
            .map_err(|e| CoordinatorError::LogTask(e.to_string()));

        outcome?;
        let entries = entries?;
        info!(entries = entries.len(), "Plant shutdown complete.");
        Ok(entries)
    }

    fn build_furnace(&self, name: String) -> Arc<Furnace> {
        Furnace::new(name, self.policy.config.furnace.clone(), Arc::clone(&self.random))
    }

    fn build_loader(&self, name: String) -> Arc<Loader> {
        Loader::new(name, self.policy.config.loader.clone(), Arc::clone(&self.random))
    }

    fn build_worker(&self, name: String, experience: u32) -> Arc<Worker> {
        Worker::new(
            name,
            experience,
            self.policy.config.worker.clone(),
            Arc::clone(&self.random),
        )
    }

    fn listen(&self, source: Source, actor: &str, mut events: Subscription<Notification>) {
        let policy = Arc::clone(&self.policy);
        let token = self.stop_listening.get(source).clone();
        let name = actor.to_string();
        let task_name = name.clone();
        let handle = tokio::spawn(async move {
            debug!(actor = %name, ?source, "Listener started");
            loop {
                tokio::select! {
                    biased;
                    received = events.recv() => match received {
                        Some(notification) => policy.handle(source, &name, notification).await,
                        None => break,
                    },
                    _ = token.cancelled() => {
                        while let Some(notification) = events.try_recv() {
                            policy.handle(source, &name, notification).await;
                        }
                        break;
                    }
                }
            }
            debug!(actor = %name, "Listener stopped");
        });
        self.listeners.lock().push(Listener {
            source,
            actor: task_name,
            handle,
        });
    }
}

async fn stop_actor(actor: &dyn SimActor) -> Result<(), CoordinatorError> {
    actor
        .shutdown()
        .await
        .map_err(|source| CoordinatorError::Actor {
            actor: actor.name().to_string(),
            source,
        })
}
