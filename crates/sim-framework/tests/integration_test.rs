use async_trait::async_trait;
use parking_lot::Mutex;
use sim_framework::mock::{drain, expect_event, ScriptedRandom};
use sim_framework::{
    CancellationToken, EventBus, FrameworkError, RandomSource, SharedRandom, SimActor,
    Subscription, TaskSlot, Ticker,
};
use std::sync::Arc;
use std::time::Duration;

// --- Test Actor ---

#[derive(Debug, Clone, PartialEq)]
enum PumpEvent {
    Started,
    Pumped(u64),
    Finished,
}

/// Minimal periodic actor built the same way the plant actors are.
struct Pump {
    running: Mutex<bool>,
    events: EventBus<PumpEvent>,
    tasks: TaskSlot,
    random: SharedRandom,
}

impl Pump {
    fn new(random: SharedRandom) -> Arc<Self> {
        Arc::new(Self {
            running: Mutex::new(false),
            events: EventBus::new("pump"),
            tasks: TaskSlot::new("pump"),
            random,
        })
    }

    fn subscribe(&self) -> Subscription<PumpEvent> {
        self.events.subscribe()
    }

    fn start(self: &Arc<Self>) {
        let mut running = self.running.lock();
        if *running {
            return;
        }
        *running = true;
        self.events.publish(PumpEvent::Started);
        let pump = Arc::clone(self);
        self.tasks
            .launch(move |generation, token| pump.run(generation, token));
    }

    async fn run(self: Arc<Self>, generation: u64, token: CancellationToken) {
        let mut ticker = Ticker::new(Duration::from_millis(100), token);
        loop {
            let volume = self.random.range(1, 10);
            self.events.publish(PumpEvent::Pumped(volume));
            if !ticker.tick().await {
                break;
            }
        }
        let mut running = self.running.lock();
        if self.tasks.is_current(generation) {
            *running = false;
        }
        self.events.publish(PumpEvent::Finished);
    }
}

#[async_trait]
impl SimActor for Pump {
    fn name(&self) -> &str {
        "pump"
    }

    fn is_active(&self) -> bool {
        *self.running.lock()
    }

    fn halt(&self) {
        let mut running = self.running.lock();
        if *running {
            self.tasks.cancel();
            *running = false;
        }
    }

    async fn join(&self) -> Result<(), FrameworkError> {
        self.tasks.join().await
    }
}

// --- Tests ---

#[tokio::test(start_paused = true)]
async fn test_periodic_actor_lifecycle() {
    let pump = Pump::new(ScriptedRandom::new([3, 5, 7]).shared());
    let mut events = pump.subscribe();

    pump.start();
    pump.start();
    tokio::time::sleep(Duration::from_millis(250)).await;
    pump.shutdown().await.unwrap();

    assert_eq!(
        drain(&mut events),
        vec![
            PumpEvent::Started,
            PumpEvent::Pumped(3),
            PumpEvent::Pumped(5),
            PumpEvent::Pumped(7),
            PumpEvent::Finished,
        ]
    );
    assert!(!pump.is_active());
    assert_eq!(pump.tasks.live_tasks(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_restart_is_not_clobbered_by_stale_run() {
    let pump = Pump::new(ScriptedRandom::default().shared());
    let mut events = pump.subscribe();

    pump.start();
    pump.halt();
    pump.start();

    // The first run finishes after the second one started; it must leave the flag alone.
    let finished = expect_event(&mut events, Duration::from_secs(1), |e| {
        *e == PumpEvent::Finished
    })
    .await;
    assert!(finished.is_some());
    assert!(pump.is_active());

    pump.shutdown().await.unwrap();
    assert!(!pump.is_active());
}

#[test]
fn test_dropped_subscribers_are_pruned() {
    let bus = EventBus::new("probe");
    let kept = bus.subscribe();
    drop(bus.subscribe());

    bus.publish(1u8);
    assert_eq!(bus.listener_count(), 1);

    let mut kept = kept;
    assert_eq!(kept.try_recv(), Some(1));
}

#[test]
fn test_scripted_random_drives_chance() {
    let random = ScriptedRandom::default().with_units([0.01, 0.5]);
    assert!(random.chance(0.05));
    assert!(!random.chance(0.05));
    assert!(!random.chance(1.0 - f64::EPSILON));
}
