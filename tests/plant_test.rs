use blast_furnace::config::{FurnaceConfig, LoaderConfig, SimConfig, WorkerConfig};
use blast_furnace::furnace_actor::Furnace;
use blast_furnace::lifecycle::Coordinator;
use blast_furnace::loader_actor::{Loader, MaterialLoader};
use blast_furnace::model::{MaterialKind, Notification};
use blast_furnace::worker_actor::Worker;
use sim_framework::mock::{expect_event, ScriptedRandom};
use sim_framework::{SimActor, ThreadRandom};
use std::sync::Arc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(30);

fn status(text: &str) -> impl FnMut(&Notification) -> bool + '_ {
    move |n| n.status_text() == Some(text)
}

#[tokio::test(start_paused = true)]
async fn test_completed_load_goes_to_lowest_stock_furnace() {
    let plant = Coordinator::new(SimConfig::default(), ThreadRandom::shared());
    let first = Furnace::with_defaults("Furnace #1");
    let second = Furnace::with_defaults("Furnace #2");
    plant.add_furnace(first.clone());
    plant.add_furnace(second.clone());
    first.add_materials(0, 50, 0);

    let loader = Loader::new(
        "Loader #1",
        LoaderConfig::default(),
        ScriptedRandom::new([3000]).shared(),
    );
    plant.add_loader(loader.clone());
    let mut second_events = second.subscribe();

    loader.load_material("Кокс", 30).unwrap();
    loader.start_loading();

    let delivered = expect_event(
        &mut second_events,
        WAIT,
        status("Materials added: iron ore=0, coke=30, limestone=0"),
    )
    .await;
    assert!(delivered.is_some());

    assert_eq!(second.coke(), 130);
    assert_eq!(second.iron_ore(), 100);
    assert_eq!(second.limestone(), 50);
    assert_eq!(first.coke(), 150);

    let log = plant.shutdown().await.unwrap();
    let lines: Vec<_> = log.iter().map(|e| e.message.as_str()).collect();
    assert!(lines.contains(&"[Loader #1] Materials loaded successfully"));
    assert!(lines.contains(&"[Loader #1] Delivered to Furnace #2"));
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_leaves_nothing_running() {
    let plant = Coordinator::bootstrap(SimConfig::default());
    plant.commission_furnace().await.unwrap();
    plant.hire_worker().await.unwrap();
    plant.commission_loader().await.unwrap();
    tokio::time::sleep(Duration::from_secs(12)).await;

    let furnaces = plant.furnaces();
    let workers = plant.workers();
    let loaders = plant.loaders();
    assert!(furnaces.iter().all(|f| f.is_running()));
    assert!(workers.iter().all(|w| w.is_working()));

    let log = plant.shutdown().await.unwrap();

    assert!(furnaces.iter().all(|f| !f.is_running()));
    assert!(workers.iter().all(|w| !w.is_working()));
    assert!(loaders.iter().all(|l| !l.is_loading()));
    for actor in furnaces.iter().map(|f| f.as_ref() as &dyn SimActor) {
        assert!(!actor.is_active());
    }

    let lines: Vec<_> = log.iter().map(|e| e.message.as_str()).collect();
    assert!(lines.contains(&"[Furnace #1] Furnace started"));
    assert!(lines.contains(&"New furnace added: Furnace #2"));
    assert!(lines.contains(&"New worker added: Worker #2"));
    assert!(lines.contains(&"New loader added: Loader #2"));
    assert!(lines.contains(&"[Ivan Ivanov] Work completed"));
    assert!(lines.iter().any(|l| l.starts_with("[Ivan Ivanov] Performing: ")));
}

#[tokio::test(start_paused = true)]
async fn test_depletion_is_broadcast_to_every_worker() {
    let config = SimConfig {
        furnace: FurnaceConfig {
            initial_iron_ore: 1,
            initial_coke: 1,
            initial_limestone: 1,
            ..FurnaceConfig::default()
        },
        ..SimConfig::default()
    };
    let plant = Coordinator::new(config.clone(), ThreadRandom::shared());
    let furnace = Furnace::new("Furnace #1", config.furnace.clone(), ThreadRandom::shared());
    let ivan = Worker::with_defaults("Ivan Ivanov", 5);
    let petr = Worker::with_defaults("Petr Petrov", 2);
    plant.add_furnace(furnace.clone());
    plant.add_worker(ivan.clone());
    plant.add_worker(petr.clone());
    let mut ivan_events = ivan.subscribe();
    let mut petr_events = petr.subscribe();

    furnace.start();

    let ivan_heard = expect_event(
        &mut ivan_events,
        WAIT,
        status("Ivan Ivanov responds to material depletion - starting emergency shutdown"),
    )
    .await;
    let petr_heard = expect_event(
        &mut petr_events,
        WAIT,
        status("Petr Petrov responds to material depletion - starting emergency shutdown"),
    )
    .await;
    assert!(ivan_heard.is_some());
    assert!(petr_heard.is_some());
    assert!(!ivan.is_working());
    assert!(!furnace.is_running());

    let log = plant.shutdown().await.unwrap();
    assert!(log
        .iter()
        .any(|e| e.message == "Warning: Furnace #1 has run out of materials!"));
}

#[tokio::test(start_paused = true)]
async fn test_overheat_is_broadcast() {
    let config = FurnaceConfig {
        overheat_threshold: 20,
        overheat_chance: 1.0,
        ..FurnaceConfig::default()
    };
    let plant = Coordinator::new(SimConfig::default(), ThreadRandom::shared());
    let furnace = Furnace::new("Furnace #1", config, ThreadRandom::shared());
    let worker = Worker::with_defaults("Ivan Ivanov", 5);
    plant.add_furnace(furnace.clone());
    plant.add_worker(worker.clone());
    let mut events = worker.subscribe();

    furnace.start();

    let heard = expect_event(
        &mut events,
        WAIT,
        status("Ivan Ivanov responds to overheating - activating cooling systems"),
    )
    .await;
    assert!(heard.is_some());

    let log = plant.shutdown().await.unwrap();
    assert!(log
        .iter()
        .any(|e| e.message == "Warning: Furnace #1 is overheating!"));
}

#[tokio::test(start_paused = true)]
async fn test_worker_keeps_loader_and_furnace_supplied() {
    let random = ScriptedRandom::new([
        0,    // activity
        2,    // limestone
        25,   // quantity
        4000, // loader wait
    ])
    .shared();
    let plant = Coordinator::new(SimConfig::default(), random.clone());
    let furnace = Furnace::new("Furnace #1", FurnaceConfig::default(), random.clone());
    let loader = Loader::new("Loader #1", LoaderConfig::default(), random.clone());
    let worker = Worker::new("Ivan Ivanov", 5, WorkerConfig::default(), random);
    plant.add_furnace(furnace.clone());
    plant.add_loader(loader.clone());
    plant.add_worker(worker.clone());
    let mut furnace_events = furnace.subscribe();

    worker.start_work(Some(loader.clone() as Arc<dyn MaterialLoader>));

    let delivered = expect_event(
        &mut furnace_events,
        WAIT,
        status("Materials added: iron ore=0, coke=0, limestone=25"),
    )
    .await;
    assert!(delivered.is_some());
    assert_eq!(furnace.stock(MaterialKind::Limestone), 75);

    plant.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_serializes() {
    let plant = Coordinator::bootstrap(SimConfig::default());
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let snapshot = plant.snapshot();
    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["furnaces"][0]["name"], "Furnace #1");
    assert_eq!(json["furnaces"][0]["running"], true);
    assert_eq!(json["workers"][0]["name"], "Ivan Ivanov");
    assert_eq!(json["workers"][0]["experience"], 5);
    assert_eq!(json["loaders"][0]["name"], "Loader #1");

    plant.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_entries_are_readable_while_running() {
    let plant = Coordinator::bootstrap(SimConfig::default());
    plant.log_message("Shift started").await.unwrap();

    let entries = plant.entries().await.unwrap();
    assert!(entries.iter().any(|e| e.message == "Shift started"));
    assert!(entries
        .iter()
        .all(|e| e.to_string().ends_with(&format!("] {}", e.message))));

    plant.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_delivery_queued_at_shutdown_is_logged() {
    let plant = Coordinator::new(SimConfig::default(), ThreadRandom::shared());
    let furnace = Furnace::with_defaults("Furnace #1");
    let loader = Loader::new(
        "Loader #1",
        LoaderConfig::default(),
        ScriptedRandom::new([3000]).shared(),
    );
    plant.add_furnace(furnace.clone());
    plant.add_loader(loader.clone());

    loader.load_material(MaterialKind::Coke, 30).unwrap();
    loader.start_loading();
    loader.join().await.unwrap();
    let log = plant.shutdown().await.unwrap();

    assert_eq!(furnace.coke(), 130);
    let lines: Vec<_> = log.iter().map(|e| e.message.as_str()).collect();
    assert!(lines.contains(&"[Loader #1] Materials loaded successfully"));
    assert!(lines.contains(&"[Furnace #1] Materials added: iron ore=0, coke=30, limestone=0"));
}

#[tokio::test(start_paused = true)]
async fn test_alarm_responses_queued_at_shutdown_are_logged() {
    let config = FurnaceConfig {
        initial_iron_ore: 1,
        initial_coke: 1,
        initial_limestone: 1,
        ..FurnaceConfig::default()
    };
    let plant = Coordinator::new(SimConfig::default(), ThreadRandom::shared());
    let furnace = Furnace::new("Furnace #1", config, ThreadRandom::shared());
    let worker = Worker::with_defaults("Ivan Ivanov", 5);
    plant.add_furnace(furnace.clone());
    plant.add_worker(worker.clone());

    furnace.start();
    // Depletes on the first tick and stops itself.
    furnace.join().await.unwrap();
    let log = plant.shutdown().await.unwrap();

    let lines: Vec<_> = log.iter().map(|e| e.message.as_str()).collect();
    assert!(lines.contains(&"Warning: Furnace #1 has run out of materials!"));
    assert!(lines.contains(
        &"[Ivan Ivanov] Ivan Ivanov responds to material depletion - starting emergency shutdown"
    ));
}
