//! Notifications raised by plant actors.

use super::material::LoadRequest;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Every state change an actor announces on its event bus.
///
/// Furnaces raise `StatusChanged`, `Depleted`, `Overheat` and `TemperatureChanged`;
/// loaders raise `StatusChanged` and `Loaded`; workers raise `StatusChanged`,
/// `WorkPerformed` and `Completed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    StatusChanged(String),
    Depleted,
    Overheat,
    TemperatureChanged(i32),
    /// The request as it stood when loading finished. `None` if the loader was
    /// started without a request.
    Loaded(Option<LoadRequest>),
    WorkPerformed(String),
    Completed,
}

impl Notification {
    pub fn status(text: impl Into<String>) -> Self {
        Notification::StatusChanged(text.into())
    }

    pub fn status_text(&self) -> Option<&str> {
        match self {
            Notification::StatusChanged(text) => Some(text),
            _ => None,
        }
    }
}

/// Alarm or other plant event a worker is asked to react to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlantEvent {
    MaterialDepleted,
    Overheat,
    Other(String),
}

impl From<&str> for PlantEvent {
    fn from(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "materialdepleted" => PlantEvent::MaterialDepleted,
            "overheat" => PlantEvent::Overheat,
            _ => PlantEvent::Other(name.to_string()),
        }
    }
}

impl FromStr for PlantEvent {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PlantEvent::from(s))
    }
}

impl Display for PlantEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlantEvent::MaterialDepleted => f.write_str("MaterialDepleted"),
            PlantEvent::Overheat => f.write_str("Overheat"),
            PlantEvent::Other(name) => f.write_str(name),
        }
    }
}
