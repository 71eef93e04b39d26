//! Compiled-in simulation constants.
//!
//! Nothing here is read from files or the environment; [`SimConfig::default`] holds
//! the plant's reference values and tests build faster variants by hand.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub furnace: FurnaceConfig,
    pub loader: LoaderConfig,
    pub worker: WorkerConfig,
    pub routing: RoutingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnaceConfig {
    pub tick_period: Duration,
    pub initial_iron_ore: u32,
    pub initial_coke: u32,
    pub initial_limestone: u32,
    /// Floor for the temperature and its starting value, in °C.
    pub ambient_temperature: i32,
    /// Heating per tick is drawn from `[heat_min, heat_max)`.
    pub heat_min: u32,
    pub heat_max: u32,
    pub overheat_threshold: i32,
    pub overheat_chance: f64,
}

impl Default for FurnaceConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_millis(1000),
            initial_iron_ore: 100,
            initial_coke: 100,
            initial_limestone: 50,
            ambient_temperature: 20,
            heat_min: 1,
            heat_max: 3,
            overheat_threshold: 1200,
            overheat_chance: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Loading time is drawn from `[min_duration_ms, max_duration_ms)`.
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            min_duration_ms: 3000,
            max_duration_ms: 8000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub base_cycle_ms: u64,
    pub experience_step_ms: u64,
    pub min_cycle_ms: u64,
    /// Quantity of a dispatched load is drawn from `[min_load, max_load)`.
    pub min_load: u32,
    pub max_load: u32,
}

impl WorkerConfig {
    /// `max(min_cycle, base_cycle - experience * step)`.
    pub fn cycle_period(&self, experience: u32) -> Duration {
        let reduction = self.experience_step_ms.saturating_mul(u64::from(experience));
        let cycle = self.base_cycle_ms.saturating_sub(reduction).max(self.min_cycle_ms);
        Duration::from_millis(cycle)
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            base_cycle_ms: 5000,
            experience_step_ms: 200,
            min_cycle_ms: 2000,
            min_load: 10,
            max_load: 50,
        }
    }
}

/// Amounts used when a delivery arrives without a recorded request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingConfig {
    pub fallback_iron_ore: u32,
    pub fallback_coke: u32,
    pub fallback_limestone: u32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            fallback_iron_ore: 20,
            fallback_coke: 20,
            fallback_limestone: 10,
        }
    }
}
