//! Furnace state and the rules of a single tick.
//!
//! Everything in here is synchronous and free of timers, so the consumption and
//! heating rules can be tested without running the actor.

use super::error::FurnaceError;
use crate::config::FurnaceConfig;
use crate::model::{MaterialKind, Notification};
use sim_framework::RandomSource;

/// Mutable part of a furnace, guarded by the actor's mutex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FurnaceState {
    pub iron_ore: u32,
    pub coke: u32,
    pub limestone: u32,
    pub temperature: i32,
    pub running: bool,
}

/// What one tick changed.
#[derive(Debug, Default, PartialEq)]
pub struct TickReport {
    /// Granular notifications, in the order the fields were written.
    pub notifications: Vec<Notification>,
    /// At least one stock is empty after this tick's consumption.
    pub depleted: bool,
}

impl FurnaceState {
    pub fn new(config: &FurnaceConfig) -> Self {
        Self {
            iron_ore: config.initial_iron_ore,
            coke: config.initial_coke,
            limestone: config.initial_limestone,
            temperature: config.ambient_temperature,
            running: false,
        }
    }

    pub fn stock(&self, kind: MaterialKind) -> u32 {
        match kind {
            MaterialKind::IronOre => self.iron_ore,
            MaterialKind::Coke => self.coke,
            MaterialKind::Limestone => self.limestone,
        }
    }

    pub fn is_depleted(&self) -> bool {
        self.iron_ore == 0 || self.coke == 0 || self.limestone == 0
    }

    /// Consumes one unit of each stock and moves the temperature.
    ///
    /// New values are computed before anything is written, so a fault leaves the
    /// state untouched.
    pub fn tick(&mut self, config: &FurnaceConfig, random: &dyn RandomSource) -> Result<TickReport, FurnaceError> {
        let iron_ore = self.iron_ore.saturating_sub(1);
        let coke = self.coke.saturating_sub(1);
        let limestone = self.limestone.saturating_sub(1);

        let temperature = if coke > 0 {
            let heat = random.range(u64::from(config.heat_min), u64::from(config.heat_max));
            i32::try_from(heat)
                .ok()
                .and_then(|heat| self.temperature.checked_add(heat))
                .ok_or(FurnaceError::TemperatureOverflow {
                    temperature: self.temperature,
                })?
        } else {
            self.temperature.saturating_sub(1).max(config.ambient_temperature)
        };

        let mut report = TickReport::default();
        if iron_ore != self.iron_ore {
            self.iron_ore = iron_ore;
            report.notifications.push(stock_status(MaterialKind::IronOre, iron_ore));
        }
        if coke != self.coke {
            self.coke = coke;
            report.notifications.push(stock_status(MaterialKind::Coke, coke));
        }
        if limestone != self.limestone {
            self.limestone = limestone;
            report.notifications.push(stock_status(MaterialKind::Limestone, limestone));
        }
        if temperature != self.temperature {
            self.temperature = temperature;
            report.notifications.push(Notification::TemperatureChanged(temperature));
            report.notifications.push(Notification::status(format!("Temperature: {temperature}°C")));
        }
        report.depleted = self.is_depleted();
        Ok(report)
    }

    /// Adds deliveries to the stocks. Returns one status per stock that changed.
    pub fn add(&mut self, iron_ore: u32, coke: u32, limestone: u32) -> Vec<Notification> {
        let mut notifications = Vec::new();
        for (kind, delta) in MaterialKind::ALL.into_iter().zip([iron_ore, coke, limestone]) {
            if delta == 0 {
                continue;
            }
            let slot = match kind {
                MaterialKind::IronOre => &mut self.iron_ore,
                MaterialKind::Coke => &mut self.coke,
                MaterialKind::Limestone => &mut self.limestone,
            };
            *slot = slot.saturating_add(delta);
            notifications.push(stock_status(kind, *slot));
        }
        notifications
    }
}

fn stock_status(kind: MaterialKind, level: u32) -> Notification {
    let label = match kind {
        MaterialKind::IronOre => "Iron ore",
        MaterialKind::Coke => "Coke",
        MaterialKind::Limestone => "Limestone",
    };
    Notification::status(format!("{label}: {level}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_framework::mock::ScriptedRandom;

    fn state(iron_ore: u32, coke: u32, limestone: u32, temperature: i32) -> FurnaceState {
        FurnaceState {
            iron_ore,
            coke,
            limestone,
            temperature,
            running: true,
        }
    }

    #[test]
    fn test_tick_consumes_and_heats() {
        let config = FurnaceConfig::default();
        let random = ScriptedRandom::new([2]);
        let mut furnace = FurnaceState::new(&config);

        let report = furnace.tick(&config, &random).unwrap();

        assert_eq!((furnace.iron_ore, furnace.coke, furnace.limestone), (99, 99, 49));
        assert_eq!(furnace.temperature, 22);
        assert!(!report.depleted);
        assert_eq!(
            report.notifications,
            vec![
                Notification::status("Iron ore: 99"),
                Notification::status("Coke: 99"),
                Notification::status("Limestone: 49"),
                Notification::TemperatureChanged(22),
                Notification::status("Temperature: 22°C"),
            ]
        );
    }

    #[test]
    fn test_heat_draw_is_one_or_two() {
        let config = FurnaceConfig::default();
        // Scripted values outside [1, 3) are clamped to the nearest bound.
        let random = ScriptedRandom::new([0, 7]);
        let mut furnace = state(10, 10, 10, 500);

        furnace.tick(&config, &random).unwrap();
        assert_eq!(furnace.temperature, 501);
        furnace.tick(&config, &random).unwrap();
        assert_eq!(furnace.temperature, 503);
    }

    #[test]
    fn test_cools_without_coke_but_not_below_ambient() {
        let config = FurnaceConfig::default();
        let random = ScriptedRandom::default();
        let mut furnace = state(5, 1, 5, 21);

        // Coke runs out on this tick, so there is no heating.
        let report = furnace.tick(&config, &random).unwrap();
        assert_eq!(furnace.coke, 0);
        assert_eq!(furnace.temperature, 20);
        assert!(report.depleted);

        let report = furnace.tick(&config, &random).unwrap();
        assert_eq!(furnace.temperature, 20);
        assert!(!report.notifications.contains(&Notification::TemperatureChanged(20)));
        assert_eq!(random.remaining(), 0);
    }

    #[test]
    fn test_stocks_never_go_negative() {
        let config = FurnaceConfig::default();
        let random = ScriptedRandom::default();
        let mut furnace = state(0, 0, 1, 20);

        let report = furnace.tick(&config, &random).unwrap();
        assert_eq!((furnace.iron_ore, furnace.coke, furnace.limestone), (0, 0, 0));
        assert_eq!(report.notifications, vec![Notification::status("Limestone: 0")]);
        assert!(report.depleted);
    }

    #[test]
    fn test_overflow_leaves_state_untouched() {
        let config = FurnaceConfig::default();
        let random = ScriptedRandom::new([2]);
        let mut furnace = state(10, 10, 10, i32::MAX - 1);
        let before = furnace.clone();

        let result = furnace.tick(&config, &random);
        assert_eq!(
            result,
            Err(FurnaceError::TemperatureOverflow {
                temperature: i32::MAX - 1
            })
        );
        assert_eq!(furnace, before);
    }

    #[test]
    fn test_add_reports_only_changed_stocks() {
        let mut furnace = state(0, 0, 0, 20);

        let notifications = furnace.add(10, 20, 5);
        assert_eq!((furnace.iron_ore, furnace.coke, furnace.limestone), (10, 20, 5));
        assert_eq!(furnace.temperature, 20);
        assert_eq!(notifications.len(), 3);

        let notifications = furnace.add(0, 7, 0);
        assert_eq!(notifications, vec![Notification::status("Coke: 27")]);
    }
}
