//! Error types for the Furnace actor.

use thiserror::Error;

/// Faults a furnace tick can run into. They are reported on the status stream and
/// the tick loop carries on.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FurnaceError {
    /// Heating would push the temperature past what the gauge can represent.
    #[error("temperature overflow at {temperature}°C")]
    TemperatureOverflow { temperature: i32 },
}
