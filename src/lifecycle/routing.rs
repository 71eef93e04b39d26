//! Delivery routing.
//!
//! Pure functions deciding how much of what a completed load puts into which
//! furnace. The coordinator feeds them the loader's request and the furnaces'
//! current stock levels, in registration order.

use crate::config::RoutingConfig;
use crate::model::{LoadRequest, MaterialKind};
use serde::{Deserialize, Serialize};

/// Amounts of each material, either a delivery or a furnace's stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amounts {
    pub iron_ore: u32,
    pub coke: u32,
    pub limestone: u32,
}

impl Amounts {
    pub fn new(iron_ore: u32, coke: u32, limestone: u32) -> Self {
        Self {
            iron_ore,
            coke,
            limestone,
        }
    }

    pub fn only(kind: MaterialKind, quantity: u32) -> Self {
        match kind {
            MaterialKind::IronOre => Self::new(quantity, 0, 0),
            MaterialKind::Coke => Self::new(0, quantity, 0),
            MaterialKind::Limestone => Self::new(0, 0, quantity),
        }
    }

    pub fn get(&self, kind: MaterialKind) -> u32 {
        match kind {
            MaterialKind::IronOre => self.iron_ore,
            MaterialKind::Coke => self.coke,
            MaterialKind::Limestone => self.limestone,
        }
    }
}

/// Maps a completed request to per-material amounts.
///
/// A known material goes entirely into its own channel. An unrecognised one is
/// split three ways, rounding down. No request at all delivers the fallback mix.
pub fn plan_delivery(request: Option<&LoadRequest>, config: &RoutingConfig) -> Amounts {
    let Some(request) = request else {
        return Amounts::new(
            config.fallback_iron_ore,
            config.fallback_coke,
            config.fallback_limestone,
        );
    };
    match request.material.kind() {
        Some(kind) => Amounts::only(kind, request.quantity),
        None => {
            let third = request.quantity / 3;
            Amounts::new(third, third, third)
        }
    }
}

/// Index of the furnace that should receive the delivery.
///
/// The furnace with the lowest stock of the delivered material wins; the earliest
/// one on ties. Unknown material or an absent request goes to the first furnace.
/// `None` only when there are no furnaces.
pub fn select_furnace(stocks: &[Amounts], request: Option<&LoadRequest>) -> Option<usize> {
    if stocks.is_empty() {
        return None;
    }
    let Some(kind) = request.and_then(|r| r.material.kind()) else {
        return Some(0);
    };
    stocks
        .iter()
        .enumerate()
        .min_by_key(|(index, stock)| (stock.get(kind), *index))
        .map(|(index, _)| index)
}
