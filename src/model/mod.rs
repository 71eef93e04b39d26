//! Plain data shared by the actors and the coordinator.

pub mod material;
pub mod notification;
pub mod snapshot;

pub use material::*;
pub use notification::*;
pub use snapshot::*;
