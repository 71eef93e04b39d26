//! Point-in-time copies of actor state, for renderers and tests.

use super::material::LoadRequest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnaceSnapshot {
    pub name: String,
    pub iron_ore: u32,
    pub coke: u32,
    pub limestone: u32,
    pub temperature: i32,
    pub running: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderSnapshot {
    pub name: String,
    pub request: Option<LoadRequest>,
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSnapshot {
    pub name: String,
    pub experience: u32,
    pub working: bool,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantSnapshot {
    pub furnaces: Vec<FurnaceSnapshot>,
    pub loaders: Vec<LoaderSnapshot>,
    pub workers: Vec<WorkerSnapshot>,
}
