//! The routine tasks a worker picks from each cycle.

pub const ACTIVITIES: [&str; 7] = [
    "Checking furnace temperature",
    "Checking material levels",
    "Adjusting air flow",
    "Cleaning the slag notch",
    "Inspecting product quality",
    "Calibrating instruments",
    "Checking safety equipment",
];
