pub mod agent;
pub mod clock;
pub mod config;
pub mod constants;
pub mod field;
pub mod genome;
pub mod lineage;
pub mod metrics;
pub mod narrator;
pub mod rng;

pub use clock::{SimulationClock, TurnReport};
pub use config::SimConfig;
pub use field::{Field, WorldEvent};
pub use metrics::{RunSummary, ThreatLabel, TurnMetrics, TurnSummary};
pub use narrator::{Command, CommandOption, Narrator, NarratorError};
