use crate::genome::Trait;
use crate::metrics::TurnSummary;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::{error::Error, fmt};

/// The fixed option set a narrator may select from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    IncreaseToxinResistance,
    DecreaseMetabolism,
    ImproveSensing,
    Wait,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::IncreaseToxinResistance => "increase_toxin_resistance",
            Command::DecreaseMetabolism => "decrease_metabolism",
            Command::ImproveSensing => "improve_sensing",
            Command::Wait => "wait",
        }
    }

    /// Reference-genome trait a non-`wait` command applies its delta to.
    pub fn trait_target(&self) -> Option<Trait> {
        match self {
            Command::IncreaseToxinResistance => Some(Trait::ToxinResistance),
            Command::DecreaseMetabolism => Some(Trait::BaseMetabolism),
            Command::ImproveSensing => Some(Trait::SensoryRange),
            Command::Wait => None,
        }
    }
}

/// One selectable option: a command plus its potential cost and trait delta.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommandOption {
    pub command: Command,
    pub cost: u32,
    pub delta: f64,
}

/// The ordered option list presented every turn.
pub fn standard_options() -> Vec<CommandOption> {
    vec![
        CommandOption {
            command: Command::IncreaseToxinResistance,
            cost: 60,
            delta: 0.05,
        },
        CommandOption {
            command: Command::DecreaseMetabolism,
            cost: 40,
            delta: -0.02,
        },
        CommandOption {
            command: Command::ImproveSensing,
            cost: 30,
            delta: 1.0,
        },
        CommandOption {
            command: Command::Wait,
            cost: 0,
            delta: 0.0,
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarratorError {
    /// Required external credential is missing. Fatal before the simulation starts.
    MissingCredential { variable: String },
    /// Malformed or unparseable narrator response. Recovered by defaulting to `wait`.
    Protocol { detail: String },
}

impl fmt::Display for NarratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NarratorError::MissingCredential { variable } => {
                write!(f, "narrator credential missing: {variable} is not set")
            }
            NarratorError::Protocol { detail } => {
                write!(f, "narrator protocol error: {detail}")
            }
        }
    }
}

impl Error for NarratorError {}

/// Narrow boundary to the external generative narrator. The simulation core
/// only ever exchanges a structured turn summary for free text, and free
/// player text for one command from the fixed option set. No narrator
/// failure may reach Field/Lineage/Agent state.
pub trait Narrator {
    /// Produce the turn's narrative from a structured summary.
    fn narrate(&mut self, summary: &TurnSummary) -> Result<String, NarratorError>;

    /// Resolve free-form player input into a command selection.
    fn choose(&mut self, player_input: &str) -> Result<Command, NarratorError>;
}

#[derive(Deserialize)]
struct CommandResponse {
    command_to_execute: Command,
}

/// Parse a narrator response on the original wire shape: a JSON object with
/// a `command_to_execute` key, optionally wrapped in Markdown code fences.
pub fn parse_command_response(raw: &str) -> Result<Command, NarratorError> {
    let cleaned = raw.trim().replace("```json", "").replace("```", "");
    serde_json::from_str::<CommandResponse>(cleaned.trim())
        .map(|r| r.command_to_execute)
        .map_err(|e| NarratorError::Protocol {
            detail: format!("bad command response: {e}"),
        })
}

/// Deterministic narrator for tests and replays: echoes a fixed-format
/// chronicle and plays back a queued command sequence, waiting once the
/// queue is exhausted.
#[derive(Debug, Default)]
pub struct ScriptedNarrator {
    commands: VecDeque<Command>,
}

impl ScriptedNarrator {
    pub fn new<I: IntoIterator<Item = Command>>(commands: I) -> Self {
        Self {
            commands: commands.into_iter().collect(),
        }
    }
}

impl Narrator for ScriptedNarrator {
    fn narrate(&mut self, summary: &TurnSummary) -> Result<String, NarratorError> {
        Ok(format!(
            "Generation {}: {} organisms endure with {} EP in reserve.",
            summary.generation, summary.population, summary.potential
        ))
    }

    fn choose(&mut self, _player_input: &str) -> Result<Command, NarratorError> {
        Ok(self.commands.pop_front().unwrap_or(Command::Wait))
    }
}
