use protolife_core::narrator::{parse_command_response, Command, Narrator, NarratorError};
use protolife_core::{ThreatLabel, TurnSummary};
use std::env;
use std::io::Write;
use std::process::{Command as Subprocess, Stdio};

/// Environment variable naming the external narrator program.
pub const NARRATOR_CMD_VAR: &str = "PROTOLIFE_NARRATOR_CMD";

/// Built-in narrator: a rule-based chronicle plus keyword matching on the
/// player's input. Keeps the game playable without any external program.
#[derive(Debug, Default)]
pub struct LocalNarrator;

impl Narrator for LocalNarrator {
    fn narrate(&mut self, summary: &TurnSummary) -> Result<String, NarratorError> {
        let mut text = format!(
            "Generation {}. {} organisms drift through the broth, \
             {} EP banked in the lineage.",
            summary.generation, summary.population, summary.potential
        );
        match summary.dominant_threat {
            ThreatLabel::Toxins => {
                text.push_str(" A sour haze of toxins is thinning the weak.")
            }
            ThreatLabel::None => text.push_str(" The waters are calm, for now."),
        }
        text.push_str("\n\nAvailable mutations:");
        for option in &summary.options {
            text.push_str(&format!(
                "\n  {:<26} {:>3} EP",
                option.command.as_str(),
                option.cost
            ));
        }
        Ok(text)
    }

    fn choose(&mut self, player_input: &str) -> Result<Command, NarratorError> {
        let lowered = player_input.to_lowercase();
        if lowered.contains("wait") || lowered.contains("nothing") {
            Ok(Command::Wait)
        } else if lowered.contains("toxin") || lowered.contains("resist") {
            Ok(Command::IncreaseToxinResistance)
        } else if lowered.contains("metab") || lowered.contains("hunger") {
            Ok(Command::DecreaseMetabolism)
        } else if lowered.contains("sens") || lowered.contains("sight") || lowered.contains("see")
        {
            Ok(Command::ImproveSensing)
        } else {
            Err(NarratorError::Protocol {
                detail: format!("no command matched {player_input:?}"),
            })
        }
    }
}

/// Bridge to an external narrator program named by `PROTOLIFE_NARRATOR_CMD`.
///
/// The program is run once per exchange: `<cmd> narrate` receives the turn
/// summary as JSON on stdin and prints free text; `<cmd> choose` receives the
/// raw player input on stdin and prints a JSON object with a
/// `command_to_execute` key (Markdown code fences tolerated).
#[derive(Debug)]
pub struct CommandNarrator {
    program: String,
}

impl CommandNarrator {
    /// Fails fast when the variable is unset so the game never starts with a
    /// half-configured narrator.
    pub fn from_env() -> Result<Self, NarratorError> {
        match env::var(NARRATOR_CMD_VAR) {
            Ok(program) if !program.trim().is_empty() => Ok(Self { program }),
            _ => Err(NarratorError::MissingCredential {
                variable: NARRATOR_CMD_VAR.to_string(),
            }),
        }
    }

    fn exchange(&self, mode: &str, payload: &str) -> Result<String, NarratorError> {
        let mut child = Subprocess::new(&self.program)
            .arg(mode)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| NarratorError::Protocol {
                detail: format!("failed to start {}: {e}", self.program),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(payload.as_bytes())
                .map_err(|e| NarratorError::Protocol {
                    detail: format!("failed to send payload: {e}"),
                })?;
        }

        let output = child.wait_with_output().map_err(|e| NarratorError::Protocol {
            detail: format!("narrator process failed: {e}"),
        })?;
        if !output.status.success() {
            return Err(NarratorError::Protocol {
                detail: format!("narrator exited with {}", output.status),
            });
        }
        String::from_utf8(output.stdout).map_err(|e| NarratorError::Protocol {
            detail: format!("narrator produced invalid UTF-8: {e}"),
        })
    }
}

impl Narrator for CommandNarrator {
    fn narrate(&mut self, summary: &TurnSummary) -> Result<String, NarratorError> {
        let payload = serde_json::to_string(summary).map_err(|e| NarratorError::Protocol {
            detail: format!("failed to encode turn summary: {e}"),
        })?;
        self.exchange("narrate", &payload)
    }

    fn choose(&mut self, player_input: &str) -> Result<Command, NarratorError> {
        let raw = self.exchange("choose", player_input)?;
        parse_command_response(&raw)
    }
}
