use crate::field::WorldEvent;
use crate::narrator::CommandOption;
use serde::{Deserialize, Serialize};

/// Qualitative threat label derived from the mean toxin level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatLabel {
    #[default]
    None,
    Toxins,
}

impl ThreatLabel {
    pub fn from_mean_toxin(mean_toxin: f64, threshold: f64) -> Self {
        if mean_toxin > threshold {
            ThreatLabel::Toxins
        } else {
            ThreatLabel::None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ThreatLabel::None => "none",
            ThreatLabel::Toxins => "toxins",
        }
    }
}

/// Structured turn summary handed to the narrator collaborator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TurnSummary {
    pub generation: u32,
    pub population: usize,
    /// Evolutionary-potential balance.
    pub potential: u32,
    pub dominant_threat: ThreatLabel,
    /// Ordered option list, each with its cost and trait delta.
    pub options: Vec<CommandOption>,
}

/// Per-turn sample recorded during headless runs.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TurnMetrics {
    pub generation: u32,
    pub population: usize,
    pub potential: u32,
    pub event: Option<WorldEvent>,
    pub births: usize,
    pub deaths: usize,
    pub mean_toxin: f64,
}

fn default_schema_version() -> u32 {
    1
}

/// Artifact written by headless batch runs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub turns: usize,
    pub final_population: usize,
    pub extinct: bool,
    pub samples: Vec<TurnMetrics>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrator::standard_options;

    #[test]
    fn threat_label_uses_strict_threshold() {
        assert_eq!(
            ThreatLabel::from_mean_toxin(0.009, 0.01),
            ThreatLabel::None
        );
        assert_eq!(ThreatLabel::from_mean_toxin(0.01, 0.01), ThreatLabel::None);
        assert_eq!(
            ThreatLabel::from_mean_toxin(0.011, 0.01),
            ThreatLabel::Toxins
        );
    }

    #[test]
    fn turn_summary_serializes_on_the_wire_shape() {
        let summary = TurnSummary {
            generation: 3,
            population: 42,
            potential: 100,
            dominant_threat: ThreatLabel::Toxins,
            options: standard_options(),
        };
        let json = serde_json::to_string(&summary).expect("serialize");
        assert!(json.contains("\"dominant_threat\":\"toxins\""));
        assert!(json.contains("\"command\":\"increase_toxin_resistance\""));
        assert!(json.contains("\"cost\":60"));
    }

    #[test]
    fn run_summary_defaults_schema_version() {
        let json = r#"{
            "turns": 5,
            "final_population": 12,
            "extinct": false,
            "samples": []
        }"#;
        let summary: RunSummary = serde_json::from_str(json).expect("legacy summary");
        assert_eq!(summary.schema_version, 1);
    }
}
