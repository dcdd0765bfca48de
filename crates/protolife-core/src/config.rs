use crate::constants::MAX_GRID_DIM;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Deterministic seed for reproducible runs.
    pub seed: u64,
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Diffusion coefficient applied to the interior Laplacian each tick.
    pub diffusion_rate: f64,
    /// Nutrient level the source cell is re-pinned to every tick.
    pub nutrient_amount: f64,
    /// Source cell position; `None` selects the grid center.
    pub nutrient_source: Option<(usize, usize)>,
    /// Multiplicative toxin decay applied each tick the toxin grid is non-empty.
    pub toxin_decay: f64,
    /// Uniform toxin increment added each tick while acid rain is active.
    pub acid_rain_toxin: f64,
    /// Source-level factor applied while an ice age is active.
    pub ice_age_source_factor: f64,
    /// Persistent source-level factor applied when a nutrient bloom begins.
    pub bloom_source_factor: f64,
    /// Per-turn probability of rolling a new world event.
    pub event_probability: f64,
    /// Agents spawned at the start of a session.
    pub initial_population: usize,
    /// Starting energy for spawned agents.
    pub initial_energy: f64,
    /// Energy at or above which an agent reproduces.
    pub reproduction_threshold: f64,
    /// Per-trait mutation half-width; offspring traits scale by [1-span, 1+span].
    pub mutation_span: f64,
    /// Simulation ticks per turn.
    pub ticks_per_turn: usize,
    /// Starting evolutionary-potential balance.
    pub initial_potential: u32,
    /// Live population that triggers the one-shot milestone bonus.
    pub milestone_population: usize,
    /// Evolutionary potential awarded by the milestone.
    pub milestone_bonus: u32,
    /// Mean toxin level above which the threat label reads "toxins".
    pub toxin_threat_threshold: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            width: 50,
            height: 50,
            diffusion_rate: 0.1,
            nutrient_amount: 10.0,
            nutrient_source: None,
            toxin_decay: 0.95,
            acid_rain_toxin: 0.005,
            ice_age_source_factor: 0.5,
            bloom_source_factor: 1.5,
            event_probability: 0.25,
            initial_population: 15,
            initial_energy: 100.0,
            reproduction_threshold: 150.0,
            mutation_span: 0.1,
            ticks_per_turn: 50,
            initial_potential: 100,
            milestone_population: 50,
            milestone_bonus: 75,
            toxin_threat_threshold: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidGridSize,
    GridTooLarge { max: usize, actual: usize },
    InvalidDiffusionRate,
    InvalidNutrientAmount,
    InvalidToxinDecay,
    InvalidEventProbability,
    InvalidMutationSpan,
    SourceOutOfBounds { x: usize, y: usize },
    ZeroTicksPerTurn,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidGridSize => write!(f, "width and height must be at least 3"),
            ConfigError::GridTooLarge { max, actual } => {
                write!(f, "grid dimension ({actual}) exceeds supported maximum ({max})")
            }
            ConfigError::InvalidDiffusionRate => {
                write!(f, "diffusion_rate must be finite and within [0, 1]")
            }
            ConfigError::InvalidNutrientAmount => {
                write!(f, "nutrient_amount must be non-negative and finite")
            }
            ConfigError::InvalidToxinDecay => {
                write!(f, "toxin_decay must be finite and within [0, 1]")
            }
            ConfigError::InvalidEventProbability => {
                write!(f, "event_probability must be finite and within [0, 1]")
            }
            ConfigError::InvalidMutationSpan => {
                write!(f, "mutation_span must be finite and within [0, 1)")
            }
            ConfigError::SourceOutOfBounds { x, y } => {
                write!(f, "nutrient_source ({x}, {y}) lies outside the grid")
            }
            ConfigError::ZeroTicksPerTurn => write!(f, "ticks_per_turn must be positive"),
        }
    }
}

impl Error for ConfigError {}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 3 || self.height < 3 {
            return Err(ConfigError::InvalidGridSize);
        }
        let largest = self.width.max(self.height);
        if largest > MAX_GRID_DIM {
            return Err(ConfigError::GridTooLarge {
                max: MAX_GRID_DIM,
                actual: largest,
            });
        }
        if !(self.diffusion_rate.is_finite() && (0.0..=1.0).contains(&self.diffusion_rate)) {
            return Err(ConfigError::InvalidDiffusionRate);
        }
        if !(self.nutrient_amount.is_finite() && self.nutrient_amount >= 0.0) {
            return Err(ConfigError::InvalidNutrientAmount);
        }
        if !(self.toxin_decay.is_finite() && (0.0..=1.0).contains(&self.toxin_decay)) {
            return Err(ConfigError::InvalidToxinDecay);
        }
        if !(self.event_probability.is_finite() && (0.0..=1.0).contains(&self.event_probability)) {
            return Err(ConfigError::InvalidEventProbability);
        }
        if !(self.mutation_span.is_finite() && (0.0..1.0).contains(&self.mutation_span)) {
            return Err(ConfigError::InvalidMutationSpan);
        }
        if let Some((x, y)) = self.nutrient_source {
            if x >= self.width || y >= self.height {
                return Err(ConfigError::SourceOutOfBounds { x, y });
            }
        }
        if self.ticks_per_turn == 0 {
            return Err(ConfigError::ZeroTicksPerTurn);
        }
        Ok(())
    }

    /// Source cell position, defaulting to the grid center.
    pub fn source_cell(&self) -> (usize, usize) {
        self.nutrient_source
            .unwrap_or((self.width / 2, self.height / 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn legacy_config_json_deserializes_with_defaults() {
        let legacy_json = r#"{
            "seed": 7,
            "width": 50,
            "height": 50,
            "diffusion_rate": 0.1
        }"#;
        let cfg: SimConfig = serde_json::from_str(legacy_json).expect("legacy config should parse");
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.initial_population, 15);
        assert!((cfg.reproduction_threshold - 150.0).abs() < f64::EPSILON);
        assert_eq!(cfg.ticks_per_turn, 50);
    }

    #[test]
    fn validate_rejects_degenerate_grid() {
        let cfg = SimConfig {
            width: 2,
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidGridSize));
    }

    #[test]
    fn validate_rejects_oversized_grid() {
        let cfg = SimConfig {
            width: MAX_GRID_DIM + 1,
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn validate_rejects_out_of_range_diffusion() {
        for bad in [-0.1, 1.5, f64::NAN] {
            let cfg = SimConfig {
                diffusion_rate: bad,
                ..SimConfig::default()
            };
            assert_eq!(cfg.validate(), Err(ConfigError::InvalidDiffusionRate));
        }
    }

    #[test]
    fn validate_rejects_source_outside_grid() {
        let cfg = SimConfig {
            nutrient_source: Some((50, 10)),
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::SourceOutOfBounds { x: 50, y: 10 })
        ));
    }

    #[test]
    fn source_cell_defaults_to_center() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.source_cell(), (25, 25));
    }
}
