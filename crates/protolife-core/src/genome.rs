use rand::Rng;
use serde::{Deserialize, Serialize};

/// Named numeric traits governing agent behavior and costs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trait {
    MetabolismRate,
    MovementCost,
    BaseMetabolism,
    SensoryRange,
    ToxinResistance,
}

impl Trait {
    pub const ALL: [Trait; 5] = [
        Trait::MetabolismRate,
        Trait::MovementCost,
        Trait::BaseMetabolism,
        Trait::SensoryRange,
        Trait::ToxinResistance,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Trait::MetabolismRate => "metabolism_rate",
            Trait::MovementCost => "movement_cost",
            Trait::BaseMetabolism => "base_metabolism",
            Trait::SensoryRange => "sensory_range",
            Trait::ToxinResistance => "toxin_resistance",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Ordered trait-to-value mapping. Immutable once attached to an agent;
/// mutation always derives a fresh genome from the lineage's reference
/// genome, never from the parent's own copy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    values: [f64; Trait::ALL.len()],
}

impl Genome {
    /// Documented reference defaults.
    pub fn baseline() -> Self {
        Self {
            values: [0.1, 0.2, 0.5, 1.0, 0.0],
        }
    }

    pub fn get(&self, t: Trait) -> f64 {
        self.values[t.index()]
    }

    pub fn adjust(&mut self, t: Trait, delta: f64) {
        self.values[t.index()] += delta;
    }

    /// Derive an offspring genome: every trait of `reference` scaled by an
    /// independent factor uniform in [1 - span, 1 + span].
    pub fn mutated_from<R: Rng + ?Sized>(reference: &Genome, rng: &mut R, span: f64) -> Self {
        let mut values = reference.values;
        for v in &mut values {
            let factor = 1.0 + rng.random_range(-span..=span);
            *v *= factor;
        }
        Self { values }
    }

    pub fn traits(&self) -> impl Iterator<Item = (Trait, f64)> + '_ {
        Trait::ALL.iter().map(move |&t| (t, self.get(t)))
    }
}
