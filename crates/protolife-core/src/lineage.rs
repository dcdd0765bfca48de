use crate::agent::Agent;
use crate::config::SimConfig;
use crate::constants::TOXIN_RESISTANCE_TRADEOFF;
use crate::field::Field;
use crate::genome::{Genome, Trait};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// One-shot session achievements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    PopulationThreshold,
}

impl Milestone {
    pub fn label(&self) -> &'static str {
        match self {
            Milestone::PopulationThreshold => "population threshold surpassed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvolveError {
    InsufficientPotential { required: u32, available: u32 },
}

impl fmt::Display for EvolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvolveError::InsufficientPotential {
                required,
                available,
            } => write!(
                f,
                "not enough evolutionary potential: required {required}, have {available}"
            ),
        }
    }
}

impl Error for EvolveError {}

/// The player's evolving population: sole owner of the reference genome, the
/// live agent set, the evolutionary-potential balance, and latched milestone
/// flags. Agents hold independent genome copies and never write back.
pub struct Lineage {
    reference: Genome,
    agents: Vec<Agent>,
    generation: u32,
    potential: u32,
    milestone_population_reached: bool,
}

impl Lineage {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            reference: Genome::baseline(),
            agents: Vec::new(),
            generation: 1,
            potential: config.initial_potential,
            milestone_population_reached: false,
        }
    }

    /// Spawn `count` agents at random field locations, each starting from an
    /// independent copy of the current reference genome.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        field: &Field,
        rng: &mut R,
        initial_energy: f64,
    ) {
        for _ in 0..count {
            let (x, y) = field.find_spawn_location(rng);
            self.agents
                .push(Agent::new(x, y, self.reference.clone(), initial_energy));
        }
    }

    /// Permanently alter the reference genome, spending evolutionary
    /// potential. Evolving toxin resistance carries a fixed base-metabolism
    /// trade-off. Failure leaves all state unchanged.
    pub fn evolve_gene(&mut self, target: Trait, delta: f64, cost: u32) -> Result<(), EvolveError> {
        if self.potential < cost {
            return Err(EvolveError::InsufficientPotential {
                required: cost,
                available: self.potential,
            });
        }
        self.reference.adjust(target, delta);
        self.potential -= cost;
        if target == Trait::ToxinResistance {
            self.reference
                .adjust(Trait::BaseMetabolism, TOXIN_RESISTANCE_TRADEOFF);
        }
        Ok(())
    }

    /// Award the population milestone bonus the first time the live
    /// population exceeds the threshold. The flag latches permanently.
    pub fn check_milestones(&mut self, threshold: usize, bonus: u32) -> Option<Milestone> {
        if self.agents.len() > threshold && !self.milestone_population_reached {
            self.potential += bonus;
            self.milestone_population_reached = true;
            return Some(Milestone::PopulationThreshold);
        }
        None
    }

    pub fn reference_genome(&self) -> &Genome {
        &self.reference
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub(crate) fn take_agents(&mut self) -> Vec<Agent> {
        std::mem::take(&mut self.agents)
    }

    pub(crate) fn set_agents(&mut self, agents: Vec<Agent>) {
        self.agents = agents;
    }

    pub fn population(&self) -> usize {
        self.agents.len()
    }

    pub fn is_extinct(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn potential(&self) -> u32 {
        self.potential
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub(crate) fn advance_generation(&mut self) {
        self.generation += 1;
    }
}
