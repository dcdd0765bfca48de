use crate::config::{ConfigError, SimConfig};
use crate::field::{Field, WorldEvent};
use crate::lineage::{EvolveError, Lineage, Milestone};
use crate::metrics::{ThreatLabel, TurnMetrics, TurnSummary};
use crate::narrator::{standard_options, CommandOption};
use crate::rng::create_rng;
use rand::Rng;
use rand_chacha::ChaCha12Rng;

/// Births and deaths recorded by one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub births: usize,
    pub deaths: usize,
}

/// Outcome of one full turn: event phase, N ticks, achievement phase.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnReport {
    pub generation: u32,
    pub event: Option<WorldEvent>,
    pub births: usize,
    pub deaths: usize,
    pub population: usize,
    pub milestones: Vec<Milestone>,
    pub extinct: bool,
}

/// Turn driver owning the field, the lineage, and the seeded RNG.
///
/// One turn runs `EventPhase -> SimulationPhase(N ticks) -> AchievementPhase`
/// and then advances the generation. Within a tick, agents run strictly in
/// collection order against the once-updated field, so later agents see
/// nutrient already depleted by earlier ones. That ordering is part of the
/// simulation's contract.
pub struct SimulationClock {
    config: SimConfig,
    field: Field,
    lineage: Lineage,
    rng: ChaCha12Rng,
}

impl SimulationClock {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = create_rng(config.seed);
        let field = Field::new(&config);
        let mut lineage = Lineage::new(&config);
        lineage.spawn(
            config.initial_population,
            &field,
            &mut rng,
            config.initial_energy,
        );
        Ok(Self {
            config,
            field,
            lineage,
            rng,
        })
    }

    /// Roll the turn's world event. A new event replaces any prior one; when
    /// no event rolls, an outgoing nutrient bloom has its source scaling
    /// reverted and the event clears.
    fn event_phase(&mut self) -> Option<WorldEvent> {
        if self.rng.random::<f64>() < self.config.event_probability {
            let event = WorldEvent::ALL[self.rng.random_range(0..WorldEvent::ALL.len())];
            if event == WorldEvent::NutrientBloom {
                self.field.scale_source(self.config.bloom_source_factor);
            }
            self.field.set_event(Some(event));
        } else {
            if self.field.active_event() == Some(WorldEvent::NutrientBloom) {
                self.field
                    .scale_source(1.0 / self.config.bloom_source_factor);
            }
            self.field.set_event(None);
        }
        self.field.active_event()
    }

    /// One synchronous tick: update the field once, then run every live
    /// agent in collection order through sense -> walk -> eat -> metabolize.
    /// Reproduction and death both read energy after that same pass; the new
    /// live set is survivors followed by this tick's offspring.
    pub fn tick(&mut self) -> TickStats {
        self.field.update();

        let agents = self.lineage.take_agents();
        let mut survivors = Vec::with_capacity(agents.len());
        let mut offspring = Vec::new();
        let mut deaths = 0;

        for mut agent in agents {
            agent.sense(&self.field, &mut self.rng);
            agent.walk(&self.field);
            agent.eat(&mut self.field);
            agent.metabolize(&self.field);

            if agent.should_reproduce(self.config.reproduction_threshold) {
                offspring.push(agent.reproduce(
                    self.lineage.reference_genome(),
                    &self.field,
                    &mut self.rng,
                    self.config.mutation_span,
                ));
            }
            if agent.should_die() {
                deaths += 1;
            } else {
                survivors.push(agent);
            }
        }

        let births = offspring.len();
        survivors.extend(offspring);
        self.lineage.set_agents(survivors);
        TickStats { births, deaths }
    }

    /// Run one full turn and advance the generation.
    pub fn run_turn(&mut self) -> TurnReport {
        let event = self.event_phase();

        let mut births = 0;
        let mut deaths = 0;
        for _ in 0..self.config.ticks_per_turn {
            if self.lineage.is_extinct() {
                break;
            }
            let stats = self.tick();
            births += stats.births;
            deaths += stats.deaths;
        }

        let milestones = self
            .lineage
            .check_milestones(
                self.config.milestone_population,
                self.config.milestone_bonus,
            )
            .into_iter()
            .collect();

        let report = TurnReport {
            generation: self.lineage.generation(),
            event,
            births,
            deaths,
            population: self.lineage.population(),
            milestones,
            extinct: self.lineage.is_extinct(),
        };
        self.lineage.advance_generation();
        report
    }

    /// Structured summary for the narrator collaborator.
    pub fn turn_summary(&self) -> TurnSummary {
        TurnSummary {
            generation: self.lineage.generation(),
            population: self.lineage.population(),
            potential: self.lineage.potential(),
            dominant_threat: ThreatLabel::from_mean_toxin(
                self.field.mean_toxin(),
                self.config.toxin_threat_threshold,
            ),
            options: standard_options(),
        }
    }

    /// Apply a confirmed command option to the reference genome. `wait` is a
    /// zero-cost no-op.
    pub fn apply_command(&mut self, option: &CommandOption) -> Result<(), EvolveError> {
        match option.command.trait_target() {
            Some(target) => self.lineage.evolve_gene(target, option.delta, option.cost),
            None => Ok(()),
        }
    }

    /// Per-turn sample for headless run summaries.
    pub fn sample(&self, report: &TurnReport) -> TurnMetrics {
        TurnMetrics {
            generation: report.generation,
            population: report.population,
            potential: self.lineage.potential(),
            event: report.event,
            births: report.births,
            deaths: report.deaths,
            mean_toxin: self.field.mean_toxin(),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn lineage(&self) -> &Lineage {
        &self.lineage
    }
}
