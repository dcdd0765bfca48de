use crate::constants::{EAT_RATE_SCALE, ENERGY_PER_NUTRIENT, TOXIN_DAMAGE_SCALE};
use crate::field::Field;
use crate::genome::{Genome, Trait};
use rand::Rng;

/// A single organism: toroidal position, energy, an owned genome copy, and a
/// transient per-tick movement intent.
#[derive(Clone, Debug)]
pub struct Agent {
    x: usize,
    y: usize,
    energy: f64,
    genome: Genome,
    intent: (i64, i64),
}

impl Agent {
    pub fn new(x: usize, y: usize, genome: Genome, energy: f64) -> Self {
        Self {
            x,
            y,
            energy,
            genome,
            intent: (0, 0),
        }
    }

    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Scan the Chebyshev neighborhood of radius `sensory_range` (truncated,
    /// min 1) and set intent toward the neighbor with the strictly highest
    /// nutrient seen so far. Scan order is increasing dx then dy with the
    /// zero offset skipped; ties keep the first find. If the comparisons
    /// degenerate to a (0, 0) intent, a uniform random step per axis is
    /// substituted.
    pub fn sense<R: Rng + ?Sized>(&mut self, field: &Field, rng: &mut R) {
        let range = (self.genome.get(Trait::SensoryRange).trunc() as i64).max(1);
        let mut best = -1.0_f64;
        for dx in -range..=range {
            for dy in -range..=range {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (nx, ny) = field.offset(self.x, self.y, dx, dy);
                let level = field.get_nutrient(nx, ny);
                if level > best {
                    best = level;
                    self.intent = (dx.signum(), dy.signum());
                }
            }
        }
        if self.intent == (0, 0) {
            self.intent = (rng.random_range(-1..=1), rng.random_range(-1..=1));
        }
    }

    /// Apply the pending intent with toroidal wrap, reset it, and pay the
    /// movement cost unconditionally (a (0, 0) intent still costs).
    pub fn walk(&mut self, field: &Field) {
        let (nx, ny) = field.offset(self.x, self.y, self.intent.0, self.intent.1);
        self.x = nx;
        self.y = ny;
        self.intent = (0, 0);
        self.energy -= self.genome.get(Trait::MovementCost);
    }

    /// Consume nutrient at the current cell and convert it to energy.
    pub fn eat(&mut self, field: &mut Field) {
        let appetite = self.genome.get(Trait::MetabolismRate) * EAT_RATE_SCALE;
        let consumed = field.consume_nutrient(self.x, self.y, appetite);
        self.energy += consumed * ENERGY_PER_NUTRIENT;
    }

    /// Pay the base metabolic cost plus toxin damage above the resistance
    /// threshold.
    pub fn metabolize(&mut self, field: &Field) {
        self.energy -= self.genome.get(Trait::BaseMetabolism);
        let toxin = field.get_toxin(self.x, self.y);
        let resistance = self.genome.get(Trait::ToxinResistance);
        let damage = (toxin - resistance).max(0.0) * TOXIN_DAMAGE_SCALE;
        self.energy -= damage;
    }

    pub fn should_die(&self) -> bool {
        self.energy <= 0.0
    }

    pub fn should_reproduce(&self, threshold: f64) -> bool {
        self.energy >= threshold
    }

    /// Split off an offspring: halve own energy (the halved value seeds both
    /// parent and child), mutate the lineage's reference genome, and place
    /// the child at an adjacent wrapped cell.
    pub fn reproduce<R: Rng + ?Sized>(
        &mut self,
        reference: &Genome,
        field: &Field,
        rng: &mut R,
        span: f64,
    ) -> Agent {
        self.energy /= 2.0;
        let genome = Genome::mutated_from(reference, rng, span);
        let (cx, cy) = field.offset(
            self.x,
            self.y,
            rng.random_range(-1..=1),
            rng.random_range(-1..=1),
        );
        Agent::new(cx, cy, genome, self.energy)
    }

    #[cfg(test)]
    pub(crate) fn set_energy(&mut self, energy: f64) {
        self.energy = energy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::rng::create_rng;

    fn make_field() -> Field {
        Field::new(&SimConfig::default())
    }

    #[test]
    fn walk_costs_movement_regardless_of_intent() {
        let field = make_field();
        let mut agent = Agent::new(5, 5, Genome::baseline(), 100.0);
        agent.walk(&field); // intent (0, 0)
        assert!((agent.energy() - 99.8).abs() < 1e-12);
        assert_eq!(agent.position(), (5, 5));
    }

    #[test]
    fn sense_points_toward_richest_neighbor() {
        let mut field = make_field();
        // Clear the default source; build a local gradient around (10, 10).
        let (sx, sy) = field.source_cell();
        field.consume_nutrient(sx, sy, f64::MAX);
        let mut agent = Agent::new(10, 10, Genome::baseline(), 100.0);
        // Richest cell up-right of the agent.
        let probe = Field::new(&SimConfig {
            nutrient_source: Some((11, 9)),
            ..SimConfig::default()
        });
        let mut rng = create_rng(3);
        let mut agent2 = Agent::new(10, 10, Genome::baseline(), 100.0);
        agent2.sense(&probe, &mut rng);
        agent2.walk(&probe);
        assert_eq!(agent2.position(), (11, 9));

        // On a flat zero field the first-found neighbor wins (scan order).
        agent.sense(&field, &mut rng);
        agent.walk(&field);
        assert_eq!(agent.position(), (9, 9));
    }

    #[test]
    fn sensory_range_extends_the_scan() {
        let field = Field::new(&SimConfig {
            nutrient_source: Some((13, 10)),
            ..SimConfig::default()
        });
        let mut genome = Genome::baseline();
        genome.adjust(crate::genome::Trait::SensoryRange, 2.0); // range 3
        let mut agent = Agent::new(10, 10, genome, 100.0);
        let mut rng = create_rng(5);
        agent.sense(&field, &mut rng);
        agent.walk(&field);
        // Unit step toward the source, not a teleport.
        assert_eq!(agent.position(), (11, 10));
    }

    #[test]
    fn eat_gains_energy_from_consumed_nutrient() {
        let mut field = make_field();
        let (sx, sy) = field.source_cell();
        let mut agent = Agent::new(sx, sy, Genome::baseline(), 100.0);
        agent.eat(&mut field);
        // Appetite 0.1 * 10 = 1.0 nutrient, gain 5.0 energy.
        assert!((agent.energy() - 105.0).abs() < 1e-12);
        assert!((field.get_nutrient(sx, sy) - 9.0).abs() < 1e-12);
    }

    #[test]
    fn metabolize_applies_toxin_damage_above_resistance() {
        let mut field = make_field();
        field.deposit_toxin(4, 4, 0.3);
        let mut genome = Genome::baseline();
        genome.adjust(crate::genome::Trait::ToxinResistance, 0.1);
        let mut agent = Agent::new(4, 4, genome, 100.0);
        agent.metabolize(&field);
        // Base 0.5 plus (0.3 - 0.1) * 10 = 2.0 damage.
        assert!((agent.energy() - 97.5).abs() < 1e-12);
    }

    #[test]
    fn metabolize_ignores_toxin_below_resistance() {
        let mut field = make_field();
        field.deposit_toxin(4, 4, 0.05);
        let mut genome = Genome::baseline();
        genome.adjust(crate::genome::Trait::ToxinResistance, 0.1);
        let mut agent = Agent::new(4, 4, genome, 100.0);
        agent.metabolize(&field);
        assert!((agent.energy() - 99.5).abs() < 1e-12);
    }

    #[test]
    fn reproduce_halves_energy_into_both_parties() {
        let field = make_field();
        let reference = Genome::baseline();
        let mut parent = Agent::new(10, 10, Genome::baseline(), 160.0);
        let mut rng = create_rng(11);
        let child = parent.reproduce(&reference, &field, &mut rng, 0.1);
        assert!((parent.energy() - 80.0).abs() < f64::EPSILON);
        assert!((child.energy() - 80.0).abs() < f64::EPSILON);
        let (cx, cy) = child.position();
        let dx = (cx as i64 - 10).rem_euclid(50);
        let dy = (cy as i64 - 10).rem_euclid(50);
        assert!(dx <= 1 || dx == 49);
        assert!(dy <= 1 || dy == 49);
    }

    #[test]
    fn offspring_genome_derives_from_reference_not_parent() {
        let field = make_field();
        let reference = Genome::baseline();
        // Parent carries a heavily drifted genome.
        let mut drifted = Genome::baseline();
        drifted.adjust(crate::genome::Trait::MovementCost, 5.0);
        let mut parent = Agent::new(10, 10, drifted, 160.0);
        let mut rng = create_rng(13);
        let child = parent.reproduce(&reference, &field, &mut rng, 0.1);
        let mc = child.genome().get(crate::genome::Trait::MovementCost);
        assert!(
            (0.18..=0.22).contains(&mc),
            "child should mutate from the reference, got {mc}"
        );
    }

    #[test]
    fn death_and_reproduction_thresholds() {
        let mut agent = Agent::new(0, 0, Genome::baseline(), 100.0);
        assert!(!agent.should_die());
        assert!(!agent.should_reproduce(150.0));
        agent.set_energy(150.0);
        assert!(agent.should_reproduce(150.0));
        agent.set_energy(0.0);
        assert!(agent.should_die());
    }
}
