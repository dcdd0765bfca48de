/// Largest valid grid dimension (cells per axis). Keeps grid allocations bounded.
pub const MAX_GRID_DIM: usize = 2048;

/// Nutrient units an agent attempts to eat per tick, per unit of metabolism rate.
pub const EAT_RATE_SCALE: f64 = 10.0;

/// Energy gained per nutrient unit actually consumed.
pub const ENERGY_PER_NUTRIENT: f64 = 5.0;

/// Energy lost per unit of toxin above the agent's resistance threshold.
pub const TOXIN_DAMAGE_SCALE: f64 = 10.0;

/// Permanent base-metabolism increase paid whenever toxin resistance is evolved.
pub const TOXIN_RESISTANCE_TRADEOFF: f64 = 0.01;
