use crate::config::SimConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Global perturbation active over the field, rolled once per turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldEvent {
    AcidRain,
    IceAge,
    NutrientBloom,
}

impl WorldEvent {
    pub const ALL: [WorldEvent; 3] = [
        WorldEvent::AcidRain,
        WorldEvent::IceAge,
        WorldEvent::NutrientBloom,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WorldEvent::AcidRain => "acid rain",
            WorldEvent::IceAge => "ice age",
            WorldEvent::NutrientBloom => "nutrient bloom",
        }
    }
}

/// 2D nutrient/toxin environment over a toroidal grid.
///
/// Grids are row-major `Vec<f64>` indexed `y * width + x`. Diffusion uses a
/// 5-point interior Laplacian; the border ring is left untouched. Both grids
/// are clamped to >= 0 after every update.
#[derive(Clone, Debug)]
pub struct Field {
    width: usize,
    height: usize,
    diffusion_rate: f64,
    nutrient: Vec<f64>,
    toxin: Vec<f64>,
    scratch: Vec<f64>,
    source: (usize, usize),
    source_amount: f64,
    toxin_decay: f64,
    acid_rain_toxin: f64,
    ice_age_source_factor: f64,
    active_event: Option<WorldEvent>,
}

impl Field {
    pub fn new(config: &SimConfig) -> Self {
        assert!(config.width >= 3 && config.height >= 3, "grid too small");
        let cells = config.width * config.height;
        let source = config.source_cell();
        let mut nutrient = vec![0.0; cells];
        nutrient[source.1 * config.width + source.0] = config.nutrient_amount;
        Self {
            width: config.width,
            height: config.height,
            diffusion_rate: config.diffusion_rate,
            nutrient,
            toxin: vec![0.0; cells],
            scratch: vec![0.0; cells],
            source,
            source_amount: config.nutrient_amount,
            toxin_decay: config.toxin_decay,
            acid_rain_toxin: config.acid_rain_toxin,
            ice_age_source_factor: config.ice_age_source_factor,
            active_event: None,
        }
    }

    /// One environment tick: diffuse nutrients, re-pin the source, diffuse and
    /// decay toxins when present, then apply the active event's effect.
    pub fn update(&mut self) {
        Self::diffuse(
            &mut self.nutrient,
            &mut self.scratch,
            self.width,
            self.height,
            self.diffusion_rate,
        );
        let src = self.source_index();
        self.nutrient[src] = self.source_amount;
        for v in &mut self.nutrient {
            if *v < 0.0 {
                *v = 0.0;
            }
        }

        if self.toxin.iter().any(|&t| t > 0.0) {
            Self::diffuse(
                &mut self.toxin,
                &mut self.scratch,
                self.width,
                self.height,
                self.diffusion_rate,
            );
            for t in &mut self.toxin {
                *t *= self.toxin_decay;
                if *t < 0.0 {
                    *t = 0.0;
                }
            }
        }

        match self.active_event {
            Some(WorldEvent::AcidRain) => {
                for t in &mut self.toxin {
                    *t += self.acid_rain_toxin;
                }
            }
            Some(WorldEvent::IceAge) => {
                self.nutrient[src] = self.source_amount * self.ice_age_source_factor;
            }
            Some(WorldEvent::NutrientBloom) | None => {}
        }
    }

    fn diffuse(grid: &mut [f64], scratch: &mut [f64], width: usize, height: usize, rate: f64) {
        if rate <= 0.0 {
            return;
        }
        scratch.copy_from_slice(grid);
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let idx = y * width + x;
                let laplacian = scratch[idx - 1]
                    + scratch[idx + 1]
                    + scratch[idx - width]
                    + scratch[idx + width]
                    - 4.0 * scratch[idx];
                grid[idx] += rate * laplacian;
            }
        }
    }

    pub fn get_nutrient(&self, x: usize, y: usize) -> f64 {
        self.nutrient[self.index(x, y)]
    }

    pub fn get_toxin(&self, x: usize, y: usize) -> f64 {
        self.toxin[self.index(x, y)]
    }

    /// Remove up to `amount` nutrient from the cell and return the amount
    /// actually removed. Cells never go negative.
    pub fn consume_nutrient(&mut self, x: usize, y: usize, amount: f64) -> f64 {
        let idx = self.index(x, y);
        let consumed = self.nutrient[idx].min(amount.max(0.0));
        self.nutrient[idx] -= consumed;
        consumed
    }

    /// Deposit toxin at a cell. Used by tests and scenario setup.
    pub fn deposit_toxin(&mut self, x: usize, y: usize, amount: f64) {
        let idx = self.index(x, y);
        self.toxin[idx] += amount.max(0.0);
    }

    pub fn find_spawn_location<R: Rng + ?Sized>(&self, rng: &mut R) -> (usize, usize) {
        (
            rng.random_range(0..self.width),
            rng.random_range(0..self.height),
        )
    }

    /// Wrap a signed offset from (x, y) back into bounds.
    pub fn offset(&self, x: usize, y: usize, dx: i64, dy: i64) -> (usize, usize) {
        let nx = (x as i64 + dx).rem_euclid(self.width as i64) as usize;
        let ny = (y as i64 + dy).rem_euclid(self.height as i64) as usize;
        (nx, ny)
    }

    pub fn set_event(&mut self, event: Option<WorldEvent>) {
        self.active_event = event;
    }

    pub fn active_event(&self) -> Option<WorldEvent> {
        self.active_event
    }

    /// Persistently scale the source level (nutrient bloom and its revert).
    pub fn scale_source(&mut self, factor: f64) {
        self.source_amount *= factor;
    }

    pub fn source_amount(&self) -> f64 {
        self.source_amount
    }

    pub fn source_cell(&self) -> (usize, usize) {
        self.source
    }

    pub fn mean_toxin(&self) -> f64 {
        self.toxin.iter().sum::<f64>() / self.toxin.len() as f64
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only nutrient snapshot for visualization.
    pub fn nutrient(&self) -> &[f64] {
        &self.nutrient
    }

    pub fn toxin(&self) -> &[f64] {
        &self.toxin
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    fn source_index(&self) -> usize {
        self.source.1 * self.width + self.source.0
    }
}
