//! Builds [`City`] instances for the session coordinator.

use std::path::PathBuf;

use polis_core::config::PopulationConfig;
use polis_core::{EngineError, SimulationFactory};
use polis_types::Persona;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::city::City;
use crate::config::CityConfig;
use crate::population;

/// Seed used for the generated fallback population when none is set.
const DEFAULT_POPULATION_SEED: u64 = 0;

/// Coordinator-facing builder for the stock city engine.
#[derive(Debug, Clone)]
pub struct CityFactory {
    population_path: PathBuf,
    generated_count: usize,
    seed: Option<u64>,
}

impl CityFactory {
    /// Create a factory reading from `population_path`, generating
    /// `generated_count` personas when the file is missing.
    ///
    /// With a `seed`, both the generated population and every city's
    /// random source are reproducible.
    pub const fn new(population_path: PathBuf, generated_count: usize, seed: Option<u64>) -> Self {
        Self {
            population_path,
            generated_count,
            seed,
        }
    }

    /// Create a factory from the `population` section of the config file.
    pub fn from_config(config: &PopulationConfig) -> Self {
        Self::new(config.path.clone(), config.generated_count, config.seed)
    }

    fn city_rng(&self) -> StdRng {
        self.seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
    }
}

impl SimulationFactory for CityFactory {
    type Simulation = City;
    type Config = CityConfig;

    fn load_population(&self) -> Result<Vec<Persona>, EngineError> {
        let mut rng = StdRng::seed_from_u64(self.seed.unwrap_or(DEFAULT_POPULATION_SEED));
        if let Some(mut people) = population::load(&self.population_path)? {
            population::assign_friends(&mut people, &mut rng);
            return Ok(people);
        }
        info!(
            path = %self.population_path.display(),
            count = self.generated_count,
            "Population file missing, generating"
        );
        Ok(population::generate(self.generated_count, &mut rng))
    }

    fn create(&self, population: Vec<Persona>, config: CityConfig) -> Result<City, EngineError> {
        City::new(population, config, self.city_rng())
    }
}
