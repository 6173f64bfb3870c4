//! Shared fixtures: a counting fake engine and helpers.

#![allow(dead_code)]

use std::sync::Arc;

use polis_core::config::SessionConfig;
use polis_core::{Coordinator, EngineError, MemoryNotifier, Simulation, SimulationFactory};
use polis_types::{
    BuildingView, GovernmentState, Persona, PersonaId, PlayerId, Proposal,
};
use rust_decimal::Decimal;

/// Fake simulation that counts day advances and records applied proposals.
#[derive(Debug)]
pub struct FakeSim {
    pub people: Vec<Persona>,
    pub year: i32,
    pub month: u32,
    pub days_advanced: u32,
    pub applied: Vec<Proposal>,
}

impl FakeSim {
    pub fn with_people(count: usize) -> Self {
        Self {
            people: (0..count).map(|i| Persona::named(format!("persona-{i}"))).collect(),
            year: 2005,
            month: 4,
            days_advanced: 0,
            applied: Vec::new(),
        }
    }
}

impl Simulation for FakeSim {
    fn year_month(&self) -> (i32, u32) {
        (self.year, self.month)
    }

    fn advance_one_day(&mut self) {
        self.days_advanced += 1;
    }

    fn people(&self) -> &[Persona] {
        &self.people
    }

    fn bind_persona(&mut self, persona: PersonaId, player: Option<PlayerId>) -> bool {
        match self.people.iter_mut().find(|p| p.id == persona) {
            Some(p) => {
                p.player = player;
                true
            }
            None => false,
        }
    }

    fn buildings(&self) -> Vec<BuildingView> {
        Vec::new()
    }

    fn government(&self) -> GovernmentState {
        GovernmentState {
            tax_rate: Decimal::new(3, 1),
            welfare: Decimal::from(10),
            cash: Decimal::ZERO,
            subsidies: Vec::new(),
        }
    }

    fn proposal_options(&self) -> Vec<Proposal> {
        vec![tax_proposal()]
    }

    fn apply_proposal(&mut self, proposal: &Proposal) {
        self.applied.push(proposal.clone());
    }
}

/// Factory producing [`FakeSim`]s with a fixed population size.
pub struct FakeFactory {
    pub people: usize,
}

impl SimulationFactory for FakeFactory {
    type Simulation = FakeSim;
    type Config = serde_json::Value;

    fn load_population(&self) -> Result<Vec<Persona>, EngineError> {
        Ok(FakeSim::with_people(self.people).people)
    }

    fn create(
        &self,
        population: Vec<Persona>,
        _config: Self::Config,
    ) -> Result<FakeSim, EngineError> {
        let mut sim = FakeSim::with_people(0);
        sim.people = population;
        Ok(sim)
    }
}

pub fn tax_proposal() -> Proposal {
    Proposal::TaxRate {
        value: Decimal::new(4, 1),
    }
}

pub fn pid(raw: &str) -> PlayerId {
    PlayerId::new(raw)
}

pub fn coordinator(
    people: usize,
    max_population: usize,
) -> (Arc<Coordinator<FakeFactory>>, Arc<MemoryNotifier>) {
    let notifier = Arc::new(MemoryNotifier::new());
    let settings = SessionConfig {
        max_population,
        vote_timeout_secs: None,
        step_interval_secs: None,
        seed: Some(11),
    };
    let coordinator = Coordinator::new(FakeFactory { people }, &settings, notifier.clone());
    (Arc::new(coordinator), notifier)
}
