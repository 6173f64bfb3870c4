//! The city and its daily step.
//!
//! One call to [`Simulation::advance_one_day`] runs, in order:
//!
//! 1. On the very first day, every firm-owning persona opens a firm in a
//!    random industry in a building with free space.
//! 2. On a month change, every tenant pays its building's rent.
//! 3. Contagion: sick personas lose health and may infect friends; with
//!    nobody sick, a patient zero may appear.
//! 4. Healthcare: personas below full health visit a hospital if one
//!    exists and they can pay.
//! 5. Labor market: unemployed personas fill open positions at the mean
//!    wage.
//! 6. Production, payroll (wages taxed at source), profit tax.
//! 7. Government subsidies per industry and welfare per persona.
//! 8. Firms with negative cash close and leave their building.
//!
//! Personas are never removed, so player bindings never dangle.

use chrono::{Datelike, NaiveDate};
use polis_core::{EngineError, Simulation};
use polis_types::{
    BuildingView, FirmId, GovernmentState, Industry, Persona, PersonaId, PlayerId, Proposal,
};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::{IndexedMutRandom, IndexedRandom, SliceRandom};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::CityConfig;
use crate::economy::{Building, Firm, building_views};
use crate::government::Government;

/// First simulated day.
const START_DATE: Option<NaiveDate> = NaiveDate::from_ymd_opt(2005, 1, 1);

/// A running city.
#[derive(Debug)]
pub struct City {
    config: CityConfig,
    date: NaiveDate,
    people: Vec<Persona>,
    buildings: Vec<Building>,
    firms: Vec<Firm>,
    government: Government,
    rng: StdRng,
    initialized: bool,
}

impl City {
    /// Build a city over `people`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if `config` fails validation.
    pub fn new(people: Vec<Persona>, config: CityConfig, rng: StdRng) -> Result<Self, EngineError> {
        config.validate()?;
        let buildings = (0..config.n_buildings)
            .map(|_| Building::new(config.max_tenants, config.rent))
            .collect();
        let government = Government::new(&config);
        Ok(Self {
            config,
            date: START_DATE.unwrap_or_default(),
            people,
            buildings,
            firms: Vec::new(),
            government,
            rng,
            initialized: false,
        })
    }

    /// Current simulated date.
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Firms currently in business.
    pub fn firms(&self) -> &[Firm] {
        &self.firms
    }

    /// The government.
    pub const fn policy(&self) -> &Government {
        &self.government
    }

    /// The buildings, with raw tenant ids.
    pub fn building_list(&self) -> &[Building] {
        &self.buildings
    }

    // -----------------------------------------------------------------------
    // Firms
    // -----------------------------------------------------------------------

    fn open_initial_firms(&mut self) {
        let owners: Vec<PersonaId> = self
            .people
            .iter()
            .filter(|p| p.firm_owner)
            .map(|p| p.id)
            .collect();
        for owner in owners {
            if self.start_firm(owner).is_none() {
                debug!(owner = %owner, "No space left for a new firm");
            }
        }
    }

    fn start_firm(&mut self, owner: PersonaId) -> Option<FirmId> {
        let industry = *Industry::ALL.choose(&mut self.rng)?;
        let free: Vec<usize> = self
            .buildings
            .iter()
            .enumerate()
            .filter(|(_, b)| b.available_space() > 0)
            .map(|(i, _)| i)
            .collect();
        let index = *free.choose(&mut self.rng)?;
        let building = self.buildings.get_mut(index)?;
        let firm = Firm::open(industry, owner, building.id, self.config.min_business_capital);
        if !building.add_tenant(firm.id) {
            return None;
        }
        info!(
            firm = %firm.id,
            owner = %owner,
            industry = industry.tenant_type(),
            building = %building.id,
            "Firm opened"
        );
        let id = firm.id;
        self.firms.push(firm);
        Some(id)
    }

    fn collect_rent(&mut self) {
        let mut total = Decimal::ZERO;
        for building in &self.buildings {
            for tenant in &building.tenants {
                if let Some(firm) = self.firms.iter_mut().find(|f| f.id == *tenant) {
                    firm.pay(building.rent);
                    total = total.saturating_add(building.rent);
                }
            }
        }
        debug!(date = %self.date, total = %total, "Rent collected");
    }

    fn close_bankrupt(&mut self) {
        let bankrupt: Vec<Firm> = self
            .firms
            .iter()
            .filter(|f| f.is_bankrupt())
            .cloned()
            .collect();
        for firm in bankrupt {
            for building in self.buildings.iter_mut().filter(|b| b.id == firm.building) {
                building.remove_tenant(firm.id);
            }
            for person in &mut self.people {
                if person.employer == Some(firm.id) {
                    person.employer = None;
                    person.wage = Decimal::ZERO;
                }
                if person.id == firm.owner {
                    person.firm_owner = false;
                }
            }
            self.firms.retain(|f| f.id != firm.id);
            info!(
                firm = %firm.id,
                industry = firm.industry.tenant_type(),
                cash = %firm.cash,
                "Firm went bankrupt"
            );
        }
    }

    // -----------------------------------------------------------------------
    // Health
    // -----------------------------------------------------------------------

    fn contagion(&mut self) {
        if !self.people.iter().any(|p| p.sick) {
            if self.rng.random::<f64>() < self.config.patient_zero_prob {
                if let Some(patient) = self.people.choose_mut(&mut self.rng) {
                    patient.sick = true;
                    info!(persona = %patient.id, date = %self.date, "Sickness appeared");
                }
            }
            return;
        }

        let mut exposed = Vec::new();
        for person in self.people.iter_mut().filter(|p| p.sick) {
            person.health = (person.health - self.config.sickness_severity).max(0.0);
            for friend in &person.friends {
                if self.rng.random::<f64>() < self.config.contact_rate
                    && self.rng.random::<f64>() < self.config.transmission_rate
                {
                    exposed.push(*friend);
                }
            }
        }
        for person in self.people.iter_mut().filter(|p| exposed.contains(&p.id)) {
            if !person.sick {
                person.sick = true;
                debug!(persona = %person.id, "Infected");
            }
        }
    }

    fn healthcare(&mut self) {
        let hospitals: Vec<usize> = self
            .firms
            .iter()
            .enumerate()
            .filter(|(_, f)| f.industry == Industry::Healthcare)
            .map(|(i, _)| i)
            .collect();
        if hospitals.is_empty() {
            return;
        }
        let price = self.config.healthcare_price;
        for person in &mut self.people {
            if person.health >= 1.0 || person.cash < price {
                continue;
            }
            let Some(hospital) = hospitals
                .choose(&mut self.rng)
                .and_then(|&i| self.firms.get_mut(i))
            else {
                continue;
            };
            hospital.earn(price);
            person.cash = person.cash.saturating_sub(price);
            person.health = 1.0;
            person.sick = self.rng.random::<f64>() >= self.config.recovery_prob;
        }
    }

    // -----------------------------------------------------------------------
    // Economy
    // -----------------------------------------------------------------------

    fn mean_wage(&self) -> Decimal {
        let wages: Vec<Decimal> = self
            .people
            .iter()
            .filter(|p| p.employer.is_some())
            .map(|p| p.wage)
            .collect();
        let count = Decimal::from(wages.len());
        wages
            .into_iter()
            .fold(Decimal::ZERO, Decimal::saturating_add)
            .checked_div(count)
            .unwrap_or(self.config.starting_wage)
    }

    fn labor_market(&mut self) {
        let wage = self.mean_wage();
        let mut seekers: Vec<usize> = self
            .people
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.firm_owner && p.employer.is_none())
            .map(|(i, _)| i)
            .collect();
        if seekers.is_empty() {
            return;
        }
        seekers.shuffle(&mut self.rng);
        let mut order: Vec<usize> = (0..self.firms.len()).collect();
        order.shuffle(&mut self.rng);

        let mut hired = 0_usize;
        for index in order {
            let Some(firm) = self.firms.get_mut(index) else {
                continue;
            };
            for _ in 0..firm.vacancies(self.config.max_employees, wage) {
                let Some(person) = seekers.pop().and_then(|i| self.people.get_mut(i)) else {
                    break;
                };
                person.employer = Some(firm.id);
                person.wage = wage;
                firm.workers.push(person.id);
                hired = hired.saturating_add(1);
            }
        }
        if hired > 0 {
            debug!(hired, wage = %wage, "Labor market cleared");
        }
    }

    fn produce(&mut self) {
        for firm in &mut self.firms {
            let output = self
                .config
                .labor_per_worker
                .saturating_mul(Decimal::from(firm.workers.len()));
            firm.earn(output);
        }
    }

    fn payroll(&mut self) {
        for person in &mut self.people {
            let Some(employer) = person.employer else {
                continue;
            };
            let Some(firm) = self.firms.iter_mut().find(|f| f.id == employer) else {
                continue;
            };
            let paid = person.wage.min(firm.cash.max(Decimal::ZERO));
            let taxes = self.government.tax_on(paid);
            firm.pay(paid);
            person.cash = person.cash.saturating_add(paid.saturating_sub(taxes));
            self.government.collect(taxes);
        }
        for firm in &mut self.firms {
            let taxes = self.government.tax_on(firm.profit());
            firm.cash = firm.cash.saturating_sub(taxes);
            self.government.collect(taxes);
        }
    }

    fn pay_subsidies(&mut self) {
        for industry in Industry::ALL {
            let amount = self.government.subsidy(industry);
            let recipients = self.firms.iter().filter(|f| f.industry == industry).count();
            if amount.is_zero() || recipients == 0 {
                continue;
            }
            let Some(share) = amount.checked_div(Decimal::from(recipients)) else {
                continue;
            };
            for firm in self.firms.iter_mut().filter(|f| f.industry == industry) {
                firm.cash = firm.cash.saturating_add(share);
            }
            self.government.spend(amount);
        }
    }

    fn pay_welfare(&mut self) {
        let welfare = self.government.welfare();
        for person in &mut self.people {
            person.cash = person.cash.saturating_add(welfare);
            self.government.spend(welfare);
        }
    }
}

impl Simulation for City {
    fn year_month(&self) -> (i32, u32) {
        (self.date.year(), self.date.month())
    }

    fn advance_one_day(&mut self) {
        let previous_month = self.date.month();
        self.date = self.date.succ_opt().unwrap_or(self.date);
        for firm in &mut self.firms {
            firm.new_day();
        }

        if !self.initialized {
            self.open_initial_firms();
            self.initialized = true;
        }
        if self.date.month() != previous_month {
            self.collect_rent();
        }

        self.contagion();
        self.healthcare();
        self.labor_market();
        self.produce();
        self.payroll();
        self.pay_subsidies();
        self.pay_welfare();
        self.close_bankrupt();

        debug!(
            date = %self.date,
            firms = self.firms.len(),
            sick = self.people.iter().filter(|p| p.sick).count(),
            treasury = %self.government.cash(),
            "Day simulated"
        );
    }

    fn people(&self) -> &[Persona] {
        &self.people
    }

    fn bind_persona(&mut self, persona: PersonaId, player: Option<PlayerId>) -> bool {
        let Some(target) = self.people.iter_mut().find(|p| p.id == persona) else {
            return false;
        };
        target.player = player;
        true
    }

    fn buildings(&self) -> Vec<BuildingView> {
        building_views(&self.buildings, &self.firms)
    }

    fn government(&self) -> GovernmentState {
        self.government.state()
    }

    fn proposal_options(&self) -> Vec<Proposal> {
        self.government.proposal_options()
    }

    fn apply_proposal(&mut self, proposal: &Proposal) {
        self.government.apply(proposal);
    }
}
