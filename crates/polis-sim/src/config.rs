//! Per-session city parameters.
//!
//! The setup trigger carries a partial JSON object; every key it omits
//! falls back to the defaults below, so `{}` is a valid configuration.
//! Unknown keys are ignored.

use polis_core::EngineError;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Tunable parameters of the stock city engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CityConfig {
    /// Wage offered before any market wage exists.
    #[serde(default = "default_starting_wage", with = "rust_decimal::serde::float")]
    pub starting_wage: Decimal,

    /// Maximum firms per building.
    #[serde(default = "default_max_tenants")]
    pub max_tenants: usize,

    /// Number of buildings in the city.
    #[serde(default = "default_n_buildings")]
    pub n_buildings: usize,

    /// Daily chance that a sickness appears when nobody is sick.
    #[serde(default = "default_patient_zero_prob")]
    pub patient_zero_prob: f64,

    /// Daily chance that a sick persona meets a given friend.
    #[serde(default = "default_contact_rate")]
    pub contact_rate: f64,

    /// Chance that a contact transmits the sickness.
    #[serde(default = "default_transmission_rate")]
    pub transmission_rate: f64,

    /// Health lost per day while sick.
    #[serde(default = "default_sickness_severity")]
    pub sickness_severity: f64,

    /// Chance that a hospital visit cures the sickness.
    #[serde(default = "default_recovery_prob")]
    pub recovery_prob: f64,

    /// Initial tax rate.
    #[serde(default = "default_tax_rate", with = "rust_decimal::serde::float")]
    pub tax_rate: Decimal,

    /// Step size of tax rate proposals.
    #[serde(default = "default_tax_rate_increment", with = "rust_decimal::serde::float")]
    pub tax_rate_increment: Decimal,

    /// Initial daily welfare per persona.
    #[serde(default = "default_welfare", with = "rust_decimal::serde::float")]
    pub welfare: Decimal,

    /// Step size of welfare proposals.
    #[serde(default = "default_welfare_increment", with = "rust_decimal::serde::float")]
    pub welfare_increment: Decimal,

    /// Monthly rent per tenant.
    #[serde(default = "default_rent", with = "rust_decimal::serde::float")]
    pub rent: Decimal,

    /// Capital a new firm starts with.
    #[serde(default = "default_min_business_capital", with = "rust_decimal::serde::float")]
    pub min_business_capital: Decimal,

    /// Step size of subsidy proposals.
    #[serde(default = "default_subsidy_increment", with = "rust_decimal::serde::float")]
    pub subsidy_increment: Decimal,

    /// Daily revenue each worker brings in.
    #[serde(default = "default_labor_per_worker", with = "rust_decimal::serde::float")]
    pub labor_per_worker: Decimal,

    /// Price of one hospital visit.
    #[serde(default = "default_healthcare_price", with = "rust_decimal::serde::float")]
    pub healthcare_price: Decimal,

    /// Most workers a single firm employs.
    #[serde(default = "default_max_employees")]
    pub max_employees: usize,
}

const fn default_starting_wage() -> Decimal {
    Decimal::from_parts(5, 0, 0, false, 0)
}

const fn default_max_tenants() -> usize {
    10
}

const fn default_n_buildings() -> usize {
    16
}

const fn default_patient_zero_prob() -> f64 {
    0.01
}

const fn default_contact_rate() -> f64 {
    0.1
}

const fn default_transmission_rate() -> f64 {
    0.1
}

const fn default_sickness_severity() -> f64 {
    0.01
}

const fn default_recovery_prob() -> f64 {
    0.8
}

const fn default_tax_rate() -> Decimal {
    Decimal::from_parts(3, 0, 0, false, 1)
}

const fn default_tax_rate_increment() -> Decimal {
    Decimal::from_parts(1, 0, 0, false, 1)
}

const fn default_welfare() -> Decimal {
    Decimal::from_parts(10, 0, 0, false, 0)
}

const fn default_welfare_increment() -> Decimal {
    Decimal::ONE
}

const fn default_rent() -> Decimal {
    Decimal::from_parts(1000, 0, 0, false, 0)
}

const fn default_min_business_capital() -> Decimal {
    Decimal::from_parts(50_000, 0, 0, false, 0)
}

const fn default_subsidy_increment() -> Decimal {
    Decimal::from_parts(100, 0, 0, false, 0)
}

const fn default_labor_per_worker() -> Decimal {
    Decimal::from_parts(20, 0, 0, false, 0)
}

const fn default_healthcare_price() -> Decimal {
    Decimal::from_parts(10, 0, 0, false, 0)
}

const fn default_max_employees() -> usize {
    20
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            starting_wage: default_starting_wage(),
            max_tenants: default_max_tenants(),
            n_buildings: default_n_buildings(),
            patient_zero_prob: default_patient_zero_prob(),
            contact_rate: default_contact_rate(),
            transmission_rate: default_transmission_rate(),
            sickness_severity: default_sickness_severity(),
            recovery_prob: default_recovery_prob(),
            tax_rate: default_tax_rate(),
            tax_rate_increment: default_tax_rate_increment(),
            welfare: default_welfare(),
            welfare_increment: default_welfare_increment(),
            rent: default_rent(),
            min_business_capital: default_min_business_capital(),
            subsidy_increment: default_subsidy_increment(),
            labor_per_worker: default_labor_per_worker(),
            healthcare_price: default_healthcare_price(),
            max_employees: default_max_employees(),
        }
    }
}

impl CityConfig {
    /// Check that every parameter is in range.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] naming the first offending
    /// parameter.
    pub fn validate(&self) -> Result<(), EngineError> {
        let probabilities = [
            ("patient_zero_prob", self.patient_zero_prob),
            ("contact_rate", self.contact_rate),
            ("transmission_rate", self.transmission_rate),
            ("recovery_prob", self.recovery_prob),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{name} must be in [0, 1], got {value}")));
            }
        }
        if !(self.sickness_severity >= 0.0 && self.sickness_severity.is_finite()) {
            return Err(invalid(format!(
                "sickness_severity must be non-negative, got {}",
                self.sickness_severity
            )));
        }
        if self.tax_rate < Decimal::ZERO || self.tax_rate > Decimal::ONE {
            return Err(invalid(format!("tax_rate must be in [0, 1], got {}", self.tax_rate)));
        }
        let amounts = [
            ("starting_wage", self.starting_wage),
            ("welfare", self.welfare),
            ("rent", self.rent),
            ("min_business_capital", self.min_business_capital),
            ("labor_per_worker", self.labor_per_worker),
            ("healthcare_price", self.healthcare_price),
            ("tax_rate_increment", self.tax_rate_increment),
            ("welfare_increment", self.welfare_increment),
            ("subsidy_increment", self.subsidy_increment),
        ];
        for (name, value) in amounts {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(invalid(format!("{name} must be non-negative, got {value}")));
            }
        }
        if self.n_buildings == 0 || self.max_tenants == 0 {
            return Err(invalid(String::from(
                "n_buildings and max_tenants must be positive",
            )));
        }
        Ok(())
    }
}

const fn invalid(reason: String) -> EngineError {
    EngineError::InvalidConfig { reason }
}
