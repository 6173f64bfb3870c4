//! Core entity records: personas, buildings and the government.
//!
//! Money is carried as [`Decimal`] for exact bookkeeping but serialized as a
//! JSON number so clients see plain numeric fields.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{Industry, Sex};
use crate::ids::{BuildingId, FirmId, PersonaId, PlayerId};

/// Default health for personas loaded without an explicit value.
const fn full_health() -> f64 {
    1.0
}

/// A simulated inhabitant of the city.
///
/// Every field except `name` has a default so population files only need
/// to carry what they know. The player binding is coordinator state and is
/// never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    /// Unique persona identifier.
    #[serde(default)]
    pub id: PersonaId,
    /// Display name.
    pub name: String,
    /// Recorded sex.
    #[serde(default)]
    pub sex: Sex,
    /// Age in years.
    #[serde(default)]
    pub age: u32,
    /// Highest education attained, free-form.
    #[serde(default)]
    pub education: String,
    /// Current occupation, if any.
    #[serde(default)]
    pub occupation: Option<String>,
    /// Neighborhood of residence.
    #[serde(default)]
    pub neighborhood: String,
    /// Cash on hand.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub cash: Decimal,
    /// Daily wage from the current employer (zero when unemployed).
    #[serde(default, with = "rust_decimal::serde::float")]
    pub wage: Decimal,
    /// Health in `[0, 1]`.
    #[serde(default = "full_health")]
    pub health: f64,
    /// Whether the persona is currently sick.
    #[serde(default)]
    pub sick: bool,
    /// Whether the persona owns (or wants to open) a firm.
    #[serde(default)]
    pub firm_owner: bool,
    /// Firm the persona works for, if employed.
    #[serde(default)]
    pub employer: Option<FirmId>,
    /// Social contacts, used by the contagion model.
    #[serde(default)]
    pub friends: Vec<PersonaId>,
    /// Player currently controlling this persona.
    #[serde(skip)]
    pub player: Option<PlayerId>,
}

impl Persona {
    /// Create a persona with default attributes and the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: PersonaId::new(),
            name: name.into(),
            sex: Sex::default(),
            age: 0,
            education: String::new(),
            occupation: None,
            neighborhood: String::new(),
            cash: Decimal::ZERO,
            wage: Decimal::ZERO,
            health: full_health(),
            sick: false,
            firm_owner: false,
            employer: None,
            friends: Vec::new(),
            player: None,
        }
    }

    /// Whether a player is bound to this persona.
    pub const fn is_bound(&self) -> bool {
        self.player.is_some()
    }
}

/// A firm as it appears in a building's tenant list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantView {
    /// Firm identifier.
    pub id: FirmId,
    /// Firm type name (e.g. `Hospital`).
    #[serde(rename = "type")]
    pub kind: String,
}

/// A building and the firms renting space in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingView {
    /// Building identifier.
    pub id: BuildingId,
    /// Current tenants.
    pub tenants: Vec<TenantView>,
}

/// A standing subsidy paid to every firm of one industry, split evenly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsidy {
    /// Industry receiving the subsidy.
    pub industry: Industry,
    /// Total daily amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Public state of the city government.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernmentState {
    /// Income/profit tax rate in `[0, 1]`.
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_rate: Decimal,
    /// Daily welfare paid to every persona.
    #[serde(with = "rust_decimal::serde::float")]
    pub welfare: Decimal,
    /// Treasury balance (may go negative).
    #[serde(with = "rust_decimal::serde::float")]
    pub cash: Decimal,
    /// Standing subsidies per industry.
    pub subsidies: Vec<Subsidy>,
}
