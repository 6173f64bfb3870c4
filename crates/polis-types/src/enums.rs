//! Enumeration types shared across the Polis workspace.

use serde::{Deserialize, Serialize};

/// Biological sex of a persona, as recorded in the population data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Female.
    #[default]
    Female,
    /// Male.
    Male,
}

/// The industry a firm operates in.
///
/// Each industry maps to the firm type name clients expect in the
/// building tenant topology (see [`Industry::tenant_type`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    /// Produces consumer goods for households.
    ConsumerGood,
    /// Produces capital equipment for other firms.
    Equip,
    /// Extracts raw materials.
    Material,
    /// Sells healthcare to sick personas.
    Healthcare,
}

impl Industry {
    /// Every industry, in a stable order.
    pub const ALL: [Self; 4] = [
        Self::ConsumerGood,
        Self::Equip,
        Self::Material,
        Self::Healthcare,
    ];

    /// Firm type name as it appears in `buildings[].tenants[].type`.
    pub const fn tenant_type(self) -> &'static str {
        match self {
            Self::ConsumerGood => "ConsumerGoodFirm",
            Self::Equip => "CapitalEquipmentFirm",
            Self::Material => "RawMaterialFirm",
            Self::Healthcare => "Hospital",
        }
    }
}

/// Logical notification channel.
///
/// Observers (spectator dashboards) and bound players listen on separate
/// namespaces; a broadcast reaches every connection on one namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    /// Spectator / overview clients (`/simulation`).
    Simulation,
    /// Clients bound to a persona (`/player`).
    Player,
}

impl Namespace {
    /// The namespace path used by clients.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Simulation => "/simulation",
            Self::Player => "/player",
        }
    }
}
