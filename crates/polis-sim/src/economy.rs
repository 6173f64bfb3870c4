//! Firms and the buildings they rent space in.

use polis_types::{BuildingId, BuildingView, FirmId, Industry, PersonaId, TenantView};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

// ---------------------------------------------------------------------------
// Firm
// ---------------------------------------------------------------------------

/// A business owned by one persona.
///
/// Revenue and costs are the current day's flows; the city resets them at
/// the start of every day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Firm {
    /// Firm identifier.
    pub id: FirmId,
    /// What the firm produces.
    pub industry: Industry,
    /// The owning persona.
    pub owner: PersonaId,
    /// The building the firm rents space in.
    pub building: BuildingId,
    /// Cash on hand. Negative cash means bankruptcy.
    pub cash: Decimal,
    /// Current workers.
    pub workers: Vec<PersonaId>,
    /// Today's revenue.
    pub revenue: Decimal,
    /// Today's costs.
    pub costs: Decimal,
}

impl Firm {
    /// Open a firm with `capital` in `building`.
    pub fn open(
        industry: Industry,
        owner: PersonaId,
        building: BuildingId,
        capital: Decimal,
    ) -> Self {
        Self {
            id: FirmId::new(),
            industry,
            owner,
            building,
            cash: capital,
            workers: Vec::new(),
            revenue: Decimal::ZERO,
            costs: Decimal::ZERO,
        }
    }

    /// Today's profit, possibly negative.
    pub fn profit(&self) -> Decimal {
        self.revenue.saturating_sub(self.costs)
    }

    /// Whether the firm has run out of money.
    pub fn is_bankrupt(&self) -> bool {
        self.cash.is_sign_negative() && !self.cash.is_zero()
    }

    /// Add to cash and today's revenue.
    pub fn earn(&mut self, amount: Decimal) {
        self.cash = self.cash.saturating_add(amount);
        self.revenue = self.revenue.saturating_add(amount);
    }

    /// Take from cash and add to today's costs.
    pub fn pay(&mut self, amount: Decimal) {
        self.cash = self.cash.saturating_sub(amount);
        self.costs = self.costs.saturating_add(amount);
    }

    /// Open positions given a headcount cap and a monthly payroll budget.
    ///
    /// The firm only hires while it can cover thirty days of wages for the
    /// new headcount.
    pub fn vacancies(&self, max_workers: usize, wage: Decimal) -> usize {
        let by_cap = max_workers.saturating_sub(self.workers.len());
        let monthly = wage.saturating_mul(Decimal::from(30));
        if monthly.is_zero() {
            return by_cap;
        }
        let affordable = self
            .cash
            .max(Decimal::ZERO)
            .checked_div(monthly)
            .and_then(|n| n.trunc().to_usize())
            .unwrap_or(0);
        by_cap.min(affordable.saturating_sub(self.workers.len()))
    }

    /// Start a new day with empty flows.
    pub fn new_day(&mut self) {
        self.revenue = Decimal::ZERO;
        self.costs = Decimal::ZERO;
    }

    /// Wire view of this firm as a tenant.
    pub fn tenant_view(&self) -> TenantView {
        TenantView {
            id: self.id,
            kind: String::from(self.industry.tenant_type()),
        }
    }
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// A building with a fixed number of rentable units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Building {
    /// Building identifier.
    pub id: BuildingId,
    /// Monthly rent per tenant.
    pub rent: Decimal,
    /// Maximum number of tenants.
    pub max_tenants: usize,
    /// Firms currently renting here.
    pub tenants: Vec<FirmId>,
}

impl Building {
    /// Create an empty building.
    pub fn new(max_tenants: usize, rent: Decimal) -> Self {
        Self {
            id: BuildingId::new(),
            rent,
            max_tenants,
            tenants: Vec::new(),
        }
    }

    /// Units still free.
    pub fn available_space(&self) -> usize {
        self.max_tenants.saturating_sub(self.tenants.len())
    }

    /// Add a tenant. Returns `false` if the building is full.
    pub fn add_tenant(&mut self, firm: FirmId) -> bool {
        if self.available_space() == 0 {
            return false;
        }
        self.tenants.push(firm);
        true
    }

    /// Remove a tenant. Returns `false` if it was not renting here.
    pub fn remove_tenant(&mut self, firm: FirmId) -> bool {
        let before = self.tenants.len();
        self.tenants.retain(|id| *id != firm);
        self.tenants.len() != before
    }
}

/// Assemble the wire topology for `buildings`, resolving tenants in `firms`.
pub fn building_views(buildings: &[Building], firms: &[Firm]) -> Vec<BuildingView> {
    buildings
        .iter()
        .map(|building| BuildingView {
            id: building.id,
            tenants: building
                .tenants
                .iter()
                .filter_map(|id| firms.iter().find(|f| f.id == *id))
                .map(Firm::tenant_view)
                .collect(),
        })
        .collect()
}
