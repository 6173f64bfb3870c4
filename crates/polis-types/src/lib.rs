//! Shared type definitions for the Polis city simulation.
//!
//! This crate is the single source of truth for every type that crosses a
//! crate boundary or goes out over the wire: identifiers, personas,
//! building topology, government state, policy proposals, and the tagged
//! notification events published to observers and players.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifiers for personas, buildings, firms and
//!   transport connections
//! - [`enums`] -- Enumerations (sex, industry, notification namespace)
//! - [`structs`] -- Persona, building and government records
//! - [`proposal`] -- Policy change descriptors voted on by players
//! - [`events`] -- Notification events, one variant per wire event name

pub mod enums;
pub mod events;
pub mod ids;
pub mod proposal;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Industry, Namespace, Sex};
pub use events::{Envelope, Event};
pub use ids::{BuildingId, FirmId, PersonaId, PlayerId};
pub use proposal::Proposal;
pub use structs::{BuildingView, GovernmentState, Persona, Subsidy, TenantView};
