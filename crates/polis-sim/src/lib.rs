//! Stock city engine for the Polis simulation.
//!
//! A small agent-based city: personas live, work, fall sick and collect
//! welfare; firms rent space in buildings, hire, pay wages and go bankrupt;
//! a government taxes and spends according to policies players vote on.
//! The engine advances one day at a time and plugs into the session
//! coordinator through [`CityFactory`].
//!
//! # Modules
//!
//! - [`config`] -- [`CityConfig`], the per-session parameters with defaults
//! - [`government`] -- Tax, welfare and subsidy policy and the proposals
//!   that change it
//! - [`economy`] -- Firms and the buildings they rent
//! - [`population`] -- Loading and generating the candidate population
//! - [`city`] -- [`City`], the daily step
//! - [`factory`] -- [`CityFactory`], the coordinator-facing builder

pub mod city;
pub mod config;
pub mod economy;
pub mod factory;
pub mod government;
pub mod population;

pub use city::City;
pub use config::CityConfig;
pub use factory::CityFactory;
pub use government::Government;
