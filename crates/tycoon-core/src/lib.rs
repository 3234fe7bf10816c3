//! Game rules, commands, and session orchestration for Energy Tycoon.
//!
//! This crate owns everything between the world model and the HTTP
//! surface: configuration, fresh-game seeding and save restoration, the
//! command handlers that mutate state, the accrual tick, the skill
//! system, and the per-player session with its scheduler task.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `tycoon-config.yaml` into
//!   strongly-typed structs, with environment overrides.
//! - [`state`] -- Fresh-game seeding, save restoration, and startup
//!   validation of the universe and skill graph.
//! - [`skills`] -- The seeded skill table, derived skill states, and
//!   prerequisite-graph validation.
//! - [`commands`] -- Command dispatch: selection, placement, planet
//!   switching, discovery, skill unlocks, research investment.
//! - [`tick`] -- The accrual tick: power totals, income, research timer.
//! - [`session`] -- Per-player [`Session`] and the scheduler task.
//!
//! [`Session`]: session::Session

pub mod commands;
pub mod config;
pub mod session;
pub mod skills;
pub mod state;
pub mod tick;
