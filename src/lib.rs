//! Weekly school timetable generation.
//!
//! Register teachers, classes and subjects in a [`registry::Registry`], then
//! run [`solver::solve`] (or drive a [`solver::Solver`] over a
//! [`state::ScheduleState`] directly to inspect partial results).

pub mod config;
pub mod constraints;
pub mod data;
pub mod error;
pub mod registry;
pub mod score;
pub mod server;
pub mod solver;
pub mod state;
