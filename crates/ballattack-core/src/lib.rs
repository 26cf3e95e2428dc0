//! Core types and definitions for the BALL ATTACK combat simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! commands, state snapshots, events, enums, and constants.
//! It has no dependency on any rendering or runtime framework.

pub mod commands;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
