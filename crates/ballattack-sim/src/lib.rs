//! Simulation engine for BALL ATTACK.
//!
//! Owns the entity pools, advances the combat systems once per frame,
//! and produces `CombatSnapshot`s for the frontend. Completely headless
//! (no rendering or audio dependency), enabling deterministic testing.

pub mod damage;
pub mod engine;
pub mod pool;
pub mod systems;

pub use ballattack_core as core;
pub use engine::CombatEngine;
