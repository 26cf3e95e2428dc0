//! Combat snapshot — the complete visible state handed to the frontend
//! each tick.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{Alert, FxEvent, GameEvent};
use crate::types::{Rgb, SimTime};

/// Complete simulation state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub cycle: AttackCyclePhase,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub parents: Vec<ParentView>,
    pub bullets: Vec<BulletView>,
    pub shells: Vec<ShellView>,
    pub flashes: Vec<FlashView>,
    pub score: ScoreView,
    pub fx: Vec<FxEvent>,
    pub events: Vec<GameEvent>,
    pub alerts: Vec<Alert>,
}

/// A visible child enemy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    /// Pool slot id.
    pub slot: usize,
    pub position: DVec3,
    /// Render scale (shrinks during the destroy animation).
    pub scale: f64,
    pub color: Rgb,
    pub destroying: bool,
    /// Id of the parent that spawned this enemy, if any.
    pub parent: Option<usize>,
}

/// A visible parent enemy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentView {
    pub id: usize,
    pub position: DVec3,
    pub target: DVec3,
    pub moving: bool,
    pub hp: f64,
    pub max_hp: f64,
    /// Remaining healing-glow time (seconds, 0 when idle).
    pub heal_glow: f64,
    /// Remaining hit-flash time (seconds, 0 when idle).
    pub hit_flash: f64,
}

/// A player bullet in flight. The position is the rendered
/// (oscillation-perturbed) one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletView {
    pub position: DVec3,
}

/// An enemy shell in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellView {
    pub position: DVec3,
    /// Visual axis (aim direction at launch).
    pub axis: DVec3,
    /// Current emissive-glow intensity.
    pub glow: f64,
}

/// An active impact flash light.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashView {
    pub position: DVec3,
    pub intensity: f64,
    pub radius: f64,
}

/// Player platform state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: DVec3,
    pub lives: u32,
}

/// Running score for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub stage: u32,
    pub enemies_spawned: u64,
    pub enemies_destroyed: u64,
    /// destroyed / spawned, 0 when nothing has spawned.
    pub destroy_rate: f64,
    pub parents_alive: usize,
    pub shots_fired: u64,
}
