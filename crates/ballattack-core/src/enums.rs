//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Phase of the enemy attack duty cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackCyclePhase {
    /// Enemies may fire at the player.
    #[default]
    Attack,
    /// Rest phase; no firing.
    Wait,
}

/// Sound cues emitted for the frontend audio system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    /// A child enemy was destroyed.
    EnemyDestroyed,
    /// An enemy fired a shell at the player.
    EnemyShellFired,
    /// The player's cannon fired.
    CannonFired,
    /// A shell struck the player.
    PlayerImpact,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No stage running yet.
    #[default]
    Idle,
    /// Simulation advancing.
    Active,
    /// Simulation frozen.
    Paused,
    /// Current stage cleared; waiting for the next one.
    StageClear,
    /// Player out of lives.
    GameOver,
}

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}
