//! Events emitted by the simulation for rendering, audio, and UI feedback.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Rgb;

/// Fire-and-forget effect events for the frontend.
/// The simulation never waits on or reads back any of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FxEvent {
    /// Spawn a particle explosion.
    Explosion {
        position: DVec3,
        scale: f64,
        color: Rgb,
    },
    /// Spawn a short-lived point light.
    PointLight {
        position: DVec3,
        intensity: f64,
        radius: f64,
    },
    /// Play a sound.
    Sound { cue: SoundCue },
}

/// Lifecycle notifications for the game/UI layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Every child enemy is gone (destroyed or never placed).
    AllEnemiesDestroyed,
    /// All enemies and parents are gone; the stage is over.
    StageCleared { stage: u32 },
    /// A shell reached the player.
    PlayerHit { lives_left: u32 },
    /// Player out of lives.
    GameOver { stage: u32 },
}

/// Diagnostic alert for the UI alert queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub tick: u64,
}
