//! Driver commands sent from the host application to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// All possible driver actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CombatCommand {
    // --- Stage control ---
    /// Populate a new stage and start the simulation.
    StartStage { enemies: usize, parents: usize },

    // --- Player input ---
    /// Update the player platform's world position for this frame.
    SetPlayerPosition { position: DVec3 },
    /// Request one cannon shot (subject to the fire-rate gate).
    Fire,

    // --- Parent enemies ---
    /// Route an energy transfer from a child to its parent.
    TransferEnergy { parent_id: usize, child_id: usize },

    // --- Simulation control ---
    /// Freeze the simulation.
    Pause,
    /// Resume a paused simulation.
    Resume,
}
