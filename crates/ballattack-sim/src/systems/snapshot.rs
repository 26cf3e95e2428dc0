//! Snapshot system: queries the live systems and builds a complete
//! `CombatSnapshot`.
//!
//! This system is read-only — it never modifies simulation state.

use ballattack_core::events::{Alert, FxEvent, GameEvent};
use ballattack_core::state::*;

use crate::engine::CombatEngine;

/// Build a complete snapshot of the current frame.
pub fn build_snapshot(
    engine: &CombatEngine,
    fx: Vec<FxEvent>,
    events: Vec<GameEvent>,
    alerts: Vec<Alert>,
) -> CombatSnapshot {
    CombatSnapshot {
        time: engine.time(),
        phase: engine.phase(),
        cycle: engine.enemy_fire().cycle().phase,
        player: PlayerView {
            position: engine.player().position,
            lives: engine.player().lives,
        },
        enemies: build_enemies(engine),
        parents: build_parents(engine),
        bullets: build_bullets(engine),
        shells: build_shells(engine),
        flashes: build_flashes(engine),
        score: ScoreView {
            stage: engine.stage(),
            enemies_spawned: engine.enemies().spawned_count(),
            enemies_destroyed: engine.enemies().destroyed_count(),
            destroy_rate: engine.enemies().destroy_rate(),
            parents_alive: engine.parents().alive_count(),
            shots_fired: engine.score().shots_fired,
        },
        fx,
        events,
        alerts,
    }
}

/// Every occupied enemy slot, destroy animations included.
fn build_enemies(engine: &CombatEngine) -> Vec<EnemyView> {
    engine
        .enemies()
        .enumerate()
        .filter(|(_, e)| e.active)
        .map(|(slot, e)| EnemyView {
            slot,
            position: e.position,
            scale: e.scale,
            color: e.color,
            destroying: e.destroying,
            parent: e.parent,
        })
        .collect()
}

fn build_parents(engine: &CombatEngine) -> Vec<ParentView> {
    engine
        .parents()
        .iter()
        .filter(|p| p.alive)
        .map(|p| ParentView {
            id: p.id,
            position: p.position,
            target: p.target,
            moving: p.moving,
            hp: p.hp,
            max_hp: p.max_hp,
            heal_glow: p.heal_glow,
            hit_flash: p.hit_flash,
        })
        .collect()
}

fn build_bullets(engine: &CombatEngine) -> Vec<BulletView> {
    engine
        .cannon()
        .bullets()
        .filter(|b| b.active)
        .map(|b| BulletView {
            position: b.rendered_position(),
        })
        .collect()
}

fn build_shells(engine: &CombatEngine) -> Vec<ShellView> {
    engine
        .enemy_fire()
        .shells()
        .filter(|s| s.active)
        .map(|s| ShellView {
            position: s.position,
            axis: s.axis,
            glow: s.glow,
        })
        .collect()
}

fn build_flashes(engine: &CombatEngine) -> Vec<FlashView> {
    engine
        .cannon()
        .flashes()
        .filter(|f| f.active)
        .map(|f| FlashView {
            position: f.position,
            intensity: f.intensity,
            radius: f.radius,
        })
        .collect()
}
