//! Combat engine — the driver of the simulation.
//!
//! `CombatEngine` owns every system and pool, processes driver commands,
//! advances the combat loop once per frame, and produces `CombatSnapshot`s.
//! Completely headless (no rendering or audio dependency), enabling
//! deterministic testing.

use std::collections::VecDeque;

use glam::DVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use ballattack_core::commands::CombatCommand;
use ballattack_core::constants::*;
use ballattack_core::enums::{GamePhase, SoundCue};
use ballattack_core::events::{Alert, FxEvent, GameEvent};
use ballattack_core::state::CombatSnapshot;
use ballattack_core::types::SimTime;

use crate::systems;
use crate::systems::cannon::PlayerCannon;
use crate::systems::enemies::EnemyPopulation;
use crate::systems::enemy_fire::EnemyFireSystem;
use crate::systems::parents::ParentEnemySystem;

/// Configuration for starting a new simulation.
pub struct CombatConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Starting life count.
    pub lives: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            lives: PLAYER_LIVES,
        }
    }
}

/// Player platform state as the simulation sees it.
#[derive(Debug, Clone, Copy)]
pub struct PlayerState {
    pub position: DVec3,
    pub lives: u32,
}

/// Running score tracked by the engine.
#[derive(Debug, Clone, Default)]
pub struct ScoreState {
    pub shots_fired: u64,
}

/// The combat engine. Owns all systems and sim state.
pub struct CombatEngine {
    time: SimTime,
    phase: GamePhase,
    stage: u32,
    rng: ChaCha8Rng,
    command_queue: VecDeque<CombatCommand>,

    player: PlayerState,
    enemies: EnemyPopulation,
    parents: ParentEnemySystem,
    cannon: PlayerCannon,
    enemy_fire: EnemyFireSystem,
    score: ScoreState,

    fx_events: Vec<FxEvent>,
    game_events: Vec<GameEvent>,
    alerts: Vec<Alert>,

    fire_requested: bool,
    all_enemies_notified: bool,
}

impl CombatEngine {
    /// Create a new engine with the given config.
    pub fn new(config: CombatConfig) -> Self {
        Self {
            time: SimTime::default(),
            phase: GamePhase::default(),
            stage: 0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            player: PlayerState {
                position: DVec3::new(0.0, 0.0, 1.8),
                lives: config.lives,
            },
            enemies: EnemyPopulation::new(),
            parents: ParentEnemySystem::new(),
            cannon: PlayerCannon::new(),
            enemy_fire: EnemyFireSystem::new(),
            score: ScoreState::default(),
            fx_events: Vec::new(),
            game_events: Vec::new(),
            alerts: Vec::new(),
            fire_requested: false,
            all_enemies_notified: false,
        }
    }

    /// Queue a driver command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: CombatCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = CombatCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one frame of `dt` seconds and return the
    /// resulting snapshot. `dt` is clamped to MAX_FRAME_DT so a stalled
    /// host cannot destabilize the integration.
    pub fn tick(&mut self, dt: f64) -> CombatSnapshot {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.time.advance(dt);
            self.run_systems(dt);
        }

        let fx = std::mem::take(&mut self.fx_events);
        let events = std::mem::take(&mut self.game_events);
        let alerts = std::mem::take(&mut self.alerts);
        systems::snapshot::build_snapshot(self, fx, events, alerts)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single driver command.
    fn handle_command(&mut self, command: CombatCommand) {
        match command {
            CombatCommand::StartStage { enemies, parents } => {
                if matches!(
                    self.phase,
                    GamePhase::Idle | GamePhase::StageClear | GamePhase::GameOver
                ) {
                    if self.phase == GamePhase::GameOver {
                        self.player.lives = PLAYER_LIVES;
                    }
                    self.stage += 1;
                    self.enemies.generate_enemies(
                        enemies,
                        &mut self.rng,
                        &mut self.alerts,
                        self.time.tick,
                    );
                    for _ in 0..parents {
                        self.parents.add_parent(&mut self.rng);
                    }
                    self.all_enemies_notified = false;
                    self.phase = GamePhase::Active;
                }
            }
            CombatCommand::SetPlayerPosition { position } => {
                self.player.position = position;
            }
            CombatCommand::Fire => {
                self.fire_requested = true;
            }
            CombatCommand::TransferEnergy {
                parent_id,
                child_id,
            } => {
                self.parents.receive_energy(parent_id, child_id);
            }
            CombatCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            CombatCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
        }
    }

    /// Run all systems in order for one frame.
    fn run_systems(&mut self, dt: f64) {
        let now = self.time.elapsed_secs;

        // 1. Player fire request (rate-gated; aims at the globe center).
        if std::mem::take(&mut self.fire_requested) {
            let aim = -self.player.position;
            if self
                .cannon
                .fire(now, self.player.position, aim, &mut self.rng, &mut self.fx_events)
            {
                self.score.shots_fired += 1;
            }
        }

        // 2. Bullet flight; surface impacts become this frame's blasts.
        let blasts = self.cannon.update(dt, &mut self.fx_events);

        // 3. Enemy duty cycle, shell flight, and new shots.
        self.enemy_fire.update(
            dt,
            now,
            self.player.position,
            &self.enemies,
            &mut self.rng,
            &mut self.fx_events,
        );

        // 4. Blasts vs children: stochastic destruction per overlap.
        let hits = self.enemies.check_collisions(&blasts);
        for hit in hits {
            self.enemies
                .destroy_enemy(hit.slot, hit.damage, &mut self.rng, &mut self.fx_events);
        }

        // 5. Blasts vs parents: flat damage.
        for blast in &blasts {
            self.parents.check_attack(
                blast.center,
                blast.radius,
                PARENT_BLAST_DAMAGE,
                &mut self.fx_events,
            );
        }

        // 6. Shells vs player: only the first qualifying hit applies.
        let shell_hits = self
            .enemy_fire
            .check_player_hit(self.player.position, PLAYER_RADIUS);
        if let Some(&slot) = shell_hits.first() {
            self.enemy_fire.retire_shell(slot);
            self.fx_events.push(FxEvent::Sound {
                cue: SoundCue::PlayerImpact,
            });
            self.player.lives = self.player.lives.saturating_sub(1);
            self.game_events.push(GameEvent::PlayerHit {
                lives_left: self.player.lives,
            });
            if self.player.lives == 0 {
                self.phase = GamePhase::GameOver;
                self.game_events.push(GameEvent::GameOver { stage: self.stage });
            }
        }

        // 7. Parents: wander, child spawning, timers, cascade.
        self.parents.update(
            dt,
            &mut self.rng,
            &mut self.enemies,
            &mut self.alerts,
            &mut self.fx_events,
            self.time.tick,
        );

        // 8. Child destroy animations.
        self.enemies.update(dt);

        // 9. Terminal notifications.
        if self.enemies.all_destroyed() {
            if !self.all_enemies_notified {
                self.all_enemies_notified = true;
                self.game_events.push(GameEvent::AllEnemiesDestroyed);
            }
        } else {
            self.all_enemies_notified = false;
        }
        if self.phase == GamePhase::Active
            && self.enemies.all_destroyed()
            && self.parents.alive_count() == 0
            && !self.parents.cascade_running()
        {
            self.phase = GamePhase::StageClear;
            self.game_events.push(GameEvent::StageCleared { stage: self.stage });
        }
    }

    // --- Queries (pure reads, safe any time) ---

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn active_enemy_count(&self) -> usize {
        self.enemies.active_count()
    }

    pub fn enemies_destroyed(&self) -> u64 {
        self.enemies.destroyed_count()
    }

    pub fn all_enemies_destroyed(&self) -> bool {
        self.enemies.all_destroyed()
    }

    pub fn destroy_rate(&self) -> f64 {
        self.enemies.destroy_rate()
    }

    pub fn all_parents_destroyed(&self) -> bool {
        self.parents.all_destroyed()
    }

    pub fn active_bullet_count(&self) -> usize {
        self.cannon.active_bullet_count()
    }

    pub fn active_shell_count(&self) -> usize {
        self.enemy_fire.active_shell_count()
    }

    pub fn enemies(&self) -> &EnemyPopulation {
        &self.enemies
    }

    pub fn parents(&self) -> &ParentEnemySystem {
        &self.parents
    }

    pub fn cannon(&self) -> &PlayerCannon {
        &self.cannon
    }

    pub fn enemy_fire(&self) -> &EnemyFireSystem {
        &self.enemy_fire
    }
}

impl Default for CombatEngine {
    fn default() -> Self {
        Self::new(CombatConfig::default())
    }
}
