//! Enemy attack ballistics: the attack/rest duty cycle, elevation-gated
//! candidate selection, shell flight, and player-hit queries.

use glam::DVec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use ballattack_core::constants::*;
use ballattack_core::enums::{AttackCyclePhase, SoundCue};
use ballattack_core::events::FxEvent;

use crate::pool::{Pool, Slot};
use crate::systems::enemies::EnemyPopulation;

/// Two-phase duty cycle: Attack (firing allowed) ⇄ Wait (rest).
/// Transitions are purely time-based, unconditional on combat outcome.
#[derive(Debug, Clone, Copy)]
pub struct AttackCycle {
    pub phase: AttackCyclePhase,
    pub elapsed: f64,
}

impl AttackCycle {
    pub fn new() -> Self {
        Self {
            phase: AttackCyclePhase::Attack,
            elapsed: 0.0,
        }
    }

    /// Accumulate `dt` and roll over as many phase boundaries as it covers.
    pub fn advance(&mut self, dt: f64) {
        self.elapsed += dt;
        loop {
            match self.phase {
                AttackCyclePhase::Attack if self.elapsed >= ATTACK_PHASE_SECS => {
                    self.elapsed -= ATTACK_PHASE_SECS;
                    self.phase = AttackCyclePhase::Wait;
                }
                AttackCyclePhase::Wait if self.elapsed >= WAIT_PHASE_SECS => {
                    self.elapsed -= WAIT_PHASE_SECS;
                    self.phase = AttackCyclePhase::Attack;
                }
                _ => break,
            }
        }
    }

    pub fn is_attack_phase(&self) -> bool {
        self.phase == AttackCyclePhase::Attack
    }
}

impl Default for AttackCycle {
    fn default() -> Self {
        Self::new()
    }
}

/// One pooled enemy shell.
#[derive(Debug, Clone)]
pub struct EnemyShell {
    pub active: bool,
    pub position: DVec3,
    pub velocity: DVec3,
    /// Visual axis (aim direction at launch).
    pub axis: DVec3,
    /// Emissive-glow intensity, oscillated in flight (cosmetic).
    pub glow: f64,
    pub age: f64,
    /// Slot id of the firing enemy.
    pub source: Option<usize>,
}

impl EnemyShell {
    fn inert() -> Self {
        Self {
            active: false,
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
            axis: DVec3::Z,
            glow: SHELL_GLOW_BASE,
            age: 0.0,
            source: None,
        }
    }
}

impl Slot for EnemyShell {
    fn is_active(&self) -> bool {
        self.active
    }
}

/// An enemy in its post-shot cooldown.
#[derive(Debug, Clone, Copy)]
struct Attacker {
    slot: usize,
    started: f64,
}

/// Owns enemy shells, the duty cycle, and the attacker cooldown set.
pub struct EnemyFireSystem {
    shells: Pool<EnemyShell>,
    cycle: AttackCycle,
    attackers: Vec<Attacker>,
    last_shot_at: Option<f64>,
}

impl EnemyFireSystem {
    pub fn new() -> Self {
        Self {
            shells: Pool::from_fn(SHELL_POOL_CAPACITY, |_| EnemyShell::inert()),
            cycle: AttackCycle::new(),
            attackers: Vec::new(),
            last_shot_at: None,
        }
    }

    /// Advance the duty cycle, shells, cooldowns, and fire at eligible
    /// enemies.
    pub fn update(
        &mut self,
        dt: f64,
        now: f64,
        player: DVec3,
        enemies: &EnemyPopulation,
        rng: &mut ChaCha8Rng,
        fx: &mut Vec<FxEvent>,
    ) {
        self.cycle.advance(dt);
        self.update_projectiles(dt);
        self.attackers
            .retain(|a| now - a.started < ATTACKER_COOLDOWN_SECS);

        let eligible = self.check_attack_conditions(now, player, enemies);
        if !eligible.is_empty() {
            self.execute_attack(&eligible, now, player, enemies, rng, fx);
        }
    }

    /// Enemies allowed to fire this frame. Empty unless the cycle is in its
    /// attack phase, the global fire interval has elapsed, and the cooldown
    /// set is below the concurrency cap. A candidate must be live, not
    /// already attacking, and see the player inside the elevation window
    /// between its surface normal and the player direction. Degenerate
    /// directions mean "no attack possible".
    pub fn check_attack_conditions(
        &self,
        now: f64,
        player: DVec3,
        enemies: &EnemyPopulation,
    ) -> Vec<usize> {
        if !self.cycle.is_attack_phase() {
            return Vec::new();
        }
        if let Some(last) = self.last_shot_at {
            if now - last < ENEMY_FIRE_INTERVAL_SECS {
                return Vec::new();
            }
        }
        if self.attackers.len() >= MAX_SIMULTANEOUS_ATTACKS {
            return Vec::new();
        }

        enemies
            .enumerate()
            .filter(|(slot, enemy)| {
                enemy.active
                    && !enemy.destroying
                    && !self.attackers.iter().any(|a| a.slot == *slot)
            })
            .filter_map(|(slot, enemy)| {
                let up = enemy.position.try_normalize()?;
                let to_player = (player - enemy.position).try_normalize()?;
                let angle = up.dot(to_player).clamp(-1.0, 1.0).acos().to_degrees();
                (ATTACK_ANGLE_MIN_DEG..=ATTACK_ANGLE_MAX_DEG)
                    .contains(&angle)
                    .then_some(slot)
            })
            .collect()
    }

    /// Fire at up to (cap − currently attacking) of the eligible enemies,
    /// registering each with a start timestamp for its cooldown.
    pub fn execute_attack(
        &mut self,
        eligible: &[usize],
        now: f64,
        player: DVec3,
        enemies: &EnemyPopulation,
        rng: &mut ChaCha8Rng,
        fx: &mut Vec<FxEvent>,
    ) {
        let budget = MAX_SIMULTANEOUS_ATTACKS.saturating_sub(self.attackers.len());
        for &slot in eligible.iter().take(budget) {
            let Some(enemy) = enemies.get(slot) else {
                continue;
            };
            if self.fire_at_player(slot, enemy.position, player, rng, fx) {
                self.attackers.push(Attacker { slot, started: now });
                self.last_shot_at = Some(now);
            }
        }
    }

    /// Launch one shell from `from` toward the player with a random
    /// perpendicular spread. Silent no-op (false) on pool exhaustion or a
    /// degenerate aim.
    pub fn fire_at_player(
        &mut self,
        source: usize,
        from: DVec3,
        player: DVec3,
        rng: &mut ChaCha8Rng,
        fx: &mut Vec<FxEvent>,
    ) -> bool {
        let Some(aim) = (player - from).try_normalize() else {
            return false;
        };

        let raw = DVec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let spread = match (raw - aim * raw.dot(aim)).try_normalize() {
            Some(perp) => perp * (rng.gen::<f64>() * SHELL_AIM_SPREAD),
            None => DVec3::ZERO,
        };
        let Some(dir) = (aim + spread).try_normalize() else {
            return false;
        };

        let Some((_, shell)) = self.shells.acquire_mut() else {
            return false;
        };
        shell.active = true;
        shell.position = from;
        shell.velocity = dir * SHELL_SPEED;
        shell.axis = dir;
        shell.glow = SHELL_GLOW_BASE;
        shell.age = 0.0;
        shell.source = Some(source);

        fx.push(FxEvent::Sound {
            cue: SoundCue::EnemyShellFired,
        });
        true
    }

    /// Advance shells; retire on surface contact, range envelope, or
    /// lifetime. The glow oscillation is cosmetic only.
    pub fn update_projectiles(&mut self, dt: f64) {
        for shell in self.shells.iter_mut() {
            if !shell.active {
                continue;
            }
            shell.age += dt;
            shell.position += shell.velocity * dt;
            shell.glow = SHELL_GLOW_BASE
                + SHELL_GLOW_AMPLITUDE
                    * (shell.age * SHELL_GLOW_FREQ_HZ * std::f64::consts::TAU).sin();

            let range = shell.position.length();
            if range <= EARTH_RADIUS || range >= SHELL_MAX_RANGE || shell.age >= SHELL_LIFETIME_SECS
            {
                shell.active = false;
            }
        }
    }

    /// Every shell within the player's hit sphere. The caller decides how
    /// many to apply (the reference driver takes the first).
    pub fn check_player_hit(&self, player: DVec3, player_radius: f64) -> Vec<usize> {
        self.shells
            .enumerate()
            .filter(|(_, shell)| {
                shell.active && shell.position.distance(player) <= player_radius + SHELL_RADIUS
            })
            .map(|(slot, _)| slot)
            .collect()
    }

    /// Release one shell (after an applied player hit).
    pub fn retire_shell(&mut self, slot: usize) {
        if let Some(shell) = self.shells.get_mut(slot) {
            shell.active = false;
        }
    }

    // --- Queries ---

    pub fn cycle(&self) -> &AttackCycle {
        &self.cycle
    }

    pub fn is_attack_phase(&self) -> bool {
        self.cycle.is_attack_phase()
    }

    pub fn active_shell_count(&self) -> usize {
        self.shells.active_count()
    }

    pub fn attacking_count(&self) -> usize {
        self.attackers.len()
    }

    pub fn shells(&self) -> impl Iterator<Item = &EnemyShell> {
        self.shells.iter()
    }

    pub fn shell_pool(&self) -> &Pool<EnemyShell> {
        &self.shells
    }
}

impl Default for EnemyFireSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballattack_geo::spherical;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    #[test]
    fn duty_cycle_periodicity() {
        let mut cycle = AttackCycle::new();
        let dt = 1.0 / 60.0;
        let period = ATTACK_PHASE_SECS + WAIT_PHASE_SECS;
        let mut t = 0.0;
        for _ in 0..(period * 3.0 / dt) as u32 {
            let phase_time = t % period;
            let expected_attack = phase_time < ATTACK_PHASE_SECS;
            assert_eq!(
                cycle.is_attack_phase(),
                expected_attack,
                "phase mismatch at t={t}"
            );
            cycle.advance(dt);
            t += dt;
        }
    }

    #[test]
    fn duty_cycle_rolls_over_large_steps() {
        let mut cycle = AttackCycle::new();
        cycle.advance(ATTACK_PHASE_SECS + WAIT_PHASE_SECS + 0.1);
        assert!(cycle.is_attack_phase());
        assert!((cycle.elapsed - 0.1).abs() < 1e-9);
    }

    #[test]
    fn elevation_window_gates_candidates() {
        let mut enemies = EnemyPopulation::new();
        let surface = EARTH_RADIUS + ENEMY_ALTITUDE;
        let enemy_pos = spherical::surface_point(0.0, 0.0, surface);
        enemies.add_enemy_at(enemy_pos, None).unwrap();
        let system = EnemyFireSystem::new();

        // Player directly overhead: angle 0°, below the minimum.
        let overhead = enemy_pos * 2.0;
        assert!(system.check_attack_conditions(10.0, overhead, &enemies).is_empty());

        // Player at ~45° elevation: eligible.
        let up = enemy_pos.normalize();
        let north = DVec3::Y;
        let oblique = enemy_pos + (up + north).normalize() * 0.5;
        assert_eq!(
            system.check_attack_conditions(10.0, oblique, &enemies),
            vec![0]
        );

        // Player on the far side: beyond the horizon, not eligible.
        let behind = -enemy_pos * 2.0;
        assert!(system.check_attack_conditions(10.0, behind, &enemies).is_empty());
    }

    #[test]
    fn firing_registers_cooldown_and_respects_cap() {
        let mut enemies = EnemyPopulation::new();
        let surface = EARTH_RADIUS + ENEMY_ALTITUDE;
        let mut rng = rng();
        for i in 0..60 {
            let lat = -30.0 + i as f64;
            enemies
                .add_enemy_at(spherical::surface_point(lat, 10.0, surface), None)
                .unwrap();
        }
        let mut system = EnemyFireSystem::new();
        let mut fx = Vec::new();
        // Orbit above the middle of the enemy band: >50 enemies inside the
        // elevation window.
        let player = spherical::surface_point(20.0, 10.0, 1.8);

        let eligible = system.check_attack_conditions(10.0, player, &enemies);
        assert!(eligible.len() > MAX_SIMULTANEOUS_ATTACKS);
        system.execute_attack(&eligible, 10.0, player, &enemies, &mut rng, &mut fx);
        assert_eq!(system.attacking_count(), MAX_SIMULTANEOUS_ATTACKS);
        assert_eq!(system.attacking_count(), system.active_shell_count());

        // Inside the global fire interval nothing more may fire.
        assert!(system
            .check_attack_conditions(10.0 + ENEMY_FIRE_INTERVAL_SECS * 0.5, player, &enemies)
            .is_empty());
    }

    #[test]
    fn cooldown_expires_after_one_second() {
        let mut enemies = EnemyPopulation::new();
        let surface = EARTH_RADIUS + ENEMY_ALTITUDE;
        let mut rng = rng();
        enemies
            .add_enemy_at(spherical::surface_point(20.0, 0.0, surface), None)
            .unwrap();
        let mut system = EnemyFireSystem::new();
        let mut fx = Vec::new();
        // ~25° of arc between enemy and the player's sub-point: inside the
        // elevation window for an orbit at 1.8.
        let player = spherical::surface_point(45.0, 0.0, 1.8);

        system.update(1.0 / 60.0, 0.5, player, &enemies, &mut rng, &mut fx);
        assert_eq!(system.attacking_count(), 1, "lone enemy fires");

        // Still cooling down: no re-selection.
        system.update(1.0 / 60.0, 1.0, player, &enemies, &mut rng, &mut fx);
        assert_eq!(system.attacking_count(), 1);
        assert_eq!(system.active_shell_count(), 1);

        // Past the cooldown the attacker is released and fires again.
        system.update(
            1.0 / 60.0,
            0.5 + ATTACKER_COOLDOWN_SECS + 0.01,
            player,
            &enemies,
            &mut rng,
            &mut fx,
        );
        assert_eq!(system.attacking_count(), 1);
        assert_eq!(system.active_shell_count(), 2);
    }

    #[test]
    fn shells_retire_on_surface_and_range() {
        let mut system = EnemyFireSystem::new();
        let mut rng = rng();
        let mut fx = Vec::new();
        let from = spherical::surface_point(0.0, 0.0, EARTH_RADIUS + ENEMY_ALTITUDE);

        // Aim at a player high above; the shell eventually exits the range
        // envelope and is released.
        let player = from.normalize() * (SHELL_MAX_RANGE + 1.0);
        assert!(system.fire_at_player(0, from, player, &mut rng, &mut fx));
        for _ in 0..60 * 60 {
            system.update_projectiles(1.0 / 60.0);
        }
        assert_eq!(system.active_shell_count(), 0);
    }

    #[test]
    fn player_hit_detection() {
        let mut system = EnemyFireSystem::new();
        let mut rng = rng();
        let mut fx = Vec::new();
        let from = spherical::surface_point(45.0, 0.0, EARTH_RADIUS + ENEMY_ALTITUDE);
        // Close enough that the aim spread cannot push the shell outside
        // the player's hit sphere.
        let player = from + from.normalize() * 0.2;

        assert!(system.fire_at_player(3, from, player, &mut rng, &mut fx));
        // March the shell until it reaches the player's hit sphere.
        let mut hit = Vec::new();
        for _ in 0..60 * 20 {
            system.update_projectiles(1.0 / 60.0);
            hit = system.check_player_hit(player, PLAYER_RADIUS);
            if !hit.is_empty() {
                break;
            }
        }
        assert_eq!(hit.len(), 1);
        system.retire_shell(hit[0]);
        assert_eq!(system.active_shell_count(), 0);
    }
}
