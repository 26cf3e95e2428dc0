//! Parent enemies: large mobile units that wander the globe, spawn child
//! enemies near themselves, and take flat (non-probabilistic) blast damage.
//!
//! When the last surviving parent dies, every active child is force-
//! destroyed in staggered batches rather than instantaneously.

use glam::DVec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use ballattack_core::constants::*;
use ballattack_core::enums::AlertLevel;
use ballattack_core::events::{Alert, FxEvent};
use ballattack_geo::spherical;

use crate::systems::enemies::EnemyPopulation;

/// One parent enemy. Dead parents keep their record so ids stay stable.
#[derive(Debug, Clone)]
pub struct ParentEnemy {
    pub id: usize,
    pub alive: bool,
    pub hp: f64,
    pub max_hp: f64,
    pub position: DVec3,
    pub target: DVec3,
    pub moving: bool,
    pub move_speed: f64,
    pub spawn_timer: f64,
    /// Remaining healing-glow time (visual only).
    pub heal_glow: f64,
    /// Child that last transferred energy (bookkeeping only).
    pub last_heal_source: Option<usize>,
    /// Remaining hit-flash time (visual only).
    pub hit_flash: f64,
}

/// In-progress last-parent cascade.
#[derive(Debug, Clone)]
struct Cascade {
    timer: f64,
}

/// Owns every parent enemy and the last-parent cascade rule.
pub struct ParentEnemySystem {
    parents: Vec<ParentEnemy>,
    ever_created: u64,
    cascade: Option<Cascade>,
}

impl ParentEnemySystem {
    pub fn new() -> Self {
        Self {
            parents: Vec::new(),
            ever_created: 0,
            cascade: None,
        }
    }

    /// Create a parent at a random surface position. A wander target is
    /// picked shortly after by the idle retarget roll in `update`.
    pub fn add_parent(&mut self, rng: &mut ChaCha8Rng) -> usize {
        let id = self.parents.len();
        let lat = rng.gen_range(-PARENT_LAT_CLAMP_DEG..PARENT_LAT_CLAMP_DEG);
        let lng = rng.gen_range(-180.0..180.0);
        let position = spherical::surface_point(lat, lng, EARTH_RADIUS + PARENT_ALTITUDE);
        self.parents.push(ParentEnemy {
            id,
            alive: true,
            hp: PARENT_MAX_HP,
            max_hp: PARENT_MAX_HP,
            position,
            target: position,
            moving: false,
            move_speed: PARENT_MOVE_SPEED,
            spawn_timer: 0.0,
            heal_glow: 0.0,
            last_heal_source: None,
            hit_flash: 0.0,
        });
        self.ever_created += 1;
        id
    }

    /// Advance movement, child spawning, visual timers, and any running
    /// cascade.
    pub fn update(
        &mut self,
        dt: f64,
        rng: &mut ChaCha8Rng,
        enemies: &mut EnemyPopulation,
        alerts: &mut Vec<Alert>,
        fx: &mut Vec<FxEvent>,
        tick: u64,
    ) {
        for parent in self.parents.iter_mut() {
            if !parent.alive {
                continue;
            }

            Self::advance_movement(parent, dt, rng);

            parent.spawn_timer += dt;
            if parent.spawn_timer >= CHILD_SPAWN_INTERVAL_SECS {
                parent.spawn_timer -= CHILD_SPAWN_INTERVAL_SECS;
                Self::try_spawn_child(parent, rng, enemies, alerts, tick);
            }

            parent.heal_glow = (parent.heal_glow - dt).max(0.0);
            parent.hit_flash = (parent.hit_flash - dt).max(0.0);
        }

        self.advance_cascade(dt, enemies, fx);
    }

    /// Surface wander: quaternion-rotate toward the target, never lerp, so
    /// the surface-radius invariant holds exactly. Idle parents retarget
    /// with probability dt / mean-delay.
    fn advance_movement(parent: &mut ParentEnemy, dt: f64, rng: &mut ChaCha8Rng) {
        if parent.moving {
            parent.position =
                spherical::rotate_toward(parent.position, parent.target, parent.move_speed * dt);
            if spherical::angular_distance(parent.position, parent.target)
                <= PARENT_ARRIVE_EPSILON
            {
                parent.moving = false;
            }
        } else if rng.gen_bool((dt / PARENT_RETARGET_MEAN_SECS).clamp(0.0, 1.0)) {
            let bearing = rng.gen_range(0.0..std::f64::consts::TAU);
            let arc = rng.gen_range(
                PARENT_WANDER_MIN_DEG.to_radians()..PARENT_WANDER_MAX_DEG.to_radians(),
            );
            let radius = EARTH_RADIUS + PARENT_ALTITUDE;
            let target = spherical::offset_by_bearing(parent.position, bearing, arc, radius);
            parent.target = spherical::clamp_latitude(target, PARENT_LAT_CLAMP_DEG, radius);
            parent.moving = true;
        }
    }

    /// Search three expanding ring bands around the parent for a spot clear
    /// of existing children; place the first candidate that fits. An
    /// abandoned cycle is diagnostics only, never an error.
    fn try_spawn_child(
        parent: &ParentEnemy,
        rng: &mut ChaCha8Rng,
        enemies: &mut EnemyPopulation,
        alerts: &mut Vec<Alert>,
        tick: u64,
    ) {
        let surface = EARTH_RADIUS + ENEMY_ALTITUDE;
        for &(band_min, band_max) in CHILD_SPAWN_BANDS.iter() {
            for _ in 0..CHILD_SPAWN_SAMPLES_PER_BAND {
                let bearing = rng.gen_range(0.0..std::f64::consts::TAU);
                let arc = rng.gen_range(band_min..band_max);
                let candidate =
                    spherical::offset_by_bearing(parent.position, bearing, arc, surface);
                let clear = enemies
                    .active_positions()
                    .all(|p| p.distance(candidate) >= CHILD_SPAWN_CLEARANCE);
                if !clear {
                    continue;
                }
                if enemies.add_enemy_at(candidate, Some(parent.id)).is_none() {
                    alerts.push(Alert {
                        level: AlertLevel::Info,
                        message: format!("child pool exhausted; parent {} skipped spawn", parent.id),
                        tick,
                    });
                }
                return;
            }
        }
        alerts.push(Alert {
            level: AlertLevel::Info,
            message: format!("no clear spawn ring around parent {}", parent.id),
            tick,
        });
    }

    /// Apply flat damage to every alive parent within `radius` of `center`.
    /// Kills dispose the parent; killing the last survivor starts the child
    /// cascade.
    pub fn check_attack(
        &mut self,
        center: DVec3,
        radius: f64,
        damage: f64,
        fx: &mut Vec<FxEvent>,
    ) {
        let mut killed_any = false;
        for parent in self.parents.iter_mut() {
            if !parent.alive || parent.position.distance(center) > radius {
                continue;
            }
            parent.hp -= damage;
            parent.hit_flash = PARENT_HIT_FLASH_SECS;
            fx.push(FxEvent::Explosion {
                position: parent.position,
                scale: PARENT_HIT_EXPLOSION_SCALE,
                color: PARENT_HIT_COLOR,
            });
            if parent.hp <= 0.0 {
                parent.hp = 0.0;
                parent.alive = false;
                killed_any = true;
                fx.push(FxEvent::Explosion {
                    position: parent.position,
                    scale: PARENT_DEATH_EXPLOSION_SCALE,
                    color: PARENT_HIT_COLOR,
                });
            }
        }

        if killed_any && self.alive_count() == 0 {
            // Prime the timer so the first batch goes out on the next update.
            self.cascade = Some(Cascade {
                timer: CASCADE_STAGGER_SECS,
            });
        }
    }

    /// Drain active children in batches of CASCADE_BATCH_SIZE, one batch per
    /// CASCADE_STAGGER_SECS of accumulated simulation time.
    fn advance_cascade(&mut self, dt: f64, enemies: &mut EnemyPopulation, fx: &mut Vec<FxEvent>) {
        let Some(cascade) = &mut self.cascade else {
            return;
        };
        cascade.timer += dt;
        let mut drained = false;
        while cascade.timer >= CASCADE_STAGGER_SECS {
            cascade.timer -= CASCADE_STAGGER_SECS;
            if enemies.force_destroy_batch(CASCADE_BATCH_SIZE, fx) == 0 {
                drained = true;
                break;
            }
        }
        if drained {
            self.cascade = None;
        }
    }

    /// Restore a fixed amount of hit points and start the healing glow.
    /// The transfer trigger lives outside this core; only the bookkeeping
    /// is here.
    pub fn receive_energy(&mut self, parent_id: usize, child_id: usize) {
        let Some(parent) = self.parents.get_mut(parent_id) else {
            return;
        };
        if !parent.alive {
            return;
        }
        parent.hp = (parent.hp + PARENT_HEAL_HP).min(parent.max_hp);
        parent.heal_glow = PARENT_HEAL_GLOW_SECS;
        parent.last_heal_source = Some(child_id);
    }

    // --- Queries ---

    pub fn alive_count(&self) -> usize {
        self.parents.iter().filter(|p| p.alive).count()
    }

    /// Zero alive AND at least one ever created — never reports "cleared"
    /// before any parent existed.
    pub fn all_destroyed(&self) -> bool {
        self.ever_created > 0 && self.alive_count() == 0
    }

    pub fn ever_created(&self) -> u64 {
        self.ever_created
    }

    pub fn cascade_running(&self) -> bool {
        self.cascade.is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParentEnemy> {
        self.parents.iter()
    }

    pub fn get(&self, id: usize) -> Option<&ParentEnemy> {
        self.parents.get(id)
    }
}

impl Default for ParentEnemySystem {
    fn default() -> Self {
        Self::new()
    }
}
