//! Child enemy population: sphere-surface placement, blast resolution,
//! stochastic destruction, and destroy animations.

use glam::DVec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use ballattack_core::constants::*;
use ballattack_core::enums::{AlertLevel, SoundCue};
use ballattack_core::events::{Alert, FxEvent};
use ballattack_core::types::{BlastSphere, Rgb};
use ballattack_geo::spherical;

use crate::damage::ENEMY_BLAST_CURVE;
use crate::pool::{Pool, Slot};

/// One pooled child enemy slot.
#[derive(Debug, Clone)]
pub struct ChildEnemy {
    pub active: bool,
    /// Destroy animation running; the slot is still occupied.
    pub destroying: bool,
    pub position: DVec3,
    pub hp: f64,
    pub max_hp: f64,
    /// Id of the spawning parent, if any. Weak back-reference only.
    pub parent: Option<usize>,
    pub destroy_elapsed: f64,
    pub scale: f64,
    pub color: Rgb,
}

impl ChildEnemy {
    fn inert() -> Self {
        Self {
            active: false,
            destroying: false,
            position: DVec3::ZERO,
            hp: ENEMY_MAX_HP,
            max_hp: ENEMY_MAX_HP,
            parent: None,
            destroy_elapsed: 0.0,
            scale: 1.0,
            color: ENEMY_BASE_COLOR,
        }
    }
}

impl Slot for ChildEnemy {
    fn is_active(&self) -> bool {
        self.active
    }
}

/// A blast overlapping an enemy, with the damage the falloff curve assigns.
#[derive(Debug, Clone, Copy)]
pub struct EnemyHit {
    pub slot: usize,
    pub damage: f64,
}

/// Placement tuning. Defaults mirror the stage constants; tests shrink the
/// globe or widen the spacing to exercise saturation.
#[derive(Debug, Clone, Copy)]
pub struct PlacementParams {
    pub surface_radius: f64,
    pub min_distance: f64,
    pub attempts: u32,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            surface_radius: EARTH_RADIUS + ENEMY_ALTITUDE,
            min_distance: MIN_ENEMY_DISTANCE,
            attempts: PLACEMENT_ATTEMPTS,
        }
    }
}

/// Owns every child enemy slot and their lifecycle.
pub struct EnemyPopulation {
    pool: Pool<ChildEnemy>,
    placement: PlacementParams,
    spawned: u64,
    destroyed: u64,
}

impl EnemyPopulation {
    pub fn new() -> Self {
        Self::with_placement(PlacementParams::default())
    }

    pub fn with_placement(placement: PlacementParams) -> Self {
        Self {
            pool: Pool::from_fn(MAX_ENEMIES, |_| ChildEnemy::inert()),
            placement,
            spawned: 0,
            destroyed: 0,
        }
    }

    /// Place up to `count` enemies at rejection-sampled surface positions.
    /// Placement is best-effort: slots that find no position clear of the
    /// batch within the attempt budget are dropped, and a shortfall is
    /// reported as an Info alert only. Returns the number placed.
    pub fn generate_enemies(
        &mut self,
        count: usize,
        rng: &mut ChaCha8Rng,
        alerts: &mut Vec<Alert>,
        tick: u64,
    ) -> usize {
        let requested = count.min(self.pool.capacity());
        let mut accepted: Vec<DVec3> = Vec::with_capacity(requested);
        let mut placed = 0;

        for _ in 0..requested {
            let Some(position) = Self::sample_clear_position(&accepted, rng, &self.placement)
            else {
                continue;
            };
            let Some((_, slot)) = self.pool.acquire_mut() else {
                break;
            };
            Self::activate(slot, position, None);
            accepted.push(position);
            self.spawned += 1;
            placed += 1;
        }

        if placed < count {
            alerts.push(Alert {
                level: AlertLevel::Info,
                message: format!("enemy placement saturated: {placed}/{count} placed"),
                tick,
            });
        }
        placed
    }

    /// Uniform (lat, lng) samples until one clears every position already
    /// accepted in this batch. Euclidean distance stands in for geodesic
    /// separation, valid while the minimum spacing stays well below the
    /// globe radius.
    fn sample_clear_position(
        accepted: &[DVec3],
        rng: &mut ChaCha8Rng,
        placement: &PlacementParams,
    ) -> Option<DVec3> {
        for _ in 0..placement.attempts {
            let lat = rng.gen_range(-90.0..90.0);
            let lng = rng.gen_range(-180.0..180.0);
            let candidate = spherical::surface_point(lat, lng, placement.surface_radius);
            if accepted
                .iter()
                .all(|p| p.distance(candidate) >= placement.min_distance)
            {
                return Some(candidate);
            }
        }
        None
    }

    /// Direct placement bypassing the rejection sampling, used by parent
    /// enemies spawning children near themselves. `None` when the pool is
    /// exhausted.
    pub fn add_enemy_at(&mut self, position: DVec3, parent: Option<usize>) -> Option<usize> {
        let (slot_id, slot) = self.pool.acquire_mut()?;
        Self::activate(slot, position, parent);
        self.spawned += 1;
        Some(slot_id)
    }

    fn activate(slot: &mut ChildEnemy, position: DVec3, parent: Option<usize>) {
        slot.active = true;
        slot.destroying = false;
        slot.position = position;
        slot.hp = slot.max_hp;
        slot.parent = parent;
        slot.destroy_elapsed = 0.0;
        slot.scale = 1.0;
        slot.color = ENEMY_BASE_COLOR;
    }

    /// Every (blast × live enemy) overlap with its falloff damage. Not
    /// deduplicated per enemy: overlapping blasts in one frame each count.
    pub fn check_collisions(&self, blasts: &[BlastSphere]) -> Vec<EnemyHit> {
        let mut hits = Vec::new();
        for blast in blasts {
            for (slot_id, enemy) in self.pool.enumerate() {
                if !enemy.active || enemy.destroying {
                    continue;
                }
                let distance = enemy.position.distance(blast.center);
                if distance <= blast.radius + ENEMY_RADIUS {
                    hits.push(EnemyHit {
                        slot: slot_id,
                        damage: ENEMY_BLAST_CURVE.at(distance, blast.radius),
                    });
                }
            }
        }
        hits
    }

    /// Roll a stochastic destruction: the damage value IS the kill
    /// probability. Returns whether the enemy started destroying.
    pub fn destroy_enemy(
        &mut self,
        slot_id: usize,
        damage: f64,
        rng: &mut ChaCha8Rng,
        fx: &mut Vec<FxEvent>,
    ) -> bool {
        let Some(enemy) = self.pool.get_mut(slot_id) else {
            return false;
        };
        if !enemy.active || enemy.destroying {
            return false;
        }
        // Destroyed iff sample <= damage; a 1.0 roll always kills, 0.0 never.
        if rng.gen::<f64>() > damage {
            return false;
        }
        enemy.destroying = true;
        enemy.destroy_elapsed = 0.0;
        enemy.hp = 0.0;
        fx.push(FxEvent::Explosion {
            position: enemy.position,
            scale: ENEMY_DESTROY_EXPLOSION_SCALE,
            color: ENEMY_DESTROY_EXPLOSION_COLOR,
        });
        fx.push(FxEvent::Sound {
            cue: SoundCue::EnemyDestroyed,
        });
        self.destroyed += 1;
        true
    }

    /// Flag up to `limit` live enemies as destroying without a probability
    /// roll. Used by the last-parent cascade. Returns how many were flagged.
    pub fn force_destroy_batch(&mut self, limit: usize, fx: &mut Vec<FxEvent>) -> usize {
        let mut flagged = 0;
        for enemy in self.pool.iter_mut() {
            if flagged == limit {
                break;
            }
            if !enemy.active || enemy.destroying {
                continue;
            }
            enemy.destroying = true;
            enemy.destroy_elapsed = 0.0;
            enemy.hp = 0.0;
            fx.push(FxEvent::Explosion {
                position: enemy.position,
                scale: ENEMY_DESTROY_EXPLOSION_SCALE,
                color: ENEMY_DESTROY_EXPLOSION_COLOR,
            });
            fx.push(FxEvent::Sound {
                cue: SoundCue::EnemyDestroyed,
            });
            flagged += 1;
        }
        self.destroyed += flagged as u64;
        flagged
    }

    /// Advance destroy animations: scale down and ramp the tint
    /// red → orange → yellow, then recycle the slot at full progress.
    pub fn update(&mut self, dt: f64) {
        for enemy in self.pool.iter_mut() {
            if !enemy.active || !enemy.destroying {
                continue;
            }
            enemy.destroy_elapsed += dt;
            let progress = (enemy.destroy_elapsed / ENEMY_DESTROY_ANIM_SECS).clamp(0.0, 1.0);
            enemy.scale = 1.0 - progress;
            enemy.color = if progress < 0.5 {
                DESTROY_RAMP_RED.lerp(DESTROY_RAMP_ORANGE, (progress * 2.0) as f32)
            } else {
                DESTROY_RAMP_ORANGE.lerp(DESTROY_RAMP_YELLOW, ((progress - 0.5) * 2.0) as f32)
            };
            if progress >= 1.0 {
                Self::recycle(enemy);
            }
        }
    }

    fn recycle(enemy: &mut ChildEnemy) {
        enemy.active = false;
        enemy.destroying = false;
        enemy.parent = None;
        enemy.hp = enemy.max_hp;
        enemy.destroy_elapsed = 0.0;
        enemy.scale = 1.0;
        enemy.color = ENEMY_BASE_COLOR;
    }

    // --- Queries ---

    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }

    pub fn destroyed_count(&self) -> u64 {
        self.destroyed
    }

    pub fn spawned_count(&self) -> u64 {
        self.spawned
    }

    /// destroyed / spawned, 0 when nothing has spawned yet.
    pub fn destroy_rate(&self) -> f64 {
        if self.spawned == 0 {
            0.0
        } else {
            self.destroyed as f64 / self.spawned as f64
        }
    }

    pub fn all_destroyed(&self) -> bool {
        self.pool.active_count() == 0
    }

    /// Positions of every active enemy (read-only capability handed to the
    /// parent system for spawn clearance checks).
    pub fn active_positions(&self) -> impl Iterator<Item = DVec3> + '_ {
        self.pool.iter().filter(|e| e.active).map(|e| e.position)
    }

    pub fn enumerate(&self) -> impl Iterator<Item = (usize, &ChildEnemy)> {
        self.pool.enumerate()
    }

    pub fn get(&self, slot_id: usize) -> Option<&ChildEnemy> {
        self.pool.get(slot_id)
    }

    pub fn pool(&self) -> &Pool<ChildEnemy> {
        &self.pool
    }
}

impl Default for EnemyPopulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn direct_placement_and_exhaustion() {
        let mut pop = EnemyPopulation::new();
        let p = spherical::surface_point(0.0, 0.0, EARTH_RADIUS + ENEMY_ALTITUDE);
        for _ in 0..MAX_ENEMIES {
            assert!(pop.add_enemy_at(p, Some(0)).is_some());
        }
        // Exhausted pool: silent None, counters untouched.
        assert!(pop.add_enemy_at(p, None).is_none());
        assert_eq!(pop.spawned_count(), MAX_ENEMIES as u64);
        assert_eq!(pop.active_count(), MAX_ENEMIES);
    }

    #[test]
    fn batch_separation_invariant() {
        let mut pop = EnemyPopulation::new();
        let mut rng = rng();
        let mut alerts = Vec::new();
        let placed = pop.generate_enemies(50, &mut rng, &mut alerts, 0);
        assert!(placed > 0);

        let positions: Vec<_> = pop.active_positions().collect();
        for (i, a) in positions.iter().enumerate() {
            for b in positions.iter().skip(i + 1) {
                assert!(
                    a.distance(*b) >= MIN_ENEMY_DISTANCE,
                    "pair closer than minimum separation"
                );
            }
        }
    }

    #[test]
    fn destroy_animation_recycles_slot() {
        let mut pop = EnemyPopulation::new();
        let mut rng = rng();
        let mut fx = Vec::new();
        let p = spherical::surface_point(10.0, 10.0, EARTH_RADIUS + ENEMY_ALTITUDE);
        let slot = pop.add_enemy_at(p, None).unwrap();

        assert!(pop.destroy_enemy(slot, 1.0, &mut rng, &mut fx));
        assert!(pop.get(slot).unwrap().destroying);
        assert_eq!(pop.active_count(), 1, "still occupied during the animation");

        // A second hit on a destroying enemy is ignored.
        assert!(!pop.destroy_enemy(slot, 1.0, &mut rng, &mut fx));

        pop.update(ENEMY_DESTROY_ANIM_SECS + 0.01);
        let enemy = pop.get(slot).unwrap();
        assert!(!enemy.active);
        assert_eq!(enemy.scale, 1.0, "visual state reset");
        assert_eq!(pop.active_count(), 0);
        assert!(pop.all_destroyed());
    }

    #[test]
    fn collision_damage_uses_falloff() {
        let mut pop = EnemyPopulation::new();
        let p = spherical::surface_point(0.0, 0.0, EARTH_RADIUS + ENEMY_ALTITUDE);
        pop.add_enemy_at(p, None).unwrap();

        let direct = pop.check_collisions(&[BlastSphere::new(p, BULLET_BLAST_RADIUS)]);
        assert_eq!(direct.len(), 1);
        assert!((direct[0].damage - BLAST_CENTER_DAMAGE).abs() < 1e-9);

        let far = pop.check_collisions(&[BlastSphere::new(
            p + DVec3::X * (BULLET_BLAST_RADIUS + ENEMY_RADIUS + 0.001),
            BULLET_BLAST_RADIUS,
        )]);
        assert!(far.is_empty());
    }

    #[test]
    fn overlapping_blasts_are_not_deduplicated() {
        let mut pop = EnemyPopulation::new();
        let p = spherical::surface_point(0.0, 0.0, EARTH_RADIUS + ENEMY_ALTITUDE);
        pop.add_enemy_at(p, None).unwrap();

        let blast = BlastSphere::new(p, BULLET_BLAST_RADIUS);
        let hits = pop.check_collisions(&[blast, blast]);
        assert_eq!(hits.len(), 2, "one record per overlapping blast");
    }
}
