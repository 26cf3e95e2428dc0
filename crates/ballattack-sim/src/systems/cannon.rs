//! Player cannon: rate-limited dual-gun fire, bullet flight with cosmetic
//! oscillation, surface-impact detection, and the impact flash-light budget.

use glam::DVec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use ballattack_core::constants::*;
use ballattack_core::enums::SoundCue;
use ballattack_core::events::FxEvent;
use ballattack_core::types::BlastSphere;

use crate::damage::CANNON_DAMAGE_CURVE;
use crate::pool::{Pool, Slot};

/// Per-axis cosmetic flight oscillation. Perturbs only the rendered
/// position; collision testing always uses the base position.
#[derive(Debug, Clone, Copy, Default)]
pub struct OscParams {
    pub amplitude: DVec3,
    pub frequency_hz: DVec3,
    pub phase: DVec3,
}

/// One pooled player bullet.
#[derive(Debug, Clone, Default)]
pub struct CannonBullet {
    pub active: bool,
    /// Base (collision) position.
    pub position: DVec3,
    pub velocity: DVec3,
    pub osc: OscParams,
    pub age: f64,
}

impl CannonBullet {
    /// Base position plus the sinusoidal per-axis offset.
    pub fn rendered_position(&self) -> DVec3 {
        let t = self.age * std::f64::consts::TAU;
        self.position
            + DVec3::new(
                self.osc.amplitude.x * (self.osc.frequency_hz.x * t + self.osc.phase.x).sin(),
                self.osc.amplitude.y * (self.osc.frequency_hz.y * t + self.osc.phase.y).sin(),
                self.osc.amplitude.z * (self.osc.frequency_hz.z * t + self.osc.phase.z).sin(),
            )
    }
}

impl Slot for CannonBullet {
    fn is_active(&self) -> bool {
        self.active
    }
}

/// One pooled impact flash light.
#[derive(Debug, Clone, Default)]
pub struct FlashLight {
    pub active: bool,
    pub position: DVec3,
    pub intensity: f64,
    pub radius: f64,
    pub age: f64,
}

impl Slot for FlashLight {
    fn is_active(&self) -> bool {
        self.active
    }
}

/// Owns player bullets and impact flashes.
pub struct PlayerCannon {
    bullets: Pool<CannonBullet>,
    flashes: Pool<FlashLight>,
    last_fired_at: Option<f64>,
    left_gun: bool,
}

impl PlayerCannon {
    pub fn new() -> Self {
        Self {
            bullets: Pool::from_fn(BULLET_POOL_CAPACITY, |_| CannonBullet::default()),
            flashes: Pool::from_fn(MAX_FLASHES, |_| FlashLight::default()),
            last_fired_at: None,
            left_gun: false,
        }
    }

    /// Attempt one shot at `now` seconds of simulation time. Guns alternate
    /// left/right of the platform and converge on a point
    /// GUN_CONVERGENCE_DISTANCE ahead. Returns false — with no side effect —
    /// when rate-gated, the pool is exhausted, or the aim is degenerate.
    pub fn fire(
        &mut self,
        now: f64,
        origin: DVec3,
        aim: DVec3,
        rng: &mut ChaCha8Rng,
        fx: &mut Vec<FxEvent>,
    ) -> bool {
        if let Some(last) = self.last_fired_at {
            if now - last < CANNON_FIRE_RATE_SECS {
                return false;
            }
        }
        let Some(forward) = aim.try_normalize() else {
            return false;
        };

        // Lateral gun axis; fall back when aiming straight along world Y.
        let mut right = forward.cross(DVec3::Y);
        if right.length_squared() < 1e-12 {
            right = forward.cross(DVec3::X);
        }
        let right = right.normalize();

        let side = if self.left_gun { 1.0 } else { -1.0 };
        let muzzle = origin + right * (GUN_OFFSET * side);
        let convergence = origin + forward * GUN_CONVERGENCE_DISTANCE;
        let Some(dir) = (convergence - muzzle).try_normalize() else {
            return false;
        };

        let Some((_, bullet)) = self.bullets.acquire_mut() else {
            return false;
        };
        bullet.active = true;
        bullet.position = muzzle;
        bullet.velocity = dir * BULLET_SPEED;
        bullet.age = 0.0;
        bullet.osc = OscParams {
            amplitude: DVec3::new(
                rng.gen_range(0.0..BULLET_OSC_AMPLITUDE_MAX),
                rng.gen_range(0.0..BULLET_OSC_AMPLITUDE_MAX),
                rng.gen_range(0.0..BULLET_OSC_AMPLITUDE_MAX),
            ),
            frequency_hz: DVec3::new(
                rng.gen_range(BULLET_OSC_FREQ_MIN_HZ..BULLET_OSC_FREQ_MAX_HZ),
                rng.gen_range(BULLET_OSC_FREQ_MIN_HZ..BULLET_OSC_FREQ_MAX_HZ),
                rng.gen_range(BULLET_OSC_FREQ_MIN_HZ..BULLET_OSC_FREQ_MAX_HZ),
            ),
            phase: DVec3::new(
                rng.gen_range(0.0..std::f64::consts::TAU),
                rng.gen_range(0.0..std::f64::consts::TAU),
                rng.gen_range(0.0..std::f64::consts::TAU),
            ),
        };

        self.left_gun = !self.left_gun;
        self.last_fired_at = Some(now);
        fx.push(FxEvent::Sound {
            cue: SoundCue::CannonFired,
        });
        true
    }

    /// Advance bullet flight and collect surface impacts as blast spheres.
    /// Impacts explode at the rendered (oscillated) position but blast from
    /// the base position.
    pub fn update(&mut self, dt: f64, fx: &mut Vec<FxEvent>) -> Vec<BlastSphere> {
        let mut blasts = Vec::new();
        let mut flash_spots: Vec<DVec3> = Vec::new();

        for bullet in self.bullets.iter_mut() {
            if !bullet.active {
                continue;
            }
            bullet.age += dt;
            bullet.position += bullet.velocity * dt;

            if bullet.position.length() <= EARTH_RADIUS {
                let rendered = bullet.rendered_position();
                fx.push(FxEvent::Explosion {
                    position: rendered,
                    scale: IMPACT_EXPLOSION_SCALE,
                    color: IMPACT_EXPLOSION_COLOR,
                });
                flash_spots.push(rendered);
                blasts.push(BlastSphere::new(bullet.position, BULLET_BLAST_RADIUS));
                bullet.active = false;
                continue;
            }
            if bullet.age >= BULLET_LIFETIME_SECS || bullet.position.length() >= BULLET_MAX_RANGE {
                bullet.active = false;
            }
        }

        for spot in flash_spots {
            self.spawn_flash(spot, fx);
        }
        self.update_flashes(dt);
        blasts
    }

    /// Point lights are a bounded resource: a new flash pre-empts any flash
    /// within the overlap distance, and the concurrent count is capped with
    /// oldest-first eviction.
    fn spawn_flash(&mut self, position: DVec3, fx: &mut Vec<FxEvent>) {
        for flash in self.flashes.iter_mut() {
            if flash.active && flash.position.distance(position) < FLASH_OVERLAP_DISTANCE {
                flash.active = false;
            }
        }
        if self.flashes.active_count() == self.flashes.capacity() {
            if let Some(oldest) = self
                .flashes
                .iter_mut()
                .filter(|f| f.active)
                .max_by(|a, b| a.age.total_cmp(&b.age))
            {
                oldest.active = false;
            }
        }
        if let Some((_, flash)) = self.flashes.acquire_mut() {
            flash.active = true;
            flash.position = position;
            flash.intensity = FLASH_INTENSITY;
            flash.radius = FLASH_RADIUS;
            flash.age = 0.0;
            fx.push(FxEvent::PointLight {
                position,
                intensity: FLASH_INTENSITY,
                radius: FLASH_RADIUS,
            });
        }
    }

    fn update_flashes(&mut self, dt: f64) {
        for flash in self.flashes.iter_mut() {
            if !flash.active {
                continue;
            }
            flash.age += dt;
            if flash.age >= FLASH_LIFETIME_SECS {
                flash.active = false;
                continue;
            }
            flash.intensity = FLASH_INTENSITY * (1.0 - flash.age / FLASH_LIFETIME_SECS);
        }
    }

    /// Damage at `distance` from a bullet impact.
    pub fn calculate_damage(&self, distance: f64) -> f64 {
        CANNON_DAMAGE_CURVE.at(distance, BULLET_BLAST_RADIUS)
    }

    // --- Queries ---

    pub fn active_bullet_count(&self) -> usize {
        self.bullets.active_count()
    }

    pub fn active_flash_count(&self) -> usize {
        self.flashes.active_count()
    }

    pub fn bullets(&self) -> impl Iterator<Item = &CannonBullet> {
        self.bullets.iter()
    }

    pub fn flashes(&self) -> impl Iterator<Item = &FlashLight> {
        self.flashes.iter()
    }

    pub fn bullet_pool(&self) -> &Pool<CannonBullet> {
        &self.bullets
    }
}

impl Default for PlayerCannon {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(3)
    }

    fn platform() -> (DVec3, DVec3) {
        let origin = DVec3::new(0.0, 0.0, 1.8);
        (origin, -origin)
    }

    #[test]
    fn fire_rate_gating() {
        let mut cannon = PlayerCannon::new();
        let mut rng = rng();
        let mut fx = Vec::new();
        let (origin, aim) = platform();

        assert!(cannon.fire(0.0, origin, aim, &mut rng, &mut fx));
        assert_eq!(cannon.active_bullet_count(), 1);

        // Second shot inside the rate window: rejected, no side effects.
        assert!(!cannon.fire(CANNON_FIRE_RATE_SECS * 0.5, origin, aim, &mut rng, &mut fx));
        assert_eq!(cannon.active_bullet_count(), 1);

        assert!(cannon.fire(CANNON_FIRE_RATE_SECS, origin, aim, &mut rng, &mut fx));
        assert_eq!(cannon.active_bullet_count(), 2);
    }

    #[test]
    fn guns_alternate_sides() {
        let mut cannon = PlayerCannon::new();
        let mut rng = rng();
        let mut fx = Vec::new();
        let (origin, aim) = platform();

        cannon.fire(0.0, origin, aim, &mut rng, &mut fx);
        cannon.fire(1.0, origin, aim, &mut rng, &mut fx);
        let muzzles: Vec<DVec3> = cannon
            .bullets()
            .filter(|b| b.active)
            .map(|b| b.position)
            .collect();
        assert_eq!(muzzles.len(), 2);
        assert!(
            muzzles[0].distance(muzzles[1]) > GUN_OFFSET,
            "muzzles on opposite sides"
        );
    }

    #[test]
    fn degenerate_aim_is_rejected() {
        let mut cannon = PlayerCannon::new();
        let mut rng = rng();
        let mut fx = Vec::new();
        assert!(!cannon.fire(0.0, DVec3::new(0.0, 0.0, 1.8), DVec3::ZERO, &mut rng, &mut fx));
        assert_eq!(cannon.active_bullet_count(), 0);
    }

    #[test]
    fn surface_impact_produces_blast_and_releases() {
        let mut cannon = PlayerCannon::new();
        let mut rng = rng();
        let mut fx = Vec::new();
        let (origin, aim) = platform();
        cannon.fire(0.0, origin, aim, &mut rng, &mut fx);

        let mut blasts = Vec::new();
        // 1.8 → 1.0 at BULLET_SPEED is well inside the lifetime.
        for _ in 0..(10.0 / BULLET_SPEED * 60.0) as u32 {
            blasts.extend(cannon.update(1.0 / 60.0, &mut fx));
            if !blasts.is_empty() {
                break;
            }
        }
        assert_eq!(blasts.len(), 1);
        assert!((blasts[0].center.length() - EARTH_RADIUS).abs() < BULLET_SPEED / 60.0 * 2.0);
        assert_eq!(cannon.active_bullet_count(), 0);
        assert_eq!(cannon.active_flash_count(), 1);
    }

    #[test]
    fn flash_overlap_preemption_and_cap() {
        let mut cannon = PlayerCannon::new();
        let mut fx = Vec::new();

        // Two flashes close together: the second pre-empts the first.
        cannon.spawn_flash(DVec3::new(1.0, 0.0, 0.0), &mut fx);
        cannon.spawn_flash(DVec3::new(1.0, FLASH_OVERLAP_DISTANCE * 0.5, 0.0), &mut fx);
        assert_eq!(cannon.active_flash_count(), 1);

        // Fill to the cap with well-separated flashes; the oldest goes.
        for i in 0..MAX_FLASHES + 2 {
            cannon.spawn_flash(DVec3::new(i as f64, 0.0, 10.0), &mut fx);
            cannon.update_flashes(0.01);
        }
        assert_eq!(cannon.active_flash_count(), MAX_FLASHES);
    }

    #[test]
    fn damage_query_matches_curve() {
        let cannon = PlayerCannon::new();
        assert!((cannon.calculate_damage(0.0) - BLAST_CENTER_DAMAGE).abs() < 1e-12);
        assert!(
            (cannon.calculate_damage(BULLET_BLAST_RADIUS) - BLAST_BORDER_DAMAGE).abs() < 1e-12
        );
        assert_eq!(cannon.calculate_damage(BULLET_BLAST_RADIUS * 1.5), 0.0);

        let mut prev = f64::INFINITY;
        for i in 0..=20 {
            let d = BULLET_BLAST_RADIUS * i as f64 / 20.0;
            let damage = cannon.calculate_damage(d);
            assert!(damage <= prev, "falloff must be non-increasing");
            prev = damage;
        }
    }

    #[test]
    fn oscillation_never_moves_the_base() {
        let mut cannon = PlayerCannon::new();
        let mut rng = rng();
        let mut fx = Vec::new();
        let (origin, aim) = platform();
        cannon.fire(0.0, origin, aim, &mut rng, &mut fx);
        cannon.update(1.0 / 60.0, &mut fx);

        let bullet = cannon.bullets().find(|b| b.active).unwrap();
        let offset = bullet.rendered_position() - bullet.position;
        assert!(offset.length() <= BULLET_OSC_AMPLITUDE_MAX * 3.0_f64.sqrt() + 1e-12);
    }
}
