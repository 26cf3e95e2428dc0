//! Simulation constants and tuning parameters.

use crate::types::Rgb;

/// Largest frame delta the simulation will integrate in one tick (seconds).
/// Longer stalls (tab backgrounding) are clamped to this to avoid
/// large-step instability.
pub const MAX_FRAME_DT: f64 = 1.0 / 60.0;

// --- World geometry ---

/// Radius of the globe all surface entities sit on.
pub const EARTH_RADIUS: f64 = 1.0;

/// Height of child enemies above the globe surface.
pub const ENEMY_ALTITUDE: f64 = 0.01;

/// Height of parent enemies above the globe surface.
pub const PARENT_ALTITUDE: f64 = 0.02;

// --- Child enemies ---

/// Fixed pool capacity for child enemies.
pub const MAX_ENEMIES: usize = 300;

/// Collision radius of a child enemy.
pub const ENEMY_RADIUS: f64 = 0.01;

/// Minimum Euclidean separation between enemies placed in one batch.
/// Cartesian distance is a cheap proxy for geodesic separation here,
/// valid while this stays well below EARTH_RADIUS.
pub const MIN_ENEMY_DISTANCE: f64 = 0.05;

/// Rejection-sampling attempts per enemy slot before the slot is skipped.
pub const PLACEMENT_ATTEMPTS: u32 = 100;

/// Default hit points for a child enemy.
pub const ENEMY_MAX_HP: f64 = 1.0;

/// Duration of the shrink-and-recolor destroy animation (seconds).
pub const ENEMY_DESTROY_ANIM_SECS: f64 = 0.5;

/// Resting tint of an active child enemy.
pub const ENEMY_BASE_COLOR: Rgb = Rgb::new(0.85, 0.15, 0.15);

// --- Parent enemies ---

/// Hit points of a parent enemy.
pub const PARENT_MAX_HP: f64 = 1250.0;

/// Angular wander speed along the surface (rad/s).
pub const PARENT_MOVE_SPEED: f64 = 0.125;

/// Angular distance below which a parent counts as arrived at its target.
pub const PARENT_ARRIVE_EPSILON: f64 = 1e-3;

/// Mean delay between wander retargets while idle (seconds).
pub const PARENT_RETARGET_MEAN_SECS: f64 = 0.5;

/// Wander target distance range (degrees of arc from the current position).
pub const PARENT_WANDER_MIN_DEG: f64 = 10.0;
pub const PARENT_WANDER_MAX_DEG: f64 = 30.0;

/// Wander targets are clamped to this latitude band (degrees).
pub const PARENT_LAT_CLAMP_DEG: f64 = 85.0;

/// Interval between child-spawn attempts per parent (seconds).
pub const CHILD_SPAWN_INTERVAL_SECS: f64 = 1.0;

/// A spawn candidate is rejected if any active child sits closer than this.
pub const CHILD_SPAWN_CLEARANCE: f64 = 5.0 * ENEMY_RADIUS;

/// Concentric ring bands searched for a child spawn spot, as
/// (min, max) angular radius in radians around the parent, near to far.
pub const CHILD_SPAWN_BANDS: [(f64, f64); 3] =
    [(0.05, 0.10), (0.10, 0.18), (0.18, 0.30)];

/// Random (bearing, ring radius) samples drawn per band.
pub const CHILD_SPAWN_SAMPLES_PER_BAND: u32 = 4;

/// Hit points restored by one energy transfer from a child.
pub const PARENT_HEAL_HP: f64 = 25.0;

/// Duration of the healing-glow animation (seconds).
pub const PARENT_HEAL_GLOW_SECS: f64 = 1.0;

/// Duration of the hit-flash tint after taking damage (seconds).
pub const PARENT_HIT_FLASH_SECS: f64 = 0.15;

/// Flat damage a blast sphere applies to a parent within its radius.
pub const PARENT_BLAST_DAMAGE: f64 = 50.0;

/// Tint of the explosion spawned on a parent hit.
pub const PARENT_HIT_COLOR: Rgb = Rgb::new(0.2, 0.4, 1.0);

/// Explosion scale on a parent hit / on parent destruction.
pub const PARENT_HIT_EXPLOSION_SCALE: f64 = 0.06;
pub const PARENT_DEATH_EXPLOSION_SCALE: f64 = 0.15;

// --- Last-parent cascade ---

/// Children force-destroyed per cascade batch.
pub const CASCADE_BATCH_SIZE: usize = 10;

/// Simulated delay between cascade batches (seconds).
pub const CASCADE_STAGGER_SECS: f64 = 0.05;

// --- Player cannon ---

/// Minimum seconds between player shots.
pub const CANNON_FIRE_RATE_SECS: f64 = 0.15;

/// Bullet speed (units/s).
pub const BULLET_SPEED: f64 = 0.15;

/// Fixed pool capacity for player bullets.
pub const BULLET_POOL_CAPACITY: usize = 64;

/// Lateral offset of each gun from the platform centerline.
pub const GUN_OFFSET: f64 = 0.02;

/// Distance in front of the platform where both gun aim lines meet.
pub const GUN_CONVERGENCE_DISTANCE: f64 = 0.5;

/// Bullet lifetime before silent expiry (seconds).
pub const BULLET_LIFETIME_SECS: f64 = 8.0;

/// Bullets beyond this distance from the world origin are released.
pub const BULLET_MAX_RANGE: f64 = 3.0;

/// Cosmetic flight-oscillation parameter ranges (per axis).
pub const BULLET_OSC_AMPLITUDE_MAX: f64 = 0.005;
pub const BULLET_OSC_FREQ_MIN_HZ: f64 = 2.0;
pub const BULLET_OSC_FREQ_MAX_HZ: f64 = 6.0;

/// Area-of-effect radius of a bullet's surface impact.
pub const BULLET_BLAST_RADIUS: f64 = 0.05;

/// Explosion visual on bullet impact.
pub const IMPACT_EXPLOSION_SCALE: f64 = 0.05;
pub const IMPACT_EXPLOSION_COLOR: Rgb = Rgb::new(1.0, 0.6, 0.2);

// --- Impact flash lights ---

/// Concurrent point-light flash ceiling; oldest is evicted beyond this.
pub const MAX_FLASHES: usize = 8;

/// A new flash pre-empts any existing flash within this distance.
pub const FLASH_OVERLAP_DISTANCE: f64 = 0.08;

/// Flash lifetime (seconds); intensity fades linearly to zero over it.
pub const FLASH_LIFETIME_SECS: f64 = 0.4;

/// Initial flash intensity and light radius.
pub const FLASH_INTENSITY: f64 = 2.0;
pub const FLASH_RADIUS: f64 = 0.15;

// --- Damage falloff ---

/// Damage at a blast's center and at its border (linear in between).
pub const BLAST_CENTER_DAMAGE: f64 = 1.0;
pub const BLAST_BORDER_DAMAGE: f64 = 0.2;

// --- Enemy attack duty cycle ---

/// Duration of the attack phase (enemies may fire).
pub const ATTACK_PHASE_SECS: f64 = 5.0;

/// Duration of the rest phase (no firing).
pub const WAIT_PHASE_SECS: f64 = 1.0;

/// Eligible elevation window between an enemy's surface normal and the
/// direction to the player (degrees). Below the minimum the player is
/// nearly overhead; above the maximum it is below the horizon.
pub const ATTACK_ANGLE_MIN_DEG: f64 = 10.0;
pub const ATTACK_ANGLE_MAX_DEG: f64 = 90.0;

/// Cap on enemies simultaneously in their post-shot cooldown.
pub const MAX_SIMULTANEOUS_ATTACKS: usize = 50;

/// Global minimum interval between enemy shots (seconds).
pub const ENEMY_FIRE_INTERVAL_SECS: f64 = 0.1;

/// Per-enemy cooldown after firing before it can be selected again.
pub const ATTACKER_COOLDOWN_SECS: f64 = 1.0;

// --- Enemy shells ---

/// Shell speed toward the player (units/s).
pub const SHELL_SPEED: f64 = 0.3;

/// Fixed pool capacity for enemy shells.
pub const SHELL_POOL_CAPACITY: usize = 100;

/// Collision radius of a shell.
pub const SHELL_RADIUS: f64 = 0.008;

/// Magnitude cap of the random perpendicular aim spread.
pub const SHELL_AIM_SPREAD: f64 = 0.1;

/// Shell lifetime before silent expiry (seconds).
pub const SHELL_LIFETIME_SECS: f64 = 10.0;

/// Shells beyond this distance from the world origin are released.
pub const SHELL_MAX_RANGE: f64 = 3.0;

/// Cosmetic emissive-glow oscillation for shells in flight.
pub const SHELL_GLOW_BASE: f64 = 0.6;
pub const SHELL_GLOW_AMPLITUDE: f64 = 0.4;
pub const SHELL_GLOW_FREQ_HZ: f64 = 3.0;

// --- Player ---

/// Collision radius of the player platform.
pub const PLAYER_RADIUS: f64 = 0.03;

/// Starting life count.
pub const PLAYER_LIVES: u32 = 3;

// --- Destroy animation color ramp ---

pub const DESTROY_RAMP_RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
pub const DESTROY_RAMP_ORANGE: Rgb = Rgb::new(1.0, 0.5, 0.0);
pub const DESTROY_RAMP_YELLOW: Rgb = Rgb::new(1.0, 1.0, 0.0);

/// Explosion visual when a child enemy is destroyed.
pub const ENEMY_DESTROY_EXPLOSION_SCALE: f64 = 0.04;
pub const ENEMY_DESTROY_EXPLOSION_COLOR: Rgb = Rgb::new(1.0, 0.3, 0.1);
