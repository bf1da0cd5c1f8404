//! Centralised gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! Distances are world units, durations are seconds, rates are per-second.

use bevy::prelude::Vec3;

// ── Flight Envelope ───────────────────────────────────────────────────────────

/// Half-extent of the playfield on the X and Y axes; ship position is clamped.
pub const BOUNDS_XY: f32 = 500.0;

/// Near Z limit of the playfield (behind the battle station).
///
/// Extends past the station so the approach run to the exhaust port exists;
/// a symmetric ±500 clamp would keep the ship 1,500 units from the target.
pub const BOUNDS_Z_MIN: f32 = -2100.0;

/// Far Z limit of the playfield (behind the player start).
pub const BOUNDS_Z_MAX: f32 = 500.0;

// ── Player: Flight ────────────────────────────────────────────────────────────

/// Minimum forward speed (u/s); the ship never stalls.
pub const PLAYER_MIN_SPEED: f32 = 6.0;

/// Maximum forward speed (u/s).
pub const PLAYER_MAX_SPEED: f32 = 120.0;

/// Throttle response (u/s per second of held input).
pub const PLAYER_ACCELERATION: f32 = 36.0;

/// Pitch rate (rad/s) for W/S input.
pub const PLAYER_PITCH_RATE: f32 = 1.2;

/// Turn rate (rad/s) for A/D input.
pub const PLAYER_TURN_RATE: f32 = 1.8;

// ── Player: Combat ────────────────────────────────────────────────────────────

pub const PLAYER_MAX_HEALTH: f32 = 100.0;

/// Seconds the player ignores damage after any applied hit.
pub const INVULNERABILITY_WINDOW: f32 = 1.0;

/// Seconds between the ship's destruction and its removal.
pub const PLAYER_REMOVAL_DELAY: f32 = 2.0;

/// Minimum interval between consecutive shots.
pub const PLAYER_FIRE_INTERVAL: f32 = 0.3;

pub const PLAYER_PROJECTILE_SPEED: f32 = 300.0;
pub const PLAYER_PROJECTILE_LIFETIME: f32 = 2.0;
pub const PLAYER_PROJECTILE_DAMAGE: f32 = 10.0;

/// Damage per shot while the exhaust-port lock is held.
pub const LOCKED_PROJECTILE_DAMAGE: f32 = 20.0;

/// Distance from ship centre to the projectile spawn point along forward.
pub const MUZZLE_OFFSET: f32 = 7.0;

/// Maximum range at which the exhaust-port lock can engage.
pub const LOCK_RANGE: f32 = 500.0;

/// Minimum dot(ship forward, unit-to-port) for the lock to engage.
///
/// 0.98 is roughly an 11° cone.  Raising it makes the lock twitchier;
/// below ~0.9 the lock engages while the port is barely on screen.
pub const LOCK_ALIGNMENT: f32 = 0.98;

/// Damage taken when flying into the station hull.
pub const HULL_PROXIMITY_DAMAGE: f32 = 20.0;

/// Clearance margin over the hull radius that counts as a hull strike.
pub const HULL_PROXIMITY_MARGIN: f32 = 5.0;

// ── Battle Station ────────────────────────────────────────────────────────────

/// World position of the station centre.
pub const DEATH_STAR_CENTER: Vec3 = Vec3::new(0.0, 0.0, -2000.0);

pub const DEATH_STAR_RADIUS: f32 = 100.0;
pub const DEATH_STAR_HEALTH: f32 = 100.0;

/// A projectile within `radius + margin` of the centre is a surface hit.
pub const SURFACE_HIT_MARGIN: f32 = 5.0;
pub const SURFACE_HIT_DAMAGE: f32 = 5.0;

/// Physical radius of the exhaust port opening.
pub const EXHAUST_PORT_RADIUS: f32 = 5.0;

/// Critical-hit radius around the port (2× the opening).  Must stay smaller
/// than the surface threshold so the port check can take priority.
pub const EXHAUST_PORT_CRITICAL_RADIUS: f32 = 10.0;
pub const EXHAUST_PORT_CRITICAL_DAMAGE: f32 = 20.0;

/// Radius of the port's circular track on the front face of the hull.
pub const EXHAUST_PORT_ORBIT_RADIUS: f32 = 30.0;

/// Angular speed (rad/s) of the port along its track.
pub const EXHAUST_PORT_ORBIT_SPEED: f32 = 0.03;

/// Slow roll of the whole station around its facing axis (rad/s).
pub const HULL_ROLL_RATE: f32 = 0.06;

/// Seconds between the station's destruction and its removal.
pub const DEATH_STAR_REMOVAL_DELAY: f32 = 2.0;

// ── TIE Fighters ──────────────────────────────────────────────────────────────

pub const TIE_HEALTH: f32 = 20.0;
pub const TIE_SPEED: f32 = 72.0;

/// Closer than this, the fighter breaks away from the player.
pub const TIE_MIN_DISTANCE: f32 = 150.0;

/// Further than this, the fighter closes in; in between it circles.
pub const TIE_MAX_DISTANCE: f32 = 300.0;

/// Per-frame probability of a random heading jitter while circling.
pub const TIE_JITTER_PROBABILITY: f32 = 0.02;

pub const TIE_FIRE_INTERVAL: f32 = 1.5;
pub const TIE_FIRING_RANGE: f32 = 200.0;
pub const TIE_PROJECTILE_DAMAGE: f32 = 10.0;

/// Projectile-vs-fighter hit radius.
pub const TIE_HIT_RADIUS: f32 = 10.0;
pub const TIE_REMOVAL_DELAY: f32 = 1.0;

// ── Turrets ───────────────────────────────────────────────────────────────────

pub const TURRET_HEALTH: f32 = 30.0;

/// Aim interpolation rate (fraction of remaining error corrected per second).
/// The turret never snaps to the player; at 0.6 a 90° error takes ~4 s to
/// close, which leaves a fast ship a window to slip the firing line.
pub const TURRET_AIM_RATE: f32 = 0.6;

pub const TURRET_FIRE_INTERVAL: f32 = 2.0;
pub const TURRET_FIRING_RANGE: f32 = 300.0;
pub const TURRET_PROJECTILE_DAMAGE: f32 = 5.0;

/// Turret bolts outlive fighter bolts; same age/lifetime expiry path.
pub const TURRET_PROJECTILE_LIFETIME: f32 = 3.0;

/// Projectile-vs-turret hit radius.
pub const TURRET_HIT_RADIUS: f32 = 5.0;
pub const TURRET_MUZZLE_OFFSET: f32 = 6.0;
pub const TURRET_REMOVAL_DELAY: f32 = 1.0;

// ── Enemy Projectiles ─────────────────────────────────────────────────────────

pub const ENEMY_PROJECTILE_SPEED: f32 = 180.0;
pub const ENEMY_PROJECTILE_LIFETIME: f32 = 2.0;

/// Enemy bolts further than this from the player are pruned early.
pub const ENEMY_BOLT_PRUNE_DISTANCE: f32 = 500.0;

/// Hard cap on simultaneously live enemy bolts across all shooters.
pub const ENEMY_PROJECTILE_HARD_CAP: usize = 64;

/// Enemy bolt hit radius against the player ship is the ship's own body
/// radius minus a grace margin.
pub const ENEMY_BOLT_HIT_RADIUS: f32 = 10.0;

// ── Proximity Collisions ──────────────────────────────────────────────────────

pub const TIE_COLLISION_DISTANCE: f32 = 15.0;
pub const TIE_COLLISION_DAMAGE_TO_PLAYER: f32 = 15.0;
pub const TIE_COLLISION_DAMAGE_TO_TIE: f32 = 20.0;

pub const TURRET_COLLISION_DISTANCE: f32 = 10.0;
pub const TURRET_COLLISION_DAMAGE_TO_PLAYER: f32 = 10.0;
pub const TURRET_COLLISION_DAMAGE_TO_TURRET: f32 = 20.0;

// ── Power-Ups ─────────────────────────────────────────────────────────────────

/// Seconds an uncollected power-up persists before self-expiring.
pub const POWERUP_LIFETIME: f32 = 15.0;

pub const POWERUP_COLLECTION_RADIUS: f32 = 12.5;
pub const POWERUP_HEALTH_BONUS: f32 = 30.0;
pub const SHIELD_DURATION: f32 = 10.0;
pub const RAPID_FIRE_DURATION: f32 = 8.0;

/// Rapid fire divides the base fire interval by this factor.
pub const RAPID_FIRE_DIVISOR: f32 = 3.0;

pub const DOUBLE_DAMAGE_DURATION: f32 = 10.0;
pub const DOUBLE_DAMAGE_MULTIPLIER: f32 = 2.0;

/// Bob amplitude (u) and angular rate (rad/s) for the idle float animation.
pub const POWERUP_BOB_AMPLITUDE: f32 = 2.0;
pub const POWERUP_BOB_RATE: f32 = 2.0;
pub const POWERUP_SPIN_RATE: f32 = 1.5;

// ── Director: Spawning & Difficulty ───────────────────────────────────────────

/// Base enemy spawn interval; the effective interval is `base / difficulty`.
pub const ENEMY_SPAWN_BASE_INTERVAL: f32 = 5.0;

pub const POWERUP_SPAWN_INTERVAL: f32 = 15.0;
pub const POWERUP_MAX_ACTIVE: usize = 3;

/// Difficulty scalar added on each escalation tick.
pub const DIFFICULTY_STEP: f32 = 0.2;
pub const ESCALATION_INTERVAL: f32 = 30.0;

/// Probability that an enemy spawn is a TIE fighter (when under cap).
pub const TIE_SPAWN_WEIGHT: f32 = 0.7;

pub const TIE_CAP_BASE: u32 = 5;
pub const TIE_CAP_MAX: u32 = 10;
pub const TURRET_CAP_BASE: u32 = 8;
pub const TURRET_CAP_MAX: u32 = 12;

pub const TIE_KILL_POINTS: u32 = 100;
pub const TURRET_KILL_POINTS: u32 = 50;

/// TIE fighters spawn on a ring around the player at this distance band.
pub const TIE_SPAWN_RING_MIN: f32 = 200.0;
pub const TIE_SPAWN_RING_MAX: f32 = 300.0;
pub const TIE_SPAWN_Y_JITTER: f32 = 50.0;

/// Power-ups spawn on a nearer ring so they are reachable mid-fight.
pub const POWERUP_RING_MIN: f32 = 100.0;
pub const POWERUP_RING_MAX: f32 = 200.0;
pub const POWERUP_Y_JITTER: f32 = 15.0;

// ── HUD ───────────────────────────────────────────────────────────────────────

pub const HUD_FONT_SIZE: f32 = 16.0;

/// Seconds a gameplay message stays in the feed.
pub const MESSAGE_TTL: f32 = 3.0;

/// Maximum messages shown at once; older entries are dropped first.
pub const MESSAGE_FEED_CAP: usize = 5;

// ── Starfield ─────────────────────────────────────────────────────────────────

pub const STARFIELD_COUNT: usize = 1500;
pub const STARFIELD_RADIUS: f32 = 3000.0;
