//! Firing control shared by every armed entity.
//!
//! [`FireControl`] is a plain countdown: ticked once per frame at the front
//! of the chain ([`crate::state::SimStep::Timers`]), checked by each firing
//! system, re-armed on every shot.  This replaces one-shot deferred
//! callbacks with expirations drained at a fixed point in the frame.

use crate::projectile::{Projectile, ProjectileOwner};
use crate::state::{GameState, SimStep};
use bevy::prelude::*;

// ── Components ────────────────────────────────────────────────────────────────

/// Per-shooter cooldown.  `ready()` while `timer <= 0`.
#[derive(Component, Debug, Clone, Copy)]
pub struct FireControl {
    /// Remaining cooldown in seconds; decremented each frame, clamped to 0.
    pub timer: f32,
    /// Interval restored by [`FireControl::trigger`] after each shot.
    pub interval: f32,
}

impl FireControl {
    pub fn new(interval: f32) -> Self {
        Self {
            timer: 0.0,
            interval,
        }
    }

    /// Cooldown starting part-way through its first cycle, so a batch of
    /// enemies spawned together does not volley in sync.  Deterministic in
    /// `spawn_index` for reproducible tests.
    pub fn with_phase(spawn_index: u64, interval: f32) -> Self {
        Self {
            timer: initial_fire_phase(spawn_index, interval),
            interval,
        }
    }

    #[inline]
    pub fn ready(&self) -> bool {
        self.timer <= 0.0
    }

    /// Consume the shot and re-arm the cooldown.
    #[inline]
    pub fn trigger(&mut self) {
        self.timer = self.interval;
    }
}

/// LCG-scattered initial cooldown in `[0.4, 1.0] × base`.
pub fn initial_fire_phase(spawn_index: u64, base_interval: f32) -> f32 {
    let phase =
        ((spawn_index.wrapping_mul(1_103_515_245).wrapping_add(12_345)) % 10_000) as f32 / 10_000.0;
    base_interval * (0.4 + 0.6 * phase)
}

// ── Bolt spawning ─────────────────────────────────────────────────────────────

/// Spawn a bolt at `origin` flying along `dir` (normalised internally).
///
/// The transform faces the flight direction so elongated bolt meshes read
/// correctly; simulation only ever uses `Projectile::velocity`.
pub fn spawn_bolt(
    commands: &mut Commands,
    owner: ProjectileOwner,
    origin: Vec3,
    dir: Vec3,
    speed: f32,
    damage: f32,
    lifetime: f32,
) -> Entity {
    let dir = dir.normalize_or_zero();
    let mut transform = Transform::from_translation(origin);
    if dir != Vec3::ZERO {
        transform.look_to(dir, Vec3::Y);
    }

    commands
        .spawn((
            Projectile {
                owner,
                damage,
                velocity: dir * speed,
                age: 0.0,
                lifetime,
                has_hit: false,
            },
            transform,
            Visibility::default(),
        ))
        .id()
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Tick every shooter's cooldown; runs before all spawning/firing systems.
pub fn tick_fire_cooldowns_system(time: Res<Time>, mut q: Query<&mut FireControl>) {
    let dt = time.delta_secs();
    for mut control in q.iter_mut() {
        control.timer = (control.timer - dt).max(0.0);
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct WeaponsPlugin;

impl Plugin for WeaponsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            tick_fire_cooldowns_system
                .in_set(SimStep::Timers)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_fire_phase_is_deterministic_and_bounded() {
        let t1 = initial_fire_phase(42, 2.0);
        let t2 = initial_fire_phase(42, 2.0);
        assert!((t1 - t2).abs() < 1e-6);
        assert!(t1 >= 0.8 && t1 <= 2.0);
    }

    #[test]
    fn trigger_rearms_to_current_interval() {
        let mut control = FireControl::new(0.3);
        assert!(control.ready());
        control.trigger();
        assert!(!control.ready());
        assert_eq!(control.timer, 0.3);

        // Rapid-fire swaps the interval; the next trigger uses it.
        control.interval = 0.1;
        control.trigger();
        assert_eq!(control.timer, 0.1);
    }

    #[test]
    fn spawn_bolt_normalises_direction() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        let bolt = spawn_bolt(
            &mut app.world_mut().commands(),
            ProjectileOwner::Turret,
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -10.0),
            180.0,
            5.0,
            3.0,
        );
        app.world_mut().flush();

        let projectile = app.world().get::<Projectile>(bolt).unwrap();
        assert!((projectile.velocity.length() - 180.0).abs() < 1e-3);
        assert_eq!(projectile.owner, ProjectileOwner::Turret);
    }
}
