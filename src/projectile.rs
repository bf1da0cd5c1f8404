//! Shared projectile model.
//!
//! Every bolt in the game — player, TIE fighter, turret — is the same value
//! type moved and expired by the same two systems.  A projectile is removed
//! exactly once: either by age/lifetime expiry here, or on its first
//! confirmed hit in [`crate::collision`] (which sets `has_hit` atomically
//! with scheduling the despawn, and which this module then skips).

use crate::constants::ENEMY_BOLT_PRUNE_DISTANCE;
use crate::player::Player;
use crate::state::{GameState, SimStep};
use bevy::prelude::*;

// ── Components ────────────────────────────────────────────────────────────────

/// Who fired a bolt; selects hit radii, damage messages, and colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectileOwner {
    Player,
    TieFighter,
    Turret,
}

/// Per-bolt state.  Velocity is fixed at spawn; bolts fly straight.
#[derive(Component, Debug, Clone, Copy)]
pub struct Projectile {
    pub owner: ProjectileOwner,
    pub damage: f32,
    pub velocity: Vec3,
    /// Seconds since this bolt was spawned.
    pub age: f32,
    /// Age at which the bolt self-expires.
    pub lifetime: f32,
    /// Set on first confirmed hit; the expiry system leaves such bolts to
    /// the hit system's scheduled despawn.
    pub has_hit: bool,
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Integrate bolt positions.
pub fn projectile_move_system(time: Res<Time>, mut q: Query<(&Projectile, &mut Transform)>) {
    let dt = time.delta_secs();
    for (projectile, mut transform) in q.iter_mut() {
        transform.translation += projectile.velocity * dt;
    }
}

/// Age bolts and remove the expired ones.
///
/// Enemy bolts are additionally pruned once they drift further than
/// [`ENEMY_BOLT_PRUNE_DISTANCE`] from the player — they can no longer hit
/// anything that matters and the live-bolt count is capped.
pub fn despawn_spent_projectiles_system(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &mut Projectile, &Transform)>,
    q_player: Query<&Transform, With<Player>>,
) {
    let dt = time.delta_secs();
    let player_pos = q_player.single().map(|t| t.translation).ok();

    for (entity, mut projectile, transform) in q.iter_mut() {
        projectile.age += dt;
        if projectile.has_hit {
            continue;
        }

        let stale = match (projectile.owner, player_pos) {
            (ProjectileOwner::Player, _) | (_, None) => false,
            (_, Some(player)) => transform.translation.distance(player) > ENEMY_BOLT_PRUNE_DISTANCE,
        };

        if projectile.age >= projectile.lifetime || stale {
            commands.entity(entity).despawn();
        }
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct ProjectilePlugin;

impl Plugin for ProjectilePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (projectile_move_system, despawn_spent_projectiles_system)
                .chain()
                .in_set(SimStep::Projectiles)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weapons::spawn_bolt;

    fn projectile_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_systems(
            Update,
            (projectile_move_system, despawn_spent_projectiles_system).chain(),
        );
        app
    }

    #[test]
    fn bolt_moves_along_its_velocity() {
        let mut app = projectile_test_app();
        let bolt = app
            .world_mut()
            .spawn((
                Projectile {
                    owner: ProjectileOwner::Player,
                    damage: 10.0,
                    velocity: Vec3::new(0.0, 0.0, -300.0),
                    age: 0.0,
                    lifetime: 2.0,
                    has_hit: false,
                },
                Transform::default(),
            ))
            .id();

        std::thread::sleep(std::time::Duration::from_millis(5));
        app.update();
        app.update();

        let z = app.world().get::<Transform>(bolt).unwrap().translation.z;
        assert!(z < 0.0, "bolt must advance along -Z, got z = {z}");
    }

    #[test]
    fn bolt_expires_after_lifetime() {
        let mut app = projectile_test_app();
        let bolt = app
            .world_mut()
            .spawn((
                Projectile {
                    owner: ProjectileOwner::Player,
                    damage: 10.0,
                    velocity: Vec3::ZERO,
                    age: 0.0,
                    lifetime: 0.0001,
                    has_hit: false,
                },
                Transform::default(),
            ))
            .id();

        std::thread::sleep(std::time::Duration::from_millis(2));
        app.update();
        app.update();
        assert!(app.world().get_entity(bolt).is_err());
    }

    #[test]
    fn enemy_bolt_far_from_player_is_pruned() {
        let mut app = projectile_test_app();
        app.world_mut().spawn((Player, Transform::default()));
        let bolt = spawn_bolt(
            &mut app.world_mut().commands(),
            ProjectileOwner::TieFighter,
            Vec3::new(0.0, 0.0, -2.0 * ENEMY_BOLT_PRUNE_DISTANCE),
            Vec3::NEG_Z,
            180.0,
            10.0,
            60.0,
        );
        app.world_mut().flush();

        std::thread::sleep(std::time::Duration::from_millis(2));
        app.update();
        app.update();
        assert!(app.world().get_entity(bolt).is_err());
    }

    #[test]
    fn hit_bolt_is_left_to_the_hit_system() {
        let mut app = projectile_test_app();
        let bolt = app
            .world_mut()
            .spawn((
                Projectile {
                    owner: ProjectileOwner::Player,
                    damage: 10.0,
                    velocity: Vec3::ZERO,
                    age: 10.0,
                    lifetime: 2.0,
                    has_hit: true,
                },
                Transform::default(),
            ))
            .id();

        app.update();
        // Expiry must not double-schedule removal of an already-hit bolt.
        assert!(app.world().get_entity(bolt).is_ok());
    }
}
