//! TIE fighter AI: pursuit band steering and ranged fire.
//!
//! Fighters hold a standoff band around the player: close in when outside
//! it, break away when inside it, and strafe a circle in between.  All
//! steering is a pure function of positions so it can be tested without a
//! running app; the system layer adds the per-frame jitter and the facing.

use crate::config::GameConfig;
use crate::constants::{
    ENEMY_PROJECTILE_HARD_CAP, ENEMY_PROJECTILE_LIFETIME, ENEMY_PROJECTILE_SPEED, MUZZLE_OFFSET,
    TIE_JITTER_PROBABILITY, TIE_REMOVAL_DELAY,
};
use crate::events::{CombatantKind, SoundEvent, SoundKind};
use crate::health::{Combatant, Destroyed, Health};
use crate::player::Player;
use crate::projectile::{Projectile, ProjectileOwner};
use crate::state::{GameState, SimStep};
use crate::weapons::{spawn_bolt, FireControl};
use bevy::prelude::*;
use rand::Rng;

// ── Components ────────────────────────────────────────────────────────────────

/// Fighter state: which way it strafes while holding the standoff band.
#[derive(Component, Debug)]
pub struct TieFighter {
    /// +1 or -1; flipped occasionally by the jitter roll.
    pub strafe_dir: f32,
}

// ── Spawning ──────────────────────────────────────────────────────────────────

/// Spawn a fighter at `position`.  `spawn_index` scatters the first
/// cooldown so batched spawns do not volley in sync.
pub fn spawn_tie_fighter(
    commands: &mut Commands,
    config: &GameConfig,
    position: Vec3,
    spawn_index: u64,
) -> Entity {
    commands
        .spawn((
            TieFighter {
                strafe_dir: if spawn_index % 2 == 0 { 1.0 } else { -1.0 },
            },
            Health::new(config.tie_health),
            Combatant {
                kind: CombatantKind::TieFighter,
                removal_delay: TIE_REMOVAL_DELAY,
            },
            FireControl::with_phase(spawn_index, config.tie_fire_interval),
            Transform::from_translation(position),
            Visibility::default(),
        ))
        .id()
}

// ── Steering ──────────────────────────────────────────────────────────────────

/// Desired flight direction for a fighter at `pos` against a player at
/// `player`: seek beyond the band, flee inside it, strafe within it.
pub fn steer_direction(pos: Vec3, player: Vec3, min: f32, max: f32, strafe_dir: f32) -> Vec3 {
    let to_player = player - pos;
    let dist = to_player.length();
    if dist <= 1e-3 {
        return Vec3::X;
    }
    let toward = to_player / dist;

    if dist > max {
        toward
    } else if dist < min {
        -toward
    } else {
        // Tangent around the player; degenerate (vertical) approach falls
        // back to a horizontal strafe.
        let tangent = toward.cross(Vec3::Y);
        let tangent = if tangent.length_squared() < 1e-6 {
            Vec3::X
        } else {
            tangent.normalize()
        };
        tangent * strafe_dir
    }
}

/// Steer every live fighter and keep it facing the player.
pub fn tie_movement_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    q_player: Query<&Transform, (With<Player>, Without<TieFighter>, Without<Destroyed>)>,
    mut q_ties: Query<(&mut TieFighter, &mut Transform), Without<Destroyed>>,
) {
    let Ok(player) = q_player.single() else {
        return;
    };
    let player_pos = player.translation;
    let dt = time.delta_secs();
    let mut rng = rand::thread_rng();

    for (mut tie, mut transform) in q_ties.iter_mut() {
        if rng.gen::<f32>() < TIE_JITTER_PROBABILITY {
            tie.strafe_dir = -tie.strafe_dir;
        }

        let dir = steer_direction(
            transform.translation,
            player_pos,
            config.tie_min_distance,
            config.tie_max_distance,
            tie.strafe_dir,
        );
        transform.translation += dir * (config.tie_speed * dt);
        transform.look_at(player_pos, Vec3::Y);
    }
}

// ── Firing ────────────────────────────────────────────────────────────────────

/// Fire at the player when in range, cooldown permitting.  The global
/// enemy-bolt cap is shared with the turrets; fighters at the cap hold fire
/// without burning their cooldown.
pub fn tie_fire_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    q_player: Query<&Transform, (With<Player>, Without<Destroyed>)>,
    mut q_ties: Query<(&Transform, &mut FireControl), (With<TieFighter>, Without<Destroyed>)>,
    q_bolts: Query<&Projectile>,
    mut sounds: MessageWriter<SoundEvent>,
) {
    let Ok(player) = q_player.single() else {
        return;
    };
    let player_pos = player.translation;

    let mut live_enemy_bolts = q_bolts
        .iter()
        .filter(|p| p.owner != ProjectileOwner::Player)
        .count();

    for (transform, mut fire) in q_ties.iter_mut() {
        if !fire.ready() {
            continue;
        }
        if transform.translation.distance(player_pos) > config.tie_firing_range {
            continue;
        }
        if live_enemy_bolts >= ENEMY_PROJECTILE_HARD_CAP {
            break;
        }

        let dir = player_pos - transform.translation;
        spawn_bolt(
            &mut commands,
            ProjectileOwner::TieFighter,
            transform.translation + dir.normalize_or_zero() * MUZZLE_OFFSET,
            dir,
            ENEMY_PROJECTILE_SPEED,
            config.tie_projectile_damage,
            ENEMY_PROJECTILE_LIFETIME,
        );
        fire.trigger();
        live_enemy_bolts += 1;
        sounds.write(SoundEvent(SoundKind::EnemyLaser));
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct TieFighterPlugin;

impl Plugin for TieFighterPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                tie_movement_system.in_set(SimStep::Movement),
                tie_fire_system.in_set(SimStep::Firing),
            )
                .run_if(in_state(GameState::Playing)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventsPlugin;

    #[test]
    fn steering_holds_the_standoff_band() {
        let player = Vec3::ZERO;

        // Beyond the band: close in.
        let far = Vec3::new(0.0, 0.0, 400.0);
        let dir = steer_direction(far, player, 150.0, 300.0, 1.0);
        assert!(dir.z < 0.0, "far fighter must seek the player");

        // Inside the band: break away.
        let near = Vec3::new(0.0, 0.0, 100.0);
        let dir = steer_direction(near, player, 150.0, 300.0, 1.0);
        assert!(dir.z > 0.0, "near fighter must flee the player");

        // Within the band: strafe perpendicular to the approach line.
        let mid = Vec3::new(0.0, 0.0, 200.0);
        let dir = steer_direction(mid, player, 150.0, 300.0, 1.0);
        assert!(dir.z.abs() < 1e-3, "banded fighter must strafe, got {dir}");
        assert!((dir.length() - 1.0).abs() < 1e-3);

        // Opposite strafe direction mirrors the tangent.
        let flipped = steer_direction(mid, player, 150.0, 300.0, -1.0);
        assert!((dir + flipped).length() < 1e-3);
    }

    fn fire_test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, EventsPlugin));
        app.insert_resource(GameConfig::default());
        app.add_systems(Update, tie_fire_system);
        app
    }

    #[test]
    fn fighter_fires_only_inside_firing_range() {
        let config = GameConfig::default();
        let mut app = fire_test_app();
        app.world_mut().spawn((Player, Transform::default()));

        // One fighter in range, one beyond it.
        app.world_mut().spawn((
            TieFighter { strafe_dir: 1.0 },
            FireControl::new(config.tie_fire_interval),
            Transform::from_xyz(0.0, 0.0, config.tie_firing_range - 10.0),
        ));
        app.world_mut().spawn((
            TieFighter { strafe_dir: 1.0 },
            FireControl::new(config.tie_fire_interval),
            Transform::from_xyz(0.0, 0.0, config.tie_firing_range + 100.0),
        ));

        app.update();

        let bolts = app
            .world_mut()
            .query::<&Projectile>()
            .iter(app.world())
            .count();
        assert_eq!(bolts, 1, "only the in-range fighter may fire");
    }

    #[test]
    fn enemy_bolt_cap_holds_fire_without_burning_cooldowns() {
        let config = GameConfig::default();
        let mut app = fire_test_app();
        app.world_mut().spawn((Player, Transform::default()));

        for _ in 0..ENEMY_PROJECTILE_HARD_CAP {
            app.world_mut().spawn((
                Projectile {
                    owner: ProjectileOwner::Turret,
                    damage: 5.0,
                    velocity: Vec3::ZERO,
                    age: 0.0,
                    lifetime: 3.0,
                    has_hit: false,
                },
                Transform::default(),
            ));
        }
        let tie = app
            .world_mut()
            .spawn((
                TieFighter { strafe_dir: 1.0 },
                FireControl::new(config.tie_fire_interval),
                Transform::from_xyz(0.0, 0.0, 50.0),
            ))
            .id();

        app.update();

        let bolts = app
            .world_mut()
            .query::<&Projectile>()
            .iter(app.world())
            .count();
        assert_eq!(bolts, ENEMY_PROJECTILE_HARD_CAP, "cap must hold");
        assert!(
            app.world().get::<FireControl>(tie).unwrap().ready(),
            "a capped fighter keeps its shot for the next frame"
        );
    }

    #[test]
    fn movement_keeps_distance_from_a_close_player() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(GameConfig::default());
        app.add_systems(Update, tie_movement_system);

        app.world_mut().spawn((Player, Transform::default()));
        let tie = app
            .world_mut()
            .spawn((
                TieFighter { strafe_dir: 1.0 },
                Transform::from_xyz(0.0, 0.0, 50.0),
            ))
            .id();

        std::thread::sleep(std::time::Duration::from_millis(5));
        app.update();
        app.update();

        let z = app.world().get::<Transform>(tie).unwrap().translation.z;
        assert!(z > 50.0, "fighter inside the band must open distance");
    }
}
