//! Hull turrets: smoothed tracking and ranged fire.
//!
//! Turrets are children of the station, mounted on the hull, so they roll
//! with it.  Aim is a world-space direction smoothed toward the player at a
//! fixed rate; the turret never snaps onto a fast-moving ship.  Fired bolts
//! follow the smoothed aim, not the player's true position, which is what
//! makes them dodgeable.

use crate::config::GameConfig;
use crate::constants::{
    ENEMY_PROJECTILE_HARD_CAP, ENEMY_PROJECTILE_SPEED, TURRET_MUZZLE_OFFSET,
    TURRET_PROJECTILE_LIFETIME, TURRET_REMOVAL_DELAY,
};
use crate::events::{CombatantKind, SoundEvent, SoundKind};
use crate::health::{Combatant, Destroyed, Health};
use crate::player::Player;
use crate::projectile::{Projectile, ProjectileOwner};
use crate::state::{GameState, SimStep};
use crate::weapons::{spawn_bolt, FireControl};
use bevy::prelude::*;

// ── Components ────────────────────────────────────────────────────────────────

/// Turret state.  `aim` is a world-space unit direction.
#[derive(Component, Debug)]
pub struct Turret {
    pub aim: Vec3,
}

// ── Spawning ──────────────────────────────────────────────────────────────────

/// Spawn a turret mounted on the station hull at `local_position` (station
/// space).  The barrel starts pointing along the outward hull normal.
pub fn spawn_turret(
    commands: &mut Commands,
    config: &GameConfig,
    station: Entity,
    local_position: Vec3,
    spawn_index: u64,
) -> Entity {
    let normal = local_position.normalize_or_zero();
    commands
        .spawn((
            Turret { aim: normal },
            Health::new(config.turret_health),
            Combatant {
                kind: CombatantKind::Turret,
                removal_delay: TURRET_REMOVAL_DELAY,
            },
            FireControl::with_phase(spawn_index, config.turret_fire_interval),
            Transform::from_translation(local_position)
                .with_rotation(Quat::from_rotation_arc(Vec3::Y, normal)),
            Visibility::default(),
            ChildOf(station),
        ))
        .id()
}

// ── Aim ───────────────────────────────────────────────────────────────────────

/// Smooth a world-space aim direction toward `target_dir` by `rate * dt` of
/// the remaining error.
pub fn smooth_aim(current: Vec3, target_dir: Vec3, rate: f32, dt: f32) -> Vec3 {
    let t = (rate * dt).clamp(0.0, 1.0);
    current.lerp(target_dir, t).normalize_or_zero()
}

/// Track the player: smooth each turret's world aim and re-orient its
/// barrel in parent space.
pub fn turret_aim_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    q_player: Query<&Transform, (With<Player>, Without<Destroyed>)>,
    mut q_turrets: Query<
        (&mut Turret, &mut Transform, &GlobalTransform, &ChildOf),
        (Without<Destroyed>, Without<Player>),
    >,
    q_parents: Query<&GlobalTransform, Without<Turret>>,
) {
    let Ok(player) = q_player.single() else {
        return;
    };
    let dt = time.delta_secs();

    for (mut turret, mut transform, global, child_of) in q_turrets.iter_mut() {
        let to_player = player.translation - global.translation();
        let Some(target_dir) = to_player.try_normalize() else {
            continue;
        };
        turret.aim = smooth_aim(turret.aim, target_dir, config.turret_aim_rate, dt);

        // Barrel rotation lives in station space; undo the parent's world
        // rotation before building the arc.
        if let Ok(parent) = q_parents.get(child_of.parent()) {
            let local_aim = parent.rotation().inverse() * turret.aim;
            transform.rotation = Quat::from_rotation_arc(Vec3::Y, local_aim);
        }
    }
}

// ── Firing ────────────────────────────────────────────────────────────────────

/// Fire along the smoothed aim when the player is in range.  Shares the
/// global enemy-bolt cap with the fighters.
pub fn turret_fire_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    q_player: Query<&Transform, (With<Player>, Without<Destroyed>)>,
    mut q_turrets: Query<
        (&Turret, &GlobalTransform, &mut FireControl),
        (Without<Destroyed>, Without<Player>),
    >,
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

    for (turret, global, mut fire) in q_turrets.iter_mut() {
        if !fire.ready() {
            continue;
        }
        let muzzle = global.translation();
        if muzzle.distance(player_pos) > config.turret_firing_range {
            continue;
        }
        if live_enemy_bolts >= ENEMY_PROJECTILE_HARD_CAP {
            break;
        }

        spawn_bolt(
            &mut commands,
            ProjectileOwner::Turret,
            muzzle + turret.aim * TURRET_MUZZLE_OFFSET,
            turret.aim,
            ENEMY_PROJECTILE_SPEED,
            config.turret_projectile_damage,
            TURRET_PROJECTILE_LIFETIME,
        );
        fire.trigger();
        live_enemy_bolts += 1;
        sounds.write(SoundEvent(SoundKind::EnemyLaser));
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct TurretPlugin;

impl Plugin for TurretPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                turret_aim_system.in_set(SimStep::Movement),
                turret_fire_system.in_set(SimStep::Firing),
            )
                .run_if(in_state(GameState::Playing)),
        );
    }
}
