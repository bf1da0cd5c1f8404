//! Exhaust-port targeting lock and projectile firing.

use crate::config::GameConfig;
use crate::constants::{MUZZLE_OFFSET, PLAYER_PROJECTILE_LIFETIME};
use crate::death_star::{DeathStar, ExhaustPort};
use crate::events::{GameMessage, SoundEvent, SoundKind};
use crate::health::Destroyed;
use crate::player::state::{ActiveEffects, Player, PlayerIntent, TargetLock};
use crate::projectile::ProjectileOwner;
use crate::weapons::{spawn_bolt, FireControl};
use bevy::prelude::*;

// ── Targeting lock ────────────────────────────────────────────────────────────

/// Pure lock predicate: port in range and forward vector aligned with it.
pub fn lock_state(
    player_pos: Vec3,
    forward: Vec3,
    port_pos: Vec3,
    range: f32,
    alignment: f32,
) -> (bool, Option<f32>) {
    let to_port = port_pos - player_pos;
    let dist = to_port.length();
    if dist > range || dist <= 1e-3 {
        return (false, None);
    }
    let locked = forward.normalize_or_zero().dot(to_port / dist) > alignment;
    (locked, Some(dist))
}

/// Refresh [`TargetLock`] each frame; announces the lock on its rising edge.
pub fn targeting_lock_system(
    config: Res<GameConfig>,
    q_player: Query<&Transform, (With<Player>, Without<Destroyed>)>,
    q_port: Query<&GlobalTransform, With<ExhaustPort>>,
    q_station: Query<(), (With<DeathStar>, Without<Destroyed>)>,
    mut lock: ResMut<TargetLock>,
    mut messages: MessageWriter<GameMessage>,
) {
    let was_locked = lock.locked;
    *lock = TargetLock::default();

    let Ok(player) = q_player.single() else {
        return;
    };
    let Ok(port) = q_port.single() else {
        return;
    };
    if q_station.is_empty() {
        return;
    }

    let (locked, dist) = lock_state(
        player.translation,
        *player.forward(),
        port.translation(),
        config.lock_range,
        config.lock_alignment,
    );
    lock.locked = locked;
    lock.port_distance = dist;

    if locked && !was_locked {
        messages.write(GameMessage::info("Exhaust port targeted!"));
    }
}

// ── Firing ────────────────────────────────────────────────────────────────────

/// Fire on held input when the cooldown allows.  A locked shot carries the
/// heavier warhead; the double-damage effect multiplies either at fire time.
pub fn player_fire_system(
    mut commands: Commands,
    intent: Res<PlayerIntent>,
    config: Res<GameConfig>,
    lock: Res<TargetLock>,
    mut q_player: Query<
        (&Transform, &mut FireControl, &ActiveEffects),
        (With<Player>, Without<Destroyed>),
    >,
    mut sounds: MessageWriter<SoundEvent>,
) {
    if !intent.fire {
        return;
    }
    let Ok((transform, mut fire, effects)) = q_player.single_mut() else {
        return;
    };
    if !fire.ready() {
        return;
    }

    let base = if lock.locked {
        config.locked_projectile_damage
    } else {
        config.player_projectile_damage
    };
    let forward = *transform.forward();

    spawn_bolt(
        &mut commands,
        ProjectileOwner::Player,
        transform.translation + forward * MUZZLE_OFFSET,
        forward,
        config.player_projectile_speed,
        base * effects.damage_multiplier(),
        PLAYER_PROJECTILE_LIFETIME,
    );
    fire.trigger();
    sounds.write(SoundEvent(SoundKind::LaserFire));
}
