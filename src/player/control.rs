//! Input mapping and flight model.
//!
//! Keyboard state is flattened into [`PlayerIntent`] once per frame, then
//! the flight system applies it: W/S pitch, A/D turn, Q/E throttle.  The
//! ship always moves forward at its current engine speed and its position
//! is clamped to the flight envelope each frame.

use crate::config::GameConfig;
use crate::constants::{
    BOUNDS_XY, BOUNDS_Z_MAX, BOUNDS_Z_MIN, DEATH_STAR_RADIUS, HULL_PROXIMITY_DAMAGE,
    HULL_PROXIMITY_MARGIN,
};
use crate::death_star::DeathStar;
use crate::events::GameMessage;
use crate::health::{DamageQueue, Destroyed};
use crate::player::state::{Engine, Player, PlayerIntent};
use bevy::prelude::*;

// ── Input → intent ────────────────────────────────────────────────────────────

/// Rebuild [`PlayerIntent`] from the keyboard snapshot.
pub fn keyboard_to_intent_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut intent: ResMut<PlayerIntent>,
) {
    *intent = PlayerIntent::default();

    if keys.pressed(KeyCode::KeyW) {
        intent.pitch += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        intent.pitch -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        intent.turn += 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        intent.turn -= 1.0;
    }
    if keys.pressed(KeyCode::KeyE) {
        intent.throttle += 1.0;
    }
    if keys.pressed(KeyCode::KeyQ) {
        intent.throttle -= 1.0;
    }
    intent.fire = keys.pressed(KeyCode::Space);
}

// ── Intent → flight ───────────────────────────────────────────────────────────

/// Apply the frame's intent: rotate, throttle, advance, clamp to envelope.
pub fn apply_flight_system(
    time: Res<Time>,
    intent: Res<PlayerIntent>,
    config: Res<GameConfig>,
    mut q: Query<(&mut Transform, &mut Engine), (With<Player>, Without<Destroyed>)>,
) {
    let Ok((mut transform, mut engine)) = q.single_mut() else {
        return;
    };
    let dt = time.delta_secs();

    engine.speed = (engine.speed + intent.throttle * config.player_acceleration * dt)
        .clamp(config.player_min_speed, config.player_max_speed);

    transform.rotate_local_x(intent.pitch * config.player_pitch_rate * dt);
    transform.rotate_local_y(intent.turn * config.player_turn_rate * dt);

    let forward = transform.forward();
    transform.translation += forward * (engine.speed * dt);

    transform.translation.x = transform.translation.x.clamp(-BOUNDS_XY, BOUNDS_XY);
    transform.translation.y = transform.translation.y.clamp(-BOUNDS_XY, BOUNDS_XY);
    transform.translation.z = transform.translation.z.clamp(BOUNDS_Z_MIN, BOUNDS_Z_MAX);
}

// ── Hull proximity ────────────────────────────────────────────────────────────

/// Flying into the station hull hurts: the ship takes a fixed hit and its
/// position is pushed back out to the clearance margin (position revert).
pub fn hull_proximity_system(
    mut q_player: Query<(Entity, &mut Transform), (With<Player>, Without<Destroyed>)>,
    q_station: Query<&Transform, (With<DeathStar>, Without<Player>, Without<Destroyed>)>,
    mut damage: ResMut<DamageQueue>,
    mut messages: MessageWriter<GameMessage>,
) {
    let Ok((player_entity, mut transform)) = q_player.single_mut() else {
        return;
    };
    let Ok(station) = q_station.single() else {
        return;
    };

    let clearance = DEATH_STAR_RADIUS + HULL_PROXIMITY_MARGIN;
    let offset = transform.translation - station.translation;
    let dist = offset.length();
    if dist >= clearance {
        return;
    }

    // Push back to just outside the clearance shell before applying damage,
    // so a single graze cannot re-trigger every frame.
    let dir = if dist > 1e-3 { offset / dist } else { Vec3::Z };
    transform.translation = station.translation + dir * (clearance + 0.5);

    damage.add(player_entity, HULL_PROXIMITY_DAMAGE);
    messages.write(GameMessage::warning("Hull strike! Pull up!"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEATH_STAR_CENTER;
    use crate::health::{Combatant, Health};

    fn flight_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(GameConfig::default());
        app.init_resource::<PlayerIntent>();
        app.add_systems(Update, apply_flight_system);
        app
    }

    fn spawn_ship(app: &mut App, at: Vec3) -> Entity {
        app.world_mut()
            .spawn((Player, Engine::default(), Transform::from_translation(at)))
            .id()
    }

    #[test]
    fn ship_advances_along_forward_at_engine_speed() {
        let mut app = flight_test_app();
        let ship = spawn_ship(&mut app, Vec3::ZERO);

        std::thread::sleep(std::time::Duration::from_millis(5));
        app.update();
        app.update();

        // Default orientation faces -Z; with no input the ship still moves.
        let z = app.world().get::<Transform>(ship).unwrap().translation.z;
        assert!(z < 0.0, "ship must drift forward, got z = {z}");
    }

    #[test]
    fn throttle_clamps_to_speed_band() {
        let config = GameConfig::default();
        let mut app = flight_test_app();
        let ship = spawn_ship(&mut app, Vec3::ZERO);
        app.world_mut().get_mut::<Engine>(ship).unwrap().speed = config.player_max_speed;
        app.world_mut().resource_mut::<PlayerIntent>().throttle = 1.0;

        std::thread::sleep(std::time::Duration::from_millis(5));
        app.update();
        app.update();

        let speed = app.world().get::<Engine>(ship).unwrap().speed;
        assert!(speed <= config.player_max_speed);
        assert!(speed >= config.player_min_speed);
    }

    #[test]
    fn position_is_clamped_to_flight_envelope() {
        let mut app = flight_test_app();
        let ship = spawn_ship(&mut app, Vec3::new(BOUNDS_XY + 250.0, -9999.0, 9999.0));

        app.update();

        let pos = app.world().get::<Transform>(ship).unwrap().translation;
        assert_eq!(pos.x, BOUNDS_XY);
        assert_eq!(pos.y, -BOUNDS_XY);
        assert_eq!(pos.z, BOUNDS_Z_MAX);
    }

    #[test]
    fn hull_graze_queues_damage_and_reverts_position() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, crate::events::EventsPlugin));
        app.insert_resource(DamageQueue::default());
        app.add_systems(Update, hull_proximity_system);

        app.world_mut().spawn((
            DeathStar,
            Health::new(100.0),
            Combatant {
                kind: crate::events::CombatantKind::DeathStar,
                removal_delay: 2.0,
            },
            Transform::from_translation(DEATH_STAR_CENTER),
        ));
        let inside = DEATH_STAR_CENTER + Vec3::new(0.0, 0.0, DEATH_STAR_RADIUS - 10.0);
        let ship = app
            .world_mut()
            .spawn((Player, Transform::from_translation(inside)))
            .id();

        app.update();

        let pos = app.world().get::<Transform>(ship).unwrap().translation;
        let dist = pos.distance(DEATH_STAR_CENTER);
        assert!(
            dist > DEATH_STAR_RADIUS + HULL_PROXIMITY_MARGIN,
            "ship must be pushed back outside the clearance shell"
        );
        assert!(!app.world().resource::<DamageQueue>().is_empty());
    }
}
