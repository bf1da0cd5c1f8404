//! The battle station and its exhaust port.
//!
//! The station is a single combatant entity at a fixed world position; the
//! exhaust port is a child entity on a circular track on the front face, so
//! the port's world position follows the hull roll for free through the
//! transform hierarchy.  Hit classification checks the port's critical
//! sphere before the hull surface shell: the port sits inside the hull
//! margin, so testing surface first would shadow every critical hit.

use crate::config::GameConfig;
use crate::constants::{
    DEATH_STAR_CENTER, DEATH_STAR_RADIUS, DEATH_STAR_REMOVAL_DELAY, EXHAUST_PORT_CRITICAL_RADIUS,
    EXHAUST_PORT_ORBIT_RADIUS, EXHAUST_PORT_ORBIT_SPEED, HULL_ROLL_RATE, SURFACE_HIT_MARGIN,
};
use crate::events::CombatantKind;
use crate::health::{Combatant, Destroyed, Health};
use crate::state::{GameState, SimStep};
use bevy::prelude::*;

// ── Components ────────────────────────────────────────────────────────────────

/// Marker for the battle station entity.
#[derive(Component)]
pub struct DeathStar;

/// The station's weak point, a child of the station entity.
#[derive(Component, Debug)]
pub struct ExhaustPort {
    /// Angle along the circular track, in radians.
    pub angle: f32,
}

// ── Spawning ──────────────────────────────────────────────────────────────────

/// Port local position on the front face for a given track angle.
fn port_local_position(angle: f32) -> Vec3 {
    // The track is a circle of radius EXHAUST_PORT_ORBIT_RADIUS on the
    // player-facing (+Z) face; the port sits on the hull sphere itself.
    let face_offset =
        (DEATH_STAR_RADIUS * DEATH_STAR_RADIUS - EXHAUST_PORT_ORBIT_RADIUS * EXHAUST_PORT_ORBIT_RADIUS)
            .sqrt();
    Vec3::new(
        angle.cos() * EXHAUST_PORT_ORBIT_RADIUS,
        angle.sin() * EXHAUST_PORT_ORBIT_RADIUS,
        face_offset,
    )
}

/// Spawn the station and its exhaust-port child.
pub fn spawn_death_star(mut commands: Commands, config: Res<GameConfig>) {
    let station = commands
        .spawn((
            DeathStar,
            Health::new(config.death_star_health),
            Combatant {
                kind: CombatantKind::DeathStar,
                removal_delay: DEATH_STAR_REMOVAL_DELAY,
            },
            Transform::from_translation(DEATH_STAR_CENTER),
            Visibility::default(),
        ))
        .id();

    commands.spawn((
        ExhaustPort { angle: 0.0 },
        Transform::from_translation(port_local_position(0.0)),
        Visibility::default(),
        ChildOf(station),
    ));
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Slow roll of the whole hull around its facing axis.  The port rides
/// along as a child, which is what makes the lock a moving target.
pub fn hull_roll_system(
    time: Res<Time>,
    mut q: Query<&mut Transform, (With<DeathStar>, Without<Destroyed>)>,
) {
    let dt = time.delta_secs();
    for mut transform in q.iter_mut() {
        transform.rotate_local_z(HULL_ROLL_RATE * dt);
    }
}

/// Advance the port along its own circular track, independent of the roll.
pub fn exhaust_port_orbit_system(
    time: Res<Time>,
    mut q: Query<(&mut ExhaustPort, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (mut port, mut transform) in q.iter_mut() {
        port.angle += EXHAUST_PORT_ORBIT_SPEED * dt;
        transform.translation = port_local_position(port.angle);
    }
}

// ── Hit classification ────────────────────────────────────────────────────────

/// Station hit classes, checked in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathStarHit {
    /// Shot within the exhaust port's critical sphere.
    Critical,
    /// Shot within the hull surface shell.
    Surface,
}

/// Classify a shot position against the station.
///
/// Port first: its critical sphere lies inside the hull shell, so the order
/// is what makes criticals possible at all.
pub fn classify_hit(shot: Vec3, center: Vec3, port: Vec3) -> Option<DeathStarHit> {
    if shot.distance(port) < EXHAUST_PORT_CRITICAL_RADIUS {
        return Some(DeathStarHit::Critical);
    }
    if shot.distance(center) < DEATH_STAR_RADIUS + SURFACE_HIT_MARGIN {
        return Some(DeathStarHit::Surface);
    }
    None
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct DeathStarPlugin;

impl Plugin for DeathStarPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_death_star).add_systems(
            Update,
            (hull_roll_system, exhaust_port_orbit_system)
                .in_set(SimStep::Movement)
                .run_if(in_state(GameState::Playing)),
        );
    }
}
