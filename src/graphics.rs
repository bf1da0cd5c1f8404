//! 3D presentation: chase camera, lighting, starfield, and spawn-time mesh
//! attachment.
//!
//! Simulation entities spawn with bare transforms; the `Added<T>` systems
//! here attach meshes and materials once per entity.  Headless test apps
//! never register this plugin, so the core stays renderer-free.

use crate::constants::{
    DEATH_STAR_RADIUS, EXHAUST_PORT_RADIUS, STARFIELD_COUNT, STARFIELD_RADIUS,
};
use crate::death_star::{DeathStar, ExhaustPort};
use crate::player::Player;
use crate::powerup::{PowerUp, PowerUpKind};
use crate::projectile::{Projectile, ProjectileOwner};
use crate::tie_fighter::TieFighter;
use crate::turret::Turret;
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::PrimitiveTopology;

// ── Camera ────────────────────────────────────────────────────────────────────

/// Marker for the chase camera.
#[derive(Component)]
pub struct ChaseCamera;

/// Camera offset in ship space: behind and above the cockpit.
const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 6.0, 18.0);

/// How quickly the camera closes on its target pose, per second.
const CAMERA_FOLLOW_RATE: f32 = 5.0;

pub fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        ChaseCamera,
        Transform::from_xyz(0.0, 6.0, 318.0).looking_at(Vec3::new(0.0, 0.0, 300.0), Vec3::Y),
    ));
}

/// Ease the camera toward a pose behind the ship, looking past it.
pub fn camera_follow_system(
    time: Res<Time>,
    q_player: Query<&Transform, (With<Player>, Without<ChaseCamera>)>,
    mut q_camera: Query<&mut Transform, With<ChaseCamera>>,
) {
    let Ok(player) = q_player.single() else {
        return;
    };
    let Ok(mut camera) = q_camera.single_mut() else {
        return;
    };

    let target = player.translation + player.rotation * CAMERA_OFFSET;
    let t = (CAMERA_FOLLOW_RATE * time.delta_secs()).clamp(0.0, 1.0);
    camera.translation = camera.translation.lerp(target, t);

    let look_at = player.translation + *player.forward() * 50.0;
    camera.look_at(look_at, player.rotation * Vec3::Y);
}

// ── Lighting ──────────────────────────────────────────────────────────────────

pub fn setup_lights(mut commands: Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.6, 0.65, 0.8),
        brightness: 120.0,
        ..default()
    });
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            ..default()
        },
        Transform::from_xyz(500.0, 800.0, 200.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

// ── Starfield ─────────────────────────────────────────────────────────────────

/// Build a point-cloud mesh of stars scattered on a distant sphere shell.
/// Deterministic LCG placement; no RNG state needed.
fn starfield_mesh() -> Mesh {
    let mut positions = Vec::with_capacity(STARFIELD_COUNT);
    let mut state: u64 = 0x5DEE_CE66;
    let mut next = || {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        ((state >> 33) % 10_000) as f32 / 10_000.0
    };
    for _ in 0..STARFIELD_COUNT {
        let theta = next() * std::f32::consts::TAU;
        let z = next() * 2.0 - 1.0;
        let r = (1.0 - z * z).sqrt();
        positions.push([
            r * theta.cos() * STARFIELD_RADIUS,
            z * STARFIELD_RADIUS,
            r * theta.sin() * STARFIELD_RADIUS,
        ]);
    }

    Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::RENDER_WORLD)
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
}

pub fn setup_starfield(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(starfield_mesh())),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            unlit: true,
            ..default()
        })),
        Transform::default(),
    ));
}

// ── Spawn-time mesh attachment ────────────────────────────────────────────────

/// Attach the player ship mesh on spawn (once, via `Added<Player>`).
pub fn attach_player_mesh_system(
    mut commands: Commands,
    query: Query<Entity, Added<Player>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for entity in query.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Cone::new(2.5, 7.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.85, 0.85, 0.90),
                ..default()
            })),
        ));
    }
}

/// Attach the station hull sphere and the port marker.
pub fn attach_station_mesh_system(
    mut commands: Commands,
    q_station: Query<Entity, Added<DeathStar>>,
    q_port: Query<Entity, Added<ExhaustPort>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for entity in q_station.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Sphere::new(DEATH_STAR_RADIUS))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.45, 0.47, 0.52),
                ..default()
            })),
        ));
    }
    for entity in q_port.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Sphere::new(EXHAUST_PORT_RADIUS))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(1.0, 0.55, 0.1),
                emissive: LinearRgba::rgb(2.0, 1.0, 0.1),
                ..default()
            })),
        ));
    }
}

/// Attach fighter and turret meshes on spawn.
pub fn attach_enemy_mesh_system(
    mut commands: Commands,
    q_ties: Query<Entity, Added<TieFighter>>,
    q_turrets: Query<Entity, Added<Turret>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for entity in q_ties.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Cuboid::new(6.0, 6.0, 4.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.25, 0.28, 0.35),
                ..default()
            })),
        ));
    }
    for entity in q_turrets.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Cylinder::new(1.5, 5.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.55, 0.30, 0.25),
                ..default()
            })),
        ));
    }
}

fn bolt_color(owner: ProjectileOwner) -> Color {
    match owner {
        ProjectileOwner::Player => Color::srgb(0.2, 1.0, 0.3),
        ProjectileOwner::TieFighter => Color::srgb(1.0, 0.2, 0.2),
        ProjectileOwner::Turret => Color::srgb(1.0, 0.5, 0.1),
    }
}

/// Attach an elongated glowing bolt mesh to every newly-fired projectile.
pub fn attach_projectile_mesh_system(
    mut commands: Commands,
    query: Query<(Entity, &Projectile), Added<Projectile>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, projectile) in query.iter() {
        let color = bolt_color(projectile.owner);
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Capsule3d::new(0.4, 3.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: color,
                emissive: color.to_linear() * 4.0,
                unlit: true,
                ..default()
            })),
        ));
    }
}

fn powerup_color(kind: PowerUpKind) -> Color {
    match kind {
        PowerUpKind::Health => Color::srgb(0.3, 1.0, 0.4),
        PowerUpKind::Shield => Color::srgb(0.3, 0.6, 1.0),
        PowerUpKind::RapidFire => Color::srgb(1.0, 0.9, 0.2),
        PowerUpKind::DoubleDamage => Color::srgb(1.0, 0.3, 0.8),
    }
}

/// Attach a glowing octahedron-ish marker to every dropped power-up.
pub fn attach_powerup_mesh_system(
    mut commands: Commands,
    query: Query<(Entity, &PowerUp), Added<PowerUp>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, powerup) in query.iter() {
        let color = powerup_color(powerup.kind);
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Sphere::new(3.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: color,
                emissive: color.to_linear() * 2.0,
                ..default()
            })),
        ));
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct GraphicsPlugin;

impl Plugin for GraphicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_camera, setup_lights, setup_starfield))
            .add_systems(
                Update,
                (
                    camera_follow_system,
                    attach_player_mesh_system,
                    attach_station_mesh_system,
                    attach_enemy_mesh_system,
                    attach_projectile_mesh_system,
                    attach_powerup_mesh_system,
                ),
            );
    }
}
