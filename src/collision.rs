//! Distance-threshold hit detection and damage resolution.
//!
//! All hit tests are point-vs-sphere checks against per-kind radii; no
//! physics engine is involved.  The systems here never mutate [`Health`]
//! directly — every confirmed hit is queued into the [`DamageQueue`] and
//! [`apply_damage_system`] drains it exactly once at the end of the chain.
//! A projectile confirms at most one hit: the first system to claim it sets
//! `has_hit` and schedules the despawn, and later systems skip it.
//!
//! Runs in `PostUpdate`, after the frame's movement has settled.

use crate::config::GameConfig;
use crate::constants::{
    ENEMY_BOLT_HIT_RADIUS, TIE_COLLISION_DAMAGE_TO_PLAYER, TIE_COLLISION_DAMAGE_TO_TIE,
    TIE_COLLISION_DISTANCE, TIE_HIT_RADIUS, TURRET_COLLISION_DAMAGE_TO_PLAYER,
    TURRET_COLLISION_DAMAGE_TO_TURRET, TURRET_COLLISION_DISTANCE, TURRET_HIT_RADIUS,
};
use crate::death_star::{classify_hit, DeathStar, DeathStarHit, ExhaustPort};
use crate::events::GameMessage;
use crate::health::{apply_damage_system, DamageQueue, Destroyed, Invulnerability};
use crate::player::{ActiveEffects, Player};
use crate::projectile::{Projectile, ProjectileOwner};
use crate::state::GameState;
use crate::tie_fighter::TieFighter;
use crate::turret::Turret;
use bevy::prelude::*;

// ── Player bolts vs the station ───────────────────────────────────────────────

/// Resolve player bolts against the station: port criticals first, then
/// surface hits, per [`classify_hit`].
pub fn player_bolts_vs_death_star_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut q_bolts: Query<(Entity, &mut Projectile, &Transform)>,
    q_station: Query<(Entity, &Transform), (With<DeathStar>, Without<Destroyed>, Without<Projectile>)>,
    q_port: Query<&GlobalTransform, With<ExhaustPort>>,
    mut damage: ResMut<DamageQueue>,
    mut messages: MessageWriter<GameMessage>,
) {
    let Ok((station, station_transform)) = q_station.single() else {
        return;
    };
    let Ok(port) = q_port.single() else {
        return;
    };
    let center = station_transform.translation;
    let port_pos = port.translation();

    for (entity, mut bolt, transform) in q_bolts.iter_mut() {
        if bolt.owner != ProjectileOwner::Player || bolt.has_hit {
            continue;
        }
        let Some(hit) = classify_hit(transform.translation, center, port_pos) else {
            continue;
        };

        match hit {
            DeathStarHit::Critical => {
                damage.add(station, config.exhaust_port_critical_damage);
                messages.write(GameMessage::critical("Direct hit on the exhaust port!"));
            }
            DeathStarHit::Surface => {
                damage.add(station, config.surface_hit_damage);
            }
        }
        bolt.has_hit = true;
        commands.entity(entity).despawn();
    }
}

// ── Player bolts vs enemies ───────────────────────────────────────────────────

/// Resolve player bolts against fighters and turrets.  Each bolt claims at
/// most one target.
pub fn player_bolts_vs_enemies_system(
    mut commands: Commands,
    mut q_bolts: Query<(Entity, &mut Projectile, &Transform)>,
    q_ties: Query<(Entity, &Transform), (With<TieFighter>, Without<Destroyed>, Without<Projectile>)>,
    q_turrets: Query<(Entity, &GlobalTransform), (With<Turret>, Without<Destroyed>)>,
    mut damage: ResMut<DamageQueue>,
) {
    for (entity, mut bolt, transform) in q_bolts.iter_mut() {
        if bolt.owner != ProjectileOwner::Player || bolt.has_hit {
            continue;
        }
        let pos = transform.translation;

        let hit_target = q_ties
            .iter()
            .find(|(_, t)| pos.distance(t.translation) < TIE_HIT_RADIUS)
            .map(|(e, _)| e)
            .or_else(|| {
                q_turrets
                    .iter()
                    .find(|(_, g)| pos.distance(g.translation()) < TURRET_HIT_RADIUS)
                    .map(|(e, _)| e)
            });

        if let Some(target) = hit_target {
            damage.add(target, bolt.damage);
            bolt.has_hit = true;
            commands.entity(entity).despawn();
        }
    }
}

// ── Enemy bolts vs the player ─────────────────────────────────────────────────

/// Resolve enemy bolts against the player ship.
///
/// An invulnerable player is intangible to bolts: they pass through rather
/// than being consumed, so the grace window cannot be farmed to sweep the
/// sky clean.  A shielded player consumes the bolt but takes nothing.
pub fn enemy_bolts_vs_player_system(
    mut commands: Commands,
    mut q_bolts: Query<(Entity, &mut Projectile, &Transform)>,
    q_player: Query<
        (Entity, &Transform, &Invulnerability, &ActiveEffects),
        (With<Player>, Without<Destroyed>, Without<Projectile>),
    >,
    mut damage: ResMut<DamageQueue>,
    mut messages: MessageWriter<GameMessage>,
) {
    let Ok((player, player_transform, invuln, effects)) = q_player.single() else {
        return;
    };
    let player_pos = player_transform.translation;

    for (entity, mut bolt, transform) in q_bolts.iter_mut() {
        if bolt.owner == ProjectileOwner::Player || bolt.has_hit {
            continue;
        }
        if transform.translation.distance(player_pos) > ENEMY_BOLT_HIT_RADIUS {
            continue;
        }
        if invuln.is_active() {
            continue;
        }

        if effects.shield_active() {
            messages.write(GameMessage::info("Shield absorbed the hit"));
        } else {
            damage.add(player, bolt.damage);
            let text = match bolt.owner {
                ProjectileOwner::TieFighter => "Hit by TIE fighter fire!",
                _ => "Hit by turret fire!",
            };
            messages.write(GameMessage::warning(text));
        }
        bolt.has_hit = true;
        commands.entity(entity).despawn();
    }
}

// ── Proximity collisions ──────────────────────────────────────────────────────

/// Ramming damage: flying into a fighter or a turret hurts both sides.
/// Same-frame multi-rams accumulate in the queue and are applied under a
/// single invulnerability grant.  While the window is active the player is
/// intangible to rams too: neither side takes damage, matching the bolt
/// pass-through rule.
pub fn proximity_collision_system(
    q_player: Query<(Entity, &Transform, &Invulnerability), (With<Player>, Without<Destroyed>)>,
    q_ties: Query<(Entity, &Transform), (With<TieFighter>, Without<Destroyed>, Without<Player>)>,
    q_turrets: Query<(Entity, &GlobalTransform), (With<Turret>, Without<Destroyed>)>,
    mut damage: ResMut<DamageQueue>,
    mut messages: MessageWriter<GameMessage>,
) {
    let Ok((player, player_transform, invuln)) = q_player.single() else {
        return;
    };
    if invuln.is_active() {
        return;
    }
    let player_pos = player_transform.translation;

    for (tie, transform) in q_ties.iter() {
        if player_pos.distance(transform.translation) < TIE_COLLISION_DISTANCE {
            damage.add(player, TIE_COLLISION_DAMAGE_TO_PLAYER);
            damage.add(tie, TIE_COLLISION_DAMAGE_TO_TIE);
            messages.write(GameMessage::warning("Collision!"));
        }
    }
    for (turret, global) in q_turrets.iter() {
        if player_pos.distance(global.translation()) < TURRET_COLLISION_DISTANCE {
            damage.add(player, TURRET_COLLISION_DAMAGE_TO_PLAYER);
            damage.add(turret, TURRET_COLLISION_DAMAGE_TO_TURRET);
            messages.write(GameMessage::warning("Collision!"));
        }
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// The whole resolution chain, ending with the single damage-apply pass.
pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PostUpdate,
            (
                player_bolts_vs_death_star_system,
                player_bolts_vs_enemies_system,
                enemy_bolts_vs_player_system,
                proximity_collision_system,
                apply_damage_system,
            )
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        DEATH_STAR_CENTER, DEATH_STAR_RADIUS, INVULNERABILITY_WINDOW, PLAYER_REMOVAL_DELAY,
    };
    use crate::events::{CombatantKind, EventsPlugin, GameMessage, Severity};
    use crate::health::{Combatant, Health};
    use crate::weapons::spawn_bolt;

    fn collision_test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, EventsPlugin));
        app.insert_resource(GameConfig::default());
        app.insert_resource(DamageQueue::default());
        app.add_systems(
            PostUpdate,
            (
                player_bolts_vs_death_star_system,
                player_bolts_vs_enemies_system,
                enemy_bolts_vs_player_system,
                proximity_collision_system,
                apply_damage_system,
            )
                .chain(),
        );
        app
    }

    fn spawn_station_with_port(app: &mut App) -> (Entity, Vec3) {
        let station = app
            .world_mut()
            .spawn((
                DeathStar,
                Health::new(100.0),
                Combatant {
                    kind: CombatantKind::DeathStar,
                    removal_delay: 2.0,
                },
                Transform::from_translation(DEATH_STAR_CENTER),
            ))
            .id();
        let port_pos = DEATH_STAR_CENTER + Vec3::new(0.0, 0.0, DEATH_STAR_RADIUS);
        app.world_mut().spawn((
            ExhaustPort { angle: 0.0 },
            Transform::from_translation(port_pos),
            GlobalTransform::from(Transform::from_translation(port_pos)),
        ));
        (station, port_pos)
    }

    fn spawn_test_player(app: &mut App) -> Entity {
        app.world_mut()
            .spawn((
                Player,
                Transform::default(),
                Health::new(100.0),
                Combatant {
                    kind: CombatantKind::Player,
                    removal_delay: PLAYER_REMOVAL_DELAY,
                },
                Invulnerability::new(INVULNERABILITY_WINDOW),
                ActiveEffects::default(),
            ))
            .id()
    }

    fn drop_bolt(app: &mut App, owner: ProjectileOwner, at: Vec3, damage: f32) -> Entity {
        let bolt = spawn_bolt(
            &mut app.world_mut().commands(),
            owner,
            at,
            Vec3::NEG_Z,
            0.0,
            damage,
            10.0,
        );
        app.world_mut().flush();
        bolt
    }

    fn health_of(app: &App, entity: Entity) -> f32 {
        app.world().get::<Health>(entity).unwrap().current
    }

    #[test]
    fn bolt_at_the_port_deals_critical_not_surface_damage() {
        let config = GameConfig::default();
        let mut app = collision_test_app();
        let (station, port_pos) = spawn_station_with_port(&mut app);

        drop_bolt(&mut app, ProjectileOwner::Player, port_pos, 10.0);
        app.update();

        assert_eq!(
            health_of(&app, station),
            100.0 - config.exhaust_port_critical_damage
        );
    }

    #[test]
    fn bolt_on_the_hull_away_from_the_port_deals_surface_damage() {
        let config = GameConfig::default();
        let mut app = collision_test_app();
        let (station, _) = spawn_station_with_port(&mut app);

        let hull = DEATH_STAR_CENTER - Vec3::new(0.0, 0.0, DEATH_STAR_RADIUS);
        drop_bolt(&mut app, ProjectileOwner::Player, hull, 10.0);
        app.update();

        assert_eq!(health_of(&app, station), 100.0 - config.surface_hit_damage);
    }

    #[test]
    fn one_bolt_claims_at_most_one_target() {
        let config = GameConfig::default();
        let mut app = collision_test_app();

        // Two overlapping fighters; one bolt between them.
        let mut ties = Vec::new();
        for _ in 0..2 {
            ties.push(
                app.world_mut()
                    .spawn((
                        TieFighter { strafe_dir: 1.0 },
                        Health::new(config.tie_health),
                        Combatant {
                            kind: CombatantKind::TieFighter,
                            removal_delay: 1.0,
                        },
                        Transform::from_xyz(0.0, 0.0, -100.0),
                    ))
                    .id(),
            );
        }
        let bolt = drop_bolt(
            &mut app,
            ProjectileOwner::Player,
            Vec3::new(0.0, 0.0, -100.0),
            10.0,
        );
        app.update();

        let total: f32 = ties.iter().map(|&t| health_of(&app, t)).sum();
        assert_eq!(
            total,
            2.0 * config.tie_health - 10.0,
            "exactly one fighter takes the bolt"
        );
        assert!(app.world().get_entity(bolt).is_err(), "bolt consumed");
    }

    #[test]
    fn ramming_a_fighter_and_a_turret_in_one_frame_stacks_in_one_window() {
        let config = GameConfig::default();
        let mut app = collision_test_app();
        let player = spawn_test_player(&mut app);

        app.world_mut().spawn((
            TieFighter { strafe_dir: 1.0 },
            Health::new(config.tie_health),
            Combatant {
                kind: CombatantKind::TieFighter,
                removal_delay: 1.0,
            },
            Transform::from_xyz(5.0, 0.0, 0.0),
        ));
        app.world_mut().spawn((
            Turret { aim: Vec3::Y },
            Health::new(config.turret_health),
            Combatant {
                kind: CombatantKind::Turret,
                removal_delay: 1.0,
            },
            Transform::from_xyz(-5.0, 0.0, 0.0),
            GlobalTransform::from(Transform::from_xyz(-5.0, 0.0, 0.0)),
        ));

        app.update();

        // 15 (fighter ram) + 10 (turret ram) under a single window.
        assert_eq!(health_of(&app, player), 75.0);
    }

    #[test]
    fn ram_damage_is_mutual_only_while_the_player_is_vulnerable() {
        let config = GameConfig::default();
        let mut app = collision_test_app();
        let player = spawn_test_player(&mut app);
        app.world_mut()
            .get_mut::<Invulnerability>(player)
            .unwrap()
            .timer = 1.0;

        // Fighter parked inside ram distance; 20 ram damage would kill it.
        let tie = app
            .world_mut()
            .spawn((
                TieFighter { strafe_dir: 1.0 },
                Health::new(config.tie_health),
                Combatant {
                    kind: CombatantKind::TieFighter,
                    removal_delay: 1.0,
                },
                Transform::from_xyz(5.0, 0.0, 0.0),
            ))
            .id();

        // Several frames of contact while invulnerable: neither side hurts.
        for _ in 0..3 {
            app.update();
        }
        assert_eq!(health_of(&app, player), 100.0);
        assert_eq!(health_of(&app, tie), config.tie_health);

        // Window expired: the ram damages both sides again.
        app.world_mut()
            .get_mut::<Invulnerability>(player)
            .unwrap()
            .timer = 0.0;
        app.update();

        assert_eq!(health_of(&app, player), 85.0);
        assert_eq!(
            health_of(&app, tie),
            config.tie_health - TIE_COLLISION_DAMAGE_TO_TIE
        );
    }

    #[test]
    fn shield_consumes_the_bolt_without_damage() {
        let mut app = collision_test_app();
        let player = spawn_test_player(&mut app);
        app.world_mut()
            .get_mut::<ActiveEffects>(player)
            .unwrap()
            .shield_secs = 10.0;

        let bolt = drop_bolt(&mut app, ProjectileOwner::Turret, Vec3::new(2.0, 0.0, 0.0), 5.0);
        app.update();

        assert_eq!(health_of(&app, player), 100.0);
        assert!(app.world().get_entity(bolt).is_err(), "bolt consumed");
        let absorbed = app
            .world_mut()
            .resource_mut::<Messages<GameMessage>>()
            .drain()
            .any(|m| m.severity == Severity::Info && m.text.contains("absorbed"));
        assert!(absorbed, "absorb feedback must be announced");
    }

    #[test]
    fn enemy_bolt_passes_through_an_invulnerable_player() {
        let mut app = collision_test_app();
        let player = spawn_test_player(&mut app);
        app.world_mut()
            .get_mut::<Invulnerability>(player)
            .unwrap()
            .timer = 1.0;

        let bolt = drop_bolt(
            &mut app,
            ProjectileOwner::TieFighter,
            Vec3::new(2.0, 0.0, 0.0),
            10.0,
        );
        app.update();

        assert_eq!(health_of(&app, player), 100.0);
        assert!(
            app.world().get_entity(bolt).is_ok(),
            "bolt must fly on, not be consumed"
        );
    }
}
