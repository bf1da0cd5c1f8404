//! Power-ups: floating pickups with timed effects.
//!
//! A power-up idles in place (bob + spin), expires uncollected after a
//! fixed lifetime, and on collection applies its effect to the player.
//! Timed effects do not stack: re-collecting refreshes the remaining
//! duration.

use crate::config::GameConfig;
use crate::constants::{
    DOUBLE_DAMAGE_DURATION, POWERUP_BOB_AMPLITUDE, POWERUP_BOB_RATE, POWERUP_COLLECTION_RADIUS,
    POWERUP_HEALTH_BONUS, POWERUP_LIFETIME, POWERUP_SPIN_RATE, RAPID_FIRE_DIVISOR,
    RAPID_FIRE_DURATION, SHIELD_DURATION,
};
use crate::events::{CombatantKind, GameMessage, HealthChanged, SoundEvent, SoundKind};
use crate::health::{Destroyed, Health};
use crate::player::{ActiveEffects, Player};
use crate::state::{GameState, SimStep};
use crate::weapons::FireControl;
use bevy::prelude::*;

// ── Components ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    Health,
    Shield,
    RapidFire,
    DoubleDamage,
}

impl PowerUpKind {
    /// Effect duration in seconds; `None` for instant effects.
    pub fn duration(self) -> Option<f32> {
        match self {
            PowerUpKind::Health => None,
            PowerUpKind::Shield => Some(SHIELD_DURATION),
            PowerUpKind::RapidFire => Some(RAPID_FIRE_DURATION),
            PowerUpKind::DoubleDamage => Some(DOUBLE_DAMAGE_DURATION),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::Health => "Repair kit",
            PowerUpKind::Shield => "Shield",
            PowerUpKind::RapidFire => "Rapid fire",
            PowerUpKind::DoubleDamage => "Double damage",
        }
    }

    /// Uniform pick from a roll in `[0, 1)`.
    pub fn from_roll(roll: f32) -> Self {
        match (roll * 4.0) as u32 {
            0 => PowerUpKind::Health,
            1 => PowerUpKind::Shield,
            2 => PowerUpKind::RapidFire,
            _ => PowerUpKind::DoubleDamage,
        }
    }
}

#[derive(Component, Debug)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    /// Seconds since spawn; expires at [`POWERUP_LIFETIME`].
    pub age: f32,
    /// Phase offset so a batch of pickups does not bob in sync.
    pub bob_phase: f32,
}

// ── Spawning ──────────────────────────────────────────────────────────────────

pub fn spawn_powerup(
    commands: &mut Commands,
    kind: PowerUpKind,
    position: Vec3,
    spawn_index: u64,
) -> Entity {
    commands
        .spawn((
            PowerUp {
                kind,
                age: 0.0,
                bob_phase: (spawn_index as f32) * 1.7,
            },
            Transform::from_translation(position),
            Visibility::default(),
        ))
        .id()
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Idle animation: sinusoidal bob plus a slow spin.  The bob is applied as
/// a per-frame delta so the anchor position never needs to be stored.
pub fn powerup_idle_system(time: Res<Time>, mut q: Query<(&PowerUp, &mut Transform)>) {
    let dt = time.delta_secs();
    let now = time.elapsed_secs();
    for (powerup, mut transform) in q.iter_mut() {
        let phase = now * POWERUP_BOB_RATE + powerup.bob_phase;
        transform.translation.y += phase.cos() * POWERUP_BOB_AMPLITUDE * POWERUP_BOB_RATE * dt;
        transform.rotate_local_y(POWERUP_SPIN_RATE * dt);
    }
}

/// Age pickups and remove the ones nobody collected in time.
pub fn powerup_expiry_system(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &mut PowerUp)>,
) {
    let dt = time.delta_secs();
    for (entity, mut powerup) in q.iter_mut() {
        powerup.age += dt;
        if powerup.age >= POWERUP_LIFETIME {
            commands.entity(entity).despawn();
        }
    }
}

/// Collect pickups the player flies through and apply their effects.
#[allow(clippy::type_complexity)]
pub fn powerup_collection_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut q_player: Query<
        (
            &Transform,
            &mut Health,
            &mut ActiveEffects,
            &mut FireControl,
        ),
        (With<Player>, Without<Destroyed>),
    >,
    q_powerups: Query<(Entity, &PowerUp, &Transform), Without<Player>>,
    mut health_events: MessageWriter<HealthChanged>,
    mut messages: MessageWriter<GameMessage>,
    mut sounds: MessageWriter<SoundEvent>,
) {
    let Ok((transform, mut health, mut effects, mut fire)) = q_player.single_mut() else {
        return;
    };

    for (entity, powerup, pickup_transform) in q_powerups.iter() {
        if transform
            .translation
            .distance(pickup_transform.translation)
            > POWERUP_COLLECTION_RADIUS
        {
            continue;
        }

        match powerup.kind {
            PowerUpKind::Health => {
                health.heal(POWERUP_HEALTH_BONUS);
                health_events.write(HealthChanged {
                    subject: CombatantKind::Player,
                    percent: health.percent(),
                });
            }
            PowerUpKind::Shield => {
                effects.shield_secs = SHIELD_DURATION;
            }
            PowerUpKind::RapidFire => {
                // Refresh, don't stack; the interval swap is undone by the
                // effect-expiry tick in the player module.
                effects.rapid_fire_secs = RAPID_FIRE_DURATION;
                fire.interval = config.player_fire_interval / RAPID_FIRE_DIVISOR;
            }
            PowerUpKind::DoubleDamage => {
                effects.double_damage_secs = DOUBLE_DAMAGE_DURATION;
            }
        }

        messages.write(GameMessage::info(format!(
            "{} collected!",
            powerup.kind.label()
        )));
        sounds.write(SoundEvent(SoundKind::PowerUpPickup));
        commands.entity(entity).despawn();
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct PowerUpPlugin;

impl Plugin for PowerUpPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                powerup_expiry_system.in_set(SimStep::Timers),
                (powerup_idle_system, powerup_collection_system)
                    .chain()
                    .in_set(SimStep::Movement),
            )
                .run_if(in_state(GameState::Playing)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventsPlugin;

    fn collection_test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, EventsPlugin));
        app.insert_resource(GameConfig::default());
        app.add_systems(Update, powerup_collection_system);
        app
    }

    fn spawn_test_player(app: &mut App, health: f32) -> Entity {
        let config = GameConfig::default();
        app.world_mut()
            .spawn((
                Player,
                Transform::default(),
                Health {
                    current: health,
                    max: config.player_max_health,
                },
                ActiveEffects::default(),
                FireControl::new(config.player_fire_interval),
            ))
            .id()
    }

    fn drop_pickup(app: &mut App, kind: PowerUpKind, at: Vec3) -> Entity {
        let pickup = spawn_powerup(&mut app.world_mut().commands(), kind, at, 0);
        app.world_mut().flush();
        pickup
    }

    #[test]
    fn health_pickup_heals_with_clamp() {
        let mut app = collection_test_app();
        let player = spawn_test_player(&mut app, 85.0);
        let pickup = drop_pickup(&mut app, PowerUpKind::Health, Vec3::new(5.0, 0.0, 0.0));

        app.update();

        // 85 + 30 clamps to the 100 max.
        assert_eq!(app.world().get::<Health>(player).unwrap().current, 100.0);
        assert!(app.world().get_entity(pickup).is_err(), "pickup consumed");
    }

    #[test]
    fn rapid_fire_divides_the_interval_and_refreshes_on_recollect() {
        let config = GameConfig::default();
        let mut app = collection_test_app();
        let player = spawn_test_player(&mut app, 100.0);

        drop_pickup(&mut app, PowerUpKind::RapidFire, Vec3::ZERO);
        app.update();

        let fire = *app.world().get::<FireControl>(player).unwrap();
        assert_eq!(fire.interval, config.player_fire_interval / 3.0);

        // Simulate a half-spent effect, then re-collect: refresh, not stack.
        app.world_mut()
            .get_mut::<ActiveEffects>(player)
            .unwrap()
            .rapid_fire_secs = 2.0;
        drop_pickup(&mut app, PowerUpKind::RapidFire, Vec3::ZERO);
        app.update();

        let effects = app.world().get::<ActiveEffects>(player).unwrap();
        assert_eq!(effects.rapid_fire_secs, RAPID_FIRE_DURATION);
    }

    #[test]
    fn pickup_out_of_reach_is_not_collected() {
        let mut app = collection_test_app();
        spawn_test_player(&mut app, 100.0);
        let pickup = drop_pickup(
            &mut app,
            PowerUpKind::Shield,
            Vec3::new(POWERUP_COLLECTION_RADIUS + 1.0, 0.0, 0.0),
        );

        app.update();
        assert!(app.world().get_entity(pickup).is_ok());
    }

    #[test]
    fn uncollected_pickup_expires_after_lifetime() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_systems(Update, powerup_expiry_system);

        let pickup = spawn_powerup(
            &mut app.world_mut().commands(),
            PowerUpKind::DoubleDamage,
            Vec3::ZERO,
            0,
        );
        app.world_mut().flush();
        app.world_mut().get_mut::<PowerUp>(pickup).unwrap().age = POWERUP_LIFETIME - 0.0001;

        std::thread::sleep(std::time::Duration::from_millis(2));
        app.update();
        app.update();
        assert!(app.world().get_entity(pickup).is_err());
    }

    #[test]
    fn kind_from_roll_covers_all_variants() {
        assert_eq!(PowerUpKind::from_roll(0.0), PowerUpKind::Health);
        assert_eq!(PowerUpKind::from_roll(0.3), PowerUpKind::Shield);
        assert_eq!(PowerUpKind::from_roll(0.6), PowerUpKind::RapidFire);
        assert_eq!(PowerUpKind::from_roll(0.99), PowerUpKind::DoubleDamage);
    }
}
