//! Shared health/damage state machine.
//!
//! Every combatant (player, station, TIE fighter, turret) carries the same
//! [`Health`] pool and [`Combatant`] tag.  Collision systems never mutate
//! health directly: they accumulate amounts into the [`DamageQueue`] and
//! [`apply_damage_system`] drains it in a single pass per frame.  That pass
//! owns the whole state machine:
//!
//! `Alive` → (player only) `Invulnerable` → `Destroyed` (terminal)
//!
//! - shielded player: damage fully absorbed, health untouched;
//! - invulnerable player: damage ignored for the rest of the window;
//! - otherwise subtract, clamp to `[0, max]`, grant the player a fresh
//!   invulnerability window, and on reaching zero insert [`Destroyed`]
//!   exactly once — which also writes the one-shot
//!   [`CombatantDestroyed`] message that scoring and terminal evaluation
//!   key off.
//!
//! A `Destroyed` entity is filtered out of the damage pass entirely, so it
//! never takes (or, since its AI/firing systems filter the same way, deals)
//! further damage.  After `removal_timer` elapses the entity and its
//! children are despawned.

use crate::events::{CombatantDestroyed, CombatantKind, HealthChanged, SoundEvent, SoundKind};
use crate::player::ActiveEffects;
use crate::state::{GameState, SimStep};
use bevy::prelude::*;
use std::collections::HashMap;

// ── Components ────────────────────────────────────────────────────────────────

/// Hit-point pool.  Invariant: `0 <= current <= max`.
#[derive(Component, Debug, Clone, Copy)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Fraction of the pool remaining, in `[0, 1]`.
    #[inline]
    pub fn percent(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            (self.current / self.max).clamp(0.0, 1.0)
        }
    }

    /// Restore hit points, clamped to `max`.
    #[inline]
    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }
}

/// Identity tag for every entity that owns a [`Health`] pool.
#[derive(Component, Debug, Clone, Copy)]
pub struct Combatant {
    pub kind: CombatantKind,
    /// Seconds between destruction and removal (destruction sequence length).
    pub removal_delay: f32,
}

/// Player-only damage grace window.  While `timer > 0` incoming damage is
/// ignored; a fresh window is granted on every applied (non-absorbed) hit.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Invulnerability {
    pub timer: f32,
    /// Window length granted on each applied hit.
    pub window: f32,
}

impl Invulnerability {
    pub fn new(window: f32) -> Self {
        Self { timer: 0.0, window }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.timer > 0.0
    }
}

/// Terminal marker.  Inserted exactly once by [`apply_damage_system`];
/// [`destruction_cleanup_system`] despawns the entity when the timer runs out.
#[derive(Component, Debug, Clone, Copy)]
pub struct Destroyed {
    pub removal_timer: f32,
}

// ── Damage queue ──────────────────────────────────────────────────────────────

/// Frame-scoped damage accumulator, drained once per frame.
///
/// Accumulating by entity means two same-frame hits (e.g. ramming a turret
/// and a fighter in one frame) are applied together under a single
/// invulnerability grant, matching the mutual-collision rules.
#[derive(Resource, Debug, Default)]
pub struct DamageQueue {
    pending: HashMap<Entity, f32>,
}

impl DamageQueue {
    pub fn add(&mut self, entity: Entity, amount: f32) {
        *self.pending.entry(entity).or_default() += amount;
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Decrement player invulnerability; runs in [`SimStep::Timers`] so an
/// expiry scheduled last frame is visible before this frame's damage pass.
pub fn tick_invulnerability_system(time: Res<Time>, mut q: Query<&mut Invulnerability>) {
    let dt = time.delta_secs();
    for mut inv in q.iter_mut() {
        inv.timer = (inv.timer - dt).max(0.0);
    }
}

/// Drain the [`DamageQueue`] and apply the health/damage state machine.
#[allow(clippy::type_complexity)]
pub fn apply_damage_system(
    mut commands: Commands,
    mut queue: ResMut<DamageQueue>,
    mut q_target: Query<
        (
            Entity,
            &mut Health,
            &Combatant,
            Option<&mut Invulnerability>,
            Option<&ActiveEffects>,
        ),
        Without<Destroyed>,
    >,
    mut health_events: MessageWriter<HealthChanged>,
    mut destroyed_events: MessageWriter<CombatantDestroyed>,
    mut sounds: MessageWriter<SoundEvent>,
) {
    if queue.is_empty() {
        return;
    }

    for (entity, amount) in queue.pending.drain() {
        // Target already destroyed or despawned: skip and continue.
        let Ok((entity, mut health, combatant, invuln, effects)) = q_target.get_mut(entity) else {
            continue;
        };

        // Shield fully absorbs, regardless of amount.
        if effects.is_some_and(|fx| fx.shield_active()) {
            continue;
        }

        if let Some(mut inv) = invuln {
            if inv.is_active() {
                continue;
            }
            inv.timer = inv.window;
        }

        health.current = (health.current - amount).clamp(0.0, health.max);
        health_events.write(HealthChanged {
            subject: combatant.kind,
            percent: health.percent(),
        });

        if health.current <= 0.0 {
            commands.entity(entity).insert(Destroyed {
                removal_timer: combatant.removal_delay,
            });
            destroyed_events.write(CombatantDestroyed {
                entity,
                kind: combatant.kind,
            });
            sounds.write(SoundEvent(SoundKind::Explosion));
        } else {
            sounds.write(SoundEvent(SoundKind::Impact));
        }
    }
}

/// Run down destruction sequences and remove finished entities (children
/// included).  Registered without a state gate so sequences finish even
/// after the match reaches a terminal state.
pub fn destruction_cleanup_system(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &mut Destroyed)>,
) {
    let dt = time.delta_secs();
    for (entity, mut destroyed) in q.iter_mut() {
        destroyed.removal_timer -= dt;
        if destroyed.removal_timer <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Registers the damage queue and the timer/cleanup systems.
/// [`apply_damage_system`] itself is scheduled by the collision plugin so it
/// sits at the end of the resolution chain.
pub struct HealthPlugin;

impl Plugin for HealthPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(DamageQueue::default())
            .add_systems(
                Update,
                tick_invulnerability_system
                    .in_set(SimStep::Timers)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(Update, destruction_cleanup_system);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::INVULNERABILITY_WINDOW;
    use crate::events::EventsPlugin;

    fn damage_test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, EventsPlugin));
        app.insert_resource(DamageQueue::default());
        app.add_systems(Update, apply_damage_system);
        app
    }

    fn queue_damage(app: &mut App, entity: Entity, amount: f32) {
        app.world_mut()
            .resource_mut::<DamageQueue>()
            .add(entity, amount);
    }

    fn health_of(app: &App, entity: Entity) -> f32 {
        app.world().get::<Health>(entity).unwrap().current
    }

    fn spawn_station(app: &mut App, hp: f32) -> Entity {
        app.world_mut()
            .spawn((
                Health::new(hp),
                Combatant {
                    kind: CombatantKind::DeathStar,
                    removal_delay: 2.0,
                },
            ))
            .id()
    }

    fn spawn_player(app: &mut App) -> Entity {
        app.world_mut()
            .spawn((
                Health::new(100.0),
                Combatant {
                    kind: CombatantKind::Player,
                    removal_delay: 2.0,
                },
                Invulnerability::new(INVULNERABILITY_WINDOW),
                ActiveEffects::default(),
            ))
            .id()
    }

    #[test]
    fn damage_clamps_at_zero_and_heal_clamps_at_max() {
        let mut app = damage_test_app();
        let target = spawn_station(&mut app, 30.0);

        queue_damage(&mut app, target, 1000.0);
        app.update();
        assert_eq!(health_of(&app, target), 0.0);

        let mut health = *app.world().get::<Health>(target).unwrap();
        health.heal(5000.0);
        assert_eq!(health.current, health.max);
    }

    #[test]
    fn five_critical_hits_destroy_station_exactly_on_the_fifth() {
        let mut app = damage_test_app();
        let station = spawn_station(&mut app, 100.0);

        for hit in 1..=5 {
            queue_damage(&mut app, station, 20.0);
            app.update();
            let destroyed = app.world().get::<Destroyed>(station).is_some();
            if hit < 5 {
                assert!(!destroyed, "must not be destroyed before hit 5");
                assert_eq!(health_of(&app, station), 100.0 - 20.0 * hit as f32);
            } else {
                assert!(destroyed, "must be destroyed on hit 5");
                assert_eq!(health_of(&app, station), 0.0);
            }
        }
    }

    #[test]
    fn destroyed_entity_takes_no_further_damage_and_awards_once() {
        let mut app = damage_test_app();
        let station = spawn_station(&mut app, 10.0);

        queue_damage(&mut app, station, 10.0);
        app.update();
        // Second kill attempt after destruction must be a no-op.
        queue_damage(&mut app, station, 10.0);
        app.update();

        assert_eq!(health_of(&app, station), 0.0);
        let destroyed_count = app
            .world_mut()
            .resource_mut::<Messages<CombatantDestroyed>>()
            .drain()
            .count();
        assert_eq!(destroyed_count, 1, "destruction message must fire once");
    }

    #[test]
    fn player_invulnerability_window_blocks_repeat_damage() {
        let mut app = damage_test_app();
        let player = spawn_player(&mut app);

        queue_damage(&mut app, player, 25.0);
        app.update();
        assert_eq!(health_of(&app, player), 75.0);

        // Window is active; this hit is ignored.
        queue_damage(&mut app, player, 25.0);
        app.update();
        assert_eq!(health_of(&app, player), 75.0);

        // Expire the window, then damage applies again.
        app.world_mut()
            .get_mut::<Invulnerability>(player)
            .unwrap()
            .timer = 0.0;
        queue_damage(&mut app, player, 25.0);
        app.update();
        assert_eq!(health_of(&app, player), 50.0);
    }

    #[test]
    fn shield_fully_absorbs_any_amount() {
        let mut app = damage_test_app();
        let player = spawn_player(&mut app);
        app.world_mut()
            .get_mut::<ActiveEffects>(player)
            .unwrap()
            .shield_secs = 10.0;

        queue_damage(&mut app, player, 9999.0);
        app.update();

        assert_eq!(health_of(&app, player), 100.0);
        assert!(
            !app.world()
                .get::<Invulnerability>(player)
                .unwrap()
                .is_active(),
            "absorbed hits must not burn the invulnerability window"
        );
    }

    #[test]
    fn same_frame_collision_damage_accumulates_under_one_window() {
        let mut app = damage_test_app();
        let player = spawn_player(&mut app);

        // Turret ram (10) and TIE ram (15) in the same frame.
        queue_damage(&mut app, player, 10.0);
        queue_damage(&mut app, player, 15.0);
        app.update();

        assert_eq!(health_of(&app, player), 75.0);
    }

    #[test]
    fn destruction_cleanup_despawns_after_delay() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_systems(Update, destruction_cleanup_system);

        let wreck = app
            .world_mut()
            .spawn(Destroyed {
                removal_timer: 0.0001,
            })
            .id();

        // First update ticks the timer past zero and despawns.
        std::thread::sleep(std::time::Duration::from_millis(2));
        app.update();
        app.update();
        assert!(app.world().get_entity(wreck).is_err());
    }
}
