//! Player components and resources.
//!
//! All ECS components and Bevy resources that describe player state live
//! here.  Systems that mutate this state are in the sibling modules:
//! - [`super::control`] — input + flight
//! - [`super::combat`] — targeting lock + projectile firing

use crate::config::GameConfig;
use crate::constants::{DOUBLE_DAMAGE_MULTIPLIER, PLAYER_MIN_SPEED};
use crate::state::{GameState, SimStep};
use crate::weapons::FireControl;
use bevy::prelude::*;

// ── Components ────────────────────────────────────────────────────────────────

/// Marker component for the player ship entity.
#[derive(Component)]
pub struct Player;

/// Forward flight speed; the ship always moves, throttle only scales it.
#[derive(Component, Debug, Clone, Copy)]
pub struct Engine {
    /// Current forward speed in u/s, clamped to the configured band.
    pub speed: f32,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            speed: PLAYER_MIN_SPEED,
        }
    }
}

/// Remaining duration of each timed power-up effect, in seconds.
/// Zero means inactive.  Re-collecting an active power-up refreshes the
/// timer rather than stacking.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ActiveEffects {
    pub shield_secs: f32,
    pub rapid_fire_secs: f32,
    pub double_damage_secs: f32,
}

impl ActiveEffects {
    /// Shield fully absorbs incoming damage while active.
    #[inline]
    pub fn shield_active(&self) -> bool {
        self.shield_secs > 0.0
    }

    /// Multiplier applied to the player's projectile damage at fire time.
    #[inline]
    pub fn damage_multiplier(&self) -> f32 {
        if self.double_damage_secs > 0.0 {
            DOUBLE_DAMAGE_MULTIPLIER
        } else {
            1.0
        }
    }
}

// ── Resources ─────────────────────────────────────────────────────────────────

/// Aggregated player intent for the current frame, derived from input.
///
/// The keyboard system rebuilds this each frame;
/// [`super::control::apply_flight_system`] reads it.  Tests can populate it
/// directly to drive the ship without a real input device.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct PlayerIntent {
    /// Pitch input in `[-1, 1]`; positive noses up.
    pub pitch: f32,
    /// Turn input in `[-1, 1]`; positive yaws left.
    pub turn: f32,
    /// Throttle input in `[-1, 1]`; positive accelerates.
    pub throttle: f32,
    /// Fire button held this frame.
    pub fire: bool,
}

/// Exhaust-port targeting state, refreshed every frame.
///
/// `locked` requires the port within lock range **and** the ship's forward
/// vector aligned with it.  Outside range the lock is always false and the
/// HUD suppresses the reticle.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct TargetLock {
    pub locked: bool,
    /// Distance to the port when in lock range; `None` otherwise.
    pub port_distance: Option<f32>,
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Run down power-up effect timers; restores the base fire interval when a
/// rapid-fire effect expires.  Runs in [`SimStep::Timers`].
pub fn tick_active_effects_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut q: Query<(&mut ActiveEffects, &mut FireControl), With<Player>>,
) {
    let dt = time.delta_secs();
    let Ok((mut effects, mut fire)) = q.single_mut() else {
        return;
    };

    effects.shield_secs = (effects.shield_secs - dt).max(0.0);
    effects.double_damage_secs = (effects.double_damage_secs - dt).max(0.0);

    if effects.rapid_fire_secs > 0.0 {
        effects.rapid_fire_secs = (effects.rapid_fire_secs - dt).max(0.0);
        if effects.rapid_fire_secs <= 0.0 {
            fire.interval = config.player_fire_interval;
        }
    }
}

pub(super) fn register(app: &mut App) {
    app.init_resource::<PlayerIntent>()
        .init_resource::<TargetLock>()
        .add_systems(
            Update,
            tick_active_effects_system
                .in_set(SimStep::Timers)
                .run_if(in_state(GameState::Playing)),
        );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_multiplier_follows_double_damage_timer() {
        let mut effects = ActiveEffects::default();
        assert_eq!(effects.damage_multiplier(), 1.0);
        effects.double_damage_secs = 10.0;
        assert_eq!(effects.damage_multiplier(), DOUBLE_DAMAGE_MULTIPLIER);
    }

    #[test]
    fn rapid_fire_expiry_restores_base_interval() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(GameConfig::default());
        app.add_systems(Update, tick_active_effects_system);

        let config = GameConfig::default();
        let boosted = config.player_fire_interval / 3.0;
        let player = app
            .world_mut()
            .spawn((
                Player,
                ActiveEffects {
                    rapid_fire_secs: 0.0001,
                    ..default()
                },
                FireControl::new(boosted),
            ))
            .id();

        std::thread::sleep(std::time::Duration::from_millis(2));
        app.update();
        app.update();

        let fire = app.world().get::<FireControl>(player).unwrap();
        assert_eq!(
            fire.interval, config.player_fire_interval,
            "expiry must restore the original fire interval"
        );
    }
}
