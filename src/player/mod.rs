//! Player starfighter: components, input, flight, and weapons.
//!
//! Split across three files:
//! - [`state`] — components and resources (ship, effects, intent, lock)
//! - [`control`] — keyboard mapping and the flight model
//! - [`combat`] — exhaust-port targeting and firing

mod combat;
mod control;
mod state;

pub use combat::{lock_state, player_fire_system, targeting_lock_system};
pub use control::{apply_flight_system, hull_proximity_system, keyboard_to_intent_system};
pub use state::{
    tick_active_effects_system, ActiveEffects, Engine, Player, PlayerIntent, TargetLock,
};

use crate::config::GameConfig;
use crate::constants::PLAYER_REMOVAL_DELAY;
use crate::events::CombatantKind;
use crate::health::{Combatant, Health, Invulnerability};
use crate::state::{GameState, SimStep};
use crate::weapons::FireControl;
use bevy::prelude::*;

/// Spawn the player ship at its start position, facing the station.
pub fn spawn_player(mut commands: Commands, config: Res<GameConfig>) {
    commands.spawn((
        Player,
        Engine::default(),
        Health::new(config.player_max_health),
        Combatant {
            kind: CombatantKind::Player,
            removal_delay: PLAYER_REMOVAL_DELAY,
        },
        Invulnerability::new(config.invulnerability_window),
        ActiveEffects::default(),
        FireControl::new(config.player_fire_interval),
        // Default orientation already faces -Z, toward the station.
        Transform::from_xyz(0.0, 0.0, 300.0),
        Visibility::default(),
    ));
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        state::register(app);
        app.add_systems(Startup, spawn_player).add_systems(
            Update,
            (
                (
                    keyboard_to_intent_system,
                    apply_flight_system,
                    hull_proximity_system,
                )
                    .chain()
                    .in_set(SimStep::Movement),
                (targeting_lock_system, player_fire_system)
                    .chain()
                    .in_set(SimStep::Firing),
            )
                .run_if(in_state(GameState::Playing)),
        );
    }
}
