//! Match state machine and frame step ordering.
//!
//! ## States
//!
//! | State     | Description                                            |
//! |-----------|--------------------------------------------------------|
//! | `Playing` | Match running; all simulation systems active           |
//! | `Won`     | Station destroyed; rendering continues, sim frozen     |
//! | `Lost`    | Player destroyed; rendering continues, sim frozen      |
//!
//! Both terminal states are absorbing.  Every simulation system runs under
//! `.run_if(in_state(GameState::Playing))`, so in a terminal state the loop
//! keeps rendering but spawn timers, AI, firing, collision, and input
//! processing all stop.

use bevy::prelude::*;

// ── Game state ────────────────────────────────────────────────────────────────

/// Top-level match state machine.
///
/// A simultaneous mutual kill resolves as `Lost`: the terminal evaluation in
/// [`crate::director`] checks the player's destruction before the station's.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Active match; the game starts here.
    #[default]
    Playing,
    /// The battle station was destroyed.
    Won,
    /// The player ship was destroyed.
    Lost,
}

impl GameState {
    /// Whether this state ends the match.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameState::Won | GameState::Lost)
    }
}

// ── Frame step ordering ───────────────────────────────────────────────────────

/// `Update`-schedule step ordering for the simulation.
///
/// Timers drain first so that cooldown/invulnerability/effect expirations
/// scheduled on earlier frames are visible before any AI or firing decision
/// this frame; projectiles integrate last so they fly with this frame's aim.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimStep {
    /// Countdown timers: fire cooldowns, invulnerability, power-up effects.
    Timers,
    /// Director spawn clocks and entity creation.
    Spawning,
    /// Player flight and enemy AI movement.
    Movement,
    /// Targeting checks and projectile creation.
    Firing,
    /// Projectile integration and expiry.
    Projectiles,
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Registers [`GameState`] and configures the [`SimStep`] chain.
///
/// Must be added **before** any plugin that calls
/// `.run_if(in_state(GameState::Playing))`, so the state is always
/// registered first.
pub struct GameStatePlugin;

impl Plugin for GameStatePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>().configure_sets(
            Update,
            (
                SimStep::Timers,
                SimStep::Spawning,
                SimStep::Movement,
                SimStep::Firing,
                SimStep::Projectiles,
            )
                .chain(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playing_is_default_and_not_terminal() {
        assert_eq!(GameState::default(), GameState::Playing);
        assert!(!GameState::Playing.is_terminal());
    }

    #[test]
    fn won_and_lost_are_terminal() {
        assert!(GameState::Won.is_terminal());
        assert!(GameState::Lost.is_terminal());
    }
}
