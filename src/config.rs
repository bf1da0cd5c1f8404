//! Runtime gameplay configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors the combat-tuning
//! constants in [`crate::constants`].  At startup, [`load_game_config`] reads
//! `assets/game.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the constants you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<GameConfig>` to any system parameter list and read values
//! with `config.tie_speed`, `config.enemy_spawn_base_interval`, etc.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `GameConfig::default()`.

use crate::constants::*;
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable combat and pacing configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/game.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Player: Flight ────────────────────────────────────────────────────────
    pub player_min_speed: f32,
    pub player_max_speed: f32,
    pub player_acceleration: f32,
    pub player_pitch_rate: f32,
    pub player_turn_rate: f32,

    // ── Player: Combat ────────────────────────────────────────────────────────
    pub player_max_health: f32,
    pub invulnerability_window: f32,
    pub player_fire_interval: f32,
    pub player_projectile_speed: f32,
    pub player_projectile_damage: f32,
    pub locked_projectile_damage: f32,
    pub lock_range: f32,
    pub lock_alignment: f32,

    // ── Battle Station ────────────────────────────────────────────────────────
    pub death_star_health: f32,
    pub surface_hit_damage: f32,
    pub exhaust_port_critical_damage: f32,

    // ── TIE Fighters ──────────────────────────────────────────────────────────
    pub tie_health: f32,
    pub tie_speed: f32,
    pub tie_min_distance: f32,
    pub tie_max_distance: f32,
    pub tie_fire_interval: f32,
    pub tie_firing_range: f32,
    pub tie_projectile_damage: f32,

    // ── Turrets ───────────────────────────────────────────────────────────────
    pub turret_health: f32,
    pub turret_aim_rate: f32,
    pub turret_fire_interval: f32,
    pub turret_firing_range: f32,
    pub turret_projectile_damage: f32,

    // ── Director ──────────────────────────────────────────────────────────────
    pub enemy_spawn_base_interval: f32,
    pub powerup_spawn_interval: f32,
    pub difficulty_step: f32,
    pub escalation_interval: f32,
    pub tie_spawn_weight: f32,
    pub tie_kill_points: u32,
    pub turret_kill_points: u32,

    // ── HUD ───────────────────────────────────────────────────────────────────
    pub hud_font_size: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Player: Flight
            player_min_speed: PLAYER_MIN_SPEED,
            player_max_speed: PLAYER_MAX_SPEED,
            player_acceleration: PLAYER_ACCELERATION,
            player_pitch_rate: PLAYER_PITCH_RATE,
            player_turn_rate: PLAYER_TURN_RATE,
            // Player: Combat
            player_max_health: PLAYER_MAX_HEALTH,
            invulnerability_window: INVULNERABILITY_WINDOW,
            player_fire_interval: PLAYER_FIRE_INTERVAL,
            player_projectile_speed: PLAYER_PROJECTILE_SPEED,
            player_projectile_damage: PLAYER_PROJECTILE_DAMAGE,
            locked_projectile_damage: LOCKED_PROJECTILE_DAMAGE,
            lock_range: LOCK_RANGE,
            lock_alignment: LOCK_ALIGNMENT,
            // Battle Station
            death_star_health: DEATH_STAR_HEALTH,
            surface_hit_damage: SURFACE_HIT_DAMAGE,
            exhaust_port_critical_damage: EXHAUST_PORT_CRITICAL_DAMAGE,
            // TIE Fighters
            tie_health: TIE_HEALTH,
            tie_speed: TIE_SPEED,
            tie_min_distance: TIE_MIN_DISTANCE,
            tie_max_distance: TIE_MAX_DISTANCE,
            tie_fire_interval: TIE_FIRE_INTERVAL,
            tie_firing_range: TIE_FIRING_RANGE,
            tie_projectile_damage: TIE_PROJECTILE_DAMAGE,
            // Turrets
            turret_health: TURRET_HEALTH,
            turret_aim_rate: TURRET_AIM_RATE,
            turret_fire_interval: TURRET_FIRE_INTERVAL,
            turret_firing_range: TURRET_FIRING_RANGE,
            turret_projectile_damage: TURRET_PROJECTILE_DAMAGE,
            // Director
            enemy_spawn_base_interval: ENEMY_SPAWN_BASE_INTERVAL,
            powerup_spawn_interval: POWERUP_SPAWN_INTERVAL,
            difficulty_step: DIFFICULTY_STEP,
            escalation_interval: ESCALATION_INTERVAL,
            tie_spawn_weight: TIE_SPAWN_WEIGHT,
            tie_kill_points: TIE_KILL_POINTS,
            turret_kill_points: TURRET_KILL_POINTS,
            // HUD
            hud_font_size: HUD_FONT_SIZE,
        }
    }
}

/// Startup system: attempt to load `assets/game.toml` and overwrite the
/// `GameConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  TOML parse errors are printed
/// to stderr but do not abort the game.  A missing file is silently ignored
/// (defaults are already in place from `insert_resource`).
pub fn load_game_config(mut config: ResMut<GameConfig>) {
    let path = "assets/game.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<GameConfig>(&contents) {
            Ok(loaded) => {
                *config = loaded;
                println!("✓ Loaded game config from {path}");
            }
            Err(e) => {
                eprintln!("⚠ Failed to parse {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            // File not present — defaults are already in place; not an error.
            println!("ℹ No {path} found; using compiled defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = GameConfig::default();
        assert_eq!(config.player_max_health, PLAYER_MAX_HEALTH);
        assert_eq!(config.tie_fire_interval, TIE_FIRE_INTERVAL);
        assert_eq!(config.turret_kill_points, TURRET_KILL_POINTS);
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let loaded: GameConfig = toml::from_str("tie_speed = 90.0").unwrap();
        assert_eq!(loaded.tie_speed, 90.0);
        assert_eq!(loaded.tie_health, TIE_HEALTH);
    }
}
