//! Binary entry point: window setup and plugin assembly.

use bevy::prelude::*;
use bevy::window::WindowResolution;
use trench_run::audio::GameAudioPlugin;
use trench_run::collision::CollisionPlugin;
use trench_run::config::{load_game_config, GameConfig};
use trench_run::death_star::DeathStarPlugin;
use trench_run::director::DirectorPlugin;
use trench_run::events::EventsPlugin;
use trench_run::graphics::GraphicsPlugin;
use trench_run::health::HealthPlugin;
use trench_run::hud::HudPlugin;
use trench_run::player::PlayerPlugin;
use trench_run::powerup::PowerUpPlugin;
use trench_run::projectile::ProjectilePlugin;
use trench_run::state::GameStatePlugin;
use trench_run::tie_fighter::TieFighterPlugin;
use trench_run::turret::TurretPlugin;
use trench_run::weapons::WeaponsPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Trench Run".to_string(),
                resolution: WindowResolution::new(1280, 720),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(GameConfig::default())
        // Config must be loaded before the Startup spawns read it.
        .add_systems(PreStartup, load_game_config)
        .add_plugins((GameStatePlugin, EventsPlugin))
        .add_plugins((
            HealthPlugin,
            WeaponsPlugin,
            ProjectilePlugin,
            PlayerPlugin,
            DeathStarPlugin,
            TieFighterPlugin,
            TurretPlugin,
            PowerUpPlugin,
            CollisionPlugin,
            DirectorPlugin,
        ))
        .add_plugins((HudPlugin, GameAudioPlugin, GraphicsPlugin))
        .run();
}
