//! Fire-and-forget sound playback.
//!
//! The simulation writes [`SoundEvent`]s; this module maps them to loaded
//! clips and spawns one-shot audio entities.  Missing or still-loading
//! clips are skipped silently: audio is a collaborator, never a gate on
//! the simulation.

use crate::events::{SoundEvent, SoundKind};
use bevy::audio::{AudioPlayer, AudioSource, PlaybackSettings};
use bevy::prelude::*;
use std::collections::HashMap;

/// Clip handles per sound cue, loaded once at startup.
#[derive(Resource, Debug, Default)]
pub struct SoundAssets {
    clips: HashMap<SoundKind, Handle<AudioSource>>,
}

impl SoundAssets {
    pub fn get(&self, kind: SoundKind) -> Option<Handle<AudioSource>> {
        self.clips.get(&kind).cloned()
    }
}

fn clip_path(kind: SoundKind) -> &'static str {
    match kind {
        SoundKind::LaserFire => "sounds/laser_fire.ogg",
        SoundKind::EnemyLaser => "sounds/enemy_laser.ogg",
        SoundKind::Impact => "sounds/impact.ogg",
        SoundKind::Explosion => "sounds/explosion.ogg",
        SoundKind::PowerUpPickup => "sounds/powerup.ogg",
        SoundKind::Victory => "sounds/victory.ogg",
        SoundKind::Defeat => "sounds/defeat.ogg",
    }
}

/// Startup: request every clip from the asset server.
pub fn load_sound_assets(mut sounds: ResMut<SoundAssets>, asset_server: Res<AssetServer>) {
    for kind in [
        SoundKind::LaserFire,
        SoundKind::EnemyLaser,
        SoundKind::Impact,
        SoundKind::Explosion,
        SoundKind::PowerUpPickup,
        SoundKind::Victory,
        SoundKind::Defeat,
    ] {
        sounds.clips.insert(kind, asset_server.load(clip_path(kind)));
    }
}

/// Spawn a one-shot playback entity for each cue written this frame.
pub fn play_sounds_system(
    mut commands: Commands,
    sounds: Res<SoundAssets>,
    mut events: MessageReader<SoundEvent>,
) {
    for SoundEvent(kind) in events.read() {
        if let Some(clip) = sounds.get(*kind) {
            commands.spawn((AudioPlayer(clip), PlaybackSettings::DESPAWN));
        }
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SoundAssets>()
            .add_systems(Startup, load_sound_assets)
            .add_systems(Update, play_sounds_system);
    }
}
