//! Cockpit HUD: readouts, message feed, lock reticle, terminal overlay.
//!
//! ## System Responsibilities
//!
//! | System                     | Schedule             | Purpose                       |
//! |----------------------------|----------------------|-------------------------------|
//! | `setup_hud`                | `Startup`            | Spawn all permanent HUD nodes |
//! | `hud_status_system`        | `Update`             | Refresh health/shield/score   |
//! | `hud_flight_system`        | `Update`             | Refresh speed/distance readout|
//! | `hud_lock_system`          | `Update`             | Show/colour the lock reticle  |
//! | `message_feed_system`      | `Update`             | Ingest + expire feed entries  |
//! | `setup_victory_overlay`    | `OnEnter(Won)`       | Full-screen victory screen    |
//! | `setup_defeat_overlay`     | `OnEnter(Lost)`      | Full-screen defeat screen     |
//!
//! The HUD never touches simulation state: it reads resources and the
//! collaborator messages written by the core.

use crate::config::GameConfig;
use crate::constants::{DEATH_STAR_CENTER, MESSAGE_FEED_CAP, MESSAGE_TTL};
use crate::director::Score;
use crate::events::{GameMessage, HealthChanged, Severity};
use crate::health::{Destroyed, Health};
use crate::player::{ActiveEffects, Engine, Player, TargetLock};
use crate::state::GameState;
use bevy::prelude::*;

// ── Component markers ─────────────────────────────────────────────────────────

/// Marker for the health/shield/score status block.
#[derive(Component)]
pub struct HudStatusDisplay;

/// Marker for the speed/distance flight readout.
#[derive(Component)]
pub struct HudFlightDisplay;

/// Marker for the lock reticle text node.
#[derive(Component)]
pub struct HudLockDisplay;

/// Marker for the scrolling message feed root.
#[derive(Component)]
pub struct HudMessageFeed;

// ── Message feed state ────────────────────────────────────────────────────────

/// A feed entry plus its remaining time on screen.
#[derive(Debug, Clone)]
struct FeedEntry {
    text: String,
    severity: Severity,
    ttl: f32,
}

/// Feed entries, newest last.  Capped at [`MESSAGE_FEED_CAP`]; oldest
/// entries are dropped first when full.
#[derive(Resource, Debug, Default)]
pub struct MessageFeed {
    entries: Vec<FeedEntry>,
}

impl MessageFeed {
    fn push(&mut self, text: String, severity: Severity) {
        if self.entries.len() >= MESSAGE_FEED_CAP {
            self.entries.remove(0);
        }
        self.entries.push(FeedEntry {
            text,
            severity,
            ttl: MESSAGE_TTL,
        });
    }
}

// ── Colour helpers ────────────────────────────────────────────────────────────

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::srgb(0.65, 0.85, 1.0),
        Severity::Warning => Color::srgb(1.0, 0.80, 0.30),
        Severity::Critical => Color::srgb(1.0, 0.35, 0.30),
    }
}

fn status_color() -> Color {
    Color::srgb(0.55, 1.0, 0.60)
}
fn flight_color() -> Color {
    Color::srgb(0.70, 0.75, 0.85)
}
fn lock_held_color() -> Color {
    Color::srgb(1.0, 0.30, 0.25)
}
fn lock_seeking_color() -> Color {
    Color::srgb(0.45, 0.50, 0.60)
}

// ── Startup: HUD nodes ────────────────────────────────────────────────────────

/// Spawn the permanent HUD nodes.
///
/// Layout:
/// ```text
/// ┌─────────────────────────────────────────────┐
/// │ HULL 100%  SCORE 0              message feed│
/// │                                             │
/// │                 [ LOCKED ]                  │
/// │                                             │
/// │ SPD 6  DIST 2300                            │
/// └─────────────────────────────────────────────┘
/// ```
pub fn setup_hud(mut commands: Commands, config: Res<GameConfig>) {
    let font = TextFont {
        font_size: config.hud_font_size,
        ..default()
    };

    // Top-left: hull / shield / score.
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                ..default()
            },
            HudStatusDisplay,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("HULL 100%  SCORE 0"),
                font.clone(),
                TextColor(status_color()),
            ));
        });

    // Bottom-left: speed and distance to the station.
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                bottom: Val::Px(10.0),
                ..default()
            },
            HudFlightDisplay,
        ))
        .with_children(|parent| {
            parent.spawn((Text::new("SPD 0  DIST 0"), font.clone(), TextColor(flight_color())));
        });

    // Centre: lock reticle state.
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Percent(50.0),
                top: Val::Percent(55.0),
                ..default()
            },
            HudLockDisplay,
        ))
        .with_children(|parent| {
            parent.spawn((Text::new(""), font.clone(), TextColor(lock_seeking_color())));
        });

    // Top-right: message feed.
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            right: Val::Px(10.0),
            top: Val::Px(10.0),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::FlexEnd,
            ..default()
        },
        HudMessageFeed,
    ));
}

// ── Update: readouts ──────────────────────────────────────────────────────────

/// Refresh the hull/shield/score block.  Driven by the health and score
/// messages plus the live shield timer.
pub fn hud_status_system(
    score: Res<Score>,
    mut health_events: MessageReader<HealthChanged>,
    q_player: Query<(&Health, &ActiveEffects), With<Player>>,
    parent_query: Query<&Children, With<HudStatusDisplay>>,
    mut text_query: Query<&mut Text>,
) {
    // Consume the batch; the readout is rebuilt from live state either way.
    let dirty = health_events.read().count() > 0 || score.is_changed();
    if !dirty {
        return;
    }
    let Ok((health, effects)) = q_player.single() else {
        return;
    };

    let shield = if effects.shield_active() {
        format!("  SHIELD {:.0}s", effects.shield_secs.ceil())
    } else {
        String::new()
    };
    for children in parent_query.iter() {
        for child in children.iter() {
            if let Ok(mut text) = text_query.get_mut(child) {
                *text = Text::new(format!(
                    "HULL {:.0}%{}  SCORE {}",
                    health.percent() * 100.0,
                    shield,
                    score.points
                ));
            }
        }
    }
}

/// Refresh the speed/distance readout each frame.
pub fn hud_flight_system(
    q_player: Query<(&Transform, &Engine), (With<Player>, Without<Destroyed>)>,
    parent_query: Query<&Children, With<HudFlightDisplay>>,
    mut text_query: Query<&mut Text>,
) {
    let Ok((transform, engine)) = q_player.single() else {
        return;
    };
    let distance = transform.translation.distance(DEATH_STAR_CENTER);

    for children in parent_query.iter() {
        for child in children.iter() {
            if let Ok(mut text) = text_query.get_mut(child) {
                *text = Text::new(format!("SPD {:.0}  DIST {:.0}", engine.speed, distance));
            }
        }
    }
}

/// Show the reticle while the port is in lock range; colour it red once the
/// lock engages.
pub fn hud_lock_system(
    lock: Res<TargetLock>,
    parent_query: Query<&Children, With<HudLockDisplay>>,
    mut text_query: Query<(&mut Text, &mut TextColor)>,
) {
    if !lock.is_changed() {
        return;
    }
    let (label, color) = match (lock.locked, lock.port_distance) {
        (true, Some(dist)) => (format!("[ LOCKED {dist:.0} ]"), lock_held_color()),
        (false, Some(dist)) => (format!("( seeking {dist:.0} )"), lock_seeking_color()),
        _ => (String::new(), lock_seeking_color()),
    };

    for children in parent_query.iter() {
        for child in children.iter() {
            if let Ok((mut text, mut text_color)) = text_query.get_mut(child) {
                *text = Text::new(label.clone());
                *text_color = TextColor(color);
            }
        }
    }
}

// ── Update: message feed ──────────────────────────────────────────────────────

/// Ingest new gameplay messages, expire old ones, and rebuild the feed's
/// child text nodes when anything changed.
pub fn message_feed_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut feed: ResMut<MessageFeed>,
    mut messages: MessageReader<GameMessage>,
    q_feed: Query<(Entity, Option<&Children>), With<HudMessageFeed>>,
) {
    let dt = time.delta_secs();
    let mut dirty = false;

    for message in messages.read() {
        feed.push(message.text.clone(), message.severity);
        dirty = true;
    }
    let before = feed.entries.len();
    for entry in feed.entries.iter_mut() {
        entry.ttl -= dt;
    }
    feed.entries.retain(|e| e.ttl > 0.0);
    dirty |= feed.entries.len() != before;

    if !dirty {
        return;
    }
    let Ok((root, children)) = q_feed.single() else {
        return;
    };
    if let Some(children) = children {
        for child in children.iter() {
            commands.entity(child).despawn();
        }
    }
    for entry in feed.entries.iter() {
        let line = commands
            .spawn((
                Text::new(entry.text.clone()),
                TextFont {
                    font_size: config.hud_font_size,
                    ..default()
                },
                TextColor(severity_color(entry.severity)),
            ))
            .id();
        commands.entity(root).add_child(line);
    }
}

// ── Terminal overlays ─────────────────────────────────────────────────────────

fn spawn_terminal_overlay(commands: &mut Commands, title: &str, color: Color, score: u32) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
        ))
        .with_children(|root| {
            root.spawn((
                Text::new(title.to_string()),
                TextFont {
                    font_size: 56.0,
                    ..default()
                },
                TextColor(color),
            ));
            root.spawn((
                Text::new(format!("Final score: {score}")),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.85)),
            ));
        });
}

/// `OnEnter(Won)`: full-screen victory overlay.
pub fn setup_victory_overlay(mut commands: Commands, score: Res<Score>) {
    spawn_terminal_overlay(
        &mut commands,
        "THE BATTLE STATION IS DESTROYED",
        Color::srgb(0.95, 0.88, 0.45),
        score.points,
    );
}

/// `OnEnter(Lost)`: full-screen defeat overlay.
pub fn setup_defeat_overlay(mut commands: Commands, score: Res<Score>) {
    spawn_terminal_overlay(
        &mut commands,
        "SHIP DESTROYED",
        Color::srgb(1.0, 0.35, 0.30),
        score.points,
    );
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MessageFeed>()
            .add_systems(Startup, setup_hud)
            .add_systems(
                Update,
                (
                    hud_status_system,
                    hud_flight_system,
                    hud_lock_system,
                    message_feed_system,
                ),
            )
            .add_systems(OnEnter(GameState::Won), setup_victory_overlay)
            .add_systems(OnEnter(GameState::Lost), setup_defeat_overlay);
    }
}
