//! Message types bridging the combat core to its collaborators.
//!
//! The simulation never touches HUD nodes or audio sinks directly: it writes
//! these messages and the `hud` / `audio` modules consume them.  Headless
//! tests register the same messages and assert on what was written.

use bevy::prelude::*;

// ── Entity taxonomy ───────────────────────────────────────────────────────────

/// Which combatant an event refers to.  Attached to every entity that owns a
/// [`crate::health::Health`] pool via [`crate::health::Combatant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatantKind {
    Player,
    DeathStar,
    TieFighter,
    Turret,
}

/// Severity of a gameplay message; the HUD colours the feed entry by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// How the match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Defeat,
}

/// Sound cues the core emits; playback is fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundKind {
    LaserFire,
    EnemyLaser,
    Impact,
    Explosion,
    PowerUpPickup,
    Victory,
    Defeat,
}

// ── Messages ──────────────────────────────────────────────────────────────────

/// A health pool changed; `percent` is `current / max` in `[0, 1]`.
#[derive(Message, Debug, Clone, Copy)]
pub struct HealthChanged {
    pub subject: CombatantKind,
    pub percent: f32,
}

/// Score delta plus the running total after applying it.
#[derive(Message, Debug, Clone, Copy)]
pub struct ScoreChanged {
    pub delta: u32,
    pub total: u32,
}

/// Human-readable gameplay message for the HUD feed.
#[derive(Message, Debug, Clone)]
pub struct GameMessage {
    pub text: String,
    pub severity: Severity,
}

impl GameMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Info,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Warning,
        }
    }

    pub fn critical(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Critical,
        }
    }
}

/// Fire-and-forget audio cue.
#[derive(Message, Debug, Clone, Copy)]
pub struct SoundEvent(pub SoundKind);

/// Written exactly once when a combatant's `Destroyed` marker is first
/// inserted.  Scoring and terminal evaluation key off this, never off raw
/// health inspection, so double-destroy cannot double-award.
#[derive(Message, Debug, Clone, Copy)]
pub struct CombatantDestroyed {
    pub entity: Entity,
    pub kind: CombatantKind,
}

/// The match reached a terminal state.
#[derive(Message, Debug, Clone, Copy)]
pub struct GameEnded {
    pub outcome: Outcome,
    pub final_score: u32,
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Registers every collaborator message.  Added before all gameplay plugins
/// (and by headless test apps) so writers never race registration.
pub struct EventsPlugin;

impl Plugin for EventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<HealthChanged>()
            .add_message::<ScoreChanged>()
            .add_message::<GameMessage>()
            .add_message::<SoundEvent>()
            .add_message::<CombatantDestroyed>()
            .add_message::<GameEnded>();
    }
}
