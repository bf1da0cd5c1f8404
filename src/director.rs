//! Spawn pacing, difficulty escalation, scoring, and terminal evaluation.
//!
//! One pair of resources drives the whole match arc: [`Director`] owns the
//! spawn clocks and the difficulty scalar, [`Score`] the running total.
//! Spawn placement is deterministic in the director's running spawn index
//! (golden-angle scatter), so a replayed sequence of spawn decisions puts
//! entities in the same places; only the kind roll is random.

use crate::config::GameConfig;
use crate::constants::{
    POWERUP_MAX_ACTIVE, POWERUP_RING_MAX, POWERUP_RING_MIN, POWERUP_Y_JITTER, TIE_CAP_BASE,
    TIE_CAP_MAX, TIE_SPAWN_RING_MAX, TIE_SPAWN_RING_MIN, TIE_SPAWN_Y_JITTER, TURRET_CAP_BASE,
    TURRET_CAP_MAX,
};
use crate::death_star::DeathStar;
use crate::error::{GameError, GameResult};
use crate::events::{
    CombatantDestroyed, CombatantKind, GameEnded, GameMessage, Outcome, ScoreChanged, SoundEvent,
    SoundKind,
};
use crate::health::Destroyed;
use crate::player::Player;
use crate::powerup::{spawn_powerup, PowerUp, PowerUpKind};
use crate::state::{GameState, SimStep};
use crate::tie_fighter::{spawn_tie_fighter, TieFighter};
use crate::turret::{spawn_turret, Turret};
use bevy::prelude::*;
use rand::Rng;

// ── Resources ─────────────────────────────────────────────────────────────────

/// Spawn clocks and the difficulty scalar.
#[derive(Resource, Debug)]
pub struct Director {
    /// Difficulty scalar; divides the enemy spawn interval and raises caps.
    pub difficulty: f32,
    /// Countdown to the next enemy spawn attempt.
    pub enemy_timer: f32,
    /// Countdown to the next power-up spawn attempt.
    pub powerup_timer: f32,
    /// Countdown to the next difficulty step.
    pub escalation_timer: f32,
    /// Match time in seconds.
    pub elapsed: f32,
    /// Running spawn index, used to scatter positions and fire phases.
    pub total_spawned: u64,
}

impl Director {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            difficulty: 1.0,
            enemy_timer: config.enemy_spawn_base_interval,
            powerup_timer: config.powerup_spawn_interval,
            escalation_timer: config.escalation_interval,
            elapsed: 0.0,
            total_spawned: 0,
        }
    }
}

/// Running score.
#[derive(Resource, Debug, Default)]
pub struct Score {
    pub points: u32,
}

// ── Pure pacing helpers ───────────────────────────────────────────────────────

/// Seconds between enemy spawn attempts at a given difficulty.
pub fn effective_spawn_interval(base: f32, difficulty: f32) -> f32 {
    base / difficulty.max(f32::EPSILON)
}

/// Population caps at a given difficulty: `(tie_cap, turret_cap)`.
pub fn population_caps(difficulty: f32) -> (u32, u32) {
    let tie = (TIE_CAP_BASE + difficulty as u32).min(TIE_CAP_MAX);
    let turret = (TURRET_CAP_BASE + (difficulty / 2.0) as u32).min(TURRET_CAP_MAX);
    (tie, turret)
}

/// Which enemy kind a spawn attempt produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    TieFighter,
    Turret,
}

/// Decide what to spawn from a kind roll in `[0, 1)` and the live counts:
/// a fighter on a weighted roll while fighters are under cap, otherwise a
/// turret while turrets are under cap, otherwise refused.  There is no
/// turret-to-fighter fallback.
pub fn plan_enemy_spawn(
    roll: f32,
    tie_count: u32,
    turret_count: u32,
    tie_weight: f32,
    difficulty: f32,
) -> GameResult<EnemyKind> {
    let (tie_cap, turret_cap) = population_caps(difficulty);

    if roll < tie_weight && tie_count < tie_cap {
        Ok(EnemyKind::TieFighter)
    } else if turret_count < turret_cap {
        Ok(EnemyKind::Turret)
    } else {
        Err(GameError::SpawnRefused {
            reason: "turret population at cap",
        })
    }
}

/// Points awarded for destroying a combatant; zero for non-enemies.
pub fn kill_points(kind: CombatantKind, config: &GameConfig) -> u32 {
    match kind {
        CombatantKind::TieFighter => config.tie_kill_points,
        CombatantKind::Turret => config.turret_kill_points,
        CombatantKind::Player | CombatantKind::DeathStar => 0,
    }
}

// ── Deterministic placement ───────────────────────────────────────────────────

/// Golden angle in radians; consecutive indices scatter evenly.
const GOLDEN_ANGLE: f32 = 2.399_963;

fn scatter_fract(index: u64) -> f32 {
    ((index.wrapping_mul(2_654_435_761).wrapping_add(987_654_321)) % 10_000) as f32 / 10_000.0
}

/// Fighter spawn point: a ring around the player, scattered by spawn index.
pub fn tie_spawn_position(index: u64, player_pos: Vec3) -> Vec3 {
    let angle = index as f32 * GOLDEN_ANGLE;
    let radius =
        TIE_SPAWN_RING_MIN + (TIE_SPAWN_RING_MAX - TIE_SPAWN_RING_MIN) * scatter_fract(index);
    let y = (scatter_fract(index.wrapping_add(7)) * 2.0 - 1.0) * TIE_SPAWN_Y_JITTER;
    player_pos + Vec3::new(angle.cos() * radius, y, angle.sin() * radius)
}

/// Turret mount point in station space: the player-facing hemisphere of the
/// hull, scattered by spawn index.
pub fn turret_mount_position(index: u64, hull_radius: f32) -> Vec3 {
    let azimuth = index as f32 * GOLDEN_ANGLE;
    // Polar angle limited to the front hemisphere (local +Z faces the player).
    let polar = scatter_fract(index) * std::f32::consts::FRAC_PI_2;
    Vec3::new(
        polar.sin() * azimuth.cos(),
        polar.sin() * azimuth.sin(),
        polar.cos(),
    ) * hull_radius
}

/// Power-up drop point: a nearer ring around the player.
pub fn powerup_spawn_position(index: u64, player_pos: Vec3) -> Vec3 {
    let angle = index as f32 * GOLDEN_ANGLE;
    let radius = POWERUP_RING_MIN + (POWERUP_RING_MAX - POWERUP_RING_MIN) * scatter_fract(index);
    let y = (scatter_fract(index.wrapping_add(3)) * 2.0 - 1.0) * POWERUP_Y_JITTER;
    player_pos + Vec3::new(angle.cos() * radius, y, angle.sin() * radius)
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Advance the match clock and step difficulty on each escalation tick.
pub fn director_clock_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut director: ResMut<Director>,
    mut messages: MessageWriter<GameMessage>,
) {
    let dt = time.delta_secs();
    director.elapsed += dt;
    director.enemy_timer -= dt;
    director.powerup_timer -= dt;
    director.escalation_timer -= dt;

    if director.escalation_timer <= 0.0 {
        director.difficulty += config.difficulty_step;
        director.escalation_timer = config.escalation_interval;
        messages.write(GameMessage::warning("Enemy activity intensifies"));
    }
}

/// Attempt an enemy spawn when the clock elapses.  Refused spawns (both
/// populations at cap) are dropped; the clock still resets.
#[allow(clippy::too_many_arguments)]
pub fn enemy_spawn_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut director: ResMut<Director>,
    q_player: Query<&Transform, (With<Player>, Without<Destroyed>)>,
    q_station: Query<Entity, (With<DeathStar>, Without<Destroyed>)>,
    q_ties: Query<(), (With<TieFighter>, Without<Destroyed>)>,
    q_turrets: Query<(), (With<Turret>, Without<Destroyed>)>,
) {
    if director.enemy_timer > 0.0 {
        return;
    }
    director.enemy_timer =
        effective_spawn_interval(config.enemy_spawn_base_interval, director.difficulty);

    let Ok(player) = q_player.single() else {
        return;
    };

    let roll = rand::thread_rng().gen::<f32>();
    let plan = plan_enemy_spawn(
        roll,
        q_ties.iter().count() as u32,
        q_turrets.iter().count() as u32,
        config.tie_spawn_weight,
        director.difficulty,
    );

    let index = director.total_spawned;
    match plan {
        Ok(EnemyKind::TieFighter) => {
            let pos = tie_spawn_position(index, player.translation);
            spawn_tie_fighter(&mut commands, &config, pos, index);
            director.total_spawned += 1;
        }
        Ok(EnemyKind::Turret) => {
            let Ok(station) = q_station.single() else {
                return;
            };
            let mount = turret_mount_position(index, crate::constants::DEATH_STAR_RADIUS);
            spawn_turret(&mut commands, &config, station, mount, index);
            director.total_spawned += 1;
        }
        Err(_) => {}
    }
}

/// Drop a power-up when the clock elapses, respecting the active cap.
pub fn powerup_spawn_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut director: ResMut<Director>,
    q_player: Query<&Transform, (With<Player>, Without<Destroyed>)>,
    q_powerups: Query<(), With<PowerUp>>,
) {
    if director.powerup_timer > 0.0 {
        return;
    }
    director.powerup_timer = config.powerup_spawn_interval;

    if q_powerups.iter().count() >= POWERUP_MAX_ACTIVE {
        return;
    }
    let Ok(player) = q_player.single() else {
        return;
    };

    let kind = PowerUpKind::from_roll(rand::thread_rng().gen::<f32>());
    let index = director.total_spawned;
    spawn_powerup(
        &mut commands,
        kind,
        powerup_spawn_position(index, player.translation),
        index,
    );
    director.total_spawned += 1;
}

/// Award points for destroyed enemies.  Keyed off the one-shot destruction
/// message, so a combatant can never be scored twice.
pub fn score_system(
    config: Res<GameConfig>,
    mut score: ResMut<Score>,
    mut destroyed: MessageReader<CombatantDestroyed>,
    mut score_events: MessageWriter<ScoreChanged>,
    mut messages: MessageWriter<GameMessage>,
) {
    for event in destroyed.read() {
        let delta = kill_points(event.kind, &config);
        if delta == 0 {
            continue;
        }
        score.points += delta;
        score_events.write(ScoreChanged {
            delta,
            total: score.points,
        });
        let text = match event.kind {
            CombatantKind::TieFighter => "TIE fighter destroyed",
            _ => "Turret destroyed",
        };
        messages.write(GameMessage::info(format!("{text} +{delta}")));
    }
}

/// Decide the match outcome.  Defeat is checked before victory, so a
/// simultaneous mutual kill resolves as a loss.
pub fn terminal_system(
    score: Res<Score>,
    mut destroyed: MessageReader<CombatantDestroyed>,
    mut next_state: ResMut<NextState<GameState>>,
    mut ended: MessageWriter<GameEnded>,
    mut messages: MessageWriter<GameMessage>,
    mut sounds: MessageWriter<SoundEvent>,
) {
    let mut player_down = false;
    let mut station_down = false;
    for event in destroyed.read() {
        match event.kind {
            CombatantKind::Player => player_down = true,
            CombatantKind::DeathStar => station_down = true,
            _ => {}
        }
    }

    let outcome = if player_down {
        Outcome::Defeat
    } else if station_down {
        Outcome::Victory
    } else {
        return;
    };

    match outcome {
        Outcome::Defeat => {
            next_state.set(GameState::Lost);
            messages.write(GameMessage::critical("Ship destroyed"));
            sounds.write(SoundEvent(SoundKind::Defeat));
        }
        Outcome::Victory => {
            next_state.set(GameState::Won);
            messages.write(GameMessage::critical("The battle station is destroyed!"));
            sounds.write(SoundEvent(SoundKind::Victory));
        }
    }
    ended.write(GameEnded {
        outcome,
        final_score: score.points,
    });
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct DirectorPlugin;

impl Plugin for DirectorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Score>()
            .add_systems(Startup, |mut commands: Commands, config: Res<GameConfig>| {
                commands.insert_resource(Director::new(&config));
            })
            .add_systems(
                Update,
                (
                    director_clock_system.in_set(SimStep::Timers),
                    (enemy_spawn_system, powerup_spawn_system).in_set(SimStep::Spawning),
                    (score_system, terminal_system).chain().in_set(SimStep::Firing),
                )
                    .run_if(in_state(GameState::Playing)),
            );
    }
}
