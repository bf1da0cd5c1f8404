//! Trench Run — a 3D arcade space-combat game.
//!
//! A player-controlled starfighter fights TIE fighters and hull-mounted
//! turrets in a bounded starfield and tries to destroy a battle station by
//! hitting its orbiting exhaust port.  Collision detection is pairwise
//! distance-threshold checks; entity counts are small (tens at most).

pub mod audio;
pub mod collision;
pub mod config;
pub mod constants;
pub mod death_star;
pub mod director;
pub mod error;
pub mod events;
pub mod graphics;
pub mod health;
pub mod hud;
pub mod player;
pub mod powerup;
pub mod projectile;
pub mod state;
pub mod tie_fighter;
pub mod turret;
pub mod weapons;
