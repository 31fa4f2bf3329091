//! Asteroid Arcade library
//!
//! A single-player asteroids shooter: the simulation core (ship, asteroids,
//! saucers, collisions, scoring), a menu state machine with per-user high
//! scores and achievements, and thin Bevy adapters for input, drawing, text
//! and sound.  The core never touches Bevy's ECS; [`plugin`] is the only
//! place that does.

pub mod achievements;
pub mod asteroid;
pub mod audio;
pub mod collision;
pub mod config;
pub mod constants;
pub mod difficulty;
pub mod entity;
pub mod error;
pub mod game;
pub mod geometry;
pub mod high_scores;
pub mod hud;
pub mod input;
pub mod persistence;
pub mod plugin;
pub mod projectile;
pub mod render;
pub mod saucer;
pub mod session;
pub mod ship;
pub mod spawner;
