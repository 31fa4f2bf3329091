//! Runtime gameplay configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_game_config`] reads
//! `assets/game.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the constants you care about.
//!
//! The file is read in `main` before the `App` is built because the window
//! size depends on the playfield dimensions.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `GameConfig::default()`.

use crate::constants::*;
use crate::error::{
    validate_positive, validate_probability, validate_unit_factor, ArcadeError, ArcadeResult,
};
use crate::geometry::Playfield;
use bevy::prelude::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Runtime-tunable gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Playfield ─────────────────────────────────────────────────────────────
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub max_frame_delta: f32,

    // ── Ship ──────────────────────────────────────────────────────────────────
    pub ship_radius: f32,
    pub ship_thrust: f32,
    pub ship_thrust_frame_scale: f32,
    pub ship_friction: f32,
    pub ship_turn_speed_deg: f32,
    pub ship_shot_cooldown: f32,
    pub ship_invulnerability_duration: f32,
    pub ship_blink_interval: f32,
    pub hyperspace_cooldown: f32,
    pub hyperspace_failure_chance: f32,

    // ── Projectiles ───────────────────────────────────────────────────────────
    pub bullet_radius: f32,
    pub bullet_lifetime: f32,
    pub player_bullet_speed: f32,
    pub saucer_bullet_speed: f32,

    // ── Asteroids ─────────────────────────────────────────────────────────────
    pub asteroid_base_speed: f32,
    pub asteroid_jaggedness: f32,
    pub asteroid_max_spin_deg: f32,
    pub asteroid_split_kick: f32,
    pub asteroid_split_speed_min: f32,
    pub asteroid_split_speed_max: f32,

    // ── Saucer ────────────────────────────────────────────────────────────────
    pub saucer_radius: f32,
    pub saucer_speed: f32,
    pub saucer_score: u32,
    pub saucer_fire_interval: f32,
    pub saucer_max_active: usize,
    pub saucer_spawn_base_interval: f32,

    // ── Session ───────────────────────────────────────────────────────────────
    pub respawn_delay: f32,
    pub safe_spawn_radius: f32,
    pub extra_life_score: u32,
    pub asteroids_per_level: u32,

    // ── Records ───────────────────────────────────────────────────────────────
    pub max_high_scores: usize,
    pub notification_duration: f32,
    pub save_dir: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Playfield
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            max_frame_delta: MAX_FRAME_DELTA,
            // Ship
            ship_radius: SHIP_RADIUS,
            ship_thrust: SHIP_THRUST,
            ship_thrust_frame_scale: SHIP_THRUST_FRAME_SCALE,
            ship_friction: SHIP_FRICTION,
            ship_turn_speed_deg: SHIP_TURN_SPEED_DEG,
            ship_shot_cooldown: SHIP_SHOT_COOLDOWN,
            ship_invulnerability_duration: SHIP_INVULNERABILITY_DURATION,
            ship_blink_interval: SHIP_BLINK_INTERVAL,
            hyperspace_cooldown: HYPERSPACE_COOLDOWN,
            hyperspace_failure_chance: HYPERSPACE_FAILURE_CHANCE,
            // Projectiles
            bullet_radius: BULLET_RADIUS,
            bullet_lifetime: BULLET_LIFETIME,
            player_bullet_speed: PLAYER_BULLET_SPEED,
            saucer_bullet_speed: SAUCER_BULLET_SPEED,
            // Asteroids
            asteroid_base_speed: ASTEROID_BASE_SPEED,
            asteroid_jaggedness: ASTEROID_JAGGEDNESS,
            asteroid_max_spin_deg: ASTEROID_MAX_SPIN_DEG,
            asteroid_split_kick: ASTEROID_SPLIT_KICK,
            asteroid_split_speed_min: ASTEROID_SPLIT_SPEED_MIN,
            asteroid_split_speed_max: ASTEROID_SPLIT_SPEED_MAX,
            // Saucer
            saucer_radius: SAUCER_RADIUS,
            saucer_speed: SAUCER_SPEED,
            saucer_score: SAUCER_SCORE,
            saucer_fire_interval: SAUCER_FIRE_INTERVAL,
            saucer_max_active: SAUCER_MAX_ACTIVE,
            saucer_spawn_base_interval: SAUCER_SPAWN_BASE_INTERVAL,
            // Session
            respawn_delay: RESPAWN_DELAY,
            safe_spawn_radius: SAFE_SPAWN_RADIUS,
            extra_life_score: EXTRA_LIFE_SCORE,
            asteroids_per_level: ASTEROIDS_PER_LEVEL,
            // Records
            max_high_scores: MAX_HIGH_SCORES,
            notification_duration: NOTIFICATION_DURATION,
            save_dir: PathBuf::from(SAVE_DIR),
        }
    }
}

impl GameConfig {
    /// The playfield rectangle described by this config.
    #[inline]
    pub fn playfield(&self) -> Playfield {
        Playfield::new(self.playfield_width, self.playfield_height)
    }

    /// Reject values that would break the simulation (zero-sized playfield,
    /// probabilities outside `[0, 1]`, friction that amplifies velocity).
    pub fn validate(&self) -> ArcadeResult<()> {
        validate_positive("playfield_width", self.playfield_width)?;
        validate_positive("playfield_height", self.playfield_height)?;
        validate_positive("max_frame_delta", self.max_frame_delta)?;
        validate_positive("ship_radius", self.ship_radius)?;
        validate_unit_factor("ship_friction", self.ship_friction)?;
        validate_positive("ship_blink_interval", self.ship_blink_interval)?;
        validate_probability("hyperspace_failure_chance", self.hyperspace_failure_chance)?;
        validate_positive("bullet_lifetime", self.bullet_lifetime)?;
        validate_probability("asteroid_jaggedness", self.asteroid_jaggedness)?;
        validate_positive("asteroid_split_speed_min", self.asteroid_split_speed_min)?;
        validate_positive("saucer_fire_interval", self.saucer_fire_interval)?;
        validate_positive("saucer_spawn_base_interval", self.saucer_spawn_base_interval)?;
        validate_positive("safe_spawn_radius", self.safe_spawn_radius)?;
        // The safe radius must leave room on the spawn edges, otherwise the
        // rejection sampler in the spawner would never terminate.
        let half_diagonal =
            (self.playfield_width.powi(2) + self.playfield_height.powi(2)).sqrt() * 0.5;
        if self.safe_spawn_radius >= half_diagonal {
            return Err(ArcadeError::UnsafeConstant {
                name: "safe_spawn_radius",
                value: self.safe_spawn_radius,
                safe_range: "(0.0, half the playfield diagonal)",
            });
        }
        Ok(())
    }
}

/// Attempt to load `path` and return a [`GameConfig`] with any values present
/// in the file applied over the defaults.
///
/// Missing keys retain their compiled defaults.  TOML parse errors and
/// validation failures are printed to stderr but do not abort the game.  A
/// missing file is silently ignored.
pub fn load_game_config(path: &Path) -> GameConfig {
    match std::fs::read_to_string(path) {
        Ok(contents) => match parse_game_config(&contents) {
            Ok(loaded) => {
                println!("✓ Loaded game config from {}", path.display());
                loaded
            }
            Err(e) => {
                eprintln!("⚠ Rejected {}: {e}; using defaults", path.display());
                GameConfig::default()
            }
        },
        Err(_) => {
            // File not present; defaults are fine.
            println!("ℹ No {} found; using compiled defaults", path.display());
            GameConfig::default()
        }
    }
}

/// Parse and validate a config document.
pub fn parse_game_config(contents: &str) -> ArcadeResult<GameConfig> {
    let config: GameConfig =
        toml::from_str(contents).map_err(|e| ArcadeError::Parse {
            context: "game config".to_string(),
            message: e.to_string(),
        })?;
    config.validate()?;
    Ok(config)
}
