//! Centralised gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::GameConfig::default`] mirrors every value below; override
//! any of them at runtime through `assets/game.toml`.
//!
//! Units: world units are screen pixels, time is seconds, angles are radians
//! unless the name says `_DEG`.  The playfield origin is the top-left corner
//! with `y` growing downward.

// ── Playfield ─────────────────────────────────────────────────────────────────

/// Width of the playfield (world units).  The window is sized to match.
pub const PLAYFIELD_WIDTH: f32 = 960.0;

/// Height of the playfield (world units).
pub const PLAYFIELD_HEIGHT: f32 = 720.0;

/// Largest time step integrated in a single tick.
///
/// Frame hitches (window drag, tab switch) would otherwise teleport bodies
/// through each other.  1/20 s keeps the per-tick displacement of the fastest
/// body (a 500 u/s bullet) at 25 u.
pub const MAX_FRAME_DELTA: f32 = 1.0 / 20.0;

// ── Player ship ───────────────────────────────────────────────────────────────

/// Collision radius of the player ship.
pub const SHIP_RADIUS: f32 = 15.0;

/// Thrust acceleration magnitude, expressed per 60 Hz frame.
pub const SHIP_THRUST: f32 = 5.0;

/// Frame-rate normalisation applied to thrust (`thrust * delta * 60`).
pub const SHIP_THRUST_FRAME_SCALE: f32 = 60.0;

/// Velocity multiplier applied every tick, thrusting or not.
///
/// Closer to 1.0 means longer inertial drift.
pub const SHIP_FRICTION: f32 = 0.99;

/// Turn rate in degrees per second.
pub const SHIP_TURN_SPEED_DEG: f32 = 360.0;

/// Minimum interval between two player shots.
pub const SHIP_SHOT_COOLDOWN: f32 = 0.25;

/// Spawn-protection window granted on every (re)spawn.
pub const SHIP_INVULNERABILITY_DURATION: f32 = 3.0;

/// Blink half-period while invulnerable (render feedback only).
pub const SHIP_BLINK_INTERVAL: f32 = 0.2;

/// Seconds before hyperspace can be used again after a clean jump.
pub const HYPERSPACE_COOLDOWN: f32 = 5.0;

/// Probability that a hyperspace jump destroys the ship outright.
pub const HYPERSPACE_FAILURE_CHANCE: f32 = 0.1;

// ── Projectiles ───────────────────────────────────────────────────────────────

/// Collision radius of every projectile.
pub const BULLET_RADIUS: f32 = 2.0;

/// Seconds a projectile lives before expiring.
pub const BULLET_LIFETIME: f32 = 1.2;

/// Muzzle speed of player projectiles.
pub const PLAYER_BULLET_SPEED: f32 = 500.0;

/// Muzzle speed of saucer projectiles.
pub const SAUCER_BULLET_SPEED: f32 = 350.0;

// ── Asteroids ─────────────────────────────────────────────────────────────────

/// Base drift speed before global and per-tier multipliers.
pub const ASTEROID_BASE_SPEED: f32 = 30.0;

/// Vertex radius perturbation: each vertex sits at `radius * [1 - J, 1]`.
pub const ASTEROID_JAGGEDNESS: f32 = 0.4;

/// Maximum spin in degrees per second (sampled in `±` this value).
pub const ASTEROID_MAX_SPIN_DEG: f32 = 90.0;

/// Magnitude of the directional kick added to a split child's velocity.
pub const ASTEROID_SPLIT_KICK: f32 = 20.0;

/// Child speed multiplier range applied after the kick.
pub const ASTEROID_SPLIT_SPEED_MIN: f32 = 1.1;
pub const ASTEROID_SPLIT_SPEED_MAX: f32 = 1.5;

// ── Saucer ────────────────────────────────────────────────────────────────────

pub const SAUCER_RADIUS: f32 = 15.0;
pub const SAUCER_SPEED: f32 = 100.0;
pub const SAUCER_SCORE: u32 = 200;

/// Base seconds between saucer shots; each reset is jittered by ±20 %.
pub const SAUCER_FIRE_INTERVAL: f32 = 2.0;

/// Ceiling on simultaneously alive saucers.
pub const SAUCER_MAX_ACTIVE: usize = 1;

/// Average seconds between saucer spawns before difficulty/level scaling.
pub const SAUCER_SPAWN_BASE_INTERVAL: f32 = 15.0;

// ── Session ───────────────────────────────────────────────────────────────────

/// Delay between a player death and the replacement ship appearing.
pub const RESPAWN_DELAY: f32 = 2.0;

/// Asteroids are never placed closer than this to the playfield centre.
pub const SAFE_SPAWN_RADIUS: f32 = 150.0;

/// An extra life is granted every time the score crosses a multiple of this.
pub const EXTRA_LIFE_SCORE: u32 = 10_000;

/// Asteroids added to the field per level beyond the first.
pub const ASTEROIDS_PER_LEVEL: u32 = 2;

// ── Records ───────────────────────────────────────────────────────────────────

/// Entries kept per user in the high-score table.
pub const MAX_HIGH_SCORES: usize = 10;

/// Seconds an achievement-unlock notification stays on screen.
pub const NOTIFICATION_DURATION: f32 = 3.0;

/// Longest accepted user name.
pub const MAX_USER_NAME_LEN: usize = 12;

/// Directory holding per-user profile files.
pub const SAVE_DIR: &str = "saves";
