//! Level asteroid fields and the saucer spawn countdown.

use crate::asteroid::{Asteroid, AsteroidTier};
use crate::config::GameConfig;
use crate::difficulty::DifficultyProfile;
use crate::geometry::{random_range, Playfield};
use bevy::math::Vec2;
use rand::Rng;

/// Rejection-sampling cap for [`edge_spawn_point`].
const MAX_PLACEMENT_ATTEMPTS: usize = 64;

/// `starting_asteroids + (level - 1) * per_level`.
pub fn level_asteroid_count(profile: &DifficultyProfile, level: u32, per_level: u32) -> u32 {
    profile.starting_asteroids + level.saturating_sub(1) * per_level
}

/// A random point `margin` outside a random edge, resampled until it is
/// farther than `safe_radius` from the field centre.
///
/// If sampling keeps failing (only possible with a tiny playfield) the last
/// sample is pushed straight out from the centre to just past the safe radius.
pub fn edge_spawn_point<R: Rng + ?Sized>(
    field: &Playfield,
    margin: f32,
    safe_radius: f32,
    rng: &mut R,
) -> Vec2 {
    let center = field.center();
    let mut point = center;
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        point = match rng.gen_range(0..4) {
            0 => Vec2::new(random_range(rng, 0.0, field.width), -margin),
            1 => Vec2::new(field.width + margin, random_range(rng, 0.0, field.height)),
            2 => Vec2::new(random_range(rng, 0.0, field.width), field.height + margin),
            _ => Vec2::new(-margin, random_range(rng, 0.0, field.height)),
        };
        if point.distance(center) > safe_radius {
            return point;
        }
    }
    let outward = (point - center).try_normalize().unwrap_or(Vec2::X);
    center + outward * (safe_radius + margin)
}

/// All-LARGE asteroid field for `level`, placed by [`edge_spawn_point`].
pub fn spawn_level_asteroids<R: Rng + ?Sized>(
    config: &GameConfig,
    profile: &DifficultyProfile,
    level: u32,
    rng: &mut R,
) -> Vec<Asteroid> {
    let field = config.playfield();
    let count = level_asteroid_count(profile, level, config.asteroids_per_level);
    (0..count)
        .map(|_| {
            let at = edge_spawn_point(
                &field,
                AsteroidTier::Large.radius(),
                config.safe_spawn_radius,
                rng,
            );
            Asteroid::drifting(
                at,
                AsteroidTier::Large,
                profile.asteroid_speed_multiplier,
                config,
                rng,
            )
        })
        .collect()
}

/// Countdown to the next saucer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaucerSpawner {
    timer: f32,
}

impl SaucerSpawner {
    /// `base * spawn_multiplier * max(0.5, 1 - 0.05 * level)`, before jitter.
    pub fn mean_interval(config: &GameConfig, profile: &DifficultyProfile, level: u32) -> f32 {
        let level_factor = (1.0 - level as f32 * 0.05).max(0.5);
        config.saucer_spawn_base_interval * profile.saucer_spawn_multiplier * level_factor
    }

    pub fn new<R: Rng + ?Sized>(config: &GameConfig, profile: &DifficultyProfile, level: u32, rng: &mut R) -> Self {
        let mut spawner = Self { timer: 0.0 };
        spawner.reset(config, profile, level, rng);
        spawner
    }

    /// Restart the countdown with a fresh jittered interval.  Called after
    /// every spawn and at every level transition.
    pub fn reset<R: Rng + ?Sized>(&mut self, config: &GameConfig, profile: &DifficultyProfile, level: u32, rng: &mut R) {
        self.timer = Self::mean_interval(config, profile, level) * random_range(rng, 0.75, 1.25);
    }

    /// Advance the countdown.  Returns `true` exactly when a saucer should be
    /// spawned now.  The countdown is frozen while the player is waiting to
    /// respawn or the active-saucer ceiling is reached.
    pub fn tick(&mut self, delta: f32, active_saucers: usize, max_active: usize, respawning: bool) -> bool {
        if respawning || active_saucers >= max_active {
            return false;
        }
        self.timer -= delta;
        self.timer <= 0.0
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Difficulty;
    use crate::entity::Entity;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn asteroid_count_grows_with_level() {
        let p = Difficulty::Medium.profile();
        assert_eq!(level_asteroid_count(&p, 1, 2), 4);
        assert_eq!(level_asteroid_count(&p, 3, 2), 8);
    }

    #[test]
    fn level_field_is_large_and_outside_safe_radius() {
        let config = GameConfig::default();
        let profile = Difficulty::Hard.profile();
        let mut rng = StdRng::seed_from_u64(4);
        let rocks = spawn_level_asteroids(&config, &profile, 2, &mut rng);
        assert_eq!(rocks.len(), 7);
        let center = config.playfield().center();
        for r in &rocks {
            assert_eq!(r.tier, AsteroidTier::Large);
            assert!(r.position().distance(center) > config.safe_spawn_radius);
        }
    }

    #[test]
    fn tiny_field_still_places_outside_safe_radius() {
        let field = Playfield::new(10.0, 10.0);
        let mut rng = StdRng::seed_from_u64(8);
        let p = edge_spawn_point(&field, 1.0, 100.0, &mut rng);
        assert!(p.distance(field.center()) > 100.0);
    }

    #[test]
    fn interval_shrinks_with_level_but_is_floored() {
        let config = GameConfig::default();
        let p = Difficulty::Medium.profile();
        let l1 = SaucerSpawner::mean_interval(&config, &p, 1);
        let l5 = SaucerSpawner::mean_interval(&config, &p, 5);
        let l30 = SaucerSpawner::mean_interval(&config, &p, 30);
        assert!(l5 < l1);
        assert!((l30 - config.saucer_spawn_base_interval * 0.5).abs() < 1e-4);
    }

    #[test]
    fn countdown_is_suspended_while_respawning_or_at_ceiling() {
        let config = GameConfig::default();
        let p = Difficulty::Medium.profile();
        let mut rng = StdRng::seed_from_u64(6);
        let mut s = SaucerSpawner::new(&config, &p, 1, &mut rng);
        let before = s.remaining();
        assert!(!s.tick(100.0, 0, 1, true));
        assert!(!s.tick(100.0, 1, 1, false));
        assert_eq!(s.remaining(), before);
        assert!(s.tick(100.0, 0, 1, false));
    }

    #[test]
    fn saucer_countdown_is_jittered_around_the_mean() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(23);
        for difficulty in Difficulty::ALL {
            let profile = difficulty.profile();
            for level in [1, 4, 12] {
                let mean = SaucerSpawner::mean_interval(&config, &profile, level);
                for _ in 0..50 {
                    let spawner = SaucerSpawner::new(&config, &profile, level, &mut rng);
                    assert!(spawner.remaining() >= mean * 0.75 - 1e-4);
                    assert!(spawner.remaining() <= mean * 1.25 + 1e-4);
                }
            }
        }
    }

    #[test]
    fn mean_interval_shrinks_with_level_down_to_half() {
        let config = GameConfig::default();
        let profile = Difficulty::Medium.profile();
        let base = config.saucer_spawn_base_interval;
        assert!((SaucerSpawner::mean_interval(&config, &profile, 1) - base * 0.95).abs() < 1e-4);
        assert!((SaucerSpawner::mean_interval(&config, &profile, 30) - base * 0.5).abs() < 1e-4);
    }
}
