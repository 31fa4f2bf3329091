//! Drifting rocks: size tiers, frozen jagged outlines and splitting.

use crate::config::GameConfig;
use crate::entity::{Body, Entity};
use crate::geometry::{deg_to_rad, heading, random_range, Playfield};
use bevy::math::Vec2;
use rand::Rng;
use std::f32::consts::{FRAC_PI_4, TAU};

/// Size class of an asteroid.  The tier fixes radius, outline vertex count,
/// speed multiplier and score value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AsteroidTier {
    Large,
    Medium,
    Small,
}

impl AsteroidTier {
    pub const fn radius(self) -> f32 {
        match self {
            AsteroidTier::Large => 40.0,
            AsteroidTier::Medium => 20.0,
            AsteroidTier::Small => 10.0,
        }
    }

    pub const fn vertex_count(self) -> usize {
        match self {
            AsteroidTier::Large => 10,
            AsteroidTier::Medium => 8,
            AsteroidTier::Small => 6,
        }
    }

    pub const fn speed_multiplier(self) -> f32 {
        match self {
            AsteroidTier::Large => 1.0,
            AsteroidTier::Medium => 1.5,
            AsteroidTier::Small => 2.0,
        }
    }

    /// Base points before the difficulty score multiplier.
    pub const fn score(self) -> u32 {
        match self {
            AsteroidTier::Large => 20,
            AsteroidTier::Medium => 50,
            AsteroidTier::Small => 100,
        }
    }

    /// The tier produced by splitting, or `None` for the smallest rocks.
    pub const fn next(self) -> Option<AsteroidTier> {
        match self {
            AsteroidTier::Large => Some(AsteroidTier::Medium),
            AsteroidTier::Medium => Some(AsteroidTier::Small),
            AsteroidTier::Small => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Asteroid {
    body: Body,
    pub tier: AsteroidTier,
    /// Outline vertices relative to the centre, before rotation.  Generated
    /// once and never modified.
    outline: Vec<Vec2>,
    /// Angular velocity in radians per second.
    spin: f32,
}

impl Asteroid {
    /// A new asteroid with an explicit velocity (used for split children).
    pub fn with_velocity<R: Rng + ?Sized>(
        position: Vec2,
        tier: AsteroidTier,
        velocity: Vec2,
        config: &GameConfig,
        rng: &mut R,
    ) -> Self {
        let mut body = Body::new(position, tier.radius());
        body.velocity = velocity;
        let max_spin = deg_to_rad(config.asteroid_max_spin_deg);
        Self {
            body,
            tier,
            outline: generate_outline(tier, config.asteroid_jaggedness, rng),
            spin: random_range(rng, -max_spin, max_spin),
        }
    }

    /// A new asteroid drifting in a random direction at
    /// `base speed * speed_multiplier * tier multiplier`.
    pub fn drifting<R: Rng + ?Sized>(
        position: Vec2,
        tier: AsteroidTier,
        speed_multiplier: f32,
        config: &GameConfig,
        rng: &mut R,
    ) -> Self {
        let direction = random_range(rng, 0.0, TAU);
        let speed = config.asteroid_base_speed * speed_multiplier * tier.speed_multiplier();
        Self::with_velocity(position, tier, heading(direction) * speed, config, rng)
    }

    pub fn update(&mut self, delta: f32, field: &Playfield) {
        if !self.is_alive() {
            return;
        }
        self.body.rotation += self.spin * delta;
        self.integrate(delta, field);
    }

    /// Destroy this asteroid and return its children: two of the next tier,
    /// or none for a small rock.  A dead asteroid yields nothing.
    ///
    /// Each child inherits the parent velocity plus a kick of fixed magnitude
    /// in a random direction within ±45°, and the sum is scaled by a random
    /// factor.
    pub fn split<R: Rng + ?Sized>(&mut self, config: &GameConfig, rng: &mut R) -> Vec<Asteroid> {
        if !self.destroy() {
            return Vec::new();
        }
        let Some(child_tier) = self.tier.next() else {
            return Vec::new();
        };

        (0..2)
            .map(|_| {
                let kick_angle = random_range(rng, -FRAC_PI_4, FRAC_PI_4);
                let speed_kick = random_range(
                    rng,
                    config.asteroid_split_speed_min,
                    config.asteroid_split_speed_max,
                );
                let velocity =
                    (self.body.velocity + heading(kick_angle) * config.asteroid_split_kick) * speed_kick;
                Asteroid::with_velocity(self.body.position, child_tier, velocity, config, rng)
            })
            .collect()
    }

    #[inline]
    pub fn outline(&self) -> &[Vec2] {
        &self.outline
    }

    #[inline]
    pub fn spin(&self) -> f32 {
        self.spin
    }
}

impl Entity for Asteroid {
    const WRAPS: bool = true;

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

/// Vertices at uniform angular steps, each pulled inward by a random factor
/// in `[1 - jaggedness, 1]`.
fn generate_outline<R: Rng + ?Sized>(tier: AsteroidTier, jaggedness: f32, rng: &mut R) -> Vec<Vec2> {
    let n = tier.vertex_count();
    let step = TAU / n as f32;
    (0..n)
        .map(|i| {
            let scale = 1.0 - random_range(rng, 0.0, jaggedness);
            heading(i as f32 * step) * tier.radius() * scale
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rock(tier: AsteroidTier) -> (Asteroid, GameConfig, StdRng) {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let a = Asteroid::drifting(Vec2::new(100.0, 100.0), tier, 1.0, &config, &mut rng);
        (a, config, rng)
    }

    #[test]
    fn splitting_is_size_monotonic() {
        let (mut large, config, mut rng) = rock(AsteroidTier::Large);
        let mediums = large.split(&config, &mut rng);
        assert!(!large.is_alive());
        assert_eq!(mediums.len(), 2);
        assert!(mediums.iter().all(|a| a.tier == AsteroidTier::Medium));

        let mut medium = mediums[0].clone();
        let smalls = medium.split(&config, &mut rng);
        assert_eq!(smalls.len(), 2);
        assert!(smalls.iter().all(|a| a.tier == AsteroidTier::Small));

        let mut small = smalls[0].clone();
        assert!(small.split(&config, &mut rng).is_empty());
        assert!(!small.is_alive());
    }

    #[test]
    fn splitting_a_dead_asteroid_yields_nothing() {
        let (mut a, config, mut rng) = rock(AsteroidTier::Large);
        a.destroy();
        assert!(a.split(&config, &mut rng).is_empty());
    }

    #[test]
    fn outline_stays_within_jaggedness_band() {
        let (a, config, _) = rock(AsteroidTier::Large);
        assert_eq!(a.outline().len(), 10);
        let r = AsteroidTier::Large.radius();
        for v in a.outline() {
            let len = v.length();
            assert!(len <= r + 1e-3);
            assert!(len >= r * (1.0 - config.asteroid_jaggedness) - 1e-3);
        }
    }

    #[test]
    fn fresh_velocity_uses_all_multipliers() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let a = Asteroid::drifting(Vec2::ZERO, AsteroidTier::Small, 1.2, &config, &mut rng);
        let expected = config.asteroid_base_speed * 1.2 * 2.0;
        assert!((a.body().velocity.length() - expected).abs() < 1e-3);
    }

    #[test]
    fn update_spins_and_moves() {
        let (mut a, config, _) = rock(AsteroidTier::Medium);
        let before = *a.body();
        a.update(0.1, &config.playfield());
        assert!((a.body().rotation - (before.rotation + a.spin() * 0.1)).abs() < 1e-5);
        assert_ne!(a.position(), before.position);
    }

    /// Candidate `(m, a)` pairs with `v = (parent + heading(a) * kick) * m`.
    fn decompose(v: Vec2, parent: Vec2, kick: f32) -> Vec<(f32, f32)> {
        // |v * u - parent| = kick with u = 1 / m.
        let a = v.length_squared();
        let b = -2.0 * v.dot(parent);
        let c = parent.length_squared() - kick * kick;
        let disc = (b * b - 4.0 * a * c).max(0.0).sqrt();
        [(-b + disc) / (2.0 * a), (-b - disc) / (2.0 * a)]
            .into_iter()
            .filter(|&u| u > 0.0)
            .map(|u| {
                let k = v * u - parent;
                (1.0 / u, k.y.atan2(k.x))
            })
            .collect()
    }

    #[test]
    fn split_children_follow_the_kick_envelope() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(21);
        for parent_velocity in [Vec2::ZERO, Vec2::new(30.0, 0.0), Vec2::new(-12.0, 25.0)] {
            for _ in 0..100 {
                let mut parent = Asteroid::with_velocity(
                    Vec2::new(300.0, 300.0),
                    AsteroidTier::Large,
                    parent_velocity,
                    &config,
                    &mut rng,
                );
                for child in parent.split(&config, &mut rng) {
                    let v = child.body().velocity;
                    let fits = decompose(v, parent_velocity, config.asteroid_split_kick)
                        .into_iter()
                        .any(|(m, angle)| {
                            m >= config.asteroid_split_speed_min - 1e-3
                                && m <= config.asteroid_split_speed_max + 1e-3
                                && angle.abs() <= FRAC_PI_4 + 1e-3
                        });
                    assert!(fits, "child velocity {v:?} outside the envelope");
                }
            }
        }
    }

    #[test]
    fn split_of_a_still_rock_moves_at_kick_times_factor() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..100 {
            let mut parent =
                Asteroid::with_velocity(Vec2::ZERO, AsteroidTier::Medium, Vec2::ZERO, &config, &mut rng);
            for child in parent.split(&config, &mut rng) {
                let speed = child.body().velocity.length();
                assert!(speed >= config.asteroid_split_kick * config.asteroid_split_speed_min - 1e-3);
                assert!(speed <= config.asteroid_split_kick * config.asteroid_split_speed_max + 1e-3);
            }
        }
    }
}
