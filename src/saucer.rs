//! Enemy saucers: cross the screen horizontally and take inaccurate shots at
//! the player.

use crate::config::GameConfig;
use crate::entity::{Body, Entity};
use crate::geometry::{random_range, Playfield};
use crate::projectile::{Owner, Projectile};
use bevy::log::debug;
use bevy::math::Vec2;
use rand::Rng;
use std::f32::consts::PI;

#[derive(Debug, Clone, PartialEq)]
pub struct Saucer {
    body: Body,
    /// Points before the difficulty score multiplier.
    pub score: u32,
    fire_interval: f32,
    fire_timer: f32,
    bullet_speed: f32,
    bullet_radius: f32,
    bullet_lifetime: f32,
}

impl Saucer {
    /// Spawn just off a random side edge at a random height, heading for the
    /// opposite side.  The first shot comes after 0.5-1.5x the fire interval.
    pub fn spawn<R: Rng + ?Sized>(field: &Playfield, config: &GameConfig, rng: &mut R) -> Self {
        let r = config.saucer_radius;
        let from_left = rng.gen_bool(0.5);
        let x = if from_left { -r } else { field.width + r };
        let y = random_range(rng, r, field.height - r);

        let mut body = Body::new(Vec2::new(x, y), r);
        body.velocity = Vec2::new(
            if from_left { config.saucer_speed } else { -config.saucer_speed },
            0.0,
        );

        Self {
            body,
            score: config.saucer_score,
            fire_interval: config.saucer_fire_interval,
            fire_timer: config.saucer_fire_interval * random_range(rng, 0.5, 1.5),
            bullet_speed: config.saucer_bullet_speed,
            bullet_radius: config.bullet_radius,
            bullet_lifetime: config.bullet_lifetime,
        }
    }

    /// Move, despawn once fully past the far edge, and count down to the next
    /// shot.  A shot is only produced when `target` (the live ship position) is
    /// known; the timer resets either way.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        delta: f32,
        field: &Playfield,
        target: Option<Vec2>,
        accuracy: f32,
        rng: &mut R,
    ) -> Option<Projectile> {
        if !self.is_alive() {
            return None;
        }
        self.integrate(delta, field);

        let b = &self.body;
        let exited = (b.velocity.x > 0.0 && b.position.x > field.width + b.radius * 2.0)
            || (b.velocity.x < 0.0 && b.position.x < -b.radius * 2.0);
        if exited {
            debug!("Saucer left the field at {:?}", b.position);
            self.destroy();
            return None;
        }

        self.fire_timer -= delta;
        if self.fire_timer > 0.0 {
            return None;
        }
        self.fire_timer = self.fire_interval * random_range(rng, 0.8, 1.2);
        target.map(|t| self.shoot_at(t, accuracy, rng))
    }

    /// Bullet aimed at `target` with a uniform error in
    /// `[-(1 - accuracy) * PI, (1 - accuracy) * PI]`.
    pub fn shoot_at<R: Rng + ?Sized>(&self, target: Vec2, accuracy: f32, rng: &mut R) -> Projectile {
        let to_target = target - self.body.position;
        let bearing = to_target.y.atan2(to_target.x);
        let max_error = (1.0 - accuracy.clamp(0.0, 1.0)) * PI;
        let angle = bearing + random_range(rng, -max_error, max_error);
        Projectile::new(
            self.body.position,
            angle,
            self.bullet_speed,
            self.bullet_radius,
            self.bullet_lifetime,
            Owner::Enemy,
        )
    }
}

impl Entity for Saucer {
    const WRAPS: bool = false;

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn spawns_off_a_side_edge_moving_inward() {
        let config = GameConfig::default();
        let field = config.playfield();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let s = Saucer::spawn(&field, &config, &mut rng);
            let p = s.position();
            assert!(p.x < 0.0 || p.x > field.width);
            assert!(p.y >= s.body().radius && p.y <= field.height - s.body().radius);
            assert_eq!(s.body().velocity.y, 0.0);
            if p.x < 0.0 {
                assert!(s.body().velocity.x > 0.0);
            } else {
                assert!(s.body().velocity.x < 0.0);
            }
        }
    }

    #[test]
    fn despawns_after_crossing_the_field() {
        let config = GameConfig::default();
        let field = config.playfield();
        let mut rng = StdRng::seed_from_u64(9);
        let mut s = Saucer::spawn(&field, &config, &mut rng);
        let crossing = (field.width + 4.0 * config.saucer_radius) / config.saucer_speed;
        let mut t = 0.0;
        while s.is_alive() && t < crossing + 1.0 {
            s.update(0.05, &field, None, 1.0, &mut rng);
            t += 0.05;
        }
        assert!(!s.is_alive());
    }

    #[test]
    fn perfect_accuracy_aims_straight_at_target() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let s = Saucer::spawn(&config.playfield(), &config, &mut rng);
        let target = s.position() + Vec2::new(0.0, 100.0);
        let shot = s.shoot_at(target, 1.0, &mut rng);
        assert_eq!(shot.owner, Owner::Enemy);
        let dir = shot.body().velocity.normalize();
        assert!((dir - Vec2::Y).length() < 1e-4);
    }

    #[test]
    fn no_target_means_no_shot() {
        let config = GameConfig::default();
        let field = config.playfield();
        let mut rng = StdRng::seed_from_u64(2);
        let mut s = Saucer::spawn(&field, &config, &mut rng);
        // Past any possible first-shot delay, but before leaving the field.
        let mut shots = 0;
        for _ in 0..40 {
            if s.update(0.1, &field, None, 0.8, &mut rng).is_some() {
                shots += 1;
            }
        }
        assert_eq!(shots, 0);
    }

    #[test]
    fn aim_error_stays_within_the_accuracy_cone() {
        let config = GameConfig::default();
        let field = config.playfield();
        let mut rng = StdRng::seed_from_u64(13);
        let saucer = Saucer::spawn(&field, &config, &mut rng);
        let target = field.center();
        let to_target = target - saucer.position();
        let bearing = to_target.y.atan2(to_target.x);
        let accuracy = 0.6;
        let max_error = (1.0 - accuracy) * PI;

        let mut widest: f32 = 0.0;
        for _ in 0..500 {
            let v = saucer.shoot_at(target, accuracy, &mut rng).body().velocity;
            let error = Vec2::from_angle(bearing).angle_to(v).abs();
            assert!(error <= max_error + 1e-3, "error {error} beyond {max_error}");
            widest = widest.max(error);
        }
        assert!(widest > max_error * 0.5, "spread should use most of the cone");
    }

    #[test]
    fn fire_timer_resets_within_twenty_percent_of_the_interval() {
        let config = GameConfig::default();
        let field = config.playfield();
        let mut rng = StdRng::seed_from_u64(17);
        let target = Some(field.center());
        for _ in 0..100 {
            let mut s = Saucer::spawn(&field, &config, &mut rng);
            s.fire_timer = 1e-4;
            let shot = s.update(1e-3, &field, target, 0.8, &mut rng);
            assert!(shot.is_some());
            assert!(s.fire_timer >= config.saucer_fire_interval * 0.8 - 1e-4);
            assert!(s.fire_timer <= config.saucer_fire_interval * 1.2 + 1e-4);
        }
    }

    #[test]
    fn first_shot_comes_after_half_to_one_and_a_half_intervals() {
        let config = GameConfig::default();
        let field = config.playfield();
        let mut rng = StdRng::seed_from_u64(19);
        for _ in 0..100 {
            let s = Saucer::spawn(&field, &config, &mut rng);
            assert!(s.fire_timer >= config.saucer_fire_interval * 0.5);
            assert!(s.fire_timer <= config.saucer_fire_interval * 1.5);
        }
    }
}
