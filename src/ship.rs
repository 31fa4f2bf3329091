//! The player's ship: rotation, thrust with inertial drift, firing cooldown,
//! spawn invulnerability and the hyperspace jump.

use crate::asteroid::Asteroid;
use crate::config::GameConfig;
use crate::entity::{Body, Entity};
use crate::geometry::{deg_to_rad, heading, random_range, Playfield};
use crate::projectile::{Owner, Projectile};
use crate::saucer::Saucer;
use bevy::math::Vec2;
use rand::Rng;

/// Per-ship tuning, copied out of [`GameConfig`] when the ship spawns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipTuning {
    pub thrust: f32,
    pub thrust_frame_scale: f32,
    pub friction: f32,
    /// Radians per second.
    pub turn_rate: f32,
    pub shot_cooldown: f32,
    pub bullet_speed: f32,
    pub bullet_radius: f32,
    pub bullet_lifetime: f32,
    pub invulnerability_duration: f32,
    pub blink_interval: f32,
    pub hyperspace_cooldown: f32,
    pub hyperspace_failure_chance: f32,
}

impl From<&GameConfig> for ShipTuning {
    fn from(config: &GameConfig) -> Self {
        Self {
            thrust: config.ship_thrust,
            thrust_frame_scale: config.ship_thrust_frame_scale,
            friction: config.ship_friction,
            turn_rate: deg_to_rad(config.ship_turn_speed_deg),
            shot_cooldown: config.ship_shot_cooldown,
            bullet_speed: config.player_bullet_speed,
            bullet_radius: config.bullet_radius,
            bullet_lifetime: config.bullet_lifetime,
            invulnerability_duration: config.ship_invulnerability_duration,
            blink_interval: config.ship_blink_interval,
            hyperspace_cooldown: config.hyperspace_cooldown,
            hyperspace_failure_chance: config.hyperspace_failure_chance,
        }
    }
}

/// Result of a hyperspace attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HyperspaceOutcome {
    /// The jump is still cooling down (or the ship is dead); nothing happened.
    NotReady,
    /// Clean relocation.
    Jumped,
    /// The random mishap roll destroyed the ship before it moved.
    SelfDestructed,
    /// The ship relocated on top of an asteroid or saucer and was destroyed.
    Materialized,
}

impl HyperspaceOutcome {
    #[inline]
    pub fn succeeded(self) -> bool {
        self == HyperspaceOutcome::Jumped
    }

    /// `true` for the two outcomes that killed the ship.
    #[inline]
    pub fn destroyed_ship(self) -> bool {
        matches!(
            self,
            HyperspaceOutcome::SelfDestructed | HyperspaceOutcome::Materialized
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerShip {
    body: Body,
    pub tuning: ShipTuning,
    thrusting: bool,
    shot_timer: f32,
    hyperspace_timer: f32,
    invulnerability_timer: f32,
    blink_timer: f32,
    blink_on: bool,
}

impl PlayerShip {
    /// A fresh ship at `position`, facing up the screen, with a full
    /// invulnerability window.
    pub fn spawn(position: Vec2, radius: f32, tuning: ShipTuning) -> Self {
        let mut body = Body::new(position, radius);
        body.rotation = deg_to_rad(-90.0);
        let mut ship = Self {
            body,
            tuning,
            thrusting: false,
            shot_timer: 0.0,
            hyperspace_timer: 0.0,
            invulnerability_timer: 0.0,
            blink_timer: 0.0,
            blink_on: true,
        };
        ship.make_invulnerable(tuning.invulnerability_duration);
        ship
    }

    pub fn from_config(position: Vec2, config: &GameConfig) -> Self {
        Self::spawn(position, config.ship_radius, ShipTuning::from(config))
    }

    pub fn make_invulnerable(&mut self, duration: f32) {
        self.invulnerability_timer = duration;
        self.blink_timer = self.tuning.blink_interval;
        self.blink_on = true;
    }

    /// `direction` is -1 (counter-clockwise on screen), 0 or +1.
    pub fn rotate(&mut self, direction: f32, delta: f32) {
        self.body.rotation += self.tuning.turn_rate * direction * delta;
    }

    /// Engine state for the coming tick.  The caller sets this from input
    /// every tick.
    pub fn set_thrusting(&mut self, thrusting: bool) {
        self.thrusting = thrusting;
    }

    #[inline]
    pub fn is_thrusting(&self) -> bool {
        self.thrusting && self.is_alive()
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerability_timer > 0.0
    }

    /// Whether the renderer should draw the ship this frame.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.is_alive() && (!self.is_invulnerable() || self.blink_on)
    }

    #[inline]
    pub fn hyperspace_ready(&self) -> bool {
        self.hyperspace_timer <= 0.0
    }

    /// Nose position, where bullets appear.
    #[inline]
    pub fn nose(&self) -> Vec2 {
        self.body.position + heading(self.body.rotation) * self.body.radius
    }

    /// Fire a bullet if the shot cooldown has elapsed.
    pub fn try_fire(&mut self) -> Option<Projectile> {
        if !self.is_alive() || self.shot_timer > 0.0 {
            return None;
        }
        self.shot_timer = self.tuning.shot_cooldown;
        Some(Projectile::new(
            self.nose(),
            self.body.rotation,
            self.tuning.bullet_speed,
            self.tuning.bullet_radius,
            self.tuning.bullet_lifetime,
            Owner::Player,
        ))
    }

    pub fn update(&mut self, delta: f32, field: &Playfield) {
        if !self.is_alive() {
            return;
        }
        if self.shot_timer > 0.0 {
            self.shot_timer -= delta;
        }
        if self.hyperspace_timer > 0.0 {
            self.hyperspace_timer -= delta;
        }

        if self.thrusting {
            let accel = heading(self.body.rotation) * self.tuning.thrust;
            self.body.velocity += accel * delta * self.tuning.thrust_frame_scale;
        }
        // Friction applies every tick, thrusting or not.
        self.body.velocity *= self.tuning.friction;

        self.integrate(delta, field);

        if self.is_invulnerable() {
            self.invulnerability_timer -= delta;
            self.blink_timer -= delta;
            if self.blink_timer <= 0.0 {
                self.blink_on = !self.blink_on;
                self.blink_timer = self.tuning.blink_interval;
            }
        }
    }

    /// Try to destroy the ship.  While invulnerable the attempt is ignored
    /// unless `force` is set.  Returns whether the ship died in this call.
    pub fn destroy_with(&mut self, force: bool) -> bool {
        if !force && self.is_invulnerable() {
            return false;
        }
        if !self.body.alive {
            return false;
        }
        self.body.alive = false;
        self.thrusting = false;
        true
    }

    /// Attempt a hyperspace jump.
    ///
    /// Rolls the mishap chance first; on survival the ship moves to a uniform
    /// random point at least one radius inside every edge, stops, and is
    /// checked against every live asteroid and saucer.  Both failure modes
    /// force-destroy the ship.  Only a clean jump starts the cooldown.
    pub fn hyperspace<R: Rng + ?Sized>(
        &mut self,
        field: &Playfield,
        asteroids: &[Asteroid],
        saucers: &[Saucer],
        rng: &mut R,
    ) -> HyperspaceOutcome {
        if !self.is_alive() || !self.hyperspace_ready() {
            return HyperspaceOutcome::NotReady;
        }

        if rng.gen::<f32>() < self.tuning.hyperspace_failure_chance {
            self.destroy_with(true);
            return HyperspaceOutcome::SelfDestructed;
        }

        let r = self.body.radius;
        self.body.position = Vec2::new(
            random_range(rng, r, field.width - r),
            random_range(rng, r, field.height - r),
        );
        self.body.velocity = Vec2::ZERO;

        let blocked = asteroids.iter().any(|a| self.collides_with(a))
            || saucers.iter().any(|s| self.collides_with(s));
        if blocked {
            self.destroy_with(true);
            return HyperspaceOutcome::Materialized;
        }

        self.hyperspace_timer = self.tuning.hyperspace_cooldown;
        HyperspaceOutcome::Jumped
    }
}

impl Entity for PlayerShip {
    const WRAPS: bool = true;

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn destroy(&mut self) -> bool {
        self.destroy_with(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asteroid::AsteroidTier;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DT: f32 = 1.0 / 60.0;

    fn setup() -> (PlayerShip, GameConfig, StdRng) {
        let config = GameConfig::default();
        let ship = PlayerShip::from_config(config.playfield().center(), &config);
        (ship, config, StdRng::seed_from_u64(11))
    }

    #[test]
    fn spawn_protection_then_vulnerable() {
        let (mut ship, config, _) = setup();
        assert!(!ship.destroy());
        assert!(ship.is_alive());

        let ticks = (config.ship_invulnerability_duration / DT).ceil() as usize + 1;
        for _ in 0..ticks {
            ship.update(DT, &config.playfield());
        }
        assert!(!ship.is_invulnerable());
        assert!(ship.destroy());
        assert!(!ship.is_alive());
    }

    #[test]
    fn forced_destroy_ignores_invulnerability() {
        let (mut ship, _, _) = setup();
        assert!(ship.is_invulnerable());
        assert!(ship.destroy_with(true));
        assert!(!ship.destroy_with(true), "already dead");
    }

    #[test]
    fn blink_toggles_while_invulnerable() {
        let (mut ship, config, _) = setup();
        assert!(ship.is_visible());
        let ticks = (config.ship_blink_interval / DT).ceil() as usize + 1;
        for _ in 0..ticks {
            ship.update(DT, &config.playfield());
        }
        assert!(!ship.is_visible());
    }

    #[test]
    fn fire_respects_cooldown() {
        let (mut ship, config, _) = setup();
        let shot = ship.try_fire().expect("first shot");
        assert_eq!(shot.owner, Owner::Player);
        assert!((shot.position() - ship.nose()).length() < 1e-4);
        assert!(ship.try_fire().is_none());
        for _ in 0..20 {
            ship.update(DT, &config.playfield());
        }
        assert!(ship.try_fire().is_some());
    }

    #[test]
    fn drift_decays_without_thrust() {
        let (mut ship, config, _) = setup();
        ship.set_thrusting(true);
        ship.update(DT, &config.playfield());
        let v0 = ship.body().velocity.length();
        assert!(v0 > 0.0);
        ship.set_thrusting(false);
        ship.update(DT, &config.playfield());
        let v1 = ship.body().velocity.length();
        assert!(v1 < v0 && v1 > 0.0);
    }

    #[test]
    fn rotate_uses_turn_rate() {
        let (mut ship, _, _) = setup();
        let start = ship.body().rotation;
        ship.rotate(1.0, 0.5);
        assert!((ship.body().rotation - start - std::f32::consts::PI).abs() < 1e-4);
    }

    #[test]
    fn hyperspace_certain_failure_destroys_ship() {
        let (mut ship, config, mut rng) = setup();
        ship.tuning.hyperspace_failure_chance = 1.0;
        let outcome = ship.hyperspace(&config.playfield(), &[], &[], &mut rng);
        assert_eq!(outcome, HyperspaceOutcome::SelfDestructed);
        assert!(!outcome.succeeded());
        assert!(!ship.is_alive());
    }

    #[test]
    fn hyperspace_clean_jump_relocates_inside_field() {
        let (mut ship, config, mut rng) = setup();
        ship.tuning.hyperspace_failure_chance = 0.0;
        let field = config.playfield();
        let outcome = ship.hyperspace(&field, &[], &[], &mut rng);
        assert!(outcome.succeeded());
        assert!(ship.is_alive());
        let p = ship.position();
        let r = ship.body().radius;
        assert!(p.x >= r && p.x <= field.width - r);
        assert!(p.y >= r && p.y <= field.height - r);
        assert_eq!(ship.body().velocity, Vec2::ZERO);
        assert_eq!(
            ship.hyperspace(&field, &[], &[], &mut rng),
            HyperspaceOutcome::NotReady
        );
    }

    #[test]
    fn hyperspace_into_an_asteroid_is_fatal() {
        let (mut ship, mut config, mut rng) = setup();
        ship.tuning.hyperspace_failure_chance = 0.0;
        config.playfield_width = 40.0;
        config.playfield_height = 40.0;
        // A rock covering the whole tiny field.
        let rock = Asteroid::drifting(Vec2::new(20.0, 20.0), AsteroidTier::Large, 0.0, &config, &mut rng);
        let outcome = ship.hyperspace(&config.playfield(), &[rock], &[], &mut rng);
        assert_eq!(outcome, HyperspaceOutcome::Materialized);
        assert!(!ship.is_alive());
    }
}
