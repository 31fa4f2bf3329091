//! Short-lived bullets fired by the ship and by saucers.

use crate::entity::{Body, Entity};
use crate::geometry::{heading, Playfield};
use bevy::math::Vec2;

/// Who fired a projectile.  Player bullets hit asteroids and saucers; enemy
/// bullets only hit the ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Player,
    Enemy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    body: Body,
    pub owner: Owner,
    /// Seconds left before the projectile expires.
    pub lifetime: f32,
}

impl Projectile {
    /// Spawn a projectile at `origin` travelling along `angle` at `speed`.
    pub fn new(origin: Vec2, angle: f32, speed: f32, radius: f32, lifetime: f32, owner: Owner) -> Self {
        let mut body = Body::new(origin, radius);
        body.velocity = heading(angle) * speed;
        body.rotation = angle;
        Self {
            body,
            owner,
            lifetime,
        }
    }

    /// Move the projectile and kill it once its lifetime runs out or it leaves
    /// the playfield.  Projectiles never wrap.
    pub fn update(&mut self, delta: f32, field: &Playfield) {
        if !self.is_alive() {
            return;
        }
        self.integrate(delta, field);
        self.lifetime -= delta;
        if self.lifetime <= 0.0 || !field.contains(self.position()) {
            self.destroy();
        }
    }

    #[inline]
    pub fn is_player_owned(&self) -> bool {
        self.owner == Owner::Player
    }
}

impl Entity for Projectile {
    const WRAPS: bool = false;

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}
