//! Shared body state and the [`Entity`] capability trait.
//!
//! Every simulated object (ship, asteroid, projectile, saucer) embeds a
//! [`Body`] and implements [`Entity`].  Dispatch is static: collision checks
//! are generic over the two concrete types, so there is no trait object in the
//! per-tick loops.

use crate::geometry::Playfield;
use bevy::math::Vec2;

/// Kinematic state common to all entities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Heading in radians; 0 points along +x, positive turns toward +y.
    pub rotation: f32,
    /// Collision radius.
    pub radius: f32,
    pub alive: bool,
}

impl Body {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            radius,
            alive: true,
        }
    }

    /// Circle overlap test.  Touching circles (distance == sum of radii) do
    /// not collide, and a dead body never collides with anything.
    #[inline]
    pub fn overlaps(&self, other: &Body) -> bool {
        if !self.alive || !other.alive {
            return false;
        }
        self.position.distance(other.position) < self.radius + other.radius
    }
}

/// Capability set shared by every simulated object.
pub trait Entity {
    /// Whether the body folds back across playfield edges after moving.
    const WRAPS: bool;

    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    #[inline]
    fn position(&self) -> Vec2 {
        self.body().position
    }

    #[inline]
    fn is_alive(&self) -> bool {
        self.body().alive
    }

    /// Advance the position by one step: `position += velocity * delta`, then
    /// wrap for entities that opt in.
    fn integrate(&mut self, delta: f32, field: &Playfield) {
        let body = self.body_mut();
        body.position += body.velocity * delta;
        if Self::WRAPS {
            body.position = field.wrap(body.position);
        }
    }

    fn collides_with<E: Entity + ?Sized>(&self, other: &E) -> bool {
        self.body().overlaps(other.body())
    }

    /// Mark the entity dead.  Returns `true` only if this call killed it.
    fn destroy(&mut self) -> bool {
        let body = self.body_mut();
        if !body.alive {
            return false;
        }
        body.alive = false;
        true
    }
}

/// Drop dead entities from a collection.
pub fn prune_dead<E: Entity>(entities: &mut Vec<E>) {
    entities.retain(|e| e.is_alive());
}
