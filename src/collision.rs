//! Per-tick collision resolution.
//!
//! [`resolve`] runs once per tick after every entity has moved.  It mutates
//! alive flags only; nothing is removed from the collections here.  Pruning
//! happens afterwards in the session, and the caller turns the returned
//! [`Hit`] list into score, lives and statistics.
//!
//! Order:
//! 1. ship vs asteroids, 2. ship vs saucers, 3. ship vs enemy bullets.  These
//!    are skipped entirely while the ship is invulnerable, and the first hit
//!    ends resolution for the tick.
//! 4. every player bullet vs asteroids (first asteroid wins per bullet).
//! 5. player bullets that survived step 4 vs saucers.

use crate::asteroid::{Asteroid, AsteroidTier};
use crate::config::GameConfig;
use crate::difficulty::DifficultyProfile;
use crate::entity::Entity;
use crate::projectile::{Owner, Projectile};
use crate::saucer::Saucer;
use crate::ship::PlayerShip;
use rand::Rng;

/// One collision consequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// The ship flew into an asteroid; the asteroid was split.
    ShipRammedAsteroid(AsteroidTier),
    ShipRammedSaucer,
    ShipShot,
    /// A player bullet split an asteroid, worth `points` after the difficulty
    /// multiplier.
    AsteroidShot { tier: AsteroidTier, points: u32 },
    SaucerShot { points: u32 },
}

impl Hit {
    #[inline]
    pub fn killed_ship(self) -> bool {
        matches!(
            self,
            Hit::ShipRammedAsteroid(_) | Hit::ShipRammedSaucer | Hit::ShipShot
        )
    }
}

#[derive(Debug, Default)]
pub struct Resolution {
    pub hits: Vec<Hit>,
    /// Split products.  The caller appends these to the asteroid collection
    /// after resolution, so no bullet can hit them in the same tick.
    pub fragments: Vec<Asteroid>,
}

/// Everything the resolver mutates, borrowed for one tick.
pub struct CollisionWorld<'a> {
    pub ship: Option<&'a mut PlayerShip>,
    pub asteroids: &'a mut [Asteroid],
    pub projectiles: &'a mut [Projectile],
    pub saucers: &'a mut [Saucer],
}

pub fn resolve<R: Rng + ?Sized>(
    world: CollisionWorld<'_>,
    profile: &DifficultyProfile,
    config: &GameConfig,
    rng: &mut R,
) -> Resolution {
    let CollisionWorld {
        ship,
        asteroids,
        projectiles,
        saucers,
    } = world;
    let mut out = Resolution::default();

    if let Some(ship) = ship {
        if let Some(hit) = resolve_ship(ship, asteroids, projectiles, saucers, config, rng, &mut out) {
            out.hits.push(hit);
            return out;
        }
    }

    for bullet in projectiles.iter_mut() {
        if !bullet.is_alive() || bullet.owner != Owner::Player {
            continue;
        }
        let Some(rock) = asteroids.iter_mut().find(|a| bullet.collides_with(&**a)) else {
            continue;
        };
        bullet.destroy();
        let tier = rock.tier;
        out.fragments.extend(rock.split(config, rng));
        out.hits.push(Hit::AsteroidShot {
            tier,
            points: profile.scale_score(tier.score()),
        });
    }

    // Bullets spent on asteroids are already dead here.
    for bullet in projectiles.iter_mut() {
        if !bullet.is_alive() || bullet.owner != Owner::Player {
            continue;
        }
        let Some(saucer) = saucers.iter_mut().find(|s| bullet.collides_with(&**s)) else {
            continue;
        };
        bullet.destroy();
        saucer.destroy();
        out.hits.push(Hit::SaucerShot {
            points: profile.scale_score(saucer.score),
        });
    }

    out
}

/// Steps 1-3.  Returns the hit that killed the ship, if any.
fn resolve_ship<R: Rng + ?Sized>(
    ship: &mut PlayerShip,
    asteroids: &mut [Asteroid],
    projectiles: &mut [Projectile],
    saucers: &mut [Saucer],
    config: &GameConfig,
    rng: &mut R,
    out: &mut Resolution,
) -> Option<Hit> {
    if !ship.is_alive() || ship.is_invulnerable() {
        return None;
    }

    if let Some(rock) = asteroids.iter_mut().find(|a| ship.collides_with(&**a)) {
        if ship.destroy_with(false) {
            let tier = rock.tier;
            out.fragments.extend(rock.split(config, rng));
            return Some(Hit::ShipRammedAsteroid(tier));
        }
    }

    if let Some(saucer) = saucers.iter_mut().find(|s| ship.collides_with(&**s)) {
        if ship.destroy_with(false) {
            saucer.destroy();
            return Some(Hit::ShipRammedSaucer);
        }
    }

    if let Some(bullet) = projectiles
        .iter_mut()
        .find(|p| p.owner == Owner::Enemy && ship.collides_with(&**p))
    {
        if ship.destroy_with(false) {
            bullet.destroy();
            return Some(Hit::ShipShot);
        }
    }

    None
}
