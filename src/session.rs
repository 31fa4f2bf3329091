//! One playthrough: score, lives, level, the entity collections and the
//! per-tick update order.
//!
//! [`Session::tick`] is the whole simulation step.  It never touches input
//! devices, audio or rendering; it reads a [`ShipControls`] snapshot and
//! reports what happened as [`SessionEvent`]s for the caller to turn into
//! sounds, achievements and state transitions.

use crate::asteroid::{Asteroid, AsteroidTier};
use crate::collision::{self, CollisionWorld, Hit};
use crate::config::GameConfig;
use crate::difficulty::{Difficulty, DifficultyProfile};
use crate::entity::{prune_dead, Entity};
use crate::projectile::Projectile;
use crate::saucer::Saucer;
use crate::ship::{HyperspaceOutcome, PlayerShip};
use crate::spawner::{spawn_level_asteroids, SaucerSpawner};
use bevy::log::{debug, info};
use rand::rngs::StdRng;

/// Player intent for one tick, already decoded from input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShipControls {
    /// -1 turns counter-clockwise on screen, +1 clockwise.
    pub turn: f32,
    pub thrust: bool,
    pub fire: bool,
    /// Edge-triggered.
    pub hyperspace: bool,
}

/// Per-playthrough counters consumed by achievements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub asteroids_destroyed: u32,
    pub saucers_destroyed: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    PlayerFired,
    SaucerFired,
    SaucerSpawned,
    /// `points` is zero when the ship rammed the asteroid.
    AsteroidDestroyed { tier: AsteroidTier, points: u32 },
    SaucerDestroyed { points: u32 },
    PlayerDestroyed { lives_left: u32 },
    ExtraLife { lives: u32 },
    Hyperspace(HyperspaceOutcome),
    LevelStarted(u32),
    GameOver { score: u32 },
}

impl SessionEvent {
    /// Events after which achievements must be re-evaluated.
    pub fn affects_progress(&self) -> bool {
        matches!(
            self,
            SessionEvent::AsteroidDestroyed { .. }
                | SessionEvent::SaucerDestroyed { .. }
                | SessionEvent::LevelStarted(_)
        )
    }
}

pub struct Session {
    config: GameConfig,
    pub difficulty: Difficulty,
    profile: DifficultyProfile,
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    next_extra_life: u32,
    pub ship: Option<PlayerShip>,
    pub asteroids: Vec<Asteroid>,
    pub projectiles: Vec<Projectile>,
    pub saucers: Vec<Saucer>,
    respawn_timer: f32,
    saucer_spawner: SaucerSpawner,
    pub stats: SessionStats,
    game_over: bool,
    rng: StdRng,
}

impl Session {
    /// Start a new game: fresh ship at the centre, level 1 asteroid field,
    /// lives from the difficulty preset.
    pub fn start(config: GameConfig, difficulty: Difficulty, mut rng: StdRng) -> Self {
        let profile = difficulty.profile();
        let asteroids = spawn_level_asteroids(&config, &profile, 1, &mut rng);
        let saucer_spawner = SaucerSpawner::new(&config, &profile, 1, &mut rng);
        let ship = PlayerShip::from_config(config.playfield().center(), &config);
        info!(
            "New game on {difficulty}: {} lives, {} asteroids",
            profile.starting_lives,
            asteroids.len()
        );
        Self {
            next_extra_life: config.extra_life_score,
            config,
            difficulty,
            profile,
            score: 0,
            lives: profile.starting_lives,
            level: 1,
            ship: Some(ship),
            asteroids,
            projectiles: Vec::new(),
            saucers: Vec::new(),
            respawn_timer: 0.0,
            saucer_spawner,
            stats: SessionStats::default(),
            game_over: false,
            rng,
        }
    }

    #[inline]
    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.game_over
    }

    /// `true` while waiting out the post-death delay.
    #[inline]
    pub fn is_respawning(&self) -> bool {
        self.respawn_timer > 0.0
    }

    #[inline]
    pub fn next_extra_life(&self) -> u32 {
        self.next_extra_life
    }

    /// The live ship, if any.
    pub fn live_ship(&self) -> Option<&PlayerShip> {
        self.ship.as_ref().filter(|s| s.is_alive())
    }

    /// Add points and grant one life per extra-life threshold crossed.
    pub fn award(&mut self, points: u32, events: &mut Vec<SessionEvent>) {
        self.score = self.score.saturating_add(points);
        let step = self.config.extra_life_score;
        if step == 0 {
            return;
        }
        while self.score >= self.next_extra_life {
            self.lives += 1;
            self.next_extra_life = self.next_extra_life.saturating_add(step);
            info!("Extra life at {} points ({} lives)", self.score, self.lives);
            events.push(SessionEvent::ExtraLife { lives: self.lives });
            if self.next_extra_life == u32::MAX {
                break;
            }
        }
    }

    /// Advance the playthrough by `delta` seconds.  Does nothing once the game
    /// is over.
    pub fn tick(&mut self, delta: f32, controls: &ShipControls) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.game_over {
            return events;
        }
        let field = self.config.playfield();

        // Input first: hyperspace re-checks against last tick's positions.
        self.apply_controls(delta, controls, &mut events);
        // A hyperspace mishap can end the game before anything moves.
        if self.game_over {
            return events;
        }

        if self.respawn_timer > 0.0 {
            self.respawn_timer -= delta;
            if self.respawn_timer <= 0.0 {
                self.respawn_timer = 0.0;
                self.respawn_ship();
            }
        }

        if let Some(ship) = self.ship.as_mut() {
            ship.update(delta, &field);
        }
        for asteroid in &mut self.asteroids {
            asteroid.update(delta, &field);
        }
        for projectile in &mut self.projectiles {
            projectile.update(delta, &field);
        }

        let target = self.live_ship().map(|s| s.position());
        let accuracy = self.profile.saucer_accuracy;
        for saucer in &mut self.saucers {
            if let Some(shot) = saucer.update(delta, &field, target, accuracy, &mut self.rng) {
                self.projectiles.push(shot);
                events.push(SessionEvent::SaucerFired);
            }
        }

        self.resolve_collisions(&mut events);

        prune_dead(&mut self.asteroids);
        prune_dead(&mut self.projectiles);
        prune_dead(&mut self.saucers);
        if self.ship.as_ref().is_some_and(|s| !s.is_alive()) {
            self.ship = None;
        }

        if self.game_over {
            return events;
        }

        if self.saucer_spawner.tick(
            delta,
            self.saucers.len(),
            self.config.saucer_max_active,
            self.is_respawning(),
        ) {
            let saucer = Saucer::spawn(&field, &self.config, &mut self.rng);
            debug!("Saucer spawned at {:?}", saucer.position());
            self.saucers.push(saucer);
            self.saucer_spawner
                .reset(&self.config, &self.profile, self.level, &mut self.rng);
            events.push(SessionEvent::SaucerSpawned);
        }

        if self.asteroids.is_empty()
            && self.saucers.is_empty()
            && !self.is_respawning()
            && self.live_ship().is_some()
        {
            self.advance_level(&mut events);
        }

        events
    }

    fn apply_controls(&mut self, delta: f32, controls: &ShipControls, events: &mut Vec<SessionEvent>) {
        let Some(ship) = self.ship.as_mut().filter(|s| s.is_alive()) else {
            return;
        };
        if controls.turn != 0.0 {
            ship.rotate(controls.turn.clamp(-1.0, 1.0), delta);
        }
        ship.set_thrusting(controls.thrust);
        if controls.fire {
            if let Some(bullet) = ship.try_fire() {
                self.projectiles.push(bullet);
                events.push(SessionEvent::PlayerFired);
            }
        }
        if controls.hyperspace {
            let field = self.config.playfield();
            let outcome = ship.hyperspace(&field, &self.asteroids, &self.saucers, &mut self.rng);
            match outcome {
                HyperspaceOutcome::NotReady => debug!("Hyperspace not ready"),
                HyperspaceOutcome::Jumped => info!("Hyperspace to {:?}", ship.position()),
                HyperspaceOutcome::SelfDestructed => info!("Hyperspace mishap: ship lost"),
                HyperspaceOutcome::Materialized => info!("Hyperspace landed inside an object"),
            }
            if outcome != HyperspaceOutcome::NotReady {
                events.push(SessionEvent::Hyperspace(outcome));
            }
            if outcome.destroyed_ship() {
                self.lose_life(events);
            }
        }
    }

    fn resolve_collisions(&mut self, events: &mut Vec<SessionEvent>) {
        let resolution = collision::resolve(
            CollisionWorld {
                ship: self.ship.as_mut(),
                asteroids: &mut self.asteroids,
                projectiles: &mut self.projectiles,
                saucers: &mut self.saucers,
            },
            &self.profile,
            &self.config,
            &mut self.rng,
        );
        self.asteroids.extend(resolution.fragments);

        for hit in resolution.hits {
            match hit {
                Hit::ShipRammedAsteroid(tier) => {
                    events.push(SessionEvent::AsteroidDestroyed { tier, points: 0 });
                    self.lose_life(events);
                }
                Hit::ShipRammedSaucer => {
                    events.push(SessionEvent::SaucerDestroyed { points: 0 });
                    self.lose_life(events);
                }
                Hit::ShipShot => self.lose_life(events),
                Hit::AsteroidShot { tier, points } => {
                    self.stats.asteroids_destroyed += 1;
                    events.push(SessionEvent::AsteroidDestroyed { tier, points });
                    self.award(points, events);
                }
                Hit::SaucerShot { points } => {
                    self.stats.saucers_destroyed += 1;
                    events.push(SessionEvent::SaucerDestroyed { points });
                    self.award(points, events);
                }
            }
        }
    }

    /// Shared death path for collisions and hyperspace mishaps.
    fn lose_life(&mut self, events: &mut Vec<SessionEvent>) {
        self.lives = self.lives.saturating_sub(1);
        info!("Player destroyed, {} lives left", self.lives);
        events.push(SessionEvent::PlayerDestroyed {
            lives_left: self.lives,
        });
        if self.lives == 0 {
            self.game_over = true;
            info!("Game over with {} points", self.score);
            events.push(SessionEvent::GameOver { score: self.score });
        } else {
            self.respawn_timer = self.config.respawn_delay;
        }
    }

    fn respawn_ship(&mut self) {
        if self.game_over || self.live_ship().is_some() {
            return;
        }
        debug!("Respawning ship");
        self.ship = Some(PlayerShip::from_config(
            self.config.playfield().center(),
            &self.config,
        ));
    }

    fn advance_level(&mut self, events: &mut Vec<SessionEvent>) {
        self.level += 1;
        info!("Level {}", self.level);
        self.asteroids = spawn_level_asteroids(&self.config, &self.profile, self.level, &mut self.rng);
        self.saucer_spawner
            .reset(&self.config, &self.profile, self.level, &mut self.rng);
        events.push(SessionEvent::LevelStarted(self.level));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projectile::Owner;
    use bevy::math::Vec2;
    use rand::SeedableRng;

    const DT: f32 = 1.0 / 60.0;

    fn session(difficulty: Difficulty) -> Session {
        Session::start(GameConfig::default(), difficulty, StdRng::seed_from_u64(99))
    }

    #[test]
    fn crossing_one_threshold_grants_one_life() {
        let mut s = session(Difficulty::Medium);
        let mut events = Vec::new();
        s.award(9_990, &mut events);
        assert_eq!(s.lives, 3);
        s.award(20, &mut events);
        assert_eq!(s.lives, 4);
        assert_eq!(s.next_extra_life(), 20_000);
        assert_eq!(events, vec![SessionEvent::ExtraLife { lives: 4 }]);
    }

    #[test]
    fn crossing_two_thresholds_at_once_grants_two_lives() {
        let mut s = session(Difficulty::Medium);
        let mut events = Vec::new();
        s.award(25_000, &mut events);
        assert_eq!(s.lives, 5);
        assert_eq!(s.next_extra_life(), 30_000);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn death_starts_respawn_delay_then_new_ship_appears() {
        let mut s = session(Difficulty::Medium);
        s.asteroids.clear();
        let ship = s.ship.as_mut().unwrap();
        ship.make_invulnerable(0.0);
        let mut events = Vec::new();
        assert!(ship.destroy_with(false));
        s.lose_life(&mut events);
        assert_eq!(s.lives, 2);
        assert!(s.is_respawning());

        let events = s.tick(DT, &ShipControls::default());
        assert!(s.ship.is_none(), "dead ship removed");
        assert!(!events.iter().any(|e| matches!(e, SessionEvent::LevelStarted(_))));

        let ticks = (s.config().respawn_delay / DT).ceil() as usize + 1;
        for _ in 0..ticks {
            s.tick(DT, &ShipControls::default());
        }
        let ship = s.live_ship().expect("respawned");
        assert!(ship.is_invulnerable());
    }

    #[test]
    fn last_life_ends_the_game() {
        let mut s = session(Difficulty::Hard);
        let mut events = Vec::new();
        s.lose_life(&mut events);
        s.lose_life(&mut events);
        assert!(s.is_over());
        assert_eq!(events.last(), Some(&SessionEvent::GameOver { score: 0 }));
        assert!(s.tick(DT, &ShipControls::default()).is_empty());
    }

    #[test]
    fn clearing_the_field_advances_the_level() {
        let mut s = session(Difficulty::Easy);
        s.asteroids.clear();
        let events = s.tick(DT, &ShipControls::default());
        assert!(events.contains(&SessionEvent::LevelStarted(2)));
        assert_eq!(s.level, 2);
        assert_eq!(s.asteroids.len(), 5);
    }

    #[test]
    fn firing_adds_a_player_bullet() {
        let mut s = session(Difficulty::Medium);
        let controls = ShipControls {
            fire: true,
            ..Default::default()
        };
        let events = s.tick(DT, &controls);
        assert!(events.contains(&SessionEvent::PlayerFired));
        assert_eq!(s.projectiles.len(), 1);
    }

    #[test]
    fn hyperspace_mishap_costs_a_life() {
        let mut s = session(Difficulty::Medium);
        s.ship.as_mut().unwrap().tuning.hyperspace_failure_chance = 1.0;
        let controls = ShipControls {
            hyperspace: true,
            ..Default::default()
        };
        let events = s.tick(DT, &controls);
        assert!(events.contains(&SessionEvent::Hyperspace(HyperspaceOutcome::SelfDestructed)));
        assert_eq!(s.lives, 2);
        assert!(s.ship.is_none());
        assert!(s.is_respawning());
    }

    #[test]
    fn game_ending_mishap_stops_the_tick_before_scoring() {
        let mut s = session(Difficulty::Medium);
        s.lives = 1;
        s.ship.as_mut().unwrap().tuning.hyperspace_failure_chance = 1.0;
        let spot = Vec2::new(100.0, 100.0);
        let config = s.config().clone();
        let mut rng = StdRng::seed_from_u64(5);
        s.asteroids = vec![Asteroid::with_velocity(spot, AsteroidTier::Small, Vec2::ZERO, &config, &mut rng)];
        s.projectiles = vec![Projectile::new(spot, 0.0, 0.0, 2.0, 1.0, Owner::Player)];

        let events = s.tick(
            DT,
            &ShipControls {
                hyperspace: true,
                ..Default::default()
            },
        );

        assert!(s.is_over());
        assert_eq!(s.score, 0);
        assert_eq!(events.last(), Some(&SessionEvent::GameOver { score: 0 }));
        assert!(!events
            .iter()
            .any(|e| matches!(e, SessionEvent::AsteroidDestroyed { .. })));
        assert_eq!(s.asteroids.len(), 1);
        assert_eq!(s.stats.asteroids_destroyed, 0);
    }
}
