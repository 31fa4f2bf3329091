//! End-to-end flows through the public API.
//!
//! The session-level tests drive [`Session`] directly with fixed seeds; the
//! app-level test runs [`ArcadeCorePlugin`] under [`MinimalPlugins`] so no
//! window, renderer or audio device is needed.

use asteroid_arcade::asteroid::{Asteroid, AsteroidTier};
use asteroid_arcade::config::GameConfig;
use asteroid_arcade::difficulty::Difficulty;
use asteroid_arcade::entity::Entity;
use asteroid_arcade::game::GameState;
use asteroid_arcade::input::{Action, ActionState, InputSource, TextInput};
use asteroid_arcade::plugin::{ArcadeCorePlugin, ArcadeGame};
use asteroid_arcade::projectile::{Owner, Projectile};
use asteroid_arcade::session::{Session, SessionEvent, ShipControls};
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn session(difficulty: Difficulty, seed: u64) -> Session {
    Session::start(GameConfig::default(), difficulty, StdRng::seed_from_u64(seed))
}

fn headless_app(save_dir: &std::path::Path) -> App {
    let config = GameConfig {
        save_dir: save_dir.to_path_buf(),
        ..GameConfig::default()
    };
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(ArcadeCorePlugin {
        config,
        seed: Some(7),
    });
    app
}

fn game_state(app: &App) -> GameState {
    app.world().resource::<ArcadeGame>().0.state()
}

// ── Session ───────────────────────────────────────────────────────────────────

#[test]
fn easy_session_starts_with_four_lives_and_three_large_rocks_away_from_the_ship() {
    for seed in 0..20 {
        let s = session(Difficulty::Easy, seed);
        let config = s.config().clone();
        let centre = config.playfield().center();

        assert_eq!(s.lives, 4);
        assert_eq!(s.level, 1);
        assert_eq!(s.score, 0);
        assert_eq!(s.asteroids.len(), 3);
        for rock in &s.asteroids {
            assert_eq!(rock.tier, AsteroidTier::Large);
            assert!(
                rock.position().distance(centre) > config.safe_spawn_radius,
                "seed {seed}: rock at {:?} is inside the safe zone",
                rock.position()
            );
        }
        let ship = s.live_ship().expect("ship spawns immediately");
        assert_eq!(ship.position(), centre);
        assert!(ship.is_invulnerable());
    }
}

#[test]
fn shooting_a_medium_rock_splits_it_and_scales_the_score() {
    let mut s = session(Difficulty::Hard, 3);
    let config = s.config().clone();
    let mut rng = StdRng::seed_from_u64(99);
    let spot = Vec2::new(100.0, 100.0);

    s.asteroids = vec![Asteroid::with_velocity(
        spot,
        AsteroidTier::Medium,
        Vec2::ZERO,
        &config,
        &mut rng,
    )];
    s.projectiles = vec![Projectile::new(spot, 0.0, 0.0, 2.0, 1.0, Owner::Player)];

    let events = s.tick(1.0 / 60.0, &ShipControls::default());

    // Medium is worth 50; Hard multiplies by 1.5.
    assert_eq!(s.score, 75);
    assert!(events.contains(&SessionEvent::AsteroidDestroyed {
        tier: AsteroidTier::Medium,
        points: 75,
    }));
    assert_eq!(s.asteroids.len(), 2);
    assert!(s.asteroids.iter().all(|a| a.tier == AsteroidTier::Small));
    assert!(s.projectiles.is_empty(), "the bullet is spent");
    assert_eq!(s.stats.asteroids_destroyed, 1);
}

#[test]
fn clearing_the_field_starts_the_next_level_with_more_rocks() {
    let mut s = session(Difficulty::Medium, 5);
    let config = s.config().clone();
    let mut rng = StdRng::seed_from_u64(1);
    let spot = Vec2::new(80.0, 80.0);

    s.asteroids = vec![Asteroid::with_velocity(
        spot,
        AsteroidTier::Small,
        Vec2::ZERO,
        &config,
        &mut rng,
    )];
    s.projectiles = vec![Projectile::new(spot, 0.0, 0.0, 2.0, 1.0, Owner::Player)];

    let events = s.tick(1.0 / 60.0, &ShipControls::default());

    assert!(events.contains(&SessionEvent::LevelStarted(2)));
    assert_eq!(s.level, 2);
    // Medium starts with 4 and adds 2 per level.
    assert_eq!(s.asteroids.len(), 6);
    assert!(s.asteroids.iter().all(|a| a.tier == AsteroidTier::Large));
}

#[test]
fn same_seed_same_playthrough() {
    let mut a = session(Difficulty::Medium, 42);
    let mut b = session(Difficulty::Medium, 42);
    let controls = ShipControls {
        turn: 1.0,
        thrust: true,
        fire: true,
        hyperspace: false,
    };
    for _ in 0..300 {
        assert_eq!(a.tick(1.0 / 60.0, &controls), b.tick(1.0 / 60.0, &controls));
    }
    assert_eq!(a.score, b.score);
    let pa: Vec<_> = a.asteroids.iter().map(|r| r.position()).collect();
    let pb: Vec<_> = b.asteroids.iter().map(|r| r.position()).collect();
    assert_eq!(pa, pb);
}

// ── Headless app ──────────────────────────────────────────────────────────────

#[test]
fn headless_app_signs_in_and_starts_a_game() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = headless_app(dir.path());
    app.update();
    assert_eq!(game_state(&app), GameState::UserEntry);

    {
        let mut input = app.world_mut().resource_mut::<ActionState>();
        for c in "pilot".chars() {
            input.push_text(TextInput::Char(c));
        }
        input.push_text(TextInput::Submit);
    }
    app.update();
    assert_eq!(game_state(&app), GameState::Menu);
    assert_eq!(
        app.world().resource::<ArcadeGame>().0.user(),
        Some("PILOT")
    );
    assert!(dir.path().join("profiles.toml").exists());

    app.world_mut()
        .resource_mut::<ActionState>()
        .press(Action::MenuSelect);
    app.update();
    assert_eq!(game_state(&app), GameState::Playing);

    // Unconsumed edges do not leak into the next frame.
    app.world_mut().resource_mut::<ActionState>().press(Action::MenuDown);
    app.update();
    assert!(!app
        .world_mut()
        .resource_mut::<ActionState>()
        .consume(Action::MenuDown));

    for _ in 0..10 {
        app.update();
    }
    let game = &app.world().resource::<ArcadeGame>().0;
    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(game.session().map(|s| s.lives), Some(3));
}

#[test]
fn remembered_user_skips_name_entry_on_next_launch() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut app = headless_app(dir.path());
        {
            let mut input = app.world_mut().resource_mut::<ActionState>();
            for c in "ace".chars() {
                input.push_text(TextInput::Char(c));
            }
            input.push_text(TextInput::Submit);
        }
        app.update();
        assert_eq!(game_state(&app), GameState::Menu);
    }

    let mut app = headless_app(dir.path());
    app.update();
    assert_eq!(game_state(&app), GameState::Menu);
    assert_eq!(app.world().resource::<ArcadeGame>().0.user(), Some("ACE"));
}
