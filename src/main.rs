use asteroid_arcade::config::load_game_config;
use asteroid_arcade::plugin::ArcadePlugin;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use std::env;
use std::path::Path;

fn main() {
    // Loaded before the app is built: the window size comes from the playfield.
    let config = load_game_config(Path::new("assets/game.toml"));

    // Reproducible runs for debugging.
    let seed = env::var("ARCADE_SEED").ok().and_then(|s| s.parse::<u64>().ok());
    if let Some(seed) = seed {
        println!("Using fixed seed {seed}");
    }

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Asteroid Arcade".into(),
                resolution: WindowResolution::new(
                    config.playfield_width as u32,
                    config.playfield_height as u32,
                ),
                resizable: false,
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        .add_plugins(ArcadePlugin { config, seed })
        .run();
}
