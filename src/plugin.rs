//! Bevy wiring.
//!
//! [`ArcadeCorePlugin`] owns the [`Game`] resource and ticks it; it needs only
//! `MinimalPlugins`, so integration tests run it headless.  [`ArcadePlugin`]
//! layers keyboard input, gizmo drawing, the text HUD and audio on top.
//!
//! ## Frame order (`Update`)
//!
//! | Set                  | Systems                                            |
//! |----------------------|----------------------------------------------------|
//! | [`ArcadeSet::Input`]   | `keyboard_to_actions_system`, `text_entry_system`  |
//! | [`ArcadeSet::Tick`]    | `game_tick_system`, `end_input_frame_system`       |
//! | [`ArcadeSet::Present`] | gizmo drawing, HUD text, sound playback            |

use crate::audio::{load_sound_library_system, sound_playback_system, SoundQueue};
use crate::config::GameConfig;
use crate::game::Game;
use crate::hud::{hud_display_system, setup_camera, setup_hud};
use crate::input::{end_input_frame_system, keyboard_to_actions_system, text_entry_system, ActionState};
use crate::persistence::TomlProfileStore;
use crate::render::GizmoRenderer;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// The whole game as a resource.
#[derive(Resource)]
pub struct ArcadeGame(pub Game);

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArcadeSet {
    Input,
    Tick,
    Present,
}

/// Headless core: game resource, action state, sound queue and the tick.
pub struct ArcadeCorePlugin {
    pub config: GameConfig,
    /// Fixed seed for reproducible runs; entropy when `None`.
    pub seed: Option<u64>,
}

impl Plugin for ArcadeCorePlugin {
    fn build(&self, app: &mut App) {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let store = TomlProfileStore::open_or_memory(&self.config.save_dir);
        let game = Game::new(self.config.clone(), store, rng);

        app.insert_resource(self.config.clone())
            .insert_resource(ArcadeGame(game))
            .init_resource::<ActionState>()
            .init_resource::<SoundQueue>()
            .configure_sets(
                Update,
                (ArcadeSet::Input, ArcadeSet::Tick, ArcadeSet::Present).chain(),
            )
            .add_systems(
                Update,
                (game_tick_system, end_input_frame_system)
                    .chain()
                    .in_set(ArcadeSet::Tick),
            );
    }
}

/// Full windowed game.  Expects `DefaultPlugins`.
pub struct ArcadePlugin {
    pub config: GameConfig,
    pub seed: Option<u64>,
}

impl Plugin for ArcadePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(ArcadeCorePlugin {
            config: self.config.clone(),
            seed: self.seed,
        })
        .add_systems(
            Startup,
            (setup_camera, setup_hud, load_sound_library_system),
        )
        .add_systems(
            Update,
            (keyboard_to_actions_system, text_entry_system)
                .chain()
                .in_set(ArcadeSet::Input),
        )
        .add_systems(
            Update,
            (gizmo_render_system, hud_display_system, sound_playback_system).in_set(ArcadeSet::Present),
        );
    }
}

pub fn game_tick_system(
    time: Res<Time>,
    mut game: ResMut<ArcadeGame>,
    mut input: ResMut<ActionState>,
    mut sound: ResMut<SoundQueue>,
) {
    game.0.update(time.delta_secs(), &mut *input, &mut *sound);
}

pub fn gizmo_render_system(mut gizmos: Gizmos, game: Res<ArcadeGame>, config: Res<GameConfig>) {
    let mut renderer = GizmoRenderer::new(&mut gizmos, config.playfield());
    game.0.render(&mut renderer);
}
