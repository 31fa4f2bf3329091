//! Sound cues and their Bevy playback.
//!
//! The game emits cues into a [`SoundSink`].  In the app that sink is the
//! [`SoundQueue`] resource, drained each frame by [`sound_playback_system`].
//! A cue whose asset is missing or still loading is dropped without error.

use crate::asteroid::AsteroidTier;
use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    PlayerShoot,
    PlayerExplode,
    AsteroidExplode(AsteroidTier),
    SaucerShoot,
    SaucerExplode,
    ExtraLife,
    Hyperspace,
    AchievementUnlocked,
}

impl SoundCue {
    pub const ALL: [SoundCue; 10] = [
        SoundCue::PlayerShoot,
        SoundCue::PlayerExplode,
        SoundCue::AsteroidExplode(AsteroidTier::Large),
        SoundCue::AsteroidExplode(AsteroidTier::Medium),
        SoundCue::AsteroidExplode(AsteroidTier::Small),
        SoundCue::SaucerShoot,
        SoundCue::SaucerExplode,
        SoundCue::ExtraLife,
        SoundCue::Hyperspace,
        SoundCue::AchievementUnlocked,
    ];

    pub fn asset_path(self) -> &'static str {
        match self {
            SoundCue::PlayerShoot => "audio/player_shoot.ogg",
            SoundCue::PlayerExplode => "audio/player_explode.ogg",
            SoundCue::AsteroidExplode(AsteroidTier::Large) => "audio/asteroid_explode_large.ogg",
            SoundCue::AsteroidExplode(AsteroidTier::Medium) => "audio/asteroid_explode_medium.ogg",
            SoundCue::AsteroidExplode(AsteroidTier::Small) => "audio/asteroid_explode_small.ogg",
            SoundCue::SaucerShoot => "audio/saucer_shoot.ogg",
            SoundCue::SaucerExplode => "audio/saucer_explode.ogg",
            SoundCue::ExtraLife => "audio/extra_life.ogg",
            SoundCue::Hyperspace => "audio/hyperspace.ogg",
            SoundCue::AchievementUnlocked => "audio/achievement.ogg",
        }
    }
}

/// Continuous effects that play until stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopCue {
    Thrust,
    SaucerHum,
}

impl LoopCue {
    pub const ALL: [LoopCue; 2] = [LoopCue::Thrust, LoopCue::SaucerHum];

    pub fn asset_path(self) -> &'static str {
        match self {
            LoopCue::Thrust => "audio/player_thrust.ogg",
            LoopCue::SaucerHum => "audio/saucer_hum.ogg",
        }
    }
}

/// Fire-and-forget audio output.  Implementations swallow every failure.
pub trait SoundSink {
    fn play(&mut self, cue: SoundCue);
    /// Idempotent: starting a loop that is already playing does nothing.
    fn start_loop(&mut self, cue: LoopCue);
    fn stop_loop(&mut self, cue: LoopCue);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCommand {
    Play(SoundCue),
    StartLoop(LoopCue),
    StopLoop(LoopCue),
}

/// Commands recorded during the frame, played back afterwards.
#[derive(Resource, Debug, Default)]
pub struct SoundQueue {
    commands: Vec<SoundCommand>,
}

impl SoundQueue {
    pub fn commands(&self) -> &[SoundCommand] {
        &self.commands
    }

    pub fn drain(&mut self) -> Vec<SoundCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl SoundSink for SoundQueue {
    fn play(&mut self, cue: SoundCue) {
        self.commands.push(SoundCommand::Play(cue));
    }

    fn start_loop(&mut self, cue: LoopCue) {
        self.commands.push(SoundCommand::StartLoop(cue));
    }

    fn stop_loop(&mut self, cue: LoopCue) {
        self.commands.push(SoundCommand::StopLoop(cue));
    }
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl SoundSink for SilentSink {
    fn play(&mut self, _cue: SoundCue) {}
    fn start_loop(&mut self, _cue: LoopCue) {}
    fn stop_loop(&mut self, _cue: LoopCue) {}
}

// ── Bevy playback ─────────────────────────────────────────────────────────────

#[derive(Resource, Debug, Default)]
pub struct SoundLibrary {
    one_shots: HashMap<SoundCue, Handle<AudioSource>>,
    loops: HashMap<LoopCue, Handle<AudioSource>>,
}

/// Marks the entity playing a loop so it can be found and stopped.
#[derive(Component, Debug, Clone, Copy)]
pub struct LoopingSound(pub LoopCue);

/// Kick off loading every sound.  Loading is asynchronous; playback checks
/// readiness per cue.
pub fn load_sound_library_system(mut commands: Commands, asset_server: Res<AssetServer>) {
    let one_shots = SoundCue::ALL
        .iter()
        .map(|&cue| (cue, asset_server.load(cue.asset_path())))
        .collect();
    let loops = LoopCue::ALL
        .iter()
        .map(|&cue| (cue, asset_server.load(cue.asset_path())))
        .collect();
    commands.insert_resource(SoundLibrary { one_shots, loops });
}

fn ready<'a>(handle: Option<&'a Handle<AudioSource>>, server: &AssetServer) -> Option<&'a Handle<AudioSource>> {
    handle.filter(|h| server.is_loaded_with_dependencies(h.id()))
}

pub fn sound_playback_system(
    mut commands: Commands,
    mut queue: ResMut<SoundQueue>,
    library: Option<Res<SoundLibrary>>,
    asset_server: Option<Res<AssetServer>>,
    playing: Query<(Entity, &LoopingSound)>,
) {
    let pending = queue.drain();
    let (Some(library), Some(server)) = (library, asset_server) else {
        return;
    };

    let mut started: HashSet<LoopCue> = playing.iter().map(|(_, l)| l.0).collect();
    let mut stopped: HashSet<LoopCue> = HashSet::new();

    for command in pending {
        match command {
            SoundCommand::Play(cue) => {
                if let Some(handle) = ready(library.one_shots.get(&cue), &server) {
                    commands.spawn((AudioPlayer::new(handle.clone()), PlaybackSettings::DESPAWN));
                }
            }
            SoundCommand::StartLoop(cue) => {
                if started.contains(&cue) && !stopped.contains(&cue) {
                    continue;
                }
                if let Some(handle) = ready(library.loops.get(&cue), &server) {
                    commands.spawn((
                        AudioPlayer::new(handle.clone()),
                        PlaybackSettings::LOOP,
                        LoopingSound(cue),
                    ));
                    started.insert(cue);
                    stopped.remove(&cue);
                }
            }
            SoundCommand::StopLoop(cue) => {
                if !started.contains(&cue) || stopped.contains(&cue) {
                    continue;
                }
                for (entity, looping) in &playing {
                    if looping.0 == cue {
                        commands.entity(entity).despawn();
                    }
                }
                stopped.insert(cue);
                started.remove(&cue);
            }
        }
    }
}
