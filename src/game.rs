//! The game state machine.
//!
//! [`Game`] owns the active [`Session`], the current user's records and every
//! piece of menu state.  Each frame the host calls [`Game::update`] with an
//! [`InputSource`] and a [`SoundSink`], then [`Game::render`] and
//! [`Game::screen`] to draw.  Transitions happen only in response to consumed
//! input, except `Playing -> GameOver` when the last life is lost.

use crate::achievements::{AchievementTracker, ProgressSnapshot};
use crate::audio::{LoopCue, SoundCue, SoundSink};
use crate::config::GameConfig;
use crate::difficulty::Difficulty;
use crate::entity::Entity;
use crate::high_scores::HighScoreTable;
use crate::input::{Action, InputSource, TextInput};
use crate::persistence::{user_key, ProfileStore};
use crate::projectile::Owner;
use crate::render::{DrawRequest, Palette, Renderer, Shape};
use crate::session::{Session, SessionEvent, ShipControls};
use crate::ship::HyperspaceOutcome;
use bevy::log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    UserEntry,
    Menu,
    Playing,
    Paused,
    HighScores,
    Achievements,
    Help,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Start,
    Resume,
    HighScores,
    Achievements,
    Help,
    Difficulty(Difficulty),
    ChangeUser,
    ResetUserData,
}

impl MenuOption {
    pub fn label(self) -> &'static str {
        match self {
            MenuOption::Start => "Start",
            MenuOption::Resume => "Resume",
            MenuOption::HighScores => "High Scores",
            MenuOption::Achievements => "Achievements",
            MenuOption::Help => "Help",
            MenuOption::Difficulty(d) => d.label(),
            MenuOption::ChangeUser => "Change User",
            MenuOption::ResetUserData => "Reset User Data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOption {
    Resume,
    Restart,
    MainMenu,
}

impl PauseOption {
    pub const ALL: [PauseOption; 3] = [PauseOption::Resume, PauseOption::Restart, PauseOption::MainMenu];

    pub fn label(self) -> &'static str {
        match self {
            PauseOption::Resume => "Resume",
            PauseOption::Restart => "Restart",
            PauseOption::MainMenu => "Main Menu",
        }
    }
}

/// One line of overlay text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenLine {
    pub text: String,
    pub highlighted: bool,
}

impl ScreenLine {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlighted: false,
        }
    }

    fn marked(text: impl Into<String>, highlighted: bool) -> Self {
        Self {
            text: text.into(),
            highlighted,
        }
    }
}

/// Everything the HUD needs to draw text for the current frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView {
    pub state: GameState,
    /// Score / lives / level strip, shown while a session is on screen.
    pub hud: Option<String>,
    pub title: String,
    pub lines: Vec<ScreenLine>,
    pub notifications: Vec<String>,
    pub muted: bool,
}

const HELP_LINES: &[&str] = &[
    "Arrow keys / WASD: rotate and thrust",
    "Space: fire",
    "H: hyperspace (risky)",
    "P / Esc: pause",
    "M: mute",
    "Extra life every 10,000 points",
];

pub struct Game {
    config: GameConfig,
    state: GameState,
    store: Box<dyn ProfileStore>,
    rng: StdRng,
    session: Option<Session>,
    /// A session was left through the pause menu and can be resumed.
    paused_session: bool,
    difficulty: Difficulty,
    user: Option<String>,
    name_buffer: String,
    high_scores: HighScoreTable,
    achievements: AchievementTracker,
    menu_index: usize,
    pause_index: usize,
    muted: bool,
    thrust_loop: bool,
    hum_loop: bool,
    final_score: u32,
    final_rank: Option<usize>,
}

impl Game {
    /// Start in `Menu` with the remembered user, or in `UserEntry` when the
    /// store has none.
    pub fn new(config: GameConfig, store: Box<dyn ProfileStore>, rng: StdRng) -> Self {
        let max = config.max_high_scores;
        let mut game = Self {
            config,
            state: GameState::UserEntry,
            store,
            rng,
            session: None,
            paused_session: false,
            difficulty: Difficulty::default(),
            user: None,
            name_buffer: String::new(),
            high_scores: HighScoreTable::new(max),
            achievements: AchievementTracker::default(),
            menu_index: 0,
            pause_index: 0,
            muted: false,
            thrust_loop: false,
            hum_loop: false,
            final_score: 0,
            final_rank: None,
        };
        if let Some(user) = game.store.last_user() {
            game.submit_user_name(&user);
        }
        game
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn high_scores(&self) -> &HighScoreTable {
        &self.high_scores
    }

    pub fn achievements(&self) -> &AchievementTracker {
        &self.achievements
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn has_paused_session(&self) -> bool {
        self.paused_session
    }

    pub fn final_score(&self) -> u32 {
        self.final_score
    }

    pub fn menu_index(&self) -> usize {
        self.menu_index
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn menu_options(&self) -> Vec<MenuOption> {
        let mut options = vec![
            if self.paused_session {
                MenuOption::Resume
            } else {
                MenuOption::Start
            },
            MenuOption::HighScores,
            MenuOption::Achievements,
            MenuOption::Help,
        ];
        options.extend(Difficulty::ALL.iter().map(|&d| MenuOption::Difficulty(d)));
        options.push(MenuOption::ChangeUser);
        options.push(MenuOption::ResetUserData);
        options
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Confirm a typed user name.  Blank names (after sanitising) are
    /// ignored and return `false`.
    pub fn submit_user_name(&mut self, name: &str) -> bool {
        let Ok(user) = user_key(name) else {
            return false;
        };
        info!("User {user} signed in");
        self.store.remember_user(&user);
        self.high_scores =
            HighScoreTable::from_entries(self.store.load_high_scores(&user), self.config.max_high_scores);
        self.achievements = AchievementTracker::with_unlocked(self.store.load_achievements(&user));
        self.user = Some(user);
        self.name_buffer.clear();
        self.session = None;
        self.paused_session = false;
        self.menu_index = 0;
        self.state = GameState::Menu;
        true
    }

    /// Begin a fresh session on the selected difficulty.
    pub fn start_game(&mut self) {
        info!("Starting a {} game", self.difficulty);
        let seed = self.rng.gen::<u64>();
        self.session = Some(Session::start(
            self.config.clone(),
            self.difficulty,
            StdRng::seed_from_u64(seed),
        ));
        self.paused_session = false;
        self.pause_index = 0;
        self.final_rank = None;
        self.achievements.clear_notifications();
        self.state = GameState::Playing;
    }

    /// Advance one frame.  `delta` is clamped to the configured maximum step.
    pub fn update(&mut self, delta: f32, input: &mut dyn InputSource, sound: &mut dyn SoundSink) {
        let delta = delta.clamp(0.0, self.config.max_frame_delta);

        if self.state != GameState::UserEntry && input.consume(Action::ToggleMute) {
            self.toggle_mute(sound);
        }

        match self.state {
            GameState::UserEntry => self.update_user_entry(input),
            GameState::Menu => self.update_menu(input),
            GameState::Playing => self.update_playing(delta, input, sound),
            GameState::Paused => self.update_paused(input),
            GameState::HighScores | GameState::Achievements | GameState::Help => {
                if input.consume(Action::Escape) || input.consume(Action::MenuSelect) {
                    self.state = GameState::Menu;
                    self.menu_index = 0;
                }
            }
            GameState::GameOver => {
                if input.consume(Action::MenuSelect) || input.consume(Action::Escape) {
                    self.state = GameState::Menu;
                    self.menu_index = 0;
                }
            }
        }

        if self.state != GameState::Menu {
            self.achievements.tick_notifications(delta);
        }
        self.sync_loops(sound);
    }

    fn update_user_entry(&mut self, input: &mut dyn InputSource) {
        for key in input.drain_text() {
            match key {
                TextInput::Char(c) => {
                    let allowed = c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-');
                    if allowed && self.name_buffer.chars().count() < crate::constants::MAX_USER_NAME_LEN {
                        self.name_buffer.push(c);
                    }
                }
                TextInput::Backspace => {
                    self.name_buffer.pop();
                }
                TextInput::Submit => {
                    let name = self.name_buffer.clone();
                    if self.submit_user_name(&name) {
                        return;
                    }
                }
            }
        }
    }

    fn update_menu(&mut self, input: &mut dyn InputSource) {
        let options = self.menu_options();
        // The option list can change length (Start/Resume swap); keep the
        // cursor valid.
        if self.menu_index >= options.len() {
            self.menu_index = 0;
        }

        if input.consume(Action::MenuUp) {
            self.menu_index = (self.menu_index + options.len() - 1) % options.len();
        }
        if input.consume(Action::MenuDown) {
            self.menu_index = (self.menu_index + 1) % options.len();
        }
        if !input.consume(Action::MenuSelect) {
            return;
        }

        match options[self.menu_index] {
            MenuOption::Start => self.start_game(),
            MenuOption::Resume => {
                if self.session.is_some() {
                    self.state = GameState::Paused;
                    self.pause_index = 0;
                } else {
                    self.paused_session = false;
                }
            }
            MenuOption::HighScores => self.state = GameState::HighScores,
            MenuOption::Achievements => self.state = GameState::Achievements,
            MenuOption::Help => self.state = GameState::Help,
            MenuOption::Difficulty(d) => {
                info!("Difficulty set to {d}");
                self.difficulty = d;
            }
            MenuOption::ChangeUser => {
                self.user = None;
                self.name_buffer.clear();
                self.session = None;
                self.paused_session = false;
                self.state = GameState::UserEntry;
            }
            MenuOption::ResetUserData => {
                if let Some(user) = self.user.clone() {
                    warn!("Resetting all saved data for {user}");
                    self.store.reset_user_data(&user);
                    self.high_scores.clear();
                    self.achievements = AchievementTracker::default();
                }
            }
        }
    }

    fn update_paused(&mut self, input: &mut dyn InputSource) {
        if input.consume(Action::Pause) || input.consume(Action::Escape) {
            self.state = GameState::Playing;
            return;
        }
        let n = PauseOption::ALL.len();
        if input.consume(Action::MenuUp) {
            self.pause_index = (self.pause_index + n - 1) % n;
        }
        if input.consume(Action::MenuDown) {
            self.pause_index = (self.pause_index + 1) % n;
        }
        if !input.consume(Action::MenuSelect) {
            return;
        }
        match PauseOption::ALL[self.pause_index.min(n - 1)] {
            PauseOption::Resume => self.state = GameState::Playing,
            PauseOption::Restart => self.start_game(),
            PauseOption::MainMenu => {
                self.paused_session = self.session.is_some();
                self.menu_index = 0;
                self.state = GameState::Menu;
            }
        }
    }

    fn update_playing(&mut self, delta: f32, input: &mut dyn InputSource, sound: &mut dyn SoundSink) {
        if input.consume(Action::Pause) || input.consume(Action::Escape) {
            self.state = GameState::Paused;
            self.pause_index = 0;
            return;
        }
        let Some(session) = self.session.as_mut() else {
            self.state = GameState::Menu;
            return;
        };

        let turn = f32::from(u8::from(input.is_held(Action::RotateRight)))
            - f32::from(u8::from(input.is_held(Action::RotateLeft)));
        let controls = ShipControls {
            turn,
            thrust: input.is_held(Action::Thrust),
            fire: input.is_held(Action::Fire),
            hyperspace: input.consume(Action::Hyperspace),
        };
        let events = session.tick(delta, &controls);
        let snapshot = ProgressSnapshot {
            score: session.score,
            level: session.level,
            stats: session.stats,
        };
        let over = session.is_over();

        for event in &events {
            if let Some(cue) = event_cue(event) {
                self.emit(sound, cue);
            }
        }
        if events.iter().any(SessionEvent::affects_progress) {
            self.evaluate_achievements(&snapshot, sound);
        }
        if over {
            self.finish_game(snapshot.score);
        }
    }

    fn evaluate_achievements(&mut self, snapshot: &ProgressSnapshot, sound: &mut dyn SoundSink) {
        let Some(user) = self.user.clone() else {
            return;
        };
        let fresh = self
            .achievements
            .evaluate(snapshot, self.config.notification_duration);
        if fresh.is_empty() {
            return;
        }
        for achievement in &fresh {
            info!("Achievement unlocked for {user}: {}", achievement.name);
            self.emit(sound, SoundCue::AchievementUnlocked);
        }
        self.store
            .save_achievements(&user, self.achievements.unlocked_ids());
    }

    fn finish_game(&mut self, score: u32) {
        self.final_score = score;
        self.final_rank = None;
        self.paused_session = false;
        self.session = None;
        self.state = GameState::GameOver;
        if let Some(user) = self.user.clone() {
            self.final_rank = self.high_scores.insert(user.clone(), score);
            if let Some(rank) = self.final_rank {
                info!("New high score for {user}: {score} at #{}", rank + 1);
                self.store.save_high_scores(&user, self.high_scores.entries());
            }
        }
    }

    // ── Audio ─────────────────────────────────────────────────────────────────

    fn emit(&self, sound: &mut dyn SoundSink, cue: SoundCue) {
        if !self.muted {
            sound.play(cue);
        }
    }

    fn toggle_mute(&mut self, sound: &mut dyn SoundSink) {
        self.muted = !self.muted;
        info!("Sound {}", if self.muted { "muted" } else { "on" });
        if self.muted {
            self.set_loop(sound, LoopCue::Thrust, false);
            self.set_loop(sound, LoopCue::SaucerHum, false);
        }
    }

    /// Loops run only while playing, unmuted, and something makes the noise.
    fn sync_loops(&mut self, sound: &mut dyn SoundSink) {
        let live = !self.muted && self.state == GameState::Playing;
        let session = self.session.as_ref().filter(|_| live);
        let thrusting = session
            .and_then(|s| s.live_ship())
            .is_some_and(|ship| ship.is_thrusting());
        let saucer_present = session.is_some_and(|s| !s.saucers.is_empty());
        self.set_loop(sound, LoopCue::Thrust, thrusting);
        self.set_loop(sound, LoopCue::SaucerHum, saucer_present);
    }

    fn set_loop(&mut self, sound: &mut dyn SoundSink, cue: LoopCue, on: bool) {
        let flag = match cue {
            LoopCue::Thrust => &mut self.thrust_loop,
            LoopCue::SaucerHum => &mut self.hum_loop,
        };
        if *flag == on {
            return;
        }
        *flag = on;
        if on {
            sound.start_loop(cue);
        } else {
            sound.stop_loop(cue);
        }
    }

    // ── Output ────────────────────────────────────────────────────────────────

    /// Emit draw requests for every visible entity.  Only `Playing` and
    /// (dimmed) `Paused` draw the playfield.
    pub fn render(&self, renderer: &mut dyn Renderer) {
        let dimmed = match self.state {
            GameState::Playing => false,
            GameState::Paused => true,
            _ => return,
        };
        let Some(session) = self.session.as_ref() else {
            return;
        };

        for asteroid in session.asteroids.iter().filter(|a| a.is_alive()) {
            renderer.draw(&DrawRequest {
                shape: Shape::Polygon(asteroid.outline()),
                position: asteroid.position(),
                rotation: asteroid.body().rotation,
                palette: Palette::Rock,
                dimmed,
            });
        }
        for saucer in session.saucers.iter().filter(|s| s.is_alive()) {
            renderer.draw(&DrawRequest {
                shape: Shape::Saucer {
                    radius: saucer.body().radius,
                },
                position: saucer.position(),
                rotation: 0.0,
                palette: Palette::Enemy,
                dimmed,
            });
        }
        for bullet in session.projectiles.iter().filter(|p| p.is_alive()) {
            renderer.draw(&DrawRequest {
                shape: Shape::Bullet {
                    radius: bullet.body().radius,
                },
                position: bullet.position(),
                rotation: 0.0,
                palette: match bullet.owner {
                    Owner::Player => Palette::Player,
                    Owner::Enemy => Palette::Enemy,
                },
                dimmed,
            });
        }
        if let Some(ship) = session.live_ship().filter(|s| s.is_visible()) {
            renderer.draw(&DrawRequest {
                shape: Shape::Ship {
                    radius: ship.body().radius,
                    thrusting: ship.is_thrusting(),
                },
                position: ship.position(),
                rotation: ship.body().rotation,
                palette: Palette::Player,
                dimmed,
            });
        }
    }

    /// Text content for the current frame.
    pub fn screen(&self) -> ScreenView {
        let hud = self.session.as_ref().and_then(|s| {
            matches!(self.state, GameState::Playing | GameState::Paused).then(|| {
                format!(
                    "SCORE {}   LIVES {}   LEVEL {}   {}   {}",
                    s.score,
                    s.lives,
                    s.level,
                    s.difficulty.label().to_uppercase(),
                    self.user.as_deref().unwrap_or("-"),
                )
            })
        });

        let (title, lines) = match self.state {
            GameState::UserEntry => (
                "ENTER YOUR NAME".to_string(),
                vec![
                    ScreenLine::marked(format!("{}_", self.name_buffer), true),
                    ScreenLine::plain("Press Enter to confirm"),
                ],
            ),
            GameState::Menu => {
                let lines = self
                    .menu_options()
                    .into_iter()
                    .enumerate()
                    .map(|(i, option)| {
                        let mut text = option.label().to_string();
                        if option == MenuOption::Difficulty(self.difficulty) {
                            text.push_str(" *");
                        }
                        ScreenLine::marked(text, i == self.menu_index)
                    })
                    .collect();
                ("ASTEROIDS".to_string(), lines)
            }
            GameState::Playing => (String::new(), Vec::new()),
            GameState::Paused => (
                "PAUSED".to_string(),
                PauseOption::ALL
                    .iter()
                    .enumerate()
                    .map(|(i, o)| ScreenLine::marked(o.label(), i == self.pause_index))
                    .collect(),
            ),
            GameState::HighScores => {
                let mut lines: Vec<ScreenLine> = self
                    .high_scores
                    .entries()
                    .iter()
                    .enumerate()
                    .map(|(i, e)| ScreenLine::plain(format!("{:>2}. {:<12} {:>7}", i + 1, e.name, e.score)))
                    .collect();
                if lines.is_empty() {
                    lines.push(ScreenLine::plain("No scores yet"));
                }
                ("HIGH SCORES".to_string(), lines)
            }
            GameState::Achievements => (
                "ACHIEVEMENTS".to_string(),
                self.achievements
                    .statuses()
                    .iter()
                    .map(|s| {
                        let mark = if s.unlocked { "[x]" } else { "[ ]" };
                        ScreenLine::marked(
                            format!("{mark} {} - {}", s.achievement.name, s.achievement.description),
                            s.unlocked,
                        )
                    })
                    .collect(),
            ),
            GameState::Help => (
                "HELP".to_string(),
                HELP_LINES.iter().map(|l| ScreenLine::plain(*l)).collect(),
            ),
            GameState::GameOver => {
                let mut lines = vec![ScreenLine::plain(format!("Final score: {}", self.final_score))];
                if let Some(rank) = self.final_rank {
                    lines.push(ScreenLine::marked(format!("New high score! Rank #{}", rank + 1), true));
                }
                lines.push(ScreenLine::plain("Press Enter for the menu"));
                ("GAME OVER".to_string(), lines)
            }
        };

        ScreenView {
            state: self.state,
            hud,
            title,
            lines,
            notifications: self
                .achievements
                .active_notifications()
                .iter()
                .map(|a| format!("Achievement unlocked: {}", a.name))
                .collect(),
            muted: self.muted,
        }
    }
}

fn event_cue(event: &SessionEvent) -> Option<SoundCue> {
    match *event {
        SessionEvent::PlayerFired => Some(SoundCue::PlayerShoot),
        SessionEvent::SaucerFired => Some(SoundCue::SaucerShoot),
        SessionEvent::AsteroidDestroyed { tier, .. } => Some(SoundCue::AsteroidExplode(tier)),
        SessionEvent::SaucerDestroyed { .. } => Some(SoundCue::SaucerExplode),
        SessionEvent::PlayerDestroyed { .. } => Some(SoundCue::PlayerExplode),
        SessionEvent::ExtraLife { .. } => Some(SoundCue::ExtraLife),
        SessionEvent::Hyperspace(HyperspaceOutcome::Jumped) => Some(SoundCue::Hyperspace),
        SessionEvent::Hyperspace(_)
        | SessionEvent::SaucerSpawned
        | SessionEvent::LevelStarted(_)
        | SessionEvent::GameOver { .. } => None,
    }
}
