//! Per-user high scores and achievement unlocks.
//!
//! The game talks to storage only through [`ProfileStore`].  Store methods
//! never fail from the caller's point of view: a missing profile reads as
//! empty, and a write that cannot be completed is logged and dropped so a
//! broken disk never interrupts play.
//!
//! On disk, [`TomlProfileStore`] keeps one TOML file per user in the save
//! directory plus a `profiles.toml` index remembering the last user:
//!
//! ```toml
//! # saves/ACE.toml
//! version = 1
//! achievements = ["LEVEL_3"]
//!
//! [[high_scores]]
//! name = "ACE"
//! score = 12340
//! ```

use crate::error::{ArcadeError, ArcadeResult};
use crate::high_scores::HighScoreEntry;
use bevy::log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

const PROFILE_VERSION: u32 = 1;
const INDEX_FILE: &str = "profiles.toml";

pub trait ProfileStore: Send + Sync {
    fn load_high_scores(&self, user: &str) -> Vec<HighScoreEntry>;
    fn save_high_scores(&mut self, user: &str, entries: &[HighScoreEntry]);
    fn load_achievements(&self, user: &str) -> BTreeSet<String>;
    fn save_achievements(&mut self, user: &str, unlocked: &BTreeSet<String>);
    fn reset_user_data(&mut self, user: &str);
    fn last_user(&self) -> Option<String>;
    fn remember_user(&mut self, user: &str);
}

/// Normalise a typed name into a storage key: trimmed, upper-cased, spaces
/// turned into underscores and anything outside `[A-Z0-9_-]` dropped.
pub fn user_key(name: &str) -> ArcadeResult<String> {
    let key: String = name
        .trim()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            c if c.is_ascii_alphanumeric() || c == '_' || c == '-' => Some(c.to_ascii_uppercase()),
            _ => None,
        })
        .collect();
    if key.is_empty() {
        Err(ArcadeError::UnknownUser)
    } else {
        Ok(key)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
struct UserProfile {
    version: u32,
    #[serde(default)]
    achievements: BTreeSet<String>,
    #[serde(default)]
    high_scores: Vec<HighScoreEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
struct ProfileIndex {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_user: Option<String>,
    #[serde(default)]
    users: BTreeSet<String>,
}

// ── TOML files ────────────────────────────────────────────────────────────────

pub struct TomlProfileStore {
    dir: PathBuf,
}

impl TomlProfileStore {
    /// Open the save directory, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> ArcadeResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| ArcadeError::Io {
            context: format!("creating save dir {}", dir.display()),
            source,
        })?;
        Ok(Self { dir })
    }

    /// File-backed store when the directory is usable, otherwise an in-memory
    /// store so the game still runs.
    pub fn open_or_memory(dir: &Path) -> Box<dyn ProfileStore> {
        match Self::new(dir) {
            Ok(store) => {
                info!("Profiles stored in {}", dir.display());
                Box::new(store)
            }
            Err(err) => {
                warn!("{err}; profiles will not be saved this run");
                Box::new(MemoryProfileStore::default())
            }
        }
    }

    fn profile_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.toml"))
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    fn read_profile(&self, user: &str) -> ArcadeResult<UserProfile> {
        let path = self.profile_path(&user_key(user)?);
        if !path.exists() {
            return Ok(UserProfile {
                version: PROFILE_VERSION,
                ..Default::default()
            });
        }
        let contents = fs::read_to_string(&path).map_err(|source| ArcadeError::Io {
            context: format!("reading {}", path.display()),
            source,
        })?;
        parse_profile_with_migration(&contents)
    }

    fn write_profile(&self, user: &str, profile: &UserProfile) -> ArcadeResult<()> {
        let path = self.profile_path(&user_key(user)?);
        write_toml(&path, profile)
    }

    fn read_index(&self) -> ArcadeResult<ProfileIndex> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(ProfileIndex::default());
        }
        let contents = fs::read_to_string(&path).map_err(|source| ArcadeError::Io {
            context: format!("reading {}", path.display()),
            source,
        })?;
        toml::from_str(&contents).map_err(|err| ArcadeError::Parse {
            context: path.display().to_string(),
            message: err.to_string(),
        })
    }

    /// Read-modify-write of one user's profile, logging any failure.
    fn update_profile(&self, user: &str, what: &str, apply: impl FnOnce(&mut UserProfile)) {
        let result = self.read_profile(user).and_then(|mut profile| {
            apply(&mut profile);
            profile.version = PROFILE_VERSION;
            self.write_profile(user, &profile)
        });
        if let Err(err) = result {
            error!("Failed to save {what} for {user}: {err}");
        }
    }
}

fn write_toml<T: Serialize>(path: &Path, value: &T) -> ArcadeResult<()> {
    let serialized = toml::to_string_pretty(value).map_err(|err| ArcadeError::Serialize {
        message: err.to_string(),
    })?;
    fs::write(path, serialized).map_err(|source| ArcadeError::Io {
        context: format!("writing {}", path.display()),
        source,
    })
}

fn parse_profile_with_migration(contents: &str) -> ArcadeResult<UserProfile> {
    let mut value: toml::Value = toml::from_str(contents).map_err(|err| ArcadeError::Parse {
        context: "profile".to_string(),
        message: err.to_string(),
    })?;
    migrate_profile_value(&mut value)?;
    value.try_into::<UserProfile>().map_err(|err| ArcadeError::Parse {
        context: "migrated profile".to_string(),
        message: err.to_string(),
    })
}

fn migrate_profile_value(value: &mut toml::Value) -> ArcadeResult<()> {
    let table = value.as_table_mut().ok_or_else(|| ArcadeError::Parse {
        context: "profile".to_string(),
        message: "root must be a TOML table".to_string(),
    })?;

    if !table.contains_key("version") {
        table.insert(
            "version".to_string(),
            toml::Value::Integer(PROFILE_VERSION as i64),
        );
    }

    let version = table.get("version").and_then(toml::Value::as_integer);
    if version != Some(PROFILE_VERSION as i64) {
        return Err(ArcadeError::Parse {
            context: "profile".to_string(),
            message: format!("unsupported version {version:?} (expected {PROFILE_VERSION})"),
        });
    }
    Ok(())
}

impl ProfileStore for TomlProfileStore {
    fn load_high_scores(&self, user: &str) -> Vec<HighScoreEntry> {
        match self.read_profile(user) {
            Ok(profile) => profile.high_scores,
            Err(err) => {
                warn!("Could not load high scores for {user}: {err}");
                Vec::new()
            }
        }
    }

    fn save_high_scores(&mut self, user: &str, entries: &[HighScoreEntry]) {
        self.update_profile(user, "high scores", |p| p.high_scores = entries.to_vec());
    }

    fn load_achievements(&self, user: &str) -> BTreeSet<String> {
        match self.read_profile(user) {
            Ok(profile) => profile.achievements,
            Err(err) => {
                warn!("Could not load achievements for {user}: {err}");
                BTreeSet::new()
            }
        }
    }

    fn save_achievements(&mut self, user: &str, unlocked: &BTreeSet<String>) {
        self.update_profile(user, "achievements", |p| p.achievements = unlocked.clone());
    }

    fn reset_user_data(&mut self, user: &str) {
        let Ok(key) = user_key(user) else {
            return;
        };
        let path = self.profile_path(&key);
        match fs::remove_file(&path) {
            Ok(()) => info!("Reset data for {user}"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => error!("Failed to reset data for {user}: {err}"),
        }
    }

    fn last_user(&self) -> Option<String> {
        match self.read_index() {
            Ok(index) => index.last_user,
            Err(err) => {
                warn!("Could not read profile index: {err}");
                None
            }
        }
    }

    fn remember_user(&mut self, user: &str) {
        let mut index = self.read_index().unwrap_or_else(|err| {
            warn!("Rebuilding profile index: {err}");
            ProfileIndex::default()
        });
        index.users.insert(user.to_string());
        index.last_user = Some(user.to_string());
        if let Err(err) = write_toml(&self.index_path(), &index) {
            error!("Failed to remember user {user}: {err}");
        }
    }
}

// ── In memory ─────────────────────────────────────────────────────────────────

/// Store that forgets everything on exit.  Used when the save directory is
/// unusable, and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryProfileStore {
    profiles: HashMap<String, (Vec<HighScoreEntry>, BTreeSet<String>)>,
    last_user: Option<String>,
}

impl ProfileStore for MemoryProfileStore {
    fn load_high_scores(&self, user: &str) -> Vec<HighScoreEntry> {
        self.profiles
            .get(user)
            .map(|(scores, _)| scores.clone())
            .unwrap_or_default()
    }

    fn save_high_scores(&mut self, user: &str, entries: &[HighScoreEntry]) {
        self.profiles.entry(user.to_string()).or_default().0 = entries.to_vec();
    }

    fn load_achievements(&self, user: &str) -> BTreeSet<String> {
        self.profiles
            .get(user)
            .map(|(_, ids)| ids.clone())
            .unwrap_or_default()
    }

    fn save_achievements(&mut self, user: &str, unlocked: &BTreeSet<String>) {
        self.profiles.entry(user.to_string()).or_default().1 = unlocked.clone();
    }

    fn reset_user_data(&mut self, user: &str) {
        self.profiles.remove(user);
    }

    fn last_user(&self) -> Option<String> {
        self.last_user.clone()
    }

    fn remember_user(&mut self, user: &str) {
        self.last_user = Some(user.to_string());
    }
}
