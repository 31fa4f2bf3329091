//! Achievement definitions and unlock tracking.

use crate::session::SessionStats;
use std::collections::BTreeSet;

/// Which session counter a [`Condition::Stat`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStat {
    AsteroidsDestroyed,
    SaucersDestroyed,
}

impl SessionStat {
    pub fn read(self, stats: &SessionStats) -> u32 {
        match self {
            SessionStat::AsteroidsDestroyed => stats.asteroids_destroyed,
            SessionStat::SaucersDestroyed => stats.saucers_destroyed,
        }
    }
}

/// Unlock rule.  Every rule is a threshold reached with `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Score(u32),
    Level(u32),
    Stat(SessionStat, u32),
}

impl Condition {
    pub fn is_met(&self, snapshot: &ProgressSnapshot) -> bool {
        match *self {
            Condition::Score(threshold) => snapshot.score >= threshold,
            Condition::Level(threshold) => snapshot.level >= threshold,
            Condition::Stat(stat, threshold) => stat.read(&snapshot.stats) >= threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub condition: Condition,
}

pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "SCORE_10K",
        name: "Score Milestone I",
        description: "Achieve a score of 10,000 points.",
        condition: Condition::Score(10_000),
    },
    Achievement {
        id: "SCORE_50K",
        name: "Score Milestone II",
        description: "Achieve a score of 50,000 points.",
        condition: Condition::Score(50_000),
    },
    Achievement {
        id: "LEVEL_3",
        name: "Getting Started",
        description: "Reach Level 3.",
        condition: Condition::Level(3),
    },
    Achievement {
        id: "LEVEL_10",
        name: "Veteran Pilot",
        description: "Reach Level 10.",
        condition: Condition::Level(10),
    },
    Achievement {
        id: "ASTEROIDS_50",
        name: "Rock Breaker",
        description: "Destroy 50 asteroids in one game.",
        condition: Condition::Stat(SessionStat::AsteroidsDestroyed, 50),
    },
    Achievement {
        id: "ASTEROIDS_250",
        name: "Pebble Pusher",
        description: "Destroy 250 asteroids in one game.",
        condition: Condition::Stat(SessionStat::AsteroidsDestroyed, 250),
    },
    Achievement {
        id: "UFO_DESTROY_1",
        name: "Saucer Slayer",
        description: "Destroy your first saucer.",
        condition: Condition::Stat(SessionStat::SaucersDestroyed, 1),
    },
    Achievement {
        id: "UFO_DESTROY_10",
        name: "Alien Hunter",
        description: "Destroy 10 saucers in one game.",
        condition: Condition::Stat(SessionStat::SaucersDestroyed, 10),
    },
];

/// What the evaluator sees of the running game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub score: u32,
    pub level: u32,
    pub stats: SessionStats,
}

/// A definition paired with the current user's unlock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementStatus {
    pub achievement: &'static Achievement,
    pub unlocked: bool,
}

/// Unlocked ids for the current user plus the on-screen notification queue.
#[derive(Debug, Default)]
pub struct AchievementTracker {
    unlocked: BTreeSet<String>,
    recent: Vec<&'static Achievement>,
    notification_timer: f32,
}

impl AchievementTracker {
    pub fn with_unlocked(unlocked: BTreeSet<String>) -> Self {
        Self {
            unlocked,
            ..Default::default()
        }
    }

    pub fn unlocked_ids(&self) -> &BTreeSet<String> {
        &self.unlocked
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    /// Unlock every still-locked definition whose condition holds.  Each new
    /// unlock joins the notification queue and restarts the display timer.
    pub fn evaluate(&mut self, snapshot: &ProgressSnapshot, display_for: f32) -> Vec<&'static Achievement> {
        let fresh: Vec<&'static Achievement> = ACHIEVEMENTS
            .iter()
            .filter(|a| !self.unlocked.contains(a.id) && a.condition.is_met(snapshot))
            .collect();
        for &achievement in &fresh {
            self.unlocked.insert(achievement.id.to_string());
            self.recent.push(achievement);
            self.notification_timer = display_for;
        }
        fresh
    }

    /// Count down the notification display; the queue clears when it expires.
    pub fn tick_notifications(&mut self, delta: f32) {
        if self.notification_timer > 0.0 {
            self.notification_timer -= delta;
            if self.notification_timer <= 0.0 {
                self.recent.clear();
            }
        }
    }

    pub fn active_notifications(&self) -> &[&'static Achievement] {
        if self.notification_timer > 0.0 {
            &self.recent
        } else {
            &[]
        }
    }

    pub fn clear_notifications(&mut self) {
        self.recent.clear();
        self.notification_timer = 0.0;
    }

    /// Every definition with its unlock state, sorted by display name.
    pub fn statuses(&self) -> Vec<AchievementStatus> {
        let mut out: Vec<AchievementStatus> = ACHIEVEMENTS
            .iter()
            .map(|a| AchievementStatus {
                achievement: a,
                unlocked: self.is_unlocked(a.id),
            })
            .collect();
        out.sort_by(|a, b| a.achievement.name.cmp(b.achievement.name));
        out
    }
}
