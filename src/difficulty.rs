//! Named difficulty presets.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                starting_asteroids: 3,
                asteroid_speed_multiplier: 0.8,
                saucer_spawn_multiplier: 1.5,
                saucer_accuracy: 0.6,
                starting_lives: 4,
                score_multiplier: 0.75,
            },
            Difficulty::Medium => DifficultyProfile {
                starting_asteroids: 4,
                asteroid_speed_multiplier: 1.0,
                saucer_spawn_multiplier: 1.0,
                saucer_accuracy: 0.8,
                starting_lives: 3,
                score_multiplier: 1.0,
            },
            Difficulty::Hard => DifficultyProfile {
                starting_asteroids: 5,
                asteroid_speed_multiplier: 1.2,
                saucer_spawn_multiplier: 0.7,
                saucer_accuracy: 0.95,
                starting_lives: 2,
                score_multiplier: 1.5,
            },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The multipliers and counts a preset applies to a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    pub starting_asteroids: u32,
    pub asteroid_speed_multiplier: f32,
    /// Scales the saucer spawn interval; below 1 means more saucers.
    pub saucer_spawn_multiplier: f32,
    /// 1.0 aims perfectly, 0.0 fires in any direction.
    pub saucer_accuracy: f32,
    pub starting_lives: u32,
    pub score_multiplier: f32,
}

impl DifficultyProfile {
    /// `round(base * score_multiplier)`.
    #[inline]
    pub fn scale_score(&self, base: u32) -> u32 {
        (base as f32 * self.score_multiplier).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harder_presets_are_harsher() {
        let easy = Difficulty::Easy.profile();
        let hard = Difficulty::Hard.profile();
        assert!(easy.starting_lives > hard.starting_lives);
        assert!(easy.starting_asteroids < hard.starting_asteroids);
        assert!(easy.saucer_accuracy < hard.saucer_accuracy);
    }

    #[test]
    fn score_scaling_rounds() {
        assert_eq!(Difficulty::Easy.profile().scale_score(50), 38);
        assert_eq!(Difficulty::Hard.profile().scale_score(20), 30);
        assert_eq!(Difficulty::Medium.profile().scale_score(200), 200);
    }
}
