//! Tempo modifiers used to make an exercise harder without changing it.
//!
//! A tempo is written eccentric-pause-concentric-pause in seconds
//! (`4-0-1-0` is four seconds down, no pause, one second up).

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TempoId {
    Standard,
    SlowEccentric,
    SlowBoth,
    PauseBottom,
    SlowEccentricPause,
    SuperSlow,
}

impl FromStr for TempoId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase();
        TEMPO_LADDER
            .iter()
            .find(|t| {
                t.to_string() == key || t.name.to_lowercase() == key || t.id.as_str() == key
            })
            .map(|t| t.id)
            .ok_or_else(|| Error::InvalidInput(format!("unknown tempo '{}'", s)))
    }
}

impl TempoId {
    pub fn as_str(&self) -> &'static str {
        match self {
            TempoId::Standard => "standard",
            TempoId::SlowEccentric => "slow_eccentric",
            TempoId::SlowBoth => "slow_both",
            TempoId::PauseBottom => "pause_bottom",
            TempoId::SlowEccentricPause => "slow_eccentric_pause",
            TempoId::SuperSlow => "super_slow",
        }
    }
}

/// One step on the tempo ladder
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TempoModifier {
    pub id: TempoId,
    pub name: &'static str,
    pub eccentric: u32,
    pub pause_bottom: u32,
    pub concentric: u32,
    pub pause_top: u32,
    /// Difficulty added over standard tempo, in percent
    pub difficulty_increase_percent: u32,
    pub description: &'static str,
}

const fn tempo(
    id: TempoId,
    name: &'static str,
    phases: [u32; 4],
    difficulty_increase_percent: u32,
    description: &'static str,
) -> TempoModifier {
    TempoModifier {
        id,
        name,
        eccentric: phases[0],
        pause_bottom: phases[1],
        concentric: phases[2],
        pause_top: phases[3],
        difficulty_increase_percent,
        description,
    }
}

/// Ordered easiest to hardest
pub const TEMPO_LADDER: [TempoModifier; 6] = [
    tempo(TempoId::Standard, "Standard", [2, 0, 1, 0], 0, "Normal controlled tempo"),
    tempo(TempoId::SlowEccentric, "Slow Eccentric", [4, 0, 1, 0], 15, "4 seconds down"),
    tempo(TempoId::SlowBoth, "Slow Tempo", [3, 0, 2, 0], 20, "3 seconds down, 2 seconds up"),
    tempo(TempoId::PauseBottom, "Paused", [2, 2, 1, 0], 25, "2 second pause at bottom"),
    tempo(
        TempoId::SlowEccentricPause,
        "Slow Eccentric + Pause",
        [4, 1, 1, 0],
        30,
        "4 seconds down, 1 second pause",
    ),
    tempo(TempoId::SuperSlow, "Super Slow", [4, 2, 3, 0], 40, "4 seconds down, 2 pause, 3 up"),
];

impl TempoModifier {
    pub fn get(id: TempoId) -> &'static TempoModifier {
        let idx = TEMPO_LADDER.iter().position(|t| t.id == id).unwrap_or(0);
        &TEMPO_LADDER[idx]
    }

    /// Seconds under tension for one rep
    pub fn time_under_tension(&self) -> u32 {
        self.eccentric + self.pause_bottom + self.concentric + self.pause_top
    }

    /// Human-readable phases, skipping zero-length ones
    pub fn describe_phases(&self) -> String {
        let phases = [
            (self.eccentric, "down"),
            (self.pause_bottom, "pause"),
            (self.concentric, "up"),
            (self.pause_top, "pause at top"),
        ];
        phases
            .iter()
            .filter(|(secs, _)| *secs > 0)
            .map(|(secs, label)| format!("{}s {}", secs, label))
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl fmt::Display for TempoModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.eccentric, self.pause_bottom, self.concentric, self.pause_top
        )
    }
}

/// Next harder tempo, `None` at the top of the ladder
pub fn next_harder(current: TempoId) -> Option<&'static TempoModifier> {
    let idx = TEMPO_LADDER.iter().position(|t| t.id == current)?;
    TEMPO_LADDER.get(idx + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladder_is_ordered_by_difficulty() {
        for pair in TEMPO_LADDER.windows(2) {
            assert!(pair[0].difficulty_increase_percent < pair[1].difficulty_increase_percent);
        }
    }

    #[test]
    fn test_next_harder_walks_the_ladder() {
        assert_eq!(next_harder(TempoId::Standard).unwrap().id, TempoId::SlowEccentric);
        assert_eq!(next_harder(TempoId::PauseBottom).unwrap().id, TempoId::SlowEccentricPause);
        assert!(next_harder(TempoId::SuperSlow).is_none());
    }

    #[test]
    fn test_tempo_display_and_tut() {
        let slow = TempoModifier::get(TempoId::SuperSlow);
        assert_eq!(slow.to_string(), "4-2-3-0");
        assert_eq!(slow.time_under_tension(), 9);
        assert_eq!(slow.describe_phases(), "4s down -> 2s pause -> 3s up");
    }

    #[test]
    fn test_tempo_from_str() {
        assert_eq!("paused".parse::<TempoId>().unwrap(), TempoId::PauseBottom);
        assert_eq!("4-0-1-0".parse::<TempoId>().unwrap(), TempoId::SlowEccentric);
        assert_eq!("super_slow".parse::<TempoId>().unwrap(), TempoId::SuperSlow);
        assert!("glacial".parse::<TempoId>().is_err());
    }
}
