//! Volume Profile Service (MEV/MAV/MRV).
//!
//! Tracks weekly set volume per muscle group against research-based
//! landmarks and recommends how to move it:
//! - MEV: minimum effective volume
//! - MAV: maximum adaptive volume, the productive target
//! - MRV: maximum recoverable volume, never exceeded on purpose
//!
//! Profiles start from per-level defaults and recalibrate from weekly
//! feedback.

use crate::schedule::ProgramLength;
use crate::{Goal, Level, PatternId};
use serde::{Deserialize, Serialize};

/// Muscle groups tracked by the volume profile
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Muscle {
    Chest,
    Back,
    Quads,
    Hamstrings,
    Shoulders,
    Biceps,
    Triceps,
    Core,
    Glutes,
    Calves,
}

impl Muscle {
    pub const ALL: [Muscle; 10] = [
        Muscle::Chest,
        Muscle::Back,
        Muscle::Quads,
        Muscle::Hamstrings,
        Muscle::Shoulders,
        Muscle::Biceps,
        Muscle::Triceps,
        Muscle::Core,
        Muscle::Glutes,
        Muscle::Calves,
    ];
}

/// Weekly set landmarks for one muscle
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VolumeLandmarks {
    pub mev: u32,
    pub mav: u32,
    pub mrv: u32,
}

const fn lm(mev: u32, mav: u32, mrv: u32) -> VolumeLandmarks {
    VolumeLandmarks { mev, mav, mrv }
}

/// Research defaults for a level and muscle
pub fn default_landmarks(level: Level, muscle: Muscle) -> VolumeLandmarks {
    use Muscle::*;
    match (level, muscle) {
        (Level::Beginner, Chest) => lm(6, 12, 16),
        (Level::Beginner, Back) => lm(8, 14, 18),
        (Level::Beginner, Quads) => lm(6, 12, 16),
        (Level::Beginner, Hamstrings) => lm(4, 10, 14),
        (Level::Beginner, Shoulders) => lm(6, 12, 16),
        (Level::Beginner, Biceps) => lm(4, 10, 14),
        (Level::Beginner, Triceps) => lm(4, 10, 12),
        (Level::Beginner, Core) => lm(0, 8, 12),
        (Level::Beginner, Glutes) => lm(0, 8, 12),
        (Level::Beginner, Calves) => lm(4, 8, 12),

        (Level::Intermediate, Chest) => lm(8, 16, 20),
        (Level::Intermediate, Back) => lm(10, 18, 22),
        (Level::Intermediate, Quads) => lm(8, 16, 22),
        (Level::Intermediate, Hamstrings) => lm(6, 12, 16),
        (Level::Intermediate, Shoulders) => lm(8, 16, 20),
        (Level::Intermediate, Biceps) => lm(6, 14, 18),
        (Level::Intermediate, Triceps) => lm(6, 12, 16),
        (Level::Intermediate, Core) => lm(0, 12, 16),
        (Level::Intermediate, Glutes) => lm(4, 12, 18),
        (Level::Intermediate, Calves) => lm(6, 12, 14),

        (Level::Advanced, Chest) => lm(10, 20, 24),
        (Level::Advanced, Back) => lm(12, 22, 26),
        (Level::Advanced, Quads) => lm(10, 20, 26),
        (Level::Advanced, Hamstrings) => lm(8, 16, 20),
        (Level::Advanced, Shoulders) => lm(10, 20, 24),
        (Level::Advanced, Biceps) => lm(8, 18, 22),
        (Level::Advanced, Triceps) => lm(8, 16, 20),
        (Level::Advanced, Core) => lm(4, 16, 20),
        (Level::Advanced, Glutes) => lm(6, 16, 22),
        (Level::Advanced, Calves) => lm(8, 14, 18),
    }
}

/// Muscles worked by a pattern, primary first
pub fn muscles_for(pattern: PatternId) -> &'static [Muscle] {
    use Muscle::*;
    match pattern {
        PatternId::HorizontalPush | PatternId::InclinePush | PatternId::Dip => {
            &[Chest, Triceps, Shoulders]
        }
        PatternId::VerticalPush => &[Shoulders, Triceps],
        PatternId::HorizontalPull | PatternId::VerticalPull | PatternId::ChinUp => &[Back, Biceps],
        PatternId::FacePull => &[Shoulders, Back],
        PatternId::Squat | PatternId::FrontSquat | PatternId::Lunge => &[Quads, Glutes],
        PatternId::HipHinge => &[Hamstrings, Glutes],
        PatternId::Plank | PatternId::LegRaise | PatternId::DeadBug | PatternId::BirdDog => &[Core],
    }
}

/// Primary muscle of a pattern
pub fn primary_muscle(pattern: PatternId) -> Muscle {
    muscles_for(pattern)[0]
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VolumeTrend {
    Increasing,
    Stable,
    Decreasing,
    NeedsDeload,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Where current volume sits relative to the landmarks
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VolumeZone {
    BelowMev,
    MevToMav,
    MavToMrv,
    AboveMrv,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VolumeAction {
    Increase,
    Maintain,
    Decrease,
    Deload,
}

/// Calibrated volume state for one muscle
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MuscleVolumeProfile {
    pub muscle: Muscle,
    pub landmarks: VolumeLandmarks,
    pub current_sets: u32,
    pub trend: VolumeTrend,
    pub avg_rpe: Option<f64>,
    pub confidence: Confidence,
    pub sessions_tracked: u32,
}

impl MuscleVolumeProfile {
    /// Fresh profile at the level defaults, starting at MEV
    pub fn new(muscle: Muscle, level: Level) -> Self {
        let landmarks = default_landmarks(level, muscle);
        Self {
            muscle,
            landmarks,
            current_sets: landmarks.mev,
            trend: VolumeTrend::Stable,
            avg_rpe: None,
            confidence: Confidence::Low,
            sessions_tracked: 0,
        }
    }

    pub fn zone(&self) -> VolumeZone {
        let VolumeLandmarks { mev, mav, mrv } = self.landmarks;
        match self.current_sets {
            s if s < mev => VolumeZone::BelowMev,
            s if s <= mav => VolumeZone::MevToMav,
            s if s <= mrv => VolumeZone::MavToMrv,
            _ => VolumeZone::AboveMrv,
        }
    }

    /// Recalibrate from one week of feedback
    pub fn record_week(&mut self, sets: u32, avg_rpe: f64) {
        let weeks = f64::from(self.sessions_tracked);
        let running = match self.avg_rpe {
            Some(prev) => (prev * weeks + avg_rpe) / (weeks + 1.0),
            None => avg_rpe,
        };

        self.trend = if running > 9.0 {
            VolumeTrend::NeedsDeload
        } else if sets > self.current_sets {
            VolumeTrend::Increasing
        } else if sets < self.current_sets {
            VolumeTrend::Decreasing
        } else {
            VolumeTrend::Stable
        };

        self.current_sets = sets;
        self.avg_rpe = Some(running);
        self.sessions_tracked += 1;
        self.confidence = match self.sessions_tracked {
            n if n < 4 => Confidence::Low,
            n if n < 12 => Confidence::Medium,
            _ => Confidence::High,
        };

        tracing::debug!(
            "Volume {:?}: {} sets, avg RPE {:.1}, trend {:?}",
            self.muscle,
            sets,
            running,
            self.trend
        );
    }
}

/// Volume profile across every tracked muscle
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VolumeProfile {
    pub level: Level,
    pub muscles: Vec<MuscleVolumeProfile>,
}

impl VolumeProfile {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            muscles: Muscle::ALL
                .iter()
                .map(|m| MuscleVolumeProfile::new(*m, level))
                .collect(),
        }
    }

    pub fn muscle_mut(&mut self, muscle: Muscle) -> Option<&mut MuscleVolumeProfile> {
        self.muscles.iter_mut().find(|m| m.muscle == muscle)
    }

    pub fn recommend_all(&self, goal: Goal) -> Vec<VolumeRecommendation> {
        self.muscles.iter().map(|m| recommend(m, goal)).collect()
    }
}

/// What to do with a muscle's weekly volume
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VolumeRecommendation {
    pub muscle: Muscle,
    pub recommended_sets: u32,
    pub zone: VolumeZone,
    pub action: VolumeAction,
    pub reason: String,
}

/// Weekly set increment for a goal while in the productive range
pub fn sets_per_week_increment(goal: Goal) -> u32 {
    match goal {
        Goal::MuscleGain => 2,
        _ => 1,
    }
}

/// Recommend next week's volume for one muscle
pub fn recommend(profile: &MuscleVolumeProfile, goal: Goal) -> VolumeRecommendation {
    let VolumeLandmarks { mev, mav, mrv } = profile.landmarks;
    let current = profile.current_sets;
    let deload = profile.trend == VolumeTrend::NeedsDeload;
    let zone = profile.zone();

    let (action, recommended, reason) = match zone {
        VolumeZone::BelowMev => {
            let target = (f64::from(mev) + f64::from(mav.saturating_sub(mev)) * 0.3).round() as u32;
            (
                VolumeAction::Increase,
                target,
                format!("Below MEV ({}/{}), raising to {} sets/week", current, mev, target),
            )
        }
        VolumeZone::MevToMav if deload => (
            VolumeAction::Deload,
            mev,
            format!("Deload needed, back to MEV ({} sets/week)", mev),
        ),
        VolumeZone::MevToMav => match profile.avg_rpe {
            Some(rpe) if rpe < 7.0 => (
                VolumeAction::Increase,
                (current + sets_per_week_increment(goal)).min(mav),
                format!("Low effort (RPE {:.1}), progressive increase", rpe),
            ),
            _ => (
                VolumeAction::Maintain,
                current,
                "Productive range, maintain".to_string(),
            ),
        },
        VolumeZone::MavToMrv if deload || profile.avg_rpe.is_some_and(|r| r > 8.5) => (
            VolumeAction::Decrease,
            mav,
            format!("High volume ({}) with high effort, back to MAV ({})", current, mav),
        ),
        VolumeZone::MavToMrv => (
            VolumeAction::Maintain,
            current,
            "Between MAV and MRV, watch effort closely".to_string(),
        ),
        VolumeZone::AboveMrv => (
            VolumeAction::Decrease,
            mav,
            format!("Above MRV ({}/{}), back to MAV ({})", current, mrv, mav),
        ),
    };

    VolumeRecommendation {
        muscle: profile.muscle,
        recommended_sets: recommended,
        zone,
        action,
        reason,
    }
}

/// Planned weekly sets for a week of the mesocycle
///
/// The deload week drops to MEV. Other weeks ramp linearly from 30% to 80%
/// of the MEV..MAV range, never above MRV.
pub fn mesocycle_volume(landmarks: &VolumeLandmarks, week_number: u32, length: &ProgramLength) -> u32 {
    let VolumeLandmarks { mev, mav, mrv } = *landmarks;
    if length.deload_week == Some(week_number) {
        return mev;
    }

    let training_weeks = if length.includes_deload {
        length.total_weeks.saturating_sub(1)
    } else {
        length.total_weeks
    };
    // Weeks after the deload shift down so the ramp stays contiguous
    let index = match length.deload_week {
        Some(d) if week_number > d => week_number - 2,
        _ => week_number.saturating_sub(1),
    };

    let fraction = f64::from(index) / f64::from(training_weeks.saturating_sub(1).max(1));
    let fraction = 0.3 + 0.5 * fraction.min(1.0);
    let volume = (f64::from(mev) + f64::from(mav.saturating_sub(mev)) * fraction).round() as u32;
    volume.min(mrv)
}

/// Sets per exercise for a weekly target, clamped to 2..=6
pub fn distribute_sets_per_session(weekly_sets: u32, sessions: u32, exercises_per_session: u32) -> u32 {
    if sessions == 0 {
        return 3;
    }
    let per_exercise =
        f64::from(weekly_sets) / f64::from(sessions) / f64::from(exercises_per_session.max(1));
    (per_exercise.round() as u32).clamp(2, 6)
}
