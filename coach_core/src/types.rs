//! Core domain types for the adaptive training-program engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Goals, experience levels and training context
//! - Movement patterns and body areas
//! - Rep prescriptions and runtime exercises
//! - Program input and output shapes
//! - Runtime session reports (discomfort, set feedback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Goal and Level
// ============================================================================

/// Training goal chosen during onboarding
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Strength,
    #[serde(alias = "hypertrophy")]
    MuscleGain,
    Toning,
    #[serde(alias = "weight_loss")]
    FatLoss,
    Performance,
    #[serde(alias = "rehabilitation")]
    MotorRecovery,
}

impl Goal {
    pub const ALL: [Goal; 6] = [
        Goal::Strength,
        Goal::MuscleGain,
        Goal::Toning,
        Goal::FatLoss,
        Goal::Performance,
        Goal::MotorRecovery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Strength => "strength",
            Goal::MuscleGain => "muscle_gain",
            Goal::Toning => "toning",
            Goal::FatLoss => "fat_loss",
            Goal::Performance => "performance",
            Goal::MotorRecovery => "motor_recovery",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Goal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "strength" => Ok(Goal::Strength),
            "muscle_gain" | "hypertrophy" => Ok(Goal::MuscleGain),
            "toning" => Ok(Goal::Toning),
            "fat_loss" | "weight_loss" => Ok(Goal::FatLoss),
            "performance" => Ok(Goal::Performance),
            "motor_recovery" | "rehabilitation" => Ok(Goal::MotorRecovery),
            other => Err(Error::InvalidInput(format!("unknown goal '{}'", other))),
        }
    }
}

/// Self-reported experience level
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    /// Numeric mapping used to pick a variant from a non-strength ladder
    pub fn numeric(&self) -> u32 {
        match self {
            Level::Beginner => 1,
            Level::Intermediate => 2,
            Level::Advanced => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            other => Err(Error::InvalidInput(format!("unknown level '{}'", other))),
        }
    }
}

// ============================================================================
// Training Context
// ============================================================================

/// Where the user trains
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Gym,
    Home,
    Mixed,
}

/// A loadable implement a home-equipment variant may require
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Implement {
    Barbell,
    Dumbbell,
    Kettlebell,
}

/// Barbell load assumed available when a home barbell is present
pub const HOME_BARBELL_ASSUMED_KG: f64 = 100.0;

/// Equipment reported by the user for home training
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Equipment {
    #[serde(default)]
    pub barbell: bool,

    #[serde(default)]
    pub dumbbell_max_kg: f64,

    #[serde(default)]
    pub kettlebell_kg: Vec<f64>,
}

impl Equipment {
    /// True if at least one loadable implement is present
    pub fn has_usable_equipment(&self) -> bool {
        self.barbell || self.dumbbell_max_kg > 0.0 || !self.kettlebell_kg.is_empty()
    }

    /// Heaviest load available for an implement, if the implement is present
    pub fn max_load(&self, implement: Implement) -> Option<f64> {
        match implement {
            Implement::Barbell if self.barbell => Some(HOME_BARBELL_ASSUMED_KG),
            Implement::Dumbbell if self.dumbbell_max_kg > 0.0 => Some(self.dumbbell_max_kg),
            Implement::Kettlebell => self
                .kettlebell_kg
                .iter()
                .copied()
                .fold(None, |acc: Option<f64>, kg| Some(acc.map_or(kg, |a| a.max(kg)))),
            _ => None,
        }
    }
}

/// Sport and role for performance-oriented users
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SportRole {
    pub sport: String,
    pub role: String,
}

// ============================================================================
// Movement Patterns and Body Areas
// ============================================================================

/// Canonical movement pattern tagged on every catalog entry
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PatternId {
    Squat,
    FrontSquat,
    Lunge,
    HipHinge,
    HorizontalPush,
    InclinePush,
    VerticalPush,
    Dip,
    VerticalPull,
    ChinUp,
    HorizontalPull,
    FacePull,
    Plank,
    LegRaise,
    DeadBug,
    BirdDog,
}

impl PatternId {
    pub const ALL: [PatternId; 16] = [
        PatternId::Squat,
        PatternId::FrontSquat,
        PatternId::Lunge,
        PatternId::HipHinge,
        PatternId::HorizontalPush,
        PatternId::InclinePush,
        PatternId::VerticalPush,
        PatternId::Dip,
        PatternId::VerticalPull,
        PatternId::ChinUp,
        PatternId::HorizontalPull,
        PatternId::FacePull,
        PatternId::Plank,
        PatternId::LegRaise,
        PatternId::DeadBug,
        PatternId::BirdDog,
    ];
}

/// Body area a discomfort report or onboarding pain flag refers to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum BodyArea {
    Neck,
    Shoulder,
    Elbow,
    Wrist,
    #[serde(alias = "scapula", alias = "thoracic_spine")]
    UpperBack,
    LowerBack,
    Hip,
    Knee,
    #[serde(alias = "ankles")]
    Ankle,
}

impl BodyArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyArea::Neck => "neck",
            BodyArea::Shoulder => "shoulder",
            BodyArea::Elbow => "elbow",
            BodyArea::Wrist => "wrist",
            BodyArea::UpperBack => "upper_back",
            BodyArea::LowerBack => "lower_back",
            BodyArea::Hip => "hip",
            BodyArea::Knee => "knee",
            BodyArea::Ankle => "ankle",
        }
    }
}

impl FromStr for BodyArea {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "neck" => Ok(BodyArea::Neck),
            "shoulder" | "shoulders" => Ok(BodyArea::Shoulder),
            "elbow" | "elbows" => Ok(BodyArea::Elbow),
            "wrist" | "wrists" => Ok(BodyArea::Wrist),
            "upper_back" | "scapula" | "thoracic_spine" => Ok(BodyArea::UpperBack),
            "lower_back" => Ok(BodyArea::LowerBack),
            "hip" | "hips" => Ok(BodyArea::Hip),
            "knee" | "knees" => Ok(BodyArea::Knee),
            "ankle" | "ankles" => Ok(BodyArea::Ankle),
            other => Err(Error::InvalidInput(format!("unknown body area '{}'", other))),
        }
    }
}

/// Category of an exercise slot, drives rest policy and set counts
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    Compound,
    Accessory,
    Isolation,
    Core,
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExerciseCategory::Compound => "compound",
            ExerciseCategory::Accessory => "accessory",
            ExerciseCategory::Isolation => "isolation",
            ExerciseCategory::Core => "core",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Reps
// ============================================================================

/// Rep prescription
///
/// Serialized as its display string (`"10"`, `"8-12"`, `"5-5-4"`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Reps {
    /// Same rep count for every set
    Fixed(u32),
    /// Inclusive range, the user picks within it
    Range(u32, u32),
    /// Explicit per-set values, as produced by linear progression
    PerSet(Vec<u32>),
}

impl Reps {
    /// Numeric volume estimate for a single set
    pub fn midpoint(&self) -> f64 {
        match self {
            Reps::Fixed(n) => f64::from(*n),
            Reps::Range(lo, hi) => (f64::from(*lo) + f64::from(*hi)) / 2.0,
            Reps::PerSet(values) if values.is_empty() => 0.0,
            Reps::PerSet(values) => {
                values.iter().map(|v| f64::from(*v)).sum::<f64>() / values.len() as f64
            }
        }
    }

    /// Scale every rep value by `factor`, never dropping below one rep
    pub fn scaled(&self, factor: f64) -> Reps {
        let scale = |n: u32| ((f64::from(n) * factor).round() as u32).max(1);
        match self {
            Reps::Fixed(n) => Reps::Fixed(scale(*n)),
            Reps::Range(lo, hi) => Reps::Range(scale(*lo), scale(*hi).max(scale(*lo))),
            Reps::PerSet(values) => Reps::PerSet(values.iter().map(|v| scale(*v)).collect()),
        }
    }
}

impl fmt::Display for Reps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reps::Fixed(n) => write!(f, "{}", n),
            Reps::Range(lo, hi) => write!(f, "{}-{}", lo, hi),
            Reps::PerSet(values) => {
                let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                f.write_str(&parts.join("-"))
            }
        }
    }
}

impl FromStr for Reps {
    type Err = Error;

    /// Two numbers parse as a range, three or more as per-set values
    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .trim()
            .split('-')
            .map(|p| p.trim().parse::<u32>())
            .collect::<std::result::Result<Vec<u32>, _>>()
            .map_err(|e| Error::InvalidInput(format!("invalid reps '{}': {}", s, e)))?;

        match parts.as_slice() {
            [n] => Ok(Reps::Fixed(*n)),
            [lo, hi] if lo <= hi => Ok(Reps::Range(*lo, *hi)),
            [lo, hi] => Err(Error::InvalidInput(format!(
                "invalid reps '{}': range start {} exceeds end {}",
                s, lo, hi
            ))),
            _ => Ok(Reps::PerSet(parts)),
        }
    }
}

impl From<Reps> for String {
    fn from(reps: Reps) -> Self {
        reps.to_string()
    }
}

impl TryFrom<String> for Reps {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

// ============================================================================
// Assessment and Program Input
// ============================================================================

/// Most recent baseline measurement for one pattern
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Assessment {
    pub pattern: PatternId,

    /// Name of the variant the user was tested on
    #[serde(default)]
    pub variant: Option<String>,

    #[serde(default)]
    pub max_reps: u32,

    #[serde(default)]
    pub one_rep_max: Option<f64>,

    #[serde(default)]
    pub weight: Option<f64>,
}

/// Fully resolved onboarding profile, the sole input to program generation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgramInput {
    pub goal: Goal,
    pub level: Level,
    pub location: Location,

    #[serde(default)]
    pub equipment: Equipment,

    pub frequency: u32,

    #[serde(default)]
    pub pain_areas: Vec<BodyArea>,

    #[serde(default)]
    pub assessments: Vec<Assessment>,

    #[serde(default)]
    pub disability_type: Option<String>,

    #[serde(default)]
    pub sport_role: Option<SportRole>,
}

impl ProgramInput {
    /// Assessment recorded for a pattern, if any
    pub fn assessment_for(&self, pattern: PatternId) -> Option<&Assessment> {
        self.assessments.iter().find(|a| a.pattern == pattern)
    }
}

// ============================================================================
// Program Output
// ============================================================================

/// A prescribed exercise as placed in the weekly schedule
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub name: String,
    pub pattern: Option<PatternId>,
    pub category: ExerciseCategory,
    pub sets: u32,
    pub reps: Reps,
    pub rest_seconds: u32,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
}

/// One training day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DaySchedule {
    pub day_name: String,
    pub exercises: Vec<Exercise>,
}

/// Weekly split type
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SplitType {
    FullBody,
    UpperLower,
    Ppl,
}

impl SplitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitType::FullBody => "full_body",
            SplitType::UpperLower => "upper_lower",
            SplitType::Ppl => "ppl",
        }
    }
}

/// Complete multi-week program
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Program {
    pub name: String,
    pub description: String,
    pub split: SplitType,
    pub days_per_week: u32,
    pub weekly_schedule: Vec<DaySchedule>,
    pub total_weeks: u32,
    pub includes_deload: bool,
    pub deload_week: Option<u32>,
}

// ============================================================================
// Runtime Session Reports
// ============================================================================

/// Discomfort report from the live session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DiscomfortReport {
    pub exercise_name: String,
    pub pain_level: u8,
    #[serde(default)]
    pub area: Option<BodyArea>,
}

/// Why a set was not completed
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    Pain,
    Fatigue,
    Other,
}

/// Feedback collected once per set
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetFeedback {
    pub completed: bool,
    #[serde(default)]
    pub rpe: Option<f64>,
    #[serde(default)]
    pub reps_done: Option<u32>,
    #[serde(default)]
    pub reason: Option<FailureReason>,
}

/// Set-completion report from the live session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetReport {
    pub exercise_name: String,
    pub set_number: u32,
    #[serde(flatten)]
    pub feedback: SetFeedback,
}
