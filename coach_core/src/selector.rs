//! Exercise Selector: picks one variant of a pattern and its prescription.
//!
//! Strength goals run the progression state machine in [`crate::progression`];
//! every other goal picks the variant matching the user's experience level.

use crate::catalog::{goal_config, Catalog, ExerciseVariant};
use crate::progression::{strength_step, ProgressionMode};
use crate::{Assessment, Goal, Level, PatternId, Reps};
use serde::{Deserialize, Serialize};

/// Sets prescribed for level-based selection
const LEVEL_SETS: u32 = 3;

/// Rest prescribed for level-based selection
const LEVEL_REST_SECONDS: u32 = 90;

/// A single selected variant with its prescription
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PrescribedExercise {
    pub name: String,
    pub pattern: PatternId,
    pub level: u32,
    pub sets: u32,
    pub reps: Reps,
    pub rest_seconds: u32,
    pub notes: String,
    pub mode: ProgressionMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_reps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weeks_to_unlock: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_variant: Option<String>,
}

/// Selects variants from a catalog
#[derive(Clone, Copy, Debug)]
pub struct ExerciseSelector<'a> {
    catalog: &'a Catalog,
}

impl<'a> ExerciseSelector<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Select a variant for `(pattern, goal)`
    ///
    /// Returns `None` when the catalog has no ladder for the combination;
    /// callers fall back to a generic prescription.
    pub fn select(
        &self,
        pattern: PatternId,
        level: Level,
        goal: Goal,
        assessment: Option<&Assessment>,
        week_number: u32,
    ) -> Option<PrescribedExercise> {
        let Some(ladder) = self.catalog.ladder(pattern, goal) else {
            tracing::warn!("No catalog ladder for {:?}/{}", pattern, goal);
            return None;
        };

        let selected = if goal == Goal::Strength {
            self.select_strength(ladder, pattern, assessment, week_number)
        } else {
            Some(select_by_level(ladder, pattern, level, goal))
        };

        if let Some(s) = &selected {
            tracing::debug!(
                "Selected '{}' (level {}, {:?}) for {:?}/{}",
                s.name,
                s.level,
                s.mode,
                pattern,
                goal
            );
        }
        selected
    }

    fn select_strength(
        &self,
        ladder: &[ExerciseVariant],
        pattern: PatternId,
        assessment: Option<&Assessment>,
        week_number: u32,
    ) -> Option<PrescribedExercise> {
        let policy = goal_config(Goal::Strength);
        let step = strength_step(ladder, assessment, week_number, &policy)?;

        Some(PrescribedExercise {
            name: step.variant.name.clone(),
            pattern,
            level: step.variant.level,
            sets: step.sets,
            reps: step.reps,
            rest_seconds: policy.rest.compound,
            notes: step.notes,
            mode: step.mode,
            target_reps: Some(step.target_reps),
            weeks_to_unlock: step.weeks_to_unlock,
            previous_variant: step.previous_variant.map(|v| v.name.clone()),
        })
    }

    /// Next harder variant on the same ladder, if any
    pub fn harder_variant(&self, pattern: PatternId, goal: Goal, name: &str) -> Option<&'a ExerciseVariant> {
        let ladder = self.catalog.ladder(pattern, goal)?;
        let current = self.catalog.find_variant(pattern, goal, name)?;
        ladder.iter().find(|v| v.level == current.level + 1)
    }

    /// Next easier variant on the same ladder, if any
    pub fn easier_variant(&self, pattern: PatternId, goal: Goal, name: &str) -> Option<&'a ExerciseVariant> {
        let ladder = self.catalog.ladder(pattern, goal)?;
        let current = self.catalog.find_variant(pattern, goal, name)?;
        ladder.iter().find(|v| v.level + 1 == current.level)
    }
}

/// Variant at the level's numeric mapping; a short ladder yields its
/// hardest variant below that level.
fn select_by_level(
    ladder: &[ExerciseVariant],
    pattern: PatternId,
    level: Level,
    goal: Goal,
) -> PrescribedExercise {
    let wanted = level.numeric();
    let variant = ladder
        .iter()
        .find(|v| v.level == wanted)
        .or_else(|| ladder.iter().filter(|v| v.level <= wanted).max_by_key(|v| v.level))
        .unwrap_or(&ladder[0]);

    let policy = goal_config(goal);
    PrescribedExercise {
        name: variant.name.clone(),
        pattern,
        level: variant.level,
        sets: LEVEL_SETS,
        reps: variant.reps.clone().unwrap_or(policy.default_reps),
        rest_seconds: LEVEL_REST_SECONDS,
        notes: format!("{} - level {}", policy.name, variant.level),
        mode: ProgressionMode::Level,
        target_reps: None,
        weeks_to_unlock: None,
        previous_variant: None,
    }
}
