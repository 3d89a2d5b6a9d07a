//! Progression logic for strength ladders and working loads.
//!
//! This module implements:
//! - The linear-rep wave used while working toward an unlock
//! - The per-pattern strength state machine (cold start, unlock test, volume)
//! - One-rep-max estimation and working-weight rounding

use crate::catalog::{ExerciseVariant, GoalConfig};
use crate::{Assessment, Reps};
use serde::{Deserialize, Serialize};

/// Reps used for a cold start and for an unlock test
const TEST_REPS: [u32; 3] = [3, 3, 3];

/// Unlock threshold when neither the variant nor the goal names one
const DEFAULT_UNLOCK_REPS: u32 = 12;

/// Target reps once the top of a ladder is reached
const VOLUME_TARGET_REPS: u32 = 20;

/// Working weights are rounded to this plate increment
const LOAD_INCREMENT_KG: f64 = 2.5;

/// How a prescription advances the user
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionMode {
    /// Linear rep wave toward the unlock threshold
    Linear,
    /// One-time trial of the next harder variant
    UnlockTest,
    /// Top of the ladder, accumulate volume
    Volume,
    /// Fixed variant picked by experience level
    Level,
}

/// Result of the strength state machine for one pattern
#[derive(Clone, Debug, PartialEq)]
pub struct StrengthStep<'a> {
    pub variant: &'a ExerciseVariant,
    pub sets: u32,
    pub reps: Reps,
    pub mode: ProgressionMode,
    pub target_reps: u32,
    pub weeks_to_unlock: Option<u32>,
    pub previous_variant: Option<&'a ExerciseVariant>,
    pub notes: String,
}

/// Rep wave for three sets
///
/// The first three weeks hold every set at the base. After that the target
/// goes up by one every three weeks, and within each block one more set is
/// performed at the new target while the rest stay one below it.
///
/// `calculate_linear_reps(5, 1)` is `5-5-5`, `calculate_linear_reps(5, 4)`
/// is `6-5-5`.
pub fn calculate_linear_reps(start_reps: u32, week_number: u32) -> Reps {
    linear_reps(start_reps, week_number, 3)
}

/// Rep wave generalised to any set count
pub fn linear_reps(start_reps: u32, week_number: u32, sets: u32) -> Reps {
    let base = start_reps.max(3);
    let elapsed = week_number.max(1) - 1;
    let target = base + elapsed / 3;
    let sets_at_target = elapsed % 3 + 1;
    let below_target = (target - 1).max(base);

    Reps::PerSet(
        (1..=sets)
            .map(|set| if set <= sets_at_target { target } else { below_target })
            .collect(),
    )
}

/// Weeks of linear progression left before the unlock threshold
pub fn weeks_to_unlock(unlock_reps: u32, max_reps: u32) -> u32 {
    unlock_reps.saturating_sub(max_reps).div_ceil(3)
}

/// Run the strength state machine over a ladder
///
/// Returns `None` only for an empty ladder. An assessment that is missing,
/// names an unknown variant, or reports zero reps is a cold start.
pub fn strength_step<'a>(
    ladder: &'a [ExerciseVariant],
    assessment: Option<&Assessment>,
    week_number: u32,
    policy: &GoalConfig,
) -> Option<StrengthStep<'a>> {
    let first = ladder.first()?;
    let unlock_of = |v: &ExerciseVariant| {
        v.unlock_reps
            .or(policy.unlock_threshold)
            .unwrap_or(DEFAULT_UNLOCK_REPS)
    };

    let warm = assessment.and_then(|a| {
        let wanted = a.variant.as_deref()?.trim().to_lowercase();
        let idx = ladder.iter().position(|v| v.name.to_lowercase() == wanted)?;
        (a.max_reps > 0).then_some((idx, a.max_reps))
    });

    let Some((idx, max_reps)) = warm else {
        let target = unlock_of(first);
        tracing::debug!("Cold start on '{}', target {} reps", first.name, target);
        return Some(StrengthStep {
            variant: first,
            sets: 3,
            reps: Reps::PerSet(TEST_REPS.to_vec()),
            mode: ProgressionMode::Linear,
            target_reps: target,
            weeks_to_unlock: None,
            previous_variant: None,
            notes: format!(
                "Level 1: start at 3 reps, linear progression toward {}",
                target
            ),
        });
    };

    let current = &ladder[idx];
    let unlock = unlock_of(current);

    if max_reps >= unlock {
        if let Some(next) = ladder.get(idx + 1) {
            tracing::debug!(
                "Unlock reached on '{}' ({} >= {}), testing '{}'",
                current.name,
                max_reps,
                unlock,
                next.name
            );
            return Some(StrengthStep {
                variant: next,
                sets: 3,
                reps: Reps::PerSet(TEST_REPS.to_vec()),
                mode: ProgressionMode::UnlockTest,
                target_reps: unlock_of(next),
                weeks_to_unlock: None,
                previous_variant: Some(current),
                notes: format!(
                    "Level unlocked! Test {}: stay here if you reach 3 reps",
                    next.name
                ),
            });
        }

        return Some(StrengthStep {
            variant: current,
            sets: 4,
            reps: linear_reps(max_reps, week_number, 4),
            mode: ProgressionMode::Volume,
            target_reps: VOLUME_TARGET_REPS,
            weeks_to_unlock: None,
            previous_variant: None,
            notes: "Top level: accumulate volume".to_string(),
        });
    }

    Some(StrengthStep {
        variant: current,
        sets: 3,
        reps: calculate_linear_reps(max_reps, week_number),
        mode: ProgressionMode::Linear,
        target_reps: unlock,
        weeks_to_unlock: Some(weeks_to_unlock(unlock, max_reps)),
        previous_variant: None,
        notes: format!(
            "Week {}: progressing toward {} reps",
            week_number.max(1),
            unlock
        ),
    })
}

/// Estimated one-rep max (Brzycki)
///
/// Defined for 1..=36 reps; a single rep is the max itself.
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> Option<f64> {
    match reps {
        0 => None,
        1 => Some(weight),
        r if r < 37 => Some(weight * 36.0 / (37.0 - f64::from(r))),
        _ => None,
    }
}

/// Working weight at a fraction of 1RM, rounded to the nearest 2.5 kg
pub fn target_weight(one_rep_max: f64, percentage: f64) -> f64 {
    (one_rep_max * percentage / LOAD_INCREMENT_KG).round() * LOAD_INCREMENT_KG
}

/// 1RM from an assessment: the measured value, else estimated from weight and reps
pub fn assessed_one_rep_max(assessment: &Assessment) -> Option<f64> {
    assessment
        .one_rep_max
        .filter(|v| *v > 0.0)
        .or_else(|| {
            let weight = assessment.weight.filter(|w| *w > 0.0)?;
            estimate_one_rep_max(weight, assessment.max_reps)
        })
}
