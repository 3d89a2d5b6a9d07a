//! Autoregulation Engine: adjusts difficulty from per-set effort.
//!
//! Perceived effort (0-10) is compared against a target band that depends on
//! the set index and the goal category. Increases walk the tempo ladder
//! before touching the exercise; decreases never use tempo.

use crate::config::AutoregulationConfig;
use crate::selector::ExerciseSelector;
use crate::tempo::{next_harder, TempoId};
use crate::{Goal, PatternId, SetFeedback, SetReport};
use serde::{Deserialize, Serialize};

/// Which family of effort bands applies
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalCategory {
    StrengthPower,
    HypertrophyEndurance,
}

impl From<Goal> for GoalCategory {
    fn from(goal: Goal) -> Self {
        match goal {
            Goal::Strength | Goal::Performance => GoalCategory::StrengthPower,
            _ => GoalCategory::HypertrophyEndurance,
        }
    }
}

/// Inclusive target effort range
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct EffortBand {
    pub min: f64,
    pub max: f64,
}

/// Target band for a 1-based set index
pub fn target_band(category: GoalCategory, set_number: u32) -> EffortBand {
    let (min, max) = match (category, set_number) {
        (GoalCategory::StrengthPower, 0 | 1) => (7.0, 8.0),
        (GoalCategory::StrengthPower, 2) => (7.5, 8.5),
        (GoalCategory::StrengthPower, _) => (8.0, 9.0),
        (GoalCategory::HypertrophyEndurance, 0 | 1) => (6.5, 7.5),
        (GoalCategory::HypertrophyEndurance, 2) => (7.0, 8.0),
        (GoalCategory::HypertrophyEndurance, _) => (7.5, 8.5),
    };
    EffortBand { min, max }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    Increase,
    Maintain,
    Decrease,
}

/// Classify one set
///
/// A set that was not completed is a decrease whatever the effort score.
/// A completed set without a score is left alone.
pub fn evaluate(goal: Goal, set_number: u32, feedback: &SetFeedback) -> Adjustment {
    if !feedback.completed {
        return Adjustment::Decrease;
    }
    let Some(rpe) = feedback.rpe else {
        return Adjustment::Maintain;
    };

    let band = target_band(goal.into(), set_number);
    if rpe < band.min {
        Adjustment::Increase
    } else if rpe > band.max {
        Adjustment::Decrease
    } else {
        Adjustment::Maintain
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentScope {
    NextSet,
    NextSession,
}

/// Concrete change to apply
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdjustmentPlan {
    Keep,
    Tempo {
        tempo: TempoId,
        pattern: String,
        difficulty_increase_percent: u32,
    },
    HarderVariant {
        name: String,
    },
    MoreReps {
        reps: u32,
    },
    EasierVariant {
        name: String,
    },
    ReduceLoad {
        percent: u32,
    },
}

/// Outcome for one set report
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AutoregulationDecision {
    pub exercise_name: String,
    pub set_number: u32,
    pub adjustment: Adjustment,
    pub scope: AdjustmentScope,
    pub band: EffortBand,
    pub plan: AdjustmentPlan,
    pub message: String,
}

/// What the engine needs to know about the exercise being performed
#[derive(Clone, Copy, Debug)]
pub struct ExerciseContext {
    pub goal: Goal,
    pub pattern: Option<PatternId>,
    pub total_sets: u32,
    pub current_tempo: TempoId,
}

pub struct AutoregulationEngine<'a> {
    selector: ExerciseSelector<'a>,
    config: AutoregulationConfig,
}

impl<'a> AutoregulationEngine<'a> {
    pub fn new(selector: ExerciseSelector<'a>, config: AutoregulationConfig) -> Self {
        Self { selector, config }
    }

    /// Decide how to adjust after a set
    pub fn decide(&self, report: &SetReport, ctx: &ExerciseContext) -> AutoregulationDecision {
        let adjustment = evaluate(ctx.goal, report.set_number, &report.feedback);
        let scope = if report.set_number < ctx.total_sets {
            AdjustmentScope::NextSet
        } else {
            AdjustmentScope::NextSession
        };

        let plan = match adjustment {
            Adjustment::Maintain => AdjustmentPlan::Keep,
            Adjustment::Increase => self.increase_plan(&report.exercise_name, ctx),
            Adjustment::Decrease => self.decrease_plan(&report.exercise_name, ctx),
        };

        let message = match (&plan, report.feedback.rpe) {
            (AdjustmentPlan::Keep, _) => "On target, keep the prescription".to_string(),
            (_, None) => format!("Set not completed: {}", describe(&plan)),
            (_, Some(rpe)) => format!("Effort {:.1}: {}", rpe, describe(&plan)),
        };

        tracing::debug!(
            "Autoregulation '{}' set {}: {:?} -> {:?}",
            report.exercise_name,
            report.set_number,
            adjustment,
            plan
        );

        AutoregulationDecision {
            exercise_name: report.exercise_name.clone(),
            set_number: report.set_number,
            adjustment,
            scope,
            band: target_band(ctx.goal.into(), report.set_number),
            plan,
            message,
        }
    }

    fn increase_plan(&self, exercise_name: &str, ctx: &ExerciseContext) -> AdjustmentPlan {
        if let Some(tempo) = next_harder(ctx.current_tempo) {
            return AdjustmentPlan::Tempo {
                tempo: tempo.id,
                pattern: tempo.to_string(),
                difficulty_increase_percent: tempo.difficulty_increase_percent,
            };
        }

        ctx.pattern
            .and_then(|p| self.selector.harder_variant(p, ctx.goal, exercise_name))
            .map(|v| AdjustmentPlan::HarderVariant {
                name: v.name.clone(),
            })
            .unwrap_or(AdjustmentPlan::MoreReps { reps: 1 })
    }

    fn decrease_plan(&self, exercise_name: &str, ctx: &ExerciseContext) -> AdjustmentPlan {
        ctx.pattern
            .and_then(|p| self.selector.easier_variant(p, ctx.goal, exercise_name))
            .map(|v| AdjustmentPlan::EasierVariant {
                name: v.name.clone(),
            })
            .unwrap_or(AdjustmentPlan::ReduceLoad {
                percent: self.config.load_reduction_percent,
            })
    }
}

fn describe(plan: &AdjustmentPlan) -> String {
    match plan {
        AdjustmentPlan::Keep => "keep the prescription".to_string(),
        AdjustmentPlan::Tempo {
            pattern,
            difficulty_increase_percent,
            ..
        } => format!(
            "switch to tempo {} (+{}%)",
            pattern, difficulty_increase_percent
        ),
        AdjustmentPlan::HarderVariant { name } => format!("move up to {}", name),
        AdjustmentPlan::MoreReps { reps } => format!("add {} rep per set", reps),
        AdjustmentPlan::EasierVariant { name } => format!("move down to {}", name),
        AdjustmentPlan::ReduceLoad { percent } => format!("reduce load by {}%", percent),
    }
}
