//! Schedule Builder: weekly day and pattern sequencing.
//!
//! The builder decides which patterns land on which day. Turning a pattern
//! into a concrete exercise is delegated to a [`SlotResolver`].

use crate::{DaySchedule, Exercise, Goal, Level, PatternId, SplitType};
use serde::{Deserialize, Serialize};

const FULL_BODY_POOL: [PatternId; 6] = [
    PatternId::Squat,
    PatternId::HorizontalPush,
    PatternId::VerticalPull,
    PatternId::VerticalPush,
    PatternId::HipHinge,
    PatternId::HorizontalPull,
];

const FULL_BODY_PER_DAY: usize = 4;

const UPPER_POOL: [PatternId; 5] = [
    PatternId::HorizontalPush,
    PatternId::VerticalPull,
    PatternId::VerticalPush,
    PatternId::HorizontalPull,
    PatternId::Dip,
];

const LOWER_POOL: [PatternId; 4] = [
    PatternId::Squat,
    PatternId::HipHinge,
    PatternId::Lunge,
    PatternId::FrontSquat,
];

const PUSH_POOL: [PatternId; 4] = [
    PatternId::HorizontalPush,
    PatternId::VerticalPush,
    PatternId::InclinePush,
    PatternId::Dip,
];

const PULL_POOL: [PatternId; 4] = [
    PatternId::VerticalPull,
    PatternId::HorizontalPull,
    PatternId::FacePull,
    PatternId::ChinUp,
];

const CORE_POOL: [PatternId; 3] = [PatternId::Plank, PatternId::LegRaise, PatternId::DeadBug];

const PPL_CORE_POOL: [PatternId; 4] = [
    PatternId::Plank,
    PatternId::LegRaise,
    PatternId::DeadBug,
    PatternId::BirdDog,
];

impl SplitType {
    /// Split for a weekly frequency: 6+ push/pull/legs, 4-5 upper/lower,
    /// otherwise full body
    pub fn for_frequency(frequency: u32) -> SplitType {
        match frequency {
            f if f >= 6 => SplitType::Ppl,
            4 | 5 => SplitType::UpperLower,
            _ => SplitType::FullBody,
        }
    }
}

/// Role of a slot within a day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SlotRole {
    Main,
    Core,
}

/// One pattern placed on one day
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    /// 1-based day within the week
    pub day: u32,
    pub pattern: PatternId,
    pub role: SlotRole,
}

/// Patterns for one training day, before resolution
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayPlan {
    pub day: u32,
    pub name: String,
    pub slots: Vec<Slot>,
}

/// Turns a slot into a concrete exercise
///
/// Returning `None` drops the slot from the day.
pub trait SlotResolver {
    fn resolve(&self, slot: &Slot) -> Option<Exercise>;
}

/// Plan a single day of a split
pub fn day_plan(split: SplitType, day: u32) -> DayPlan {
    let day = day.max(1);
    let main = |patterns: &[PatternId]| -> Vec<Slot> {
        patterns
            .iter()
            .map(|p| Slot {
                day,
                pattern: *p,
                role: SlotRole::Main,
            })
            .collect()
    };
    let core = |pattern: PatternId| Slot {
        day,
        pattern,
        role: SlotRole::Core,
    };

    match split {
        SplitType::FullBody => {
            let start = (day as usize - 1) * 2;
            let patterns: Vec<PatternId> = (0..FULL_BODY_PER_DAY)
                .map(|k| FULL_BODY_POOL[(start + k) % FULL_BODY_POOL.len()])
                .collect();
            let mut slots = main(&patterns);
            slots.push(core(CORE_POOL[day as usize % CORE_POOL.len()]));
            DayPlan {
                day,
                name: format!("Full Body Day {}", day),
                slots,
            }
        }
        SplitType::UpperLower if day % 2 == 1 => DayPlan {
            day,
            name: format!("Upper Body Day {}", day.div_ceil(2)),
            slots: main(&UPPER_POOL),
        },
        SplitType::UpperLower => {
            let mut slots = main(&LOWER_POOL);
            slots.push(core(CORE_POOL[(day as usize / 2) % CORE_POOL.len()]));
            DayPlan {
                day,
                name: format!("Lower Body Day {}", day / 2),
                slots,
            }
        }
        SplitType::Ppl => {
            let cycle = (day - 1) / 3 + 1;
            match (day - 1) % 3 {
                0 => DayPlan {
                    day,
                    name: format!("Push Day {}", cycle),
                    slots: main(&PUSH_POOL),
                },
                1 => DayPlan {
                    day,
                    name: format!("Pull Day {}", cycle),
                    slots: main(&PULL_POOL),
                },
                _ => {
                    let mut slots = main(&LOWER_POOL);
                    let idx = ((day as usize - 1) / 3) % PPL_CORE_POOL.len();
                    slots.push(core(PPL_CORE_POOL[idx]));
                    DayPlan {
                        day,
                        name: format!("Legs Day {}", cycle),
                        slots,
                    }
                }
            }
        }
    }
}

/// Plan every day of the week for a split
pub fn plan_week(split: SplitType, frequency: u32) -> Vec<DayPlan> {
    (1..=frequency).map(|day| day_plan(split, day)).collect()
}

/// Builds the weekly schedule from day plans and a resolver
pub struct ScheduleBuilder;

impl ScheduleBuilder {
    /// Resolve every slot of every day
    ///
    /// Exercises that resolve to a name already present on the same day are
    /// dropped, keeping the first occurrence.
    pub fn build(split: SplitType, frequency: u32, resolver: &dyn SlotResolver) -> Vec<DaySchedule> {
        plan_week(split, frequency)
            .into_iter()
            .map(|plan| {
                let mut exercises: Vec<Exercise> = Vec::with_capacity(plan.slots.len());
                for slot in &plan.slots {
                    let Some(exercise) = resolver.resolve(slot) else {
                        continue;
                    };
                    if exercises.iter().any(|e| e.name == exercise.name) {
                        tracing::debug!("{}: dropping duplicate '{}'", plan.name, exercise.name);
                        continue;
                    }
                    exercises.push(exercise);
                }
                DaySchedule {
                    day_name: plan.name,
                    exercises,
                }
            })
            .collect()
    }
}

/// Program duration and deload placement
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgramLength {
    pub total_weeks: u32,
    pub includes_deload: bool,
    pub deload_week: Option<u32>,
}

/// Program length for a goal and level
///
/// A deload is included from four weeks up and is always the second-to-last
/// week.
pub fn program_length(goal: Goal, level: Level) -> ProgramLength {
    let total_weeks = match (goal, level) {
        (Goal::Strength, Level::Beginner) => 6,
        (Goal::Strength, Level::Intermediate) => 8,
        (Goal::Strength, Level::Advanced) => 12,
        (Goal::MuscleGain | Goal::Toning, Level::Beginner) => 8,
        (Goal::MuscleGain | Goal::Toning, Level::Intermediate) => 10,
        (Goal::MuscleGain | Goal::Toning, Level::Advanced) => 12,
        (Goal::FatLoss | Goal::Performance | Goal::MotorRecovery, _) => 8,
    };

    let includes_deload = total_weeks >= 4;
    ProgramLength {
        total_weeks,
        includes_deload,
        deload_week: includes_deload.then(|| total_weeks - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExerciseCategory, Reps};

    /// Resolver that names exercises after their pattern
    struct PatternNames;

    impl SlotResolver for PatternNames {
        fn resolve(&self, slot: &Slot) -> Option<Exercise> {
            Some(Exercise {
                name: format!("{:?}", slot.pattern),
                pattern: Some(slot.pattern),
                category: match slot.role {
                    SlotRole::Main => ExerciseCategory::Compound,
                    SlotRole::Core => ExerciseCategory::Core,
                },
                sets: 3,
                reps: Reps::Range(8, 12),
                rest_seconds: 90,
                notes: String::new(),
                weight_kg: None,
            })
        }
    }

    #[test]
    fn test_split_for_frequency() {
        assert_eq!(SplitType::for_frequency(1), SplitType::FullBody);
        assert_eq!(SplitType::for_frequency(3), SplitType::FullBody);
        assert_eq!(SplitType::for_frequency(4), SplitType::UpperLower);
        assert_eq!(SplitType::for_frequency(5), SplitType::UpperLower);
        assert_eq!(SplitType::for_frequency(6), SplitType::Ppl);
        assert_eq!(SplitType::for_frequency(7), SplitType::Ppl);
    }

    #[test]
    fn test_frequency_six_is_ppl_with_six_days() {
        let split = SplitType::for_frequency(6);
        let days = ScheduleBuilder::build(split, 6, &PatternNames);
        assert_eq!(split, SplitType::Ppl);
        assert_eq!(days.len(), 6);
        assert_eq!(days[0].day_name, "Push Day 1");
        assert_eq!(days[4].day_name, "Pull Day 2");
        assert_eq!(days[5].day_name, "Legs Day 2");
    }

    #[test]
    fn test_frequency_three_is_full_body_with_three_days() {
        let split = SplitType::for_frequency(3);
        let days = ScheduleBuilder::build(split, 3, &PatternNames);
        assert_eq!(split, SplitType::FullBody);
        assert_eq!(days.len(), 3);
        for day in &days {
            assert_eq!(day.exercises.len(), FULL_BODY_PER_DAY + 1);
        }
    }

    #[test]
    fn test_full_body_window_wraps() {
        let plan = day_plan(SplitType::FullBody, 3);
        let patterns: Vec<PatternId> = plan.slots.iter().map(|s| s.pattern).collect();
        assert_eq!(
            patterns,
            vec![
                PatternId::HipHinge,
                PatternId::HorizontalPull,
                PatternId::Squat,
                PatternId::HorizontalPush,
                PatternId::Plank,
            ]
        );
        assert_eq!(plan.slots[4].role, SlotRole::Core);
    }

    #[test]
    fn test_upper_lower_alternates() {
        let upper = day_plan(SplitType::UpperLower, 3);
        assert_eq!(upper.name, "Upper Body Day 2");
        assert!(upper.slots.iter().all(|s| s.role == SlotRole::Main));

        let lower = day_plan(SplitType::UpperLower, 4);
        assert_eq!(lower.name, "Lower Body Day 2");
        assert_eq!(lower.slots.last().unwrap().pattern, PatternId::DeadBug);
    }

    #[test]
    fn test_ppl_core_rotates_by_cycle() {
        assert_eq!(
            day_plan(SplitType::Ppl, 3).slots.last().unwrap().pattern,
            PatternId::Plank
        );
        assert_eq!(
            day_plan(SplitType::Ppl, 6).slots.last().unwrap().pattern,
            PatternId::LegRaise
        );
    }

    #[test]
    fn test_duplicates_within_a_day_are_dropped() {
        struct Collapsing;
        impl SlotResolver for Collapsing {
            fn resolve(&self, slot: &Slot) -> Option<Exercise> {
                let mut e = PatternNames.resolve(slot)?;
                if slot.pattern == PatternId::FrontSquat {
                    e.name = "Squat".to_string();
                }
                Some(e)
            }
        }

        let days = ScheduleBuilder::build(SplitType::UpperLower, 2, &Collapsing);
        let names: Vec<&str> = days[1].exercises.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Squat", "HipHinge", "Lunge", "LegRaise"]);
    }

    #[test]
    fn test_program_length_table() {
        let strength = program_length(Goal::Strength, Level::Beginner);
        assert_eq!(strength.total_weeks, 6);
        assert_eq!(strength.deload_week, Some(5));

        assert_eq!(program_length(Goal::Toning, Level::Intermediate).total_weeks, 10);
        assert_eq!(program_length(Goal::Strength, Level::Advanced).total_weeks, 12);

        let fat_loss = program_length(Goal::FatLoss, Level::Advanced);
        assert_eq!(fat_loss.total_weeks, 8);
        assert!(fat_loss.includes_deload);
        assert_eq!(fat_loss.deload_week, Some(7));
    }
}
