//! Program Generator: turns a resolved profile into a multi-week program.
//!
//! Generation logic:
//! - Split from weekly frequency, day sequencing from the schedule builder
//! - Each slot: pain-area axis, then context/goal-aware substitution
//! - Sets, reps and rest from goal and level policy
//! - Program length and deload placement from the (goal, level) table
//!
//! Generation is deterministic: the same input always yields the same program.

use crate::catalog::{goal_config, level_config, Catalog, GoalConfig, LevelConfig};
use crate::config::Config;
use crate::progression::{assessed_one_rep_max, target_weight};
use crate::schedule::{program_length, ScheduleBuilder, Slot, SlotResolver};
use crate::substitution::{
    BodyweightChoice, ContextVariant, Resolution, SubstitutionResolver, TrainingContext,
    VariantSource,
};
use crate::volume::{distribute_sets_per_session, primary_muscle, Muscle, VolumeRecommendation};
use crate::{
    Error, Exercise, ExerciseCategory, Goal, PatternId, Program, ProgramInput, Result, SplitType,
};

/// Share of the main set count used for core slots
const CORE_SET_FACTOR: f64 = 0.66;

/// Minimum sets for any policy-derived prescription
const MIN_SETS: u32 = 2;

/// Week the generated template represents
const TEMPLATE_WEEK: u32 = 1;

/// Generates programs from a catalog and configuration
#[derive(Clone, Debug)]
pub struct ProgramGenerator<'a> {
    catalog: &'a Catalog,
    config: Config,
}

impl<'a> ProgramGenerator<'a> {
    /// Build a generator over a checked catalog and configuration
    ///
    /// # Errors
    /// `Error::CatalogValidation` when the catalog breaks an integrity rule,
    /// `Error::Config` when the thresholds are incoherent.
    pub fn new(catalog: &'a Catalog, config: Config) -> Result<Self> {
        catalog.ensure_valid()?;
        config.validate()?;
        Ok(Self { catalog, config })
    }

    /// Generate a program for a profile
    ///
    /// # Errors
    /// `Error::InvalidInput` when the weekly frequency is outside 1..=7.
    /// Every other degraded situation falls back to a conservative
    /// prescription instead of failing.
    pub fn generate(&self, input: &ProgramInput) -> Result<Program> {
        if !(1..=7).contains(&input.frequency) {
            return Err(Error::InvalidInput(format!(
                "weekly frequency {} must be between 1 and 7",
                input.frequency
            )));
        }

        let goal_cfg = goal_config(input.goal);
        let split = SplitType::for_frequency(input.frequency);
        tracing::info!(
            "Generating {} program: {:?}, {} days/week, {:?} at {:?}",
            goal_cfg.name,
            split,
            input.frequency,
            input.level,
            input.location
        );

        let resolver = GeneratorSlots {
            substitution: SubstitutionResolver::new(self.catalog, self.config.program.clone()),
            catalog: self.catalog,
            input,
            goal: goal_cfg.clone(),
            level: level_config(input.level),
        };
        let weekly_schedule = ScheduleBuilder::build(split, input.frequency, &resolver);
        let length = program_length(input.goal, input.level);

        let program = Program {
            name: format!("{} - {}", goal_cfg.name, split.as_str().to_uppercase()),
            description: describe(input, &goal_cfg, length.total_weeks),
            split,
            days_per_week: input.frequency,
            weekly_schedule,
            total_weeks: length.total_weeks,
            includes_deload: length.includes_deload,
            deload_week: length.deload_week,
        };

        tracing::info!(
            "Generated '{}': {} days, {} exercises, {} weeks",
            program.name,
            program.weekly_schedule.len(),
            program
                .weekly_schedule
                .iter()
                .map(|d| d.exercises.len())
                .sum::<usize>(),
            program.total_weeks
        );
        Ok(program)
    }

    /// Generate a program, then rescale sets from volume recommendations
    ///
    /// Each non-core exercise takes its primary muscle's weekly target,
    /// spread over the days that train that muscle and the exercises
    /// sharing it within a day.
    pub fn generate_with_volume(
        &self,
        input: &ProgramInput,
        recommendations: &[VolumeRecommendation],
    ) -> Result<Program> {
        let mut program = self.generate(input)?;

        let trains = |exercise: &Exercise, muscle: Muscle| {
            exercise.category != ExerciseCategory::Core
                && exercise.pattern.map(primary_muscle) == Some(muscle)
        };

        for rec in recommendations {
            let days: Vec<u32> = program
                .weekly_schedule
                .iter()
                .map(|d| d.exercises.iter().filter(|e| trains(e, rec.muscle)).count() as u32)
                .filter(|n| *n > 0)
                .collect();
            let Some(per_day) = days.iter().max().copied() else {
                continue;
            };
            let sets = distribute_sets_per_session(rec.recommended_sets, days.len() as u32, per_day);

            tracing::debug!(
                "Volume {:?}: {} sets/week over {} days -> {} sets per exercise",
                rec.muscle,
                rec.recommended_sets,
                days.len(),
                sets
            );
            for exercise in program
                .weekly_schedule
                .iter_mut()
                .flat_map(|d| d.exercises.iter_mut())
                .filter(|e| trains(e, rec.muscle))
            {
                exercise.sets = sets;
            }
        }

        Ok(program)
    }
}

fn describe(input: &ProgramInput, goal: &GoalConfig, total_weeks: u32) -> String {
    let mut description = format!(
        "{}-week {} program, {} sessions per week.",
        total_weeks, goal.name, input.frequency
    );
    if let Some(role) = &input.sport_role {
        description.push_str(&format!(" Sport focus: {} ({}).", role.sport, role.role));
    }
    if let Some(disability) = &input.disability_type {
        description.push_str(&format!(" Adapted for: {}.", disability));
    }
    if !input.pain_areas.is_empty() {
        let areas: Vec<&str> = input.pain_areas.iter().map(|a| a.as_str()).collect();
        description.push_str(&format!(" Adjusted for pain in: {}.", areas.join(", ")));
    }
    description
}

/// Slot resolver used during generation
struct GeneratorSlots<'g> {
    substitution: SubstitutionResolver<'g>,
    catalog: &'g Catalog,
    input: &'g ProgramInput,
    goal: GoalConfig,
    level: LevelConfig,
}

impl GeneratorSlots<'_> {
    /// Sets from level policy scaled by the goal multiplier
    fn policy_sets(&self, category: ExerciseCategory) -> u32 {
        let base = match category {
            ExerciseCategory::Compound => self.level.compound_sets,
            _ => self.level.accessory_sets,
        };
        let scaled = (f64::from(base) * self.goal.set_multiplier).round() as u32;
        scaled.max(MIN_SETS)
    }

    fn policy_rest(&self, category: ExerciseCategory) -> u32 {
        self.goal.rest.for_category(category) + self.level.rest_offset_seconds
    }

    fn category_note(&self, category: ExerciseCategory) -> String {
        format!("{} - {}", self.goal.name, category)
    }

    /// Working weight for a loadable context with a known 1RM
    fn working_weight(&self, pattern: PatternId, context: &ContextVariant) -> Option<f64> {
        if !matches!(context.source, VariantSource::Gym | VariantSource::HomeEquipment) {
            return None;
        }
        let one_rep_max = assessed_one_rep_max(self.input.assessment_for(pattern)?)?;
        let weight = target_weight(one_rep_max, self.level.start_percentage);
        Some(match context.max_load_kg {
            Some(cap) => weight.min(cap),
            None => weight,
        })
    }
}

impl SlotResolver for GeneratorSlots<'_> {
    fn resolve(&self, slot: &Slot) -> Option<Exercise> {
        let pattern = self
            .substitution
            .for_pain_areas(slot.pattern, &self.input.pain_areas)?;
        let category = self.catalog.pattern(pattern)?.category;

        let ctx = TrainingContext {
            goal: self.input.goal,
            level: self.input.level,
            location: self.input.location,
            equipment: &self.input.equipment,
            week_number: TEMPLATE_WEEK,
        };
        let assessment = self.input.assessment_for(pattern);

        let mut exercise = match self.substitution.resolve(pattern, &ctx, assessment)? {
            Resolution::Context(context) => Exercise {
                weight_kg: self.working_weight(pattern, &context),
                name: context.name,
                pattern: Some(pattern),
                category,
                sets: self.policy_sets(category),
                reps: self.goal.default_reps.clone(),
                rest_seconds: self.policy_rest(category),
                notes: self.category_note(category),
            },
            Resolution::Bodyweight(BodyweightChoice::Selected(selected)) => Exercise {
                sets: if self.input.goal == Goal::Strength {
                    selected.sets
                } else {
                    self.policy_sets(category)
                },
                name: selected.name,
                pattern: Some(pattern),
                category,
                reps: selected.reps,
                rest_seconds: self.policy_rest(category),
                notes: selected.notes,
                weight_kg: None,
            },
            Resolution::Bodyweight(BodyweightChoice::Fallback(fallback)) => {
                return Some(Exercise {
                    name: fallback.name,
                    pattern: Some(pattern),
                    category,
                    sets: fallback.sets,
                    reps: fallback.reps,
                    rest_seconds: fallback.rest_seconds,
                    notes: self.category_note(category),
                    weight_kg: None,
                });
            }
        };

        if category == ExerciseCategory::Core {
            exercise.sets = ((f64::from(exercise.sets) * CORE_SET_FACTOR).round() as u32).max(MIN_SETS);
        }

        tracing::debug!(
            "Day {}: {:?} -> '{}' {}x{} rest {}s",
            slot.day,
            slot.pattern,
            exercise.name,
            exercise.sets,
            exercise.reps,
            exercise.rest_seconds
        );
        Some(exercise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_default_catalog;
    use crate::volume::VolumeProfile;
    use crate::{Assessment, BodyArea, Equipment, Level, Location, Reps, SportRole};

    fn input(goal: Goal, level: Level, location: Location, frequency: u32) -> ProgramInput {
        ProgramInput {
            goal,
            level,
            location,
            equipment: Equipment::default(),
            frequency,
            pain_areas: vec![],
            assessments: vec![],
            disability_type: None,
            sport_role: None,
        }
    }

    fn generator() -> ProgramGenerator<'static> {
        ProgramGenerator::new(get_default_catalog(), Config::default()).unwrap()
    }

    #[test]
    fn test_corrupt_catalog_cannot_generate() {
        let mut catalog = crate::catalog::build_default_catalog();
        catalog
            .patterns
            .get_mut(&PatternId::Squat)
            .unwrap()
            .ladders
            .get_mut(&Goal::Strength)
            .unwrap()[2]
            .level = 7;

        let result = ProgramGenerator::new(&catalog, Config::default());
        assert!(matches!(result, Err(Error::CatalogValidation(_))));
    }

    #[test]
    fn test_incoherent_config_is_rejected() {
        let mut config = Config::default();
        config.pain.hard_block_threshold = 3;
        let result = ProgramGenerator::new(get_default_catalog(), config);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let mut profile = input(Goal::MuscleGain, Level::Intermediate, Location::Home, 4);
        profile.equipment.dumbbell_max_kg = 20.0;
        profile.pain_areas = vec![BodyArea::Knee];
        profile.assessments.push(Assessment {
            pattern: PatternId::HorizontalPull,
            variant: None,
            max_reps: 8,
            one_rep_max: None,
            weight: Some(18.0),
        });

        let first = serde_json::to_string(&generator().generate(&profile).unwrap()).unwrap();
        let second = serde_json::to_string(&generator().generate(&profile.clone()).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_program_shape_for_frequency() {
        let program = generator()
            .generate(&input(Goal::Strength, Level::Beginner, Location::Gym, 3))
            .unwrap();
        assert_eq!(program.split, SplitType::FullBody);
        assert_eq!(program.name, "Strength - FULL_BODY");
        assert_eq!(program.days_per_week, 3);
        assert_eq!(program.weekly_schedule.len(), 3);
        assert_eq!(program.total_weeks, 6);
        assert_eq!(program.deload_week, Some(5));

        let ppl = generator()
            .generate(&input(Goal::Toning, Level::Advanced, Location::Gym, 6))
            .unwrap();
        assert_eq!(ppl.split, SplitType::Ppl);
        assert_eq!(ppl.weekly_schedule.len(), 6);
    }

    #[test]
    fn test_frequency_out_of_range_is_rejected() {
        let gen = generator();
        for frequency in [0, 8] {
            let result = gen.generate(&input(Goal::Toning, Level::Beginner, Location::Gym, frequency));
            assert!(matches!(result, Err(Error::InvalidInput(_))));
        }
    }

    #[test]
    fn test_gym_policy_sets_rest_and_weight() {
        let mut profile = input(Goal::MuscleGain, Level::Beginner, Location::Gym, 3);
        profile.assessments.push(Assessment {
            pattern: PatternId::Squat,
            variant: None,
            max_reps: 0,
            one_rep_max: Some(100.0),
            weight: None,
        });
        let program = generator().generate(&profile).unwrap();
        let day1 = &program.weekly_schedule[0];

        let squat = &day1.exercises[0];
        assert_eq!(squat.name, "Barbell Back Squat");
        // round(3 * 1.2)
        assert_eq!(squat.sets, 4);
        assert_eq!(squat.reps, Reps::Range(12, 25));
        // 90 + beginner offset
        assert_eq!(squat.rest_seconds, 105);
        assert_eq!(squat.weight_kg, Some(70.0));
        assert_eq!(squat.notes, "Muscle Gain - compound");

        let core = day1.exercises.last().unwrap();
        assert_eq!(core.category, ExerciseCategory::Core);
        assert_eq!(core.name, "Hanging Leg Raise");
        // accessory 2 * 1.2 -> 2, core share floors at 2
        assert_eq!(core.sets, 2);
    }

    #[test]
    fn test_home_equipment_weight_is_capped() {
        let mut profile = input(Goal::Toning, Level::Advanced, Location::Home, 3);
        profile.equipment.dumbbell_max_kg = 20.0;
        profile.assessments.push(Assessment {
            pattern: PatternId::Squat,
            variant: None,
            max_reps: 0,
            one_rep_max: Some(80.0),
            weight: None,
        });
        let program = generator().generate(&profile).unwrap();
        let squat = &program.weekly_schedule[0].exercises[0];
        assert_eq!(squat.name, "Goblet Squat");
        assert_eq!(squat.weight_kg, Some(20.0));
    }

    #[test]
    fn test_home_equipment_variant_takes_goal_and_level_policy() {
        let at_home = |goal, level| {
            let mut profile = input(goal, level, Location::Home, 3);
            profile.equipment.dumbbell_max_kg = 20.0;
            let program = generator().generate(&profile).unwrap();
            program.weekly_schedule[0].exercises[0].clone()
        };

        let beginner = at_home(Goal::Toning, Level::Beginner);
        let advanced = at_home(Goal::Toning, Level::Advanced);
        let fat_loss = at_home(Goal::FatLoss, Level::Advanced);

        assert_eq!(beginner.name, "Goblet Squat");
        assert_eq!(advanced.name, "Goblet Squat");
        assert_eq!(fat_loss.name, "Goblet Squat");
        assert_eq!(beginner.rest_seconds, advanced.rest_seconds + 15);
        assert!(beginner.sets < advanced.sets);
        assert_ne!(advanced.notes, fat_loss.notes);
    }

    #[test]
    fn test_home_strength_runs_progression() {
        let mut profile = input(Goal::Strength, Level::Beginner, Location::Home, 3);
        profile.assessments.push(Assessment {
            pattern: PatternId::HorizontalPush,
            variant: Some("Push-up".into()),
            max_reps: 12,
            one_rep_max: None,
            weight: None,
        });
        let program = generator().generate(&profile).unwrap();
        let push = &program.weekly_schedule[0].exercises[1];
        assert_eq!(push.name, "Diamond Push-up");
        assert_eq!(push.sets, 3);
        assert_eq!(push.reps.to_string(), "3-3-3");
        assert_eq!(push.rest_seconds, 195);
        assert!(push.notes.contains("unlocked"));
    }

    #[test]
    fn test_motor_recovery_at_home_uses_fallback() {
        let program = generator()
            .generate(&input(Goal::MotorRecovery, Level::Beginner, Location::Home, 2))
            .unwrap();
        for exercise in program.weekly_schedule.iter().flat_map(|d| &d.exercises) {
            assert_eq!(exercise.sets, 3);
            assert_eq!(exercise.reps, Reps::Range(8, 12));
            assert_eq!(exercise.rest_seconds, 90);
        }
        assert_eq!(program.weekly_schedule[0].exercises[0].name, "Squat");
    }

    #[test]
    fn test_pain_areas_substitute_and_dedupe() {
        let mut profile = input(Goal::Toning, Level::Beginner, Location::Gym, 4);
        profile.pain_areas = vec![BodyArea::Knee];
        let program = generator().generate(&profile).unwrap();

        let lower = &program.weekly_schedule[1];
        let names: Vec<&str> = lower.exercises.iter().map(|e| e.name.as_str()).collect();
        // squat, front squat and lunge all collapse onto the hinge
        assert_eq!(names, vec!["Barbell Romanian Deadlift", "Hanging Leg Raise"]);
        assert!(program.description.contains("knee"));
    }

    #[test]
    fn test_description_mentions_sport_role() {
        let mut profile = input(Goal::Performance, Level::Intermediate, Location::Gym, 3);
        profile.sport_role = Some(SportRole {
            sport: "football".into(),
            role: "goalkeeper".into(),
        });
        let program = generator().generate(&profile).unwrap();
        assert!(program.description.contains("football (goalkeeper)"));
        assert_eq!(program.total_weeks, 8);
    }

    #[test]
    fn test_generate_with_volume_rescales_sets() {
        let profile = input(Goal::MuscleGain, Level::Intermediate, Location::Gym, 3);
        let recommendations = VolumeProfile::new(Level::Intermediate).recommend_all(Goal::MuscleGain);
        let program = generator()
            .generate_with_volume(&profile, &recommendations)
            .unwrap();

        for exercise in program.weekly_schedule.iter().flat_map(|d| &d.exercises) {
            assert!((2..=6).contains(&exercise.sets), "{:?}", exercise);
        }
        // Chest: MEV 8 maintained, trained on every day that has a horizontal push
        let bench = program.weekly_schedule[0]
            .exercises
            .iter()
            .find(|e| e.pattern == Some(PatternId::HorizontalPush))
            .unwrap();
        let chest_days = program
            .weekly_schedule
            .iter()
            .filter(|d| d.exercises.iter().any(|e| e.pattern == Some(PatternId::HorizontalPush)))
            .count() as u32;
        assert_eq!(bench.sets, distribute_sets_per_session(8, chest_days, 1));
    }
}
