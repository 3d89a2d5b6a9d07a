//! Substitution Resolver.
//!
//! Three independent axes:
//! - Context: which name to use given location and available equipment
//! - Goal-aware bodyweight: the right progression when no equipment applies
//! - Pain area: which pattern to train instead when a loaded area hurts
//!
//! Context is checked first. Only a home user the context axis cannot serve
//! with an equipment variant goes through the goal-aware axis.

use crate::catalog::{Catalog, PatternEntry};
use crate::config::ProgramConfig;
use crate::selector::{ExerciseSelector, PrescribedExercise};
use crate::{Assessment, BodyArea, Equipment, Goal, Level, Location, PatternId, Reps};
use serde::{Deserialize, Serialize};

/// Where a context-resolved name came from
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VariantSource {
    Gym,
    HomeEquipment,
    HomeBodyweight,
    Generic,
}

/// Name chosen by the context axis
#[derive(Clone, Debug, PartialEq)]
pub struct ContextVariant {
    pub name: String,
    pub source: VariantSource,

    /// Heaviest usable load for a home-equipment variant
    pub max_load_kg: Option<f64>,
}

/// Conservative prescription when no variant can be selected
#[derive(Clone, Debug, PartialEq)]
pub struct FallbackPrescription {
    pub name: String,
    pub sets: u32,
    pub reps: Reps,
    pub rest_seconds: u32,
}

/// Outcome of the goal-aware axis
#[derive(Clone, Debug, PartialEq)]
pub enum BodyweightChoice {
    Selected(PrescribedExercise),
    Fallback(FallbackPrescription),
}

/// Composed outcome for one pattern in one training context
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    Context(ContextVariant),
    Bodyweight(BodyweightChoice),
}

/// Everything the resolver needs to know about the user
#[derive(Clone, Copy, Debug)]
pub struct TrainingContext<'a> {
    pub goal: Goal,
    pub level: Level,
    pub location: Location,
    pub equipment: &'a Equipment,
    pub week_number: u32,
}

/// Resolves names and prescriptions across the substitution axes
#[derive(Clone, Debug)]
pub struct SubstitutionResolver<'a> {
    selector: ExerciseSelector<'a>,
    fallback: ProgramConfig,
}

impl<'a> SubstitutionResolver<'a> {
    pub fn new(catalog: &'a Catalog, fallback: ProgramConfig) -> Self {
        Self {
            selector: ExerciseSelector::new(catalog),
            fallback,
        }
    }

    pub fn selector(&self) -> &ExerciseSelector<'a> {
        &self.selector
    }

    /// Context axis: pick the name for a location and equipment set
    ///
    /// `mixed` resolves like `gym`.
    pub fn for_location(
        &self,
        entry: &PatternEntry,
        location: Location,
        equipment: &Equipment,
    ) -> ContextVariant {
        let variants = &entry.locations;
        let chosen = match location {
            Location::Gym | Location::Mixed => variants
                .gym
                .as_ref()
                .map(|name| (name.clone(), VariantSource::Gym, None)),
            Location::Home => {
                let with_equipment = variants
                    .home_equipment
                    .as_ref()
                    .filter(|_| equipment.has_usable_equipment())
                    .and_then(|home| {
                        let load = home
                            .implements
                            .iter()
                            .filter_map(|i| equipment.max_load(*i))
                            .filter(|kg| *kg >= home.min_load_kg)
                            .fold(None, |acc: Option<f64>, kg| Some(acc.map_or(kg, |a| a.max(kg))))?;
                        Some((home.name.clone(), VariantSource::HomeEquipment, Some(load)))
                    });
                with_equipment.or_else(|| {
                    variants
                        .home_bodyweight
                        .as_ref()
                        .map(|name| (name.clone(), VariantSource::HomeBodyweight, None))
                })
            }
        };

        let (name, source, max_load_kg) =
            chosen.unwrap_or_else(|| (entry.name.clone(), VariantSource::Generic, None));
        tracing::debug!(
            "Context substitution {:?} at {:?}: '{}' ({:?})",
            entry.pattern,
            location,
            name,
            source
        );

        ContextVariant {
            name,
            source,
            max_load_kg,
        }
    }

    /// Goal-aware axis: the correct bodyweight progression for a pattern
    ///
    /// Falls back to the generic name at the configured prescription when
    /// the selector has nothing for the goal.
    pub fn select_bodyweight(
        &self,
        pattern: PatternId,
        goal: Goal,
        level: Level,
        week_number: u32,
        assessment: Option<&Assessment>,
    ) -> BodyweightChoice {
        match self
            .selector
            .select(pattern, level, goal, assessment, week_number)
        {
            Some(selected) => BodyweightChoice::Selected(selected),
            None => {
                let name = self
                    .selector
                    .catalog()
                    .pattern(pattern)
                    .map(|e| e.name.clone())
                    .unwrap_or_else(|| format!("{:?}", pattern));
                BodyweightChoice::Fallback(self.fallback_for(name))
            }
        }
    }

    /// Goal-aware axis for a free-text exercise name
    ///
    /// A name that maps to no pattern is kept unmodified at the fallback
    /// prescription.
    pub fn select_bodyweight_by_name(
        &self,
        exercise_name: &str,
        goal: Goal,
        level: Level,
        week_number: u32,
        assessment: Option<&Assessment>,
    ) -> BodyweightChoice {
        match PatternId::from_exercise_name(exercise_name) {
            Some(pattern) => self.select_bodyweight(pattern, goal, level, week_number, assessment),
            None => {
                tracing::warn!("No pattern for exercise '{}', using fallback", exercise_name);
                BodyweightChoice::Fallback(self.fallback_for(exercise_name.to_string()))
            }
        }
    }

    /// Compose both axes for one pattern
    ///
    /// Returns `None` only when the pattern is absent from the catalog.
    pub fn resolve(
        &self,
        pattern: PatternId,
        ctx: &TrainingContext<'_>,
        assessment: Option<&Assessment>,
    ) -> Option<Resolution> {
        let entry = self.selector.catalog().pattern(pattern)?;
        let context = self.for_location(entry, ctx.location, ctx.equipment);

        let needs_progression =
            ctx.location == Location::Home && context.source != VariantSource::HomeEquipment;
        if !needs_progression {
            return Some(Resolution::Context(context));
        }

        Some(Resolution::Bodyweight(self.select_bodyweight(
            pattern,
            ctx.goal,
            ctx.level,
            ctx.week_number,
            assessment,
        )))
    }

    /// Pain axis: pattern to train given painful areas
    ///
    /// Follows safe alternatives until a pattern loads none of the areas.
    /// `None` means the slot is dropped.
    pub fn for_pain_areas(&self, pattern: PatternId, areas: &[BodyArea]) -> Option<PatternId> {
        let catalog = self.selector.catalog();
        let mut current = pattern;
        let mut visited = vec![pattern];

        loop {
            let entry = catalog.pattern(current)?;
            let Some(area) = entry.loads.iter().find(|a| areas.contains(a)) else {
                return Some(current);
            };

            let Some(alt) = entry.safe_alternative(*area) else {
                tracing::debug!("Dropping {:?}: no safe alternative for {:?}", current, area);
                return None;
            };
            if visited.contains(&alt) {
                tracing::debug!("Dropping {:?}: alternatives cycle back", pattern);
                return None;
            }

            tracing::debug!("Pain in {:?}: {:?} -> {:?}", area, current, alt);
            visited.push(alt);
            current = alt;
        }
    }

    fn fallback_for(&self, name: String) -> FallbackPrescription {
        tracing::warn!("Fallback prescription for '{}'", name);
        FallbackPrescription {
            name,
            sets: self.fallback.fallback_sets,
            reps: self.fallback.fallback_reps.clone(),
            rest_seconds: self.fallback.fallback_rest_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_default_catalog;
    use crate::progression::ProgressionMode;

    fn resolver() -> SubstitutionResolver<'static> {
        SubstitutionResolver::new(get_default_catalog(), ProgramConfig::default())
    }

    fn squat_entry() -> &'static PatternEntry {
        get_default_catalog().pattern(PatternId::Squat).unwrap()
    }

    #[test]
    fn test_gym_and_mixed_use_gym_name() {
        let r = resolver();
        let none = Equipment::default();
        let gym = r.for_location(squat_entry(), Location::Gym, &none);
        assert_eq!(gym.name, "Barbell Back Squat");
        assert_eq!(gym.source, VariantSource::Gym);

        let mixed = r.for_location(squat_entry(), Location::Mixed, &none);
        assert_eq!(mixed, gym);
    }

    #[test]
    fn test_home_with_heavy_enough_equipment() {
        let r = resolver();
        let eq = Equipment {
            dumbbell_max_kg: 20.0,
            kettlebell_kg: vec![16.0],
            ..Default::default()
        };
        let v = r.for_location(squat_entry(), Location::Home, &eq);
        assert_eq!(v.name, "Goblet Squat");
        assert_eq!(v.source, VariantSource::HomeEquipment);
        assert_eq!(v.max_load_kg, Some(20.0));
    }

    #[test]
    fn test_home_with_too_light_equipment_uses_bodyweight() {
        let r = resolver();
        let eq = Equipment {
            dumbbell_max_kg: 6.0,
            ..Default::default()
        };
        let v = r.for_location(squat_entry(), Location::Home, &eq);
        assert_eq!(v.name, "Bodyweight Squat");
        assert_eq!(v.source, VariantSource::HomeBodyweight);
    }

    #[test]
    fn test_generic_name_kept_when_nothing_resolves() {
        let r = resolver();
        let plank = get_default_catalog().pattern(PatternId::Plank).unwrap();
        let v = r.for_location(plank, Location::Gym, &Equipment::default());
        assert_eq!(v.name, "Plank");
        assert_eq!(v.source, VariantSource::Generic);
    }

    #[test]
    fn test_home_without_equipment_runs_progression() {
        let r = resolver();
        let eq = Equipment::default();
        let ctx = TrainingContext {
            goal: Goal::Strength,
            level: Level::Beginner,
            location: Location::Home,
            equipment: &eq,
            week_number: 1,
        };
        match r.resolve(PatternId::HorizontalPush, &ctx, None).unwrap() {
            Resolution::Bodyweight(BodyweightChoice::Selected(s)) => {
                assert_eq!(s.name, "Incline Push-up");
                assert_eq!(s.mode, ProgressionMode::Linear);
            }
            other => panic!("unexpected resolution {:?}", other),
        }
    }

    #[test]
    fn test_home_with_equipment_but_no_variant_runs_progression() {
        let r = resolver();
        let eq = Equipment {
            dumbbell_max_kg: 30.0,
            ..Default::default()
        };
        let ctx = TrainingContext {
            goal: Goal::MuscleGain,
            level: Level::Intermediate,
            location: Location::Home,
            equipment: &eq,
            week_number: 1,
        };
        match r.resolve(PatternId::VerticalPull, &ctx, None).unwrap() {
            Resolution::Bodyweight(BodyweightChoice::Selected(s)) => {
                assert_eq!(s.name, "Tempo Negative Pull-up");
            }
            other => panic!("unexpected resolution {:?}", other),
        }
    }

    #[test]
    fn test_missing_ladder_falls_back_to_generic() {
        let r = resolver();
        match r.select_bodyweight(PatternId::Squat, Goal::MotorRecovery, Level::Beginner, 1, None) {
            BodyweightChoice::Fallback(f) => {
                assert_eq!(f.name, "Squat");
                assert_eq!(f.sets, 3);
                assert_eq!(f.reps, Reps::Range(8, 12));
                assert_eq!(f.rest_seconds, 90);
            }
            other => panic!("expected fallback, got {:?}", other),
        }
    }

    #[test]
    fn test_bodyweight_by_name() {
        let r = resolver();
        match r.select_bodyweight_by_name("Panca Piana", Goal::Toning, Level::Beginner, 1, None) {
            BodyweightChoice::Selected(s) => assert_eq!(s.pattern, PatternId::HorizontalPush),
            other => panic!("unexpected {:?}", other),
        }
        match r.select_bodyweight_by_name("Jumping Jacks", Goal::Toning, Level::Beginner, 1, None) {
            BodyweightChoice::Fallback(f) => assert_eq!(f.name, "Jumping Jacks"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_pain_areas_follow_alternatives() {
        let r = resolver();
        assert_eq!(
            r.for_pain_areas(PatternId::Squat, &[BodyArea::Knee]),
            Some(PatternId::HipHinge)
        );
        // knee -> hinge -> lunge -> hinge
        assert_eq!(
            r.for_pain_areas(PatternId::Squat, &[BodyArea::Knee, BodyArea::LowerBack]),
            None
        );
        assert_eq!(r.for_pain_areas(PatternId::Squat, &[BodyArea::Hip]), None);
        assert_eq!(
            r.for_pain_areas(PatternId::DeadBug, &[BodyArea::Knee]),
            Some(PatternId::DeadBug)
        );
    }
}
