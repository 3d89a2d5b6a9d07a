//! Default catalog of movement patterns, variant ladders and policy tables.
//!
//! The catalog is read-only data: every pattern carries its ordered variant
//! ladders per goal, the names used in each training context, the body areas
//! it loads and the pattern to swap in when one of those areas hurts.

use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Cached default catalog, checked for integrity before it is handed out
pub fn load_default_catalog() -> Result<&'static Catalog> {
    let catalog = get_default_catalog();
    catalog.ensure_valid()?;
    Ok(catalog)
}

// ============================================================================
// Catalog Types
// ============================================================================

/// One step on a difficulty ladder
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseVariant {
    pub name: String,
    pub pattern: PatternId,

    /// 1-based difficulty level, contiguous within a ladder
    pub level: u32,

    /// Max reps required to promote past this variant (strength ladders)
    #[serde(default)]
    pub unlock_reps: Option<u32>,

    /// Prescribed rep range (non-strength ladders)
    #[serde(default)]
    pub reps: Option<Reps>,
}

/// Home variant that needs a loadable implement
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HomeEquipmentVariant {
    pub name: String,

    /// Any one of these implements is enough
    pub implements: Vec<Implement>,

    /// Lightest load that makes the variant worthwhile
    pub min_load_kg: f64,
}

/// Names used for a pattern in each training context
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LocationVariants {
    pub gym: Option<String>,
    pub home_equipment: Option<HomeEquipmentVariant>,
    pub home_bodyweight: Option<String>,
}

/// Catalog entry for a movement pattern
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PatternEntry {
    pub pattern: PatternId,

    /// Generic exercise name, kept when nothing more specific resolves
    pub name: String,

    pub category: ExerciseCategory,

    /// Body areas this pattern puts under load
    pub loads: Vec<BodyArea>,

    /// Ordered variant ladders per goal
    pub ladders: HashMap<Goal, Vec<ExerciseVariant>>,

    pub locations: LocationVariants,

    /// Pattern to use instead when the user reports pain in an area
    pub safe_alternatives: Vec<(BodyArea, PatternId)>,
}

impl PatternEntry {
    pub fn ladder(&self, goal: Goal) -> Option<&[ExerciseVariant]> {
        self.ladders
            .get(&goal)
            .map(|v| v.as_slice())
            .filter(|v| !v.is_empty())
    }

    pub fn safe_alternative(&self, area: BodyArea) -> Option<PatternId> {
        self.safe_alternatives
            .iter()
            .find(|(a, _)| *a == area)
            .map(|(_, p)| *p)
    }
}

/// The full catalog
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Catalog {
    pub patterns: HashMap<PatternId, PatternEntry>,
}

impl Catalog {
    pub fn pattern(&self, pattern: PatternId) -> Option<&PatternEntry> {
        self.patterns.get(&pattern)
    }

    /// Variant ladder for (pattern, goal), `None` when the catalog has no entry
    pub fn ladder(&self, pattern: PatternId, goal: Goal) -> Option<&[ExerciseVariant]> {
        self.pattern(pattern).and_then(|e| e.ladder(goal))
    }

    /// Find a variant by name across every ladder of a pattern (case-insensitive)
    pub fn find_variant(&self, pattern: PatternId, goal: Goal, name: &str) -> Option<&ExerciseVariant> {
        let wanted = name.trim().to_lowercase();
        self.ladder(pattern, goal)?
            .iter()
            .find(|v| v.name.to_lowercase() == wanted)
    }

    /// Safe alternative pattern for a painful area, `None` means drop the slot
    pub fn safe_alternative(&self, pattern: PatternId, area: BodyArea) -> Option<PatternId> {
        self.pattern(pattern).and_then(|e| e.safe_alternative(area))
    }

    /// Validate catalog integrity
    ///
    /// Returns a list of every violation found (empty if valid)
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for id in PatternId::ALL {
            if !self.patterns.contains_key(&id) {
                errors.push(format!("Pattern {:?} missing from catalog", id));
            }
        }

        // Sorted so the error list itself is deterministic
        let mut entries: Vec<&PatternEntry> = self.patterns.values().collect();
        entries.sort_by_key(|e| e.pattern);

        for entry in entries {
            let id = entry.pattern;
            if entry.name.trim().is_empty() {
                errors.push(format!("Pattern {:?}: empty display name", id));
            }

            let mut goals: Vec<&Goal> = entry.ladders.keys().collect();
            goals.sort();
            for goal in goals {
                let ladder = &entry.ladders[goal];
                if ladder.is_empty() {
                    errors.push(format!("Pattern {:?}/{}: empty ladder", id, goal));
                    continue;
                }

                let mut last_unlock = 0;
                for (idx, variant) in ladder.iter().enumerate() {
                    let expected = idx as u32 + 1;
                    if variant.level != expected {
                        errors.push(format!(
                            "Pattern {:?}/{}: variant '{}' has level {}, expected {}",
                            id, goal, variant.name, variant.level, expected
                        ));
                    }
                    if variant.pattern != id {
                        errors.push(format!(
                            "Pattern {:?}/{}: variant '{}' tagged {:?}",
                            id, goal, variant.name, variant.pattern
                        ));
                    }
                    if variant.name.trim().is_empty() {
                        errors.push(format!("Pattern {:?}/{}: variant with empty name", id, goal));
                    }
                    if let Some(unlock) = variant.unlock_reps {
                        if unlock < last_unlock {
                            errors.push(format!(
                                "Pattern {:?}/{}: unlock reps {} < previous {}",
                                id, goal, unlock, last_unlock
                            ));
                        }
                        last_unlock = unlock;
                    }
                    if let Some(Reps::Range(lo, hi)) = variant.reps {
                        if lo > hi {
                            errors.push(format!(
                                "Pattern {:?}/{}: variant '{}' min reps {} > max {}",
                                id, goal, variant.name, lo, hi
                            ));
                        }
                    }
                    if *goal != Goal::Strength && variant.reps.is_none() {
                        errors.push(format!(
                            "Pattern {:?}/{}: variant '{}' has no rep range",
                            id, goal, variant.name
                        ));
                    }
                }
            }

            for (area, alt) in &entry.safe_alternatives {
                if *alt == id {
                    errors.push(format!(
                        "Pattern {:?}: safe alternative for {:?} is itself",
                        id, area
                    ));
                }
                if !self.patterns.contains_key(alt) {
                    errors.push(format!(
                        "Pattern {:?}: safe alternative {:?} not in catalog",
                        id, alt
                    ));
                }
            }

            if let Some(home) = &entry.locations.home_equipment {
                if home.implements.is_empty() {
                    errors.push(format!(
                        "Pattern {:?}: home variant '{}' lists no implements",
                        id, home.name
                    ));
                }
            }
        }

        errors
    }

    /// Turn any violation into a fatal error
    pub fn ensure_valid(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            tracing::warn!("Catalog failed validation with {} errors", errors.len());
            Err(Error::CatalogValidation(errors.join("; ")))
        }
    }

    /// Validate and hand the catalog back
    pub fn validated(self) -> Result<Self> {
        self.ensure_valid()?;
        Ok(self)
    }
}

// ============================================================================
// Goal and Level Policy
// ============================================================================

/// Rest in seconds by exercise category
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RestPolicy {
    pub compound: u32,
    pub accessory: u32,
    pub isolation: u32,
    pub core: u32,
}

impl RestPolicy {
    pub fn for_category(&self, category: ExerciseCategory) -> u32 {
        match category {
            ExerciseCategory::Compound => self.compound,
            ExerciseCategory::Accessory => self.accessory,
            ExerciseCategory::Isolation => self.isolation,
            ExerciseCategory::Core => self.core,
        }
    }
}

/// Per-goal prescription policy
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GoalConfig {
    pub goal: Goal,
    pub name: String,
    pub default_reps: Reps,
    pub rest: RestPolicy,
    pub set_multiplier: f64,
    pub target_rir: Option<u32>,
    pub unlock_threshold: Option<u32>,
    pub start_reps: Option<u32>,
}

/// Per-level prescription policy
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LevelConfig {
    pub level: Level,
    pub numeric: u32,
    pub target_rir: u32,
    pub compound_sets: u32,
    pub accessory_sets: u32,

    /// Fraction of 1RM used for the first working weight
    pub start_percentage: f64,

    pub rest_offset_seconds: u32,
}

/// Policy table for a goal
pub fn goal_config(goal: Goal) -> GoalConfig {
    let (name, default_reps, rest, set_multiplier, target_rir) = match goal {
        Goal::Strength => ("Strength", Reps::Range(3, 5), rest(180, 150, 120, 90), 1.0, None),
        Goal::MuscleGain => ("Muscle Gain", Reps::Range(12, 25), rest(90, 75, 60, 60), 1.2, Some(1)),
        Goal::Toning => ("Toning", Reps::Range(15, 25), rest(90, 75, 60, 60), 1.0, Some(3)),
        Goal::FatLoss => ("Fat Loss", Reps::Range(15, 20), rest(45, 30, 30, 30), 0.8, None),
        Goal::Performance => ("Performance", Reps::Range(4, 8), rest(180, 120, 90, 90), 1.0, None),
        Goal::MotorRecovery => ("Motor Recovery", Reps::Range(8, 12), rest(120, 90, 75, 60), 0.8, None),
    };

    let (unlock_threshold, start_reps) = match goal {
        Goal::Strength => (Some(12), Some(3)),
        _ => (None, None),
    };

    GoalConfig {
        goal,
        name: name.to_string(),
        default_reps,
        rest,
        set_multiplier,
        target_rir,
        unlock_threshold,
        start_reps,
    }
}

/// Policy table for an experience level
pub fn level_config(level: Level) -> LevelConfig {
    let (target_rir, compound_sets, accessory_sets, start_percentage, rest_offset_seconds) =
        match level {
            Level::Beginner => (3, 3, 2, 0.70, 15),
            Level::Intermediate => (2, 4, 3, 0.85, 0),
            Level::Advanced => (1, 5, 3, 0.90, 0),
        };

    LevelConfig {
        level,
        numeric: level.numeric(),
        target_rir,
        compound_sets,
        accessory_sets,
        start_percentage,
        rest_offset_seconds,
    }
}

fn rest(compound: u32, accessory: u32, isolation: u32, core: u32) -> RestPolicy {
    RestPolicy {
        compound,
        accessory,
        isolation,
        core,
    }
}

// ============================================================================
// Boundary Name Resolution
// ============================================================================

/// Keyword rules for mapping free-text exercise names to patterns.
///
/// Order is precedence: the first rule whose keyword appears in the
/// lowercased name wins.
const NAME_RULES: &[(&str, PatternId)] = &[
    ("front squat", PatternId::FrontSquat),
    ("leg press", PatternId::Squat),
    ("squat", PatternId::Squat),
    ("pistol", PatternId::Squat),
    ("lunge", PatternId::Lunge),
    ("affondi", PatternId::Lunge),
    ("step-up", PatternId::Lunge),
    ("romanian", PatternId::HipHinge),
    ("rdl", PatternId::HipHinge),
    ("deadlift", PatternId::HipHinge),
    ("stacco", PatternId::HipHinge),
    ("glute bridge", PatternId::HipHinge),
    ("hip thrust", PatternId::HipHinge),
    ("face pull", PatternId::FacePull),
    ("chin", PatternId::ChinUp),
    ("pull-up", PatternId::VerticalPull),
    ("pullup", PatternId::VerticalPull),
    ("pull up", PatternId::VerticalPull),
    ("trazioni", PatternId::VerticalPull),
    ("lat ", PatternId::VerticalPull),
    ("row", PatternId::HorizontalPull),
    ("rematore", PatternId::HorizontalPull),
    ("dip", PatternId::Dip),
    ("incline", PatternId::InclinePush),
    ("military", PatternId::VerticalPush),
    ("overhead", PatternId::VerticalPush),
    ("shoulder press", PatternId::VerticalPush),
    ("pike", PatternId::VerticalPush),
    ("handstand", PatternId::VerticalPush),
    ("bench", PatternId::HorizontalPush),
    ("panca", PatternId::HorizontalPush),
    ("push-up", PatternId::HorizontalPush),
    ("push up", PatternId::HorizontalPush),
    ("pushup", PatternId::HorizontalPush),
    ("press", PatternId::HorizontalPush),
    ("plank", PatternId::Plank),
    ("leg raise", PatternId::LegRaise),
    ("dead bug", PatternId::DeadBug),
    ("bird dog", PatternId::BirdDog),
    ("push", PatternId::HorizontalPush),
    ("pull", PatternId::VerticalPull),
];

impl PatternId {
    /// Resolve a free-text exercise name to its pattern
    ///
    /// Only used at the boundary (assessment imports, CLI arguments). Catalog
    /// entries are tagged directly and never go through this.
    pub fn from_exercise_name(name: &str) -> Option<PatternId> {
        let lower = name.to_lowercase();
        NAME_RULES
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, pattern)| *pattern)
    }
}

// ============================================================================
// Default Catalog
// ============================================================================

/// Strength base ladder per pattern: variant name and unlock reps
fn strength_steps(pattern: PatternId) -> &'static [(&'static str, u32)] {
    match pattern {
        PatternId::Squat => &[
            ("Bodyweight Squat", 12),
            ("Bulgarian Split Squat", 12),
            ("Skater Squat", 12),
            ("Assisted Pistol Squat", 12),
            ("Shrimp Squat", 12),
            ("Pistol Squat", 15),
        ],
        PatternId::FrontSquat => &[
            ("Prisoner Squat", 12),
            ("Pause Squat", 12),
            ("Cossack Squat", 12),
            ("Assisted Shrimp Squat", 12),
            ("Deep Shrimp Squat", 15),
        ],
        PatternId::Lunge => &[
            ("Reverse Lunge", 12),
            ("Walking Lunge", 12),
            ("Deficit Reverse Lunge", 12),
            ("Jumping Lunge", 15),
        ],
        PatternId::HipHinge => &[
            ("Glute Bridge", 12),
            ("Single Leg Glute Bridge", 12),
            ("Single Leg Romanian Deadlift", 12),
            ("Nordic Curl Negative", 12),
            ("Nordic Curl", 15),
        ],
        PatternId::HorizontalPush => &[
            ("Incline Push-up", 12),
            ("Push-up", 12),
            ("Diamond Push-up", 12),
            ("Archer Push-up", 12),
            ("One-Arm Push-up Negative", 12),
            ("One-Arm Push-up", 15),
        ],
        PatternId::InclinePush => &[
            ("Decline Push-up", 12),
            ("Feet-Elevated Push-up", 12),
            ("Feet-Elevated Archer Push-up", 15),
        ],
        PatternId::VerticalPush => &[
            ("Pike Push-up", 12),
            ("Elevated Pike Push-up", 12),
            ("Wall Handstand Push-up Negative", 12),
            ("Wall Handstand Push-up", 15),
        ],
        PatternId::Dip => &[
            ("Bench Dips", 12),
            ("Negative Dips", 12),
            ("Parallel Bar Dips", 12),
            ("Ring Dips", 15),
        ],
        PatternId::VerticalPull => &[
            ("Scapular Pull-up", 12),
            ("Negative Pull-up", 12),
            ("Band-Assisted Pull-up", 12),
            ("Pull-up", 12),
            ("Archer Pull-up", 15),
        ],
        PatternId::ChinUp => &[
            ("Negative Chin-up", 12),
            ("Chin-up", 12),
            ("Close-Grip Chin-up", 15),
        ],
        PatternId::HorizontalPull => &[
            ("Bent-Knee Inverted Row", 12),
            ("Inverted Row", 12),
            ("Feet-Elevated Inverted Row", 12),
            ("Archer Row", 15),
        ],
        PatternId::FacePull => &[
            ("Prone Y-T-W Raise", 12),
            ("Reverse Snow Angel", 12),
            ("Inverted Face Pull", 15),
        ],
        PatternId::Plank => &[
            ("Knee Plank", 12),
            ("Plank", 12),
            ("Long-Lever Plank", 15),
        ],
        PatternId::LegRaise => &[
            ("Lying Knee Raise", 12),
            ("Lying Leg Raise", 12),
            ("Hanging Leg Raise", 15),
        ],
        PatternId::DeadBug => &[
            ("Dead Bug", 12),
            ("Weighted Dead Bug", 12),
            ("Hollow Body Rock", 15),
        ],
        PatternId::BirdDog => &[
            ("Bird Dog", 12),
            ("Bird Dog Hold", 12),
            ("Plank Bird Dog", 15),
        ],
    }
}

/// Non-strength ladder styles: goal, name prefix and rep range per level
const STYLE_LADDERS: &[(Goal, &str, [(u32, u32); 3])] = &[
    (Goal::MuscleGain, "Tempo", [(12, 20), (12, 20), (12, 25)]),
    (Goal::Toning, "Controlled", [(15, 25), (15, 25), (15, 25)]),
    (Goal::FatLoss, "Circuit", [(15, 20), (15, 20), (12, 15)]),
    (Goal::Performance, "Explosive", [(4, 8), (4, 8), (4, 6)]),
];

fn build_ladders(pattern: PatternId) -> HashMap<Goal, Vec<ExerciseVariant>> {
    let steps = strength_steps(pattern);
    let mut ladders = HashMap::new();

    ladders.insert(
        Goal::Strength,
        steps
            .iter()
            .enumerate()
            .map(|(idx, (name, unlock))| ExerciseVariant {
                name: (*name).into(),
                pattern,
                level: idx as u32 + 1,
                unlock_reps: Some(*unlock),
                reps: None,
            })
            .collect(),
    );

    for (goal, prefix, ranges) in STYLE_LADDERS {
        let ladder = steps
            .iter()
            .zip(ranges.iter())
            .enumerate()
            .map(|(idx, ((name, _), (lo, hi)))| ExerciseVariant {
                name: format!("{} {}", prefix, name),
                pattern,
                level: idx as u32 + 1,
                unlock_reps: None,
                reps: Some(Reps::Range(*lo, *hi)),
            })
            .collect();
        ladders.insert(*goal, ladder);
    }

    ladders
}

fn home(name: &str, implements: &[Implement], min_load_kg: f64) -> Option<HomeEquipmentVariant> {
    Some(HomeEquipmentVariant {
        name: name.into(),
        implements: implements.to_vec(),
        min_load_kg,
    })
}

/// Builds the default catalog with every canonical pattern
pub fn build_default_catalog() -> Catalog {
    use BodyArea::*;
    use ExerciseCategory::*;
    use Implement::*;

    let mut patterns = HashMap::new();
    let mut add = |pattern: PatternId,
                   name: &str,
                   category: ExerciseCategory,
                   loads: &[BodyArea],
                   locations: LocationVariants,
                   safe_alternatives: &[(BodyArea, PatternId)]| {
        patterns.insert(
            pattern,
            PatternEntry {
                pattern,
                name: name.into(),
                category,
                loads: loads.to_vec(),
                ladders: build_ladders(pattern),
                locations,
                safe_alternatives: safe_alternatives.to_vec(),
            },
        );
    };

    // ========================================================================
    // Lower Body
    // ========================================================================

    add(
        PatternId::Squat,
        "Squat",
        Compound,
        &[Knee, Hip, LowerBack],
        LocationVariants {
            gym: Some("Barbell Back Squat".into()),
            home_equipment: home("Goblet Squat", &[Dumbbell, Kettlebell], 12.0),
            home_bodyweight: Some("Bodyweight Squat".into()),
        },
        &[(Knee, PatternId::HipHinge), (LowerBack, PatternId::Lunge)],
    );

    add(
        PatternId::FrontSquat,
        "Front Squat",
        Compound,
        &[Knee, LowerBack, Wrist],
        LocationVariants {
            gym: Some("Barbell Front Squat".into()),
            home_equipment: home("Double Kettlebell Front Squat", &[Kettlebell, Dumbbell], 12.0),
            home_bodyweight: Some("Prisoner Squat".into()),
        },
        &[
            (Knee, PatternId::HipHinge),
            (LowerBack, PatternId::Lunge),
            (Wrist, PatternId::Squat),
        ],
    );

    add(
        PatternId::Lunge,
        "Lunge",
        Accessory,
        &[Knee, Hip, Ankle],
        LocationVariants {
            gym: Some("Barbell Walking Lunge".into()),
            home_equipment: home("Dumbbell Lunge", &[Dumbbell, Kettlebell], 8.0),
            home_bodyweight: Some("Reverse Lunge".into()),
        },
        &[(Knee, PatternId::HipHinge)],
    );

    add(
        PatternId::HipHinge,
        "Romanian Deadlift",
        Compound,
        &[LowerBack, Hip],
        LocationVariants {
            gym: Some("Barbell Romanian Deadlift".into()),
            home_equipment: home("Dumbbell Romanian Deadlift", &[Dumbbell, Kettlebell, Barbell], 15.0),
            home_bodyweight: Some("Single Leg Romanian Deadlift".into()),
        },
        &[(LowerBack, PatternId::Lunge)],
    );

    // ========================================================================
    // Upper Body Push
    // ========================================================================

    add(
        PatternId::HorizontalPush,
        "Bench Press",
        Compound,
        &[Shoulder, Wrist, Elbow],
        LocationVariants {
            gym: Some("Barbell Bench Press".into()),
            home_equipment: home("Dumbbell Floor Press", &[Dumbbell, Barbell], 10.0),
            home_bodyweight: Some("Push-up".into()),
        },
        &[(Wrist, PatternId::Dip)],
    );

    add(
        PatternId::InclinePush,
        "Incline Press",
        Accessory,
        &[Shoulder, Wrist],
        LocationVariants {
            gym: Some("Incline Dumbbell Press".into()),
            home_equipment: home("Incline Dumbbell Press", &[Dumbbell], 10.0),
            home_bodyweight: Some("Decline Push-up".into()),
        },
        &[(Wrist, PatternId::Dip)],
    );

    add(
        PatternId::VerticalPush,
        "Military Press",
        Compound,
        &[Shoulder, Neck, Wrist],
        LocationVariants {
            gym: Some("Barbell Military Press".into()),
            home_equipment: home("Dumbbell Shoulder Press", &[Dumbbell, Kettlebell], 8.0),
            home_bodyweight: Some("Pike Push-up".into()),
        },
        &[
            (Shoulder, PatternId::FacePull),
            (Neck, PatternId::HorizontalPush),
        ],
    );

    add(
        PatternId::Dip,
        "Dips",
        Accessory,
        &[Shoulder, Elbow, Wrist],
        LocationVariants {
            gym: Some("Parallel Bar Dips".into()),
            home_equipment: None,
            home_bodyweight: Some("Bench Dips".into()),
        },
        &[(Shoulder, PatternId::HorizontalPush)],
    );

    // ========================================================================
    // Upper Body Pull
    // ========================================================================

    add(
        PatternId::VerticalPull,
        "Pull-up",
        Compound,
        &[Shoulder, Elbow],
        LocationVariants {
            gym: Some("Lat Pulldown".into()),
            home_equipment: None,
            home_bodyweight: Some("Negative Pull-up".into()),
        },
        &[(Shoulder, PatternId::HorizontalPull)],
    );

    add(
        PatternId::ChinUp,
        "Chin-up",
        Accessory,
        &[Shoulder, Elbow, Wrist],
        LocationVariants {
            gym: Some("Weighted Chin-up".into()),
            home_equipment: None,
            home_bodyweight: Some("Negative Chin-up".into()),
        },
        &[
            (Shoulder, PatternId::HorizontalPull),
            (Elbow, PatternId::HorizontalPull),
        ],
    );

    add(
        PatternId::HorizontalPull,
        "Barbell Row",
        Compound,
        &[LowerBack, Elbow],
        LocationVariants {
            gym: Some("Barbell Bent-Over Row".into()),
            home_equipment: home("One-Arm Dumbbell Row", &[Dumbbell, Kettlebell], 10.0),
            home_bodyweight: Some("Inverted Row".into()),
        },
        &[(LowerBack, PatternId::VerticalPull)],
    );

    add(
        PatternId::FacePull,
        "Face Pull",
        Isolation,
        &[Shoulder],
        LocationVariants {
            gym: Some("Cable Face Pull".into()),
            home_equipment: home("Dumbbell Rear Delt Fly", &[Dumbbell], 4.0),
            home_bodyweight: Some("Prone Y-T-W Raise".into()),
        },
        &[],
    );

    // ========================================================================
    // Core
    // ========================================================================

    add(
        PatternId::Plank,
        "Plank",
        Core,
        &[LowerBack, Shoulder],
        LocationVariants::default(),
        &[(Shoulder, PatternId::DeadBug)],
    );

    add(
        PatternId::LegRaise,
        "Leg Raise",
        Core,
        &[LowerBack, Hip],
        LocationVariants {
            gym: Some("Hanging Leg Raise".into()),
            home_equipment: None,
            home_bodyweight: Some("Lying Leg Raise".into()),
        },
        &[(LowerBack, PatternId::DeadBug), (Hip, PatternId::Plank)],
    );

    add(
        PatternId::DeadBug,
        "Dead Bug",
        Core,
        &[],
        LocationVariants::default(),
        &[],
    );

    add(
        PatternId::BirdDog,
        "Bird Dog",
        Core,
        &[Wrist],
        LocationVariants::default(),
        &[(Wrist, PatternId::DeadBug)],
    );

    Catalog { patterns }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_every_pattern() {
        let catalog = build_default_catalog();
        assert_eq!(catalog.patterns.len(), PatternId::ALL.len());
    }

    #[test]
    fn test_default_catalog_validates() {
        let catalog = build_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_motor_recovery_has_no_ladders() {
        let catalog = get_default_catalog();
        for id in PatternId::ALL {
            assert!(catalog.ladder(id, Goal::MotorRecovery).is_none());
        }
    }

    #[test]
    fn test_non_strength_ladders_have_rep_ranges() {
        let catalog = get_default_catalog();
        let ladder = catalog.ladder(PatternId::Squat, Goal::MuscleGain).unwrap();
        assert_eq!(ladder.len(), 3);
        assert_eq!(ladder[0].name, "Tempo Bodyweight Squat");
        assert_eq!(ladder[2].reps, Some(Reps::Range(12, 25)));
    }

    #[test]
    fn test_validate_reports_level_gap() {
        let mut catalog = build_default_catalog();
        let entry = catalog.patterns.get_mut(&PatternId::Squat).unwrap();
        entry.ladders.get_mut(&Goal::Strength).unwrap()[1].level = 5;

        let errors = catalog.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("expected 2"));
    }

    #[test]
    fn test_validate_reports_decreasing_unlock() {
        let mut catalog = build_default_catalog();
        let entry = catalog.patterns.get_mut(&PatternId::Dip).unwrap();
        entry.ladders.get_mut(&Goal::Strength).unwrap()[3].unlock_reps = Some(8);

        let errors = catalog.validate();
        assert!(errors.iter().any(|e| e.contains("unlock reps 8")));
    }

    #[test]
    fn test_validated_is_fatal_on_violation() {
        let mut catalog = build_default_catalog();
        catalog.patterns.remove(&PatternId::BirdDog);

        match catalog.validated() {
            Err(Error::CatalogValidation(msg)) => assert!(msg.contains("BirdDog")),
            other => panic!("expected catalog validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_load_default_catalog_is_checked() {
        let catalog = load_default_catalog().unwrap();
        assert!(std::ptr::eq(catalog, get_default_catalog()));

        let mut broken = build_default_catalog();
        broken.patterns.remove(&PatternId::Plank);
        assert!(matches!(broken.ensure_valid(), Err(Error::CatalogValidation(_))));
    }

    #[test]
    fn test_find_variant_is_case_insensitive() {
        let catalog = get_default_catalog();
        let variant = catalog
            .find_variant(PatternId::HorizontalPush, Goal::Strength, "diamond PUSH-UP")
            .unwrap();
        assert_eq!(variant.level, 3);
    }

    #[test]
    fn test_name_precedence() {
        assert_eq!(PatternId::from_exercise_name("Squat Press"), Some(PatternId::Squat));
        assert_eq!(
            PatternId::from_exercise_name("Barbell Front Squat"),
            Some(PatternId::FrontSquat)
        );
        assert_eq!(
            PatternId::from_exercise_name("Pike Push-up"),
            Some(PatternId::VerticalPush)
        );
        assert_eq!(
            PatternId::from_exercise_name("Panca Piana"),
            Some(PatternId::HorizontalPush)
        );
        assert_eq!(
            PatternId::from_exercise_name("Stacco Rumeno"),
            Some(PatternId::HipHinge)
        );
        assert_eq!(
            PatternId::from_exercise_name("Close-Grip Chin-up"),
            Some(PatternId::ChinUp)
        );
        assert_eq!(PatternId::from_exercise_name("Inverted Row"), Some(PatternId::HorizontalPull));
        assert_eq!(PatternId::from_exercise_name("Dead Bug"), Some(PatternId::DeadBug));
        assert_eq!(
            PatternId::from_exercise_name("Cable Pull-Through"),
            Some(PatternId::VerticalPull)
        );
        assert_eq!(PatternId::from_exercise_name("Push Jerk"), Some(PatternId::HorizontalPush));
        assert_eq!(
            PatternId::from_exercise_name("Band Pull-Apart"),
            Some(PatternId::VerticalPull)
        );
        // the bare keywords never shadow the specific rules above them
        assert_eq!(PatternId::from_exercise_name("Face Pull"), Some(PatternId::FacePull));
        assert_eq!(PatternId::from_exercise_name("Dumbbell Pullover Row"), Some(PatternId::HorizontalPull));
        assert_eq!(PatternId::from_exercise_name("Jumping Jacks"), None);
    }

    #[test]
    fn test_safe_alternatives() {
        let catalog = get_default_catalog();
        assert_eq!(
            catalog.safe_alternative(PatternId::Squat, BodyArea::Knee),
            Some(PatternId::HipHinge)
        );
        assert_eq!(
            catalog.safe_alternative(PatternId::Squat, BodyArea::LowerBack),
            Some(PatternId::Lunge)
        );
        assert_eq!(catalog.safe_alternative(PatternId::Squat, BodyArea::Hip), None);
    }

    #[test]
    fn test_policy_tables() {
        let strength = goal_config(Goal::Strength);
        assert_eq!(strength.rest.compound, 180);
        assert_eq!(strength.unlock_threshold, Some(12));

        let fat_loss = goal_config(Goal::FatLoss);
        assert_eq!(fat_loss.rest.for_category(ExerciseCategory::Core), 30);
        assert_eq!(fat_loss.set_multiplier, 0.8);

        let advanced = level_config(Level::Advanced);
        assert_eq!(advanced.compound_sets, 5);
        assert_eq!(advanced.start_percentage, 0.90);
        assert_eq!(level_config(Level::Beginner).rest_offset_seconds, 15);
    }
}
