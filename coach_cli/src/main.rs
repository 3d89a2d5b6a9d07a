use chrono::Utc;
use clap::{Parser, Subcommand};
use coach_core::autoregulation::AdjustmentPlan;
use coach_core::pain::{PainAction, UserOption};
use coach_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "coach")]
#[command(about = "Adaptive training program coach", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override config file location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a program from a profile (TOML or JSON)
    Generate {
        /// Profile file
        #[arg(long)]
        input: PathBuf,

        /// Print the program as JSON
        #[arg(long)]
        json: bool,

        /// Also export one row per scheduled exercise to CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Replay discomfort reports for one exercise in a fresh session
    Pain {
        /// Exercise name
        #[arg(long)]
        exercise: String,

        /// Comma-separated pain levels (0-10)
        #[arg(long, value_delimiter = ',', required = true)]
        levels: Vec<u8>,
    },

    /// Show the autoregulation decision for one set
    Feedback {
        /// Training goal (strength, muscle_gain, toning, ...)
        #[arg(long)]
        goal: String,

        /// 1-based set number
        #[arg(long)]
        set: u32,

        /// Sets prescribed for the exercise
        #[arg(long)]
        total_sets: u32,

        /// Perceived effort (0-10)
        #[arg(long)]
        rpe: Option<f64>,

        /// The set was not completed
        #[arg(long)]
        failed: bool,

        /// Exercise performed
        #[arg(long, default_value = "Push-up")]
        exercise: String,

        /// Current tempo (name, id or e.g. 2-0-1-0)
        #[arg(long, default_value = "standard")]
        tempo: String,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    coach_core::logging::init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Generate { input, json, csv } => cmd_generate(&input, json, csv, &config),
        Commands::Pain { exercise, levels } => cmd_pain(&exercise, &levels, &config),
        Commands::Feedback {
            goal,
            set,
            total_sets,
            rpe,
            failed,
            exercise,
            tempo,
        } => cmd_feedback(&goal, set, total_sets, rpe, failed, &exercise, &tempo, &config),
    }
}

fn load_catalog() -> Result<&'static Catalog> {
    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
    }
    load_default_catalog()
}

fn read_profile(path: &Path) -> Result<ProgramInput> {
    let contents = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(&contents)?)
    } else {
        Ok(toml::from_str(&contents)?)
    }
}

fn cmd_generate(input: &Path, json: bool, csv: Option<PathBuf>, config: &Config) -> Result<()> {
    let catalog = load_catalog()?;
    let profile = read_profile(input)?;

    let generator = ProgramGenerator::new(catalog, config.clone())?;
    let program = generator.generate(&profile)?;
    tracing::info!(
        "Generated '{}' from {}: {} days",
        program.name,
        input.display(),
        program.weekly_schedule.len()
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&program)?);
    } else {
        display_program(&program);
    }

    if let Some(path) = csv {
        let rows = export_csv(&program, &path)?;
        if !json {
            println!("✓ Exported {} exercises to {}", rows, path.display());
        }
    }

    Ok(())
}

fn export_csv(program: &Program, path: &Path) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path).map_err(std::io::Error::from)?;
    writer
        .write_record(["day", "exercise", "sets", "reps", "rest", "weight", "notes"])
        .map_err(std::io::Error::from)?;

    let mut rows = 0;
    for day in &program.weekly_schedule {
        for exercise in &day.exercises {
            writer
                .write_record([
                    day.day_name.clone(),
                    exercise.name.clone(),
                    exercise.sets.to_string(),
                    exercise.reps.to_string(),
                    exercise.rest_seconds.to_string(),
                    exercise.weight_kg.map(|w| w.to_string()).unwrap_or_default(),
                    exercise.notes.clone(),
                ])
                .map_err(std::io::Error::from)?;
            rows += 1;
        }
    }
    writer.flush()?;
    tracing::info!("Exported {} exercises to {}", rows, path.display());
    Ok(rows)
}

fn cmd_pain(exercise: &str, levels: &[u8], config: &Config) -> Result<()> {
    let engine = PainEngine::new(config.pain.clone());
    let mut store = PainSessionStore::new();
    let session_id = uuid::Uuid::new_v4();
    let session = store.start(session_id, Utc::now());

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  PAIN SESSION");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", exercise);
    println!();

    for (i, &level) in levels.iter().enumerate() {
        let report = DiscomfortReport {
            exercise_name: exercise.to_string(),
            pain_level: level,
            area: None,
        };
        let decision = engine.report(session, &report, Utc::now());
        tracing::debug!("Replayed pain report {} for '{}'", level, exercise);
        display_pain_decision(i + 1, &decision);
    }

    if let Some(ended) = store.end(session_id) {
        let referrals = ended.physio_referrals();
        if !referrals.is_empty() {
            println!("  ℹ Physio referral: {}", referrals.join(", "));
        }
    }
    println!();

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_feedback(
    goal: &str,
    set: u32,
    total_sets: u32,
    rpe: Option<f64>,
    failed: bool,
    exercise: &str,
    tempo: &str,
    config: &Config,
) -> Result<()> {
    if set == 0 || set > total_sets {
        return Err(Error::InvalidInput(format!(
            "set {} must be between 1 and {}",
            set, total_sets
        )));
    }
    if let Some(rpe) = rpe {
        if !(0.0..=10.0).contains(&rpe) {
            return Err(Error::InvalidInput(format!(
                "effort {} must be between 0 and 10",
                rpe
            )));
        }
    }

    let goal: Goal = goal.parse()?;
    let current_tempo: TempoId = tempo.parse()?;
    let catalog = load_catalog()?;

    let engine = AutoregulationEngine::new(
        ExerciseSelector::new(catalog),
        config.autoregulation.clone(),
    );
    let report = SetReport {
        exercise_name: exercise.to_string(),
        set_number: set,
        feedback: SetFeedback {
            completed: !failed,
            rpe,
            reps_done: None,
            reason: None,
        },
    };
    let ctx = ExerciseContext {
        goal,
        pattern: PatternId::from_exercise_name(exercise),
        total_sets,
        current_tempo,
    };

    let decision = engine.decide(&report, &ctx);
    display_feedback_decision(&decision);

    Ok(())
}

fn display_program(program: &Program) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", program.name);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", program.description);
    println!(
        "  {} days/week, {} weeks",
        program.days_per_week, program.total_weeks
    );
    if let Some(week) = program.deload_week {
        println!("  Deload: week {}", week);
    }

    for day in &program.weekly_schedule {
        println!();
        println!("  {}", day.day_name);
        for exercise in &day.exercises {
            let weight = exercise
                .weight_kg
                .map(|w| format!(" @ {} kg", w))
                .unwrap_or_default();
            println!(
                "  → {}: {} x {}{} (rest {}s)",
                exercise.name, exercise.sets, exercise.reps, weight, exercise.rest_seconds
            );
            if !exercise.notes.is_empty() {
                println!("      {}", exercise.notes);
            }
        }
    }
    println!();
}

fn display_pain_decision(report_number: usize, decision: &PainDecision) {
    let marker = match decision.action {
        PainAction::Continue => "✓",
        PainAction::ReduceLoad | PainAction::ReduceReps => "↓",
        PainAction::Suspend | PainAction::Screening => "⏸",
        PainAction::Blocked | PainAction::ReferToPhysio => "✗",
    };
    let options: Vec<&str> = decision
        .options
        .iter()
        .map(|o| match o {
            UserOption::Continue => "continue",
            UserOption::Reduce => "reduce",
            UserOption::SkipExercise => "skip exercise",
            UserOption::EndSession => "end session",
        })
        .collect();

    println!(
        "  {} #{} pain {}/10 [{:?}] {:?}",
        marker, report_number, decision.pain_level, decision.tier, decision.action
    );
    println!("      {}", decision.message);
    println!("      options: {}", options.join(", "));
}

fn display_feedback_decision(decision: &AutoregulationDecision) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  SET {} FEEDBACK", decision.set_number);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", decision.exercise_name);
    println!(
        "  Target effort: {:.1}-{:.1}",
        decision.band.min, decision.band.max
    );
    println!("  Adjustment: {:?} ({:?})", decision.adjustment, decision.scope);
    if let AdjustmentPlan::Tempo { tempo, .. } = &decision.plan {
        let modifier = coach_core::tempo::TempoModifier::get(*tempo);
        println!("  Tempo: {} ({})", modifier.name, modifier.describe_phases());
    }
    println!("  → {}", decision.message);
    println!();
}
