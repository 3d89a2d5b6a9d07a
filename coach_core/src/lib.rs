#![forbid(unsafe_code)]

//! Core domain model and business logic for the adaptive training coach.
//!
//! This crate provides:
//! - Domain types (goals, levels, patterns, programs, feedback)
//! - Exercise catalog and policy tables
//! - Program generation (selection, substitution, scheduling)
//! - In-session adaptation (pain ladder, autoregulation, tempo)
//! - Weekly volume management

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod progression;
pub mod selector;
pub mod substitution;
pub mod schedule;
pub mod engine;
pub mod pain;
pub mod tempo;
pub mod autoregulation;
pub mod volume;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog, load_default_catalog, Catalog};
pub use config::Config;
pub use selector::{ExerciseSelector, PrescribedExercise};
pub use substitution::SubstitutionResolver;
pub use engine::ProgramGenerator;
pub use pain::{PainDecision, PainEngine, PainSessionStore};
pub use autoregulation::{AutoregulationDecision, AutoregulationEngine, ExerciseContext};
pub use tempo::TempoId;
pub use volume::{VolumeProfile, VolumeRecommendation};
