//! Pain Adaptation Engine.
//!
//! A per-exercise, per-session state machine driven by discomfort reports:
//!
//! ```text
//! Normal -> LoadReduced -> RepsReduced -> Suspended -> ScreeningRequired -> PhysioReferral
//! ```
//!
//! A severe report (8+ by default) forces a block before the ladder is
//! consulted and never advances it. Session state lives in a
//! [`PainSessionStore`] owned by the caller; the engine itself holds only
//! configuration.

use crate::config::PainConfig;
use crate::DiscomfortReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

pub type SessionId = Uuid;

/// Highest level on the discomfort scale
const MAX_PAIN_LEVEL: u8 = 10;

// ============================================================================
// Decision Types
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PainAction {
    Continue,
    ReduceLoad,
    ReduceReps,
    Suspend,
    Screening,
    Blocked,
    ReferToPhysio,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum WarningTier {
    None,
    Moderate,
    Strong,
    Blocked,
}

/// What the session UI may offer the user
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserOption {
    Continue,
    Reduce,
    SkipExercise,
    EndSession,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LadderState {
    Normal,
    LoadReduced,
    RepsReduced,
    Suspended,
    ScreeningRequired,
    PhysioReferral,
}

/// Outcome of one discomfort report
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PainDecision {
    pub exercise_name: String,
    pub pain_level: u8,
    pub action: PainAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_reduction_percent: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rep_reduction_percent: Option<u32>,
    pub tier: WarningTier,
    pub options: Vec<UserOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended: Option<UserOption>,
    pub state: LadderState,
    pub message: String,
}

/// Post-screening recovery protocol result, determined outside the engine
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryOutcome {
    Passed,
    Failed,
}

// ============================================================================
// Session State
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttemptAction {
    LoadReduction,
    RepReduction,
    Suspension,
    ScreeningTriggered,
    PhysioReferral,
    SevereBlock,
}

/// One recorded ladder event
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PainAttempt {
    pub timestamp: DateTime<Utc>,
    pub pain_level: u8,
    pub action: AttemptAction,
}

/// Everything that happened to one exercise in one session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExercisePainHistory {
    pub exercise_name: String,
    pub attempts: Vec<PainAttempt>,
    pub suspension_count: u32,
    pub needs_screening: bool,
    pub last_pain_level: Option<u8>,
    pub recovery_protocol_active: bool,
    /// One-way: never cleared once set
    pub refer_to_physio: bool,
}

impl ExercisePainHistory {
    pub fn new(exercise_name: impl Into<String>) -> Self {
        Self {
            exercise_name: exercise_name.into(),
            attempts: Vec::new(),
            suspension_count: 0,
            needs_screening: false,
            last_pain_level: None,
            recovery_protocol_active: false,
            refer_to_physio: false,
        }
    }

    fn count(&self, action: AttemptAction) -> usize {
        self.attempts.iter().filter(|a| a.action == action).count()
    }

    /// Current ladder state, derived from the recorded flags and attempts
    pub fn state(&self) -> LadderState {
        if self.refer_to_physio {
            LadderState::PhysioReferral
        } else if self.needs_screening {
            LadderState::ScreeningRequired
        } else if self.suspension_count > 0 {
            LadderState::Suspended
        } else if self.count(AttemptAction::RepReduction) > 0 {
            LadderState::RepsReduced
        } else if self.count(AttemptAction::LoadReduction) > 0 {
            LadderState::LoadReduced
        } else {
            LadderState::Normal
        }
    }
}

/// Pain histories for one workout session, keyed by exercise name
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionPainState {
    pub session_id: SessionId,
    pub started_at: DateTime<Utc>,
    pub exercises: BTreeMap<String, ExercisePainHistory>,
}

impl SessionPainState {
    pub fn new(session_id: SessionId, started_at: DateTime<Utc>) -> Self {
        Self {
            session_id,
            started_at,
            exercises: BTreeMap::new(),
        }
    }

    pub fn history(&self, exercise_name: &str) -> Option<&ExercisePainHistory> {
        self.exercises.get(exercise_name)
    }

    fn history_mut(&mut self, exercise_name: &str) -> &mut ExercisePainHistory {
        self.exercises
            .entry(exercise_name.to_string())
            .or_insert_with(|| ExercisePainHistory::new(exercise_name))
    }

    /// Exercises referred to a physiotherapist during this session
    pub fn physio_referrals(&self) -> Vec<&str> {
        self.exercises
            .values()
            .filter(|h| h.refer_to_physio)
            .map(|h| h.exercise_name.as_str())
            .collect()
    }
}

/// Caller-owned store of live sessions
#[derive(Debug, Default)]
pub struct PainSessionStore {
    sessions: HashMap<SessionId, SessionPainState>,
}

impl PainSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session, replacing any previous state under the same id
    pub fn start(&mut self, session_id: SessionId, now: DateTime<Utc>) -> &mut SessionPainState {
        tracing::debug!("Starting pain session {}", session_id);
        let fresh = SessionPainState::new(session_id, now);
        let slot = self.sessions.entry(session_id).or_insert_with(|| fresh.clone());
        *slot = fresh;
        slot
    }

    pub fn session(&self, session_id: SessionId) -> Option<&SessionPainState> {
        self.sessions.get(&session_id)
    }

    pub fn session_mut(&mut self, session_id: SessionId) -> Option<&mut SessionPainState> {
        self.sessions.get_mut(&session_id)
    }

    /// Clear every exercise history of a session; false if unknown
    pub fn reset(&mut self, session_id: SessionId) -> bool {
        match self.sessions.get_mut(&session_id) {
            Some(session) => {
                session.exercises.clear();
                true
            }
            None => false,
        }
    }

    /// Remove a session and hand back its final state
    pub fn end(&mut self, session_id: SessionId) -> Option<SessionPainState> {
        self.sessions.remove(&session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Evaluates discomfort reports against a session's pain state
#[derive(Clone, Debug, Default)]
pub struct PainEngine {
    config: PainConfig,
}

impl PainEngine {
    pub fn new(config: PainConfig) -> Self {
        Self { config }
    }

    /// Warning tier for a pain level
    pub fn warning_tier(&self, pain_level: u8) -> WarningTier {
        match pain_level {
            l if l >= self.config.hard_block_threshold => WarningTier::Blocked,
            l if l >= self.config.strong_warning_threshold => WarningTier::Strong,
            l if l >= self.config.moderate_threshold => WarningTier::Moderate,
            _ => WarningTier::None,
        }
    }

    fn tier_options(tier: WarningTier) -> Vec<UserOption> {
        match tier {
            WarningTier::None => vec![UserOption::Continue],
            WarningTier::Moderate => vec![
                UserOption::Reduce,
                UserOption::SkipExercise,
                UserOption::Continue,
            ],
            WarningTier::Strong => vec![
                UserOption::Reduce,
                UserOption::SkipExercise,
                UserOption::Continue,
                UserOption::EndSession,
            ],
            WarningTier::Blocked => vec![UserOption::SkipExercise, UserOption::EndSession],
        }
    }

    /// Evaluate one discomfort report
    ///
    /// The severe override is checked first and always wins; it is recorded
    /// as an attempt but leaves the ladder where it was. Levels above 10 are
    /// treated as 10.
    pub fn report(
        &self,
        session: &mut SessionPainState,
        report: &DiscomfortReport,
        now: DateTime<Utc>,
    ) -> PainDecision {
        let level = report.pain_level.min(MAX_PAIN_LEVEL);
        let tier = self.warning_tier(level);
        let cfg = &self.config;
        let history = session.history_mut(&report.exercise_name);

        let decision = |action: PainAction,
                        load: Option<u32>,
                        reps: Option<u32>,
                        options: Vec<UserOption>,
                        recommended: Option<UserOption>,
                        state: LadderState,
                        message: String| {
            PainDecision {
                exercise_name: report.exercise_name.clone(),
                pain_level: level,
                action,
                load_reduction_percent: load,
                rep_reduction_percent: reps,
                tier,
                options,
                recommended,
                state,
                message,
            }
        };

        if tier == WarningTier::Blocked {
            history.attempts.push(PainAttempt {
                timestamp: now,
                pain_level: level,
                action: AttemptAction::SevereBlock,
            });
            history.last_pain_level = Some(level);
            tracing::info!(
                "Severe pain {} on '{}': exercise blocked",
                level,
                report.exercise_name
            );
            return decision(
                PainAction::Blocked,
                None,
                None,
                Self::tier_options(WarningTier::Blocked),
                Some(UserOption::SkipExercise),
                history.state(),
                format!(
                    "Pain {}/10: stop this exercise. Skip it or end the session.",
                    level
                ),
            );
        }

        history.last_pain_level = Some(level);

        if history.refer_to_physio {
            return decision(
                PainAction::ReferToPhysio,
                None,
                None,
                Self::tier_options(WarningTier::Blocked),
                Some(UserOption::SkipExercise),
                LadderState::PhysioReferral,
                "Referred to a physiotherapist: skip this exercise until cleared.".to_string(),
            );
        }

        if level < cfg.ladder_threshold {
            return decision(
                PainAction::Continue,
                None,
                None,
                Self::tier_options(tier),
                None,
                history.state(),
                "Mild discomfort, continue with caution.".to_string(),
            );
        }

        let stop = vec![UserOption::SkipExercise, UserOption::EndSession];
        let (action, attempt, load, reps, options, message) =
            if history.count(AttemptAction::LoadReduction) == 0 {
                (
                    PainAction::ReduceLoad,
                    AttemptAction::LoadReduction,
                    Some(cfg.load_reduction_percent),
                    None,
                    Self::tier_options(tier),
                    format!("Reducing load by {}%. Try again.", cfg.load_reduction_percent),
                )
            } else if history.count(AttemptAction::RepReduction) == 0 {
                (
                    PainAction::ReduceReps,
                    AttemptAction::RepReduction,
                    None,
                    Some(cfg.rep_reduction_percent),
                    Self::tier_options(tier),
                    format!("Reducing reps by {}%. Try again.", cfg.rep_reduction_percent),
                )
            } else {
                history.suspension_count += 1;
                if history.suspension_count >= cfg.suspensions_for_screening {
                    history.needs_screening = true;
                    (
                        PainAction::Screening,
                        AttemptAction::ScreeningTriggered,
                        None,
                        None,
                        stop,
                        "Suspended again: functional screening required.".to_string(),
                    )
                } else {
                    (
                        PainAction::Suspend,
                        AttemptAction::Suspension,
                        None,
                        None,
                        stop,
                        "Suspended for today. If it happens again we will run a screening."
                            .to_string(),
                    )
                }
            };

        history.attempts.push(PainAttempt {
            timestamp: now,
            pain_level: level,
            action: attempt,
        });
        let state = history.state();
        tracing::info!(
            "Pain {} on '{}': {:?} -> {:?}",
            level,
            report.exercise_name,
            action,
            state
        );

        decision(action, load, reps, options, None, state, message)
    }

    /// Record the result of the post-screening recovery protocol
    ///
    /// Returns the new ladder state, or `None` when the exercise has no
    /// history in this session.
    pub fn record_recovery_outcome(
        &self,
        session: &mut SessionPainState,
        exercise_name: &str,
        outcome: RecoveryOutcome,
        now: DateTime<Utc>,
    ) -> Option<LadderState> {
        let history = session.exercises.get_mut(exercise_name)?;
        match outcome {
            RecoveryOutcome::Passed => {
                history.needs_screening = false;
                history.recovery_protocol_active = true;
                tracing::info!("Screening passed for '{}', recovery protocol active", exercise_name);
            }
            RecoveryOutcome::Failed => {
                history.refer_to_physio = true;
                history.recovery_protocol_active = false;
                history.attempts.push(PainAttempt {
                    timestamp: now,
                    pain_level: history.last_pain_level.unwrap_or(0),
                    action: AttemptAction::PhysioReferral,
                });
                tracing::info!("Recovery failed for '{}', physio referral", exercise_name);
            }
        }
        Some(history.state())
    }
}
