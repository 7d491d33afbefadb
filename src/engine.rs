//! Submission pipeline
//!
//! ```text
//! submit ─► Evaluator ─► LessonSession ─► upsert progress ─► score ─► badges
//! ```
//!
//! Each step only runs when the previous one succeeded. Badge evaluation is
//! best effort: a failure there is logged and the scored completion stands.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::badges::evaluate_badges;
use crate::config::Config;
use crate::domain::{Badge, Language, Lesson, Profile, ProgressRecord, UpsertOutcome};
use crate::error::{EngineError, EngineResult};
use crate::evaluator::{Evaluator, ExpectedOutputEvaluator};
use crate::scoring::{RescorePolicy, ScoringResult, ScoringRules, score_completion};
use crate::session::{CompletionEvent, DEFAULT_AUTO_HINT_ATTEMPT, LessonSession, SubmissionOutcome};
use crate::stats::{self, DEFAULT_LEADERBOARD_LIMIT, LeaderboardEntry, UserStats};
use crate::store::Store;

/// Runtime policy of an [`Engine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub rescore: RescorePolicy,
    pub scoring: ScoringRules,
    pub auto_hint_attempt: u32,
    pub leaderboard_limit: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            rescore: RescorePolicy::default(),
            scoring: ScoringRules::default(),
            auto_hint_attempt: DEFAULT_AUTO_HINT_ATTEMPT,
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
        }
    }
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        Self {
            rescore: config.scoring.rescore,
            scoring: config.scoring.rules(),
            auto_hint_attempt: config.session.auto_hint_attempt,
            leaderboard_limit: config.leaderboard.default_limit,
        }
    }
}

/// Everything one submission changed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReport {
    pub outcome: SubmissionOutcome,
    /// How the completion was stored; None for failed submissions
    pub progress: Option<UpsertOutcome>,
    /// None when nothing was scored (failed, or a repeat completion)
    pub scoring: Option<ScoringResult>,
    pub new_badges: Vec<Badge>,
}

/// An owned badge joined with its catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EarnedBadge {
    #[serde(flatten)]
    pub badge: Badge,
    pub earned_at: DateTime<Utc>,
}

pub struct Engine<S> {
    store: S,
    evaluator: Box<dyn Evaluator>,
    settings: EngineSettings,
}

impl<S: Store> Engine<S> {
    pub fn new(store: S, settings: EngineSettings) -> Self {
        Self {
            store,
            evaluator: Box::new(ExpectedOutputEvaluator),
            settings,
        }
    }

    /// Replace the default expected-output comparison
    pub fn with_evaluator(mut self, evaluator: impl Evaluator + 'static) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create the user's profile if it does not exist yet
    pub fn register(&self, user_id: &str, display_name: &str, at: DateTime<Utc>) -> EngineResult<Profile> {
        if user_id.trim().is_empty() {
            return Err(EngineError::Validation("User id must not be empty".to_string()));
        }
        let display_name = if display_name.trim().is_empty() {
            user_id
        } else {
            display_name
        };
        self.store.create_profile(user_id, display_name, at)
    }

    pub fn lessons(&self, language: Language) -> EngineResult<Vec<Lesson>> {
        self.store.list_lessons(language)
    }

    pub fn lesson(&self, lesson_id: &str) -> EngineResult<Lesson> {
        self.store
            .get_lesson(lesson_id)?
            .ok_or_else(|| EngineError::lesson_not_found(lesson_id))
    }

    /// Load `lesson_id` and open an in-progress session for `user_id`
    pub fn start_session(&self, user_id: &str, lesson_id: &str, at: DateTime<Utc>) -> EngineResult<LessonSession> {
        let lesson = self.lesson(lesson_id)?;
        let mut session = LessonSession::new(user_id, lesson).with_auto_hint_attempt(self.settings.auto_hint_attempt);
        session.start(at)?;
        Ok(session)
    }

    /// Evaluate one submission and apply its consequences.
    ///
    /// If the completion cannot be stored or scoring fails with a retryable
    /// error, the session is rolled back so the same submission can be
    /// retried. A stored completion stays unscored until scoring succeeds, and
    /// the next completion of that lesson picks the points up.
    pub fn submit(&self, session: &mut LessonSession, output: &str, at: DateTime<Utc>) -> EngineResult<SubmissionReport> {
        let verdict = self.evaluator.evaluate(session.lesson(), output)?;

        let snapshot = session.clone();
        let outcome = session.record(verdict, at)?;

        let event = match outcome {
            SubmissionOutcome::Completed(event) => event,
            failed => {
                tracing::debug!(session = %session.id(), user = session.user_id(), %failed, "submission failed");
                return Ok(SubmissionReport {
                    outcome: failed,
                    progress: None,
                    scoring: None,
                    new_badges: Vec::new(),
                });
            }
        };

        let progress = match self.store.upsert_progress(&progress_record(&event)) {
            Ok(progress) => progress,
            Err(e) => {
                *session = snapshot;
                return Err(e);
            }
        };
        tracing::info!(
            session = %event.session_id,
            user = %event.user_id,
            lesson = %event.lesson_id,
            attempts = event.attempts,
            hints = event.hints_used,
            "lesson completed"
        );

        if !self.settings.rescore.should_score(progress) {
            tracing::debug!(user = %event.user_id, lesson = %event.lesson_id, "repeat completion, not scored");
            return Ok(SubmissionReport {
                outcome: SubmissionOutcome::Completed(event),
                progress: Some(progress),
                scoring: None,
                new_badges: Vec::new(),
            });
        }

        let scoring = match score_completion(
            &self.store,
            &event.user_id,
            session.lesson().points,
            event.completed_at,
            self.settings.scoring,
        ) {
            Ok(scoring) => scoring,
            Err(e) => {
                if e.is_retryable() {
                    *session = snapshot;
                }
                return Err(e);
            }
        };

        if let Err(e) = self.store.mark_scored(&event.user_id, &event.lesson_id) {
            tracing::warn!(user = %event.user_id, lesson = %event.lesson_id, error = %e, "failed to mark completion as scored");
        }

        let new_badges = match evaluate_badges(&self.store, &scoring.profile, at) {
            Ok(badges) => badges,
            Err(e) => {
                tracing::warn!(user = %event.user_id, error = %e, "badge evaluation failed");
                Vec::new()
            }
        };

        Ok(SubmissionReport {
            outcome: SubmissionOutcome::Completed(event),
            progress: Some(progress),
            scoring: Some(scoring),
            new_badges,
        })
    }

    pub fn reveal_hint(&self, session: &mut LessonSession, index: usize) -> EngineResult<String> {
        session.reveal_hint(index).map(str::to_string)
    }

    pub fn reset(&self, session: &mut LessonSession) {
        session.reset();
    }

    /// Top players; `None` uses the configured default limit
    pub fn leaderboard(&self, limit: Option<usize>) -> EngineResult<Vec<LeaderboardEntry>> {
        stats::leaderboard(&self.store, limit.unwrap_or(self.settings.leaderboard_limit))
    }

    pub fn user_stats(&self, user_id: &str, today: NaiveDate) -> EngineResult<UserStats> {
        stats::user_stats(&self.store, user_id, today)
    }

    /// Badges `user_id` has earned, oldest first
    pub fn user_badges(&self, user_id: &str) -> EngineResult<Vec<EarnedBadge>> {
        let catalog = self.store.list_badges()?;
        let owned = self.store.list_user_badges(user_id)?;

        Ok(owned
            .into_iter()
            .filter_map(|grant| {
                catalog
                    .iter()
                    .find(|b| b.id == grant.badge_id)
                    .map(|badge| EarnedBadge {
                        badge: badge.clone(),
                        earned_at: grant.earned_at,
                    })
            })
            .collect())
    }
}

fn progress_record(event: &CompletionEvent) -> ProgressRecord {
    ProgressRecord {
        user_id: event.user_id.clone(),
        lesson_id: event.lesson_id.clone(),
        completed_at: event.completed_at,
        attempts: event.attempts,
        hints_used: event.hints_used,
        time_taken_secs: event.time_taken_secs,
    }
}
