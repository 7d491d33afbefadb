//! Per (user, lesson) progress tracking
//!
//! A session moves `NotStarted -> InProgress -> Completed`. It counts attempts,
//! tracks which hints have been shown and emits a [`CompletionEvent`] on the
//! first passing submission. Sessions are plain values; persisting the
//! completion is the engine's job.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::Lesson;
use crate::error::{EngineError, EngineResult};
use crate::evaluator::Verdict;

/// Attempt number whose failure surfaces the first hint
pub const DEFAULT_AUTO_HINT_ATTEMPT: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    NotStarted,
    InProgress {
        attempts: u32,
        hints_revealed: BTreeSet<usize>,
    },
    Completed {
        attempts: u32,
        hints_used: u32,
    },
}

/// Emitted exactly once per session, when a submission passes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionEvent {
    pub session_id: Uuid,
    pub user_id: String,
    pub lesson_id: String,
    pub attempts: u32,
    pub hints_used: u32,
    pub time_taken_secs: Option<u64>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Failed {
        attempts: u32,
        /// Hint index surfaced automatically by this failure
        revealed_hint: Option<usize>,
    },
    Completed(CompletionEvent),
}

impl SubmissionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::Failed { attempts, .. } => *attempts,
            Self::Completed(event) => event.attempts,
        }
    }
}

impl std::fmt::Display for SubmissionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failed { attempts, .. } => write!(f, "Not correct yet (attempt {attempts})"),
            Self::Completed(event) => write!(
                f,
                "Solved in {} attempt{}",
                event.attempts,
                if event.attempts == 1 { "" } else { "s" }
            ),
        }
    }
}

/// State machine for one user working through one lesson
#[derive(Debug, Clone)]
pub struct LessonSession {
    id: Uuid,
    user_id: String,
    lesson: Lesson,
    state: SessionState,
    started_at: Option<DateTime<Utc>>,
    auto_hint_attempt: u32,
}

impl LessonSession {
    pub fn new(user_id: impl Into<String>, lesson: Lesson) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            lesson,
            state: SessionState::NotStarted,
            started_at: None,
            auto_hint_attempt: DEFAULT_AUTO_HINT_ATTEMPT,
        }
    }

    /// Override which failed attempt reveals hint 0. Zero disables auto hints.
    pub fn with_auto_hint_attempt(mut self, attempt: u32) -> Self {
        self.auto_hint_attempt = attempt;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, SessionState::Completed { .. })
    }

    pub fn attempts(&self) -> u32 {
        match &self.state {
            SessionState::NotStarted => 0,
            SessionState::InProgress { attempts, .. } | SessionState::Completed { attempts, .. } => {
                *attempts
            }
        }
    }

    /// Indices of hints shown so far, ascending
    pub fn hints_revealed(&self) -> Vec<usize> {
        match &self.state {
            SessionState::InProgress { hints_revealed, .. } => {
                hints_revealed.iter().copied().collect()
            }
            _ => Vec::new(),
        }
    }

    /// Enter `InProgress` when the lesson is loaded. Starting twice is a no-op.
    pub fn start(&mut self, at: DateTime<Utc>) -> EngineResult<()> {
        match self.state {
            SessionState::NotStarted => {
                tracing::debug!(session = %self.id, lesson = %self.lesson.id, "session started");
                self.state = SessionState::InProgress {
                    attempts: 0,
                    hints_revealed: BTreeSet::new(),
                };
                self.started_at = Some(at);
                Ok(())
            }
            SessionState::InProgress { .. } => Ok(()),
            SessionState::Completed { .. } => Err(EngineError::Validation(
                "Lesson already completed in this session; start a new one".to_string(),
            )),
        }
    }

    /// Record the verdict of one submission
    pub fn record(&mut self, verdict: Verdict, at: DateTime<Utc>) -> EngineResult<SubmissionOutcome> {
        let SessionState::InProgress {
            attempts,
            hints_revealed,
        } = &mut self.state
        else {
            return Err(self.not_in_progress());
        };

        *attempts += 1;
        let attempts = *attempts;

        if !verdict.is_pass() {
            let mut revealed_hint = None;
            if attempts == self.auto_hint_attempt && self.lesson.has_hints() {
                hints_revealed.insert(0);
                revealed_hint = Some(0);
            }
            tracing::debug!(session = %self.id, attempts, ?revealed_hint, "submission failed");
            return Ok(SubmissionOutcome::Failed {
                attempts,
                revealed_hint,
            });
        }

        let hints_used = hints_revealed.len() as u32;
        self.state = SessionState::Completed {
            attempts,
            hints_used,
        };

        let time_taken_secs = self
            .started_at
            .map(|started| (at - started).num_seconds().max(0) as u64);

        Ok(SubmissionOutcome::Completed(CompletionEvent {
            session_id: self.id,
            user_id: self.user_id.clone(),
            lesson_id: self.lesson.id.clone(),
            attempts,
            hints_used,
            time_taken_secs,
            completed_at: at,
        }))
    }

    /// Manually reveal a hint. Never changes the attempt count.
    pub fn reveal_hint(&mut self, index: usize) -> EngineResult<&str> {
        let SessionState::InProgress { hints_revealed, .. } = &mut self.state else {
            return Err(self.not_in_progress());
        };

        let Some(hint) = self.lesson.hints.get(index) else {
            return Err(EngineError::Validation(format!(
                "Lesson {} has no hint #{index}",
                self.lesson.id
            )));
        };

        hints_revealed.insert(index);
        Ok(hint)
    }

    /// Clear attempts and revealed hints. A completed session stays completed.
    pub fn reset(&mut self) {
        if let SessionState::InProgress {
            attempts,
            hints_revealed,
        } = &mut self.state
        {
            *attempts = 0;
            hints_revealed.clear();
        }
    }

    fn not_in_progress(&self) -> EngineError {
        match self.state {
            SessionState::NotStarted => {
                EngineError::Validation("Session has not been started".to_string())
            }
            _ => EngineError::Validation(
                "Lesson already completed in this session; start a new one".to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Difficulty, Language};
    use chrono::{Duration, TimeZone};

    fn lesson(hints: &[&str]) -> Lesson {
        Lesson {
            id: "js-loop".to_string(),
            language: Language::JavaScript,
            difficulty: Difficulty::Easy,
            title: "Loop bounds".to_string(),
            description: String::new(),
            starter_code: String::new(),
            expected_output: "1\n2\n3\n4\n5".to_string(),
            hints: hints.iter().map(|h| h.to_string()).collect(),
            points: 10,
            position: 1,
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap()
    }

    fn started(hints: &[&str]) -> LessonSession {
        let mut s = LessonSession::new("alice", lesson(hints));
        s.start(t0()).unwrap();
        s
    }

    #[test]
    fn test_start_initializes_in_progress() {
        let s = started(&["check the bound"]);
        assert_eq!(
            s.state(),
            &SessionState::InProgress {
                attempts: 0,
                hints_revealed: BTreeSet::new()
            }
        );
    }

    #[test]
    fn test_submit_before_start_is_rejected() {
        let mut s = LessonSession::new("alice", lesson(&[]));
        let err = s.record(Verdict::Pass, t0()).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(s.attempts(), 0);
    }

    #[test]
    fn test_pass_on_first_attempt() {
        let mut s = started(&[]);
        let outcome = s.record(Verdict::Pass, t0() + Duration::seconds(42)).unwrap();
        let SubmissionOutcome::Completed(event) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(event.attempts, 1);
        assert_eq!(event.hints_used, 0);
        assert_eq!(event.time_taken_secs, Some(42));
        assert!(s.is_completed());
    }

    #[test]
    fn test_second_failure_reveals_first_hint() {
        let mut s = started(&["look at range()", "off by one"]);

        let first = s.record(Verdict::Fail, t0()).unwrap();
        assert_eq!(first, SubmissionOutcome::Failed { attempts: 1, revealed_hint: None });
        assert!(s.hints_revealed().is_empty());

        let second = s.record(Verdict::Fail, t0()).unwrap();
        assert_eq!(second, SubmissionOutcome::Failed { attempts: 2, revealed_hint: Some(0) });
        assert_eq!(s.hints_revealed(), vec![0]);

        let third = s.record(Verdict::Fail, t0()).unwrap();
        assert_eq!(third, SubmissionOutcome::Failed { attempts: 3, revealed_hint: None });
        assert_eq!(s.hints_revealed(), vec![0]);
    }

    #[test]
    fn test_no_auto_hint_without_hints() {
        let mut s = started(&[]);
        s.record(Verdict::Fail, t0()).unwrap();
        let second = s.record(Verdict::Fail, t0()).unwrap();
        assert_eq!(second, SubmissionOutcome::Failed { attempts: 2, revealed_hint: None });
    }

    #[test]
    fn test_auto_hint_attempt_is_configurable() {
        let mut s = LessonSession::new("alice", lesson(&["h"])).with_auto_hint_attempt(0);
        s.start(t0()).unwrap();
        s.record(Verdict::Fail, t0()).unwrap();
        let second = s.record(Verdict::Fail, t0()).unwrap();
        assert_eq!(second, SubmissionOutcome::Failed { attempts: 2, revealed_hint: None });
    }

    #[test]
    fn test_manual_hint_does_not_touch_attempts() {
        let mut s = started(&["a", "b", "c"]);
        assert_eq!(s.reveal_hint(2).unwrap(), "c");
        assert_eq!(s.attempts(), 0);
        assert_eq!(s.hints_revealed(), vec![2]);

        let err = s.reveal_hint(3).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn test_hints_used_counts_distinct_indices() {
        let mut s = started(&["a", "b"]);
        s.reveal_hint(0).unwrap();
        s.record(Verdict::Fail, t0()).unwrap();
        s.record(Verdict::Fail, t0()).unwrap(); // auto-reveals 0 again
        s.reveal_hint(1).unwrap();
        let SubmissionOutcome::Completed(event) = s.record(Verdict::Pass, t0()).unwrap() else {
            panic!("expected completion");
        };
        assert_eq!(event.hints_used, 2);
        assert_eq!(event.attempts, 3);
    }

    #[test]
    fn test_reset_clears_attempts_and_hints() {
        let mut s = started(&["a"]);
        s.record(Verdict::Fail, t0()).unwrap();
        s.record(Verdict::Fail, t0()).unwrap();
        s.reset();
        assert_eq!(s.attempts(), 0);
        assert!(s.hints_revealed().is_empty());

        // Counting starts over, so the auto hint fires again on the new 2nd attempt
        s.record(Verdict::Fail, t0()).unwrap();
        let again = s.record(Verdict::Fail, t0()).unwrap();
        assert_eq!(again, SubmissionOutcome::Failed { attempts: 2, revealed_hint: Some(0) });
    }

    #[test]
    fn test_completed_is_terminal() {
        let mut s = started(&["a"]);
        s.record(Verdict::Pass, t0()).unwrap();

        s.reset();
        assert!(s.is_completed());
        assert_eq!(s.attempts(), 1);

        assert!(s.record(Verdict::Pass, t0()).is_err());
        assert!(s.reveal_hint(0).is_err());
        assert!(s.start(t0()).is_err());
    }

    #[test]
    fn test_attempts_never_decrease_without_reset() {
        let mut s = started(&["a"]);
        let mut last = 0;
        for _ in 0..6 {
            s.record(Verdict::Fail, t0()).unwrap();
            assert!(s.attempts() > last);
            last = s.attempts();
            s.reveal_hint(0).unwrap();
            assert_eq!(s.attempts(), last);
        }
    }

    #[test]
    fn test_failed_outcome_message() {
        let outcome = SubmissionOutcome::Failed { attempts: 3, revealed_hint: None };
        assert_eq!(outcome.to_string(), "Not correct yet (attempt 3)");
    }
}
