//! BugDojo - learn to debug by fixing broken programs
//!
//! The library holds the lesson progression rules: deciding whether a
//! submission solves a lesson, tracking attempts and hints, awarding points,
//! streaks and badges, and deriving the leaderboard and personal statistics.
//!
//! ## Pipeline
//!
//! 1. **Evaluator** compares a submission's output with the lesson's expected output.
//! 2. **Session** counts attempts and hints and emits a completion on the first pass.
//! 3. **Scoring** stores the completion and updates the user's profile.
//! 4. **Badges** grants every badge whose threshold is now met.
//! 5. **Stats** reads the accumulated profiles and history.
//!
//! [`Engine`] runs the whole pipeline against any [`store::Store`].

pub mod badges;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod scoring;
pub mod session;
pub mod stats;
pub mod store;

pub use domain::*;
pub use engine::{EarnedBadge, Engine, EngineSettings, SubmissionReport};
pub use error::{EngineError, EngineResult, EntityKind};
pub use evaluator::{Evaluator, ExpectedOutputEvaluator, Verdict};
pub use session::{CompletionEvent, LessonSession, SessionState, SubmissionOutcome};
pub use store::{SqliteStore, Store};
