//! Core domain types for bugdojo

mod badge;
mod lesson;
mod profile;
mod progress;

pub use badge::{Badge, BadgeType, UserBadge};
pub use lesson::{Difficulty, Language, Lesson};
pub use profile::Profile;
pub use progress::{ProgressEntry, ProgressRecord, UpsertOutcome};
