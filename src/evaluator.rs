//! Attempt evaluation
//!
//! Decides whether a submission solves a lesson. The default implementation
//! compares the program output against the lesson's expected output; a sandboxed
//! runner can be plugged in behind the same [`Evaluator`] trait.

use serde::{Deserialize, Serialize};

use crate::domain::Lesson;
use crate::error::EngineResult;

/// Outcome of evaluating one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Decides pass/fail for a lesson. Implementations must be deterministic.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, lesson: &Lesson, submitted_output: &str) -> EngineResult<Verdict>;
}

/// Compares trimmed output against the trimmed expected output
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpectedOutputEvaluator;

impl Evaluator for ExpectedOutputEvaluator {
    fn evaluate(&self, lesson: &Lesson, submitted_output: &str) -> EngineResult<Verdict> {
        Ok(evaluate_output(&lesson.expected_output, submitted_output))
    }
}

/// Leading/trailing whitespace is ignored; everything inside must match exactly.
pub fn evaluate_output(expected: &str, submitted: &str) -> Verdict {
    if submitted.trim() == expected.trim() {
        Verdict::Pass
    } else {
        Verdict::Fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Difficulty, Language};

    fn lesson(expected: &str) -> Lesson {
        Lesson {
            id: "py-count".to_string(),
            language: Language::Python,
            difficulty: Difficulty::Easy,
            title: "Count to five".to_string(),
            description: String::new(),
            starter_code: "for i in range(1, 5):\n    print(i)".to_string(),
            expected_output: expected.to_string(),
            hints: vec![],
            points: 10,
            position: 1,
        }
    }

    #[test]
    fn test_exact_match_passes() {
        let l = lesson("1\n2\n3\n4\n5");
        let verdict = ExpectedOutputEvaluator.evaluate(&l, "1\n2\n3\n4\n5").unwrap();
        assert_eq!(verdict, Verdict::Pass);
    }

    #[test]
    fn test_outer_whitespace_is_ignored() {
        assert_eq!(evaluate_output("1\n2", "  1\n2\n\n"), Verdict::Pass);
        assert_eq!(evaluate_output("\t1\n2 ", "1\n2"), Verdict::Pass);
    }

    #[test]
    fn test_inner_whitespace_matters() {
        assert_eq!(evaluate_output("1\n2", "1\n 2"), Verdict::Fail);
        assert_eq!(evaluate_output("a b", "a  b"), Verdict::Fail);
    }

    #[test]
    fn test_extra_line_fails() {
        assert_eq!(evaluate_output("1\n2\n3\n4\n5", "1\n2\n3\n4\n5\n6"), Verdict::Fail);
    }

    #[test]
    fn test_empty_submission() {
        assert_eq!(evaluate_output("42", ""), Verdict::Fail);
        assert_eq!(evaluate_output("42", "   \n"), Verdict::Fail);
        assert_eq!(evaluate_output("", ""), Verdict::Pass);
        assert_eq!(evaluate_output(" \n", ""), Verdict::Pass);
    }

    #[test]
    fn test_deterministic() {
        let l = lesson("ok");
        let first = ExpectedOutputEvaluator.evaluate(&l, "ok ").unwrap();
        for _ in 0..5 {
            assert_eq!(ExpectedOutputEvaluator.evaluate(&l, "ok ").unwrap(), first);
        }
    }
}
