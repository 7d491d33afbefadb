use serde::{Deserialize, Serialize};

/// Programming language a lesson is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Cpp,
    Go,
    Rust,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::Go => "go",
            Self::Rust => "rust",
        }
    }

    /// Parse from the stored / user-facing string. Accepts a few common aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "python" | "py" => Some(Self::Python),
            "javascript" | "js" => Some(Self::JavaScript),
            "typescript" | "ts" => Some(Self::TypeScript),
            "java" => Some(Self::Java),
            "cpp" | "c++" => Some(Self::Cpp),
            "go" | "golang" => Some(Self::Go),
            "rust" | "rs" => Some(Self::Rust),
            _ => None,
        }
    }

    pub fn all() -> &'static [Language] {
        &[
            Self::Python,
            Self::JavaScript,
            Self::TypeScript,
            Self::Java,
            Self::Cpp,
            Self::Go,
            Self::Rust,
        ]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lesson difficulty. Declaration order is the ranking: easy < medium < hard < expert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Expert => "expert",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            "expert" => Some(Self::Expert),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A debugging exercise. Immutable once it is in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub language: Language,
    pub difficulty: Difficulty,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub starter_code: String,
    /// Exact output a corrected program must print
    pub expected_output: String,
    #[serde(default)]
    pub hints: Vec<String>,
    pub points: u32,
    /// Catalog order within the language track
    pub position: u32,
}

impl Lesson {
    pub fn hint(&self, index: usize) -> Option<&str> {
        self.hints.get(index).map(String::as_str)
    }

    pub fn has_hints(&self) -> bool {
        !self.hints.is_empty()
    }
}
