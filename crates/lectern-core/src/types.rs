use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LearnError, Result};

/// Lecture metadata as served by the catalog endpoint. Extra fields in the
/// response are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecture {
    pub title: String,
}

/// The fetched lecture catalog, keyed by lecture id. Loaded once at startup
/// and read-only afterwards.
pub type LectureCatalog = BTreeMap<String, Lecture>;

/// One timed transcript unit. `start < end`, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// A single generated quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(default)]
    pub explanation: String,
}

impl QuizQuestion {
    /// Checks the structural invariants every load boundary relies on.
    pub fn validate(&self) -> Result<()> {
        if self.options.len() < 2 {
            return Err(LearnError::MalformedResponse(format!(
                "question {:?} has fewer than two options",
                self.question
            )));
        }
        if self.correct_index >= self.options.len() {
            return Err(LearnError::MalformedResponse(format!(
                "question {:?} has correct_index {} out of range",
                self.question, self.correct_index
            )));
        }
        Ok(())
    }
}

/// Scope of AI note generation: everything watched so far, or the whole
/// lecture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotesMode {
    #[default]
    Watched,
    Full,
}

impl NotesMode {
    pub const ALL: [NotesMode; 2] = [NotesMode::Watched, NotesMode::Full];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotesMode::Watched => "watched",
            NotesMode::Full => "full",
        }
    }
}

impl fmt::Display for NotesMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotesMode::Watched => write!(f, "Watched portion"),
            NotesMode::Full => write!(f, "Full lecture"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: &[&str], correct_index: usize) -> QuizQuestion {
        QuizQuestion {
            question: "Q?".to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_index,
            explanation: String::new(),
        }
    }

    #[test]
    fn test_question_validation() {
        assert!(question(&["A", "B"], 1).validate().is_ok());
        assert!(question(&["A"], 0).validate().is_err());
        assert!(question(&["A", "B"], 2).validate().is_err());
    }

    #[test]
    fn test_notes_mode_serializes_lowercase() {
        let watched = serde_json::to_string(&NotesMode::Watched).unwrap();
        let full = serde_json::to_string(&NotesMode::Full).unwrap();
        assert_eq!(watched, "\"watched\"");
        assert_eq!(full, "\"full\"");
    }

    #[test]
    fn test_catalog_ignores_extra_fields() {
        let json = r#"{"L1": {"title": "Intro", "url": "ignored"}}"#;
        let catalog: LectureCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog["L1"].title, "Intro");
    }
}
