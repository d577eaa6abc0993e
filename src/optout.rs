//! Opt-out detection rules for inbound messages.
//!
//! A detector classifies an inbound reply as a consent withdrawal. Detectors
//! are never executed locally; each one is shipped to the platform as a
//! router case on the wait node that owns it. All of a wait node's detectors
//! share a single opt-out category, so any match routes to the same exit.

use crate::wire;
use uuid::Uuid;

/// A rule classifying inbound text as an opt-out signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptOutDetector {
    /// Matches when the platform's `has_pattern` test matches the reply.
    Regex { pattern: String },
    /// Matches when the reply consists of exactly this phrase.
    ExactPhrase { phrase: String },
}

impl OptOutDetector {
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::Regex {
            pattern: pattern.into(),
        }
    }

    pub fn exact_phrase(phrase: impl Into<String>) -> Self {
        Self::ExactPhrase {
            phrase: phrase.into(),
        }
    }

    /// Builds this detector's router case, bound to the shared opt-out
    /// category supplied by the owning wait node.
    pub(crate) fn wire_case(&self, case_uuid: Uuid, category_uuid: Uuid) -> wire::Case {
        let (case_type, argument) = match self {
            Self::Regex { pattern } => ("has_pattern", pattern.clone()),
            Self::ExactPhrase { phrase } => ("has_only_phrase", phrase.clone()),
        };
        wire::Case {
            arguments: vec![argument],
            case_type: case_type.to_string(),
            uuid: case_uuid,
            category_uuid,
        }
    }
}

/// Returns the standardised opt-out detector for a detection language,
/// or `None` if no detector is defined for that language.
pub fn standard_detector(language: &str) -> Option<OptOutDetector> {
    match language {
        "som" => Some(OptOutDetector::regex("^j[ao]+w*ji")),
        "eng" => Some(OptOutDetector::exact_phrase("Stop")),
        _ => None,
    }
}
