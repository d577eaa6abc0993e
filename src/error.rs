use crate::text::MAX_MESSAGE_LENGTH;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when constructing or validating localized text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    #[error(
        "Translation for language '{language}' is {length} characters long, exceeding the {MAX_MESSAGE_LENGTH}-character outbound message limit"
    )]
    TooLong { language: String, length: usize },

    #[error("No translation provided for language '{0}'")]
    MissingTranslation(String),
}

/// Internal-consistency errors raised by the graph builder.
///
/// These indicate programmer misuse of the builder API (e.g. wiring an exit
/// slot a node variant does not have), not bad configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("A sequence group must contain at least one member")]
    EmptySequence,

    #[error("Node '{node_uuid}' has no '{slot}' exit slot")]
    NoSuchExitSlot { node_uuid: Uuid, slot: &'static str },
}

/// Errors that can occur while assembling a flow graph from configuration.
///
/// Assembly fails as a whole; no partial graph is ever returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("Flow '{flow_name}': {source}")]
    InvalidText {
        flow_name: String,
        source: TextError,
    },

    #[error("Survey flow '{0}' has no questions")]
    EmptySurvey(String),

    #[error("Activation flow '{flow_name}' references unknown flow '{next_flow}'")]
    UnknownNextFlow {
        flow_name: String,
        next_flow: String,
    },

    #[error("No standard opt-out detector is defined for language '{0}'")]
    UnsupportedDetectionLanguage(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
