//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types from the flowgen crate so
//! callers can bring the core API into scope with a single import.

// Assembly and serialization
pub use crate::assemble::{Assembler, FlowRegistry};
pub use crate::serialize::{serialize_document, serialize_flow};

// Configuration model
pub use crate::config::{
    Consent, FlowConfiguration, FlowConfigurations, GlobalSettings, SurveyQuestion,
};

// Graph vocabulary
pub use crate::graph::{
    AskIfUnanswered, ContactField, Document, ExitTarget, FlowGraph, GraphBuilder, Group, GroupKey,
    Node, NodeKey, NodeKind,
};

// Identity generation
pub use crate::ids::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};

// Text and opt-out models
pub use crate::optout::OptOutDetector;
pub use crate::text::{LocalizedText, MAX_MESSAGE_LENGTH};

// Error types
pub use crate::error::{AssemblyError, GraphError, TextError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
