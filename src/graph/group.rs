//! Composite macro-groups.
//!
//! A group is a reusable wiring pattern over nodes already in the arena. It
//! delegates its identity to its interior start node and is transparently
//! unwrapped during traversal; the wire format never sees it.

use crate::graph::{ExitTarget, NodeKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    /// Chains members so each one's default exit leads to the next. The
    /// group's own default exit proxies onto the last member's.
    Sequence { first: ExitTarget, last: ExitTarget },
    /// The question macro: skip if the field is already populated,
    /// otherwise send the question, wait for the reply and persist it.
    /// Exposes three externally settable exits: previously-answered
    /// (split's has-text branch), opted-out (wait's opt-out branch) and
    /// newly-answered (set-field's default).
    AskIfUnanswered {
        split: NodeKey,
        send: NodeKey,
        wait: NodeKey,
        set_field: NodeKey,
    },
}

impl Group {
    /// The interior reference entered when this group is targeted.
    pub fn entry(&self) -> ExitTarget {
        match self {
            Self::Sequence { first, .. } => *first,
            Self::AskIfUnanswered { split, .. } => ExitTarget::Node(*split),
        }
    }
}
