//! The typed flow-graph vocabulary.
//!
//! A flow is a directed graph of primitive [`Node`]s and composite
//! [`Group`]s held in a per-flow arena owned by [`GraphBuilder`] and, once
//! built, by [`FlowGraph`]. Exit slots hold arena keys rather than owning
//! references, which is what makes late-bound forward edges and cycles
//! representable without ownership gymnastics.

pub mod builder;
pub mod flow;
pub mod group;
pub mod node;

pub use builder::{AskIfUnanswered, GraphBuilder};
pub use flow::{Document, FlowGraph};
pub use group::Group;
pub use node::{ContactField, DetectorCase, ExitSlot, Node, NodeKind};

/// Stable key of a node in its flow's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey(pub(crate) usize);

/// Stable key of a group in its flow's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupKey(pub(crate) usize);

/// What an exit slot (or a flow entry) points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitTarget {
    Node(NodeKey),
    Group(GroupKey),
}

impl From<NodeKey> for ExitTarget {
    fn from(key: NodeKey) -> Self {
        Self::Node(key)
    }
}

impl From<GroupKey> for ExitTarget {
    fn from(key: GroupKey) -> Self {
        Self::Group(key)
    }
}

/// Resolves a target to the node it enters, unwrapping groups recursively.
/// Groups never appear in output; only their interior nodes do.
pub(crate) fn resolve_entry(groups: &[Group], mut target: ExitTarget) -> NodeKey {
    loop {
        match target {
            ExitTarget::Node(key) => return key,
            ExitTarget::Group(key) => target = groups[key.0].entry(),
        }
    }
}
