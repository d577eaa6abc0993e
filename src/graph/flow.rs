//! Read-only flow graphs and the multi-flow document.

use crate::error::TextError;
use crate::graph::{ExitTarget, Group, Node, NodeKey, resolve_entry};
use crate::serialize;
use crate::wire;
use uuid::Uuid;

/// A complete conversational flow: its arena of nodes and groups plus a
/// single entry reference. Immutable once built; serialization only reads.
#[derive(Debug, Clone)]
pub struct FlowGraph {
    name: String,
    uuid: Uuid,
    language: String,
    localization_languages: Vec<String>,
    nodes: Vec<Node>,
    groups: Vec<Group>,
    entry: ExitTarget,
}

impl FlowGraph {
    pub(crate) fn new(
        name: String,
        uuid: Uuid,
        language: String,
        localization_languages: Vec<String>,
        nodes: Vec<Node>,
        groups: Vec<Group>,
        entry: ExitTarget,
    ) -> Self {
        Self {
            name,
            uuid,
            language,
            localization_languages,
            nodes,
            groups,
            entry,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// The editing language, emitted inline in node payloads.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Languages emitted through the localization map.
    pub fn localization_languages(&self) -> &[String] {
        &self.localization_languages
    }

    pub fn entry(&self) -> ExitTarget {
        self.entry
    }

    pub fn node(&self, key: NodeKey) -> &Node {
        &self.nodes[key.0]
    }

    /// The node a target enters, with groups unwrapped.
    pub fn entry_key(&self, target: ExitTarget) -> NodeKey {
        resolve_entry(&self.groups, target)
    }

    /// The delegated identity of a node or group.
    pub fn entry_uuid(&self, target: ExitTarget) -> Uuid {
        self.node(self.entry_key(target)).uuid()
    }
}

/// An ordered collection of flows destined for one definition document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub flows: Vec<FlowGraph>,
}

impl Document {
    pub fn new(flows: Vec<FlowGraph>) -> Self {
        Self { flows }
    }

    /// Serializes every flow into the platform's definition schema.
    pub fn to_wire(&self) -> Result<wire::Document, TextError> {
        serialize::serialize_document(self)
    }
}
