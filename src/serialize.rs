//! Graph traversal and wire-format serialization.
//!
//! Discovery is breadth-first from the flow's entry: the worklist is a FIFO
//! queue seeded with the entry reference, groups are unwrapped to their
//! interior node, already-discovered nodes are discarded (which handles
//! reconvergence and closes cycles) and each new node enqueues its exit
//! slots in declaration order. Breadth-first order is part of the output
//! contract; downstream tooling diffs raw documents.

use crate::error::TextError;
use crate::graph::{Document, FlowGraph, NodeKey};
use crate::localization::{LocalizationMap, merge_into};
use crate::wire;
use ahash::AHashSet;
use std::collections::VecDeque;
use tracing::{debug, trace};
use uuid::Uuid;

/// Serializes a document of flow graphs into the platform's definition
/// schema. Fails only if a node's text is missing a required translation;
/// traversal itself always terminates.
pub fn serialize_document(document: &Document) -> Result<wire::Document, TextError> {
    let flows = document
        .flows
        .iter()
        .map(serialize_flow)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(wire::Document {
        version: wire::DOCUMENT_VERSION.to_string(),
        flows,
        campaigns: vec![],
        triggers: vec![],
        fields: vec![],
        groups: vec![],
    })
}

/// Serializes one flow: discovers its reachable nodes, builds their wire
/// entries against the editing language and merges their localization
/// contributions.
pub fn serialize_flow(flow: &FlowGraph) -> Result<wire::Flow, TextError> {
    let order = discover(flow);
    debug!(
        flow = flow.name(),
        nodes = order.len(),
        "serializing flow graph"
    );

    let mut nodes = Vec::with_capacity(order.len());
    let mut localization = LocalizationMap::new();
    for key in order {
        let node = flow.node(key);
        let destinations: Vec<Option<Uuid>> = node
            .exits()
            .iter()
            .map(|slot| slot.target.map(|target| flow.entry_uuid(target)))
            .collect();
        nodes.push(node.wire_entry(flow.language(), &destinations)?);
        merge_into(
            &mut localization,
            node.localization(flow.localization_languages())?,
        );
    }

    Ok(wire::Flow {
        uuid: flow.uuid(),
        name: flow.name().to_string(),
        expire_after_minutes: wire::FLOW_EXPIRY_MINUTES,
        language: flow.language().to_string(),
        localization,
        spec_version: wire::FLOW_SPEC_VERSION.to_string(),
        flow_type: wire::FLOW_TYPE.to_string(),
        revision: 1,
        nodes,
    })
}

/// Breadth-first discovery of every node reachable from the flow's entry,
/// each exactly once. Terminates on any graph: the discovered set only
/// grows and the arena is finite.
fn discover(flow: &FlowGraph) -> Vec<NodeKey> {
    let mut queue = VecDeque::from([flow.entry()]);
    let mut discovered: AHashSet<NodeKey> = AHashSet::new();
    let mut order = Vec::new();

    while let Some(target) = queue.pop_front() {
        let key = flow.entry_key(target);
        if !discovered.insert(key) {
            continue;
        }
        trace!(node = %flow.node(key).uuid(), "discovered node");
        order.push(key);
        for slot in flow.node(key).exits() {
            if let Some(next) = slot.target {
                queue.push_back(next);
            }
        }
    }

    order
}
