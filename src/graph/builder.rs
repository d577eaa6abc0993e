//! The per-flow arena and graph construction API.

use crate::error::GraphError;
use crate::graph::node::{ContactField, NodeKind};
use crate::graph::{ExitTarget, FlowGraph, Group, GroupKey, Node, NodeKey, resolve_entry};
use crate::ids::IdGenerator;
use crate::optout::OptOutDetector;
use crate::text::LocalizedText;
use itertools::Itertools;
use uuid::Uuid;

/// Parameters for the question macro. The three exits may be supplied here
/// or wired later through the builder's setters; leaving one `None` makes
/// that path terminal.
#[derive(Debug, Clone)]
pub struct AskIfUnanswered {
    pub text: LocalizedText,
    pub field: ContactField,
    pub detectors: Vec<OptOutDetector>,
    pub result_name: String,
    pub prev_answered_exit: Option<ExitTarget>,
    pub opt_out_exit: Option<ExitTarget>,
    pub newly_answered_exit: Option<ExitTarget>,
}

/// Owns a flow's node and group arena while the flow is being composed.
///
/// All nodes and groups are addressed by stable keys, so exits can be wired
/// in any order, including forward references into parts of the graph that
/// do not exist yet and edges back to ancestors.
pub struct GraphBuilder<'a> {
    ids: &'a dyn IdGenerator,
    nodes: Vec<Node>,
    groups: Vec<Group>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(ids: &'a dyn IdGenerator) -> Self {
        Self {
            ids,
            nodes: Vec::new(),
            groups: Vec::new(),
        }
    }

    fn push_node(&mut self, node: Node) -> NodeKey {
        self.nodes.push(node);
        NodeKey(self.nodes.len() - 1)
    }

    fn push_group(&mut self, group: Group) -> GroupKey {
        self.groups.push(group);
        GroupKey(self.groups.len() - 1)
    }

    // --- Primitive nodes ---

    pub fn send_message(&mut self, text: LocalizedText) -> NodeKey {
        self.push_node(Node::send_message(self.ids, text))
    }

    pub fn wait_for_response(
        &mut self,
        result_name: impl Into<String>,
        detectors: Vec<OptOutDetector>,
    ) -> NodeKey {
        self.push_node(Node::wait_for_response(
            self.ids,
            result_name.into(),
            detectors,
        ))
    }

    pub fn set_contact_field(
        &mut self,
        field: ContactField,
        value: impl Into<String>,
    ) -> NodeKey {
        self.push_node(Node::set_contact_field(self.ids, field, value.into()))
    }

    pub fn field_has_text_split(&mut self, field: ContactField) -> NodeKey {
        self.push_node(Node::field_has_text_split(self.ids, field))
    }

    pub fn enter_flow(&mut self, flow_name: impl Into<String>, flow_uuid: Uuid) -> NodeKey {
        self.push_node(Node::enter_flow(self.ids, flow_name.into(), flow_uuid))
    }

    // --- Macro groups ---

    /// Chains `members` in order, leaving the group's default exit (the
    /// last member's) terminal. Fails on an empty member list.
    pub fn sequence(&mut self, members: Vec<ExitTarget>) -> Result<GroupKey, GraphError> {
        self.sequence_with_tail(members, None)
    }

    /// Chains `members` in order and points the group's default exit at
    /// `tail`.
    pub fn sequence_with_tail(
        &mut self,
        members: Vec<ExitTarget>,
        tail: Option<ExitTarget>,
    ) -> Result<GroupKey, GraphError> {
        let (&first, &last) = match (members.first(), members.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(GraphError::EmptySequence),
        };

        for (member, next) in members.iter().copied().tuple_windows() {
            self.set_default_exit(member, Some(next));
        }
        self.set_default_exit(last, tail);

        Ok(self.push_group(Group::Sequence { first, last }))
    }

    /// Builds the question macro. Wiring order is fixed: the field split's
    /// has-text branch leaves via `prev_answered_exit` and its default
    /// branch sends the question; the send node leads to the wait node; the
    /// wait node's opt-out branch leaves via `opt_out_exit` and its default
    /// branch persists `@results.<result_name>` into the contact field,
    /// which then leaves via `newly_answered_exit`.
    pub fn ask_if_unanswered(&mut self, params: AskIfUnanswered) -> GroupKey {
        let AskIfUnanswered {
            text,
            field,
            detectors,
            result_name,
            prev_answered_exit,
            opt_out_exit,
            newly_answered_exit,
        } = params;

        let split = self.field_has_text_split(field.clone());
        let send = self.send_message(text);
        let wait = self.wait_for_response(result_name.clone(), detectors);
        let set_field = self.set_contact_field(field, format!("@results.{result_name}"));

        self.node_mut(split).kind_set_has_text_exit(prev_answered_exit);
        self.node_mut(split).default_exit_mut().target = Some(send.into());
        self.node_mut(send).default_exit_mut().target = Some(wait.into());
        self.node_mut(wait).kind_set_opt_out_exit(opt_out_exit);
        self.node_mut(wait).default_exit_mut().target = Some(set_field.into());
        self.node_mut(set_field).default_exit_mut().target = newly_answered_exit;

        self.push_group(Group::AskIfUnanswered {
            split,
            send,
            wait,
            set_field,
        })
    }

    // --- Exit wiring ---

    /// Sets the continue path of a node or group. For a sequence this
    /// proxies onto the last member; for a question macro it sets both
    /// continue paths (previously-answered and newly-answered), which is
    /// what makes chaining question macros work.
    pub fn set_default_exit(&mut self, of: ExitTarget, to: Option<ExitTarget>) {
        match of {
            ExitTarget::Node(key) => self.node_mut(key).default_exit_mut().target = to,
            ExitTarget::Group(key) => match self.groups[key.0] {
                Group::Sequence { last, .. } => self.set_default_exit(last, to),
                Group::AskIfUnanswered {
                    split, set_field, ..
                } => {
                    self.node_mut(split).kind_set_has_text_exit(to);
                    self.node_mut(set_field).default_exit_mut().target = to;
                }
            },
        }
    }

    /// Sets the opt-out branch of a wait node or question macro.
    pub fn set_opt_out_exit(
        &mut self,
        of: ExitTarget,
        to: Option<ExitTarget>,
    ) -> Result<(), GraphError> {
        let key = match of {
            ExitTarget::Node(key) => key,
            ExitTarget::Group(key) => match self.groups[key.0] {
                Group::AskIfUnanswered { wait, .. } => wait,
                Group::Sequence { .. } => {
                    return Err(self.no_such_slot(of, "opt-out"));
                }
            },
        };
        if let NodeKind::WaitForResponse { opt_out_exit, .. } = &mut self.nodes[key.0].kind {
            opt_out_exit.target = to;
            return Ok(());
        }
        Err(self.no_such_slot(of, "opt-out"))
    }

    /// Sets the has-text branch of a field split node.
    pub fn set_has_text_exit(
        &mut self,
        of: NodeKey,
        to: Option<ExitTarget>,
    ) -> Result<(), GraphError> {
        if let NodeKind::FieldHasTextSplit { has_text_exit, .. } = &mut self.nodes[of.0].kind {
            has_text_exit.target = to;
            return Ok(());
        }
        Err(self.no_such_slot(of.into(), "has-text"))
    }

    /// Sets a question macro's previously-answered exit.
    pub fn set_prev_answered_exit(
        &mut self,
        of: GroupKey,
        to: Option<ExitTarget>,
    ) -> Result<(), GraphError> {
        match self.groups[of.0] {
            Group::AskIfUnanswered { split, .. } => {
                self.node_mut(split).kind_set_has_text_exit(to);
                Ok(())
            }
            Group::Sequence { .. } => Err(self.no_such_slot(of.into(), "previously-answered")),
        }
    }

    /// Sets a question macro's newly-answered exit.
    pub fn set_newly_answered_exit(
        &mut self,
        of: GroupKey,
        to: Option<ExitTarget>,
    ) -> Result<(), GraphError> {
        match self.groups[of.0] {
            Group::AskIfUnanswered { set_field, .. } => {
                self.node_mut(set_field).default_exit_mut().target = to;
                Ok(())
            }
            Group::Sequence { .. } => Err(self.no_such_slot(of.into(), "newly-answered")),
        }
    }

    fn no_such_slot(&self, of: ExitTarget, slot: &'static str) -> GraphError {
        GraphError::NoSuchExitSlot {
            node_uuid: self.entry_uuid(of),
            slot,
        }
    }

    // --- Lookup ---

    pub fn node(&self, key: NodeKey) -> &Node {
        &self.nodes[key.0]
    }

    fn node_mut(&mut self, key: NodeKey) -> &mut Node {
        &mut self.nodes[key.0]
    }

    pub fn group(&self, key: GroupKey) -> &Group {
        &self.groups[key.0]
    }

    /// The node a target enters, with groups unwrapped.
    pub fn entry_key(&self, target: ExitTarget) -> NodeKey {
        resolve_entry(&self.groups, target)
    }

    /// The delegated identity of a node or group.
    pub fn entry_uuid(&self, target: ExitTarget) -> Uuid {
        self.node(self.entry_key(target)).uuid()
    }

    /// Freezes the arena into a read-only flow graph rooted at `entry`.
    pub fn into_flow(
        self,
        name: impl Into<String>,
        uuid: Uuid,
        language: impl Into<String>,
        localization_languages: Vec<String>,
        entry: ExitTarget,
    ) -> FlowGraph {
        FlowGraph::new(
            name.into(),
            uuid,
            language.into(),
            localization_languages,
            self.nodes,
            self.groups,
            entry,
        )
    }
}

impl Node {
    // Infallible variants of the slot setters, used by the macro assembly
    // paths where the variant is known by construction.
    fn kind_set_has_text_exit(&mut self, to: Option<ExitTarget>) {
        if let NodeKind::FieldHasTextSplit { has_text_exit, .. } = &mut self.kind {
            has_text_exit.target = to;
        }
    }

    fn kind_set_opt_out_exit(&mut self, to: Option<ExitTarget>) {
        if let NodeKind::WaitForResponse { opt_out_exit, .. } = &mut self.kind {
            opt_out_exit.target = to;
        }
    }
}
