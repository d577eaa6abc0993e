//! Primitive node variants and their wire-format construction.

use crate::error::TextError;
use crate::graph::ExitTarget;
use crate::ids::IdGenerator;
use crate::localization::{LocalizationMap, Translation};
use crate::optout::OptOutDetector;
use crate::text::LocalizedText;
use crate::wire;
use serde::Deserialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// A platform-persisted contact attribute, identified by a stable key and a
/// human-readable display name. Deserializes from the configuration's
/// PascalCase shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactField {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Name")]
    pub name: String,
}

impl ContactField {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }

    fn wire_ref(&self) -> wire::FieldRef {
        wire::FieldRef {
            key: self.key.clone(),
            name: self.name.clone(),
        }
    }
}

/// One directed edge out of a node. The uuid is wire-visible and minted at
/// node construction; the target stays settable until serialization, which
/// is how forward references and cycles are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitSlot {
    pub uuid: Uuid,
    pub target: Option<ExitTarget>,
}

impl ExitSlot {
    fn new(ids: &dyn IdGenerator) -> Self {
        Self {
            uuid: ids.generate(),
            target: None,
        }
    }
}

/// An opt-out detector together with the router-case identity minted for it
/// by the owning wait node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorCase {
    pub detector: OptOutDetector,
    pub case_uuid: Uuid,
}

/// One step in a flow.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    uuid: Uuid,
    pub kind: NodeKind,
}

/// The closed set of node variants. All wire-visible identities a variant
/// owns (action, category and case uuids) live here, assigned once at
/// construction and never recomputed.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Sends a localized message, then follows its default exit.
    SendMessage {
        text: LocalizedText,
        action_uuid: Uuid,
        exit: ExitSlot,
    },
    /// Waits for an inbound reply, saving it under `result_name`. Detector
    /// cases all route to the shared opt-out category, in list order;
    /// anything else takes the default exit.
    WaitForResponse {
        result_name: String,
        cases: Vec<DetectorCase>,
        opt_out_category_uuid: Uuid,
        default_category_uuid: Uuid,
        opt_out_exit: ExitSlot,
        default_exit: ExitSlot,
    },
    /// Writes a literal or templated expression into a contact field.
    SetContactField {
        field: ContactField,
        value: String,
        action_uuid: Uuid,
        exit: ExitSlot,
    },
    /// Branches on whether a contact field already holds text.
    FieldHasTextSplit {
        field: ContactField,
        case_uuid: Uuid,
        has_text_category_uuid: Uuid,
        default_category_uuid: Uuid,
        has_text_exit: ExitSlot,
        default_exit: ExitSlot,
    },
    /// Hands the participant to another flow. The completed case follows
    /// the default exit; the expired case is always terminal.
    EnterAnotherFlow {
        flow_name: String,
        flow_uuid: Uuid,
        action_uuid: Uuid,
        case_uuid: Uuid,
        completed_category_uuid: Uuid,
        expired_category_uuid: Uuid,
        completed_exit: ExitSlot,
        expired_exit: ExitSlot,
    },
}

impl Node {
    pub(crate) fn send_message(ids: &dyn IdGenerator, text: LocalizedText) -> Self {
        Self {
            uuid: ids.generate(),
            kind: NodeKind::SendMessage {
                text,
                action_uuid: ids.generate(),
                exit: ExitSlot::new(ids),
            },
        }
    }

    pub(crate) fn wait_for_response(
        ids: &dyn IdGenerator,
        result_name: String,
        detectors: Vec<OptOutDetector>,
    ) -> Self {
        let cases = detectors
            .into_iter()
            .map(|detector| DetectorCase {
                detector,
                case_uuid: ids.generate(),
            })
            .collect();
        Self {
            uuid: ids.generate(),
            kind: NodeKind::WaitForResponse {
                result_name,
                cases,
                opt_out_category_uuid: ids.generate(),
                default_category_uuid: ids.generate(),
                opt_out_exit: ExitSlot::new(ids),
                default_exit: ExitSlot::new(ids),
            },
        }
    }

    pub(crate) fn set_contact_field(
        ids: &dyn IdGenerator,
        field: ContactField,
        value: String,
    ) -> Self {
        Self {
            uuid: ids.generate(),
            kind: NodeKind::SetContactField {
                field,
                value,
                action_uuid: ids.generate(),
                exit: ExitSlot::new(ids),
            },
        }
    }

    pub(crate) fn field_has_text_split(ids: &dyn IdGenerator, field: ContactField) -> Self {
        Self {
            uuid: ids.generate(),
            kind: NodeKind::FieldHasTextSplit {
                field,
                case_uuid: ids.generate(),
                has_text_category_uuid: ids.generate(),
                default_category_uuid: ids.generate(),
                has_text_exit: ExitSlot::new(ids),
                default_exit: ExitSlot::new(ids),
            },
        }
    }

    pub(crate) fn enter_flow(ids: &dyn IdGenerator, flow_name: String, flow_uuid: Uuid) -> Self {
        Self {
            uuid: ids.generate(),
            kind: NodeKind::EnterAnotherFlow {
                flow_name,
                flow_uuid,
                action_uuid: ids.generate(),
                case_uuid: ids.generate(),
                completed_category_uuid: ids.generate(),
                expired_category_uuid: ids.generate(),
                completed_exit: ExitSlot::new(ids),
                expired_exit: ExitSlot::new(ids),
            },
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// All exit slots in this node's fixed declaration order, unset slots
    /// included. Traversal enumerates edges through this without knowing
    /// the variant; `wire_entry` expects resolved destinations in the same
    /// order.
    pub fn exits(&self) -> Vec<&ExitSlot> {
        match &self.kind {
            NodeKind::SendMessage { exit, .. } | NodeKind::SetContactField { exit, .. } => {
                vec![exit]
            }
            NodeKind::WaitForResponse {
                opt_out_exit,
                default_exit,
                ..
            } => vec![opt_out_exit, default_exit],
            NodeKind::FieldHasTextSplit {
                has_text_exit,
                default_exit,
                ..
            } => vec![has_text_exit, default_exit],
            NodeKind::EnterAnotherFlow {
                completed_exit,
                expired_exit,
                ..
            } => vec![completed_exit, expired_exit],
        }
    }

    /// The slot used for chaining: the continue path of every variant.
    pub(crate) fn default_exit_mut(&mut self) -> &mut ExitSlot {
        match &mut self.kind {
            NodeKind::SendMessage { exit, .. } | NodeKind::SetContactField { exit, .. } => exit,
            NodeKind::WaitForResponse { default_exit, .. }
            | NodeKind::FieldHasTextSplit { default_exit, .. } => default_exit,
            NodeKind::EnterAnotherFlow { completed_exit, .. } => completed_exit,
        }
    }

    pub fn default_exit(&self) -> &ExitSlot {
        match &self.kind {
            NodeKind::SendMessage { exit, .. } | NodeKind::SetContactField { exit, .. } => exit,
            NodeKind::WaitForResponse { default_exit, .. }
            | NodeKind::FieldHasTextSplit { default_exit, .. } => default_exit,
            NodeKind::EnterAnotherFlow { completed_exit, .. } => completed_exit,
        }
    }

    /// Builds this node's wire entry. `destinations` carries the resolved
    /// destination uuid for each slot, in `exits()` order; inline text
    /// resolves to the flow's editing language.
    pub fn wire_entry(
        &self,
        language: &str,
        destinations: &[Option<Uuid>],
    ) -> Result<wire::FlowNode, TextError> {
        let exits = self
            .exits()
            .iter()
            .zip(destinations)
            .map(|(slot, destination)| wire::Exit {
                uuid: slot.uuid,
                destination_uuid: *destination,
            })
            .collect();

        let (actions, router) = match &self.kind {
            NodeKind::SendMessage {
                text, action_uuid, ..
            } => {
                let action = wire::Action::SendMsg {
                    uuid: *action_uuid,
                    text: text.require(language)?.to_string(),
                };
                (vec![action], None)
            }
            NodeKind::WaitForResponse {
                result_name,
                cases,
                opt_out_category_uuid,
                default_category_uuid,
                opt_out_exit,
                default_exit,
            } => {
                let router = wire::Router {
                    router_type: "switch".to_string(),
                    default_category_uuid: *default_category_uuid,
                    operand: "@input.text".to_string(),
                    result_name: Some(result_name.clone()),
                    wait: Some(wire::Wait::message()),
                    cases: cases
                        .iter()
                        .map(|case| {
                            case.detector
                                .wire_case(case.case_uuid, *opt_out_category_uuid)
                        })
                        .collect(),
                    categories: vec![
                        wire::Category {
                            exit_uuid: opt_out_exit.uuid,
                            name: "Stop".to_string(),
                            uuid: *opt_out_category_uuid,
                        },
                        wire::Category {
                            exit_uuid: default_exit.uuid,
                            name: "Other".to_string(),
                            uuid: *default_category_uuid,
                        },
                    ],
                };
                (vec![], Some(router))
            }
            NodeKind::SetContactField {
                field,
                value,
                action_uuid,
                ..
            } => {
                let action = wire::Action::SetContactField {
                    uuid: *action_uuid,
                    field: field.wire_ref(),
                    value: value.clone(),
                };
                (vec![action], None)
            }
            NodeKind::FieldHasTextSplit {
                field,
                case_uuid,
                has_text_category_uuid,
                default_category_uuid,
                has_text_exit,
                default_exit,
            } => {
                let router = wire::Router {
                    router_type: "switch".to_string(),
                    default_category_uuid: *default_category_uuid,
                    operand: format!("@fields.{}", field.key),
                    result_name: None,
                    wait: None,
                    cases: vec![wire::Case {
                        arguments: vec![],
                        case_type: "has_text".to_string(),
                        uuid: *case_uuid,
                        category_uuid: *has_text_category_uuid,
                    }],
                    categories: vec![
                        wire::Category {
                            exit_uuid: has_text_exit.uuid,
                            name: "Has Text".to_string(),
                            uuid: *has_text_category_uuid,
                        },
                        wire::Category {
                            exit_uuid: default_exit.uuid,
                            name: "Other".to_string(),
                            uuid: *default_category_uuid,
                        },
                    ],
                };
                (vec![], Some(router))
            }
            NodeKind::EnterAnotherFlow {
                flow_name,
                flow_uuid,
                action_uuid,
                case_uuid,
                completed_category_uuid,
                expired_category_uuid,
                completed_exit,
                expired_exit,
            } => {
                let action = wire::Action::EnterFlow {
                    uuid: *action_uuid,
                    flow: wire::FlowRef {
                        uuid: *flow_uuid,
                        name: flow_name.clone(),
                    },
                };
                let router = wire::Router {
                    router_type: "switch".to_string(),
                    default_category_uuid: *expired_category_uuid,
                    operand: "@child.run.status".to_string(),
                    result_name: None,
                    wait: None,
                    cases: vec![wire::Case {
                        arguments: vec!["completed".to_string()],
                        case_type: "has_only_text".to_string(),
                        uuid: *case_uuid,
                        category_uuid: *completed_category_uuid,
                    }],
                    categories: vec![
                        wire::Category {
                            exit_uuid: completed_exit.uuid,
                            name: "Complete".to_string(),
                            uuid: *completed_category_uuid,
                        },
                        wire::Category {
                            exit_uuid: expired_exit.uuid,
                            name: "Expired".to_string(),
                            uuid: *expired_category_uuid,
                        },
                    ],
                };
                (vec![action], Some(router))
            }
        };

        Ok(wire::FlowNode {
            uuid: self.uuid,
            actions,
            exits,
            router,
        })
    }

    /// This node's contribution to the flow's localization map: one
    /// translation per requested language, keyed by the localizable
    /// element's uuid. Empty for variants without localizable text.
    pub fn localization(&self, languages: &[String]) -> Result<LocalizationMap, TextError> {
        let mut map = LocalizationMap::new();
        if let NodeKind::SendMessage {
            text, action_uuid, ..
        } = &self.kind
        {
            for language in languages {
                let translation = text.require(language)?;
                map.entry(language.clone()).or_insert_with(BTreeMap::new).insert(
                    *action_uuid,
                    Translation::new(translation),
                );
            }
        }
        Ok(map)
    }
}
