//! Typed model of the platform's flow-definition schema.
//!
//! This is the target structure of serialization: the JSON document the
//! messaging platform's import mechanism consumes. Field presence, nesting
//! and values are normative; key ordering and whitespace are not. The
//! structs also derive `Deserialize` so round-trip tests can read emitted
//! documents back.

use crate::localization::LocalizationMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DOCUMENT_VERSION: &str = "13";
pub const FLOW_SPEC_VERSION: &str = "13.2.0";
pub const FLOW_TYPE: &str = "messaging";
pub const FLOW_EXPIRY_MINUTES: u32 = 60 * 24 * 7; // 1 week

/// The top-level definition document. The empty collections are required by
/// the schema for platform features this crate does not generate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub version: String,
    pub flows: Vec<Flow>,
    pub campaigns: Vec<serde_json::Value>,
    pub triggers: Vec<serde_json::Value>,
    pub fields: Vec<serde_json::Value>,
    pub groups: Vec<serde_json::Value>,
}

impl Document {
    /// Renders the document the way the original tooling wrote definition
    /// files: pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub uuid: Uuid,
    pub name: String,
    pub expire_after_minutes: u32,
    pub language: String,
    pub localization: LocalizationMap,
    pub spec_version: String,
    #[serde(rename = "type")]
    pub flow_type: String,
    pub revision: u32,
    pub nodes: Vec<FlowNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub uuid: Uuid,
    pub actions: Vec<Action>,
    pub exits: Vec<Exit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub router: Option<Router>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    #[serde(rename = "send_msg")]
    SendMsg { uuid: Uuid, text: String },
    #[serde(rename = "set_contact_field")]
    SetContactField {
        uuid: Uuid,
        field: FieldRef,
        value: String,
    },
    #[serde(rename = "enter_flow")]
    EnterFlow { uuid: Uuid, flow: FlowRef },
}

/// Reference to a platform contact field, in the schema's lowercase shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRef {
    pub key: String,
    pub name: String,
}

/// Reference to another flow by identity and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRef {
    pub uuid: Uuid,
    pub name: String,
}

/// A directed edge out of a node. `destination_uuid` is emitted explicitly
/// as `null` for terminal exits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    pub uuid: Uuid,
    pub destination_uuid: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Router {
    #[serde(rename = "type")]
    pub router_type: String,
    pub default_category_uuid: Uuid,
    pub operand: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait: Option<Wait>,
    pub cases: Vec<Case>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wait {
    #[serde(rename = "type")]
    pub wait_type: String,
}

impl Wait {
    pub fn message() -> Self {
        Self {
            wait_type: "msg".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub arguments: Vec<String>,
    #[serde(rename = "type")]
    pub case_type: String,
    pub uuid: Uuid,
    pub category_uuid: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub exit_uuid: Uuid,
    pub name: String,
    pub uuid: Uuid,
}
