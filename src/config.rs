//! The parsed flow-configuration model.
//!
//! These types mirror the configuration JSON an external loader hands this
//! crate (PascalCase keys). Deserialization is the first validation layer:
//! an unknown `FlowType` fails the closed tagged enum, missing required
//! fields fail their structs, and over-length translations fail
//! [`LocalizedText`]'s checked construction.

use crate::graph::ContactField;
use crate::text::LocalizedText;
use serde::Deserialize;

/// Top-level configuration: global settings plus one spec per flow.
#[derive(Debug, Clone, Deserialize)]
pub struct FlowConfigurations {
    #[serde(rename = "GlobalSettings")]
    pub global_settings: GlobalSettings,
    #[serde(rename = "Flows")]
    pub flows: Vec<FlowConfiguration>,
}

/// Settings applied to every flow in the configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalSettings {
    /// ISO-639-3 code of the language used for editing flows, not
    /// necessarily the language used in messaging.
    #[serde(rename = "PrimaryEditingLanguage")]
    pub primary_editing_language: String,
    /// Languages emitted through each flow's localization map.
    #[serde(rename = "LocalizationLanguages", default)]
    pub localization_languages: Vec<String>,
    #[serde(rename = "Consent")]
    pub consent: Consent,
}

/// Consent-handling policy: which languages to detect opt-outs in, what to
/// reply with, and where to record the opt-out.
#[derive(Debug, Clone, Deserialize)]
pub struct Consent {
    #[serde(rename = "OptOutDetectionLanguages")]
    pub opt_out_detection_languages: Vec<String>,
    #[serde(rename = "OptOutReply")]
    pub opt_out_reply: OptOutReply,
    #[serde(rename = "OptedOutContactField")]
    pub opted_out_contact_field: ContactField,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptOutReply {
    #[serde(rename = "Text")]
    pub text: LocalizedText,
}

/// One flow spec. The `FlowType` tag selects the variant; anything else is
/// a configuration error surfaced at parse time.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "FlowType", rename_all = "lowercase")]
pub enum FlowConfiguration {
    /// Asks a list of questions in order, skipping any that already have an
    /// answer on the contact.
    Survey {
        #[serde(rename = "FlowName")]
        flow_name: String,
        #[serde(rename = "Params")]
        params: SurveyParams,
    },
    /// Waits for any reply, then optionally hands over to another flow.
    Activation {
        #[serde(rename = "FlowName")]
        flow_name: String,
        #[serde(rename = "Params")]
        params: ActivationParams,
    },
}

impl FlowConfiguration {
    pub fn flow_name(&self) -> &str {
        match self {
            Self::Survey { flow_name, .. } | Self::Activation { flow_name, .. } => flow_name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SurveyParams {
    #[serde(rename = "Questions")]
    pub questions: Vec<SurveyQuestion>,
}

/// One survey question: the text to send, the contact field the answer
/// lands in, and the flow-results variable the raw reply is saved under.
#[derive(Debug, Clone, Deserialize)]
pub struct SurveyQuestion {
    #[serde(rename = "Text")]
    pub text: LocalizedText,
    #[serde(rename = "ContactField")]
    pub contact_field: ContactField,
    #[serde(rename = "ResultName")]
    pub result_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivationParams {
    #[serde(rename = "ResultName")]
    pub result_name: String,
    /// Flow to enter after a consenting reply; terminal if absent.
    #[serde(rename = "NextFlow")]
    pub next_flow: Option<String>,
}
