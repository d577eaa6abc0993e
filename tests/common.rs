//! Common test utilities for building flow configurations and graphs.
use flowgen::prelude::*;
use std::collections::BTreeMap;

/// The configuration used by most end-to-end tests: one survey flow with a
/// single question and English-only opt-out detection.
#[allow(dead_code)]
pub const DEMO_CONFIG_JSON: &str = r#"{
    "GlobalSettings": {
        "PrimaryEditingLanguage": "eng",
        "Consent": {
            "OptOutDetectionLanguages": ["eng"],
            "OptOutReply": { "Text": { "eng": "You have been opted out" } },
            "OptedOutContactField": { "Key": "opted_out", "Name": "Opted Out" }
        }
    },
    "Flows": [
        {
            "FlowType": "survey",
            "FlowName": "demo",
            "Params": {
                "Questions": [
                    {
                        "Text": { "eng": "How old are you?" },
                        "ContactField": { "Key": "age", "Name": "Age" },
                        "ResultName": "age_result"
                    }
                ]
            }
        }
    ]
}"#;

/// A two-flow configuration: an activation flow that hands over to the
/// "demo" survey, with a Somali localization language.
#[allow(dead_code)]
pub const MULTI_FLOW_CONFIG_JSON: &str = r#"{
    "GlobalSettings": {
        "PrimaryEditingLanguage": "eng",
        "LocalizationLanguages": ["som"],
        "Consent": {
            "OptOutDetectionLanguages": ["eng", "som"],
            "OptOutReply": {
                "Text": {
                    "eng": "You have been opted out",
                    "som": "Waad ka baxday"
                }
            },
            "OptedOutContactField": { "Key": "opted_out", "Name": "Opted Out" }
        }
    },
    "Flows": [
        {
            "FlowType": "activation",
            "FlowName": "activate",
            "Params": { "ResultName": "activation", "NextFlow": "demo" }
        },
        {
            "FlowType": "survey",
            "FlowName": "demo",
            "Params": {
                "Questions": [
                    {
                        "Text": {
                            "eng": "How old are you?",
                            "som": "Immisa jir baad tahay?"
                        },
                        "ContactField": { "Key": "age", "Name": "Age" },
                        "ResultName": "age_result"
                    }
                ]
            }
        }
    ]
}"#;

/// Builds a single-language text bundle, panicking on invalid input.
#[allow(dead_code)]
pub fn text(language: &str, content: &str) -> LocalizedText {
    LocalizedText::single(language, content).expect("test text should be valid")
}

/// Builds a text bundle covering several languages.
#[allow(dead_code)]
pub fn multi_text(entries: &[(&str, &str)]) -> LocalizedText {
    let map: BTreeMap<String, String> = entries
        .iter()
        .map(|(language, content)| (language.to_string(), content.to_string()))
        .collect();
    LocalizedText::new(map).expect("test text should be valid")
}

#[allow(dead_code)]
pub fn age_field() -> ContactField {
    ContactField::new("age", "Age")
}

/// Parses a configuration fixture, panicking on malformed JSON.
#[allow(dead_code)]
pub fn parse_config(json: &str) -> FlowConfigurations {
    serde_json::from_str(json).expect("test configuration should parse")
}

/// Assembles a configuration with a deterministic identity generator and
/// serializes it to the wire format.
#[allow(dead_code)]
pub fn compile_deterministic(json: &str) -> flowgen::wire::Document {
    let config = parse_config(json);
    let ids = SequentialIdGenerator::new();
    let assembler = Assembler::new(&config.global_settings, &ids);
    let document = assembler
        .assemble_all(&config)
        .expect("test configuration should assemble");
    serialize_document(&document).expect("test document should serialize")
}

/// Finds the wait node in a serialized flow: the only node with a message
/// wait on its router.
#[allow(dead_code)]
pub fn find_wait_node(flow: &flowgen::wire::Flow) -> &flowgen::wire::FlowNode {
    flow.nodes
        .iter()
        .find(|node| {
            node.router
                .as_ref()
                .is_some_and(|router| router.wait.is_some())
        })
        .expect("flow should contain a wait node")
}
