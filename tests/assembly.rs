//! Tests for flow assembly from parsed configuration.
mod common;
use common::*;
use flowgen::prelude::*;
use flowgen::wire;

fn assemble_deterministic(json: &str) -> std::result::Result<Document, AssemblyError> {
    let config = parse_config(json);
    let ids = SequentialIdGenerator::new();
    let assembler = Assembler::new(&config.global_settings, &ids);
    assembler.assemble_all(&config)
}

#[test]
fn test_survey_assembles_question_macro_plus_opt_out_handler() {
    let document = compile_deterministic(DEMO_CONFIG_JSON);
    let flow = &document.flows[0];
    assert_eq!(flow.name, "demo");

    // 4 macro nodes (split, send, wait, set-field) plus the 2 handler
    // nodes (reply, record opt-out).
    assert_eq!(flow.nodes.len(), 6);

    // The wait node's opt-out exit routes to the handler's reply node.
    let wait = find_wait_node(flow);
    let handler_entry = wait.exits[0].destination_uuid.expect("opt-out exit wired");
    let reply = flow
        .nodes
        .iter()
        .find(|node| node.uuid == handler_entry)
        .expect("handler reachable from the wait node");
    assert!(matches!(
        reply.actions[0],
        wire::Action::SendMsg { .. }
    ));

    // The handler then records the opt-out and terminates.
    let record_uuid = reply.exits[0].destination_uuid.expect("handler chained");
    let record = flow
        .nodes
        .iter()
        .find(|node| node.uuid == record_uuid)
        .unwrap();
    match &record.actions[0] {
        wire::Action::SetContactField { field, value, .. } => {
            assert_eq!(field.key, "opted_out");
            assert_eq!(value, "yes");
        }
        other => panic!("expected a set-field action, got {other:?}"),
    }
    assert_eq!(record.exits[0].destination_uuid, None);
}

#[test]
fn test_survey_chains_question_macros() {
    let two_questions = DEMO_CONFIG_JSON.replace(
        r#"{
                        "Text": { "eng": "How old are you?" },
                        "ContactField": { "Key": "age", "Name": "Age" },
                        "ResultName": "age_result"
                    }"#,
        r#"{
                        "Text": { "eng": "How old are you?" },
                        "ContactField": { "Key": "age", "Name": "Age" },
                        "ResultName": "age_result"
                    },
                    {
                        "Text": { "eng": "Which district do you live in?" },
                        "ContactField": { "Key": "district", "Name": "District" },
                        "ResultName": "district_result"
                    }"#,
    );
    let document = compile_deterministic(&two_questions);
    let flow = &document.flows[0];

    // 2 macros of 4 nodes each plus one shared handler.
    assert_eq!(flow.nodes.len(), 10);

    // The first macro's split is the entry; its has-text branch skips
    // ahead to the second macro's split.
    let first_split = &flow.nodes[0];
    let router = first_split.router.as_ref().expect("entry is a split");
    assert_eq!(router.operand, "@fields.age");
    let skip_target = first_split.exits[0].destination_uuid.unwrap();
    let second_split = flow
        .nodes
        .iter()
        .find(|node| node.uuid == skip_target)
        .expect("previously-answered exit reaches the next macro");
    assert_eq!(
        second_split.router.as_ref().unwrap().operand,
        "@fields.district"
    );

    // Newly-answered continues to the same place.
    let set_field = flow
        .nodes
        .iter()
        .find(|node| {
            matches!(
                node.actions.first(),
                Some(wire::Action::SetContactField { field, .. }) if field.key == "age"
            )
        })
        .unwrap();
    assert_eq!(set_field.exits[0].destination_uuid, Some(skip_target));
}

#[test]
fn test_activation_flow_enters_registered_next_flow() {
    let document = compile_deterministic(MULTI_FLOW_CONFIG_JSON);
    assert_eq!(document.flows.len(), 2);

    let activation = &document.flows[0];
    let survey = &document.flows[1];
    assert_eq!(activation.name, "activate");
    assert_eq!(survey.name, "demo");

    // wait + enter-flow + 2 handler nodes.
    assert_eq!(activation.nodes.len(), 4);

    let wait = find_wait_node(activation);
    assert_eq!(
        wait.router.as_ref().unwrap().result_name.as_deref(),
        Some("activation")
    );

    // The reply path enters the survey flow under its pre-minted identity.
    let enter_uuid = wait.exits[1].destination_uuid.unwrap();
    let enter = activation
        .nodes
        .iter()
        .find(|node| node.uuid == enter_uuid)
        .unwrap();
    match &enter.actions[0] {
        wire::Action::EnterFlow { flow, .. } => {
            assert_eq!(flow.name, "demo");
            assert_eq!(flow.uuid, survey.uuid);
        }
        other => panic!("expected an enter-flow action, got {other:?}"),
    }

    // Completed continues (terminal here); expired is always terminal.
    let router = enter.router.as_ref().unwrap();
    assert_eq!(router.operand, "@child.run.status");
    assert_eq!(router.cases[0].arguments, vec!["completed".to_string()]);
    assert_eq!(enter.exits[1].destination_uuid, None);
}

#[test]
fn test_activation_without_next_flow_is_terminal() {
    let config = MULTI_FLOW_CONFIG_JSON.replace(r#", "NextFlow": "demo""#, "");
    let document = compile_deterministic(&config);
    let activation = &document.flows[0];

    assert_eq!(activation.nodes.len(), 3);
    let wait = find_wait_node(activation);
    assert_eq!(wait.exits[1].destination_uuid, None);
}

#[test]
fn test_unknown_next_flow_fails_assembly() {
    let config = MULTI_FLOW_CONFIG_JSON.replace(r#""NextFlow": "demo""#, r#""NextFlow": "missing""#);
    let err = assemble_deterministic(&config).unwrap_err();
    assert_eq!(
        err,
        AssemblyError::UnknownNextFlow {
            flow_name: "activate".to_string(),
            next_flow: "missing".to_string(),
        }
    );
}

#[test]
fn test_empty_survey_fails_assembly() {
    let config = DEMO_CONFIG_JSON.replace(
        r#""Questions": [
                    {
                        "Text": { "eng": "How old are you?" },
                        "ContactField": { "Key": "age", "Name": "Age" },
                        "ResultName": "age_result"
                    }
                ]"#,
        r#""Questions": []"#,
    );
    let err = assemble_deterministic(&config).unwrap_err();
    assert_eq!(err, AssemblyError::EmptySurvey("demo".to_string()));
}

#[test]
fn test_unsupported_detection_language_fails_assembly() {
    let config = DEMO_CONFIG_JSON.replace(
        r#""OptOutDetectionLanguages": ["eng"]"#,
        r#""OptOutDetectionLanguages": ["eng", "swa"]"#,
    );
    let err = assemble_deterministic(&config).unwrap_err();
    assert_eq!(
        err,
        AssemblyError::UnsupportedDetectionLanguage("swa".to_string())
    );
}

#[test]
fn test_text_missing_a_required_language_fails_assembly() {
    // Somali is a localization language, but the question text and the
    // opt-out reply only cover English.
    let config = DEMO_CONFIG_JSON.replace(
        r#""PrimaryEditingLanguage": "eng","#,
        r#""PrimaryEditingLanguage": "eng",
        "LocalizationLanguages": ["som"],"#,
    );
    let err = assemble_deterministic(&config).unwrap_err();
    assert_eq!(
        err,
        AssemblyError::InvalidText {
            flow_name: "demo".to_string(),
            source: TextError::MissingTranslation("som".to_string()),
        }
    );
}

#[test]
fn test_detector_cases_follow_detection_language_order() {
    let document = compile_deterministic(MULTI_FLOW_CONFIG_JSON);
    let wait = find_wait_node(&document.flows[1]);
    let router = wait.router.as_ref().unwrap();

    // ["eng", "som"] in configuration order: exact phrase before regex.
    assert_eq!(router.cases.len(), 2);
    assert_eq!(router.cases[0].case_type, "has_only_phrase");
    assert_eq!(router.cases[0].arguments, vec!["Stop".to_string()]);
    assert_eq!(router.cases[1].case_type, "has_pattern");
    assert_eq!(router.cases[1].arguments, vec!["^j[ao]+w*ji".to_string()]);

    // Every case routes to the shared opt-out category, which is listed
    // before the default category.
    let opt_out_category = router.categories[0].uuid;
    assert!(router.cases.iter().all(|case| case.category_uuid == opt_out_category));
    assert_eq!(router.categories[0].name, "Stop");
    assert_eq!(router.categories[1].uuid, router.default_category_uuid);
}
