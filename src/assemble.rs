//! Flow assembly: configuration in, flow graphs out.
//!
//! The assembler is one of the crate's two outward-facing operations (the
//! other being [`crate::serialize::serialize_document`]). It validates text
//! coverage eagerly, builds the per-flow opt-out handler from the consent
//! policy, and wires survey questions or activation waits into a complete
//! graph. On any error the whole flow is discarded; no partial graph is
//! ever returned.

use crate::config::{
    ActivationParams, Consent, FlowConfiguration, FlowConfigurations, GlobalSettings, SurveyParams,
};
use crate::error::AssemblyError;
use crate::graph::{AskIfUnanswered, Document, ExitTarget, FlowGraph, GraphBuilder, GroupKey};
use crate::ids::IdGenerator;
use crate::optout::{OptOutDetector, standard_detector};
use crate::text::LocalizedText;
use ahash::AHashMap;
use tracing::debug;
use uuid::Uuid;

/// Pre-minted flow identities, keyed by flow name. Activation flows use
/// this to reference their next flow before it has been assembled.
pub type FlowRegistry = AHashMap<String, Uuid>;

/// Builds flow graphs from parsed configuration.
pub struct Assembler<'a> {
    settings: &'a GlobalSettings,
    ids: &'a dyn IdGenerator,
}

impl<'a> Assembler<'a> {
    pub fn new(settings: &'a GlobalSettings, ids: &'a dyn IdGenerator) -> Self {
        Self { settings, ids }
    }

    /// Assembles every configured flow, in configuration order. Flow
    /// identities are minted up front so flows can reference each other by
    /// name regardless of their order in the configuration.
    pub fn assemble_all(&self, config: &FlowConfigurations) -> Result<Document, AssemblyError> {
        let mut registry = FlowRegistry::new();
        for flow in &config.flows {
            registry.insert(flow.flow_name().to_string(), self.ids.generate());
        }

        let flows = config
            .flows
            .iter()
            .map(|flow| self.assemble(flow, &registry))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Document::new(flows))
    }

    /// Assembles a single flow spec against a registry of flow identities.
    /// A flow absent from the registry gets a freshly minted identity.
    pub fn assemble(
        &self,
        flow: &FlowConfiguration,
        registry: &FlowRegistry,
    ) -> Result<FlowGraph, AssemblyError> {
        match flow {
            FlowConfiguration::Survey { flow_name, params } => {
                self.assemble_survey(flow_name, params, registry)
            }
            FlowConfiguration::Activation { flow_name, params } => {
                self.assemble_activation(flow_name, params, registry)
            }
        }
    }

    fn assemble_survey(
        &self,
        flow_name: &str,
        params: &SurveyParams,
        registry: &FlowRegistry,
    ) -> Result<FlowGraph, AssemblyError> {
        if params.questions.is_empty() {
            return Err(AssemblyError::EmptySurvey(flow_name.to_string()));
        }
        for question in &params.questions {
            self.check_text_coverage(flow_name, &question.text)?;
        }
        debug!(
            flow = flow_name,
            questions = params.questions.len(),
            "assembling survey flow"
        );

        let detectors = self.standard_detectors()?;
        let mut builder = GraphBuilder::new(self.ids);
        let handler = self.build_opt_out_handler(&mut builder, &self.settings.consent, flow_name)?;

        let macros: Vec<ExitTarget> = params
            .questions
            .iter()
            .map(|question| {
                builder
                    .ask_if_unanswered(AskIfUnanswered {
                        text: question.text.clone(),
                        field: question.contact_field.clone(),
                        detectors: detectors.clone(),
                        result_name: question.result_name.clone(),
                        prev_answered_exit: None,
                        opt_out_exit: Some(handler.into()),
                        newly_answered_exit: None,
                    })
                    .into()
            })
            .collect();

        // Chains macro i's continue paths (previously- and newly-answered)
        // to macro i+1; the final macro stays terminal.
        let entry = builder.sequence(macros)?;

        Ok(builder.into_flow(
            flow_name,
            self.flow_uuid(registry, flow_name),
            &self.settings.primary_editing_language,
            self.settings.localization_languages.clone(),
            entry.into(),
        ))
    }

    fn assemble_activation(
        &self,
        flow_name: &str,
        params: &ActivationParams,
        registry: &FlowRegistry,
    ) -> Result<FlowGraph, AssemblyError> {
        debug!(
            flow = flow_name,
            next_flow = params.next_flow.as_deref(),
            "assembling activation flow"
        );

        let detectors = self.standard_detectors()?;
        let mut builder = GraphBuilder::new(self.ids);
        let handler = self.build_opt_out_handler(&mut builder, &self.settings.consent, flow_name)?;

        let wait = builder.wait_for_response(&params.result_name, detectors);
        builder.set_opt_out_exit(wait.into(), Some(handler.into()))?;

        if let Some(next_flow) = &params.next_flow {
            let next_uuid =
                registry
                    .get(next_flow)
                    .copied()
                    .ok_or_else(|| AssemblyError::UnknownNextFlow {
                        flow_name: flow_name.to_string(),
                        next_flow: next_flow.clone(),
                    })?;
            let enter = builder.enter_flow(next_flow, next_uuid);
            builder.set_default_exit(wait.into(), Some(enter.into()));
        }

        Ok(builder.into_flow(
            flow_name,
            self.flow_uuid(registry, flow_name),
            &self.settings.primary_editing_language,
            self.settings.localization_languages.clone(),
            wait.into(),
        ))
    }

    /// The consent acknowledgement path: reply to the participant, then
    /// record the opt-out on their contact. Every wait node's opt-out exit
    /// in the flow routes here.
    fn build_opt_out_handler(
        &self,
        builder: &mut GraphBuilder,
        consent: &Consent,
        flow_name: &str,
    ) -> Result<GroupKey, AssemblyError> {
        self.check_text_coverage(flow_name, &consent.opt_out_reply.text)?;
        let reply = builder.send_message(consent.opt_out_reply.text.clone());
        let record = builder.set_contact_field(consent.opted_out_contact_field.clone(), "yes");
        Ok(builder.sequence(vec![reply.into(), record.into()])?)
    }

    /// Resolves the consent policy's detection languages against the
    /// standardised detector table, preserving configuration order.
    fn standard_detectors(&self) -> Result<Vec<OptOutDetector>, AssemblyError> {
        self.settings
            .consent
            .opt_out_detection_languages
            .iter()
            .map(|language| {
                standard_detector(language).ok_or_else(|| {
                    AssemblyError::UnsupportedDetectionLanguage(language.clone())
                })
            })
            .collect()
    }

    /// Checks that text covers the editing language and every localization
    /// language before any graph is built from it.
    fn check_text_coverage(
        &self,
        flow_name: &str,
        text: &LocalizedText,
    ) -> Result<(), AssemblyError> {
        let required = std::iter::once(&self.settings.primary_editing_language)
            .chain(&self.settings.localization_languages);
        for language in required {
            text.require(language)
                .map_err(|source| AssemblyError::InvalidText {
                    flow_name: flow_name.to_string(),
                    source,
                })?;
        }
        Ok(())
    }

    fn flow_uuid(&self, registry: &FlowRegistry, flow_name: &str) -> Uuid {
        registry
            .get(flow_name)
            .copied()
            .unwrap_or_else(|| self.ids.generate())
    }
}
