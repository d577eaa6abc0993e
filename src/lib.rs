//! # Flowgen - Conversational Flow Compilation
//!
//! **Flowgen** compiles declarative SMS survey and outreach configurations
//! into the flow-definition documents a RapidPro-style messaging platform
//! imports. A flow is modelled as a directed graph of typed nodes and
//! reusable macro-groups with late-bound, possibly cyclic edges; the
//! serializer walks that graph exactly once per reachable node and emits
//! the platform's fixed JSON schema together with merged multi-language
//! localization data.
//!
//! ## Core Workflow
//!
//! 1.  **Parse Your Configuration**: Deserialize the configuration JSON into
//!     [`config::FlowConfigurations`] (or build the structs directly).
//! 2.  **Assemble**: Hand the configuration to an [`assemble::Assembler`],
//!     which wires each flow spec into a [`graph::FlowGraph`].
//! 3.  **Serialize**: Turn the assembled [`graph::Document`] into a typed
//!     [`wire::Document`] and render it as JSON for the external uploader.
//!
//! Identity generation is injectable: production uses random version-4
//! UUIDs, and tests substitute [`ids::SequentialIdGenerator`] to get
//! byte-identical output for identically constructed graphs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowgen::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config_json = std::fs::read_to_string("flow_configurations.json")?;
//!     let config: FlowConfigurations = serde_json::from_str(&config_json)?;
//!
//!     let ids = RandomIdGenerator;
//!     let assembler = Assembler::new(&config.global_settings, &ids);
//!
//!     let document = assembler.assemble_all(&config)?;
//!     let wire_document = serialize_document(&document)?;
//!
//!     println!("{}", wire_document.to_json_pretty()?);
//!     Ok(())
//! }
//! ```
//!
//! The crate performs no I/O itself: credential, storage and upload
//! concerns belong to the caller.

pub mod assemble;
pub mod config;
pub mod error;
pub mod graph;
pub mod ids;
pub mod localization;
pub mod optout;
pub mod prelude;
pub mod serialize;
pub mod text;
pub mod wire;
