use clap::Parser;
use flowgen::prelude::*;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Compiles a flow-configuration JSON file into a platform definition document
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the flow configurations JSON file
    config_path: String,

    /// Path to write the definition document to (stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let total_start = Instant::now();

    // --- 1. Load and parse the configuration ---
    let config_json = fs::read_to_string(&cli.config_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read configuration file '{}': {}",
            &cli.config_path, e
        ))
    });
    let config: FlowConfigurations = serde_json::from_str(&config_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse configuration JSON: {}", e)));

    // --- 2. Assemble the flow graphs ---
    let assemble_start = Instant::now();
    let ids = RandomIdGenerator;
    let assembler = Assembler::new(&config.global_settings, &ids);
    let document = assembler
        .assemble_all(&config)
        .unwrap_or_else(|e| exit_with_error(&format!("Flow assembly failed: {}", e)));
    let assemble_duration = assemble_start.elapsed();

    // --- 3. Serialize to the definition schema ---
    let serialize_start = Instant::now();
    let wire_document = serialize_document(&document)
        .unwrap_or_else(|e| exit_with_error(&format!("Serialization failed: {}", e)));
    let json = wire_document
        .to_json_pretty()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to render JSON: {}", e)));
    let serialize_duration = serialize_start.elapsed();

    // --- 4. Write the document ---
    match &cli.output {
        Some(path) => {
            fs::write(path, &json).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write '{}': {}", path, e))
            });
            eprintln!(
                "Wrote {} flows to '{}' ({} bytes)",
                wire_document.flows.len(),
                path,
                json.len()
            );
        }
        None => println!("{}", json),
    }

    eprintln!("\n--- Performance Summary ---");
    eprintln!("Assembly:      {:?}", assemble_duration);
    eprintln!("Serialization: {:?}", serialize_duration);
    eprintln!("Total:         {:?}", total_start.elapsed());
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
