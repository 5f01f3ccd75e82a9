//! Heritage CLI - Command-line interface
//!
//! Usage:
//!   heritage extract <input> [--annotated] [--format turtle|json] [-o <file>]
//!   heritage merge --ontology <ttl> --individuals <ttl> -o <file>
//!   heritage schema [CLASS]
//!   heritage classify <text> [--gpe]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use uuid::Uuid;

use heritage_core::{
    AnnotatedDocument, AppConfig, EntityLabel, IdentifierCollision, IndividualRecord,
    LoggingConfig, OntologyClass, OutputFormat, Triple,
};
use heritage_extractor::{
    EntityClassifier, ExtractionPipeline, ExtractionRun, ExtractionSummary, RuleBasedAnnotator,
    StrictDateParser, TripleAssembler, TurtleWriter,
};

#[derive(Parser)]
#[command(name = "heritage")]
#[command(about = "Cultural heritage knowledge extraction CLI")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract ontology individuals from a document
    Extract {
        /// Raw text, or annotation JSON with --annotated
        input: PathBuf,
        /// Treat the input as annotations from an external NLP engine
        #[arg(long)]
        annotated: bool,
        /// Output format (turtle or json)
        #[arg(long)]
        format: Option<OutputFormat>,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Append generated individuals to an ontology file
    Merge {
        #[arg(long)]
        ontology: PathBuf,
        #[arg(long)]
        individuals: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Show the properties allowed for a class
    Schema {
        /// Class name; all classes when omitted
        class: Option<String>,
    },
    /// Classify a mention
    Classify {
        text: String,
        /// Treat the mention as a place (GPE)
        #[arg(long)]
        gpe: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    init_tracing(&config.logging);

    match cli.command {
        Commands::Extract {
            input,
            annotated,
            format,
            output,
        } => {
            let run = extract(&config, &input, annotated)?;
            let format = format.unwrap_or(config.output.format);
            let rendered = render(&run, format, &config.output.base_iri)?;
            write_output(output.as_deref(), &rendered)?;
            tracing::info!(
                records = run.summary.total(),
                collisions = run.summary.collisions,
                "extraction written"
            );
        }
        Commands::Merge {
            ontology,
            individuals,
            output,
        } => {
            let merged = merge(&ontology, &individuals)?;
            write_output(Some(&output), &merged)?;
            tracing::info!("Merged ontology written to {}", output.display());
        }
        Commands::Schema { class } => match class {
            Some(name) => {
                let class: OntologyClass = name.parse()?;
                print!("{}", describe_class(class));
            }
            None => {
                for class in OntologyClass::ALL {
                    println!("{}", describe_class(class));
                }
            }
        },
        Commands::Classify { text, gpe } => {
            let label = gpe.then_some(EntityLabel::Gpe);
            match EntityClassifier::new().classify(&text, label.as_ref()) {
                Some(class) => println!("{class}"),
                None => println!("unclassified"),
            }
        }
    }

    Ok(())
}

// ============================================================================
// Setup
// ============================================================================

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?
            .with_env_override()?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

fn init_tracing(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    if config.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

// ============================================================================
// Commands
// ============================================================================

fn extract(config: &AppConfig, input: &Path, annotated: bool) -> anyhow::Result<ExtractionRun> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let pipeline =
        ExtractionPipeline::new().with_date_parser(StrictDateParser::with_config(&config.dates));

    let run = if annotated {
        let document = AnnotatedDocument::from_json(&content)
            .with_context(|| format!("invalid annotations in {}", input.display()))?;
        pipeline.run(&document)
    } else {
        let annotator = RuleBasedAnnotator::with_config(&config.annotator);
        pipeline.extract_text(&annotator, &content)?
    };

    Ok(run)
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    run_id: Uuid,
    summary: &'a ExtractionSummary,
    records: &'a [IndividualRecord],
    triples: Vec<Triple>,
    collisions: &'a [IdentifierCollision],
}

fn render(run: &ExtractionRun, format: OutputFormat, base_iri: &str) -> anyhow::Result<String> {
    match format {
        OutputFormat::Turtle => Ok(TurtleWriter::new(base_iri).document(&run.records)),
        OutputFormat::Json => {
            let output = JsonOutput {
                run_id: run.run_id,
                summary: &run.summary,
                records: &run.records,
                triples: TripleAssembler::new().assemble(&run.records),
                collisions: run.registry.collisions(),
            };
            Ok(serde_json::to_string_pretty(&output)?)
        }
    }
}

/// Ontology text, a newline, then the individuals
fn merge(ontology: &Path, individuals: &Path) -> anyhow::Result<String> {
    let ontology_text = fs::read_to_string(ontology)
        .with_context(|| format!("failed to read ontology {}", ontology.display()))?;
    let individuals_text = fs::read_to_string(individuals)
        .with_context(|| format!("failed to read individuals {}", individuals.display()))?;

    Ok(format!("{ontology_text}\n{individuals_text}"))
}

fn describe_class(class: OntologyClass) -> String {
    let schema = class.schema();
    let mut out = format!("{class}\n");
    for property in schema.data_properties {
        out.push_str(&format!("  data   :{property}\n"));
    }
    for property in schema.object_properties {
        out.push_str(&format!("  object :{property}\n"));
    }
    out
}

fn write_output(path: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            print!("{content}");
            Ok(())
        }
    }
}
