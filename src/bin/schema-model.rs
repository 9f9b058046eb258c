//! Schema Model CLI
//!
//! Command-line interface for transforming JSON Schemas and generating
//! document-model classes.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use schema_model::{
    load_schema, write_output, Config, Engine, GenerateError, LoadError, MongoidRenderer,
    SchemaSource,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-model")]
#[command(about = "Transform JSON Schemas into document-model classes")]
#[command(version)]
struct Cli {
    /// Log pipeline steps to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the transformed schema tree as JSON
    Transform {
        #[command(flatten)]
        source: SourceArgs,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Render a Mongoid document class from a schema
    Generate {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file (stdout if not specified)
        #[arg(long, conflicts_with = "output_dir")]
        output: Option<PathBuf>,

        /// Output directory; the file is named after the schema
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Schema source: file path or URL (http:// or https://)
    schema: String,

    /// Engine configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Schema name (default: derived from the source file name)
    #[arg(long)]
    name: Option<String>,

    /// Keep object keys as written instead of converting to snake_case
    #[arg(long)]
    no_snake_case: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Transform { source, pretty } => run_transform(&source, pretty),
        Commands::Generate {
            source,
            output,
            output_dir,
        } => run_generate(&source, output, output_dir),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_transform(args: &SourceArgs, pretty: bool) -> Result<(), GenerateError> {
    let (mut engine, document) = prepare(args)?;
    let tree = engine.run(&document)?;

    let json_output = if pretty {
        format!("{:#}", tree)
    } else {
        tree.to_string()
    };
    println!("{}", json_output);
    Ok(())
}

fn run_generate(
    args: &SourceArgs,
    output: Option<PathBuf>,
    output_dir: Option<PathBuf>,
) -> Result<(), GenerateError> {
    let (mut engine, document) = prepare(args)?;

    let Some(rendered) = engine.generate(&document, &MongoidRenderer)? else {
        tracing::info!(schema = engine.schema_name(), "schema has no properties, nothing generated");
        return Ok(());
    };

    let destination = output.or_else(|| {
        output_dir.map(|dir| dir.join(format!("{}.rb", engine.schema_name().to_lowercase())))
    });

    match destination {
        Some(path) => {
            write_output(&path, &rendered)?;
            tracing::info!(path = %path.display(), "model written");
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

/// Build the engine configuration and load the source document.
fn prepare(args: &SourceArgs) -> Result<(Engine, Value), GenerateError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    let source = SchemaSource::parse(&args.schema);
    let name = args
        .name
        .clone()
        .unwrap_or_else(|| source.logical_name());
    config.schema_name = Config::schema_name_from(&name);
    if args.no_snake_case {
        config.snake_case_keys = false;
    }

    let document = source.load()?;
    let engine = Engine::new(config)?;
    Ok((engine, document))
}

fn load_config(path: &Path) -> Result<Config, LoadError> {
    let raw = load_schema(path)?;
    serde_json::from_value(raw).map_err(|source| LoadError::InvalidJson { source })
}
