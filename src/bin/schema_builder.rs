//! Schema Builder CLI
//!
//! Converts JSON record manifests into GraphQL object types.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use graphql_schema_builder::{
    BuilderConfig, Converter, InferenceMode, Manifest, OutputFormat, SchemaObject,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-builder")]
#[command(about = "Convert record descriptions into GraphQL object types")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to schema-builder.toml lookup)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the manifest's root record and print the result
    Convert {
        /// Record manifest (JSON)
        manifest: PathBuf,
        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
        /// Scalar inference mode
        #[arg(long, value_enum)]
        inference: Option<InferenceArg>,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that the manifest's root record converts
    Check {
        /// Record manifest (JSON)
        manifest: PathBuf,
    },

    /// Show the effective configuration
    Config {
        /// Save to this file instead of printing
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Sdl,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum InferenceArg {
    Strict,
    Native,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = cli.config.as_deref().map(|p| p.to_string_lossy().into_owned());
    let mut config = BuilderConfig::load_from(config_path.as_deref())?;

    match cli.command {
        Commands::Convert { manifest, format, inference, output } => {
            if let Some(format) = format {
                config.output.format = match format {
                    FormatArg::Sdl => OutputFormat::Sdl,
                    FormatArg::Json => OutputFormat::Json,
                };
            }
            if let Some(inference) = inference {
                config.converter.inference = match inference {
                    InferenceArg::Strict => InferenceMode::Strict,
                    InferenceArg::Native => InferenceMode::Native,
                };
            }

            let object = convert_manifest(&manifest, &config)?;
            let rendered = render(&object, &config)?;

            match output {
                Some(path) => {
                    fs::write(&path, rendered)?;
                    println!("✅ Wrote {} to {}", object.name, path.display());
                }
                None => print!("{}", rendered),
            }
            Ok(())
        }

        Commands::Check { manifest } => {
            let object = convert_manifest(&manifest, &config)?;
            let nested = object.nested_objects().len();
            println!(
                "✅ {} converts: {} fields, {} object types",
                object.name,
                object.len(),
                nested
            );
            Ok(())
        }

        Commands::Config { output } => {
            match output {
                Some(path) => {
                    config.save(&path.to_string_lossy())?;
                    println!("✅ Saved configuration to {}", path.display());
                }
                None => print!("{}", config.to_toml()?),
            }
            Ok(())
        }
    }
}

fn convert_manifest(path: &Path, config: &BuilderConfig) -> Result<SchemaObject, Box<dyn std::error::Error>> {
    let manifest = Manifest::from_file(path)?.load()?;
    let converter = Converter::new(config.converter.clone())?;
    Ok(converter.convert(&manifest.root()?)?)
}

fn render(object: &SchemaObject, config: &BuilderConfig) -> Result<String, Box<dyn std::error::Error>> {
    let rendered = match config.output.format {
        OutputFormat::Sdl => object.to_sdl(),
        OutputFormat::Json if config.output.pretty => serde_json::to_string_pretty(object)? + "\n",
        OutputFormat::Json => serde_json::to_string(object)? + "\n",
    };
    Ok(rendered)
}
