//! Modeldef CLI
//!
//! Command-line interface for compiling Swagger v2 specs into connection
//! model definitions.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use modeldef_common::{load_endpoint_list, EndpointRef, GeneratorConfig};
use modeldef_parser::{CompileOptions, CompileReport, EndpointFilter, SwaggerParser};
use modeldef_writer::{publish_all, DefinitionSink, FileSink, HttpSink, PublishSummary};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const TOKEN_ENV: &str = "MODELDEF_BEARER_TOKEN";

#[derive(Parser)]
#[command(name = "modeldef")]
#[command(version, about = "Compile Swagger v2 specs into connection model definitions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a spec and show actions, keys and skip decisions
    #[command(after_help = "EXAMPLES:\n  \
        # List every operation of a spec\n  \
        modeldef inspect --spec booking.json\n\n  \
        # Preview which operations a scope filter keeps\n  \
        modeldef inspect --spec booking.json --scopes setup.read -v")]
    Inspect(InspectArgs),

    /// Compile specs into definitions and write, post or print them
    #[command(after_help = "EXAMPLES:\n  \
        # Print definitions for one spec\n  \
        modeldef generate \\\n    \
        --spec booking.json \\\n    \
        --platform apaleo \\\n    \
        --definition-id conn_def::XYZ123 \\\n    \
        --base-url https://api.apaleo.com\n\n  \
        # Write files for a directory of specs\n  \
        modeldef generate --spec ./specs --config apaleo.yaml --output ./out\n\n  \
        # Post definitions to the platform\n  \
        MODELDEF_BEARER_TOKEN=... modeldef generate \\\n    \
        --spec booking.json \\\n    \
        --config apaleo.yaml \\\n    \
        --post --target http://localhost:3005/v1/connection-model-definitions")]
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Scopes every operation must mention, space or comma separated
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    scopes: Option<Vec<String>>,

    /// Endpoint allow-list: JSON array of {path, method}, inline or a file
    #[arg(long)]
    endpoint_list: Option<String>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Path to the spec file
    #[arg(short, long)]
    spec: PathBuf,

    /// Platform name used in keys
    #[arg(long, default_value = "platform")]
    platform: String,

    #[command(flatten)]
    filter: FilterArgs,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Spec file, or a directory of *.json specs
    #[arg(short, long)]
    spec: PathBuf,

    /// Target platform name (e.g., "apaleo")
    #[arg(long)]
    platform: Option<String>,

    /// Connection definition identifier stamped on every record
    #[arg(long)]
    definition_id: Option<String>,

    /// Base URL of the described API
    #[arg(long)]
    base_url: Option<String>,

    #[command(flatten)]
    filter: FilterArgs,

    /// Directory to write one JSON file per definition
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// POST every definition to --target
    #[arg(long)]
    post: bool,

    /// URL that definitions are POSTed to
    #[arg(long)]
    target: Option<String>,

    /// Bearer token for --post
    #[arg(long, env = "MODELDEF_BEARER_TOKEN", hide_env_values = true)]
    bearer: Option<String>,

    /// YAML file with defaults for the options above
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Descend into subdirectories of --spec
    #[arg(short, long)]
    recursive: bool,
}

/// Where and how a generate run delivers definitions
#[derive(Debug)]
struct RunSettings {
    options: CompileOptions,
    output: Option<PathBuf>,
    delivery: Option<Delivery>,
}

#[derive(Debug)]
struct Delivery {
    target: String,
    token: String,
}

/// Counts reported at the end of a generate run
#[derive(Debug, Default, PartialEq, Eq)]
struct RunTotals {
    compiled: usize,
    failed_specs: usize,
    failed_publishes: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Inspect(args) => inspect_command(&args, cli.verbose),
        Commands::Generate(args) => generate_command(&args, cli.verbose),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn inspect_command(args: &InspectArgs, verbose: bool) -> Result<()> {
    eprintln!("{} Inspecting spec: {}", "→".cyan(), args.spec.display());

    let parser = SwaggerParser::from_file(&args.spec)
        .with_context(|| format!("Failed to load spec {}", args.spec.display()))?;

    let endpoints = match &args.filter.endpoint_list {
        Some(arg) => load_endpoint_list(arg).context("Failed to load endpoint list")?,
        None => Vec::new(),
    };
    let filter = build_filter(args.filter.scopes.clone().unwrap_or_default(), endpoints);

    let spec = parser.spec();
    let base_url = spec
        .host
        .as_deref()
        .map(|host| format!("https://{}", host))
        .unwrap_or_default();
    let options = CompileOptions::new(&args.platform, "inspect", base_url).with_filter(filter);
    let report = parser.compile(&options).context("Failed to compile spec")?;

    println!("\n{}", "Spec:".bold());
    println!(
        "  Title: {}",
        spec.info.title.as_deref().unwrap_or("untitled").yellow()
    );
    println!("  Version: {}", spec.version().yellow());
    println!("  Paths: {}", spec.paths.len());
    println!("  Definitions: {}", spec.definitions.len());

    println!("\n{}", "Operations:".bold());
    for definition in &report.definitions {
        println!(
            "  {} {} {} → {}",
            "✓".green(),
            definition.action,
            definition.path,
            definition.action_name.to_string().yellow()
        );
        if verbose {
            println!("      key: {}", definition.key);
            println!("      name: {}", definition.name);
        }
    }

    print_issues(&report);

    println!(
        "\n{} {} included, {} skipped, {} warnings",
        "✓".green(),
        report.definitions.len(),
        report.skipped.len(),
        report.warnings.len()
    );

    Ok(())
}

fn generate_command(args: &GenerateArgs, verbose: bool) -> Result<()> {
    let config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    let settings = resolve_settings(args, config)?;

    let specs = discover_specs(&args.spec, args.recursive)?;
    if specs.is_empty() {
        anyhow::bail!("No spec files found in {}", args.spec.display());
    }

    if verbose {
        eprintln!("  Platform: {}", settings.options.platform);
        eprintln!("  Definition ID: {}", settings.options.definition_id);
        eprintln!("  Base URL: {}", settings.options.base_url);
        eprintln!("  Specs: {}", specs.len());
    }

    let http_sink = match &settings.delivery {
        Some(delivery) => Some(
            HttpSink::new(&delivery.target, &delivery.token)
                .context("Failed to create HTTP client")?,
        ),
        None => None,
    };
    let totals = compile_specs(&specs, &settings, http_sink.as_ref())?;

    eprintln!(
        "\n{} Compiled {} definitions from {} specs",
        "✓".green().bold(),
        totals.compiled,
        specs.len() - totals.failed_specs
    );

    if totals.failed_specs > 0 || totals.failed_publishes > 0 {
        anyhow::bail!(
            "{} spec files failed to compile, {} definitions failed to publish",
            totals.failed_specs,
            totals.failed_publishes
        );
    }

    Ok(())
}

/// Compile and deliver every spec file
///
/// A spec that fails to load or compile is reported and counted; the
/// remaining files are still processed.
fn compile_specs(
    specs: &[PathBuf],
    settings: &RunSettings,
    http_sink: Option<&HttpSink>,
) -> Result<RunTotals> {
    let print_payloads = settings.output.is_none() && http_sink.is_none();
    let mut totals = RunTotals::default();

    for (i, spec_path) in specs.iter().enumerate() {
        eprintln!(
            "{} Compiling spec {}/{}: {}",
            "→".cyan(),
            i + 1,
            specs.len(),
            spec_path.display()
        );

        let report = match SwaggerParser::from_file(spec_path)
            .and_then(|parser| parser.compile(&settings.options))
        {
            Ok(report) => report,
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), spec_path.display(), e);
                totals.failed_specs += 1;
                continue;
            }
        };
        print_issues(&report);
        totals.compiled += report.definitions.len();

        let stem = spec_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "spec".to_string());

        if let Some(dir) = &settings.output {
            let sink = FileSink::new(dir, &stem);
            totals.failed_publishes +=
                report_publish(&sink, publish_all(&sink, &report.definitions));
        }

        if let Some(sink) = http_sink {
            totals.failed_publishes += report_publish(sink, publish_all(sink, &report.definitions));
        }

        if print_payloads {
            for definition in &report.definitions {
                println!("{}", serde_json::to_string_pretty(definition)?);
            }
        }
    }

    Ok(totals)
}

/// Merge command-line arguments over config file values
fn resolve_settings(args: &GenerateArgs, config: GeneratorConfig) -> Result<RunSettings> {
    let platform = args
        .platform
        .clone()
        .or(config.platform)
        .context("--platform is required (on the command line or in --config)")?;
    let definition_id = args
        .definition_id
        .clone()
        .or(config.definition_id)
        .context("--definition-id is required (on the command line or in --config)")?;
    let base_url = args
        .base_url
        .clone()
        .or(config.base_url)
        .context("--base-url is required (on the command line or in --config)")?;

    let scopes = args.filter.scopes.clone().unwrap_or(config.scopes);
    let endpoints = match &args.filter.endpoint_list {
        Some(arg) => load_endpoint_list(arg).context("Failed to load endpoint list")?,
        None => config.endpoints,
    };

    let delivery = if args.post {
        let target = args
            .target
            .clone()
            .or(config.target)
            .context("--post requires --target (on the command line or in --config)")?;
        let token = args
            .bearer
            .clone()
            .with_context(|| format!("--post requires --bearer or {}", TOKEN_ENV))?;
        Some(Delivery { target, token })
    } else {
        None
    };

    let options = CompileOptions::new(platform, definition_id, base_url)
        .with_filter(build_filter(scopes, endpoints));

    Ok(RunSettings {
        options,
        output: args.output.clone().or(config.output),
        delivery,
    })
}

fn build_filter(scopes: Vec<String>, endpoints: Vec<EndpointRef>) -> EndpointFilter {
    EndpointFilter::new()
        .with_scopes(scopes)
        .with_endpoints(endpoints)
}

/// Spec files to compile, sorted by path
///
/// A file is taken as-is; a directory yields its `*.json` files.
fn discover_specs(path: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        anyhow::bail!("Spec path not found: {}", path.display());
    }

    fn walk_dir(dir: &Path, recursive: bool, specs: &mut Vec<PathBuf>) -> Result<()> {
        for entry in fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?
        {
            let path = entry?.path();

            if path.is_dir() {
                if recursive {
                    walk_dir(&path, recursive, specs)?;
                }
            } else if path.extension().and_then(|e| e.to_str()) == Some("json") {
                debug!(spec = %path.display(), "found spec file");
                specs.push(path);
            }
        }
        Ok(())
    }

    let mut specs = Vec::new();
    walk_dir(path, recursive, &mut specs)?;
    specs.sort();

    Ok(specs)
}

fn print_issues(report: &CompileReport) {
    for skipped in &report.skipped {
        eprintln!(
            "  {} Skipping {} {}: {}",
            "⚠".yellow(),
            skipped.method.to_uppercase(),
            skipped.path,
            skipped.reason
        );
    }
    for warning in &report.warnings {
        eprintln!("  {} {}", "⚠".yellow(), warning);
    }
}

/// Print a publish summary and return the number of failures
fn report_publish(sink: &dyn DefinitionSink, summary: PublishSummary) -> usize {
    for failure in &summary.failures {
        eprintln!("  {} {}: {}", "✗".red(), failure.key, failure.error);
    }
    eprintln!(
        "{} Published {} definitions to {}",
        "✓".green(),
        summary.published,
        sink.describe()
    );
    summary.failures.len()
}
