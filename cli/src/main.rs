use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use command_manual_core::{Catalog, CatalogError};
use command_manual_document::{DocumentError, DocumentStore};
use command_manual_extract::{MetadataExtractor, read_command_list};
use command_manual_reconcile::{Reconciliation, ReconciliationEngine};

#[derive(Debug, Parser)]
#[command(name = "command-manual")]
#[command(about = "Generate, inspect, and reconcile command manual documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a manual document for every command in the list file.
    Generate(GenerateArgs),
    /// Print the commands named in the list file.
    List(ListArgs),
    /// Show the persisted manual document for one command.
    Show(ShowArgs),
    /// Print curated related-command recommendations.
    Recommend(RecommendArgs),
    /// Regenerate a command's manual and diff it against a fresh pass.
    Reconcile(ReconcileArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Newline-delimited file of command names to process.
    #[arg(long)]
    commands_file: PathBuf,
    /// Directory for the per-command documents.
    #[arg(long, default_value = ".")]
    output: PathBuf,
    /// JSON catalog overriding the built-in example/recommendation tables.
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Newline-delimited file of command names.
    #[arg(long)]
    commands_file: PathBuf,
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Command whose document should be displayed.
    command: String,
    /// Directory the documents were written to.
    #[arg(long, default_value = ".")]
    output: PathBuf,
}

#[derive(Debug, Args)]
struct RecommendArgs {
    /// Command to look up in the recommendation table.
    command: String,
    /// JSON catalog overriding the built-in tables.
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ReconcileArgs {
    /// Command to reconcile.
    command: String,
    /// Directory for the canonical and verification documents.
    #[arg(long, default_value = ".")]
    output: PathBuf,
    /// JSON catalog overriding the built-in tables.
    #[arg(long)]
    catalog: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Generate(args) => run_generate(args),
        Command::List(args) => run_list(args),
        Command::Show(args) => run_show(args),
        Command::Recommend(args) => run_recommend(args),
        Command::Reconcile(args) => run_reconcile(args),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let commands = read_command_list(&args.commands_file)
        .map_err(|e| format!("failed to read {}: {e}", args.commands_file.display()))?;

    let extractor = MetadataExtractor::new(catalog);
    let store = DocumentStore::new(&args.output);

    // One command failing never aborts the rest of the run.
    for command in &commands {
        let metadata = extractor.extract(command);
        match store.write_canonical(&metadata) {
            Ok(path) => {
                info!(command, path = %path.display(), "manual written");
                println!("Manual generated for command: {command}");
            }
            Err(e) => {
                error!(command, error = %e, "manual generation failed");
                eprintln!("Failed to generate manual for command '{command}': {e}");
            }
        }
    }
    Ok(())
}

fn run_list(args: ListArgs) -> Result<(), String> {
    let commands = read_command_list(&args.commands_file)
        .map_err(|e| format!("failed to read {}: {e}", args.commands_file.display()))?;
    println!("List of available commands:");
    println!("{}", commands.join(", "));
    Ok(())
}

fn run_show(args: ShowArgs) -> Result<(), String> {
    let store = DocumentStore::new(&args.output);
    match store.load(&args.command) {
        Ok(parsed) => {
            println!("Details for command '{}':", args.command);
            for (tag, value) in parsed.metadata.fields() {
                println!("{tag}: {value}");
            }
            Ok(())
        }
        Err(DocumentError::NotFound(command)) => {
            Err(format!("No manual entry found for command '{command}'."))
        }
        Err(e) => Err(format!("Could not display manual for '{}': {e}", args.command)),
    }
}

fn run_recommend(args: RecommendArgs) -> Result<(), String> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    match catalog.recommendations_for(&args.command) {
        Some(related) => {
            println!("You may also be interested in:");
            for name in related {
                println!("- {name}");
            }
        }
        None => println!("No related commands found."),
    }
    Ok(())
}

fn run_reconcile(args: ReconcileArgs) -> Result<(), String> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let engine = ReconciliationEngine::new(
        MetadataExtractor::new(catalog),
        DocumentStore::new(&args.output),
    );

    let outcome = engine
        .reconcile(&args.command)
        .map_err(|e| format!("failed to reconcile '{}': {e}", args.command))?;

    match outcome {
        Reconciliation::Equal => println!("Files are equal"),
        Reconciliation::Different { delta } => {
            for line in delta {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn load_catalog(path: Option<&std::path::Path>) -> Result<Catalog, String> {
    match path {
        Some(path) => Catalog::from_json_file(path).map_err(|e: CatalogError| {
            format!("failed to load catalog {}: {e}", path.display())
        }),
        None => Ok(Catalog::builtin()),
    }
}
