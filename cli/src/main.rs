use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use cli::config::{Overrides, Settings, STORE_ENV};
use cli::{keyword_summary, repl};
use frontend::macro_store::MacroStore;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "snipgen", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Custom keyword store (defaults to user_keywords.db)
    #[arg(long, global = true, env = STORE_ENV)]
    store: Option<PathBuf>,

    /// Settings file (defaults to ./snipgen.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Spaces used to indent the body of main
    #[arg(long)]
    indent: Option<usize>,

    /// Line-editor history file
    #[arg(long, conflicts_with = "no_history")]
    history: Option<PathBuf>,

    /// Do not read or write a history file
    #[arg(long)]
    no_history: bool,

    /// Read every answer from a file instead of the terminal
    #[arg(long)]
    script: Option<PathBuf>,

    /// Log debug events to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Interactive keyword prompt (the default)
    Repl,
    /// Print the stored custom keywords
    List,
    /// Parse the keyword store and report recovered problems
    Check,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            store: self.store.clone(),
            config: self.config.clone(),
            history: self.history.clone(),
            no_history: self.no_history,
            indent: self.indent,
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(err) = run(cli) {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::resolve(&cli.overrides(), &std::env::current_dir()?)?;
    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => repl::start(&settings, cli.script.as_deref()),
        Commands::List => {
            let (store, diagnostics) = MacroStore::load(&settings.store);
            for diagnostic in &diagnostics {
                eprintln!("{}", diagnostic);
            }
            if store.is_empty() {
                println!("No custom keywords stored in {}.", settings.store.display());
            }
            for line in keyword_summary(&store) {
                println!("{}", line);
            }
            Ok(())
        }
        Commands::Check => {
            let (store, diagnostics) = MacroStore::load(&settings.store);
            for diagnostic in &diagnostics {
                println!("{}", diagnostic);
            }
            println!(
                "{}: {} custom keyword(s), {} problem(s)",
                settings.store.display(),
                store.len(),
                diagnostics.len()
            );
            if !diagnostics.is_empty() {
                bail!("keyword store '{}' needs attention", settings.store.display());
            }
            Ok(())
        }
    }
}
