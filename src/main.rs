use anyhow::{anyhow, bail, Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use giti::config::{self, Config, Provider, MODEL_DOWNLOAD_HINT};
use giti::executor::{ExecutionPolicy, GitRunner, SafeExecutor};
use giti::prompt::load_context_file;
use giti::theme::Theme;
use giti::ui::ConsoleUi;
use giti::{logging, shell, GenerationParams, HttpGenerator, Session};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

/// Convert natural language to Git commands using a local LLM
#[derive(Parser, Debug)]
#[command(name = "giti", version)]
struct Args {
    /// Natural language description of the Git operation
    query: Vec<String>,

    /// Show commands without executing them
    #[arg(long)]
    dry_run: bool,

    /// Skip confirmation prompts before execution
    #[arg(long)]
    no_confirm: bool,

    /// Run in interactive shell mode
    #[arg(long)]
    shell: bool,

    /// USER:/BOT: example file that extends the built-in examples
    #[arg(long, value_name = "FILE")]
    context: Option<PathBuf>,

    /// Path to the GGUF model served by the local llama.cpp server
    #[arg(long, value_name = "FILE")]
    model_path: Option<PathBuf>,

    /// Model backend
    #[arg(long, value_enum)]
    provider: Option<Provider>,

    /// Base URL of the model server
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Run commands in this repository instead of the current directory
    #[arg(short = 'C', value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,

    /// Verbose diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();
    logging::init(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {:#}", "Error".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    if args.init_config {
        let path = match args.config {
            Some(path) => path,
            None => config::get_config_path()?,
        };
        Config::create_default(&path)?;
        println!("Created default config file at {}", path.display());
        return Ok(());
    }

    let config = load_config(&args)?;
    if !config.display.color_output {
        colored::control::set_override(false);
    }

    if config.model.requires_model_file() && !config.model.model_path.exists() {
        eprintln!("Please download the model first, for example:");
        eprintln!("{MODEL_DOWNLOAD_HINT}");
        bail!("Model file not found at {}", config.model.model_path.display());
    }

    let context_examples = match &args.context {
        Some(path) => load_context_file(path)?,
        None => Vec::new(),
    };

    let query = args.query.join(" ");
    let query = query.trim();
    if !args.shell && query.is_empty() {
        Args::command().print_help()?;
        bail!("no query given; pass a query or use --shell");
    }

    let working_dir = match args.directory {
        Some(dir) if dir.is_dir() => dir,
        Some(dir) => bail!("not a directory: {}", dir.display()),
        None => std::env::current_dir().context("could not read the current directory")?,
    };

    let runner = GitRunner::locate(&config.execution.git_binary);
    info!(git = %runner.program().display(), "using git binary");
    let policy = ExecutionPolicy {
        dry_run: args.dry_run,
        no_confirm: args.no_confirm || !config.execution.require_confirmation,
        working_dir,
        command_timeout: config.execution.command_timeout(),
        branch_query_timeout: config.execution.branch_query_timeout(),
    };

    let generator = HttpGenerator::from_config(&config.model)
        .map_err(|e| anyhow!("Error initializing model client: {e}"))?;
    let session = Session::new(
        Box::new(generator),
        GenerationParams::from(&config.model),
        context_examples,
        SafeExecutor::new(Arc::new(runner), policy),
    );

    let mut ui = ConsoleUi::new(Theme::named(config.display.theme));
    if args.shell {
        shell::run_interactive(&session, &mut ui).await;
    } else {
        session.process_query(query, &mut ui).await;
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(provider) = args.provider {
        config.model.provider = provider;
    }
    config.apply_env();

    if let Some(endpoint) = &args.endpoint {
        config.model.endpoint = Some(endpoint.clone());
    }
    if let Some(model_path) = &args.model_path {
        config.model.model_path = model_path.clone();
    }

    config.validate()?;
    Ok(config)
}
