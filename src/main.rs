//! reqfuse CLI
//!
//! Entry point for the `reqfuse` command-line tool.

use clap::Parser;
use reqfuse::pipeline::{self, FuseRequest};
use reqfuse::{CliOverrides, EffectiveConfig, FuseResult, MergeReport, PassThroughPlacement};
use std::io;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "reqfuse")]
#[command(
    about = "Fuse multiple requirements files into a single one, detecting dependency conflicts along the way",
    version
)]
struct Cli {
    /// Input requirements files, pipe ('|') separated if many are provided
    #[arg(short, long)]
    input: String,

    /// Output requirements file. Merged result goes to stdout if omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite the output file if it already exists
    #[arg(short = 'w', long)]
    overwrite: bool,

    /// Keep entries in first-seen order instead of sorting by name
    #[arg(long)]
    keep_order: bool,

    /// Where comments and unparsed lines go: bottom, header or top
    #[arg(long, value_name = "PLACEMENT")]
    pass_through: Option<PassThroughPlacement>,

    /// Do not end the output with a newline
    #[arg(long)]
    no_trailing_newline: bool,

    /// Path to config file (default: ./reqfuse.toml if present)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Emit a JSON merge report instead of the merged requirements
    #[arg(long)]
    json: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> FuseResult<()> {
    let overrides = CliOverrides {
        keep_order: cli.keep_order,
        pass_through: cli.pass_through,
        no_trailing_newline: cli.no_trailing_newline,
    };
    let effective = EffectiveConfig::discover(cli.config.as_deref(), Some(overrides.to_value()))?;

    let request = FuseRequest::new(&cli.input, cli.output, cli.overwrite);
    let fused = pipeline::run(&request, &effective.config)?;

    let text = if cli.json {
        let mut json = MergeReport::build(&fused, &effective.sources).to_json()?;
        json.push('\n');
        json
    } else {
        fused.outcome.render(effective.config.output.trailing_newline)
    };

    let mut stdout = io::stdout().lock();
    pipeline::deliver(request.output.as_deref(), request.overwrite, &text, &mut stdout)
}
