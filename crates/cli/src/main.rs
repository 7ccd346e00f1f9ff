mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::EvalArgs;
use output::OutputFormat;

/// recipe - evaluate the doodle-duel build recipe and generate its build inputs
#[derive(Parser)]
#[command(name = "recipe")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run a full evaluation and write the dependency manifest and toolchain
  Generate {
    /// Recipe directory; generated files are placed relative to it
    #[arg(default_value = ".")]
    dir: PathBuf,

    #[command(flatten)]
    eval: EvalArgs,
  },

  /// Evaluate up to option application and print requirements and options
  Inspect {
    /// Recipe directory
    #[arg(default_value = ".")]
    dir: PathBuf,

    #[command(flatten)]
    eval: EvalArgs,
  },

  /// Show the detected platform and default settings
  Info,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Generate { dir, eval } => cmd::cmd_generate(&dir, &eval, cli.output),
    Commands::Inspect { dir, eval } => cmd::cmd_inspect(&dir, &eval, cli.output),
    Commands::Info => cmd::cmd_info(cli.output),
  }
}
