mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cmd::LaunchOptions;
use output::{OutputFormat, print_error};

/// Cross-platform clibdpa builder
///
/// Recreates build/<generator> and runs CMake against the sibling
/// clibcdc, clibspi and cutils builds for the same generator.
#[derive(Parser)]
#[command(name = "dpabuild", author, version, about)]
struct Cli {
  /// Platform generator: vs14, make or eclipse (case-insensitive)
  #[arg(short = 'g', long = "gen", value_name = "NAME")]
  generator: String,

  /// Debug build type: yes or no
  #[arg(short, long, default_value = "no", value_name = "yes|no")]
  debug: String,

  /// Source tree to configure (default: current directory)
  #[arg(short, long, value_name = "DIR")]
  root: Option<PathBuf>,

  /// CMake executable (default: $DPABUILD_CMAKE or cmake)
  #[arg(long, value_name = "PROGRAM")]
  cmake: Option<String>,

  /// Shell used to run commands (default: $DPABUILD_SHELL or the host shell)
  #[arg(long, value_name = "PROGRAM")]
  shell: Option<String>,

  /// Print the commands without running them
  #[arg(short = 'n', long)]
  dry_run: bool,

  /// Output format for --dry-run
  #[arg(long, value_enum, default_value_t)]
  output: OutputFormat,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .with_target(false)
    .without_time()
    .init();

  let opts = LaunchOptions {
    generator: cli.generator,
    debug: cli.debug,
    root: cli.root,
    cmake: cli.cmake,
    shell: cli.shell,
  };

  let result = if cli.dry_run {
    cmd::cmd_plan(&opts, cli.output)
  } else {
    cmd::cmd_build(&opts)
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
