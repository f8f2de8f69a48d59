mod cmd;
mod output;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use holen_lib::consts::MANAGEMENT_NAMES;
use holen_lib::manifest::UtilityRequest;

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "HOLEN_LOG";

/// holen - run utilities from docker images or downloaded binaries
///
/// Logging flags go before the subcommand so that everything after
/// `run <utility>` reaches the utility untouched.
#[derive(Parser)]
#[command(name = "holen")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Show verbose debug information
  #[arg(short, long, conflicts_with = "quiet")]
  verbose: bool,

  /// Show as little information as possible
  #[arg(short, long)]
  quiet: bool,

  /// Log in JSON format
  #[arg(short = 'j', long)]
  log_json: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve and run a utility
  #[command(disable_help_flag = true)]
  Run {
    /// Utility name, optionally pinned as name@version
    utility: String,

    /// Arguments passed to the utility
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<OsString>,
  },

  /// List available utilities
  #[command(alias = "ls")]
  List {
    /// Only look for manifests in this source
    #[arg(short, long)]
    source: Option<String>,

    /// Print as JSON
    #[arg(long)]
    json: bool,
  },

  /// Read and write configuration
  Config {
    #[command(subcommand)]
    action: ConfigAction,
  },

  /// Manage git manifest sources
  Source {
    #[command(subcommand)]
    action: SourceAction,
  },

  /// Create a link that runs a utility through holen
  Link {
    /// Utility name
    utility: String,

    /// Directory for the link (default: next to the holen executable)
    #[arg(short, long)]
    dir: Option<PathBuf>,
  },

  /// Show platform and directory information
  Info {
    /// Print as JSON
    #[arg(long)]
    json: bool,
  },
}

#[derive(Subcommand)]
enum ConfigAction {
  /// Print the value of a key
  Get { key: String },

  /// Set a key in the user (or system) configuration
  Set {
    #[arg(long)]
    system: bool,
    key: String,
    value: String,
  },

  /// Remove a key from the user (or system) configuration
  Unset {
    #[arg(long)]
    system: bool,
    key: String,
  },

  /// Print every configured key
  List {
    #[arg(long)]
    json: bool,
  },
}

#[derive(Subcommand)]
enum SourceAction {
  /// Clone or pull sources (all when none are named)
  Update { names: Vec<String> },

  /// Remove a source checkout
  Delete { name: String },

  /// Show configured sources
  List,
}

fn main() -> Result<()> {
  let invoked_as = invoked_name();

  if let Some(utility) = invoked_as.filter(|name| !MANAGEMENT_NAMES.contains(&name.as_str())) {
    init_logging("warn", false);
    debug!(utility = %utility, "dispatching as shim");
    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    return cmd::cmd_run(&UtilityRequest::new(utility, None), &args);
  }

  let cli = Cli::parse();
  let level = if cli.verbose {
    "debug"
  } else if cli.quiet {
    "warn"
  } else {
    "info"
  };
  init_logging(level, cli.log_json);

  match cli.command {
    Commands::Run { utility, args } => cmd::cmd_run(&UtilityRequest::parse(&utility), &args),
    Commands::List { source, json } => cmd::cmd_list(source.as_deref(), json),
    Commands::Config { action } => match action {
      ConfigAction::Get { key } => cmd::cmd_config_get(&key),
      ConfigAction::Set { system, key, value } => cmd::cmd_config_set(system, &key, &value),
      ConfigAction::Unset { system, key } => cmd::cmd_config_unset(system, &key),
      ConfigAction::List { json } => cmd::cmd_config_list(json),
    },
    Commands::Source { action } => match action {
      SourceAction::Update { names } => cmd::cmd_source_update(&names),
      SourceAction::Delete { name } => cmd::cmd_source_delete(&name),
      SourceAction::List => cmd::cmd_source_list(),
    },
    Commands::Link { utility, dir } => cmd::cmd_link(&utility, dir.as_deref()),
    Commands::Info { json } => cmd::cmd_info(json),
  }
}

/// Basename of argv[0] without an executable extension.
fn invoked_name() -> Option<String> {
  let arg0 = std::env::args_os().next()?;
  let name = Path::new(&arg0).file_name()?.to_string_lossy().into_owned();
  match name.strip_suffix(".exe") {
    Some(stem) => Some(stem.to_string()),
    None => Some(name),
  }
}

fn init_logging(default_level: &str, json: bool) {
  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time();

  if json {
    builder.json().init();
  } else {
    builder.init();
  }
}
