use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tts_tools::config::{DEFAULT_CONFIG_FILE, ToolConfig};
use tts_tools::{
  BackupOptions, CancellationToken, ConsoleSink, FetchOptions, PrefetchOptions, backup_save,
  prefetch_files,
};

/// Back up or prefetch the cached assets of Tabletop Simulator saves.
#[derive(Debug, Parser)]
#[command(name = "tts-tools", version, about)]
struct Cli {
  /// Configuration file (defaults to ./tts-tools.json when present).
  #[arg(long, global = true, value_name = "PATH")]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Bundle a save and every cached asset it references into a Zip archive.
  Backup(BackupArgs),
  /// Download the assets referenced by one or more saves into the game cache.
  Prefetch(PrefetchArgs),
}

#[derive(Debug, Args)]
struct BackupArgs {
  /// Save file to back up.
  infile: PathBuf,

  /// Root of the game's data directory.
  #[arg(long, value_name = "PATH")]
  gamedata: Option<PathBuf>,

  /// Archive to write (defaults to the save's name with a .zip extension).
  #[arg(short, long, value_name = "FILE")]
  outname: Option<PathBuf>,

  /// Only print which files would be archived.
  #[arg(short = 'n', long)]
  dry_run: bool,

  /// Skip assets that are not cached instead of aborting.
  #[arg(short, long)]
  ignore_missing: bool,

  /// Comment stored in the archive manifest.
  #[arg(short, long)]
  comment: Option<String>,
}

#[derive(Debug, Args)]
struct PrefetchArgs {
  /// Save files to prefetch.
  #[arg(required = true)]
  infiles: Vec<PathBuf>,

  /// Root of the game's data directory.
  #[arg(long, value_name = "PATH")]
  gamedata: Option<PathBuf>,

  /// Only print which files would be downloaded.
  #[arg(short = 'n', long)]
  dry_run: bool,

  /// Download assets even when they are already cached.
  #[arg(short, long)]
  refetch: bool,

  /// Keep downloads whose content type does not match the asset.
  #[arg(short = 'x', long)]
  relax: bool,

  /// Network timeout in seconds.
  #[arg(short, long, value_name = "SECS")]
  timeout: Option<u64>,

  /// User-Agent header sent with each request.
  #[arg(short = 'a', long)]
  user_agent: Option<String>,
}

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(std::io::stderr)
    .init();

  match run(Cli::parse()) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("Error: {err:#}");
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<()> {
  let config = load_config(cli.config.as_deref())?;
  match cli.command {
    Command::Backup(args) => backup(args, &config),
    Command::Prefetch(args) => prefetch(args, &config),
  }
}

fn load_config(explicit: Option<&std::path::Path>) -> Result<ToolConfig> {
  match explicit {
    Some(path) => ToolConfig::from_path(path),
    None => {
      let cwd = std::env::current_dir().context("failed to resolve working directory")?;
      tracing::debug!(file = DEFAULT_CONFIG_FILE, dir = %cwd.display(), "looking for configuration");
      Ok(ToolConfig::discover(&cwd))
    }
  }
}

fn backup(args: BackupArgs, config: &ToolConfig) -> Result<()> {
  let options = BackupOptions {
    gamedata_dir: args.gamedata.unwrap_or_else(|| config.gamedata_dir()),
    output: args.outname,
    dry_run: args.dry_run,
    ignore_missing: args.ignore_missing,
    comment: args.comment,
  };

  backup_save(&args.infile, &options, &mut ConsoleSink)
    .with_context(|| format!("could not back up {}", args.infile.display()))?;
  Ok(())
}

fn prefetch(args: PrefetchArgs, config: &ToolConfig) -> Result<()> {
  let options = PrefetchOptions {
    fetch: FetchOptions {
      gamedata_dir: args.gamedata.unwrap_or_else(|| config.gamedata_dir()),
      dry_run: args.dry_run,
      refetch: args.refetch,
      relax: args.relax,
    },
    timeout: args
      .timeout
      .map(Duration::from_secs)
      .unwrap_or_else(|| config.timeout()),
    user_agent: args.user_agent.unwrap_or_else(|| config.user_agent.clone()),
  };

  let source = options
    .http_source()
    .context("failed to set up the HTTP client")?;
  let token = CancellationToken::new();
  prefetch_files(
    &args.infiles,
    &options.fetch,
    &source,
    &token,
    &mut ConsoleSink,
  )
  .context("prefetch aborted")?;
  Ok(())
}
