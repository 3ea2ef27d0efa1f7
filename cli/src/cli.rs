use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "kerf", version, about = "Copy CAD files into <material>/<thickness> folders from cut lists")]
pub struct Cli {
  /// Config file to use instead of the default kerf.toml
  #[arg(long, global = true)]
  pub config: Option<PathBuf>,

  /// Debug-level logging (RUST_LOG still wins when set)
  #[arg(short, long, global = true)]
  pub verbose: bool,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Read the CSV cut lists and provision every record
  Run(RunArgs),
  /// Retry a not-found report against the recovery root
  Recover(RecoverArgs),
  /// Inspect or initialize the configuration file
  Config {
    #[command(subcommand)]
    action: ConfigAction,
  },
}

#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
  /// Directory holding the *.csv cut lists
  #[arg(long)]
  pub csv_dir: Option<PathBuf>,

  /// Destination base directory
  #[arg(long)]
  pub dest: Option<PathBuf>,

  /// Source root, in priority order (repeatable, replaces configured roots)
  #[arg(long = "root")]
  pub roots: Vec<PathBuf>,

  #[arg(long)]
  pub max_depth: Option<usize>,

  /// Directory visit cap per root
  #[arg(long)]
  pub max_dirs: Option<usize>,

  /// Treat existing destination files as failures instead of replacing them
  #[arg(long)]
  pub no_overwrite: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RecoverArgs {
  /// A not_found_<unix>.txt report from a previous run
  #[arg(long)]
  pub report: PathBuf,

  /// Recovery root (replaces the configured one)
  #[arg(long)]
  pub root: Option<PathBuf>,

  /// Destination base directory
  #[arg(long)]
  pub dest: Option<PathBuf>,

  /// File type to recover, e.g. dxf
  #[arg(long)]
  pub ext: Option<String>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigAction {
  /// Write the config file with defaults for every missing value
  Init,
  /// Print the effective configuration
  Show,
  /// Print the config file location
  Path,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_run_with_repeated_roots() {
    let cli = Cli::parse_from(["kerf", "-v", "run", "--root", "/a", "--root", "/b", "--max-depth", "3"]);

    assert!(cli.verbose);
    let Command::Run(args) = cli.command else { panic!("expected run") };
    assert_eq!(args.roots, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    assert_eq!(args.max_depth, Some(3));
    assert!(!args.no_overwrite);
  }

  #[test]
  fn recover_requires_report() {
    assert!(Cli::try_parse_from(["kerf", "recover"]).is_err());
    assert!(Cli::try_parse_from(["kerf", "recover", "--report", "nf.txt", "--ext", "DXF"]).is_ok());
  }

  #[test]
  fn verify_cli() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
  }
}
