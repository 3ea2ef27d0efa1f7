use std::process::ExitCode;

use clap::Parser;
use kerf_lib::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();

  match kerf_lib::run(cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::error!("{e:#}");
      eprintln!("kerf: {e:#}");
      ExitCode::from(kerf_lib::exit_code(&e))
    }
  }
}
