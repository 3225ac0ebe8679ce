//! lingocache binary entrypoint kept minimal. Commands live in `args`.

mod args;

use std::process::ExitCode;

use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let args = args::Args::parse();
    let _log_guard = lingocache::logging::init_tracing(
        &args::determine_log_level(&args),
        args.log_file.as_deref(),
    );

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "lingocache starting");
    match args::run(&args).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
