use clap::Parser;
use colored::*;
use column_aggregator::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    // Parse command line arguments
    let args = Args::parse();
    commands::setup_logging(&args);

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let cancellation_token = CancellationToken::new();

        let shutdown_signal = async {
            // Without a signal handler the run simply cannot be interrupted
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
            cancellation_token.cancel();
        };

        let mut stdout = std::io::stdout().lock();

        tokio::select! {
            result = commands::run(args, cancellation_token.clone(), &mut stdout) => result,
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, stopping workers...");
                Err(column_aggregator::AggregateError::interrupted(
                    "interrupted by user",
                ))
            }
        }
    });

    match result {
        Ok(_outcome) => process::exit(0),
        Err(error) => {
            eprintln!("{} {}", "Error:".bright_red().bold(), error);
            // Same status clap uses for usage errors
            process::exit(if error.is_validation() { 2 } else { 1 });
        }
    }
}
