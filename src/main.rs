use clap::Parser;
use nibrs_flatfile::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Shared with every in-flight build so Ctrl-C stops them at the next line
        let cancellation_token = CancellationToken::new();

        let shutdown_signal = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("Failed to install CTRL+C signal handler: {}", e);
                std::future::pending::<()>().await;
            }
            cancellation_token.cancel();
        };

        tokio::select! {
            result = commands::run(args, cancellation_token.clone()) => {
                result
            }
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                Err(nibrs_flatfile::Error::processing_interrupted(
                    "Processing interrupted by user"
                ))
            }
        }
    });

    match result {
        Ok(summary) if summary.should_fail() => {
            eprintln!(
                "Found {} structural errors",
                summary.totals.structural_errors
            );
            process::exit(1);
        }
        Ok(_) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("NIBRS Flat-File Checker");
    println!("=======================");
    println!();
    println!("Read FBI NIBRS fixed-width flat files, group their segments into");
    println!("incident reports, and list every structural error found.");
    println!();
    println!("USAGE:");
    println!("    nibrs-flatfile <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    check       Build every report in the given files and summarise errors");
    println!("    layout      Print the fixed-width segment layout table");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Check one submission file:");
    println!("    nibrs-flatfile check submission.txt");
    println!();
    println!("    # Check a directory tree and list every error as CSV:");
    println!("    nibrs-flatfile check /data/nibrs --pattern '*.dat' --list-errors --format csv");
    println!();
    println!("    # Show the administrative segment layout:");
    println!("    nibrs-flatfile layout administrative");
    println!();
    println!("For detailed help on any command, use:");
    println!("    nibrs-flatfile <COMMAND> --help");
}
