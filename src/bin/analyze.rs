use cdk_cost_analyzer::cli::commands::analyze;
use cdk_cost_analyzer::cli::Cli;
use clap::Parser;
use colored::Colorize;

#[derive(Debug, Clone, Copy)]
enum ExitCode {
    Success = 0,
    InputError = 1,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match analyze::run(&cli).await {
        Ok(outcome) => {
            println!("{}", outcome.report);
            std::process::exit(if outcome.threshold_failed {
                ExitCode::InputError as i32
            } else {
                ExitCode::Success as i32
            });
        }
        Err(err) => {
            eprintln!("{} {}", "error:".bright_red().bold(), err);
            std::process::exit(ExitCode::InputError as i32);
        }
    }
}
