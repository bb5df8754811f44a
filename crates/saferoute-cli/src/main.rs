use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use saferoute_cli::commands::info::handle_info_command;
use saferoute_cli::commands::route::{
    handle_alternatives_command, handle_route_command, RouteArgs,
};
use saferoute_cli::logging::{init_tracing, LogFormat};
use saferoute_cli::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Safety-aware route planning over a graph document")]
struct Cli {
    /// Graph document (JSON) describing the region.
    #[arg(long, global = true, default_value = "region.json")]
    graph: PathBuf,

    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log line format on stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the optimal route between two nodes.
    Route {
        #[command(flatten)]
        args: RouteArgs,
        /// Attach fastest, balanced and safest variants.
        #[arg(long)]
        alternatives: bool,
    },
    /// Compute the fastest, balanced and safest routes between two nodes.
    Alternatives {
        #[command(flatten)]
        args: RouteArgs,
    },
    /// Summarise the graph document.
    Info,
}

fn main() -> Result<ExitCode> {
    // Usage errors exit with 1 so status 2 is left to "no route".
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return Ok(if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            });
        }
    };
    init_tracing(cli.log_format);

    match &cli.command {
        Command::Route { args, alternatives } => {
            handle_route_command(&cli.graph, cli.format, args, *alternatives)
        }
        Command::Alternatives { args } => handle_alternatives_command(&cli.graph, cli.format, args),
        Command::Info => {
            handle_info_command(&cli.graph, cli.format)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
