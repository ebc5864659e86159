#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod logging;

use clap::Parser;
use miette::Result;

#[derive(Parser, Debug)]
#[command(name = "reheat")]
#[command(author, version, about = "Inject live-refresh startup modules into bundler configs", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted logs (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Prepend the refresh startup modules to a bundler config's entry
    Inject(commands::inject::InjectArgs),

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json);

    match cli.command {
        Commands::Inject(args) => commands::inject::run(&args),
        Commands::Version => {
            println!("reheat {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
