//! Chartroom CLI - repository discovery for a multi-tenant chart server

use clap::{Parser, Subcommand};

mod commands;
mod error;
mod exit_codes;
mod logging;
mod server;

use commands::ConfigArgs;

#[derive(Parser)]
#[command(name = "chartroom")]
#[command(author = "Chartroom Contributors")]
#[command(version)]
#[command(about = "Discover tenant chart repositories from storage layout", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Run one discovery against storage and print the repositories
    Discover {
        #[command(flatten)]
        config: ConfigArgs,

        /// Print a JSON array instead of one name per line
        #[arg(long)]
        json: bool,
    },
}

fn main() -> miette::Result<()> {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    logging::init_logging(cli.debug);

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| miette::Report::new(error::CliError::internal(e.to_string())))?;

    let result = runtime.block_on(async {
        match &cli.command {
            Commands::Serve { config } => commands::serve::run(config).await,
            Commands::Discover { config, json } => commands::discover::run(config, *json).await,
        }
    });

    if let Err(e) = result {
        let code = e.exit_code();
        eprintln!("{:?}", miette::Report::new(e));
        std::process::exit(code);
    }

    Ok(())
}
