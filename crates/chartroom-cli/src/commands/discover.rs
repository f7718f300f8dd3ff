//! Discover command - run one repository discovery and print the result

use crate::commands::{ConfigArgs, build_discovery};
use crate::error::{CliError, Result};

/// Run the discover command
pub async fn run(args: &ConfigArgs, output_json: bool) -> Result<()> {
    let config = args.resolve()?;
    let discovery = build_discovery(&config)?;

    let names = discovery.discover().await?;

    if output_json {
        let json = serde_json::to_string(&names).map_err(|e| CliError::internal(e.to_string()))?;
        println!("{}", json);
        return Ok(());
    }

    if names.is_empty() {
        eprintln!("No repositories found");
        return Ok(());
    }

    for name in &names {
        println!("{}", name);
    }

    Ok(())
}
