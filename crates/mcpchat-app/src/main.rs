use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;

use mcpchat::{run_repl_mode, setup_from_cli, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Some(shell) = cli.generate {
        let mut command = Cli::command();
        let name = command.get_name().to_string();
        clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
        return Ok(());
    }

    let config = setup_from_cli(&cli)?;

    let missing = config.missing_settings();
    if !missing.is_empty() {
        for setting in missing {
            eprintln!("{} {}", "❌".bright_red(), setting);
        }
        eprintln!("{}", "Set them with flags, environment variables, .env or the config file.".bright_black());
        return Ok(());
    }

    run_repl_mode(config).await
}
