use anyhow::Result;
use colored::Colorize;

use crate::{
    app::{global_config_path, init_config, Config},
    constants::{API_KEY_ENV, FALLBACK_API_KEY_ENV, MODEL_ID},
    models::{CompletionBackend, DeepSeekClient},
};

use super::Commands;

/// Handle CLI subcommands. Returns `false` when the chat should start.
pub async fn handle_command(command: &Commands, config: &Config) -> Result<bool> {
    match command {
        Commands::Init => {
            println!("Initializing deepchat configuration...");
            init_config()?;
            println!("Configuration initialized successfully!");
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        Commands::Status => {
            show_status(config).await?;
            Ok(true)
        }
        Commands::Chat => Ok(false), // Continue to chat interface
    }
}

/// Show version information
pub fn show_version() {
    println!("deepchat v{}", env!("CARGO_PKG_VERSION"));
    println!("   A terminal chat client for {}", MODEL_ID);
}

/// Show configuration and whether the endpoint answers
async fn show_status(config: &Config) -> Result<()> {
    println!("deepchat Status:");
    println!();

    match global_config_path() {
        Ok(path) if path.exists() => {
            println!("  [OK] Configuration: {}", path.display());
        }
        _ => println!("  [WARNING] Configuration: Not found (using defaults)"),
    }

    println!("  Endpoint: {}", config.api.endpoint.cyan());
    println!("  Model: {}", MODEL_ID);
    println!(
        "  Streaming: {}",
        if config.api.stream { "on" } else { "off" }
    );

    let session_config = match config.session_config() {
        Ok(session_config) => {
            println!("  [OK] API key: {}", "Set".green());
            session_config
        }
        Err(e) => {
            println!("  [ERROR] API key: {}", e.to_string().red());
            println!(
                "      Set {} (or {}) before chatting",
                API_KEY_ENV, FALLBACK_API_KEY_ENV
            );
            println!();
            return Ok(());
        }
    };

    let client = DeepSeekClient::new()?;
    match client.validate_connection(&session_config).await {
        Ok(true) => println!("  [OK] Endpoint: {}", "Reachable".green()),
        Ok(false) => println!(
            "  [ERROR] Endpoint: {}",
            "Reachable but rejected the request (check the API key)".red()
        ),
        Err(e) => println!("  [ERROR] Endpoint: {}", e.to_string().red()),
    }

    println!();
    Ok(())
}
