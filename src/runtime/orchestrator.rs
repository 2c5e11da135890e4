use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::{
    app::{load_config, load_config_file, Config},
    cli::{handle_command, Cli},
    constants::MODEL_ID,
    models::DeepSeekClient,
    session::ConversationSession,
    tui::{run_ui, App, ChannelSurface, Theme},
};

/// Command-line flags win over every config source
pub fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if let Some(endpoint) = &cli.endpoint {
        config.api.endpoint = endpoint.clone();
    }
    if let Some(api_key) = &cli.api_key {
        config.api.api_key = Some(api_key.clone());
    }
    if cli.stream {
        config.api.stream = true;
    }
}

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        let mut config = if let Some(config_path) = &cli.config {
            load_config_file(config_path)?
        } else {
            match load_config() {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("Failed to load config: {}. Using defaults.", e);
                    Config::default()
                }
            }
        };
        apply_cli_overrides(&mut config, &cli);

        Ok(Self { cli, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run subcommands or the interactive chat
    pub async fn run(self) -> Result<()> {
        if let Some(command) = &self.cli.command {
            if handle_command(command, &self.config).await? {
                return Ok(()); // Command handled, exit
            }
            // Continue to chat for Commands::Chat
        }

        let session_config = self.config.session_config()?;
        println!(
            "Starting deepchat with {} at {}",
            MODEL_ID.green(),
            session_config.endpoint
        );

        let client = DeepSeekClient::with_timeout(Duration::from_secs(
            self.config.api.request_timeout_secs,
        ))?;
        let (surface, events) = ChannelSurface::new();
        let session = Arc::new(ConversationSession::new(
            Arc::new(client),
            session_config,
            surface,
        ));

        if self.config.ui.show_greeting {
            session.greet();
        }

        let app = App::new(
            Arc::clone(&session),
            events,
            Theme::from_name(&self.config.ui.theme),
        );
        let result = run_ui(app).await;

        // Transcripts are not persisted; the session ends with the UI
        info!("Session closed after {} turns", session.history().len());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "deepchat",
            "--endpoint",
            "http://localhost:8000/v1",
            "--api-key",
            "sk-cli",
            "--stream",
        ])
        .unwrap();
        let mut config = Config::default();

        apply_cli_overrides(&mut config, &cli);

        assert_eq!(config.api.endpoint, "http://localhost:8000/v1");
        assert_eq!(config.api.api_key.as_deref(), Some("sk-cli"));
        assert!(config.api.stream);
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let cli = Cli::try_parse_from(["deepchat"]).unwrap();
        let mut config = Config::default();
        config.api.stream = true;
        config.api.endpoint = "https://configured.test".to_string();

        apply_cli_overrides(&mut config, &cli);

        assert!(config.api.stream);
        assert_eq!(config.api.endpoint, "https://configured.test");
    }
}
