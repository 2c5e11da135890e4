use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::constants::API_KEY_ENV;

#[derive(Parser, Debug)]
#[command(name = "deepchat")]
#[command(version)]
#[command(about = "Chat with a DeepSeek-compatible model from your terminal", long_about = None)]
pub struct Cli {
    /// Base URL of the completion API (e.g., https://api.deepseek.com/v1)
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// API key sent as the bearer credential
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Stream the reply as it is generated
    #[arg(long)]
    pub stream: bool,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Non-interactive prompt to send
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Output format for non-interactive mode
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, requires = "prompt")]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Whether this invocation ends up in the full-screen chat UI
    pub fn runs_tui(&self) -> bool {
        self.prompt.is_none() && matches!(self.command, None | Some(Commands::Chat))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration
    Init,
    /// Start a chat session (default)
    Chat,
    /// Check configuration and endpoint reachability
    Status,
    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
    /// Rendered HTML chat panel
    Html,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mode_flags() {
        let cli = Cli::try_parse_from([
            "deepchat",
            "-p",
            "hello",
            "--output-format",
            "json",
            "--endpoint",
            "http://localhost:8000",
            "--stream",
        ])
        .unwrap();

        assert_eq!(cli.prompt.as_deref(), Some("hello"));
        assert!(matches!(cli.output_format, OutputFormat::Json));
        assert_eq!(cli.endpoint.as_deref(), Some("http://localhost:8000"));
        assert!(cli.stream);
    }

    #[test]
    fn test_output_format_requires_prompt() {
        assert!(Cli::try_parse_from(["deepchat", "--output-format", "html"]).is_err());
    }

    #[test]
    fn test_subcommand() {
        let cli = Cli::try_parse_from(["deepchat", "status"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Status)));
    }

    #[test]
    fn test_runs_tui() {
        let parse = |args: &[&str]| Cli::try_parse_from(args).unwrap().runs_tui();

        assert!(parse(&["deepchat"]));
        assert!(parse(&["deepchat", "--verbose", "chat"]));
        assert!(!parse(&["deepchat", "status"]));
        assert!(!parse(&["deepchat", "-p", "hi"]));
        assert!(!parse(&["deepchat", "-p", "hi", "chat"]));
    }
}
