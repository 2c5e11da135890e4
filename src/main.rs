use anyhow::Result;
use clap::Parser;

use deepchat::{
    app::get_config_dir,
    cli::Cli,
    runtime::{NonInteractiveRunner, Orchestrator},
    utils::{init_file_logger, init_logger},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Set up logging if verbose; the TUI owns the terminal, so it logs to a file
    if cli.verbose {
        if cli.runs_tui() {
            init_file_logger(&get_config_dir()?.join("deepchat.log"))?;
        } else {
            init_logger();
        }
    }

    let prompt = cli.prompt.clone();
    let output_format = cli.output_format;
    let orchestrator = Orchestrator::new(cli)?;

    // Check if running in non-interactive mode
    match prompt {
        Some(prompt) => {
            let runner = NonInteractiveRunner::new(orchestrator.config())?;
            let result = runner.execute(&prompt).await;
            println!("{}", runner.format_result(&result, output_format));

            // Exit with appropriate code
            if result.error.is_some() {
                std::process::exit(1);
            }
            Ok(())
        }
        None => orchestrator.run().await,
    }
}
