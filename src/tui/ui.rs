use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

use super::app::App;
use super::render::render_ui;
use crate::constants::{UI_REFRESH_INTERVAL_MS, UI_SCROLL_LINES};

/// Run the terminal UI
pub async fn run_ui(mut app: App) -> Result<()> {
    // Check if we have an interactive terminal
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        eprintln!("deepchat requires an interactive terminal.");
        eprintln!("   Use --prompt for pipes and scripts.");
        return Err(anyhow::anyhow!("No interactive terminal available"));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    while app.running {
        app.drain_events();
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(Duration::from_millis(UI_REFRESH_INTERVAL_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }

        // Let spawned requests make progress between frames
        tokio::task::yield_now().await;
    }

    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') => app.quit(),
            KeyCode::Char('l') => app.clear_conversation(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Enter => {
            if app.input.starts_with(':') {
                let command = std::mem::take(&mut app.input);
                handle_command(app, &command);
            } else {
                app.submit_input();
            }
        }
        KeyCode::Esc => {
            app.input.clear();
            app.clear_status();
        }
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_up(UI_SCROLL_LINES * 5),
        KeyCode::PageDown => app.scroll_down(UI_SCROLL_LINES * 5),
        KeyCode::End => app.scroll_offset = 0,
        _ => {}
    }
}

fn handle_command(app: &mut App, command: &str) {
    match command.trim_start_matches(':').trim() {
        "quit" | "q" => app.quit(),
        "clear" => app.clear_conversation(),
        "help" | "h" => app.set_status(
            ":clear reset | :quit exit | Enter send | Esc discard input | Ctrl+L clear | Up/Down/PgUp/PgDn scroll | End bottom",
        ),
        other => app.set_status(format!("Unknown command: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MockCompletionBackend, SessionConfig};
    use crate::session::ConversationSession;
    use crate::tui::surface::ChannelSurface;
    use crate::tui::theme::Theme;
    use std::sync::Arc;

    fn app() -> App {
        let (surface, events) = ChannelSurface::new();
        let session = Arc::new(ConversationSession::new(
            Arc::new(MockCompletionBackend::new()),
            SessionConfig::new("sk-test", "http://localhost:9"),
            surface,
        ));
        App::new(session, events, Theme::dark())
    }

    #[test]
    fn test_esc_discards_input_and_keeps_running() {
        let mut app = app();
        app.input.push_str("draft");

        handle_key(&mut app, KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));

        assert!(app.input.is_empty());
        assert!(app.running);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = app();
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }
}
