use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::app::App;
use super::markdown::format_content;
use crate::constants::MODEL_ID;
use crate::session::BlockKind;

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints(
            [
                Constraint::Length(2), // Header
                Constraint::Min(5),    // Chat
                Constraint::Length(3), // Input
                Constraint::Length(1), // Status bar
            ],
        )
        .split(frame.area());

    render_header(frame, chunks[0], app);
    render_chat(frame, chunks[1], app);
    render_input(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "deepchat",
            Style::default()
                .fg(theme.header.to_color())
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | Model: "),
        Span::styled(MODEL_ID, Style::default().fg(theme.assistant_message.to_color())),
        Span::raw(" | "),
        Span::styled(&app.endpoint, Style::default().fg(theme.text_secondary.to_color())),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(theme.border.to_color())),
    )
    .alignment(Alignment::Center);

    frame.render_widget(header, area);
}

fn label_line(kind: BlockKind, app: &App, time: Option<String>) -> Line<'static> {
    let theme = &app.theme;
    let color = match kind {
        BlockKind::User => theme.user_message.to_color(),
        BlockKind::Assistant => theme.assistant_message.to_color(),
        BlockKind::Error => theme.error.to_color(),
    };
    let mut spans = vec![Span::styled(
        format!("[{}]", kind.label()),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )];
    if let Some(time) = time {
        spans.push(Span::styled(
            format!(" {}", time),
            Style::default().fg(theme.text_secondary.to_color()),
        ));
    }
    Line::from(spans)
}

/// All chat lines, oldest first
fn chat_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for block in &app.blocks {
        lines.push(label_line(
            block.kind,
            app,
            Some(block.timestamp.format("%H:%M").to_string()),
        ));
        lines.extend(format_content(block.kind, &block.content, &app.theme));
        lines.push(Line::from(""));
    }

    if let Some(partial) = &app.pending {
        lines.push(label_line(BlockKind::Assistant, app, None));
        if !partial.is_empty() {
            lines.extend(format_content(BlockKind::Assistant, partial, &app.theme));
        }
        let dots = ".".repeat((chrono::Local::now().timestamp_subsec_millis() / 250) as usize % 4);
        lines.push(Line::from(Span::styled(
            format!("thinking{}", dots),
            Style::default()
                .fg(app.theme.pending.to_color())
                .add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

/// Rows a set of lines occupies once wrapped to `width`
fn wrapped_height(lines: &[Line<'_>], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn render_chat(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border.to_color()))
        .title(" Chat ");
    let inner = block.inner(area);

    let lines = chat_lines(app);
    let total = wrapped_height(&lines, inner.width);
    let max_scroll = total.saturating_sub(inner.height);
    let offset = app.scroll_offset.min(max_scroll);

    let chat = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((max_scroll - offset, 0));

    frame.render_widget(chat, area);
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let (title, border) = if app.is_waiting() {
        (" Waiting for reply ", theme.border.to_color())
    } else {
        (" Message ", theme.border_focused.to_color())
    };

    let input = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(theme.text_primary.to_color()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(title),
        );
    frame.render_widget(input, area);

    // Cursor after the last typed character
    let cursor_x = area.x + 1 + (Line::from(app.input.as_str()).width() as u16);
    frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let text = app.status_message.clone().unwrap_or_else(|| {
        "Enter send | Ctrl+L clear | PgUp/PgDn scroll | :help | Ctrl+C quit".to_string()
    });
    let status = Paragraph::new(Span::styled(
        text,
        Style::default().fg(app.theme.text_secondary.to_color()),
    ));
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_height_counts_wrapped_rows() {
        let lines = vec![Line::from("abcdefghij"), Line::from(""), Line::from("abc")];
        assert_eq!(wrapped_height(&lines, 4), 3 + 1 + 1);
        assert_eq!(wrapped_height(&lines, 0), 10 + 1 + 3);
    }

    #[test]
    fn test_render_ui_draws_header_and_input() {
        use crate::models::{MockCompletionBackend, SessionConfig};
        use crate::session::ConversationSession;
        use crate::tui::{ChannelSurface, Theme};
        use ratatui::{backend::TestBackend, Terminal};
        use std::sync::Arc;

        let (surface, events) = ChannelSurface::new();
        let session = Arc::new(ConversationSession::new(
            Arc::new(MockCompletionBackend::new()),
            SessionConfig::new("sk-test", "http://localhost:9"),
            surface,
        ));
        let mut app = App::new(session, events, Theme::dark());
        app.input.push_str("draft");

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render_ui(frame, &app)).unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("deepchat"));
        assert!(screen.contains("draft"));
    }
}
