use once_cell::sync::Lazy;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use regex::Regex;

use super::theme::Theme;
use crate::session::BlockKind;

// Same three inline forms as the HTML projection: **bold**, *italic*, `code`
static INLINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*(?P<bold>.*?)\*\*|\*(?P<italic>.*?)\*|`(?P<code>.*?)`")
        .expect("valid inline pattern")
});

/// Style one line of assistant text
fn parse_inline(line: &str, base: Style, theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in INLINE.captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            spans.push(Span::styled(line[last..whole.start()].to_string(), base));
        }

        let span = if let Some(text) = caps.name("bold") {
            Span::styled(text.as_str().to_string(), base.add_modifier(Modifier::BOLD))
        } else if let Some(text) = caps.name("italic") {
            Span::styled(text.as_str().to_string(), base.add_modifier(Modifier::ITALIC))
        } else if let Some(text) = caps.name("code") {
            Span::styled(
                text.as_str().to_string(),
                Style::default()
                    .fg(theme.code_foreground.to_color())
                    .bg(theme.code_background.to_color()),
            )
        } else {
            Span::styled(whole.as_str().to_string(), base)
        };
        spans.push(span);
        last = whole.end();
    }

    if last < line.len() {
        spans.push(Span::styled(line[last..].to_string(), base));
    }

    Line::from(spans)
}

/// Convert block content into styled lines.
///
/// Terminal spans are never interpreted as markup, so escaping is not needed
/// here; only assistant content gets inline formatting.
pub fn format_content(kind: BlockKind, content: &str, theme: &Theme) -> Vec<Line<'static>> {
    let base = match kind {
        BlockKind::Error => Style::default().fg(theme.error.to_color()),
        _ => Style::default().fg(theme.text_primary.to_color()),
    };

    content
        .split('\n')
        .map(|line| match kind {
            BlockKind::Assistant => parse_inline(line, base, theme),
            BlockKind::User | BlockKind::Error => Line::from(Span::styled(line.to_string(), base)),
        })
        .collect()
}
