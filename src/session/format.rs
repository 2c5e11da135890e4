use once_cell::sync::Lazy;
use regex::Regex;

use super::surface::BlockKind;
use crate::constants::PENDING_ELEMENT_ID;

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold pattern"));
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("valid italic pattern"));
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").expect("valid code pattern"));

/// Escape text for use as HTML element content
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Light inline formatting for assistant replies.
///
/// Escaping runs first, so markup in the reply itself is never interpreted.
pub fn format_assistant(content: &str) -> String {
    let escaped = escape_html(content);
    let formatted = BOLD.replace_all(&escaped, "<strong>$1</strong>");
    let formatted = ITALIC.replace_all(&formatted, "<em>$1</em>");
    let formatted = INLINE_CODE.replace_all(&formatted, "<code>$1</code>");
    formatted.replace('\n', "<br>")
}

/// Inner HTML of a block body
pub fn render_body(kind: BlockKind, content: &str) -> String {
    match kind {
        BlockKind::Assistant => format_assistant(content),
        BlockKind::User | BlockKind::Error => escape_html(content),
    }
}

/// Project one block onto an HTML fragment
pub fn render_block(kind: BlockKind, content: &str) -> String {
    let css = kind.css_name();
    format!(
        "<div class=\"message {css}-message\"><div class=\"message-content {css}-content\"><strong>{label}:</strong><div>{body}</div></div></div>",
        css = css,
        label = kind.label(),
        body = render_body(kind, content),
    )
}

/// Placeholder shown while a reply is outstanding, with any streamed text so far
pub fn render_pending(partial: &str) -> String {
    let body = if partial.is_empty() {
        "<div class=\"loading-dots\"><span></span><span></span><span></span></div>".to_string()
    } else {
        format!("<div>{}</div>", format_assistant(partial))
    };
    format!(
        "<div id=\"{id}\" class=\"message assistant-message\"><div class=\"message-content assistant-content\"><strong>{label}:</strong>{body}</div></div>",
        id = PENDING_ELEMENT_ID,
        label = BlockKind::Assistant.label(),
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_script_tags_are_escaped_for_every_kind() {
        let input = "<script>alert(1)</script>";
        for kind in [BlockKind::User, BlockKind::Assistant, BlockKind::Error] {
            let html = render_block(kind, input);
            assert!(!html.contains("<script>"), "{:?} rendered a script tag", kind);
            assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        }
    }

    #[test]
    fn test_bold_wraps_exactly_once() {
        let formatted = format_assistant("**bold**");
        assert_eq!(formatted, "<strong>bold</strong>");
        assert_eq!(formatted.matches("<strong>").count(), 1);
    }

    #[test]
    fn test_italic_code_and_line_breaks() {
        assert_eq!(
            format_assistant("an *aside*\nrun `cargo test`"),
            "an <em>aside</em><br>run <code>cargo test</code>"
        );
    }

    #[test]
    fn test_markup_inside_reply_stays_inert() {
        assert_eq!(
            format_assistant("**<b>x</b>**"),
            "<strong>&lt;b&gt;x&lt;/b&gt;</strong>"
        );
    }

    #[test]
    fn test_user_and_error_content_is_not_formatted() {
        assert_eq!(render_body(BlockKind::User, "**hi**\n"), "**hi**\n");
        assert_eq!(render_body(BlockKind::Error, "*x* & y"), "*x* &amp; y");
    }

    #[test]
    fn test_pending_block_is_identifiable() {
        let html = render_pending("");
        assert!(html.contains("id=\"loading-indicator\""));
        assert!(html.contains("loading-dots"));

        let streaming = render_pending("**He**");
        assert!(streaming.contains("<strong>He</strong>"));
    }
}
