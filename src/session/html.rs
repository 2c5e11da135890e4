use super::format::{render_block, render_pending};
use super::surface::{BlockKind, RenderSurface};

/// One block as it was rendered
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBlock {
    pub kind: BlockKind,
    /// Content before escaping and formatting
    pub content: String,
    pub html: String,
}

/// Render surface that builds an HTML chat panel in memory
#[derive(Debug, Default)]
pub struct HtmlSurface {
    blocks: Vec<RenderedBlock>,
    pending: Option<String>,
}

impl HtmlSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[RenderedBlock] {
        &self.blocks
    }

    pub fn blocks_of(&self, kind: BlockKind) -> impl Iterator<Item = &RenderedBlock> {
        self.blocks.iter().filter(move |b| b.kind == kind)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The whole panel, pending indicator last
    pub fn to_html(&self) -> String {
        let mut html = String::from("<div id=\"chat-container\">\n");
        for block in &self.blocks {
            html.push_str(&block.html);
            html.push('\n');
        }
        if let Some(partial) = &self.pending {
            html.push_str(&render_pending(partial));
            html.push('\n');
        }
        html.push_str("</div>\n");
        html
    }
}

impl RenderSurface for HtmlSurface {
    fn append_block(&mut self, kind: BlockKind, content: &str) {
        self.blocks.push(RenderedBlock {
            kind,
            content: content.to_string(),
            html: render_block(kind, content),
        });
    }

    fn show_pending(&mut self) {
        self.pending = Some(String::new());
    }

    fn clear_pending(&mut self) {
        self.pending = None;
    }

    fn clear_all(&mut self) {
        self.blocks.clear();
        self.pending = None;
    }

    fn stream_delta(&mut self, fragment: &str) {
        if let Some(partial) = self.pending.as_mut() {
            partial.push_str(fragment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_indicator_lifecycle() {
        let mut surface = HtmlSurface::new();
        surface.append_block(BlockKind::User, "Hi");
        surface.show_pending();
        assert!(surface.to_html().contains("loading-indicator"));

        surface.stream_delta("Hel");
        surface.stream_delta("lo");
        assert!(surface.to_html().contains("<div>Hello</div>"));

        surface.clear_pending();
        assert!(!surface.is_pending());
        assert!(!surface.to_html().contains("loading-indicator"));
        assert_eq!(surface.blocks().len(), 1);
    }

    #[test]
    fn test_delta_without_pending_is_dropped() {
        let mut surface = HtmlSurface::new();
        surface.stream_delta("late");
        assert!(!surface.to_html().contains("late"));
    }

    #[test]
    fn test_clear_all_removes_everything() {
        let mut surface = HtmlSurface::new();
        surface.append_block(BlockKind::Assistant, "x");
        surface.append_block(BlockKind::Error, "y");
        surface.show_pending();

        surface.clear_all();
        assert!(surface.blocks().is_empty());
        assert!(!surface.is_pending());
    }
}
