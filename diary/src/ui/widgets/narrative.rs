//! Narrative page widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use diary_core::{Action, Node};

use crate::ui::theme::DiaryTheme;

/// Renders the current node's title, body, and numbered choices.
pub struct NarrativeWidget<'a> {
    node: &'a Node,
    actions: &'a [Action],
    scroll: u16,
    theme: &'a DiaryTheme,
}

impl<'a> NarrativeWidget<'a> {
    pub fn new(node: &'a Node, actions: &'a [Action], theme: &'a DiaryTheme) -> Self {
        Self {
            node,
            actions,
            scroll: 0,
            theme,
        }
    }

    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }
}

impl Widget for NarrativeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", self.node.title))
            .title_style(self.theme.title_style())
            .borders(Borders::ALL)
            .border_style(self.theme.border_style());
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        for raw in self.node.content.lines() {
            lines.push(Line::raw(raw.to_string()));
        }
        lines.push(Line::raw(""));

        for (index, action) in self.actions.iter().enumerate() {
            let style = if index == 0 {
                self.theme
                    .title_style()
                    .add_modifier(Modifier::UNDERLINED)
            } else {
                self.theme.title_style()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("[{}] ", index + 1), style),
                Span::raw(action.text.clone()),
            ]));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(inner, buf);
    }
}
