//! Scattered overview map widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use diary_core::{FocusCard, MapPoint};

use crate::ui::theme::DiaryTheme;

/// Renders memory nodes as numbered dots at their percent coordinates,
/// with an optional centered focus card.
pub struct OverviewWidget<'a> {
    points: &'a [MapPoint],
    focus: Option<&'a FocusCard>,
    selected: usize,
    theme: &'a DiaryTheme,
}

impl<'a> OverviewWidget<'a> {
    pub fn new(points: &'a [MapPoint], theme: &'a DiaryTheme) -> Self {
        Self {
            points,
            focus: None,
            selected: 0,
            theme,
        }
    }

    pub fn focus(mut self, focus: Option<&'a FocusCard>) -> Self {
        self.focus = focus;
        self
    }

    pub fn selected(mut self, selected: usize) -> Self {
        self.selected = selected;
        self
    }
}

impl Widget for OverviewWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Diary ")
            .title_style(self.theme.title_style())
            .borders(Borders::ALL)
            .border_style(self.theme.border_style());
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        // Place each point by its percent coordinates.
        for (index, point) in self.points.iter().enumerate() {
            let x = inner.x + (point.x / 100.0 * (inner.width.saturating_sub(1)) as f32) as u16;
            let y = inner.y + (point.y / 100.0 * (inner.height.saturating_sub(1)) as f32) as u16;

            let mut style = Style::default().fg(if point.read {
                self.theme.point_read
            } else {
                self.theme.point_unread
            });
            if index == self.selected {
                style = style
                    .fg(self.theme.point_selected)
                    .add_modifier(Modifier::BOLD);
            }

            let glyph = if index < 9 {
                char::from_digit(index as u32 + 1, 10).unwrap_or('*')
            } else {
                '*'
            };
            buf[(x, y)].set_char(glyph).set_style(style);
        }

        if let Some(card) = self.focus {
            render_focus_card(card, inner, buf, self.theme);
        }
    }
}

/// Centered popover for the focused node.
fn render_focus_card(card: &FocusCard, area: Rect, buf: &mut Buffer, theme: &DiaryTheme) {
    let width = (area.width * 3 / 5).clamp(20, 60).min(area.width);
    let height = 8.min(area.height);
    let popover = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    Clear.render(popover, buf);
    let block = Block::default()
        .title(format!(" {} ", card.title))
        .title_style(theme.title_style())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));
    let inner = block.inner(popover);
    block.render(popover, buf);

    let lines = vec![
        Line::raw(card.summary.clone()),
        Line::raw(""),
        Line::styled("Enter: read    Esc: close", theme.hint_style()),
    ];
    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .render(inner, buf);
}
