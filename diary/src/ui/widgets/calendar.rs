//! Heat-calendar overlay widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use diary_core::Cell;

use crate::ui::theme::DiaryTheme;

/// Cells per rendered row.
const ROW_WIDTH: usize = 20;

/// Renders the cell grid as rows of blocks, with the cursor marker
/// highlighted and a legend underneath.
pub struct CalendarWidget<'a> {
    cells: &'a [Cell],
    selected_marker: usize,
    theme: &'a DiaryTheme,
}

impl<'a> CalendarWidget<'a> {
    pub fn new(cells: &'a [Cell], theme: &'a DiaryTheme) -> Self {
        Self {
            cells,
            selected_marker: 0,
            theme,
        }
    }

    pub fn selected_marker(mut self, selected: usize) -> Self {
        self.selected_marker = selected;
        self
    }
}

impl Widget for CalendarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::default()
            .title(" Observation Graph ")
            .title_style(self.theme.title_style())
            .borders(Borders::ALL)
            .border_style(self.theme.border_style());
        let inner = block.inner(area);
        block.render(area, buf);

        let mut marker_index = 0usize;
        let mut selected_title: Option<String> = None;
        let mut lines: Vec<Line> = Vec::new();

        for row in self.cells.chunks(ROW_WIDTH) {
            let mut spans: Vec<Span> = Vec::new();
            for cell in row {
                let span = match (&cell.marker, &cell.noise) {
                    (Some(marker), _) => {
                        let is_selected = marker_index == self.selected_marker;
                        if is_selected {
                            selected_title = Some(if marker.count > 0 {
                                format!("{} ({} observed)", marker.title, marker.count)
                            } else {
                                "Unobserved memory".to_string()
                            });
                        }
                        marker_index += 1;

                        let mut style = if marker.count > 0 {
                            self.theme.tier_style(marker.tier, marker.emphasized)
                        } else {
                            // Present but unrevealed.
                            Style::default().fg(self.theme.noise)
                        };
                        if is_selected {
                            style = style.add_modifier(Modifier::REVERSED);
                        }
                        Span::styled("■ ", style)
                    }
                    (None, Some(noise)) => {
                        // Opacity collapses to the dim noise color on a
                        // terminal; tier 2 flickers a shade brighter.
                        let color = if noise.tier > 1 {
                            self.theme.tiers[0]
                        } else {
                            self.theme.noise
                        };
                        Span::styled("■ ", Style::default().fg(color))
                    }
                    (None, None) => Span::styled("· ", self.theme.hint_style()),
                };
                spans.push(span);
            }
            lines.push(Line::from(spans));
        }

        lines.push(Line::raw(""));
        if let Some(title) = selected_title {
            lines.push(Line::styled(title, self.theme.title_style()));
        }
        lines.push(Line::styled(
            "h/l: move    Enter: open    Esc: close",
            self.theme.hint_style(),
        ));

        Paragraph::new(lines).render(inner, buf);
    }
}
