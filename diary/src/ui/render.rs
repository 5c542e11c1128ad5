//! Top-level frame rendering

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};

use diary_core::ViewMode;

use crate::app::App;
use crate::ui::theme::DiaryTheme;
use crate::ui::widgets::{CalendarWidget, NarrativeWidget, OverviewWidget};

/// Draw one frame from the retained screen state.
pub fn render(f: &mut Frame, app: &App, theme: &DiaryTheme) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(f.area());

    render_header(f, app, theme, header);
    render_body(f, app, theme, body);
    render_footer(f, app, theme, footer);

    if let Some(prompt) = &app.session.surface().prompt {
        render_confirm(f, theme, prompt.title.clone(), prompt.message.clone(), prompt.destructive);
    }
}

fn render_header(f: &mut Frame, app: &App, theme: &DiaryTheme, area: Rect) {
    let (visited, total) = app.session.surface().progress;
    let line = Line::from(vec![
        Span::styled(" THE DIARY ", theme.title_style()),
        Span::styled(
            format!("  MEMORIES: {visited}/{total}"),
            Style::default().fg(theme.foreground),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_body(f: &mut Frame, app: &App, theme: &DiaryTheme, area: Rect) {
    let screen = app.session.surface();
    match app.mode() {
        ViewMode::Narrative { .. } => {
            if let Some(node) = &screen.node {
                NarrativeWidget::new(node, &screen.actions, theme)
                    .scroll(app.scroll)
                    .render(area, f.buffer_mut());
            }
        }
        ViewMode::Overview { .. } => {
            OverviewWidget::new(&screen.points, theme)
                .focus(screen.focus.as_ref())
                .selected(app.selected_point)
                .render(area, f.buffer_mut());
        }
        ViewMode::GraphOverlay { .. } => {
            if let Some(cells) = &screen.cells {
                CalendarWidget::new(cells, theme)
                    .selected_marker(app.selected_marker)
                    .render(area, f.buffer_mut());
            }
        }
    }
}

fn render_footer(f: &mut Frame, app: &App, theme: &DiaryTheme, area: Rect) {
    let hints = match app.mode() {
        ViewMode::Narrative { .. } => " 1-9: choose   o: overview   g: graph   r: reset   q: quit",
        ViewMode::Overview { .. } => " Tab: next   Enter: focus/read   g: graph   r: reset   q: quit",
        ViewMode::GraphOverlay { .. } => " h/l: move   Enter: open   Esc: close   q: quit",
    };
    let line = match app.status() {
        Some(status) => Line::from(vec![
            Span::styled(format!(" {status}  "), theme.title_style()),
            Span::styled(hints.to_string(), theme.hint_style()),
        ]),
        None => Line::styled(hints.to_string(), theme.hint_style()),
    };
    f.render_widget(Paragraph::new(line), area);
}

/// Centered yes/no modal.
fn render_confirm(f: &mut Frame, theme: &DiaryTheme, title: String, message: String, destructive: bool) {
    let area = f.area();
    let width = (area.width * 3 / 5).clamp(24, 56).min(area.width);
    let height = 7.min(area.height);
    let modal = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    let border = if destructive {
        Style::default().fg(theme.danger)
    } else {
        Style::default().fg(theme.accent)
    };

    f.render_widget(Clear, modal);
    let block = Block::default()
        .title(format!(" {title} "))
        .title_style(theme.title_style())
        .borders(Borders::ALL)
        .border_style(border);
    let inner = block.inner(modal);
    f.render_widget(block, modal);

    let lines = vec![
        Line::raw(message),
        Line::raw(""),
        Line::styled("y: confirm    n: cancel", theme.hint_style()),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
