//! Event handling for the diary TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use diary_core::ViewMode;

use crate::app::App;

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.scroll_up(3);
            EventResult::NeedsRedraw
        }
        MouseEventKind::ScrollDown => {
            app.scroll_down(3);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // A pending dialog captures every key.
    if app.has_prompt() {
        return handle_prompt_key(app, key);
    }

    // Global shortcuts
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }
    match key.code {
        KeyCode::Char('q') => return EventResult::Quit,
        KeyCode::Char('r') => {
            app.request_reset();
            return EventResult::NeedsRedraw;
        }
        _ => {}
    }

    match app.mode().clone() {
        ViewMode::Narrative { .. } => handle_narrative_keys(app, key),
        ViewMode::Overview { .. } => handle_overview_keys(app, key),
        ViewMode::GraphOverlay { .. } => handle_overlay_keys(app, key),
    }
}

/// Keys while reading a node
fn handle_narrative_keys(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        // Choices by number
        KeyCode::Char(c @ '1'..='9') => {
            let index = c.to_digit(10).unwrap_or(1) as usize - 1;
            app.scroll = 0;
            app.session.choose_action(index);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('o') => {
            app.selected_point = 0;
            app.session.toggle_overview();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('g') => {
            app.selected_marker = 0;
            app.session.open_graph_overlay();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.scroll_down(1);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.scroll_up(1);
            EventResult::NeedsRedraw
        }
        KeyCode::PageDown => {
            app.scroll_down(10);
            EventResult::NeedsRedraw
        }
        KeyCode::PageUp => {
            app.scroll_up(10);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Keys on the scattered overview
fn handle_overview_keys(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Tab | KeyCode::Right | KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('l') => {
            app.move_point_cursor(1);
            EventResult::NeedsRedraw
        }
        KeyCode::BackTab | KeyCode::Left | KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('h') => {
            app.move_point_cursor(-1);
            EventResult::NeedsRedraw
        }
        // Jump straight to a point by number
        KeyCode::Char(c @ '1'..='9') => {
            let index = c.to_digit(10).unwrap_or(1) as usize - 1;
            if index < app.session.surface().points.len() {
                app.selected_point = index;
                let id = app.session.surface().points[index].id.clone();
                app.session.select_node(&id);
            }
            EventResult::NeedsRedraw
        }
        // Select the point under the cursor; a second select opens it.
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(point) = app.session.surface().points.get(app.selected_point) {
                let id = point.id.clone();
                app.scroll = 0;
                app.session.select_node(&id);
            }
            EventResult::NeedsRedraw
        }
        KeyCode::Esc => {
            app.session.click_outside();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('o') => {
            app.scroll = 0;
            app.session.toggle_overview();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('g') => {
            app.selected_marker = 0;
            app.session.open_graph_overlay();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Keys on the heat-calendar overlay
fn handle_overlay_keys(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Right | KeyCode::Down | KeyCode::Char('l') | KeyCode::Char('j') | KeyCode::Tab => {
            app.move_marker_cursor(1);
            EventResult::NeedsRedraw
        }
        KeyCode::Left | KeyCode::Up | KeyCode::Char('h') | KeyCode::Char('k') | KeyCode::BackTab => {
            app.move_marker_cursor(-1);
            EventResult::NeedsRedraw
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            let ids = app.marker_ids();
            if let Some(id) = ids.get(app.selected_marker) {
                let id = id.clone();
                app.scroll = 0;
                app.session.cell_clicked(&id);
            }
            EventResult::NeedsRedraw
        }
        KeyCode::Esc | KeyCode::Char('g') => {
            app.session.close_graph_overlay();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Keys while a confirm dialog is open
fn handle_prompt_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            app.session.surface_mut().answer_prompt(true);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc | KeyCode::Char('q') => {
            app.session.surface_mut().answer_prompt(false);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}
