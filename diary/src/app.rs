//! Main application state

use diary_core::{ConfirmTicket, ReaderSession, ViewMode};

use crate::screen::Screen;

/// Application state wrapping the session and TUI-only cursors.
pub struct App {
    /// The narrative engine, rendering into a retained [`Screen`].
    pub session: ReaderSession<Screen>,

    /// Outstanding reset confirmation, polled by the main loop.
    pub pending_reset: Option<ConfirmTicket>,

    /// Cursor over overview points.
    pub selected_point: usize,

    /// Cursor over calendar markers (indices into the marker list,
    /// not raw cells).
    pub selected_marker: usize,

    /// Narrative scroll offset in lines.
    pub scroll: u16,

    status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: ReaderSession<Screen>) -> Self {
        Self {
            session,
            pending_reset: None,
            selected_point: 0,
            selected_marker: 0,
            scroll: 0,
            status_message: None,
            should_quit: false,
        }
    }

    /// Current view mode, for key routing and drawing.
    pub fn mode(&self) -> &ViewMode {
        self.session.mode()
    }

    /// Whether a confirm dialog is waiting for a key.
    pub fn has_prompt(&self) -> bool {
        self.session.surface().prompt.is_some()
    }

    /// Ask for a progress reset unless one is already pending.
    pub fn request_reset(&mut self) {
        if self.pending_reset.is_none() {
            self.pending_reset = Some(self.session.begin_reset());
            self.set_status("Confirm reset: y / n");
        }
    }

    /// Poll the pending reset and apply its outcome once answered.
    pub fn poll_reset(&mut self) {
        let Some(ticket) = self.pending_reset.as_mut() else {
            return;
        };
        if let Some(confirmed) = ticket.try_outcome() {
            self.pending_reset = None;
            self.session.finish_reset(confirmed);
            if confirmed {
                self.scroll = 0;
                self.set_status("Memories initialized");
            } else {
                self.clear_status();
            }
        }
    }

    /// Ids of calendar markers in cell order, for the overlay cursor.
    pub fn marker_ids(&self) -> Vec<String> {
        self.session
            .surface()
            .cells
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|c| c.marker.as_ref().map(|m| m.id.clone()))
            .collect()
    }

    /// Move the overview cursor by `delta`, wrapping.
    pub fn move_point_cursor(&mut self, delta: isize) {
        let len = self.session.surface().points.len();
        if len == 0 {
            return;
        }
        self.selected_point =
            (self.selected_point as isize + delta).rem_euclid(len as isize) as usize;
    }

    /// Move the calendar cursor by `delta`, wrapping.
    pub fn move_marker_cursor(&mut self, delta: isize) {
        let len = self.marker_ids().len();
        if len == 0 {
            return;
        }
        self.selected_marker =
            (self.selected_marker as isize + delta).rem_euclid(len as isize) as usize;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn status(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}
