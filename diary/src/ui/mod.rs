//! UI module for the diary TUI

pub mod render;
pub mod theme;
pub mod widgets;
