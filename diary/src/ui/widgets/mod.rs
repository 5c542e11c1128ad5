//! Widgets for the diary TUI

pub mod calendar;
pub mod narrative;
pub mod overview;

pub use calendar::CalendarWidget;
pub use narrative::NarrativeWidget;
pub use overview::OverviewWidget;
