//! Color theme and styling for the diary TUI

use ratatui::style::{Color, Modifier, Style};

/// Diary UI color theme
#[derive(Debug, Clone)]
pub struct DiaryTheme {
    pub foreground: Color,
    pub border: Color,
    pub accent: Color,
    pub danger: Color,

    // Overview map
    pub point_read: Color,
    pub point_unread: Color,
    pub point_selected: Color,

    // Heat calendar intensity tiers (index 0 used for tier 1)
    pub tiers: [Color; 4],
    pub noise: Color,
    pub hint: Color,
}

impl Default for DiaryTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            accent: Color::Cyan,
            danger: Color::Red,

            point_read: Color::Cyan,
            point_unread: Color::DarkGray,
            point_selected: Color::Yellow,

            tiers: [
                Color::Rgb(14, 68, 41),
                Color::Rgb(0, 109, 50),
                Color::Rgb(38, 166, 65),
                Color::Rgb(57, 211, 83),
            ],
            noise: Color::Rgb(22, 27, 34),
            hint: Color::DarkGray,
        }
    }
}

impl DiaryTheme {
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn hint_style(&self) -> Style {
        Style::default().fg(self.hint)
    }

    /// Style for a calendar marker at `tier` (1..=4); emphasized
    /// markers glow bold.
    pub fn tier_style(&self, tier: u32, emphasized: bool) -> Style {
        let index = (tier.clamp(1, 4) - 1) as usize;
        let style = Style::default().fg(self.tiers[index]);
        if emphasized {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}
