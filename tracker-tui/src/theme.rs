//! Kanagawa Dragon theme module.
//!
//! Low-contrast, warm, dark palette for the UI chrome, plus the fixed
//! status colors used by the duration chart.

use ratatui::style::Color;

use crate::derive::BadgeKind;

/// Kanagawa Dragon color palette
pub mod colors {
    use super::Color;

    // === Background Colors ===
    /// Dragon Black - Primary background
    pub const BG_DARK: Color = Color::Rgb(0x18, 0x16, 0x16);
    /// Slightly lighter background for medium contrast areas
    pub const BG_MEDIUM: Color = Color::Rgb(0x1D, 0x1C, 0x19);
    /// Background for highlighted/selected areas
    pub const BG_HIGHLIGHT: Color = Color::Rgb(0x28, 0x27, 0x27);

    // === Foreground Colors ===
    /// Old White - Primary text color
    pub const FG_PRIMARY: Color = Color::Rgb(0xC5, 0xC9, 0xC5);
    /// Dimmed text for secondary information
    pub const FG_DIM: Color = Color::Rgb(0x72, 0x71, 0x69);
    /// Very dim text for hints and placeholders
    pub const FG_HINT: Color = Color::Rgb(0x54, 0x54, 0x54);

    // === Accent Colors ===
    pub const RED: Color = Color::Rgb(0xC4, 0x74, 0x6E);
    pub const GREEN: Color = Color::Rgb(0x8A, 0x9A, 0x7B);
    pub const YELLOW: Color = Color::Rgb(0xC4, 0xB2, 0x8A);
    pub const BLUE: Color = Color::Rgb(0x8B, 0xA4, 0xB0);
    pub const PURPLE: Color = Color::Rgb(0x95, 0x7F, 0xB8);

    // === UI Element Colors ===
    /// Wall Gray - For borders and separators
    pub const BORDER: Color = Color::Rgb(0x72, 0x71, 0x69);
    /// Dim border for less important separators
    pub const BORDER_DIM: Color = Color::Rgb(0x3A, 0x3A, 0x3A);
    /// Accent border for focused elements
    pub const BORDER_ACCENT: Color = Color::Rgb(0x8B, 0xA4, 0xB0);

    // === Chart Colors ===
    pub const CHART_COMPLETED: Color = Color::Rgb(0x4C, 0xC9, 0xF0);
    pub const CHART_IN_PROGRESS: Color = Color::Rgb(0xF7, 0x25, 0x85);
    pub const CHART_ON_HOLD: Color = Color::Rgb(0x43, 0x61, 0xEE);
    pub const CHART_CANCELLED: Color = Color::Rgb(0x6C, 0x75, 0x7D);
    /// Unrecognised status
    pub const CHART_FALLBACK: Color = CHART_ON_HOLD;
}

/// Semantic styling helpers
pub mod styles {
    use ratatui::style::{Modifier, Style};
    use super::colors;

    /// Style for primary text
    pub fn text() -> Style {
        Style::default().fg(colors::FG_PRIMARY)
    }

    /// Style for dimmed/secondary text
    pub fn text_dim() -> Style {
        Style::default().fg(colors::FG_DIM)
    }

    /// Style for hint text
    pub fn text_hint() -> Style {
        Style::default().fg(colors::FG_HINT)
    }

    pub fn error() -> Style {
        Style::default().fg(colors::RED)
    }

    pub fn info() -> Style {
        Style::default().fg(colors::BLUE)
    }

    /// Style for the selected card title
    pub fn selected() -> Style {
        Style::default()
            .fg(colors::BG_DARK)
            .bg(colors::BLUE)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for focused borders
    pub fn border_focused() -> Style {
        Style::default().fg(colors::BORDER_ACCENT)
    }

    /// Style for unfocused borders
    pub fn border() -> Style {
        Style::default().fg(colors::BORDER)
    }

    /// Style for dim borders
    pub fn border_dim() -> Style {
        Style::default().fg(colors::BORDER_DIM)
    }

    /// Style for block titles
    pub fn title() -> Style {
        Style::default()
            .fg(colors::FG_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for accent titles (headers)
    pub fn title_accent() -> Style {
        Style::default()
            .fg(colors::BLUE)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for form labels
    pub fn form_label() -> Style {
        Style::default().fg(colors::FG_DIM)
    }

    /// Style for form input (focused)
    pub fn form_input_focused() -> Style {
        Style::default()
            .fg(colors::FG_PRIMARY)
            .bg(colors::BG_HIGHLIGHT)
    }

    /// Style for form input (unfocused)
    pub fn form_input() -> Style {
        Style::default()
            .fg(colors::FG_PRIMARY)
            .bg(colors::BG_MEDIUM)
    }

    pub fn button() -> Style {
        Style::default()
            .fg(colors::FG_PRIMARY)
            .bg(colors::BG_MEDIUM)
    }

    pub fn button_focused() -> Style {
        Style::default()
            .fg(colors::BG_DARK)
            .bg(colors::BLUE)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for danger buttons (delete)
    pub fn button_danger() -> Style {
        Style::default()
            .fg(colors::BG_DARK)
            .bg(colors::RED)
            .add_modifier(Modifier::BOLD)
    }
}

/// Badge style for a status badge kind
pub fn badge_style(kind: BadgeKind) -> ratatui::style::Style {
    use ratatui::style::{Modifier, Style};

    let bg = match kind {
        BadgeKind::Success => colors::GREEN,
        BadgeKind::Warning => colors::YELLOW,
        BadgeKind::Info => colors::BLUE,
        BadgeKind::Danger => colors::RED,
        BadgeKind::Secondary => colors::FG_DIM,
    };
    Style::default()
        .fg(colors::BG_DARK)
        .bg(bg)
        .add_modifier(Modifier::BOLD)
}
