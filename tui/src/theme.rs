//! Color theme and glyphs for the hivecheck TUI.
//!
//! Honey-on-charcoal palette with an optional ASCII glyph set.

use ratatui::style::{Color, Modifier, Style};

mod colors {
    use super::Color;

    pub const BG_DARK: Color = Color::Rgb(17, 17, 17);
    pub const BG_CARD: Color = Color::Rgb(40, 36, 26);
    pub const BG_CARD_BACK: Color = Color::Rgb(30, 28, 22);
    pub const BORDER: Color = Color::Rgb(92, 84, 60);

    pub const TEXT_PRIMARY: Color = Color::Rgb(255, 248, 225);
    pub const TEXT_MUTED: Color = Color::Rgb(140, 132, 110);

    pub const HONEY: Color = Color::Rgb(255, 212, 0);
    pub const HEALTHY: Color = Color::Rgb(152, 187, 108);
    pub const UNHEALTHY: Color = Color::Rgb(255, 77, 77);
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_card: Color,
    pub bg_card_back: Color,
    pub border: Color,
    pub text_primary: Color,
    pub text_muted: Color,
    pub honey: Color,
    pub healthy: Color,
    pub unhealthy: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: colors::BG_DARK,
            bg_card: colors::BG_CARD,
            bg_card_back: colors::BG_CARD_BACK,
            border: colors::BORDER,
            text_primary: colors::TEXT_PRIMARY,
            text_muted: colors::TEXT_MUTED,
            honey: colors::HONEY,
            healthy: colors::HEALTHY,
            unhealthy: colors::UNHEALTHY,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub swipe_left: &'static str,
    pub swipe_right: &'static str,
    pub tilt_left: &'static str,
    pub tilt_right: &'static str,
    pub bee: &'static str,
    pub drag_keys: &'static str,
    pub separator: &'static str,
    pub bullet: &'static str,
    pub ellipsis: &'static str,
    pub degree: &'static str,
}

#[must_use]
pub fn glyphs(ascii_only: bool) -> Glyphs {
    if ascii_only {
        Glyphs {
            swipe_left: "<-",
            swipe_right: "->",
            tilt_left: "\\",
            tilt_right: "/",
            bee: "*",
            drag_keys: "<-/->",
            separator: "|",
            bullet: "-",
            ellipsis: "...",
            degree: " deg",
        }
    } else {
        Glyphs {
            swipe_left: "◀",
            swipe_right: "▶",
            tilt_left: "↺",
            tilt_right: "↻",
            bee: "🐝",
            drag_keys: "←/→",
            separator: "│",
            bullet: "·",
            ellipsis: "…",
            degree: "°",
        }
    }
}

pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn title(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.honey)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn muted(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn verdict(palette: &Palette, correct: bool) -> Style {
        let color = if correct {
            palette.healthy
        } else {
            palette.unhealthy
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}
