//! Palette colors resolved for ratatui.
use ratatui::style::{Color, Modifier, Style};
use stock_common::config::{Palette, parse_hex_color};
use stock_common::model::Direction;

/// Resolved colors used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    /// Screen background.
    pub background: Color,
    /// Header, footer and chart panel fill.
    pub frame: Color,
    /// Card fill.
    pub card: Color,
    /// Primary text.
    pub text: Color,
    /// Labels, hints and axes.
    pub secondary_text: Color,
    /// Price above the previous close.
    pub up: Color,
    /// Price below the previous close.
    pub down: Color,
    /// Unchanged price.
    pub neutral: Color,
    /// Selected card border and chart line.
    pub accent: Color,
    /// Unselected borders.
    pub border: Color,
}

fn color(hex: &str, fallback: Color) -> Color {
    parse_hex_color(hex).map_or(fallback, |(r, g, b)| Color::Rgb(r, g, b))
}

impl Theme {
    /// Resolves a palette. Settings are validated at load time, so the
    /// fallbacks only matter for hand-built palettes.
    pub fn from_palette(palette: &Palette) -> Self {
        Self {
            background: color(&palette.background, Color::Black),
            frame: color(&palette.frame, Color::Black),
            card: color(&palette.card, Color::DarkGray),
            text: color(&palette.text, Color::White),
            secondary_text: color(&palette.secondary_text, Color::Gray),
            up: color(&palette.up, Color::Green),
            down: color(&palette.down, Color::Red),
            neutral: color(&palette.neutral, Color::Gray),
            accent: color(&palette.accent, Color::Blue),
            border: color(&palette.border, Color::DarkGray),
        }
    }

    /// Price color for a direction.
    pub fn direction(&self, direction: Direction) -> Color {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Unchanged => self.neutral,
        }
    }

    /// Base style for a surface.
    pub fn surface(&self, background: Color) -> Style {
        Style::default().fg(self.text).bg(background)
    }

    /// Bold text in the primary color.
    pub fn heading(&self) -> Style {
        Style::default().fg(self.text).add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_resolves_to_rgb() {
        let theme = Theme::from_palette(&Palette::default());
        assert_eq!(theme.up, Color::Rgb(0x10, 0xb9, 0x81));
        assert_eq!(theme.direction(Direction::Down), Color::Rgb(0xef, 0x44, 0x44));
        assert_eq!(theme.direction(Direction::Unchanged), theme.neutral);
    }

    #[test]
    fn bad_hex_uses_fallback() {
        let palette = Palette {
            accent: "blue".into(),
            ..Palette::default()
        };
        assert_eq!(Theme::from_palette(&palette).accent, Color::Blue);
    }
}
