//! Styling for the terminal UI, with dark and light variants and
//! runtime switching.

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

/// Theme variants supported by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThemeVariant {
    #[default]
    SlateDark,
    PaperLight,
}

/// Color palette for a theme variant.
#[derive(Debug, Clone)]
struct Palette {
    background: Color,
    foreground: Color,
    accent: Color,
    border: Color,
    selection: Color,
    warning: Color,
    danger: Color,
}

/// UI element kinds the renderers style against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Text,
    Title,
    Border,
    Background,
    /// Currently selected row or action.
    Highlight,
    Accent,
    /// Dimmed hints and disabled rows.
    Inactive,
    Warning,
    Danger,
}

#[derive(Debug, Clone)]
pub struct Theme {
    variant: ThemeVariant,
    colors: Palette,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeVariant::default())
    }
}

impl Theme {
    pub fn new(variant: ThemeVariant) -> Self {
        let colors = match variant {
            ThemeVariant::SlateDark => Palette {
                background: Color::Rgb(30, 34, 42),
                foreground: Color::Rgb(205, 209, 217),
                accent: Color::Rgb(132, 193, 131),
                border: Color::Rgb(94, 102, 115),
                selection: Color::Rgb(52, 59, 72),
                warning: Color::Rgb(224, 175, 104),
                danger: Color::Rgb(224, 108, 117),
            },
            ThemeVariant::PaperLight => Palette {
                background: Color::Rgb(250, 247, 240),
                foreground: Color::Rgb(68, 76, 86),
                accent: Color::Rgb(72, 133, 59),
                border: Color::Rgb(160, 167, 178),
                selection: Color::Rgb(235, 229, 216),
                warning: Color::Rgb(176, 122, 32),
                danger: Color::Rgb(200, 64, 64),
            },
        };

        Self { variant, colors }
    }

    pub fn variant(&self) -> ThemeVariant {
        self.variant
    }

    pub fn toggle(&mut self) {
        *self = Self::new(match self.variant {
            ThemeVariant::SlateDark => ThemeVariant::PaperLight,
            ThemeVariant::PaperLight => ThemeVariant::SlateDark,
        });
    }

    pub fn style(&self, element: Element) -> Style {
        match element {
            Element::Text | Element::Background => Style::default()
                .fg(self.colors.foreground)
                .bg(self.colors.background),

            Element::Title => Style::default()
                .fg(self.colors.accent)
                .bg(self.colors.background)
                .add_modifier(Modifier::BOLD),

            Element::Border => Style::default()
                .fg(self.colors.border)
                .bg(self.colors.background),

            Element::Highlight => Style::default()
                .fg(self.colors.foreground)
                .bg(self.colors.selection)
                .add_modifier(Modifier::BOLD),

            Element::Accent => Style::default()
                .fg(self.colors.accent)
                .bg(self.colors.background)
                .add_modifier(Modifier::BOLD),

            Element::Inactive => Style::default()
                .fg(self.colors.border)
                .bg(self.colors.background),

            Element::Warning => Style::default()
                .fg(self.colors.warning)
                .bg(self.colors.background),

            Element::Danger => Style::default()
                .fg(self.colors.danger)
                .bg(self.colors.background),
        }
    }

    pub fn text_style(&self) -> Style {
        self.style(Element::Text)
    }

    pub fn highlight_style(&self) -> Style {
        self.style(Element::Highlight)
    }

    pub fn accent_style(&self) -> Style {
        self.style(Element::Accent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_variants() {
        let mut theme = Theme::default();
        assert_eq!(theme.variant(), ThemeVariant::SlateDark);

        theme.toggle();
        assert_eq!(theme.variant(), ThemeVariant::PaperLight);

        theme.toggle();
        assert_eq!(theme.variant(), ThemeVariant::SlateDark);
    }

    #[test]
    fn highlight_uses_the_selection_background() {
        let theme = Theme::default();
        assert_ne!(
            theme.style(Element::Highlight).bg,
            theme.style(Element::Text).bg
        );
    }
}
