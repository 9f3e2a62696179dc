use catppuccin::PALETTE;
use ratatui::style::Color;
use ratatui::widgets::BorderType;

/// Convert a catppuccin color to a ratatui color.
const fn catppuccin_to_color(c: &catppuccin::Color) -> Color {
    Color::Rgb(c.rgb.r, c.rgb.g, c.rgb.b)
}

/// Colors used by the page, the URL prompt and the analysis dialog.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub base: Color,
    pub surface1: Color,
    pub overlay0: Color,
    pub overlay1: Color,
    pub text: Color,
    pub subtext1: Color,

    pub mauve: Color,
    pub red: Color,
    pub peach: Color,
    pub green: Color,
    pub lavender: Color,

    pub border_type: BorderType,
}

impl Theme {
    const fn from_catppuccin(flavor: &catppuccin::Flavor) -> Self {
        let c = &flavor.colors;
        Self {
            base: catppuccin_to_color(&c.base),
            surface1: catppuccin_to_color(&c.surface1),
            overlay0: catppuccin_to_color(&c.overlay0),
            overlay1: catppuccin_to_color(&c.overlay1),
            text: catppuccin_to_color(&c.text),
            subtext1: catppuccin_to_color(&c.subtext1),
            mauve: catppuccin_to_color(&c.mauve),
            red: catppuccin_to_color(&c.red),
            peach: catppuccin_to_color(&c.peach),
            green: catppuccin_to_color(&c.green),
            lavender: catppuccin_to_color(&c.lavender),
            border_type: BorderType::Rounded,
        }
    }

    /// Catppuccin Mocha theme (dark).
    #[must_use]
    pub fn catppuccin_mocha() -> Self {
        Self::from_catppuccin(&PALETTE.mocha)
    }

    /// Catppuccin Latte theme (light).
    #[must_use]
    pub fn catppuccin_latte() -> Self {
        Self::from_catppuccin(&PALETTE.latte)
    }

    /// Catppuccin Frappé theme (dark).
    #[must_use]
    pub fn catppuccin_frappe() -> Self {
        Self::from_catppuccin(&PALETTE.frappe)
    }

    /// Catppuccin Macchiato theme (dark).
    #[must_use]
    pub fn catppuccin_macchiato() -> Self {
        Self::from_catppuccin(&PALETTE.macchiato)
    }

    #[must_use]
    pub const fn base(&self) -> Color {
        self.base
    }

    #[must_use]
    pub const fn surface1(&self) -> Color {
        self.surface1
    }

    #[must_use]
    pub const fn overlay0(&self) -> Color {
        self.overlay0
    }

    #[must_use]
    pub const fn overlay1(&self) -> Color {
        self.overlay1
    }

    #[must_use]
    pub const fn text(&self) -> Color {
        self.text
    }

    #[must_use]
    pub const fn subtext1(&self) -> Color {
        self.subtext1
    }

    #[must_use]
    pub const fn mauve(&self) -> Color {
        self.mauve
    }

    #[must_use]
    pub const fn red(&self) -> Color {
        self.red
    }

    #[must_use]
    pub const fn peach(&self) -> Color {
        self.peach
    }

    #[must_use]
    pub const fn green(&self) -> Color {
        self.green
    }

    #[must_use]
    pub const fn lavender(&self) -> Color {
        self.lavender
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

const THEMES: [(&str, fn() -> Theme); 4] = [
    ("Catppuccin Mocha", Theme::catppuccin_mocha),
    ("Catppuccin Macchiato", Theme::catppuccin_macchiato),
    ("Catppuccin Frappé", Theme::catppuccin_frappe),
    ("Catppuccin Latte", Theme::catppuccin_latte),
];

/// Look up a theme by name. Returns the default theme if not found.
pub fn theme_from_name(name: &str) -> Theme {
    THEMES
        .iter()
        .find(|(theme_name, _)| theme_name.eq_ignore_ascii_case(name))
        .map_or_else(
            || {
                tracing::warn!(name, "Unknown theme, using default");
                Theme::default()
            },
            |(_, theme)| theme(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_lookup_is_case_insensitive() {
        let latte = theme_from_name("catppuccin latte");
        assert_eq!(latte.base(), Theme::catppuccin_latte().base());
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let theme = theme_from_name("Solarized");
        assert_eq!(theme.base(), Theme::catppuccin_mocha().base());
    }
}
