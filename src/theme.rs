//! Color theme system for Spigot
//!
//! Provides 4 retro-inspired color schemes that can be selected via CLI flag.

use ratatui::style::Color;
use std::fmt;

/// Available color themes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Nord-inspired theme (default) - modern muted colors
    Nord,
    /// Classic DOS Blue - bright white on blue background
    DosBlue,
    /// Amber CRT - orange/amber text on black (retro terminal)
    AmberCrt,
    /// Green Phosphor - green text on black (classic terminal)
    GreenPhosphor,
}

impl Theme {
    /// Parse theme name from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "nord" => Ok(Theme::Nord),
            "dos" | "dosblue" | "dos-blue" => Ok(Theme::DosBlue),
            "amber" | "ambercrt" | "amber-crt" => Ok(Theme::AmberCrt),
            "green" | "greenphosphor" | "green-phosphor" => Ok(Theme::GreenPhosphor),
            _ => Err(format!(
                "Unknown theme '{}'. Available: nord, dos-blue, amber-crt, green-phosphor",
                s
            )),
        }
    }

    /// Get the color scheme for this theme
    pub fn colors(&self) -> ColorScheme {
        match self {
            Theme::Nord => ColorScheme::nord(),
            Theme::DosBlue => ColorScheme::dos_blue(),
            Theme::AmberCrt => ColorScheme::amber_crt(),
            Theme::GreenPhosphor => ColorScheme::green_phosphor(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Nord
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Nord => write!(f, "nord"),
            Theme::DosBlue => write!(f, "dos-blue"),
            Theme::AmberCrt => write!(f, "amber-crt"),
            Theme::GreenPhosphor => write!(f, "green-phosphor"),
        }
    }
}

/// Color scheme for a theme
#[derive(Debug, Clone, Copy)]
pub struct ColorScheme {
    /// Primary text color
    pub text: Color,
    /// Dimmed text color (for hints and secondary info)
    pub text_dim: Color,
    /// Border color for focused elements
    pub focus_border: Color,
    /// Border color for unfocused elements
    pub unfocused_border: Color,
    /// Background for selected list items
    pub selection_bg: Color,
    /// Foreground for selected list items
    pub selection_fg: Color,
    /// Success banner / confirmed drip color
    pub success: Color,
    /// Error banner / validation message color
    pub error: Color,
    /// Accent for the logged-in badge and magnification boost
    pub badge: Color,
}

impl ColorScheme {
    /// Nord theme (default) - Modern muted colors
    pub fn nord() -> Self {
        Self {
            text: Color::White,
            text_dim: Color::Gray,
            focus_border: Color::Yellow,
            unfocused_border: Color::Gray,
            selection_bg: Color::Yellow,
            selection_fg: Color::Black,
            success: Color::Green,
            error: Color::Red,
            badge: Color::Cyan,
        }
    }

    /// DOS Blue theme - Classic DOS aesthetic
    pub fn dos_blue() -> Self {
        Self {
            text: Color::White,
            text_dim: Color::LightBlue,
            focus_border: Color::Yellow,
            unfocused_border: Color::Cyan,
            selection_bg: Color::Cyan,
            selection_fg: Color::Black,
            success: Color::LightGreen,
            error: Color::LightRed,
            badge: Color::LightCyan,
        }
    }

    /// Amber CRT theme - Retro terminal
    pub fn amber_crt() -> Self {
        let amber = Color::Rgb(255, 176, 0);
        let amber_bright = Color::Rgb(255, 200, 100);
        let amber_dim = Color::Rgb(180, 120, 0);

        Self {
            text: amber,
            text_dim: amber_dim,
            focus_border: amber_bright,
            unfocused_border: amber_dim,
            selection_bg: amber,
            selection_fg: Color::Black,
            success: Color::Rgb(100, 255, 100),
            error: Color::Red,
            badge: amber_bright,
        }
    }

    /// Green Phosphor theme - Classic green screen
    pub fn green_phosphor() -> Self {
        let green = Color::Rgb(0, 255, 0);
        let green_dim = Color::Rgb(0, 180, 0);
        let green_bright = Color::Rgb(100, 255, 100);

        Self {
            text: green,
            text_dim: green_dim,
            focus_border: green_bright,
            unfocused_border: green_dim,
            selection_bg: green,
            selection_fg: Color::Black,
            success: green_bright,
            error: Color::Red,
            badge: green_bright,
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::nord()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_parsing() {
        assert_eq!(Theme::from_str("nord").unwrap(), Theme::Nord);
        assert_eq!(Theme::from_str("NORD").unwrap(), Theme::Nord);
        assert_eq!(Theme::from_str("dos").unwrap(), Theme::DosBlue);
        assert_eq!(Theme::from_str("amber-crt").unwrap(), Theme::AmberCrt);
        assert_eq!(Theme::from_str("green").unwrap(), Theme::GreenPhosphor);
        assert!(Theme::from_str("invalid").is_err());
    }
}
