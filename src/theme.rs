//! Theme colors for the UI, including the badge palette for lead status
//! and priority. A user palette file at ~/.config/prospect/palette.conf
//! (kitty.conf-style `key #hexcolor` lines) overrides the defaults.

use ratatui::style::Color;
use std::collections::HashMap;
use std::fs;

use crate::leads::{LeadStatus, Priority};

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,        // Active borders, highlights
    pub danger: Color,        // Errors, destructive actions
    pub success: Color,       // Won deals, success feedback
    pub warning: Color,       // Overdue follow-ups, pending confirms
    pub text: Color,          // Primary text
    pub text_dim: Color,      // Dimmed text, empty fields
    pub bg_selected: Color,   // Cursor row background
    pub inactive: Color,      // Inactive borders
    pub header: Color,        // Table header text
}

impl Default for Theme {
    fn default() -> Self {
        // Catppuccin-inspired fallback palette
        Self {
            accent: Color::Rgb(250, 179, 135),
            danger: Color::Rgb(243, 139, 168),
            success: Color::Rgb(166, 218, 149),
            warning: Color::Rgb(249, 226, 175),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(137, 180, 250),
        }
    }
}

impl Theme {
    /// Load theme from the user palette file, falling back to defaults.
    pub fn load() -> Self {
        if let Some(theme) = Self::load_user_palette() {
            return theme;
        }
        Self::default()
    }

    fn load_user_palette() -> Option<Self> {
        let path = dirs::config_dir()?.join("prospect/palette.conf");
        let content = fs::read_to_string(&path).ok()?;
        let colors = Self::parse_palette(&content);

        if colors.is_empty() {
            return None;
        }

        let base = Theme::default();
        let pick = |key: &str, fallback: Color| colors.get(key).copied().unwrap_or(fallback);

        Some(Self {
            accent: pick("accent", base.accent),
            danger: pick("danger", base.danger),
            success: pick("success", base.success),
            warning: pick("warning", base.warning),
            text: pick("text", base.text),
            text_dim: pick("text_dim", base.text_dim),
            bg_selected: pick("bg_selected", base.bg_selected),
            inactive: pick("inactive", base.inactive),
            header: pick("header", base.header),
        })
    }

    /// Badge color for a pipeline stage.
    pub fn status_color(&self, status: LeadStatus) -> Color {
        match status {
            LeadStatus::New => self.text_dim,
            LeadStatus::Contacted => self.text,
            LeadStatus::Qualified => self.accent,
            LeadStatus::Proposal => self.header,
            LeadStatus::Negotiation => self.warning,
            LeadStatus::ClosedWon => self.success,
            LeadStatus::ClosedLost => self.danger,
        }
    }

    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::Low => self.text_dim,
            Priority::Medium => self.warning,
            Priority::High => self.danger,
        }
    }

    /// Parse palette format: `key #hexcolor` per line.
    fn parse_palette(content: &str) -> HashMap<String, Color> {
        let mut colors = HashMap::new();

        for line in content.lines() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.splitn(2, char::is_whitespace).collect();
            if parts.len() == 2 {
                let key = parts[0].trim();
                let value = parts[1].trim();

                if let Some(color) = Self::parse_hex_color(value) {
                    colors.insert(key.to_string(), color);
                }
            }
        }

        colors
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');

        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            Theme::parse_hex_color("#ff8000"),
            Some(Color::Rgb(255, 128, 0))
        );
        assert_eq!(Theme::parse_hex_color("fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(Theme::parse_hex_color("#12345"), None);
        assert_eq!(Theme::parse_hex_color("nothex"), None);
    }

    #[test]
    fn test_parse_palette_skips_comments() {
        let content = "# a comment\naccent #ffc107\n\ndanger #d35f5f\nbadline\n";
        let colors = Theme::parse_palette(content);
        assert_eq!(colors.len(), 2);
        assert_eq!(colors.get("accent"), Some(&Color::Rgb(255, 193, 7)));
    }

    #[test]
    fn test_every_status_has_a_badge_color() {
        let theme = Theme::default();
        for status in LeadStatus::ALL {
            // Total mapping; just exercise each arm.
            let _ = theme.status_color(status);
        }
        assert_ne!(
            theme.priority_color(Priority::High),
            theme.priority_color(Priority::Low)
        );
    }
}
