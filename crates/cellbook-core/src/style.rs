use serde::{Deserialize, Serialize};
use std::fmt;

/// RGBA color, serialized as a CSS hex string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Convert to CSS hex color string
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }

    /// Parse from CSS hex color string (`#rgb`, `#rrggbb` or `#rrggbbaa`)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Some(Color::rgb(r * 17, g * 17, b * 17))
            }
            6 => Some(Color::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Some(Color::rgba(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid hex color: {value}"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

/// Cell style; every unset field inherits the default
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<HorizontalAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u16>,
}

impl CellStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    pub fn with_underline(mut self, underline: bool) -> Self {
        self.underline = Some(underline);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn with_text_align(mut self, align: HorizontalAlign) -> Self {
        self.text_align = Some(align);
        self
    }

    pub fn with_font_size(mut self, size: u16) -> Self {
        self.font_size = Some(size);
        self
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        *self == CellStyle::default()
    }

    pub fn is_bold(&self) -> bool {
        self.bold.unwrap_or(false)
    }

    pub fn is_italic(&self) -> bool {
        self.italic.unwrap_or(false)
    }

    pub fn is_underline(&self) -> bool {
        self.underline.unwrap_or(false)
    }

    /// Merge a partial style into this one: fields set in `patch` win, the rest are kept
    pub fn merge(&mut self, patch: &CellStyle) {
        if patch.bold.is_some() {
            self.bold = patch.bold;
        }
        if patch.italic.is_some() {
            self.italic = patch.italic;
        }
        if patch.underline.is_some() {
            self.underline = patch.underline;
        }
        if patch.color.is_some() {
            self.color = patch.color;
        }
        if patch.background_color.is_some() {
            self.background_color = patch.background_color;
        }
        if patch.text_align.is_some() {
            self.text_align = patch.text_align;
        }
        if patch.font_size.is_some() {
            self.font_size = patch.font_size;
        }
    }

    /// Non-mutating form of [`CellStyle::merge`]
    pub fn merged(&self, patch: &CellStyle) -> CellStyle {
        let mut out = self.clone();
        out.merge(patch);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        let color = Color::rgb(255, 128, 64);
        assert_eq!(color.to_hex(), "#ff8040");

        let parsed = Color::from_hex("#ff8040").unwrap();
        assert_eq!(parsed, color);

        assert_eq!(Color::from_hex("#f00"), Some(Color::RED));
        assert_eq!(Color::from_hex("#00000080"), Some(Color::rgba(0, 0, 0, 128)));
        assert_eq!(Color::from_hex("#ggg"), None);
        assert_eq!(Color::from_hex("red"), None);
    }

    #[test]
    fn test_style_builder() {
        let style = CellStyle::new()
            .with_bold(true)
            .with_color(Color::RED)
            .with_font_size(14);

        assert!(style.is_bold());
        assert!(!style.is_italic());
        assert_eq!(style.color, Some(Color::RED));
        assert_eq!(style.font_size, Some(14));
    }

    #[test]
    fn test_merge_keeps_unspecified_fields() {
        let mut style = CellStyle::new().with_italic(true);
        style.merge(&CellStyle::new().with_bold(true));

        assert_eq!(style.bold, Some(true));
        assert_eq!(style.italic, Some(true));
    }

    #[test]
    fn test_merge_can_turn_flags_off() {
        let mut style = CellStyle::new().with_bold(true).with_underline(true);
        style.merge(&CellStyle::new().with_bold(false));

        assert_eq!(style.bold, Some(false));
        assert_eq!(style.underline, Some(true));
    }

    #[test]
    fn test_merge_overwrites_alignment_and_size() {
        let style = CellStyle::new()
            .with_text_align(HorizontalAlign::Left)
            .with_font_size(11)
            .merged(&CellStyle::new().with_text_align(HorizontalAlign::Right));

        assert_eq!(style.text_align, Some(HorizontalAlign::Right));
        assert_eq!(style.font_size, Some(11));
    }

    #[test]
    fn test_serialization_shape() {
        let style = CellStyle::new()
            .with_bold(true)
            .with_background_color(Color::rgb(255, 255, 0))
            .with_text_align(HorizontalAlign::Center);

        let json = serde_json::to_value(&style).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "bold": true,
                "backgroundColor": "#ffff00",
                "textAlign": "center"
            })
        );

        let back: CellStyle = serde_json::from_value(json).unwrap();
        assert_eq!(back, style);
    }
}
