use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const DEFAULT_REGION_PALETTE: [&str; 8] = [
    "#2DCF00", "#FF5353", "#5B5BFF", "#EBD61D", "#BA21E0", "#FF9C42", "#FF7DFF", "#B9264F",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub text_color: String,
    pub axis_color: String,
    pub backbone_color: String,
    pub stem_color: String,
    pub head_stroke_color: String,
    pub mutation_color: String,
    pub synonymous_color: String,
    pub region_label_color: String,
    pub region_palette: Vec<String>,
    pub background: String,
}

impl Theme {
    pub fn lollipops_default() -> Self {
        Self {
            font_family: "Helvetica, Arial, sans-serif".to_string(),
            text_color: "#000000".to_string(),
            axis_color: "#AAAAAA".to_string(),
            backbone_color: "#BABDB6".to_string(),
            stem_color: "#BABDB6".to_string(),
            head_stroke_color: "#BABDB6".to_string(),
            mutation_color: "#FF5555".to_string(),
            synonymous_color: "#51D354".to_string(),
            region_label_color: "#FFFFFF".to_string(),
            region_palette: DEFAULT_REGION_PALETTE
                .iter()
                .map(|value| value.to_string())
                .collect(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            text_color: "#1C2430".to_string(),
            axis_color: "#7A8AA6".to_string(),
            backbone_color: "#D7E0F0".to_string(),
            stem_color: "#7A8AA6".to_string(),
            head_stroke_color: "#FFFFFF".to_string(),
            mutation_color: "#E4572E".to_string(),
            synonymous_color: "#17BEBB".to_string(),
            region_label_color: "#FFFFFF".to_string(),
            region_palette: ["#4C6EF5", "#12B886", "#FAB005", "#BE4BDB", "#FD7E14", "#15AABF"]
                .iter()
                .map(|value| value.to_string())
                .collect(),
            background: "#FFFFFF".to_string(),
        }
    }

    /// Fill for the `index`-th region when the input carries no color.
    pub fn region_color(&self, index: usize) -> &str {
        if self.region_palette.is_empty() {
            return self.backbone_color.as_str();
        }
        self.region_palette[index % self.region_palette.len()].as_str()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::lollipops_default()
    }
}

/// Parses a `#RRGGBB` color (case-insensitive) into its channels.
pub fn parse_hex_color(input: &str) -> Result<(u8, u8, u8)> {
    let malformed = || Error::MalformedColor {
        input: input.to_string(),
    };
    let hex = input.strip_prefix('#').ok_or_else(malformed)?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed());
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| malformed())
    };
    Ok((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

pub fn format_hex_color((r, g, b): (u8, u8, u8)) -> String {
    format!("#{r:02X}{g:02X}{b:02X}")
}

/// Straight per-channel average of two `#RRGGBB` colors.
///
/// Halves are truncated, so `blend("#000000", "#FFFFFF")` is `#7F7F7F`.
pub fn blend_colors(a: &str, b: &str) -> Result<String> {
    let (r1, g1, b1) = parse_hex_color(a)?;
    let (r2, g2, b2) = parse_hex_color(b)?;
    let mix = |x: u8, y: u8| ((x as u16 + y as u16) / 2) as u8;
    Ok(format_hex_color((mix(r1, r2), mix(g1, g2), mix(b1, b2))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_black_and_white_truncates() {
        assert_eq!(blend_colors("#000000", "#FFFFFF").unwrap(), "#7F7F7F");
    }

    #[test]
    fn blend_is_symmetric() {
        let ab = blend_colors("#12AB9F", "#FE0301").unwrap();
        let ba = blend_colors("#FE0301", "#12AB9F").unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab, "#885750");
    }

    #[test]
    fn blend_with_self_is_identity_after_uppercasing() {
        for color in ["#ff5555", "#51D354", "#000000", "#aBcDeF"] {
            assert_eq!(blend_colors(color, color).unwrap(), color.to_uppercase());
        }
    }

    #[test]
    fn malformed_colors_are_reported() {
        for bad in ["", "red", "#FFF", "FF0000", "#GG0000", "#FF00001", "#ＦＦ0000"] {
            let err = blend_colors(bad, "#000000").unwrap_err();
            assert!(
                matches!(err, Error::MalformedColor { ref input } if input == bad),
                "expected MalformedColor for {bad:?}, got {err:?}"
            );
        }
        assert!(blend_colors("#000000", "blue").is_err());
    }

    #[test]
    fn region_color_cycles_palette() {
        let theme = Theme::lollipops_default();
        let n = theme.region_palette.len();
        assert_eq!(theme.region_color(0), theme.region_color(n));
        assert_ne!(theme.region_color(0), theme.region_color(1));
    }
}
