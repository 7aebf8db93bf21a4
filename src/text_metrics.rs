use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

/// Pixel width of a single line of text at a font size.
pub trait FontMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

impl<T: FontMeasure + ?Sized> FontMeasure for &T {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        (**self).text_width(text, font_size)
    }
}

/// Every character is `char_width_factor * font_size` wide.
///
/// Deterministic; used when output must not depend on installed fonts.
#[derive(Debug, Clone, Copy)]
pub struct FixedWidthMeasure {
    pub char_width_factor: f32,
}

impl Default for FixedWidthMeasure {
    fn default() -> Self {
        Self {
            char_width_factor: 0.6,
        }
    }
}

impl FontMeasure for FixedWidthMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        if font_size <= 0.0 {
            return 0.0;
        }
        text.chars().count() as f32 * font_size * self.char_width_factor
    }
}

/// Measures with glyph advances from an installed font, falling back to a
/// per-character estimate when the family cannot be resolved.
#[derive(Debug, Clone)]
pub struct SystemFontMeasure {
    pub font_family: String,
}

impl SystemFontMeasure {
    pub fn new(font_family: impl Into<String>) -> Self {
        Self {
            font_family: font_family.into(),
        }
    }
}

impl FontMeasure for SystemFontMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        measure_text_width(text, font_size, &self.font_family)
            .unwrap_or_else(|| fallback_text_width(text, font_size))
    }
}

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = TEXT_MEASURER.lock().ok()?;
    guard.measure(text, font_size, font_family)
}

pub fn fallback_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size.max(0.0)
}

// Rough Helvetica advances, in ems.
fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' | 'f' | 't' | 'I' | 'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '!' | '|' => 0.28,
        '(' | ')' | '[' | ']' | '{' | '}' | 'r' | '-' | '/' => 0.33,
        'm' | 'w' | 'M' | 'W' | '@' | '%' => 0.86,
        'A'..='Z' => 0.68,
        'a'..='z' | '0'..='9' => 0.56,
        _ => 0.6,
    }
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    cache: HashMap<String, Option<FontFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            cache: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let key = normalize_family_key(font_family);
        if !self.cache.contains_key(&key) {
            let face = self.load_face(font_family);
            if face.is_none() {
                log::debug!("no installed font for {key:?}, using width estimates");
            }
            self.cache.insert(key.clone(), face);
        }
        let face = self.cache.get(&key)?.as_ref()?;
        Some(face.measure_width(text, font_size))
    }

    fn load_face(&mut self, font_family: &str) -> Option<FontFace> {
        let names: Vec<String> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\'').to_string())
            .filter(|part| !part.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = names
            .iter()
            .map(|name| match name.to_ascii_lowercase().as_str() {
                "serif" => Family::Serif,
                "sans-serif" | "system-ui" | "-apple-system" => Family::SansSerif,
                "monospace" => Family::Monospace,
                _ => Family::Name(name.as_str()),
            })
            .collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        self.db
            .with_face_data(id, |data, index| FontFace::parse(data, index))
            .flatten()
    }
}

/// Advance widths pulled out of a parsed face, in font units.
struct FontFace {
    units_per_em: u16,
    advances: HashMap<char, u16>,
}

impl FontFace {
    fn parse(data: &[u8], index: u32) -> Option<Self> {
        let face = Face::parse(data, index).ok()?;
        let mut advances = HashMap::new();
        for ch in (0x20u8..0x7f).map(char::from).chain(['…']) {
            if let Some(advance) = face
                .glyph_index(ch)
                .and_then(|glyph| face.glyph_hor_advance(glyph))
            {
                advances.insert(ch, advance);
            }
        }
        Some(Self {
            units_per_em: face.units_per_em().max(1),
            advances,
        })
    }

    fn measure_width(&self, text: &str, font_size: f32) -> f32 {
        let scale = font_size / self.units_per_em as f32;
        text.chars()
            .filter(|ch| *ch != '\n')
            .map(|ch| match self.advances.get(&ch) {
                Some(advance) => *advance as f32 * scale,
                None => char_width_factor(ch) * font_size,
            })
            .sum::<f32>()
            .max(0.0)
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_is_linear_in_length_and_size() {
        let m = FixedWidthMeasure::default();
        assert!((m.text_width("abcd", 10.0) - 24.0).abs() < 1e-4);
        assert!((m.text_width("abcd", 20.0) - 48.0).abs() < 1e-4);
        assert_eq!(m.text_width("", 12.0), 0.0);
    }

    #[test]
    fn fallback_width_scales_with_font_size() {
        let w12 = fallback_text_width("Kinase", 12.0);
        let w24 = fallback_text_width("Kinase", 24.0);
        assert!(w12 > 0.0);
        assert!((w24 - w12 * 2.0).abs() < 0.01);
    }

    #[test]
    fn system_measure_is_positive_and_monotonic() {
        let m = SystemFontMeasure::new("sans-serif");
        let short = m.text_width("P53", 12.0);
        let long = m.text_width("P53_tetramer", 12.0);
        assert!(short > 0.0);
        assert!(long > short);
    }
}
