use crate::config::DomainLabelStyle;
use crate::text_metrics::FontMeasure;

const ELLIPSIS: char = '…';

/// Label to draw inside a box `max_width` wide, per `style`.
pub(super) fn fit_label(
    text: &str,
    max_width: f32,
    font_size: f32,
    style: DomainLabelStyle,
    measurer: &dyn FontMeasure,
) -> Option<String> {
    let text = text.trim();
    if text.is_empty() || style == DomainLabelStyle::Off || max_width <= 0.0 {
        return None;
    }
    if measurer.text_width(text, font_size) <= max_width {
        return Some(text.to_string());
    }
    if style == DomainLabelStyle::Fit {
        return None;
    }

    let chars: Vec<char> = text.chars().collect();
    for keep in (1..chars.len()).rev() {
        let mut candidate: String = chars[..keep].iter().collect();
        candidate = candidate.trim_end().to_string();
        candidate.push(ELLIPSIS);
        if measurer.text_width(&candidate, font_size) <= max_width {
            return Some(candidate);
        }
    }
    None
}
