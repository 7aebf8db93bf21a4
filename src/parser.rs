use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::ir::{Marker, ProteinGraphic, Region};
use crate::theme::{Theme, parse_hex_color};

// Reference residues, position, alternate residues: `R273C`, `*214R`, `E55fs`.
// Unanchored: the first position found wins, so `p.R273C` and `R273_S274del`
// both land on 273.
static CHANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z*]*)([0-9]+)([A-Za-z*]*)").unwrap());

/// Parses a change string such as `R273C`, `R175H@5` or `G12D#00ff00@3`.
///
/// `index` is the string's place in the input; earlier changes get higher
/// priority so they win ties at the same position.
pub fn parse_change(input: &str, index: usize, theme: &Theme) -> Result<Marker> {
    let invalid = |reason: &str| Error::InvalidChange {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let mut rest = input.trim();
    let mut count = 1u32;
    if let Some((head, tail)) = rest.split_once('@') {
        count = tail
            .trim()
            .parse()
            .map_err(|_| invalid("count after '@' is not a non-negative integer"))?;
        rest = head;
    }
    let mut color = None;
    if let Some((head, tail)) = rest.split_once('#') {
        let candidate = format!("#{}", tail.trim());
        parse_hex_color(&candidate)?;
        color = Some(candidate);
        rest = head;
    }

    let caps = CHANGE_RE
        .captures(rest.trim())
        .ok_or_else(|| invalid("no residue position found"))?;
    let position: i64 = caps[2]
        .parse()
        .map_err(|_| invalid("position out of range"))?;
    let reference = &caps[1];
    let alternate = &caps[3];
    let synonymous = !reference.is_empty() && reference.eq_ignore_ascii_case(alternate);
    let color = color.unwrap_or_else(|| {
        if synonymous {
            theme.synonymous_color.clone()
        } else {
            theme.mutation_color.clone()
        }
    });

    Ok(Marker {
        position,
        priority: -(index as i64),
        count,
        height_value: 0,
        color,
        label: rest.trim().to_string(),
    })
}

pub fn parse_changes<I, S>(inputs: I, theme: &Theme) -> Result<Vec<Marker>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    inputs
        .into_iter()
        .enumerate()
        .filter(|(_, text)| !text.as_ref().trim().is_empty())
        .map(|(idx, text)| parse_change(text.as_ref(), idx, theme))
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val as f32),
            NumberOrString::String(val) => val.trim().parse::<f32>().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphicFile {
    length: Option<NumberOrString>,
    #[serde(default)]
    regions: Vec<RegionFile>,
}

#[derive(Debug, Deserialize)]
struct RegionFile {
    start: NumberOrString,
    end: NumberOrString,
    #[serde(default)]
    text: String,
    #[serde(default)]
    colour: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

/// Reads a Pfam-graphic style JSON object: `{"length": .., "regions": [..]}`.
pub fn parse_graphic(input: &str) -> Result<ProteinGraphic> {
    let file: GraphicFile = serde_json::from_str(input)?;
    let length = file
        .length
        .as_ref()
        .ok_or_else(|| Error::InvalidGraphic("missing length".to_string()))?
        .as_f32()
        .ok_or_else(|| Error::InvalidGraphic("length is not numeric".to_string()))?;

    let mut regions = Vec::with_capacity(file.regions.len());
    for (idx, region) in file.regions.into_iter().enumerate() {
        let bound = |value: &NumberOrString, name: &str| {
            value.as_f32().ok_or_else(|| {
                Error::InvalidGraphic(format!("region {idx} has a non-numeric {name}"))
            })
        };
        regions.push(Region {
            start: bound(&region.start, "start")?,
            end: bound(&region.end, "end")?,
            text: region.text,
            color: region.color.or(region.colour),
        });
    }

    Ok(ProteinGraphic { length, regions })
}

/// Reads a JSON array of marker records.
pub fn parse_markers_json(input: &str) -> Result<Vec<Marker>> {
    let markers: Vec<Marker> = serde_json::from_str(input)?;
    for marker in &markers {
        parse_hex_color(&marker.color)?;
    }
    Ok(markers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_missense_change_uses_mutation_color() {
        let theme = Theme::lollipops_default();
        let marker = parse_change("R273C", 0, &theme).unwrap();
        assert_eq!(marker.position, 273);
        assert_eq!(marker.count, 1);
        assert_eq!(marker.priority, 0);
        assert_eq!(marker.color, theme.mutation_color);
        assert_eq!(marker.label, "R273C");
    }

    #[test]
    fn synonymous_change_uses_synonymous_color() {
        let theme = Theme::lollipops_default();
        let marker = parse_change("p72p", 3, &theme).unwrap();
        assert_eq!(marker.color, theme.synonymous_color);
        assert_eq!(marker.priority, -3);
    }

    #[test]
    fn hgvs_style_changes_use_first_position() {
        let theme = Theme::lollipops_default();
        let marker = parse_change("p.R273C", 0, &theme).unwrap();
        assert_eq!(marker.position, 273);
        assert_eq!(marker.label, "p.R273C");
        assert_eq!(marker.color, theme.mutation_color);

        let frameshift = parse_change("P72fs*4", 1, &theme).unwrap();
        assert_eq!(frameshift.position, 72);
        assert_eq!(frameshift.color, theme.mutation_color);

        let deletion = parse_change("R273_S274del@2", 2, &theme).unwrap();
        assert_eq!(deletion.position, 273);
        assert_eq!(deletion.count, 2);
        assert_eq!(deletion.label, "R273_S274del");

        let synonymous = parse_change("p.P72P", 3, &theme).unwrap();
        assert_eq!(synonymous.color, theme.synonymous_color);
    }

    #[test]
    fn count_and_color_suffixes_are_parsed() {
        let theme = Theme::lollipops_default();
        let marker = parse_change("R248Q#ff00ff@131", 1, &theme).unwrap();
        assert_eq!(marker.position, 248);
        assert_eq!(marker.count, 131);
        assert_eq!(marker.color, "#ff00ff");
        assert_eq!(marker.label, "R248Q");
    }

    #[test]
    fn bad_changes_are_rejected() {
        let theme = Theme::lollipops_default();
        assert!(matches!(
            parse_change("RC", 0, &theme),
            Err(Error::InvalidChange { .. })
        ));
        assert!(matches!(
            parse_change("R12C@many", 0, &theme),
            Err(Error::InvalidChange { .. })
        ));
        assert!(matches!(
            parse_change("R12C#zz0000", 0, &theme),
            Err(Error::MalformedColor { .. })
        ));
    }

    #[test]
    fn parse_changes_skips_blank_entries_but_keeps_indices() {
        let theme = Theme::lollipops_default();
        let markers = parse_changes(["A1B", "", "C3D"], &theme).unwrap();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[1].priority, -2);
    }

    #[test]
    fn graphic_accepts_string_numbers() {
        let graphic = parse_graphic(
            r##"{
                "length": "393",
                "regions": [
                    {"start": "102", "end": 292, "text": "P53", "colour": "#2dcf00"},
                    {"start": 319, "end": "357", "text": "P53_tetramer"}
                ],
                "markups": []
            }"##,
        )
        .unwrap();
        assert_eq!(graphic.length, 393.0);
        assert_eq!(graphic.regions.len(), 2);
        assert_eq!(graphic.regions[0].start, 102.0);
        assert_eq!(graphic.regions[0].color.as_deref(), Some("#2dcf00"));
        assert_eq!(graphic.regions[1].end, 357.0);
    }

    #[test]
    fn graphic_without_length_is_invalid() {
        let err = parse_graphic(r#"{"regions": []}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidGraphic(_)));
    }

    #[test]
    fn markers_json_fills_defaults() {
        let markers = parse_markers_json(
            r##"[{"position": 12, "color": "#FF0000"}, {"position": 5, "priority": 2, "count": 7, "height": 9, "color": "#00FF00", "label": "x"}]"##,
        )
        .unwrap();
        assert_eq!(markers[0].count, 1);
        assert_eq!(markers[0].height_value, 0);
        assert_eq!(markers[1].count, 7);
        assert_eq!(markers[1].height_value, 9);
    }
}
