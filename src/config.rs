use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DomainLabelStyle {
    Off,
    #[default]
    Truncated,
    Fit,
}

impl DomainLabelStyle {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Some(Self::Off),
            "truncated" | "truncate" => Some(Self::Truncated),
            "fit" => Some(Self::Fit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Fixed canvas width; `0.0` means estimate it from the region labels.
    pub graphic_width: f32,
    /// Smallest auto width, in 72-dpi units.
    pub base_width: f32,
    /// Output resolution. `0.0` keeps the 72-dpi base unit.
    pub dpi: f32,
    pub padding: f32,
    pub text_padding: f32,
    pub lollipop_radius: f32,
    pub lollipop_height: f32,
    pub backbone_height: f32,
    pub domain_height: f32,
    pub axis_padding: f32,
    pub axis_height: f32,
    pub label_font_size: f32,
    pub show_labels: bool,
    pub hide_axis: bool,
    pub domain_label_style: DomainLabelStyle,
    /// Residues within which a lower-priority marker folds into a better one.
    pub merge_distance: i64,
    /// Horizontal gap kept between neighbouring heads.
    pub head_spacing: f32,
    /// Minimum on-screen distance between two drawn axis tick labels.
    pub tick_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            graphic_width: 0.0,
            base_width: 400.0,
            dpi: 0.0,
            padding: 15.0,
            text_padding: 5.0,
            lollipop_radius: 4.0,
            lollipop_height: 28.0,
            backbone_height: 14.0,
            domain_height: 24.0,
            axis_padding: 10.0,
            axis_height: 15.0,
            label_font_size: 12.0,
            show_labels: false,
            hide_axis: false,
            domain_label_style: DomainLabelStyle::Truncated,
            merge_distance: 0,
            head_spacing: 1.0,
            tick_spacing: 20.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::lollipops_default(),
            layout: LayoutConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f32),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().parse::<f32>().ok(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    text_color: Option<String>,
    axis_color: Option<String>,
    backbone_color: Option<String>,
    stem_color: Option<String>,
    head_stroke_color: Option<String>,
    mutation_color: Option<String>,
    synonymous_color: Option<String>,
    region_label_color: Option<String>,
    region_palette: Option<Vec<String>>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    graphic_width: Option<NumberOrString>,
    base_width: Option<NumberOrString>,
    dpi: Option<NumberOrString>,
    padding: Option<NumberOrString>,
    text_padding: Option<NumberOrString>,
    lollipop_radius: Option<NumberOrString>,
    lollipop_height: Option<NumberOrString>,
    backbone_height: Option<NumberOrString>,
    domain_height: Option<NumberOrString>,
    axis_padding: Option<NumberOrString>,
    axis_height: Option<NumberOrString>,
    label_font_size: Option<NumberOrString>,
    show_labels: Option<bool>,
    hide_axis: Option<bool>,
    domain_label_style: Option<String>,
    merge_distance: Option<i64>,
    head_spacing: Option<NumberOrString>,
    tick_spacing: Option<NumberOrString>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "default" | "base" | "lollipops" => config.theme = Theme::lollipops_default(),
            other => log::warn!("unknown theme {other:?}, keeping the default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        apply_theme_variables(&mut config, vars);
    }

    if let Some(layout) = parsed.layout {
        apply_layout_overrides(&mut config.layout, layout)?;
    }

    Ok(config)
}

fn apply_theme_variables(config: &mut Config, vars: ThemeVariables) {
    let theme = &mut config.theme;
    if let Some(v) = vars.font_family {
        theme.font_family = v;
    }
    if let Some(v) = vars.text_color {
        theme.text_color = v;
    }
    if let Some(v) = vars.axis_color {
        theme.axis_color = v;
    }
    if let Some(v) = vars.backbone_color {
        theme.backbone_color = v;
    }
    if let Some(v) = vars.stem_color {
        theme.stem_color = v;
    }
    if let Some(v) = vars.head_stroke_color {
        theme.head_stroke_color = v;
    }
    if let Some(v) = vars.mutation_color {
        theme.mutation_color = v;
    }
    if let Some(v) = vars.synonymous_color {
        theme.synonymous_color = v;
    }
    if let Some(v) = vars.region_label_color {
        theme.region_label_color = v;
    }
    if let Some(v) = vars.region_palette {
        theme.region_palette = v;
    }
    if let Some(v) = vars.background {
        theme.background = v;
    }
}

fn apply_layout_overrides(layout: &mut LayoutConfig, file: LayoutConfigFile) -> anyhow::Result<()> {
    let numeric = [
        (file.graphic_width, &mut layout.graphic_width),
        (file.base_width, &mut layout.base_width),
        (file.dpi, &mut layout.dpi),
        (file.padding, &mut layout.padding),
        (file.text_padding, &mut layout.text_padding),
        (file.lollipop_radius, &mut layout.lollipop_radius),
        (file.lollipop_height, &mut layout.lollipop_height),
        (file.backbone_height, &mut layout.backbone_height),
        (file.domain_height, &mut layout.domain_height),
        (file.axis_padding, &mut layout.axis_padding),
        (file.axis_height, &mut layout.axis_height),
        (file.label_font_size, &mut layout.label_font_size),
        (file.head_spacing, &mut layout.head_spacing),
        (file.tick_spacing, &mut layout.tick_spacing),
    ];
    for (value, slot) in numeric {
        let Some(value) = value else { continue };
        match value.as_f32() {
            Some(parsed) => *slot = parsed,
            None => log::warn!("ignoring non-numeric layout value {value:?}"),
        }
    }
    if let Some(v) = file.show_labels {
        layout.show_labels = v;
    }
    if let Some(v) = file.hide_axis {
        layout.hide_axis = v;
    }
    if let Some(v) = file.merge_distance {
        layout.merge_distance = v.max(0);
    }
    if let Some(v) = file.domain_label_style {
        layout.domain_label_style = DomainLabelStyle::from_token(&v)
            .ok_or_else(|| anyhow::anyhow!("unknown domainLabelStyle {v:?}"))?;
    }
    Ok(())
}
