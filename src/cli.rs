use crate::config::{Config, DomainLabelStyle, load_config};
use crate::ir::{Marker, ProteinGraphic};
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::parser::{parse_changes, parse_graphic, parse_markers_json};
use crate::render::{render_svg, write_output_svg};
use crate::text_metrics::{FixedWidthMeasure, FontMeasure, SystemFontMeasure};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "lollipops", version, about = "Lollipop diagrams of protein changes")]
pub struct Args {
    /// Changes to plot, e.g. R273C R175H@5 G245S#00ff00
    pub changes: Vec<String>,

    /// Protein graphic JSON (length + regions) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Sequence length when no graphic is given
    #[arg(short = 'l', long = "length", conflicts_with = "input")]
    pub length: Option<f32>,

    /// JSON array of marker records
    #[arg(short = 'm', long = "markers")]
    pub markers: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Write the computed layout as JSON
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// Fixed canvas width (0 estimates it from the region labels)
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Output resolution
    #[arg(long = "dpi")]
    pub dpi: Option<f32>,

    /// Draw change labels above the lollipops
    #[arg(long = "labels")]
    pub labels: bool,

    /// Hide the residue axis
    #[arg(long = "no-axis")]
    pub no_axis: bool,

    /// How to label regions that do not fit their box
    #[arg(long = "domain-labels", value_enum)]
    pub domain_labels: Option<DomainLabelArg>,

    /// Fold lower-priority markers within this many residues
    #[arg(long = "merge-distance")]
    pub merge_distance: Option<i64>,

    /// Measure text with a fixed per-character width instead of system fonts
    #[arg(long = "fast-text-metrics")]
    pub fast_text_metrics: bool,

    /// Log layout decisions
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum DomainLabelArg {
    Off,
    Truncated,
    Fit,
}

impl From<DomainLabelArg> for DomainLabelStyle {
    fn from(arg: DomainLabelArg) -> Self {
        match arg {
            DomainLabelArg::Off => DomainLabelStyle::Off,
            DomainLabelArg::Truncated => DomainLabelStyle::Truncated,
            DomainLabelArg::Fit => DomainLabelStyle::Fit,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, &args);

    let graphic = match args.length {
        Some(length) => ProteinGraphic::new(length),
        None => {
            let text = read_input(args.input.as_deref())?;
            parse_graphic(&text).context("reading protein graphic")?
        }
    };

    let mut markers: Vec<Marker> = Vec::new();
    if let Some(path) = args.markers.as_deref() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        markers.extend(parse_markers_json(&text)?);
    }
    markers.extend(parse_changes(&args.changes, &config.theme)?);
    log::info!(
        "{} markers over {} residues, {} regions",
        markers.len(),
        graphic.length,
        graphic.regions.len()
    );

    let measurer: Box<dyn FontMeasure> = if args.fast_text_metrics {
        Box::new(FixedWidthMeasure::default())
    } else {
        Box::new(SystemFontMeasure::new(config.theme.font_family.clone()))
    };
    let layout = compute_layout(
        &graphic,
        markers,
        &config.theme,
        &config.layout,
        measurer.as_ref(),
    );
    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &layout)?;
    }

    let svg = render_svg(&layout, &config.theme, &config.layout);
    match args.output_format {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref())?,
        OutputFormat::Png => write_png(&svg, args.output.as_deref(), &config)?,
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn apply_overrides(config: &mut Config, args: &Args) {
    let layout = &mut config.layout;
    if let Some(width) = args.width {
        layout.graphic_width = width.max(0.0);
    }
    if let Some(dpi) = args.dpi {
        layout.dpi = dpi;
    }
    if args.labels {
        layout.show_labels = true;
    }
    if args.no_axis {
        layout.hide_axis = true;
    }
    if let Some(style) = args.domain_labels {
        layout.domain_label_style = style.into();
    }
    if let Some(distance) = args.merge_distance {
        layout.merge_distance = distance.max(0);
    }
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: Option<&Path>, config: &Config) -> Result<()> {
    let output = output.ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
    crate::render::write_output_png(svg, output, &config.theme.font_family)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: Option<&Path>, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
