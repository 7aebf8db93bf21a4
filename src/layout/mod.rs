mod markers;
mod sizing;
mod text;
mod types;
mod width;

pub use markers::{MarkerSequence, marker_order};
pub use types::*;
pub use width::{auto_width, inferred_region_width, region_span_fraction};

use crate::config::LayoutConfig;
use crate::ir::{Marker, ProteinGraphic};
use crate::text_metrics::FontMeasure;
use crate::theme::Theme;

use text::fit_label;

const TICK_PRIORITY_START: i64 = 0;
const TICK_PRIORITY_END: i64 = 99;
const TICK_PRIORITY_REGION: i64 = 10;
const TICK_PRIORITY_MARKER: i64 = 5;

/// Lays out one diagram: canvas size, region boxes, resolved and sized
/// markers, and axis ticks.
pub fn compute_layout(
    graphic: &ProteinGraphic,
    markers: Vec<Marker>,
    theme: &Theme,
    config: &LayoutConfig,
    measurer: &dyn FontMeasure,
) -> Layout {
    let length = effective_length(graphic, &markers);
    let width = if config.graphic_width > 0.0 {
        config.graphic_width
    } else {
        auto_width(config, graphic, measurer)
    };
    let scale = (width - config.padding * 2.0).max(1.0) / length;
    let x_of = |position: f32| config.padding + position * scale;

    let survivors = MarkerSequence::new(markers).resolve(config.merge_distance);
    log::debug!(
        "{} markers after collision resolution, scale {scale:.3}px/residue",
        survivors.len()
    );
    let labels = if config.show_labels {
        choose_labels(&survivors, scale, config)
    } else {
        vec![None; survivors.len()]
    };

    let label_extent = |label: &Option<String>| match label {
        Some(text) => measurer.text_width(text, config.label_font_size) + config.text_padding,
        None => 0.0,
    };
    let top_extent = survivors
        .iter()
        .zip(&labels)
        .map(|(marker, label)| {
            marker.height(config) + marker.radius(config) * 2.0 + label_extent(label)
        })
        .fold(0.0_f32, f32::max);

    let domain_top = config.padding + top_extent;
    let backbone_y = domain_top + (config.domain_height - config.backbone_height) / 2.0;

    let mut render_markers = Vec::with_capacity(survivors.len());
    let mut prev_right = f32::NEG_INFINITY;
    for (marker, label) in survivors.into_iter().zip(labels) {
        let radius = marker.radius(config);
        let height = marker.height(config);
        let stem_x = x_of(marker.position as f32);
        let x = stem_x.max(prev_right + config.head_spacing + radius);
        prev_right = x + radius;
        render_markers.push(RenderMarker {
            stem_x,
            stem_bottom: backbone_y,
            x,
            y: backbone_y - height - radius,
            radius,
            height,
            label,
            marker,
        });
    }

    // Pushed heads may run past the right margin; grow the canvas to keep them.
    let overflow = render_markers
        .last()
        .filter(|last| last.x > last.stem_x)
        .map_or(0.0, |last| last.x + last.radius + config.padding - width);
    let width = if overflow > 0.0 {
        log::debug!("widening canvas by {overflow:.1}px for pushed heads");
        width + overflow
    } else {
        width
    };

    let regions = graphic
        .regions
        .iter()
        .enumerate()
        .map(|(idx, region)| {
            let region_width = (region.span() * scale).max(0.0);
            RegionLayout {
                x: x_of(region.start),
                y: domain_top,
                width: region_width,
                height: config.domain_height,
                color: region
                    .color
                    .clone()
                    .unwrap_or_else(|| theme.region_color(idx).to_string()),
                text: region.text.clone(),
                label: fit_label(
                    &region.text,
                    region_width - config.text_padding * 2.0,
                    config.label_font_size,
                    config.domain_label_style,
                    measurer,
                ),
            }
        })
        .collect();

    let axis_y = domain_top + config.domain_height + config.axis_padding;
    let axis = (!config.hide_axis).then(|| AxisLayout {
        y: axis_y,
        x1: x_of(0.0),
        x2: x_of(length),
        tick_height: config.axis_height / 3.0,
        ticks: choose_ticks(graphic, &render_markers, length, scale, config)
            .into_iter()
            .map(|position| AxisTick {
                position,
                x: x_of(position as f32),
                label: position.to_string(),
            })
            .collect(),
    });
    let height = if axis.is_some() {
        axis_y + config.axis_height + config.label_font_size + config.padding
    } else {
        domain_top + config.domain_height + config.padding
    };

    Layout {
        width,
        height,
        scale,
        backbone: BackboneLayout {
            x: x_of(0.0),
            y: backbone_y,
            width: length * scale,
            height: config.backbone_height,
        },
        regions,
        markers: render_markers,
        axis,
    }
}

fn effective_length(graphic: &ProteinGraphic, markers: &[Marker]) -> f32 {
    if graphic.length > 0.0 && graphic.length.is_finite() {
        return graphic.length;
    }
    let furthest = markers
        .iter()
        .map(|marker| marker.position as f32)
        .chain(graphic.regions.iter().map(|region| region.end))
        .fold(1.0_f32, f32::max);
    log::warn!(
        "sequence length {} is not usable, drawing {furthest} residues",
        graphic.length
    );
    furthest
}

/// Labels stand vertically, so each one claims about one line height of
/// axis; within that window only the best marker keeps its label.
fn choose_labels(markers: &[Marker], scale: f32, config: &LayoutConfig) -> Vec<Option<String>> {
    let window = ((config.label_font_size + 2.0) / scale).ceil() as i64;
    let sequence = MarkerSequence::new(markers.to_vec());
    let mut last_shown: Option<i64> = None;
    let mut labels = Vec::with_capacity(markers.len());
    for (idx, marker) in markers.iter().enumerate() {
        let crowded =
            last_shown.is_some_and(|last| marker.position.saturating_sub(last) <= window);
        let beaten = sequence.next_better_or_self(idx, window) != idx;
        if marker.label.is_empty() || crowded || beaten {
            if !marker.label.is_empty() {
                log::debug!("hiding label {:?} at {}", marker.label, marker.position);
            }
            labels.push(None);
            continue;
        }
        last_shown = Some(marker.position);
        labels.push(Some(marker.label.clone()));
    }
    labels
}

fn choose_ticks(
    graphic: &ProteinGraphic,
    markers: &[RenderMarker],
    length: f32,
    scale: f32,
    config: &LayoutConfig,
) -> Vec<i64> {
    let tick = |position: i64, priority: i64| Marker::new(position, priority, "");
    let mut candidates = vec![
        tick(0, TICK_PRIORITY_START),
        tick(length.round() as i64, TICK_PRIORITY_END),
    ];
    for region in &graphic.regions {
        candidates.push(tick(region.start.round() as i64, TICK_PRIORITY_REGION));
        candidates.push(tick(region.end.round() as i64, TICK_PRIORITY_REGION));
    }
    for marker in markers {
        candidates.push(tick(marker.marker.position, TICK_PRIORITY_MARKER));
    }
    let ticks = MarkerSequence::new(candidates).sorted();

    let min_gap = (config.tick_spacing / scale).max(0.0) as i64;
    let mut drawn: Vec<i64> = Vec::new();
    for (idx, candidate) in ticks.iter().enumerate() {
        if let Some(&last) = drawn.last()
            && (candidate.position == last || candidate.position.saturating_sub(last) < min_gap)
        {
            continue;
        }
        if ticks.next_better_or_self(idx, min_gap) != idx {
            continue;
        }
        drawn.push(candidate.position);
    }
    drawn
}
