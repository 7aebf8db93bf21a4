use crate::config::LayoutConfig;
use crate::layout::{Layout, RenderMarker};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(layout: &Layout, theme: &Theme, config: &LayoutConfig) -> String {
    let mut svg = String::new();
    let width = layout.width.max(1.0);
    let height = layout.height.max(1.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    for marker in &layout.markers {
        push_stem(&mut svg, marker, theme);
    }

    let backbone = &layout.backbone;
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>",
        backbone.x, backbone.y, backbone.width, backbone.height, theme.backbone_color
    ));

    for region in &layout.regions {
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"2\" ry=\"2\" fill=\"{}\"><title>{}</title></rect>",
            region.x,
            region.y,
            region.width,
            region.height,
            region.color,
            escape_xml(&region.text)
        ));
        if let Some(label) = &region.label {
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                region.x + region.width / 2.0,
                region.y + region.height / 2.0,
                escape_xml(&theme.font_family),
                config.label_font_size,
                theme.region_label_color,
                escape_xml(label)
            ));
        }
    }

    for marker in &layout.markers {
        push_head(&mut svg, marker, theme, config);
    }

    if let Some(axis) = &layout.axis {
        svg.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
            axis.x1, axis.y, axis.x2, axis.y, theme.axis_color
        ));
        for tick in &axis.ticks {
            svg.push_str(&format!(
                "<line x1=\"{x:.2}\" y1=\"{:.2}\" x2=\"{x:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
                axis.y,
                axis.y + axis.tick_height,
                theme.axis_color,
                x = tick.x
            ));
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"hanging\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                tick.x,
                axis.y + axis.tick_height + 2.0,
                escape_xml(&theme.font_family),
                config.label_font_size * 0.8,
                theme.text_color,
                escape_xml(&tick.label)
            ));
        }
    }

    svg.push_str("</svg>");
    svg
}

fn push_stem(svg: &mut String, marker: &RenderMarker, theme: &Theme) {
    let top = marker.y + marker.radius;
    // Heads pushed aside bend just below the head.
    let points = if (marker.x - marker.stem_x).abs() < 0.01 {
        format!(
            "{:.2},{:.2} {:.2},{:.2}",
            marker.stem_x, marker.stem_bottom, marker.x, top
        )
    } else {
        let bend = top + (marker.stem_bottom - top) * 0.3;
        format!(
            "{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}",
            marker.stem_x, marker.stem_bottom, marker.stem_x, bend, marker.x, top
        )
    };
    svg.push_str(&format!(
        "<polyline points=\"{points}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\"/>",
        theme.stem_color
    ));
}

fn push_head(svg: &mut String, marker: &RenderMarker, theme: &Theme, config: &LayoutConfig) {
    let title = if marker.marker.label.is_empty() {
        format!("{} ({})", marker.marker.position, marker.marker.count)
    } else {
        format!("{} ({})", marker.marker.label, marker.marker.count)
    };
    svg.push_str(&format!(
        "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"><title>{}</title></circle>",
        marker.x,
        marker.y,
        marker.radius,
        marker.marker.color,
        theme.head_stroke_color,
        escape_xml(&title)
    ));
    if let Some(label) = &marker.label {
        let y = marker.y - marker.radius - config.text_padding;
        svg.push_str(&format!(
            "<text x=\"{x:.2}\" y=\"{y:.2}\" transform=\"rotate(-90 {x:.2} {y:.2})\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            escape_xml(&theme.font_family),
            config.label_font_size,
            theme.text_color,
            escape_xml(label),
            x = marker.x,
            y = y
        ));
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

/// Rasterizes one output pixel per SVG unit. Resolution is already part of
/// the layout through `LayoutConfig::dpi`, so no extra zoom is applied here.
#[cfg(feature = "png")]
pub fn rasterize_svg(svg: &str, font_family: &str) -> Result<resvg::tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    opt.font_family = font_family
        .split(',')
        .next()
        .map(|name| name.trim().trim_matches('"').to_string())
        .unwrap_or_else(|| "Helvetica".to_string());
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::default(),
        &mut pixmap_mut,
    );
    Ok(pixmap)
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, font_family: &str) -> Result<()> {
    rasterize_svg(svg, font_family)?.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Marker, ProteinGraphic};
    use crate::layout::compute_layout;
    use crate::text_metrics::FixedWidthMeasure;

    fn render(config: &LayoutConfig, markers: Vec<Marker>) -> String {
        let graphic = ProteinGraphic::new(393.0)
            .with_region(102.0, 292.0, "P53 <DNA>")
            .with_region(319.0, 357.0, "P53_tetramer");
        let theme = Theme::default();
        let layout = compute_layout(
            &graphic,
            markers,
            &theme,
            config,
            &FixedWidthMeasure::default(),
        );
        render_svg(&layout, &theme, config)
    }

    #[test]
    fn render_svg_basic() {
        let svg = render(
            &LayoutConfig::default(),
            vec![Marker::new(273, 0, "#FF5555").with_count(4)],
        );
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("<circle"));
        assert!(svg.contains("fill=\"#FF5555\""));
        assert!(svg.contains("P53 &lt;DNA&gt;"));
        assert!(!svg.contains("<DNA>"));
    }

    #[test]
    fn labels_are_rotated_when_enabled() {
        let config = LayoutConfig {
            show_labels: true,
            ..LayoutConfig::default()
        };
        let svg = render(&config, vec![Marker::new(175, 0, "#FF5555").with_label("R175H")]);
        assert!(svg.contains("rotate(-90"));
        assert!(svg.contains(">R175H</text>"));
    }

    #[test]
    fn axis_can_be_hidden() {
        let config = LayoutConfig {
            hide_axis: true,
            ..LayoutConfig::default()
        };
        let svg = render(&config, Vec::new());
        assert!(!svg.contains("<line"));
    }

    #[cfg(feature = "png")]
    #[test]
    fn png_matches_layout_size_at_any_dpi() {
        let config = LayoutConfig {
            dpi: 144.0,
            hide_axis: true,
            ..LayoutConfig::default()
        };
        let graphic = ProteinGraphic::new(393.0);
        let theme = Theme::default();
        let layout = compute_layout(
            &graphic,
            vec![Marker::new(273, 0, "#FF5555")],
            &theme,
            &config,
            &FixedWidthMeasure::default(),
        );
        assert_eq!(layout.width, 400.0 * 2.0 + 30.0);
        let svg = render_svg(&layout, &theme, &config);
        let pixmap = rasterize_svg(&svg, &theme.font_family).unwrap();
        assert_eq!(pixmap.width(), layout.width.ceil() as u32);
        assert_eq!(pixmap.height(), layout.height.ceil() as u32);
    }
}
