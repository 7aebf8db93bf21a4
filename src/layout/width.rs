use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::ir::{ProteinGraphic, Region};
use crate::text_metrics::FontMeasure;

/// Fraction of the sequence a region covers, or `DegenerateRegionSpan` when
/// that fraction is not a positive finite number.
pub fn region_span_fraction(region: &Region, length: f32) -> Result<f32> {
    let fraction = region.span() / length;
    if length <= 0.0 || !fraction.is_finite() || fraction <= 0.0 {
        return Err(Error::DegenerateRegionSpan {
            start: region.start,
            end: region.end,
            length,
        });
    }
    Ok(fraction)
}

/// Width the whole canvas needs so `region`'s label fits inside its box.
pub fn inferred_region_width(
    region: &Region,
    length: f32,
    config: &LayoutConfig,
    measurer: &dyn FontMeasure,
) -> Result<f32> {
    let fraction = region_span_fraction(region, length)?;
    let text_width = measurer.text_width(&region.text, config.label_font_size);
    let needed = text_width + config.text_padding * 2.0 + 1.0;
    Ok(needed / fraction)
}

/// Smallest canvas width that fits every region label inside its region.
pub fn auto_width(
    config: &LayoutConfig,
    graphic: &ProteinGraphic,
    measurer: &dyn FontMeasure,
) -> f32 {
    let mut width = config.base_width;
    if config.dpi != 0.0 {
        width *= config.dpi / 72.0;
    }

    for region in &graphic.regions {
        match inferred_region_width(region, graphic.length, config, measurer) {
            Ok(inferred) => width = width.max(inferred),
            Err(err) => log::debug!("skipping {:?} for width estimate: {err}", region.text),
        }
    }

    let width = width + config.padding * 2.0;
    log::debug!("auto width {width:.1} for {} regions", graphic.regions.len());
    width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_metrics::FixedWidthMeasure;

    fn measure() -> FixedWidthMeasure {
        FixedWidthMeasure {
            char_width_factor: 0.5,
        }
    }

    fn floor(config: &LayoutConfig) -> f32 {
        config.base_width + config.padding * 2.0
    }

    #[test]
    fn no_regions_returns_base_plus_padding() {
        let config = LayoutConfig::default();
        let graphic = ProteinGraphic::new(393.0);
        assert_eq!(auto_width(&config, &graphic, &measure()), floor(&config));
    }

    #[test]
    fn dpi_scales_base_width() {
        let config = LayoutConfig {
            dpi: 144.0,
            ..LayoutConfig::default()
        };
        let graphic = ProteinGraphic::new(393.0);
        let expected = config.base_width * 2.0 + config.padding * 2.0;
        assert_eq!(auto_width(&config, &graphic, &measure()), expected);
    }

    #[test]
    fn full_span_short_label_keeps_base() {
        let config = LayoutConfig::default();
        let graphic = ProteinGraphic::new(100.0).with_region(0.0, 100.0, "P53");
        assert_eq!(auto_width(&config, &graphic, &measure()), floor(&config));
    }

    #[test]
    fn long_label_in_tiny_span_drives_width() {
        let config = LayoutConfig::default();
        let text = "A_very_long_domain_name_indeed";
        let graphic = ProteinGraphic::new(1000.0).with_region(10.0, 20.0, text);
        let width = auto_width(&config, &graphic, &measure());

        let text_width = text.chars().count() as f32 * config.label_font_size * 0.5;
        let needed = text_width + config.text_padding * 2.0 + 1.0;
        let inferred = needed / 0.01;
        assert!((width - (inferred + config.padding * 2.0)).abs() < 0.5);
        // The region's share of the canvas is exactly what its label needs.
        let canvas = width - config.padding * 2.0;
        assert!((canvas * 0.01 - needed).abs() < 0.01);
    }

    #[test]
    fn width_grows_with_label_length() {
        let config = LayoutConfig::default();
        let mut prev = 0.0;
        for len in [1usize, 10, 40, 80, 160] {
            let graphic = ProteinGraphic::new(500.0).with_region(100.0, 150.0, "x".repeat(len));
            let width = auto_width(&config, &graphic, &measure());
            assert!(width >= prev);
            assert!(width >= floor(&config));
            prev = width;
        }
    }

    #[test]
    fn width_grows_with_padding() {
        let graphic = ProteinGraphic::new(500.0).with_region(100.0, 110.0, "Kinase");
        let narrow = auto_width(&LayoutConfig::default(), &graphic, &measure());
        let config = LayoutConfig {
            text_padding: 20.0,
            padding: 30.0,
            ..LayoutConfig::default()
        };
        assert!(auto_width(&config, &graphic, &measure()) > narrow);
    }

    #[test]
    fn degenerate_regions_are_ignored() {
        let config = LayoutConfig::default();
        let graphic = ProteinGraphic::new(500.0)
            .with_region(40.0, 40.0, "zero")
            .with_region(60.0, 50.0, "backwards");
        let width = auto_width(&config, &graphic, &measure());
        assert!(width.is_finite());
        assert_eq!(width, floor(&config));

        let zero_length = ProteinGraphic::new(0.0).with_region(0.0, 10.0, "any");
        assert_eq!(auto_width(&config, &zero_length, &measure()), floor(&config));
    }

    #[test]
    fn span_fraction_reports_degenerate_region() {
        let region = Region {
            start: 5.0,
            end: 5.0,
            text: "Z".to_string(),
            color: None,
        };
        assert!(matches!(
            region_span_fraction(&region, 100.0),
            Err(Error::DegenerateRegionSpan { .. })
        ));
    }
}
