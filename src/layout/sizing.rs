use crate::config::LayoutConfig;
use crate::ir::Marker;

impl Marker {
    /// Head radius. Singletons get the configured radius; larger counts grow
    /// as `sqrt(ln(2 + count)) * radius`.
    pub fn radius(&self, config: &LayoutConfig) -> f32 {
        let base = config.lollipop_radius;
        if self.count <= 1 {
            return base;
        }
        ((2.0 + self.count as f64).ln() * (base as f64) * (base as f64)).sqrt() as f32
    }

    /// Stem height, linear in `height_value` above the configured floor.
    pub fn height(&self, config: &LayoutConfig) -> f32 {
        let base = config.lollipop_height;
        if self.height_value <= 1 {
            return base;
        }
        base + self.height_value as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(count: u32, height_value: i64) -> Marker {
        Marker::new(10, 0, "#FF0000")
            .with_count(count)
            .with_height(height_value)
    }

    #[test]
    fn small_counts_use_base_radius() {
        let config = LayoutConfig::default();
        for count in [0, 1] {
            assert_eq!(marker(count, 0).radius(&config), config.lollipop_radius);
        }
    }

    #[test]
    fn radius_follows_log_curve() {
        let config = LayoutConfig::default();
        let r = marker(5, 0).radius(&config);
        let expected = (7.0f32.ln() * 16.0).sqrt();
        assert!((r - expected).abs() < 1e-4, "{r} vs {expected}");
    }

    #[test]
    fn radius_strictly_increases_above_one() {
        let config = LayoutConfig::default();
        let mut prev = marker(1, 0).radius(&config);
        for count in [2, 3, 10, 200, 10_000] {
            let r = marker(count, 0).radius(&config);
            assert!(r > prev, "radius({count}) = {r} not above {prev}");
            prev = r;
        }
    }

    #[test]
    fn small_heights_use_base_height() {
        let config = LayoutConfig::default();
        for value in [-5, 0, 1] {
            assert_eq!(marker(1, value).height(&config), config.lollipop_height);
        }
    }

    #[test]
    fn height_is_additive_above_one() {
        let config = LayoutConfig::default();
        assert_eq!(marker(1, 2).height(&config), config.lollipop_height + 2.0);
        assert_eq!(marker(1, 40).height(&config), config.lollipop_height + 40.0);
        assert!(marker(1, 3).height(&config) > marker(1, 2).height(&config));
    }
}
