use serde::{Deserialize, Serialize};

/// One annotated position on the sequence axis, as read from input.
///
/// Markers are plain input records; everything derived for drawing lives in
/// [`crate::layout::RenderMarker`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// 1-based residue index. Several markers may share a position.
    pub position: i64,
    /// Higher wins when two markers compete for the same space.
    #[serde(default)]
    pub priority: i64,
    /// Number of observations collapsed into this marker.
    #[serde(default = "default_count")]
    pub count: u32,
    /// Drives the stem height.
    #[serde(default, rename = "height")]
    pub height_value: i64,
    pub color: String,
    #[serde(default)]
    pub label: String,
}

fn default_count() -> u32 {
    1
}

impl Marker {
    pub fn new(position: i64, priority: i64, color: impl Into<String>) -> Self {
        Self {
            position,
            priority,
            count: 1,
            height_value: 0,
            color: color.into(),
            label: String::new(),
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_height(mut self, height_value: i64) -> Self {
        self.height_value = height_value;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// A domain or region box drawn along the backbone.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub start: f32,
    pub end: f32,
    pub text: String,
    pub color: Option<String>,
}

impl Region {
    pub fn span(&self) -> f32 {
        self.end - self.start
    }
}

/// Sequence length plus its regions, the shape of a Pfam graphic.
#[derive(Debug, Clone, PartialEq)]
pub struct ProteinGraphic {
    pub length: f32,
    pub regions: Vec<Region>,
}

impl ProteinGraphic {
    pub fn new(length: f32) -> Self {
        Self {
            length,
            regions: Vec::new(),
        }
    }

    pub fn with_region(mut self, start: f32, end: f32, text: impl Into<String>) -> Self {
        self.regions.push(Region {
            start,
            end,
            text: text.into(),
            color: None,
        });
        self
    }
}
