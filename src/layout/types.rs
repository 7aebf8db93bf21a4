use crate::ir::Marker;

/// A surviving marker with everything the renderer needs to draw it.
#[derive(Debug, Clone)]
pub struct RenderMarker {
    pub marker: Marker,
    /// Where the stem meets the backbone.
    pub stem_x: f32,
    pub stem_bottom: f32,
    /// Head centre; `x` differs from `stem_x` when the head was pushed aside.
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub height: f32,
    /// Label text when the label won its collision window.
    pub label: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RegionLayout {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: String,
    pub text: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AxisTick {
    pub position: i64,
    pub x: f32,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct AxisLayout {
    pub y: f32,
    pub x1: f32,
    pub x2: f32,
    pub tick_height: f32,
    pub ticks: Vec<AxisTick>,
}

#[derive(Debug, Clone)]
pub struct BackboneLayout {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    /// Pixels per residue.
    pub scale: f32,
    pub backbone: BackboneLayout,
    pub regions: Vec<RegionLayout>,
    pub markers: Vec<RenderMarker>,
    pub axis: Option<AxisLayout>,
}
