pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, DomainLabelStyle, LayoutConfig, load_config};
pub use error::{Error, Result};
pub use ir::{Marker, ProteinGraphic, Region};
pub use layout::{Layout, MarkerSequence, RenderMarker, auto_width, compute_layout};
pub use parser::{parse_change, parse_changes, parse_graphic, parse_markers_json};
pub use render::render_svg;
pub use text_metrics::{FixedWidthMeasure, FontMeasure, SystemFontMeasure};
pub use theme::{Theme, blend_colors};
