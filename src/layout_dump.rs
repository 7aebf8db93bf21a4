use crate::layout::Layout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    pub markers: Vec<MarkerDump>,
    pub regions: Vec<RegionDump>,
    pub ticks: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct MarkerDump {
    pub position: i64,
    pub priority: i64,
    pub count: u32,
    pub color: String,
    pub text: String,
    pub stem_x: f32,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub height: f32,
    pub label: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegionDump {
    pub text: String,
    pub x: f32,
    pub width: f32,
    pub color: String,
    pub label: Option<String>,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let markers = layout
            .markers
            .iter()
            .map(|m| MarkerDump {
                position: m.marker.position,
                priority: m.marker.priority,
                count: m.marker.count,
                color: m.marker.color.clone(),
                text: m.marker.label.clone(),
                stem_x: m.stem_x,
                x: m.x,
                y: m.y,
                radius: m.radius,
                height: m.height,
                label: m.label.clone(),
            })
            .collect();

        let regions = layout
            .regions
            .iter()
            .map(|r| RegionDump {
                text: r.text.clone(),
                x: r.x,
                width: r.width,
                color: r.color.clone(),
                label: r.label.clone(),
            })
            .collect();

        let ticks = layout
            .axis
            .as_ref()
            .map(|axis| axis.ticks.iter().map(|t| t.position).collect())
            .unwrap_or_default();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            scale: layout.scale,
            markers,
            regions,
            ticks,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
