#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed color {input:?}: expected #RRGGBB")]
    MalformedColor { input: String },
    #[error("region {start}..{end} has no positive span on a sequence of length {length}")]
    DegenerateRegionSpan { start: f32, end: f32, length: f32 },
    #[error("cannot parse change {input:?}: {reason}")]
    InvalidChange { input: String, reason: String },
    #[error("invalid protein graphic: {0}")]
    InvalidGraphic(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
