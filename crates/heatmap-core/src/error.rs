use thiserror::Error;

/// Errors raised while parsing the dataset or laying out the heatmap
#[derive(Error, Debug)]
pub enum HeatmapError {
    /// Response body was not the expected JSON shape
    #[error("Failed to parse dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Month index outside 0..=11
    #[error("Invalid month index {month} for year {year}")]
    InvalidMonth { year: i32, month: u32 },

    /// Nothing to draw
    #[error("Dataset contains no monthly variance entries")]
    EmptyDataset,

    /// Margins leave no drawable area
    #[error("Invalid dimensions {width}x{height}: no drawable area left after margins")]
    InvalidDimensions { width: f64, height: f64 },

    /// Color string was not `#rrggbb`
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Bucket threshold is NaN or infinite
    #[error("Palette threshold must be finite (bucket {index}: {threshold})")]
    NonFiniteThreshold { index: usize, threshold: f64 },

    /// Bucket thresholds must be strictly increasing
    #[error("Palette thresholds must be strictly increasing (bucket {index}: {threshold})")]
    UnorderedPalette { index: usize, threshold: f64 },
}

pub type Result<T> = std::result::Result<T, HeatmapError>;
