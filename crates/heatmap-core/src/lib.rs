// Shared heatmap logic used by the terminal app and the web dashboard

pub mod controller;
pub mod dataset;
pub mod error;
pub mod layout;
pub mod palette;
pub mod scale;
pub mod svg;
pub mod tooltip;

pub use controller::{ControllerEvent, HeatmapController, Phase, StateTransitionError};
pub use dataset::{month_name, Dataset, MonthlyVariance, Payload, DEFAULT_DATA_URL};
pub use error::{HeatmapError, Result};
pub use layout::{compute_plan, CellPrimitive, Dimensions, Margins, RenderPlan, Tick};
pub use palette::{ColorBucket, Palette, Rgb};
pub use tooltip::Tooltip;
