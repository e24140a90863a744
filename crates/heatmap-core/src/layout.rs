//! Pure layout: turns a dataset and target dimensions into draw primitives.
//!
//! Nothing here touches a terminal, DOM or file. Every surface (ratatui,
//! ratzilla, SVG) draws the same [`RenderPlan`].

use crate::dataset::{month_name, Dataset};
use crate::error::{HeatmapError, Result};
use crate::palette::{Palette, Rgb};
use crate::scale::{BandScale, LinearScale};
use std::collections::HashMap;

const MONTHS: usize = 12;
const DEFAULT_TICK_SPACING: f64 = 80.0;
const MAX_X_TICKS: usize = 10;

/// Space reserved around the cell grid for axes and labels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }
}

/// Size of the drawing surface, in whatever unit the surface uses
/// (pixels for SVG, character cells for terminals)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    /// Minimum distance between two year ticks
    pub tick_spacing: f64,
}

impl Dimensions {
    pub const fn new(width: f64, height: f64, margins: Margins) -> Self {
        Self {
            width,
            height,
            margins,
            tick_spacing: DEFAULT_TICK_SPACING,
        }
    }

    #[must_use]
    pub const fn with_tick_spacing(mut self, spacing: f64) -> Self {
        self.tick_spacing = spacing;
        self
    }

    pub fn drawable_width(&self) -> f64 {
        self.width - self.margins.left - self.margins.right
    }

    pub fn drawable_height(&self) -> f64 {
        self.height - self.margins.top - self.margins.bottom
    }
}

/// One rectangle of the heatmap
#[derive(Debug, Clone, PartialEq)]
pub struct CellPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Rgb,
    pub year: i32,
    pub month: u32,
    pub temperature: f64,
    pub variance: f64,
}

impl CellPrimitive {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Axis tick: position along the axis and its label
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
}

/// Declarative description of everything a surface has to draw
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub dimensions: Dimensions,
    pub year_range: (i32, i32),
    pub base_temperature: f64,
    pub cell_width: f64,
    pub cell_height: f64,
    pub cells: Vec<CellPrimitive>,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub legend: Vec<LegendEntry>,
    month_scale: BandScale,
    index: HashMap<(i32, u32), usize>,
}

impl RenderPlan {
    pub fn cell(&self, year: i32, month: u32) -> Option<&CellPrimitive> {
        self.index.get(&(year, month)).map(|&i| &self.cells[i])
    }

    /// Cell under a point, in the same units as the plan's dimensions
    pub fn cell_at(&self, x: f64, y: f64) -> Option<&CellPrimitive> {
        let month = self.month_scale.index_at(y)?;
        if x < self.dimensions.margins.left || self.cell_width <= 0.0 {
            return None;
        }
        let offset = ((x - self.dimensions.margins.left) / self.cell_width).floor();
        let year = self.year_range.0 + offset as i32;
        self.cell(year, month as u32).filter(|cell| cell.contains(x, y))
    }
}

/// Lay out one cell per data point.
///
/// Cell width is the drawable width divided by the year span; a dataset
/// covering a single year uses a span of 1.
pub fn compute_plan(
    dataset: &Dataset,
    palette: &Palette,
    dimensions: Dimensions,
) -> Result<RenderPlan> {
    let (year_min, year_max) = dataset.year_range().ok_or(HeatmapError::EmptyDataset)?;

    let drawable_width = dimensions.drawable_width();
    let drawable_height = dimensions.drawable_height();
    if drawable_width <= 0.0 || drawable_height <= 0.0 {
        return Err(HeatmapError::InvalidDimensions {
            width: dimensions.width,
            height: dimensions.height,
        });
    }

    let span = (year_max - year_min).max(1);
    let margins = dimensions.margins;

    let x_scale = LinearScale::new(
        (f64::from(year_min), f64::from(year_min + span)),
        (margins.left, dimensions.width - margins.right),
    );
    let month_scale = BandScale::new(
        MONTHS,
        (margins.top, dimensions.height - margins.bottom),
    );

    let cell_width = drawable_width / f64::from(span);
    let cell_height = month_scale.bandwidth();

    let mut cells = Vec::with_capacity(dataset.len());
    let mut index = HashMap::with_capacity(dataset.len());

    for entry in &dataset.entries {
        let temperature = dataset.temperature_of(entry);
        index.insert((entry.year, entry.month), cells.len());
        cells.push(CellPrimitive {
            x: x_scale.map(f64::from(entry.year)),
            y: month_scale.band_start(entry.month as usize),
            width: cell_width,
            height: cell_height,
            color: palette.resolve(temperature),
            year: entry.year,
            month: entry.month,
            temperature,
            variance: entry.variance,
        });
    }

    let tick_target = if dimensions.tick_spacing > 0.0 {
        ((drawable_width / dimensions.tick_spacing).floor() as usize).clamp(2, MAX_X_TICKS)
    } else {
        MAX_X_TICKS
    };
    let x_ticks = LinearScale::new((f64::from(year_min), f64::from(year_max)), x_scale.range)
        .ticks(tick_target)
        .into_iter()
        // Short spans would otherwise get half-year ticks
        .filter(|year| year.fract().abs() < f64::EPSILON)
        .map(|year| Tick {
            position: x_scale.map(year),
            label: format!("{year:.0}"),
        })
        .collect();

    let y_ticks = (0..MONTHS)
        .map(|month| Tick {
            position: month_scale.band_center(month),
            label: month_name(month as u32).unwrap_or_default().to_string(),
        })
        .collect();

    let legend = palette
        .legend()
        .into_iter()
        .map(|(label, color)| LegendEntry { label, color })
        .collect();

    log::debug!(
        "Laid out {} cells over {year_min}-{year_max} at {}x{}",
        cells.len(),
        dimensions.width,
        dimensions.height
    );

    Ok(RenderPlan {
        dimensions,
        year_range: (year_min, year_max),
        base_temperature: dataset.base_temperature,
        cell_width,
        cell_height,
        cells,
        x_ticks,
        y_ticks,
        legend,
        month_scale,
        index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::MonthlyVariance;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-9, "expected {expected}, got {actual}, diff {diff}");
    }

    fn dataset(years: &[i32]) -> Dataset {
        let mut entries = Vec::new();
        for &year in years {
            for month in 0..12 {
                let variance = f64::from(month) * 0.1 - 0.5;
                entries.push(MonthlyVariance::new(year, month, variance).unwrap());
            }
        }
        Dataset {
            base_temperature: 8.0,
            entries,
        }
    }

    fn dims() -> Dimensions {
        Dimensions::new(1200.0, 600.0, Margins::uniform(60.0))
    }

    #[test]
    fn cell_width_divides_drawable_width_by_year_span() {
        let plan = compute_plan(&dataset(&[1753, 1900, 2015]), &Palette::default(), dims()).unwrap();

        assert_close(plan.cell_width, 1080.0 / 262.0);
        assert_close(plan.cell_height, 480.0 / 12.0);
        assert_eq!(plan.cells.len(), 36);
    }

    #[test]
    fn cells_follow_scales() {
        let plan = compute_plan(&dataset(&[1753, 2015]), &Palette::default(), dims()).unwrap();

        let first = plan.cell(1753, 0).unwrap();
        assert_close(first.x, 60.0);
        assert_close(first.y, 60.0);

        let last = plan.cell(2015, 11).unwrap();
        assert_close(last.x, 1140.0);
        assert_close(last.y, 60.0 + 11.0 * 40.0);
    }

    #[test]
    fn colors_come_from_absolute_temperature() {
        let plan = compute_plan(&dataset(&[1900]), &Palette::default(), dims()).unwrap();
        // month 10: variance 0.5 -> 8.5
        let cell = plan.cell(1900, 10).unwrap();
        assert_close(cell.temperature, 8.5);
        assert_eq!(cell.color.to_hex(), "#fccc6d");
    }

    #[test]
    fn single_year_clamps_span() {
        let plan = compute_plan(&dataset(&[1990]), &Palette::default(), dims()).unwrap();
        assert_close(plan.cell_width, 1080.0);
        assert!(plan.cells.iter().all(|c| c.width.is_finite()));
    }

    #[test]
    fn empty_dataset_is_an_error() {
        let empty = Dataset {
            base_temperature: 8.0,
            entries: Vec::new(),
        };
        let err = compute_plan(&empty, &Palette::default(), dims()).unwrap_err();
        assert!(matches!(err, HeatmapError::EmptyDataset));
    }

    #[test]
    fn margins_larger_than_surface_are_an_error() {
        let tiny = Dimensions::new(100.0, 100.0, Margins::uniform(60.0));
        let err = compute_plan(&dataset(&[1900]), &Palette::default(), tiny).unwrap_err();
        assert!(matches!(err, HeatmapError::InvalidDimensions { .. }));
    }

    #[test]
    fn recomputing_does_not_duplicate_cells() {
        let data = dataset(&[1753, 2015]);
        let palette = Palette::default();
        let first = compute_plan(&data, &palette, dims()).unwrap();
        let second = compute_plan(&data, &palette, dims()).unwrap();
        assert_eq!(first.cells.len(), second.cells.len());
        assert_eq!(first, second);
    }

    #[test]
    fn hit_test_finds_cell_under_point() {
        let plan = compute_plan(&dataset(&[1753, 1754, 1755]), &Palette::default(), dims()).unwrap();
        // span 2 -> cell width 540, height 40
        let cell = plan.cell_at(60.0 + 540.0 + 10.0, 60.0 + 40.0 * 3.0 + 5.0).unwrap();
        assert_eq!((cell.year, cell.month), (1754, 3));

        assert!(plan.cell_at(10.0, 100.0).is_none());
        assert!(plan.cell_at(100.0, 590.0).is_none());
    }

    #[test]
    fn axis_ticks() {
        let plan = compute_plan(&dataset(&[1753, 2015]), &Palette::default(), dims()).unwrap();

        assert_eq!(plan.y_ticks.len(), 12);
        assert_eq!(plan.y_ticks[0].label, "January");
        assert_eq!(plan.y_ticks[11].label, "December");
        assert_close(plan.y_ticks[0].position, 80.0);

        assert!(!plan.x_ticks.is_empty());
        assert!(plan
            .x_ticks
            .iter()
            .all(|t| t.label.parse::<i32>().is_ok_and(|y| (1753..=2015).contains(&y))));
    }
}
