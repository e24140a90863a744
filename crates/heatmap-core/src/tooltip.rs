use crate::dataset::month_name;
use crate::layout::CellPrimitive;

/// Text shown when a cell is hovered or selected
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub year: i32,
    pub month: &'static str,
    /// Absolute temperature rounded to two decimals
    pub temperature: String,
    /// Variance exactly as loaded
    pub variance: String,
}

impl Tooltip {
    pub fn for_cell(cell: &CellPrimitive) -> Self {
        Self {
            year: cell.year,
            month: month_name(cell.month).unwrap_or("Unknown"),
            temperature: format!("{:.2}℃", cell.temperature),
            variance: format!("{}℃", cell.variance),
        }
    }

    pub fn title(&self) -> String {
        format!("{} - {}", self.year, self.month)
    }

    pub fn lines(&self) -> Vec<String> {
        vec![
            self.title(),
            format!("Temperature: {}", self.temperature),
            format!("Variance: {}", self.variance),
        ]
    }

    /// Widest line, in characters
    pub fn width(&self) -> usize {
        self.lines()
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
    }
}
