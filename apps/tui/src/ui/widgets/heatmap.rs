use heatmap_core::{RenderPlan, Rgb};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

const HIGHLIGHT: Color = Color::White;

pub const fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Heatmap grid with month names down the left and year ticks underneath.
/// Each terminal cell is painted with the data cell under its center.
pub struct HeatmapWidget<'a> {
    plan: &'a RenderPlan,
    cursor: Option<(i32, u32)>,
}

impl<'a> HeatmapWidget<'a> {
    pub const fn new(plan: &'a RenderPlan) -> Self {
        Self { plan, cursor: None }
    }

    pub const fn cursor(mut self, cursor: Option<(i32, u32)>) -> Self {
        self.cursor = cursor;
        self
    }

    fn render_cells(&self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let x = f64::from(col) + 0.5;
                let y = f64::from(row) + 0.5;
                let Some(cell) = self.plan.cell_at(x, y) else {
                    continue;
                };

                let color = if self.cursor == Some((cell.year, cell.month)) {
                    HIGHLIGHT
                } else {
                    to_color(cell.color)
                };

                if let Some(target) = buf.cell_mut((area.x + col, area.y + row)) {
                    target.set_symbol(" ").set_bg(color);
                }
            }
        }
    }

    fn render_month_labels(&self, area: Rect, buf: &mut Buffer) {
        let width = self.plan.dimensions.margins.left.max(1.0) as usize - 1;
        let mut last_row = None;

        for tick in &self.plan.y_ticks {
            let row = tick.position.floor() as u16;
            if row >= area.height || last_row == Some(row) {
                continue;
            }
            last_row = Some(row);

            let label: String = tick.label.chars().take(width).collect();
            buf.set_string(
                area.x,
                area.y + row,
                format!("{label:>width$}"),
                Style::default().fg(Color::Gray),
            );
        }
    }

    fn render_year_ticks(&self, area: Rect, buf: &mut Buffer) {
        let bottom = self.plan.dimensions.height - self.plan.dimensions.margins.bottom;
        let mark_row = bottom.max(0.0) as u16;
        let label_row = mark_row + 1;
        if label_row >= area.height {
            return;
        }

        let style = Style::default().fg(Color::Gray);
        let mut next_free = 0_u16;

        for tick in &self.plan.x_ticks {
            let col = tick.position.floor() as u16;
            if col >= area.width {
                continue;
            }
            buf.set_string(area.x + col, area.y + mark_row, "╵", style);

            let len = tick.label.chars().count() as u16;
            let start = col
                .saturating_sub(len / 2)
                .min(area.width.saturating_sub(len));
            if start < next_free {
                continue;
            }
            buf.set_string(area.x + start, area.y + label_row, &tick.label, style);
            next_free = start + len + 1;
        }
    }
}

impl Widget for HeatmapWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_cells(area, buf);
        self.render_month_labels(area, buf);
        self.render_year_ticks(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heatmap_core::{compute_plan, Dataset, Dimensions, Margins, Palette};

    fn plan(width: f64, height: f64) -> RenderPlan {
        let dataset = Dataset::from_json(
            r#"{"baseTemperature":8.66,"monthlyVariance":[
                {"year":1753,"month":0,"variance":-6.0},
                {"year":1754,"month":0,"variance":5.0},
                {"year":1755,"month":11,"variance":0.0}
            ]}"#,
        )
        .unwrap();
        let dims = Dimensions::new(width, height, Margins::new(0.0, 1.0, 2.0, 10.0))
            .with_tick_spacing(8.0);
        compute_plan(&dataset, &Palette::default(), dims).unwrap()
    }

    #[test]
    fn paints_cells_with_bucket_colors() {
        let plan = plan(40.0, 14.0);
        let area = Rect::new(0, 0, 40, 14);
        let mut buf = Buffer::empty(area);

        HeatmapWidget::new(&plan).render(area, &mut buf);

        // 2.66℃ in January 1753 is the coldest band
        assert_eq!(buf[(10, 0)].bg, Color::Rgb(0x02, 0x74, 0xf5));
        // No reading for February 1753
        assert_eq!(buf[(10, 1)].bg, Color::Reset);
        assert_eq!(buf[(0, 0)].symbol(), " ");
        assert!(buf[(2, 0)].symbol() != " " || buf[(3, 0)].symbol() != " ");
    }

    #[test]
    fn cursor_cell_is_highlighted() {
        let plan = plan(40.0, 14.0);
        let area = Rect::new(0, 0, 40, 14);
        let mut buf = Buffer::empty(area);

        HeatmapWidget::new(&plan)
            .cursor(Some((1753, 0)))
            .render(area, &mut buf);

        assert_eq!(buf[(10, 0)].bg, HIGHLIGHT);
    }

    #[test]
    fn year_labels_do_not_overlap() {
        let plan = plan(40.0, 14.0);
        let area = Rect::new(0, 0, 40, 14);
        let mut buf = Buffer::empty(area);

        HeatmapWidget::new(&plan).render(area, &mut buf);

        let label_row: String = (0..40).map(|x| buf[(x, 13)].symbol().to_string()).collect();
        assert!(label_row.contains("1753") || label_row.contains("1754"));
    }
}
