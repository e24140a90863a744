// UI module for the heatmap terminal
// Handles all rendering

pub mod screens;
pub mod widgets;

use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    screens::heatmap::render_heatmap_screen(app, f);
}

/// Title, heatmap, legend, status and shortcut rows
pub fn screen_layout(app: &App, area: Rect) -> Vec<Rect> {
    let legend_height = if app.show_legend { 3 } else { 0 };

    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),             // Title area
            Constraint::Min(8),                // Heatmap
            Constraint::Length(legend_height), // Legend
            Constraint::Length(3),             // Status area
            Constraint::Length(1),             // Shortcuts hint
        ])
        .split(area.inner(Margin::new(2, 1)))
        .to_vec()
}

/// Inside of the heatmap block, where cells are drawn
pub fn heatmap_area(app: &App, area: Rect) -> Rect {
    screen_layout(app, area)[1].inner(Margin::new(1, 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use temperature_heatmap::AppConfig;

    #[test]
    fn heatmap_area_sits_inside_content_block() {
        let app = App::new(AppConfig::default());
        let area = heatmap_area(&app, Rect::new(0, 0, 100, 40));

        // 2 cols outer margin + 1 border; 1 row margin + 4 title rows + 1 border
        assert_eq!((area.x, area.y), (3, 6));
        assert_eq!(area.width, 94);
        // 40 - 2 margin - 4 title - 3 legend - 3 status - 1 shortcuts - 2 border
        assert_eq!(area.height, 25);
    }

    #[test]
    fn hiding_legend_grows_heatmap() {
        let mut app = App::new(AppConfig::default());
        let with_legend = heatmap_area(&app, Rect::new(0, 0, 100, 40));
        app.toggle_legend();
        let without = heatmap_area(&app, Rect::new(0, 0, 100, 40));
        assert_eq!(without.height, with_legend.height + 3);
    }
}
