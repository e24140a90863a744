use ratatui::layout::Rect;
use ratatui::prelude::Buffer;
use ratatui::widgets::Widget;

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = ratatui::layout::Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            ratatui::layout::Constraint::Percentage((100 - percent_y) / 2),
            ratatui::layout::Constraint::Percentage(percent_y),
            ratatui::layout::Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal_layout = ratatui::layout::Layout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .constraints([
            ratatui::layout::Constraint::Percentage((100 - percent_x) / 2),
            ratatui::layout::Constraint::Percentage(percent_x),
            ratatui::layout::Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);

    horizontal_layout[1]
}

/// Place a `width` x `height` box next to `anchor`: to the right and below
/// when it fits, flipped left or up otherwise, always clipped to `bounds`
pub fn anchored_rect(anchor: (u16, u16), width: u16, height: u16, bounds: Rect) -> Rect {
    let width = width.min(bounds.width);
    let height = height.min(bounds.height);
    let (ax, ay) = anchor;

    let x = if ax.saturating_add(2).saturating_add(width) <= bounds.right() {
        ax.saturating_add(2)
    } else {
        ax.saturating_sub(width.saturating_add(1)).max(bounds.x)
    };

    let y = if ay.saturating_add(1).saturating_add(height) <= bounds.bottom() {
        ay.saturating_add(1)
    } else {
        ay.saturating_sub(height).max(bounds.y)
    };

    Rect::new(x, y, width, height)
}

pub struct ClearWidget;

impl Widget for ClearWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        ratatui::widgets::Clear.render(area, buf);
    }
}
