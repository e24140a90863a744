use crate::ui::widgets::heatmap::to_color;
use heatmap_core::Palette;
use ratatui::style::{Color, Style};
use ratatui::text::{Line as TextLine, Span};

/// One swatch and band label per palette bucket, overflow band last
pub fn legend_line(palette: &Palette) -> TextLine<'static> {
    let mut spans = Vec::new();

    for (label, rgb) in palette.legend() {
        spans.push(Span::styled("  ", Style::default().bg(to_color(rgb))));
        spans.push(Span::styled(
            format!(" {label}  "),
            Style::default().fg(Color::Gray),
        ));
    }

    TextLine::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_swatch_per_band() {
        let line = legend_line(&Palette::default());
        assert_eq!(line.spans.len(), 20);
        assert_eq!(line.spans[0].style.bg, Some(Color::Rgb(0x02, 0x74, 0xf5)));
        assert_eq!(line.spans[19].content, " >= 12.8  ");
    }
}
