use crate::app::App;
use crate::ui::widgets::heatmap::HeatmapWidget;
use crate::ui::widgets::legend::legend_line;
use crate::ui::widgets::popup::{anchored_rect, centered_rect, ClearWidget};
use crate::ui::{heatmap_area, screen_layout};
use heatmap_core::svg::{subtitle, TITLE};
use heatmap_core::{Phase, Tooltip};
use ratatui::layout::{Alignment, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, WhichUse, BRAILLE_SIX};

pub fn render_heatmap_screen(app: &App, f: &mut Frame<'_>) {
    let layout = screen_layout(app, f.area());

    render_title_section(app, f, layout[0]);
    render_content_section(app, f, layout[1]);
    if app.show_legend {
        render_legend_section(app, f, layout[2]);
    }
    render_status_section(app, f, layout[3]);
    render_shortcuts(f, layout[4]);

    if app.show_help {
        render_help_popup(f, f.area());
    }
}

fn render_title_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title_block = Block::default()
        .title("== Global Temperature ==")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let description = app.controller.plan().map_or_else(
        || format!("Source: {}", app.config.source),
        subtitle,
    );

    let mut second_line = vec![Span::styled(description, Style::default().fg(Color::White))];
    if let Some(loaded_at) = app.loaded_at {
        second_line.push(Span::styled(
            format!("   loaded {}", loaded_at.format("%Y-%m-%d %H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let title_paragraph = Paragraph::new(Text::from(vec![
        TextLine::from(Span::styled(
            TITLE,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(second_line),
    ]))
    .block(title_block)
    .alignment(Alignment::Center);

    f.render_widget(title_paragraph, area);
}

fn render_content_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let content_block = Block::default()
        .title(format!(" Heatmap [{}] ", app.phase()))
        .title_style(Style::default().fg(Color::Green))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    f.render_widget(content_block, area);

    let inner = heatmap_area(app, f.area());

    match app.phase() {
        Phase::Loading => render_loading(app, f, inner),
        Phase::Failed => render_error(app, f, inner),
        Phase::Rendered => {
            if let Some(plan) = app.controller.plan() {
                f.render_widget(HeatmapWidget::new(plan).cursor(app.cursor), inner);
                render_tooltip(app, f, inner);
            }
        }
        Phase::Loaded => render_message(f, inner, "Waiting for room to draw..."),
        Phase::Idle => render_message(f, inner, "Press r to load the dataset"),
    }
}

fn render_loading(app: &App, f: &mut Frame<'_>, area: Rect) {
    let throbber = Throbber::default()
        .label(format!("Fetching {}", app.config.source))
        .style(Style::default().fg(Color::Yellow))
        .throbber_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .throbber_set(BRAILLE_SIX)
        .use_type(WhichUse::Spin);

    let line_area = Rect {
        x: area.x + 1,
        y: area.y + area.height / 2,
        width: area.width.saturating_sub(2),
        height: 1.min(area.height),
    };

    let mut state = app.throbber.clone();
    f.render_stateful_widget(throbber, line_area, &mut state);
}

fn render_error(app: &App, f: &mut Frame<'_>, area: Rect) {
    let message = app.controller.error().unwrap_or("Unknown error");

    let error_paragraph = Paragraph::new(Text::from(vec![
        TextLine::from(Span::styled(
            "Could not load the temperature dataset",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(Span::styled(message, Style::default().fg(Color::Red))),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Press r to retry",
            Style::default().fg(Color::Gray),
        )),
    ]))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    f.render_widget(error_paragraph, area.inner(Margin::new(1, 1)));
}

fn render_message(f: &mut Frame<'_>, area: Rect, message: &str) {
    let paragraph = Paragraph::new(Span::styled(message, Style::default().fg(Color::Gray)))
        .alignment(Alignment::Center);
    let line_area = Rect {
        y: area.y + area.height / 2,
        height: 1.min(area.height),
        ..area
    };
    f.render_widget(paragraph, line_area);
}

fn render_tooltip(app: &App, f: &mut Frame<'_>, area: Rect) {
    let Some(cell) = app.selected_cell() else {
        return;
    };
    let tooltip = Tooltip::for_cell(cell);

    let anchor = (
        area.x + cell.x.max(0.0) as u16,
        area.y + cell.y.max(0.0) as u16,
    );
    let width = tooltip.width() as u16 + 4;
    let popup_area = anchored_rect(anchor, width, 5, area);
    f.render_widget(ClearWidget, popup_area);

    let lines: Vec<TextLine<'_>> = tooltip
        .lines()
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let style = if i == 0 {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            TextLine::from(Span::styled(line, style))
        })
        .collect();

    let tooltip_paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(tooltip_paragraph, popup_area);
}

fn render_legend_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let legend_block = Block::default()
        .title(" Legend (℃) ")
        .title_style(Style::default().fg(Color::Magenta))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let legend_paragraph = Paragraph::new(legend_line(app.controller.palette()))
        .block(legend_block)
        .alignment(Alignment::Center);
    f.render_widget(legend_paragraph, area);
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let status_text = if app.status_message.is_empty() {
        Text::from(Span::styled("", Style::default().fg(Color::Gray)))
    } else {
        let style = if app.status_message.starts_with("Error")
            || app.status_message.starts_with("Export failed")
        {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };

        Text::from(Span::styled(&app.status_message, style))
    };

    let status_paragraph = Paragraph::new(status_text)
        .block(status_block)
        .wrap(Wrap { trim: true });
    f.render_widget(status_paragraph, area);
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let shortcuts = TextLine::from(vec![
        Span::styled("←↑↓→", key),
        Span::raw(": Move   "),
        Span::styled("r", key),
        Span::raw(": Reload   "),
        Span::styled("g", key),
        Span::raw(": Legend   "),
        Span::styled("e", key),
        Span::raw(": Export SVG   "),
        Span::styled("?", key),
        Span::raw(": Help   "),
        Span::styled("q", key),
        Span::raw(": Quit"),
    ]);

    f.render_widget(
        Paragraph::new(shortcuts).alignment(Alignment::Center),
        area,
    );
}

fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(70, 70, area);
    f.render_widget(ClearWidget, popup_area);

    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let help_paragraph = Paragraph::new(Text::from(build_help_lines()))
        .block(help_block)
        .wrap(Wrap { trim: true });
    f.render_widget(help_paragraph, popup_area);

    let hint = Paragraph::new(Span::styled(
        "Press ? or Esc to close",
        Style::default().fg(Color::Gray),
    ))
    .alignment(Alignment::Center);

    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1,
    };
    f.render_widget(hint, hint_area);
}

fn build_help_lines() -> Vec<TextLine<'static>> {
    let heading = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let key = Style::default().fg(Color::Yellow);

    let bindings = [
        ("←/→ or h/l", "Previous / next year"),
        ("↑/↓ or k/j", "Previous / next month"),
        ("PgUp/PgDn", "Jump ten years"),
        ("Mouse", "Hover a cell to inspect it"),
        ("r", "Reload the dataset"),
        ("g", "Show / hide the legend"),
        ("e", "Export the heatmap as SVG"),
        ("?", "Toggle this help"),
        ("q / Esc", "Quit"),
    ];

    let mut lines = vec![
        TextLine::from(Span::styled(TITLE, heading)),
        TextLine::from(""),
        TextLine::from(
            "Each cell is one month. Color bands follow the absolute temperature \
             (base temperature plus the month's variance).",
        ),
        TextLine::from(""),
    ];

    lines.extend(bindings.iter().map(|(keys, action)| {
        TextLine::from(vec![
            Span::styled(format!("{keys:<12}"), key),
            Span::raw(*action),
        ])
    }));

    lines.push(TextLine::from(""));
    lines.push(TextLine::from(Span::styled("Command line", heading)));
    lines.extend(
        crate::cli::CliArgs::help_text()
            .lines()
            .map(|line| TextLine::from(line.to_string())),
    );

    lines
}
