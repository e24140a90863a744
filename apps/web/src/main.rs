use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use heatmap_core::svg::{subtitle, TITLE};
use heatmap_core::{
    ControllerEvent, Dataset, Dimensions, HeatmapController, Margins, Palette, Payload, Phase,
    RenderPlan, Rgb, Tooltip, DEFAULT_DATA_URL,
};
use ratzilla::event::KeyCode;
use ratzilla::ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line as TextLine, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Request, RequestInit, RequestMode, Response};

const GRID_MARGINS: Margins = Margins::new(0.0, 1.0, 2.0, 10.0);
const GRID_TICK_SPACING: f64 = 8.0;

struct ViewState {
    controller: HeatmapController,
    cursor: Option<(i32, u32)>,
    show_legend: bool,
}

type SharedState = Rc<RefCell<ViewState>>;

fn main() -> io::Result<()> {
    let state = Rc::new(RefCell::new(ViewState {
        controller: HeatmapController::new(Palette::default()),
        cursor: None,
        show_legend: true,
    }));

    start_load(&state);

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let state = state.clone();
        move |event| match event.code {
            KeyCode::Left => move_cursor(&state, -1, 0),
            KeyCode::Right => move_cursor(&state, 1, 0),
            KeyCode::Up => move_cursor(&state, 0, -1),
            KeyCode::Down => move_cursor(&state, 0, 1),
            KeyCode::Char('g') => {
                let mut view = state.borrow_mut();
                view.show_legend = !view.show_legend;
            }
            KeyCode::Char('r') => start_load(&state),
            _ => {}
        }
    });

    terminal.draw_web(move |f| {
        let area = f.area();
        let block = Block::default()
            .title(TITLE)
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));
        let inner = block.inner(area).inner(Margin::new(1, 1));
        f.render_widget(block, area);

        render_view(&mut state.borrow_mut(), f, inner);
    });

    Ok(())
}

fn start_load(state: &SharedState) {
    {
        let mut view = state.borrow_mut();
        if view.controller.phase() == Phase::Loading {
            return;
        }
        if let Err(error) = view.controller.process(ControllerEvent::StartLoad) {
            web_sys::console::error_1(&error.to_string().into());
            return;
        }
        view.cursor = None;
    }
    spawn_local(fetch_dataset(state.clone()));
}

fn move_cursor(state: &SharedState, years: i32, months: i32) {
    let mut view = state.borrow_mut();
    let Some((first, last)) = view.controller.dataset().and_then(Dataset::year_range) else {
        return;
    };

    let (year, month) = view.cursor.unwrap_or((first, 0));
    view.cursor = Some((
        (year + years).clamp(first, last),
        (month as i32 + months).clamp(0, 11) as u32,
    ));
}

fn render_view(view: &mut ViewState, f: &mut Frame<'_>, area: Rect) {
    let legend_height = if view.show_legend { 3 } else { 0 };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(legend_height),
            Constraint::Length(3),
        ])
        .split(area);

    let grid_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let grid_area = grid_block.inner(layout[1]);
    f.render_widget(grid_block, layout[1]);

    if view.controller.can_render() {
        let dims = Dimensions::new(
            f64::from(grid_area.width),
            f64::from(grid_area.height),
            GRID_MARGINS,
        )
        .with_tick_spacing(GRID_TICK_SPACING);
        if let Err(error) = view.controller.process(ControllerEvent::Render(dims)) {
            web_sys::console::error_1(&error.to_string().into());
        }
    }

    let header = view
        .controller
        .plan()
        .map_or_else(|| "Loading global-temperature.json...".to_string(), subtitle);
    f.render_widget(
        Paragraph::new(header).alignment(Alignment::Center),
        layout[0],
    );

    match view.controller.phase() {
        Phase::Rendered => {
            if let Some(plan) = view.controller.plan() {
                render_grid(plan, view.cursor, f.buffer_mut(), grid_area);
            }
        }
        Phase::Failed => {
            let message = view.controller.error().unwrap_or("Unknown error");
            let paragraph = Paragraph::new(Text::from(vec![
                TextLine::from(Span::styled(message, Style::default().fg(Color::Red))),
                TextLine::from("Press r to retry"),
            ]))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
            f.render_widget(paragraph, grid_area);
        }
        _ => {
            let paragraph = Paragraph::new("Loading...").alignment(Alignment::Center);
            f.render_widget(paragraph, grid_area);
        }
    }

    if view.show_legend {
        render_legend(view.controller.palette(), f, layout[2]);
    }
    render_footer(view, f, layout[3]);
}

const fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

fn render_grid(plan: &RenderPlan, cursor: Option<(i32, u32)>, buf: &mut Buffer, area: Rect) {
    for row in 0..area.height {
        for col in 0..area.width {
            let Some(cell) = plan.cell_at(f64::from(col) + 0.5, f64::from(row) + 0.5) else {
                continue;
            };
            let color = if cursor == Some((cell.year, cell.month)) {
                Color::White
            } else {
                to_color(cell.color)
            };
            if let Some(target) = buf.cell_mut((area.x + col, area.y + row)) {
                target.set_symbol(" ").set_bg(color);
            }
        }
    }

    let label_style = Style::default().fg(Color::Gray);
    for tick in &plan.y_ticks {
        let row = tick.position.floor() as u16;
        if row < area.height {
            let label: String = tick.label.chars().take(3).collect();
            buf.set_string(area.x + 5, area.y + row, label, label_style);
        }
    }

    let label_row = (plan.dimensions.height - plan.dimensions.margins.bottom).max(0.0) as u16 + 1;
    if label_row < area.height {
        let mut next_free = 0_u16;
        for tick in &plan.x_ticks {
            let start = (tick.position.floor() as u16).saturating_sub(2);
            if start < next_free || start + 4 > area.width {
                continue;
            }
            buf.set_string(area.x + start, area.y + label_row, &tick.label, label_style);
            next_free = start + 5;
        }
    }
}

fn render_legend(palette: &Palette, f: &mut Frame<'_>, area: Rect) {
    let spans: Vec<Span<'_>> = palette
        .legend()
        .into_iter()
        .flat_map(|(label, rgb)| {
            [
                Span::styled("  ", Style::default().bg(to_color(rgb))),
                Span::styled(format!(" {label}  "), Style::default().fg(Color::Gray)),
            ]
        })
        .collect();

    let block = Block::default()
        .title("Legend (℃)")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    f.render_widget(
        Paragraph::new(TextLine::from(spans))
            .block(block)
            .alignment(Alignment::Center),
        area,
    );
}

fn render_footer(view: &ViewState, f: &mut Frame<'_>, area: Rect) {
    let selected = view
        .cursor
        .and_then(|(year, month)| view.controller.plan()?.cell(year, month));

    let line = selected.map_or_else(
        || {
            TextLine::from(Span::styled(
                "←↑↓→ select a month   g legend   r reload",
                Style::default().fg(Color::Gray),
            ))
        },
        |cell| TextLine::from(Tooltip::for_cell(cell).lines().join("   ")),
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(
        Paragraph::new(line).block(block).alignment(Alignment::Center),
        area,
    );
}

async fn fetch_dataset(state: SharedState) {
    let event = match request_dataset().await {
        Ok(dataset) => ControllerEvent::LoadSucceeded(dataset),
        Err(message) => {
            web_sys::console::error_1(&message.clone().into());
            ControllerEvent::LoadFailed(message)
        }
    };

    if let Err(error) = state.borrow_mut().controller.process(event) {
        web_sys::console::error_1(&error.to_string().into());
    }
}

async fn request_dataset() -> Result<Dataset, String> {
    let window = web_sys::window().ok_or("No window available")?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(DEFAULT_DATA_URL, &opts)
        .map_err(|_| "Failed to build request".to_string())?;

    let response_value = wasm_bindgen_futures::JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|_| "Network error while fetching dataset".to_string())?;

    let response = response_value
        .dyn_into::<Response>()
        .map_err(|_| "Failed to read response".to_string())?;
    if !response.ok() {
        return Err(format!("Server responded with {}", response.status()));
    }

    let body = response
        .json()
        .map_err(|_| "Failed to read response body".to_string())?;
    let json = wasm_bindgen_futures::JsFuture::from(body)
        .await
        .map_err(|_| "Response body was not JSON".to_string())?;

    let payload = serde_wasm_bindgen::from_value::<Payload>(json)
        .map_err(|error| format!("Failed to parse dataset: {error}"))?;

    Dataset::from_payload(payload).map_err(|error| error.to_string())
}
