use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use heatmap_core::{ControllerEvent, Dataset, Palette};
use std::convert::TryFrom;
use std::fmt;
use std::path::PathBuf;
use temperature_heatmap::export::write_svg;
use temperature_heatmap::loader::load_dataset;

use crate::app::{handle_input, handle_mouse, App};
use crate::terminal::Tui;
use crate::ui;

// States for SVG export
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ExportState {
    Idle,
    Exporting,
    Success,
    Error,
}

impl fmt::Display for ExportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Exporting => write!(f, "Exporting"),
            Self::Success => write!(f, "Success"),
            Self::Error => write!(f, "Error"),
        }
    }
}

#[derive(Clone, Debug)]
enum ExportEvent {
    Start,
    Success(PathBuf),
    Error(String),
    Reset,
}

impl fmt::Display for ExportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "Start"),
            Self::Success(path) => write!(f, "Success({path})", path = path.display()),
            Self::Error(msg) => write!(f, "Error({msg})"),
            Self::Reset => write!(f, "Reset"),
        }
    }
}

#[derive(Debug)]
struct StateTransitionError {
    from: ExportState,
    event: ExportEvent,
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} with event {}",
            self.from, self.event
        )
    }
}

impl std::error::Error for StateTransitionError {}

struct ExportMachine {
    state: ExportState,
}

impl ExportMachine {
    const fn new(initial_state: ExportState) -> Self {
        Self {
            state: initial_state,
        }
    }

    const fn state(&self) -> ExportState {
        self.state
    }

    fn process_event(
        &mut self,
        event: &ExportEvent,
        app: &mut App,
    ) -> std::result::Result<(), StateTransitionError> {
        let next_state = NextState::try_from((self.state, event, app))?;
        self.state = next_state.0;
        Ok(())
    }
}

struct NextState(ExportState);

impl TryFrom<(ExportState, &ExportEvent, &mut App)> for NextState {
    type Error = StateTransitionError;

    fn try_from(
        value: (ExportState, &ExportEvent, &mut App),
    ) -> std::result::Result<Self, Self::Error> {
        let (current_state, event, app) = value;

        match (current_state, event) {
            (ExportState::Idle, ExportEvent::Start) => {
                app.status_message = "Exporting SVG...".to_string();
                Ok(Self(ExportState::Exporting))
            }
            (ExportState::Exporting, ExportEvent::Success(path)) => {
                app.status_message = format!("Exported {}", path.display());
                app.export_requested = false;
                Ok(Self(ExportState::Success))
            }
            (ExportState::Exporting, ExportEvent::Error(error)) => {
                app.status_message = format!("Export failed: {error}");
                app.export_requested = false;
                Ok(Self(ExportState::Error))
            }
            (ExportState::Success | ExportState::Error, ExportEvent::Reset) => {
                Ok(Self(ExportState::Idle))
            }
            _ => Err(StateTransitionError {
                from: current_state,
                event: event.clone(),
            }),
        }
    }
}

/// Run without a UI: load once, print stats, optionally write the SVG
pub async fn run_headless(app: &mut App, json: bool, svg: bool) -> Result<()> {
    app.controller
        .process(ControllerEvent::StartLoad)
        .map_err(|e| eyre!("{e}"))?;

    let dataset = match load_dataset(&app.config.source, app.config.timeout).await {
        Ok(dataset) => dataset,
        Err(e) => {
            let message = e.to_string();
            let _ = app.controller.process(ControllerEvent::LoadFailed(message));
            return Err(eyre!(e));
        }
    };

    app.controller
        .process(ControllerEvent::LoadSucceeded(dataset))
        .map_err(|e| eyre!("{e}"))?;

    let dataset = app
        .controller
        .dataset()
        .ok_or_else(|| eyre!("Dataset missing after load"))?;
    let stats = build_headless_stats(dataset, app.controller.palette(), &app.config.source.to_string());

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        render_headless_stats(&stats);
    }

    if svg {
        write_svg(
            dataset,
            app.controller.palette(),
            app.config.svg_width,
            app.config.svg_height,
            &app.config.svg_path,
        )
        .await?;
        if !json {
            println!("\nSVG written to {}", app.config.svg_path.display());
        }
    }

    Ok(())
}

fn render_headless_stats(stats: &HeadlessStats) {
    println!("\nMonthly Global Land-Surface Temperature");
    println!("=======================================");
    println!("Source: {}", stats.source);
    println!("Readings: {}", stats.readings);
    if let Some((first, last)) = stats.years {
        println!("Years: {first}-{last}");
    }
    println!("Base temperature: {}℃", stats.base_temperature);

    if let Some(coldest) = &stats.coldest {
        println!(
            "Coldest: {:.2}℃ ({} {})",
            coldest.temperature, coldest.month, coldest.year
        );
    }
    if let Some(warmest) = &stats.warmest {
        println!(
            "Warmest: {:.2}℃ ({} {})",
            warmest.temperature, warmest.month, warmest.year
        );
    }

    println!("\nReadings by color band:");
    for bucket in &stats.buckets {
        println!("- {:<9} {} : {}", bucket.label, bucket.color, bucket.count);
    }
}

fn build_headless_stats(dataset: &Dataset, palette: &Palette, source: &str) -> HeadlessStats {
    let extreme = |entry: &heatmap_core::MonthlyVariance| HeadlessExtreme {
        year: entry.year,
        month: entry.month_name().to_string(),
        temperature: dataset.temperature_of(entry),
    };

    let legend = palette.legend();
    let mut counts = vec![0_usize; legend.len()];
    for entry in &dataset.entries {
        let band = palette
            .bucket_index(dataset.temperature_of(entry))
            .unwrap_or(palette.buckets().len());
        counts[band] += 1;
    }

    let buckets = legend
        .into_iter()
        .zip(counts)
        .map(|((label, color), count)| HeadlessBucket {
            label,
            color: color.to_hex(),
            count,
        })
        .collect();

    HeadlessStats {
        source: source.to_string(),
        readings: dataset.len(),
        years: dataset.year_range(),
        base_temperature: dataset.base_temperature,
        coldest: dataset.coldest().map(extreme),
        warmest: dataset.warmest().map(extreme),
        buckets,
    }
}

#[derive(serde::Serialize)]
struct HeadlessStats {
    source: String,
    readings: usize,
    years: Option<(i32, i32)>,
    base_temperature: f64,
    coldest: Option<HeadlessExtreme>,
    warmest: Option<HeadlessExtreme>,
    buckets: Vec<HeadlessBucket>,
}

#[derive(serde::Serialize)]
struct HeadlessExtreme {
    year: i32,
    month: String,
    temperature: f64,
}

#[derive(serde::Serialize)]
struct HeadlessBucket {
    label: String,
    color: String,
    count: usize,
}

/// Run the main application event loop
pub async fn run(terminal: &mut Tui, app: &mut App) -> Result<()> {
    // Event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let mut export_machine = ExportMachine::new(ExportState::Idle);

    app.start_load();

    loop {
        app.update();
        app.poll_load();

        let size = terminal.size()?;
        app.sync_layout(ui::heatmap_area(app, size.into()));

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Mouse(mouse)) => handle_mouse(app, mouse),
                Ok(Event::Resize(width, height)) => {
                    log::debug!("Resized to {width}x{height}");
                }
                Ok(_) | Err(_) => {}
            }
        }

        if app.export_requested && export_machine.state() == ExportState::Idle {
            if let Err(e) = export_machine.process_event(&ExportEvent::Start, app) {
                log::warn!("{e}");
                continue;
            }

            let event = match app.export_svg().await {
                Ok(path) => ExportEvent::Success(path),
                Err(e) => {
                    log::error!("SVG export failed: {e}");
                    ExportEvent::Error(e.to_string())
                }
            };
            if let Err(e) = export_machine.process_event(&event, app) {
                log::warn!("{e}");
            }

            if let Err(e) = export_machine.process_event(&ExportEvent::Reset, app) {
                log::warn!("{e}");
            }
        }
    }

    Ok(())
}
