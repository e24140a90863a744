use crate::app::input::helpers::step_clamped;
use chrono::{DateTime, Local};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use heatmap_core::{
    CellPrimitive, ControllerEvent, Dimensions, HeatmapController, Margins, Palette, Phase,
};
use ratatui::layout::Rect;
use std::path::PathBuf;
use std::time::Instant;
use temperature_heatmap::export::write_svg;
use temperature_heatmap::loader::spawn_load;
use temperature_heatmap::{AppConfig, LoadHandle};
use throbber_widgets_tui::ThrobberState;

/// Month labels on the left, year ticks on the two rows below
const TERMINAL_MARGINS: Margins = Margins::new(0.0, 1.0, 2.0, 10.0);
const TERMINAL_TICK_SPACING: f64 = 8.0;
const MIN_HEATMAP_WIDTH: u16 = 20;
const MIN_HEATMAP_HEIGHT: u16 = 6;

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub controller: HeatmapController,
    pub config: AppConfig,
    pub status_message: String,
    /// Selected (year, month), set by the arrow keys or the mouse
    pub cursor: Option<(i32, u32)>,
    pub show_help: bool,
    pub show_legend: bool,
    pub export_requested: bool,
    pub throbber: ThrobberState,
    pub animation_counter: f64,
    pub last_frame: Instant,
    pub loaded_at: Option<DateTime<Local>>,
    /// Screen area the heatmap was last laid out for
    pub heatmap_area: Rect,
    load: Option<LoadHandle>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            running: true,
            controller: HeatmapController::new(Palette::default()),
            config,
            status_message: String::new(),
            cursor: None,
            show_help: false,
            show_legend: true,
            export_requested: false,
            throbber: ThrobberState::default(),
            animation_counter: 0.0,
            last_frame: Instant::now(),
            loaded_at: None,
            heatmap_area: Rect::default(),
            load: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub const fn is_loading(&self) -> bool {
        self.load.is_some()
    }

    /// Kick off a background load. Ignored while a load is already in flight.
    pub fn start_load(&mut self) {
        if let Some(current) = &self.load {
            log::debug!("Load from {} already in flight", current.source());
            return;
        }

        if self.phase() != Phase::Loading {
            if let Err(e) = self.controller.process(ControllerEvent::StartLoad) {
                log::warn!("{e}");
                return;
            }
        }

        self.status_message = format!("Loading {}", self.config.source);
        self.load = Some(spawn_load(self.config.source.clone(), self.config.timeout));
    }

    /// Collect a finished load, if any. Returns true when the phase changed.
    pub fn poll_load(&mut self) -> bool {
        let Some(handle) = self.load.as_mut() else {
            return false;
        };
        let Some(result) = handle.try_take() else {
            return false;
        };
        self.load = None;

        let event = match result {
            Ok(dataset) => {
                self.status_message = format!("Loaded {} monthly readings", dataset.len());
                self.loaded_at = Some(Local::now());
                ControllerEvent::LoadSucceeded(dataset)
            }
            Err(e) => {
                self.status_message = format!("Error: {e}");
                ControllerEvent::LoadFailed(e.to_string())
            }
        };

        if let Err(e) = self.controller.process(event) {
            log::warn!("{e}");
        }
        self.cursor = None;
        true
    }

    /// Re-render the heatmap for a screen area. A no-op until data has loaded,
    /// and when the area is unchanged.
    pub fn sync_layout(&mut self, area: Rect) {
        self.heatmap_area = area;

        if !self.controller.can_render() {
            return;
        }
        if area.width < MIN_HEATMAP_WIDTH || area.height < MIN_HEATMAP_HEIGHT {
            self.status_message = "Terminal too small for the heatmap".to_string();
            return;
        }

        match self
            .controller
            .process(ControllerEvent::Render(terminal_dimensions(area)))
        {
            Ok(Phase::Failed) => {
                self.status_message = format!(
                    "Error: {}",
                    self.controller.error().unwrap_or("render failed")
                );
            }
            Ok(_) => {}
            Err(e) => log::warn!("{e}"),
        }
    }

    /// Step the cursor by whole years and months, clamped to the dataset
    pub fn move_cursor(&mut self, years: i32, months: i32) {
        let Some((first, last)) = self.controller.dataset().and_then(|d| d.year_range()) else {
            return;
        };

        let (year, month) = self.cursor.unwrap_or((first, 0));
        let year = step_clamped(year, years, first, last);
        let month = step_clamped(month as i32, months, 0, 11) as u32;
        self.cursor = Some((year, month));
    }

    /// Select the cell under a terminal position; anywhere else clears the
    /// selection
    pub fn hover(&mut self, column: u16, row: u16) {
        let area = self.heatmap_area;
        let Some(plan) = self.controller.plan() else {
            return;
        };
        if column < area.x || row < area.y {
            self.cursor = None;
            return;
        }

        let x = f64::from(column - area.x) + 0.5;
        let y = f64::from(row - area.y) + 0.5;
        self.cursor = plan.cell_at(x, y).map(|cell| (cell.year, cell.month));
    }

    pub fn selected_cell(&self) -> Option<&CellPrimitive> {
        let (year, month) = self.cursor?;
        self.controller.plan()?.cell(year, month)
    }

    /// Write the loaded dataset as an SVG at the configured size and path
    pub async fn export_svg(&self) -> Result<PathBuf> {
        let dataset = self
            .controller
            .dataset()
            .ok_or_else(|| eyre!("Nothing to export yet"))?;

        write_svg(
            dataset,
            self.controller.palette(),
            self.config.svg_width,
            self.config.svg_height,
            &self.config.svg_path,
        )
        .await?;

        Ok(self.config.svg_path.clone())
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        // Cycles between 0 and 2*PI
        self.animation_counter += delta.as_secs_f64() * 2.0;
        if self.animation_counter > 2.0 * std::f64::consts::PI {
            self.animation_counter -= 2.0 * std::f64::consts::PI;
        }

        if self.is_loading() {
            self.throbber.calc_next();
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn toggle_legend(&mut self) {
        self.show_legend = !self.show_legend;
    }

    pub fn request_export(&mut self) {
        if self.controller.dataset().is_some() {
            self.export_requested = true;
        } else {
            self.status_message = "Nothing to export yet".to_string();
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}

/// Heatmap geometry in terminal cells, relative to the heatmap area
pub fn terminal_dimensions(area: Rect) -> Dimensions {
    Dimensions::new(f64::from(area.width), f64::from(area.height), TERMINAL_MARGINS)
        .with_tick_spacing(TERMINAL_TICK_SPACING)
}
