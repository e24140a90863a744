use crate::dataset::Dataset;
use crate::layout::{compute_plan, Dimensions, RenderPlan};
use crate::palette::Palette;
use std::convert::TryFrom;
use std::fmt;

/// Lifecycle of the heatmap
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Rendered,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Loading => write!(f, "Loading"),
            Self::Loaded => write!(f, "Loaded"),
            Self::Rendered => write!(f, "Rendered"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Clone, Debug)]
pub enum ControllerEvent {
    StartLoad,
    LoadSucceeded(Dataset),
    LoadFailed(String),
    Render(Dimensions),
    Reset,
}

impl ControllerEvent {
    const fn name(&self) -> &'static str {
        match self {
            Self::StartLoad => "StartLoad",
            Self::LoadSucceeded(_) => "LoadSucceeded",
            Self::LoadFailed(_) => "LoadFailed",
            Self::Render(_) => "Render",
            Self::Reset => "Reset",
        }
    }
}

impl fmt::Display for ControllerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadSucceeded(dataset) => write!(f, "LoadSucceeded({} entries)", dataset.len()),
            Self::LoadFailed(msg) => write!(f, "LoadFailed({msg})"),
            Self::Render(dims) => write!(f, "Render({}x{})", dims.width, dims.height),
            other => f.write_str(other.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransitionError {
    pub from: Phase,
    pub event: &'static str,
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

/// Owns the dataset, the current render plan and the phase they are in
#[derive(Debug, Clone)]
pub struct HeatmapController {
    phase: Phase,
    palette: Palette,
    dataset: Option<Dataset>,
    plan: Option<RenderPlan>,
    error: Option<String>,
}

struct NextState(Phase);

impl TryFrom<(Phase, ControllerEvent, &mut HeatmapController)> for NextState {
    type Error = StateTransitionError;

    fn try_from(
        value: (Phase, ControllerEvent, &mut HeatmapController),
    ) -> Result<Self, Self::Error> {
        let (current, event, controller) = value;

        match (current, event) {
            (_, ControllerEvent::Reset) => {
                controller.dataset = None;
                controller.plan = None;
                controller.error = None;
                Ok(Self(Phase::Idle))
            }
            (
                Phase::Idle | Phase::Loaded | Phase::Rendered | Phase::Failed,
                ControllerEvent::StartLoad,
            ) => {
                controller.error = None;
                Ok(Self(Phase::Loading))
            }
            (Phase::Loading, ControllerEvent::LoadSucceeded(dataset)) => {
                controller.dataset = Some(dataset);
                controller.plan = None;
                Ok(Self(Phase::Loaded))
            }
            (Phase::Loading, ControllerEvent::LoadFailed(message)) => {
                controller.error = Some(message);
                Ok(Self(Phase::Failed))
            }
            (Phase::Rendered, ControllerEvent::Render(dims))
                if controller.plan.as_ref().map(|p| p.dimensions) == Some(dims) =>
            {
                Ok(Self(Phase::Rendered))
            }
            (Phase::Loaded | Phase::Rendered, ControllerEvent::Render(dims)) => {
                Ok(Self(controller.render(dims)))
            }
            (from, event) => Err(StateTransitionError {
                from,
                event: event.name(),
            }),
        }
    }
}

impl HeatmapController {
    pub fn new(palette: Palette) -> Self {
        Self {
            phase: Phase::Idle,
            palette,
            dataset: None,
            plan: None,
            error: None,
        }
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    pub const fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub const fn plan(&self) -> Option<&RenderPlan> {
        self.plan.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a `Render` event would be accepted
    pub const fn can_render(&self) -> bool {
        matches!(self.phase, Phase::Loaded | Phase::Rendered)
    }

    /// Apply an event and return the phase it led to
    pub fn process(&mut self, event: ControllerEvent) -> Result<Phase, StateTransitionError> {
        let from = self.phase;
        let label = event.to_string();
        let NextState(next) = NextState::try_from((from, event, &mut *self))?;
        if from != next {
            log::debug!("Heatmap phase {from} -> {next} on {label}");
        }
        self.phase = next;
        Ok(next)
    }

    fn render(&mut self, dims: Dimensions) -> Phase {
        let Some(dataset) = self.dataset.as_ref() else {
            self.error = Some("No dataset loaded".to_string());
            return Phase::Failed;
        };

        match compute_plan(dataset, &self.palette, dims) {
            Ok(plan) => {
                // Replaces the previous plan, never appends to it
                self.plan = Some(plan);
                Phase::Rendered
            }
            Err(e) => {
                log::warn!("Layout failed: {e}");
                self.plan = None;
                self.error = Some(e.to_string());
                Phase::Failed
            }
        }
    }
}

impl Default for HeatmapController {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::MonthlyVariance;
    use crate::layout::Margins;

    fn sample() -> Dataset {
        let entries = (1900..1910)
            .flat_map(|year| (0..12).map(move |month| (year, month)))
            .map(|(year, month)| MonthlyVariance::new(year, month, 0.25).unwrap())
            .collect();
        Dataset {
            base_temperature: 8.66,
            entries,
        }
    }

    fn dims(width: f64) -> Dimensions {
        Dimensions::new(width, 400.0, Margins::uniform(40.0))
    }

    fn loaded() -> HeatmapController {
        let mut controller = HeatmapController::default();
        controller.process(ControllerEvent::StartLoad).unwrap();
        controller
            .process(ControllerEvent::LoadSucceeded(sample()))
            .unwrap();
        controller
    }

    #[test]
    fn load_then_render() {
        let mut controller = loaded();
        assert_eq!(controller.phase(), Phase::Loaded);
        assert!(controller.plan().is_none());

        let phase = controller.process(ControllerEvent::Render(dims(800.0))).unwrap();
        assert_eq!(phase, Phase::Rendered);
        assert_eq!(controller.plan().map(|p| p.cells.len()), Some(120));
    }

    #[test]
    fn rendering_twice_does_not_duplicate_cells() {
        let mut controller = loaded();
        controller.process(ControllerEvent::Render(dims(800.0))).unwrap();
        controller.process(ControllerEvent::Render(dims(800.0))).unwrap();
        assert_eq!(controller.plan().map(|p| p.cells.len()), Some(120));
    }

    #[test]
    fn resize_replaces_plan() {
        let mut controller = loaded();
        controller.process(ControllerEvent::Render(dims(800.0))).unwrap();
        controller.process(ControllerEvent::Render(dims(1000.0))).unwrap();

        let plan = controller.plan().unwrap();
        assert_eq!(plan.cells.len(), 120);
        assert!((plan.dimensions.width - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn load_failure_is_surfaced() {
        let mut controller = HeatmapController::default();
        controller.process(ControllerEvent::StartLoad).unwrap();
        let phase = controller
            .process(ControllerEvent::LoadFailed("timed out".to_string()))
            .unwrap();

        assert_eq!(phase, Phase::Failed);
        assert_eq!(controller.error(), Some("timed out"));

        // Reload is allowed after a failure and clears the message
        controller.process(ControllerEvent::StartLoad).unwrap();
        assert_eq!(controller.error(), None);
    }

    #[test]
    fn layout_error_moves_to_failed() {
        let mut controller = HeatmapController::default();
        controller.process(ControllerEvent::StartLoad).unwrap();
        controller
            .process(ControllerEvent::LoadSucceeded(Dataset {
                base_temperature: 8.0,
                entries: Vec::new(),
            }))
            .unwrap();

        let phase = controller.process(ControllerEvent::Render(dims(800.0))).unwrap();
        assert_eq!(phase, Phase::Failed);
        assert!(controller.error().is_some());
    }

    #[test]
    fn rejects_invalid_transitions() {
        let mut controller = HeatmapController::default();

        let err = controller
            .process(ControllerEvent::Render(dims(800.0)))
            .unwrap_err();
        assert_eq!(
            err,
            StateTransitionError {
                from: Phase::Idle,
                event: "Render",
            }
        );
        assert_eq!(controller.phase(), Phase::Idle);

        assert!(controller
            .process(ControllerEvent::LoadSucceeded(sample()))
            .is_err());

        controller.process(ControllerEvent::StartLoad).unwrap();
        assert!(controller.process(ControllerEvent::StartLoad).is_err());
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut controller = loaded();
        controller.process(ControllerEvent::Render(dims(800.0))).unwrap();
        controller.process(ControllerEvent::Reset).unwrap();

        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.dataset().is_none());
        assert!(controller.plan().is_none());
    }
}
