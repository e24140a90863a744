use crate::layout::RenderPlan;
use crate::tooltip::Tooltip;
use std::fmt::Write;

pub const TITLE: &str = "Monthly Global Land-Surface Temperature";

const LEGEND_SWATCH: f64 = 30.0;

/// Subtitle shown under the title on every surface
pub fn subtitle(plan: &RenderPlan) -> String {
    format!(
        "{}-{}: base temperature {}℃",
        plan.year_range.0, plan.year_range.1, plan.base_temperature
    )
}

/// Standalone SVG document for a render plan
pub fn render_svg(plan: &RenderPlan) -> String {
    let dims = plan.dimensions;
    let margins = dims.margins;
    let grid_bottom = dims.height - margins.bottom;
    let legend_y = grid_bottom + margins.bottom * 0.5;
    let mut svg = String::new();

    let _ = writeln!(
        svg,
        "<svg xmlns='http://www.w3.org/2000/svg' width='{:.0}' height='{:.0}' viewBox='0 0 {:.0} {:.0}' font-family='sans-serif'>",
        dims.width,
        dims.height + LEGEND_SWATCH * 2.0,
        dims.width,
        dims.height + LEGEND_SWATCH * 2.0
    );
    let _ = writeln!(
        svg,
        "  <text id='title' x='{:.1}' y='{:.1}' text-anchor='middle' font-size='20'>{TITLE}</text>",
        dims.width / 2.0,
        margins.top * 0.4
    );
    let _ = writeln!(
        svg,
        "  <text id='description' x='{:.1}' y='{:.1}' text-anchor='middle' font-size='14'>{}</text>",
        dims.width / 2.0,
        margins.top * 0.75,
        escape(&subtitle(plan))
    );

    let _ = writeln!(svg, "  <g id='cells'>");
    for cell in &plan.cells {
        let tooltip = Tooltip::for_cell(cell);
        let _ = writeln!(
            svg,
            "    <rect class='cell' x='{:.2}' y='{:.2}' width='{:.2}' height='{:.2}' fill='{}' data-year='{}' data-month='{}' data-temp='{:.2}'><title>{}</title></rect>",
            cell.x,
            cell.y,
            cell.width,
            cell.height,
            cell.color,
            cell.year,
            cell.month,
            cell.temperature,
            escape(&tooltip.lines().join(" | "))
        );
    }
    let _ = writeln!(svg, "  </g>");

    let _ = writeln!(
        svg,
        "  <g id='x-axis' transform='translate(0,{grid_bottom:.1})'>"
    );
    for tick in &plan.x_ticks {
        let _ = writeln!(
            svg,
            "    <line x1='{0:.1}' x2='{0:.1}' y1='0' y2='6' stroke='black'/><text x='{0:.1}' y='20' text-anchor='middle' font-size='11'>{1}</text>",
            tick.position,
            escape(&tick.label)
        );
    }
    let _ = writeln!(svg, "  </g>");

    let _ = writeln!(
        svg,
        "  <g id='y-axis' transform='translate({:.1},0)'>",
        margins.left
    );
    for tick in &plan.y_ticks {
        let _ = writeln!(
            svg,
            "    <line x1='-6' x2='0' y1='{0:.1}' y2='{0:.1}' stroke='black'/><text x='-10' y='{0:.1}' dy='0.32em' text-anchor='end' font-size='11'>{1}</text>",
            tick.position,
            escape(&tick.label)
        );
    }
    let _ = writeln!(svg, "  </g>");

    let _ = writeln!(
        svg,
        "  <g id='legend' transform='translate({:.1},{legend_y:.1})'>",
        margins.left
    );
    for (i, entry) in plan.legend.iter().enumerate() {
        let x = i as f64 * LEGEND_SWATCH * 1.6;
        let _ = writeln!(
            svg,
            "    <rect x='{x:.1}' y='0' width='{LEGEND_SWATCH:.0}' height='{:.0}' fill='{}'/><text x='{x:.1}' y='{:.1}' font-size='9'>{}</text>",
            LEGEND_SWATCH / 2.0,
            entry.color,
            LEGEND_SWATCH,
            escape(&entry.label)
        );
    }
    let _ = writeln!(svg, "  </g>");

    let _ = writeln!(svg, "</svg>");
    svg
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
}
