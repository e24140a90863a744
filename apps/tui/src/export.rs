use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use heatmap_core::svg::render_svg;
use heatmap_core::{compute_plan, Dataset, Dimensions, Margins, Palette};
use std::path::Path;

/// Room for the title above the grid, month names to its left and the
/// axis plus legend below it
pub const SVG_MARGINS: Margins = Margins::new(80.0, 40.0, 80.0, 100.0);

pub const fn svg_dimensions(width: f64, height: f64) -> Dimensions {
    Dimensions::new(width, height, SVG_MARGINS)
}

/// Lay the dataset out at the given pixel size and write it as an SVG document
pub async fn write_svg(
    dataset: &Dataset,
    palette: &Palette,
    width: f64,
    height: f64,
    path: &Path,
) -> Result<()> {
    let plan = compute_plan(dataset, palette, svg_dimensions(width, height))?;
    let document = render_svg(&plan);

    tokio::fs::write(path, document)
        .await
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;

    log::info!("Wrote {} cells to {}", plan.cells.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_svg_document() -> Result<()> {
        let dataset = Dataset::from_json(
            r#"{"baseTemperature":8.66,"monthlyVariance":[{"year":1753,"month":0,"variance":-1.366},{"year":1754,"month":6,"variance":0.5}]}"#,
        )?;
        let path = std::env::temp_dir().join(format!("heatmap-export-{}.svg", std::process::id()));

        write_svg(&dataset, &Palette::default(), 800.0, 400.0, &path).await?;

        let written = std::fs::read_to_string(&path)?;
        assert!(written.starts_with("<svg"));
        assert_eq!(written.matches("class='cell'").count(), 2);

        std::fs::remove_file(path)?;
        Ok(())
    }

    #[tokio::test]
    async fn too_small_canvas_is_rejected() {
        let dataset = Dataset::from_json(
            r#"{"baseTemperature":8.66,"monthlyVariance":[{"year":1753,"month":0,"variance":-1.366}]}"#,
        )
        .unwrap();
        let path = std::env::temp_dir().join("heatmap-never-written.svg");

        let result = write_svg(&dataset, &Palette::default(), 100.0, 100.0, &path).await;
        assert!(result.is_err());
        assert!(!path.exists());
    }
}
