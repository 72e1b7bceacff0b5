//! Chart of actual and forecast close prices
//!
//! Renders an SVG with the `Close` series in black and the `Prediction`
//! series in green on a shared date axis.

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::PlotSettings;
use crate::data::prices::PriceTable;
use crate::error::{AdvisorError, Result, Stage};

type Points = Vec<(f64, f64)>;

/// SVG chart writer
#[derive(Debug, Clone)]
pub struct ForecastPlot {
    settings: PlotSettings,
}

impl Default for ForecastPlot {
    fn default() -> Self {
        Self::new(PlotSettings::default())
    }
}

impl ForecastPlot {
    pub fn new(settings: PlotSettings) -> Self {
        Self { settings }
    }

    /// Where the chart for `symbol` is written
    pub fn output_path(&self, symbol: &str) -> PathBuf {
        self.settings
            .output_dir
            .join(format!("{}.svg", symbol.trim().to_uppercase()))
    }

    /// Draw `table` and return the path of the finished SVG file
    pub fn render(&self, table: &PriceTable, symbol: &str) -> Result<PathBuf> {
        let Some(first_date) = table.rows().first().map(|r| r.date) else {
            return Err(AdvisorError::insufficient(Stage::Plot, "price table is empty"));
        };

        let day = |date: NaiveDate| (date - first_date).num_days() as f64;
        let close: Points = table
            .rows()
            .iter()
            .filter_map(|r| r.close.map(|c| (day(r.date), c)))
            .collect();
        let prediction: Points = table
            .rows()
            .iter()
            .filter_map(|r| r.prediction.map(|p| (day(r.date), p)))
            .collect();

        if close.is_empty() && prediction.is_empty() {
            return Err(AdvisorError::insufficient(
                Stage::Plot,
                "no close or prediction values to draw",
            ));
        }

        std::fs::create_dir_all(&self.settings.output_dir)?;
        let path = self.output_path(symbol);

        self.draw(&path, symbol, first_date, &close, &prediction)
            .map_err(|e| AdvisorError::Plot(format!("{}: {}", path.display(), e)))?;

        log::info!(
            "Chart with {} close and {} predicted points written to {}",
            close.len(),
            prediction.len(),
            path.display()
        );
        Ok(path)
    }

    fn draw(
        &self,
        path: &Path,
        symbol: &str,
        first_date: NaiveDate,
        close: &[(f64, f64)],
        prediction: &[(f64, f64)],
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let points = || close.iter().chain(prediction);
        let (x_min, x_max) = value_range(points().map(|p| p.0));
        let (y_min, y_max) = value_range(points().map(|p| p.1));
        let x_max = if x_max > x_min { x_max } else { x_min + 1.0 };
        let y_pad = ((y_max - y_min) * 0.05).max(0.5);

        let root = SVGBackend::new(path, (self.settings.width, self.settings.height))
            .into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("{} close price forecast", symbol), ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, (y_min - y_pad)..(y_max + y_pad))?;

        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc("Price")
            .x_labels(8)
            .x_label_formatter(&|x| {
                (first_date + Duration::days(x.round() as i64))
                    .format("%Y-%m-%d")
                    .to_string()
            })
            .y_label_formatter(&|y| format!("{:.2}", y))
            .draw()?;

        chart
            .draw_series(LineSeries::new(close.iter().copied(), BLACK.stroke_width(2)))?
            .label("Close")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2)));

        chart
            .draw_series(LineSeries::new(prediction.iter().copied(), GREEN.stroke_width(2)))?
            .label("Prediction")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN.stroke_width(2)));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }

    /// Open `path` with the configured viewer and wait for it to exit
    ///
    /// Without a viewer the path is only logged.
    pub fn show(&self, path: &Path) -> Result<()> {
        let Some(viewer) = self.settings.viewer.as_deref() else {
            log::info!("No viewer configured, chart saved at {}", path.display());
            return Ok(());
        };

        let mut parts = viewer.split_whitespace();
        let Some(program) = parts.next() else {
            return Err(AdvisorError::Plot("viewer command is empty".to_string()));
        };

        log::debug!("Opening {} with {}", path.display(), viewer);
        let status = Command::new(program)
            .args(parts)
            .arg(path)
            .status()
            .map_err(|e| AdvisorError::Plot(format!("cannot launch viewer '{}': {}", viewer, e)))?;

        if !status.success() {
            log::warn!("Viewer '{}' exited with {}", viewer, status);
        }
        Ok(())
    }
}

fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::prices::PriceBar;
    use tempfile::tempdir;

    fn table_with_forecast() -> PriceTable {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let bars: Vec<PriceBar> = (0..20)
            .map(|i| {
                let close = 100.0 + i as f64;
                PriceBar::new(
                    start + Duration::days(i),
                    close - 0.5,
                    close + 1.0,
                    close - 1.0,
                    close,
                    1e6,
                )
            })
            .collect();
        let mut table = PriceTable::from_bars(&bars);
        table.append_forecast(&[121.0, 122.0]);
        table
    }

    fn settings(dir: &Path) -> PlotSettings {
        PlotSettings {
            output_dir: dir.join("charts"),
            ..Default::default()
        }
    }

    #[test]
    fn test_output_path() {
        let plot = ForecastPlot::default();
        assert_eq!(plot.output_path("aapl"), PathBuf::from("plots").join("AAPL.svg"));
    }

    #[test]
    fn test_render_writes_svg() {
        let dir = tempdir().unwrap();
        let plot = ForecastPlot::new(settings(dir.path()));

        let path = plot.render(&table_with_forecast(), "AAPL").unwrap();

        assert_eq!(path, dir.path().join("charts").join("AAPL.svg"));
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Close"));
        assert!(svg.contains("Prediction"));
        assert!(svg.contains("Date"));
    }

    #[test]
    fn test_render_empty_table() {
        let dir = tempdir().unwrap();
        let plot = ForecastPlot::new(settings(dir.path()));
        let result = plot.render(&PriceTable::default(), "AAPL");

        assert!(matches!(
            result,
            Err(AdvisorError::InsufficientData {
                stage: Stage::Plot,
                ..
            })
        ));
        assert!(!dir.path().join("charts").exists());
    }

    #[test]
    fn test_show_without_viewer() {
        let plot = ForecastPlot::default();
        assert!(plot.show(Path::new("plots/AAPL.svg")).is_ok());
    }

    #[test]
    fn test_show_with_missing_viewer() {
        let plot = ForecastPlot::new(PlotSettings {
            viewer: Some("stock-advisor-no-such-viewer --flag".to_string()),
            ..Default::default()
        });
        let result = plot.show(Path::new("plots/AAPL.svg"));
        assert!(matches!(result, Err(AdvisorError::Plot(_))));
    }
}
