use plotters::prelude::*;
use std::error::Error;

/// One series of bars, one value per category. `None` entries render as no
/// bar, making undefined aggregates visible as blanks.
#[derive(Clone, Debug)]
pub struct BarSeries {
    /// Name shown in the legend when more than one series is drawn
    pub name: String,

    /// Fill color of the bars
    pub color: RGBColor,

    /// Values aligned with the category labels; `None` draws nothing
    pub values: Vec<Option<f64>>,
}

/// Configuration options for chart generation
///
/// This structure contains the customizable properties shared by all charts
/// the application renders.
#[derive(Clone, Debug)]
pub struct ChartOptions {
    /// Title displayed at the top of the chart
    pub title: String,

    /// Label for the X-axis
    pub x_label: String,

    /// Label for the Y-axis
    pub y_label: String,

    /// Width of the chart in pixels
    pub width: u32,

    /// Height of the chart in pixels
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: "Chart".to_string(),
            x_label: "X Axis".to_string(),
            y_label: "Y Axis".to_string(),
            width: 900,
            height: 540,
        }
    }
}

/// Creates a category bar chart as PNG bytes
///
/// This is the single rendering entry point for the aggregate views: each
/// category gets one band on the X axis, and every series draws one bar per
/// band. With more than one series the bars are grouped side by side and a
/// legend is added.
///
/// # Arguments
/// * `labels` - Category labels, one band per label (e.g. business units)
/// * `series` - One or more bar series aligned with `labels`
/// * `options` - Chart title, axis labels and dimensions
///
/// # Returns
/// * A Result containing the PNG image data as bytes or an error
///
/// # Errors
/// * Returns an error if `labels` or `series` is empty
/// * Returns an error if the rendering backend fails
///
/// # Implementation Notes
/// * Renders into a temporary file-based bitmap and reads it back
/// * The Y range always includes 0 so bar heights stay comparable
pub fn bar_chart(
    labels: &[String],
    series: &[BarSeries],
    options: &ChartOptions,
) -> Result<Vec<u8>, Box<dyn Error>> {
    if labels.is_empty() {
        return Err("no categories to plot".into());
    }
    if series.is_empty() {
        return Err("no series to plot".into());
    }

    let tmp = tempfile::Builder::new().suffix(".png").tempfile()?;
    let path = tmp.path().to_path_buf();

    {
        let root =
            BitMapBackend::new(&path, (options.width, options.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let defined: Vec<f64> = series
            .iter()
            .flat_map(|s| s.values.iter().flatten().copied())
            .collect();
        let max_y = defined.iter().cloned().fold(0.0f64, f64::max);
        let min_y = defined.iter().cloned().fold(0.0f64, f64::min);

        let y_top = if max_y <= 0.0 { 1.0 } else { max_y * 1.05 };
        let y_bottom = if min_y < 0.0 { min_y * 1.05 } else { 0.0 };
        let n = labels.len();

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..n as f64, y_bottom..y_top)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(0)
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .draw()?;

        // Each category band is 1.0 wide; bars fill the middle 0.8 of it,
        // split evenly between the series.
        let band = 0.8 / series.len() as f64;
        for (s_idx, s) in series.iter().enumerate() {
            let color = s.color;
            let anno = chart.draw_series(s.values.iter().enumerate().filter_map(|(i, v)| {
                v.map(|y| {
                    let x0 = i as f64 + 0.1 + s_idx as f64 * band;
                    Rectangle::new([(x0, 0.0), (x0 + band, y)], color.filled())
                })
            }))?;
            anno.label(&s.name).legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
            });
        }

        if series.len() > 1 {
            chart
                .configure_series_labels()
                .border_style(BLACK)
                .background_style(WHITE.mix(0.8))
                .draw()?;
        }

        // Category labels are drawn by hand, centered under each band, since
        // the numeric axis has no notion of the label text.
        let style = ("sans-serif", 16).into_font().color(&BLACK);
        for (i, label) in labels.iter().enumerate() {
            let (px, py) = chart.backend_coord(&(i as f64 + 0.5, y_bottom));
            let offset = (label.len() as i32 * 4).min(60);
            root.draw_text(label, &style, (px - offset, py + 8))?;
        }

        root.present()?;
    }

    let png_data = std::fs::read(&path)?;
    Ok(png_data)
}
