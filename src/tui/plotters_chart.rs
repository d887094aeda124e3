//! Plotters-powered growth chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A render-only chart description.
///
/// All series and bounds are computed outside the render call, so `render()`
/// only draws.
pub struct GrowthChart<'a> {
    /// Fitted line in log2 space (empty when there is no fit yet).
    pub line: &'a [(f64, f64)],
    /// `(time, log2(concentration))` for every observation.
    pub points: &'a [(f64, f64)],
    /// The observation selected in the table, drawn on top.
    pub selected: Option<(f64, f64)>,
    /// X bounds (time).
    pub x_bounds: [f64; 2],
    /// Y bounds (log2 concentration).
    pub y_bounds: [f64; 2],
    pub x_label: String,
    pub y_label: &'a str,
}

impl<'a> Widget for GrowthChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label.as_str())
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.1}"))
                .y_label_formatter(&|v| format!("{v:.1}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let line_color = RGBColor(255, 0, 0);
            let points_color = RGBColor(0, 255, 255);
            let selected_color = RGBColor(255, 255, 0);

            if self.line.len() >= 2 {
                chart.draw_series(LineSeries::new(self.line.iter().copied(), &line_color))?;
            }

            // `Pixel` rather than `Circle`: the ratatui backend maps circle radii
            // to canvas units and draws them far too large.
            chart.draw_series(self.points.iter().map(|&(x, y)| Pixel::new((x, y), points_color)))?;

            if let Some((x, y)) = self.selected {
                chart.draw_series(std::iter::once(Pixel::new((x, y), selected_color)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
